use crate::domain::Command;
use crate::exec::{CommandOutput, CommandRunner};
use log::debug;
use std::path::PathBuf;
use std::process;

/// Runs commands as child processes in a fixed working directory
pub struct ShellRunner {
    cwd: Option<PathBuf>,
}

impl ShellRunner {
    /// Runner that inherits the current working directory
    pub fn new() -> Self {
        ShellRunner { cwd: None }
    }

    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        ShellRunner {
            cwd: Some(cwd.into()),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ShellRunner {
    /// Execute the command with stdin closed and both output streams captured.
    ///
    /// The program is looked up on `PATH`; no shell is involved, so arguments
    /// are passed through verbatim.
    fn run(&self, command: &Command) -> std::io::Result<CommandOutput> {
        debug!("running `{}`", command);

        let mut cmd = process::Command::new(&command.program);
        cmd.args(&command.args).stdin(process::Stdio::null());
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output()?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_captures_stdout() {
        let runner = ShellRunner::new();
        let output = runner
            .run(&Command::new("sh", ["-c", "echo hello"]))
            .unwrap();

        assert!(output.is_success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn test_non_zero_exit_is_reported_not_raised() {
        let runner = ShellRunner::new();
        let output = runner
            .run(&Command::new("sh", ["-c", "echo oops >&2; exit 3"]))
            .unwrap();

        assert!(!output.is_success());
        assert_eq!(output.status, Some(3));
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let runner = ShellRunner::new();
        let result = runner.run(&Command::new(
            "/nonexistent/path/to/program",
            Vec::<String>::new(),
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_runs_in_given_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();

        let runner = ShellRunner::in_dir(dir.path());
        let output = runner.run(&Command::new("ls", Vec::<String>::new())).unwrap();
        assert!(output.stdout.contains("marker.txt"));
    }
}
