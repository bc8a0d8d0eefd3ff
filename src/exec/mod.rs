//! External command execution
//!
//! - [shell::ShellRunner]: runs a [Command] as a child process and captures its output
//! - [sequencer::CommandSequencer]: runs a [crate::domain::CommandPlan] one command at a time
//!
//! Everything that talks to `npm` or `git` on the command line goes through
//! the [CommandRunner] trait so the workflow can be driven by a fake in tests.

pub mod sequencer;
pub mod shell;

pub use sequencer::{CommandSequencer, ExecutionResult, SequenceError};
pub use shell::ShellRunner;

use crate::domain::Command;

/// Captured result of a finished child process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        CommandOutput {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        CommandOutput {
            status: Some(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Narrow interface to the outside world: run one command, wait for it.
///
/// `Err` means the process could not be started at all; a process that ran
/// and exited non-zero is `Ok` with a failing [CommandOutput].
pub trait CommandRunner {
    fn run(&self, command: &Command) -> std::io::Result<CommandOutput>;
}

/// Run a query command and return its trimmed stdout, or `None` on any failure
/// or empty output.
pub fn capture(runner: &dyn CommandRunner, command: &Command) -> Option<String> {
    match runner.run(command) {
        Ok(output) if output.is_success() => {
            let trimmed = output.stdout.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Ok(output) => {
            log::debug!("`{}` exited with {:?}", command, output.status);
            None
        }
        Err(e) => {
            log::debug!("`{}` could not be started: {}", command, e);
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeRunner;
    use super::*;

    #[test]
    fn test_capture_trims_output() {
        let runner = FakeRunner::new().respond("git remote", CommandOutput::success("origin\n"));
        let out = capture(&runner, &Command::new("git", ["remote"]));
        assert_eq!(out, Some("origin".to_string()));
    }

    #[test]
    fn test_capture_swallows_failures() {
        let runner = FakeRunner::new()
            .respond("npm dist-tag ls", CommandOutput::failure(1, "", "E404"))
            .unstartable("missing-tool");

        assert_eq!(capture(&runner, &Command::new("npm", ["dist-tag", "ls"])), None);
        assert_eq!(capture(&runner, &Command::new("missing-tool", Vec::<String>::new())), None);
    }

    #[test]
    fn test_capture_empty_output_is_none() {
        let runner = FakeRunner::new();
        assert_eq!(capture(&runner, &Command::new("git", ["tag"])), None);
    }
}
