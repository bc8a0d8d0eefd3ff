use crate::domain::{Command, CommandPlan};
use crate::exec::CommandRunner;
use crate::ui;
use log::info;
use thiserror::Error;

/// What happened to one command of a plan that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// The command ran and exited successfully
    Ran { command: Command, stdout: String },
    /// Dry-run: the command was announced but not executed
    WouldRun { command: Command },
}

impl ExecutionResult {
    pub fn command(&self) -> &Command {
        match self {
            ExecutionResult::Ran { command, .. } | ExecutionResult::WouldRun { command } => {
                command
            }
        }
    }
}

/// First failing command of a plan, with everything needed to finish by hand
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SequenceError {
    pub failed: Command,
    /// Commands after `failed` that were never attempted, in plan order
    pub remaining: Vec<Command>,
    pub stdout: String,
    pub stderr: String,
    pub message: String,
}

impl SequenceError {
    /// The failed command followed by every untried one
    pub fn recovery_commands(&self) -> Vec<&Command> {
        std::iter::once(&self.failed)
            .chain(self.remaining.iter())
            .collect()
    }
}

/// Runs a [CommandPlan] strictly in order, stopping at the first failure.
///
/// There is no rollback: commands that already succeeded stay applied.
pub struct CommandSequencer<'a> {
    runner: &'a dyn CommandRunner,
    dry_run: bool,
}

impl<'a> CommandSequencer<'a> {
    pub fn new(runner: &'a dyn CommandRunner, dry_run: bool) -> Self {
        CommandSequencer { runner, dry_run }
    }

    pub fn run(&self, plan: &CommandPlan) -> Result<Vec<ExecutionResult>, SequenceError> {
        let commands = plan.commands();
        let mut results = Vec::with_capacity(commands.len());

        for (index, command) in commands.iter().enumerate() {
            ui::display_command(command);

            if self.dry_run {
                results.push(ExecutionResult::WouldRun {
                    command: command.clone(),
                });
                continue;
            }

            let remaining = || commands[index + 1..].to_vec();

            let output = match self.runner.run(command) {
                Ok(output) => output,
                Err(e) => {
                    return Err(SequenceError {
                        failed: command.clone(),
                        remaining: remaining(),
                        stdout: String::new(),
                        stderr: String::new(),
                        message: format!("The command `{}` failed:\n{}", command, e),
                    });
                }
            };

            if !output.is_success() {
                let status = output
                    .status
                    .map(|code| format!("exit code {}", code))
                    .unwrap_or_else(|| "a signal".to_string());
                return Err(SequenceError {
                    failed: command.clone(),
                    remaining: remaining(),
                    message: format!(
                        "The command `{}` failed:\nprocess terminated with {}",
                        command, status
                    ),
                    stdout: output.stdout,
                    stderr: output.stderr,
                });
            }

            let stdout = output.stdout;
            if !stdout.trim().is_empty() {
                info!("{}", stdout.trim_end());
            }
            results.push(ExecutionResult::Ran {
                command: command.clone(),
                stdout,
            });
        }

        Ok(results)
    }
}
