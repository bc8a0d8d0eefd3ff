use crate::domain::answers::RemoteRef;
use crate::domain::tag::release_tag_name;
use semver::Version;
use std::fmt;

/// One external invocation: a program and its arguments, run without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub program: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Command {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

fn quote(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '$' | '`' | '\\'));
    if needs_quotes {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

impl fmt::Display for Command {
    /// Shell-pasteable rendering, used for progress and manual recovery
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// Ordered commands of one release; insertion order is execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPlan {
    commands: Vec<Command>,
}

impl CommandPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl From<Vec<Command>> for CommandPlan {
    fn from(commands: Vec<Command>) -> Self {
        CommandPlan { commands }
    }
}

/// Inputs that determine the release plan
#[derive(Debug, Clone)]
pub struct PlanInput<'a> {
    pub version: &'a Version,
    pub tag: &'a str,
    pub message: Option<&'a str>,
    pub remote: Option<&'a RemoteRef>,
    /// Local branch being released; defaults to the remote branch name
    pub branch: Option<&'a str>,
    pub set_remote: bool,
}

/// Build the full command list for a release.
///
/// Remote steps are only included when a remote is known; tracking setup only
/// when the remote was picked interactively.
pub fn build_plan(input: &PlanInput<'_>) -> CommandPlan {
    let mut plan = CommandPlan::new();

    let mut bump = vec!["version".to_string(), input.version.to_string()];
    if let Some(message) = input.message {
        bump.push("--message".to_string());
        bump.push(message.to_string());
    }
    plan.push(Command::new("npm", bump));

    if let Some(remote) = input.remote {
        if input.set_remote {
            plan.push(Command::new(
                "git",
                ["branch".to_string(), "-u".to_string(), remote.to_string()],
            ));
        }
        let refspec = match input.branch {
            Some(local) if local != remote.branch => format!("{}:{}", local, remote.branch),
            _ => remote.branch.clone(),
        };
        plan.push(Command::new("git", ["push".to_string(), remote.remote.clone(), refspec]));
        plan.push(Command::new(
            "git",
            [
                "push".to_string(),
                remote.remote.clone(),
                release_tag_name(input.version),
            ],
        ));
    }

    let mut publish = vec!["publish".to_string()];
    if !input.tag.is_empty() {
        publish.push("--tag".to_string());
        publish.push(input.tag.to_string());
    }
    plan.push(Command::new("npm", publish));

    plan
}
