//! Main workflow orchestration logic
//!
//! The release runs as a fixed sequence of stages:
//! 1. Self-update check (may end the run with [WorkflowOutcome::Restart])
//! 2. Clean working tree check
//! 3. Prompting for whatever the command line left open
//! 4. Confirmation gate
//! 5. Remote sync and tag conflict checks, when a remote is known
//! 6. Plan construction
//! 7. Sequential execution
//!
//! Every collaborator is injected so the whole flow runs against mocks in tests.

use log::debug;
use semver::Version;

use crate::cli::{check_preid, ReleaseOptions};
use crate::config::Config;
use crate::domain::{build_plan, resolve, PlanInput, ReleaseAnswers};
use crate::error::{ReleaseError, Result};
use crate::exec::{CommandRunner, CommandSequencer};
use crate::git::{Repository, RepositoryStateChecker, TagConflictResolver};
use crate::package::PackageMetadata;
use crate::prompt::{ask_all, release_questions, Ask, Prompter, QuestionContext, Reply};
use crate::self_update::{self, UpdateSource};
use crate::ui;

/// How a workflow run ended without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Every command of the plan ran (or would have, in a dry run)
    Released { version: Version },
    /// The user answered no at the confirmation
    Declined,
    /// The tool updated itself; the caller must start it again with the same arguments
    Restart,
}

/// One release of the package in the working directory
pub struct ReleaseWorkflow<'a> {
    package: &'a PackageMetadata,
    config: &'a Config,
    repo: Option<&'a dyn Repository>,
    runner: &'a dyn CommandRunner,
    prompter: &'a mut dyn Prompter,
    updates: Option<&'a dyn UpdateSource>,
    tool_version: Version,
}

impl<'a> ReleaseWorkflow<'a> {
    pub fn new(
        package: &'a PackageMetadata,
        config: &'a Config,
        runner: &'a dyn CommandRunner,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        ReleaseWorkflow {
            package,
            config,
            repo: None,
            runner,
            prompter,
            updates: None,
            tool_version: Version::parse(env!("CARGO_PKG_VERSION"))
                .unwrap_or_else(|_| Version::new(0, 0, 0)),
        }
    }

    /// Git repository the package lives in, if any
    pub fn with_repository(mut self, repo: Option<&'a dyn Repository>) -> Self {
        self.repo = repo;
        self
    }

    /// Where to look for a newer release of the tool itself
    pub fn with_update_source(mut self, source: Option<&'a dyn UpdateSource>) -> Self {
        self.updates = source;
        self
    }

    pub fn run(&mut self, options: &ReleaseOptions) -> Result<WorkflowOutcome> {
        check_preid(options.increment.as_ref(), options.preid.as_deref())?;

        if !options.dry_run && self.check_for_update()? {
            return Ok(WorkflowOutcome::Restart);
        }

        RepositoryStateChecker::new(self.repo).check_clean()?;

        ui::display_banner(&self.package.name, &self.package.version, options.dry_run);

        let mut answers = self.seed_answers(options)?;
        self.ask_questions(options, &mut answers)?;

        if !answers.confirm {
            debug!("release declined");
            return Ok(WorkflowOutcome::Declined);
        }

        let increment = answers
            .version
            .as_ref()
            .ok_or_else(|| ReleaseError::usage("No version increment selected"))?;
        let version = resolve(&self.package.version, increment, answers.preid.as_deref())?;

        let mut branch = None;
        if let (Some(remote), Some(repo)) = (answers.remote.as_ref(), self.repo) {
            let local = self.current_branch(repo)?;
            RepositoryStateChecker::new(Some(repo)).check_sync(&local, remote)?;
            TagConflictResolver::new(repo, options.dry_run).resolve_tag_conflict(&version)?;
            branch = Some(local);
        }

        let tag = answers
            .tag
            .clone()
            .unwrap_or_else(|| self.config.release.default_tag.clone());
        let message = options
            .message
            .as_deref()
            .or(self.config.release.message.as_deref());

        let plan = build_plan(&PlanInput {
            version: &version,
            tag: &tag,
            message,
            remote: answers.remote.as_ref(),
            branch: branch.as_deref(),
            set_remote: answers.set_remote,
        });

        CommandSequencer::new(self.runner, options.dry_run).run(&plan)?;
        ui::display_done();

        Ok(WorkflowOutcome::Released { version })
    }

    /// Offer a newer release of the tool. Returns true once it was installed.
    fn check_for_update(&mut self) -> Result<bool> {
        if !self.config.self_update.enabled {
            return Ok(false);
        }
        let Some(source) = self.updates else {
            return Ok(false);
        };
        let Some(latest) = self_update::available_update(source, &self.tool_version) else {
            return Ok(false);
        };

        let reply = self.prompter.ask(&Ask::Confirm {
            message: format!(
                "A new version of {} ({} - you've got {}) is available. Would you like to update?",
                self_update::CRATE_NAME,
                latest,
                self.tool_version
            ),
            default: true,
        })?;
        if reply != Reply::Confirmed(true) {
            return Ok(false);
        }

        ui::display_status("Running self-update. Please hang on...");
        let install = self_update::install_command();
        let output = self.runner.run(&install)?;
        if !output.is_success() {
            return Err(ReleaseError::self_update(format!(
                "`{}` failed: {}",
                install,
                output.stderr.trim()
            )));
        }
        ui::display_success("Self update completed");
        Ok(true)
    }

    /// Answers already fixed by the command line and the tracked upstream
    fn seed_answers(&self, options: &ReleaseOptions) -> Result<ReleaseAnswers> {
        let mut answers = ReleaseAnswers {
            version: options.increment.clone(),
            preid: options.preid.clone(),
            tag: options.tag.clone().filter(|tag| !tag.is_empty()),
            confirm: options.yes,
            ..Default::default()
        };

        if let Some(repo) = self.repo {
            let branch = self.current_branch(repo)?;
            if let Some(upstream) = repo.upstream_of(&branch)? {
                debug!("{} tracks {}", branch, upstream);
                answers.remote = Some(upstream.parse()?);
            }
        }

        Ok(answers)
    }

    fn current_branch(&self, repo: &dyn Repository) -> Result<String> {
        repo.current_branch()?
            .ok_or_else(|| ReleaseError::usage("Cannot determine git branch"))
    }

    fn ask_questions(&mut self, options: &ReleaseOptions, answers: &mut ReleaseAnswers) -> Result<()> {
        let branch = match self.repo {
            Some(repo) => Some(self.current_branch(repo)?),
            None => None,
        };

        let ctx = QuestionContext {
            current: &self.package.version,
            config: &self.config.release,
            runner: self.runner,
            repo: self.repo,
            branch,
            prompt_tag: options.tag.as_deref() == Some(""),
            dry_run: options.dry_run,
        };
        let questions = release_questions(&ctx);
        ask_all(&questions, &mut *self.prompter, answers)
    }
}
