use std::path::Path;
use std::process;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use cut_release::cli::{Args, ReleaseWorkflow, WorkflowOutcome};
use cut_release::config;
use cut_release::exec::ShellRunner;
use cut_release::git::{Git2Repository, Repository};
use cut_release::package::PackageMetadata;
use cut_release::prompt::TerminalPrompter;
use cut_release::self_update::{CratesIoSource, UpdateSource, CRATE_NAME};
use cut_release::{ui, ReleaseError};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("cut_release=info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        Err(e) => {
            // --help
            let _ = e.print();
            return Ok(());
        }
    };

    if args.version {
        println!("{} {}", CRATE_NAME, env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let options = match args.validate() {
        Ok(options) => options,
        Err(e) => {
            println!("{}", Args::command().render_help());
            fail(&e);
        }
    };

    let config = config::load_config(args.config.as_deref()).unwrap_or_else(|e| fail(&e));
    let package = PackageMetadata::load(Path::new(".")).unwrap_or_else(|e| fail(&e));
    let repo = Git2Repository::open_if_present(".").unwrap_or_else(|e| fail(&e));

    let source = if config.self_update.enabled {
        CratesIoSource::new(&config.self_update)
            .map_err(|e| log::debug!("self update unavailable: {}", e))
            .ok()
    } else {
        None
    };

    let runner = ShellRunner::new();
    let mut prompter = TerminalPrompter::new();

    let outcome = ReleaseWorkflow::new(&package, &config, &runner, &mut prompter)
        .with_repository(repo.as_ref().map(|r| r as &dyn Repository))
        .with_update_source(source.as_ref().map(|s| s as &dyn UpdateSource))
        .run(&options);

    match outcome {
        Ok(WorkflowOutcome::Restart) => {
            let status = process::Command::new(CRATE_NAME)
                .args(std::env::args().skip(1))
                .status()?;
            process::exit(status.code().unwrap_or(1));
        }
        Ok(WorkflowOutcome::Released { .. }) | Ok(WorkflowOutcome::Declined) => Ok(()),
        Err(e) => fail(&e),
    }
}

fn fail(error: &ReleaseError) -> ! {
    match error {
        ReleaseError::Sequence(failure) => ui::display_sequence_failure(failure),
        other => ui::display_error(&other.to_string()),
    }
    process::exit(error.exit_code());
}
