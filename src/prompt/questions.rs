use regex::Regex;
use semver::Version;

use crate::config::ReleaseConfig;
use crate::domain::{resolve, Increment, ReleaseAnswers, SEMVER_INCREMENTS};
use crate::error::{ReleaseError, Result};
use crate::exec::CommandRunner;
use crate::git::Repository;
use crate::npm;
use crate::prompt::{unexpected, Ask, Choice, Question, Reply, OTHER_LABEL};

/// Everything the release questions read besides earlier answers
pub struct QuestionContext<'a> {
    pub current: &'a Version,
    pub config: &'a ReleaseConfig,
    pub runner: &'a dyn CommandRunner,
    pub repo: Option<&'a dyn Repository>,
    /// Checked-out branch; `None` outside a repository
    pub branch: Option<String>,
    /// `-t ""` was given: ask for the tag even for a regular release
    pub prompt_tag: bool,
    pub dry_run: bool,
}

fn validate_version(input: &str) -> std::result::Result<(), String> {
    match Version::parse(input.trim()) {
        Ok(_) => Ok(()),
        Err(_) => Err("Please specify a valid semver, e.g. 1.2.3. See http://semver.org/".to_string()),
    }
}

fn validate_preid(input: &str) -> std::result::Result<(), String> {
    let pattern = Regex::new(r"^[0-9A-Za-z-]*[A-Za-z][0-9A-Za-z-]*$").map_err(|e| e.to_string())?;
    if pattern.is_match(input.trim()) {
        Ok(())
    } else {
        Err("Please specify a valid identifier".to_string())
    }
}

fn apply_version(answers: &mut ReleaseAnswers, reply: Reply) -> Result<()> {
    match reply {
        Reply::Selected(Some(value)) | Reply::Text(value) => {
            answers.version = Some(value.parse::<Increment>()?);
        }
        Reply::Selected(None) => {}
        other => return Err(unexpected("version", &other)),
    }
    Ok(())
}

fn apply_preid(answers: &mut ReleaseAnswers, reply: Reply) -> Result<()> {
    match reply {
        Reply::Selected(Some(value)) | Reply::Text(value) => {
            answers.preid = Some(value.trim().to_string());
        }
        Reply::Selected(None) => {}
        other => return Err(unexpected("preid", &other)),
    }
    Ok(())
}

fn apply_tag(answers: &mut ReleaseAnswers, reply: Reply) -> Result<()> {
    match reply {
        Reply::Selected(Some(value)) | Reply::Text(value) => {
            answers.tag = Some(value.trim().to_string());
        }
        Reply::Selected(None) => {}
        other => return Err(unexpected("tag", &other)),
    }
    Ok(())
}

fn apply_remote(answers: &mut ReleaseAnswers, reply: Reply) -> Result<()> {
    match reply {
        Reply::Selected(Some(value)) => {
            answers.remote = Some(value.parse()?);
            answers.set_remote = true;
        }
        other => return Err(unexpected("remote", &other)),
    }
    Ok(())
}

fn apply_confirm(answers: &mut ReleaseAnswers, reply: Reply) -> Result<()> {
    match reply {
        Reply::Confirmed(yes) => {
            answers.confirm = yes;
            Ok(())
        }
        other => Err(unexpected("confirm", &other)),
    }
}

/// The ordered release questions: version, preid, tag, remote, confirmation.
pub fn release_questions<'a>(ctx: &'a QuestionContext<'a>) -> Vec<Question<'a>> {
    vec![
        Question::new(
            "version",
            move |_| {
                let mut choices: Vec<Choice> =
                    SEMVER_INCREMENTS.iter().map(|s| Choice::value(*s)).collect();
                choices.push(Choice::other(OTHER_LABEL));
                Ok(Ask::Select {
                    message: "Select semver increment or specify new version".to_string(),
                    choices,
                })
            },
            apply_version,
        )
        .when(move |a| a.version.is_none()),
        Question::new(
            "version",
            move |_| {
                Ok(Ask::Input {
                    message: "Version".to_string(),
                    default: None,
                })
            },
            apply_version,
        )
        .when(move |a| a.version.is_none())
        .validate(validate_version),
        Question::new(
            "preid",
            move |a| {
                let mut choices: Vec<Choice> =
                    ctx.config.preid_choices.iter().map(Choice::value).collect();
                choices.push(Choice::other(OTHER_LABEL));
                Ok(Ask::Select {
                    message: format!(
                        "Select a {} identifier",
                        a.version.as_ref().map(|v| v.to_string()).unwrap_or_default()
                    ),
                    choices,
                })
            },
            apply_preid,
        )
        .when(move |a| a.wants_preid() && a.preid.is_none())
        .resolve_with(move |_| npm::infer_preid(&npm::published_versions(ctx.runner))),
        Question::new(
            "preid",
            move |_| {
                Ok(Ask::Input {
                    message: "Identifier".to_string(),
                    default: None,
                })
            },
            apply_preid,
        )
        .when(move |a| a.wants_preid() && a.preid.is_none())
        .validate(validate_preid),
        Question::new(
            "tag",
            move |a| {
                let tags = npm::dist_tags(ctx.runner, a.preid.is_some());
                let other = if tags.is_empty() { "Add new tag" } else { OTHER_LABEL };
                let mut choices: Vec<Choice> = tags.into_iter().map(Choice::value).collect();
                choices.push(Choice::other(other));
                Ok(Ask::Select {
                    message: "How should this version be tagged in NPM?".to_string(),
                    choices,
                })
            },
            apply_tag,
        )
        .when(move |a| a.tag.is_none())
        .resolve_with(move |a| {
            let ask = a.preid.is_some() || ctx.prompt_tag;
            (!ask).then(|| ctx.config.default_tag.clone())
        }),
        Question::new(
            "tag",
            move |_| {
                Ok(Ask::Input {
                    message: "Tag".to_string(),
                    default: Some("latest".to_string()),
                })
            },
            apply_tag,
        )
        .when(move |a| a.tag.is_none()),
        Question::new(
            "remote",
            move |_| {
                let (Some(repo), Some(branch)) = (ctx.repo, ctx.branch.as_deref()) else {
                    return Err(ReleaseError::usage("Cannot determine git branch"));
                };
                let remotes = repo.list_remotes()?;
                if remotes.is_empty() {
                    return Err(ReleaseError::usage("No git remotes found"));
                }
                Ok(Ask::Select {
                    message: "Which git remote should your local branch be tracking?".to_string(),
                    choices: remotes
                        .iter()
                        .map(|r| Choice::labelled(r.as_str(), format!("{}/{}", r, branch)))
                        .collect(),
                })
            },
            apply_remote,
        )
        .when(move |a| a.remote.is_none() && ctx.repo.is_some() && ctx.branch.is_some()),
        Question::new(
            "confirm",
            move |a| {
                let increment = a
                    .version
                    .as_ref()
                    .ok_or_else(|| ReleaseError::prompt("no version selected"))?;
                let next = resolve(ctx.current, increment, a.preid.as_deref())?;
                let mut message = format!(
                    "Will bump from {} to {} and tag as {}. Continue",
                    ctx.current,
                    next,
                    a.tag.as_deref().unwrap_or(&ctx.config.default_tag)
                );
                if ctx.dry_run {
                    message.push_str(" with dry run");
                }
                message.push('?');
                Ok(Ask::Confirm {
                    message,
                    default: true,
                })
            },
            apply_confirm,
        )
        .when(move |a| !a.confirm),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RemoteRef;
    use crate::exec::fake::FakeRunner;
    use crate::exec::CommandOutput;
    use crate::git::MockRepository;
    use crate::prompt::ask_all;
    use crate::prompt::scripted::ScriptedPrompter;

    struct Fixture {
        current: Version,
        config: ReleaseConfig,
        runner: FakeRunner,
        repo: MockRepository,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                current: Version::parse("1.2.3").unwrap(),
                config: ReleaseConfig::default(),
                runner: FakeRunner::new(),
                repo: MockRepository::new(),
            }
        }

        fn context(&self, in_repo: bool) -> QuestionContext<'_> {
            QuestionContext {
                current: &self.current,
                config: &self.config,
                runner: &self.runner,
                repo: if in_repo { Some(&self.repo as &dyn Repository) } else { None },
                branch: if in_repo { Some("main".to_string()) } else { None },
                prompt_tag: false,
                dry_run: false,
            }
        }
    }

    #[test]
    fn test_full_interactive_flow_outside_repo() {
        let fx = Fixture::new();
        let ctx = fx.context(false);
        let questions = release_questions(&ctx);
        let mut answers = ReleaseAnswers::default();
        let mut prompter = ScriptedPrompter::new([
            Reply::Selected(Some("minor".to_string())),
            Reply::Confirmed(true),
        ]);

        ask_all(&questions, &mut prompter, &mut answers).unwrap();

        assert_eq!(answers.version, Some("minor".parse().unwrap()));
        assert_eq!(answers.tag.as_deref(), Some("latest"));
        assert_eq!(answers.preid, None);
        assert!(answers.confirm);
        assert_eq!(
            prompter.messages()[1],
            "Will bump from 1.2.3 to 1.3.0 and tag as latest. Continue?"
        );
    }

    #[test]
    fn test_other_version_is_validated() {
        let fx = Fixture::new();
        let ctx = fx.context(false);
        let questions = release_questions(&ctx);
        let mut answers = ReleaseAnswers::default();
        let mut prompter = ScriptedPrompter::new([
            Reply::Selected(None),
            Reply::Text("nope".to_string()),
            Reply::Text("4.0.0".to_string()),
            Reply::Confirmed(false),
        ]);

        ask_all(&questions, &mut prompter, &mut answers).unwrap();

        assert_eq!(answers.version, Some("4.0.0".parse().unwrap()));
        assert_eq!(prompter.rejections.len(), 1);
        assert!(!answers.confirm);
    }

    #[test]
    fn test_preid_inferred_from_published_prereleases() {
        let mut fx = Fixture::new();
        fx.runner = FakeRunner::new()
            .respond(
                "npm show . versions",
                CommandOutput::success("[ '1.2.3', '1.2.4-beta.0' ]"),
            )
            .respond(
                "npm dist-tag ls",
                CommandOutput::success("latest: 1.2.3\nnext: 1.2.4-beta.0\n"),
            );
        let ctx = fx.context(false);
        let questions = release_questions(&ctx);
        let mut answers = ReleaseAnswers {
            version: Some("prerelease".parse().unwrap()),
            confirm: true,
            ..Default::default()
        };
        let mut prompter = ScriptedPrompter::new([Reply::Selected(Some("prerelease".to_string()))]);

        ask_all(&questions, &mut prompter, &mut answers).unwrap();

        assert_eq!(answers.preid.as_deref(), Some("beta"));
        assert_eq!(answers.tag.as_deref(), Some("prerelease"));
        match &prompter.asked[0] {
            Ask::Select { choices, .. } => {
                let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
                assert_eq!(labels, vec!["prerelease", "next", "Other (specify)"]);
            }
            other => panic!("unexpected ask: {:?}", other),
        }
    }

    #[test]
    fn test_preid_prompted_when_nothing_published() {
        let fx = Fixture::new();
        let ctx = fx.context(false);
        let questions = release_questions(&ctx);
        let mut answers = ReleaseAnswers {
            version: Some("preminor".parse().unwrap()),
            confirm: true,
            ..Default::default()
        };
        let mut prompter = ScriptedPrompter::new([
            Reply::Selected(None),
            Reply::Text("nightly".to_string()),
            Reply::Selected(None),
            Reply::Text("canary".to_string()),
        ]);

        ask_all(&questions, &mut prompter, &mut answers).unwrap();

        assert_eq!(answers.preid.as_deref(), Some("nightly"));
        assert_eq!(answers.tag.as_deref(), Some("canary"));
        assert_eq!(prompter.messages()[0], "Select a preminor identifier");
        match &prompter.asked[2] {
            Ask::Select { choices, .. } => {
                assert_eq!(choices, &vec![Choice::other("Add new tag")]);
            }
            other => panic!("unexpected ask: {:?}", other),
        }
    }

    #[test]
    fn test_empty_tag_flag_forces_tag_prompt() {
        let fx = Fixture::new();
        let mut ctx = fx.context(false);
        ctx.prompt_tag = true;
        let questions = release_questions(&ctx);
        let mut answers = ReleaseAnswers {
            version: Some("patch".parse().unwrap()),
            confirm: true,
            ..Default::default()
        };
        let mut prompter = ScriptedPrompter::new([Reply::Selected(None), Reply::Text(String::new())]);

        ask_all(&questions, &mut prompter, &mut answers).unwrap();
        assert_eq!(answers.tag.as_deref(), Some(""));
    }

    #[test]
    fn test_remote_prompt_when_branch_has_no_upstream() {
        let mut fx = Fixture::new();
        fx.repo.add_remote("origin");
        fx.repo.add_remote("fork");
        let ctx = fx.context(true);
        let questions = release_questions(&ctx);
        let mut answers = ReleaseAnswers {
            version: Some("patch".parse().unwrap()),
            confirm: true,
            ..Default::default()
        };
        let mut prompter = ScriptedPrompter::new([Reply::Selected(Some("fork/main".to_string()))]);

        ask_all(&questions, &mut prompter, &mut answers).unwrap();

        assert_eq!(answers.remote, Some(RemoteRef::new("fork", "main")));
        assert!(answers.set_remote);
    }

    #[test]
    fn test_no_remotes_is_an_error() {
        let fx = Fixture::new();
        let ctx = fx.context(true);
        let questions = release_questions(&ctx);
        let mut answers = ReleaseAnswers {
            version: Some("patch".parse().unwrap()),
            confirm: true,
            ..Default::default()
        };
        let mut prompter = ScriptedPrompter::new([]);

        let err = ask_all(&questions, &mut prompter, &mut answers).unwrap_err();
        assert!(err.to_string().contains("No git remotes found"));
    }

    #[test]
    fn test_dry_run_confirmation_message() {
        let fx = Fixture::new();
        let mut ctx = fx.context(false);
        ctx.dry_run = true;
        let questions = release_questions(&ctx);
        let mut answers = ReleaseAnswers {
            version: Some("major".parse().unwrap()),
            tag: Some("next".to_string()),
            ..Default::default()
        };
        let mut prompter = ScriptedPrompter::new([Reply::Confirmed(true)]);

        ask_all(&questions, &mut prompter, &mut answers).unwrap();
        assert_eq!(
            prompter.messages(),
            vec!["Will bump from 1.2.3 to 2.0.0 and tag as next. Continue with dry run?"]
        );
    }

    #[test]
    fn test_validators() {
        assert!(validate_version("1.2.3-rc.1").is_ok());
        assert!(validate_version("1.2").is_err());
        assert!(validate_preid("rc").is_ok());
        assert!(validate_preid("beta-2").is_ok());
        assert!(validate_preid("123").is_err());
        assert!(validate_preid("r c").is_err());
    }
}
