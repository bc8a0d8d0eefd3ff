//! Interactive question flow.
//!
//! Questions form an ordered list. Each one carries a `when` predicate over
//! the answers collected so far, an optional `resolve` hook that can answer it
//! without prompting, and an `apply` step that records the reply. The list is
//! walked strictly front to back, so later questions see earlier answers.
//!
//! - `terminal` - stdin/stdout implementation of [Prompter]
//! - `questions` - the release question list

pub mod questions;
pub mod terminal;

pub use questions::{release_questions, QuestionContext};
pub use terminal::TerminalPrompter;

use crate::domain::ReleaseAnswers;
use crate::error::{ReleaseError, Result};
use crate::ui;

/// Label of the escape-hatch choice that switches to free text input
pub const OTHER_LABEL: &str = "Other (specify)";

/// One entry of a selection list; `value: None` is the "other" entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: Option<String>,
}

impl Choice {
    pub fn value(value: impl Into<String>) -> Self {
        let value = value.into();
        Choice {
            label: value.clone(),
            value: Some(value),
        }
    }

    pub fn labelled(label: impl Into<String>, value: impl Into<String>) -> Self {
        Choice {
            label: label.into(),
            value: Some(value.into()),
        }
    }

    pub fn other(label: impl Into<String>) -> Self {
        Choice {
            label: label.into(),
            value: None,
        }
    }
}

/// What to ask the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ask {
    Select { message: String, choices: Vec<Choice> },
    Input { message: String, default: Option<String> },
    Confirm { message: String, default: bool },
}

impl Ask {
    pub fn message(&self) -> &str {
        match self {
            Ask::Select { message, .. } | Ask::Input { message, .. } | Ask::Confirm { message, .. } => {
                message
            }
        }
    }
}

/// The user's answer to an [Ask]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Value of the picked choice, `None` for the "other" entry
    Selected(Option<String>),
    Text(String),
    Confirmed(bool),
}

/// Renders questions and collects replies.
pub trait Prompter {
    fn ask(&mut self, ask: &Ask) -> Result<Reply>;

    /// Tell the user why a reply was rejected before asking again
    fn reject(&mut self, reason: &str) {
        ui::display_error(reason);
    }
}

type Predicate<'a> = Box<dyn Fn(&ReleaseAnswers) -> bool + 'a>;
type Resolver<'a> = Box<dyn Fn(&ReleaseAnswers) -> Option<String> + 'a>;
type AskBuilder<'a> = Box<dyn Fn(&ReleaseAnswers) -> Result<Ask> + 'a>;
type Validator = fn(&str) -> std::result::Result<(), String>;
type Apply = fn(&mut ReleaseAnswers, Reply) -> Result<()>;

/// A single step of the question flow
pub struct Question<'a> {
    pub name: &'static str,
    when: Predicate<'a>,
    resolve: Option<Resolver<'a>>,
    ask: AskBuilder<'a>,
    validate: Option<Validator>,
    apply: Apply,
}

impl<'a> Question<'a> {
    pub fn new(
        name: &'static str,
        ask: impl Fn(&ReleaseAnswers) -> Result<Ask> + 'a,
        apply: Apply,
    ) -> Self {
        Question {
            name,
            when: Box::new(|_| true),
            resolve: None,
            ask: Box::new(ask),
            validate: None,
            apply,
        }
    }

    /// Only ask when `predicate` holds for the answers so far
    pub fn when(mut self, predicate: impl Fn(&ReleaseAnswers) -> bool + 'a) -> Self {
        self.when = Box::new(predicate);
        self
    }

    /// Answer without prompting whenever `resolver` returns a value
    pub fn resolve_with(mut self, resolver: impl Fn(&ReleaseAnswers) -> Option<String> + 'a) -> Self {
        self.resolve = Some(Box::new(resolver));
        self
    }

    /// Re-ask until free text input passes `validator`
    pub fn validate(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }

    fn run(&self, prompter: &mut dyn Prompter, answers: &mut ReleaseAnswers) -> Result<()> {
        if !(self.when)(answers) {
            return Ok(());
        }

        if let Some(resolved) = self.resolve.as_ref().and_then(|r| r(answers)) {
            log::debug!("{} resolved without prompting: {}", self.name, resolved);
            return (self.apply)(answers, Reply::Text(resolved));
        }

        let ask = (self.ask)(answers)?;
        loop {
            let reply = prompter.ask(&ask)?;
            if let (Some(validate), Reply::Text(text)) = (self.validate, &reply) {
                if let Err(reason) = validate(text) {
                    prompter.reject(&reason);
                    continue;
                }
            }
            return (self.apply)(answers, reply);
        }
    }
}

/// Walk `questions` in order, filling `answers`.
pub fn ask_all(
    questions: &[Question<'_>],
    prompter: &mut dyn Prompter,
    answers: &mut ReleaseAnswers,
) -> Result<()> {
    for question in questions {
        question.run(prompter, answers)?;
    }
    Ok(())
}

/// Reply did not match the kind of question asked
pub(crate) fn unexpected(name: &str, reply: &Reply) -> ReleaseError {
    ReleaseError::prompt(format!("unexpected reply for {}: {:?}", name, reply))
}
