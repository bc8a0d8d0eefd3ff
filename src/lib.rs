pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod exec;
pub mod git;
pub mod npm;
pub mod package;
pub mod prompt;
pub mod self_update;
pub mod ui;

pub use error::{ReleaseError, Result};
