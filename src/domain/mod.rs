//! Domain logic - pure release rules independent of git, npm and the terminal

pub mod answers;
pub mod increment;
pub mod plan;
pub mod tag;
pub mod version;

pub use answers::{ReleaseAnswers, RemoteRef};
pub use increment::{Increment, IncrementKind, SEMVER_INCREMENTS};
pub use plan::{build_plan, Command, CommandPlan, PlanInput};
pub use tag::{find_version_tag, parse_tag_version, release_tag_name};
pub use version::{resolve, resolve_str};
