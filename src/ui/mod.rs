//! User facing output.
//!
//! Interactive input lives in [crate::prompt]; this module only prints.

pub mod formatter;

pub use formatter::{
    display_banner, display_command, display_done, display_error, display_sequence_failure,
    display_status, display_success,
};
