//! User interface module - terminal output.

pub mod formatter;

pub use formatter::{
    display_error, display_result, display_status, display_version, format_dry_run, format_error,
};
