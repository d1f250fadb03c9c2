//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod check;
mod completions;
mod config;
mod submit;
mod utils;
mod validate;

pub use check::handle_check;
pub use completions::handle_completions;
pub use config::handle_config;
pub use submit::handle_submit;
pub use validate::handle_validate;
