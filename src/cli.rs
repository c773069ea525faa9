//! CLI domain: parse, route, and presentation only.
//! Commands exercise the message catalog, translator registry, and validator source.

mod parse;
mod presentation;
mod route;

pub use parse::{Cli, Commands};
pub use presentation::{format_translation, format_type_table, format_validation};
pub use route::RunContext;

use crate::error::CliError;

/// Map command errors to a string for CLI output.
pub fn map_error(e: &CliError) -> String {
    e.to_string()
}
