//! CLI parse: clap types for Pagewire. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pagewire CLI - inspect messages, translators, and field validators
#[derive(Parser)]
#[command(name = "pagewire")]
#[command(about = "Message catalogs, value translation, and field validation for pagewire apps")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up and format a message
    Message {
        /// Message key
        key: String,
        /// Positional arguments substituted for {0}, {1}, ...
        args: Vec<String>,
        /// Locale (defaults to messages.default_locale)
        #[arg(long)]
        locale: Option<String>,
    },
    /// Parse a client value with the translator for a type
    Translate {
        /// Value type, e.g. i32, f64, bool, string
        #[arg(long = "type")]
        value_type: String,
        /// Field label used in failure messages
        #[arg(long, default_value = "value")]
        label: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Locale for failure messages (defaults to messages.default_locale)
        #[arg(long)]
        locale: Option<String>,
        value: String,
    },
    /// Translate then validate a client value
    Validate {
        #[arg(long = "type", default_value = "string")]
        value_type: String,
        /// Field id, used for `<id>-<validator>-message` overrides
        #[arg(long, default_value = "field")]
        id: String,
        #[arg(long, default_value = "value")]
        label: String,
        /// Validator spec, e.g. "required,minlength=3"
        #[arg(long, default_value = "")]
        spec: String,
        #[arg(long)]
        locale: Option<String>,
        #[arg(default_value = "")]
        value: String,
    },
    /// List known types with their lineage and resolved translator
    Types {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
