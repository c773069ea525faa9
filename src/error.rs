//! Error types for request dispatch, rendering, and form-field services.

use thiserror::Error;

/// An invocation target (page or nested component) could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Component '{component}' not found in page '{page}'")]
    ComponentNotFound { page: String, component: String },
}

/// A field value was rejected by a validator or translator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Name of the validator (or translator) that rejected the value
    pub validator: String,
    /// User-presentable reason
    pub message: String,
}

impl ValidationError {
    pub fn new(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
        }
    }
}

/// Heartbeat misuse: defer/end without a matching begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalStateError {
    #[error("Heartbeat defer() called with no open scope; call begin() first")]
    DeferWithoutScope,

    #[error("Heartbeat end() called with no open scope (stack underflow)")]
    Underflow,
}

/// Translator lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Unknown translator '{name}'. Available translators: {}", available.join(", "))]
    UnknownTranslator { name: String, available: Vec<String> },

    #[error("No translator registered for type '{0}' or any of its supertypes")]
    NoTranslatorForType(String),
}

/// Errors raised while draining the render queue.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No {0} available in the render environment")]
    MissingEnvironmental(&'static str),

    #[error("Unbalanced markup: {0}")]
    UnbalancedMarkup(String),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Command(#[from] anyhow::Error),
}

/// Errors surfaced by the action link dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid invocation: {0}")]
    InvalidInvocation(String),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    IllegalState(#[from] IllegalStateError),

    /// Raised by an application event handler; passed through untouched.
    #[error(transparent)]
    Handler(anyhow::Error),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Invalid value: {0}")]
    Validation(#[from] ValidationError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}
