//! Merge rules: defaults applied before any file or environment source.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("translators.lookup", "hierarchy")?
        .set_default("messages.default_locale", "en")?
        .set_default("session.id_prefix", "pw-")
}
