//! Configuration System
//!
//! Layered configuration: built-in defaults, then the global config file, then the
//! workspace `pagewire.toml`, then `PAGEWIRE_*` environment variables.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::messages::{validation_defaults, MessageCatalog};
use crate::translator::{LookupPolicy, TranslatorRegistry};
use crate::types::TypeHierarchy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

mod merge {
    pub(super) mod merge_policy;
}

mod sources {
    pub(super) mod global_file;
    pub(super) mod workspace_file;
}

pub use sources::global_file::global_config_path;
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagewireConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub translators: TranslatorConfig,

    #[serde(default)]
    pub messages: MessagesConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Translator lookup settings and application type declarations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub lookup: LookupPolicy,

    /// Extra types layered onto the built-in hierarchy
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub supertypes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Directory of `<locale>.toml` message files, relative to the workspace root
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            catalog_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

fn default_id_prefix() -> String {
    "pw-".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
        }
    }
}

impl PagewireConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.messages.default_locale.trim().is_empty() {
            errors.push("messages.default_locale cannot be empty".to_string());
        }
        if self
            .session
            .id_prefix
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        {
            errors.push(format!(
                "session.id_prefix '{}' may only contain ASCII letters, digits, '-' and '_'",
                self.session.id_prefix
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for decl in &self.translators.types {
            if decl.name.trim().is_empty() {
                errors.push("translators.types entry has an empty name".to_string());
            } else if !seen.insert(decl.name.as_str()) {
                errors.push(format!("Type '{}' is declared more than once", decl.name));
            }
            if decl.supertypes.iter().any(|s| s == &decl.name) {
                errors.push(format!("Type '{}' cannot be its own supertype", decl.name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }

    /// Built-in hierarchy plus the configured type declarations.
    pub fn type_hierarchy(&self) -> TypeHierarchy {
        let mut hierarchy = TypeHierarchy::builtin();
        for decl in &self.translators.types {
            let supertypes: Vec<&str> = decl.supertypes.iter().map(String::as_str).collect();
            hierarchy.declare(&decl.name, &supertypes);
        }
        hierarchy
    }

    /// Registry of the built-in translators under the configured lookup policy.
    pub fn translator_registry(&self) -> Result<TranslatorRegistry, ConfigError> {
        TranslatorRegistry::with_builtins(self.type_hierarchy(), self.translators.lookup)
    }

    /// Catalog files found under `workspace_root`, backed for every locale by
    /// the built-in validation messages.
    pub fn message_catalog(&self, workspace_root: &Path) -> Result<MessageCatalog, ConfigError> {
        let mut catalog = MessageCatalog::new(&self.messages.default_locale);
        catalog.set_root(validation_defaults());
        if let Some(dir) = &self.messages.catalog_dir {
            let dir = workspace_root.join(dir);
            let loaded = catalog.load_dir(&dir)?;
            debug!(dir = %dir.display(), loaded, "Loaded message catalog directory");
        }
        Ok(catalog)
    }
}

/// Loads [`PagewireConfig`] from its layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, `<workspace_root>/pagewire.toml`, then environment.
    pub fn load(workspace_root: &Path) -> Result<PagewireConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(
            config::Environment::with_prefix("PAGEWIRE")
                .separator("__")
                .try_parsing(true),
        );
        let config: PagewireConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with a single explicit file. Environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<PagewireConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Invalid(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let builder = merge::merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path.to_path_buf()).required(true))
            .add_source(
                config::Environment::with_prefix("PAGEWIRE")
                    .separator("__")
                    .try_parsing(true),
            );
        let config: PagewireConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
