//! CLI route: single route table and run context.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_translation, format_type_table, format_validation};
use crate::config::{ConfigLoader, PagewireConfig};
use crate::error::CliError;
use crate::messages::{MessageCatalog, Messages};
use crate::translator::TranslatorRegistry;
use crate::types::{Field, TypeTag};
use crate::validator::{process_input, FieldValidatorSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Runtime context for CLI execution: loaded config plus the services it configures.
pub struct RunContext {
    config: PagewireConfig,
    registry: TranslatorRegistry,
    catalog: MessageCatalog,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, CliError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        let registry = config.translator_registry()?;
        let catalog = config.message_catalog(&workspace_root)?;
        info!(
            workspace = %workspace_root.display(),
            locales = ?catalog.locales(),
            "Run context ready"
        );
        Ok(Self {
            config,
            registry,
            catalog,
        })
    }

    pub fn config(&self) -> &PagewireConfig {
        &self.config
    }

    pub fn registry(&self) -> &TranslatorRegistry {
        &self.registry
    }

    fn locale<'a>(&'a self, requested: &'a Option<String>) -> &'a str {
        requested
            .as_deref()
            .unwrap_or(&self.config.messages.default_locale)
    }

    /// Execute a command and return its printable output.
    pub fn execute(&self, command: &Commands) -> Result<String, CliError> {
        match command {
            Commands::Message { key, args, locale } => {
                let messages = self.catalog.for_locale(self.locale(locale));
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                Ok(messages.format(key, &args))
            }
            Commands::Translate {
                value_type,
                label,
                format,
                locale,
                value,
            } => {
                let tag = TypeTag::new(value_type.as_str());
                let translator = self.registry.get_by_type(&tag)?;
                let messages = self.catalog.for_locale(self.locale(locale));
                let field = Field::new(label.as_str(), tag);
                let parsed = translator.parse_client(&field, value, &messages)?;
                debug!(translator = translator.name(), value = %parsed, "Translated client value");
                format_translation(translator.name(), &parsed, &translator.to_client(&parsed), format)
            }
            Commands::Validate {
                value_type,
                id,
                label,
                spec,
                locale,
                value,
            } => {
                let tag = TypeTag::new(value_type.as_str());
                let translator = self.registry.get_by_type(&tag)?;
                let messages = Arc::new(self.catalog.for_locale(self.locale(locale)));
                let validator =
                    FieldValidatorSource::new(messages.clone()).create_validators(id, label, spec)?;
                let field = Field::new(label.as_str(), tag);
                let result =
                    process_input(&field, value, translator.as_ref(), &validator, &*messages)?;
                Ok(format_validation(result.as_ref()))
            }
            Commands::Types { format } => format_type_table(&self.registry, format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use tempfile::TempDir;

    fn context() -> (TempDir, RunContext) {
        let temp = TempDir::new().unwrap();
        let ctx = RunContext::new(temp.path().to_path_buf(), None).unwrap();
        (temp, ctx)
    }

    #[test]
    fn test_message_command() {
        let (_temp, ctx) = context();
        let out = ctx
            .execute(&Commands::Message {
                key: "minlength".into(),
                args: vec!["Name".into(), "3".into()],
                locale: None,
            })
            .unwrap();
        assert_eq!(out, "You must provide at least 3 characters for Name.");
    }

    #[test]
    fn test_translate_command_reports_range_failure() {
        let (_temp, ctx) = context();
        let err = ctx
            .execute(&Commands::Translate {
                value_type: "u8".into(),
                label: "Age".into(),
                format: "text".into(),
                locale: None,
                value: "300".into(),
            })
            .unwrap_err();
        assert!(matches!(err, CliError::Validation(ValidationError { .. })));
        assert_eq!(err.to_string(), "Invalid value: Age must be between 0 and 255.");
    }

    #[test]
    fn test_validate_command() {
        let (_temp, ctx) = context();
        let validate = |value: &str| {
            ctx.execute(&Commands::Validate {
                value_type: "string".into(),
                id: "name".into(),
                label: "Name".into(),
                spec: "required,minlength=3".into(),
                locale: None,
                value: value.into(),
            })
        };
        assert_eq!(validate("Ada").unwrap(), "valid: Ada");
        assert_eq!(
            validate("").unwrap_err().to_string(),
            "Invalid value: You must provide a value for Name."
        );
        assert_eq!(
            validate("Al").unwrap_err().to_string(),
            "Invalid value: You must provide at least 3 characters for Name."
        );
    }

    #[test]
    fn test_workspace_config_is_applied() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("pagewire.toml"),
            "[translators]\nlookup = \"exact\"\n",
        )
        .unwrap();
        let ctx = RunContext::new(temp.path().to_path_buf(), None).unwrap();
        let err = ctx
            .execute(&Commands::Translate {
                value_type: "i32".into(),
                label: "n".into(),
                format: "text".into(),
                locale: None,
                value: "1".into(),
            })
            .unwrap_err();
        assert!(matches!(err, CliError::Lookup(_)));
    }

    #[test]
    fn test_translate_command_uses_requested_locale() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("i18n")).unwrap();
        std::fs::write(
            temp.path().join("pagewire.toml"),
            "[messages]\ncatalog_dir = \"i18n\"\n",
        )
        .unwrap();
        std::fs::write(
            temp.path().join("i18n").join("fr.toml"),
            "integer-format-exception = \"{0} doit etre un entier.\"\n",
        )
        .unwrap();
        let ctx = RunContext::new(temp.path().to_path_buf(), None).unwrap();
        let translate = |locale: Option<&str>| {
            ctx.execute(&Commands::Translate {
                value_type: "i32".into(),
                label: "Age".into(),
                format: "text".into(),
                locale: locale.map(str::to_string),
                value: "abc".into(),
            })
            .unwrap_err()
            .to_string()
        };
        assert_eq!(translate(Some("fr")), "Invalid value: Age doit etre un entier.");
        assert_eq!(
            translate(None),
            "Invalid value: You must provide an integer value for Age."
        );
    }
}
