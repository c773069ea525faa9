//! Integration tests for layered configuration loading

use pagewire::config::{ConfigLoader, WORKSPACE_CONFIG_FILE};
use pagewire::messages::Messages;
use pagewire::translator::LookupPolicy;
use pagewire::types::{FieldValue, TypeTag};
use pagewire::validator::{process_input, FieldValidatorSource};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_workspace_config_drives_services() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("i18n")).unwrap();
    std::fs::write(
        temp_dir.path().join(WORKSPACE_CONFIG_FILE),
        r#"
[translators]
lookup = "hierarchy"

[[translators.types]]
name = "quantity"
supertypes = ["u16"]

[messages]
default_locale = "en"
catalog_dir = "i18n"

[session]
id_prefix = "shop-"
"#,
    )
    .unwrap();
    std::fs::write(
        temp_dir.path().join("i18n").join("fr.toml"),
        r#"
max = "{0} ne doit pas depasser {1}."

[qty]
max-message = "Trop d'articles."
"#,
    )
    .unwrap();

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.translators.lookup, LookupPolicy::Hierarchy);
    assert_eq!(config.session.id_prefix, "shop-");

    let registry = config.translator_registry().unwrap();
    let translator = registry.get_by_type(&TypeTag::from("quantity")).unwrap();
    assert_eq!(translator.name(), "integer");

    let catalog = config.message_catalog(temp_dir.path()).unwrap();
    let french = Arc::new(catalog.for_locale("fr_FR"));
    assert_eq!(french.get("qty.max-message"), "Trop d'articles.");
    // keys missing from fr fall back to the default locale
    assert_eq!(french.format("required", &["Nom"]), "You must provide a value for Nom.");

    let validators = FieldValidatorSource::new(french.clone())
        .create_validators("qty", "Quantite", "required,max=10")
        .unwrap();
    let field = pagewire::types::Field::new("Quantite", "quantity");
    let err = process_input(&field, "11", translator.as_ref(), &validators, &*french).unwrap_err();
    assert_eq!(err.message, "Quantite ne doit pas depasser 10.");
    assert_eq!(
        process_input(&field, "4", translator.as_ref(), &validators, &*french).unwrap(),
        Some(FieldValue::Integer(4))
    );
}

#[test]
fn test_invalid_workspace_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(WORKSPACE_CONFIG_FILE),
        "[session]\nid_prefix = \"has space\"\n",
    )
    .unwrap();
    assert!(ConfigLoader::load(temp_dir.path()).is_err());
}

#[test]
fn test_unknown_lookup_policy_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("custom.toml");
    std::fs::write(&file, "[translators]\nlookup = \"fuzzy\"\n").unwrap();
    assert!(ConfigLoader::load_from_file(&file).is_err());
}
