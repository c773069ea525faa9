//! CLI presentation: text and JSON formatting of command results.

use crate::error::CliError;
use crate::translator::TranslatorRegistry;
use crate::types::FieldValue;
use comfy_table::Table;

pub fn format_translation(
    translator: &str,
    value: &FieldValue,
    client: &str,
    format: &str,
) -> Result<String, CliError> {
    if format == "json" {
        let out = serde_json::json!({
            "translator": translator,
            "value": value,
            "client": client,
        });
        return Ok(serde_json::to_string_pretty(&out)?);
    }
    Ok(format!("{} ({})", client, translator))
}

pub fn format_validation(value: Option<&FieldValue>) -> String {
    match value {
        Some(value) => format!("valid: {}", value),
        None => "valid: (blank)".to_string(),
    }
}

/// One row per declared type: lineage and the translator lookup resolves to.
pub fn format_type_table(registry: &TranslatorRegistry, format: &str) -> Result<String, CliError> {
    let hierarchy = registry.hierarchy();
    let rows: Vec<(String, String, String)> = hierarchy
        .types()
        .into_iter()
        .map(|tag| {
            let lineage = hierarchy
                .lineage(tag)
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(" > ");
            let translator = registry
                .find(tag)
                .map(|t| t.name().to_string())
                .unwrap_or_else(|| "-".to_string());
            (tag.to_string(), lineage, translator)
        })
        .collect();

    if format == "json" {
        let arr: Vec<serde_json::Value> = rows
            .iter()
            .map(|(ty, lineage, translator)| {
                serde_json::json!({ "type": ty, "lineage": lineage, "translator": translator })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&arr)?);
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Type", "Lineage", "Translator"]);
    for (ty, lineage, translator) in &rows {
        table.add_row(vec![ty, lineage, translator]);
    }
    Ok(table.to_string())
}
