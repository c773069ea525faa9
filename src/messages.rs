//! Localized Messages
//!
//! Locale-scoped message sets backed by immutable key/value maps, plus a
//! catalog that resolves a locale to a chain of sets (`fr_CA` -> `fr` -> default).

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-only view of localized messages for one locale.
pub trait Messages: Send + Sync {
    /// Locale these messages were resolved for
    fn locale(&self) -> &str;

    /// Raw lookup. `None` tells the caller to use its fallback key.
    fn value_for_key(&self, key: &str) -> Option<&str>;

    fn contains(&self, key: &str) -> bool {
        self.value_for_key(key).is_some()
    }

    /// Lookup that never fails; missing keys render as a visible marker.
    fn get(&self, key: &str) -> String {
        match self.value_for_key(key) {
            Some(value) => value.to_string(),
            None => format!("[[missing key: {}]]", key),
        }
    }

    /// Lookup then substitute positional `{0}`, `{1}`, ... placeholders.
    fn format(&self, key: &str, args: &[&str]) -> String {
        substitute(&self.get(key), args)
    }
}

/// Message set over a shared map. The map is retained, never copied.
#[derive(Debug, Clone)]
pub struct MapMessages {
    locale: String,
    properties: Arc<HashMap<String, String>>,
}

impl MapMessages {
    pub fn new(locale: impl Into<String>, properties: impl Into<Arc<HashMap<String, String>>>) -> Self {
        Self {
            locale: locale.into(),
            properties: properties.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

impl Messages for MapMessages {
    fn locale(&self) -> &str {
        &self.locale
    }

    fn value_for_key(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Messages for a requested locale, searching each set of the fallback chain in order.
#[derive(Debug, Clone)]
pub struct LocalizedMessages {
    locale: String,
    chain: Vec<Arc<MapMessages>>,
}

impl LocalizedMessages {
    /// Locales actually consulted, most specific first
    pub fn chain(&self) -> Vec<&str> {
        self.chain.iter().map(|m| m.locale()).collect()
    }
}

impl Messages for LocalizedMessages {
    fn locale(&self) -> &str {
        &self.locale
    }

    fn value_for_key(&self, key: &str) -> Option<&str> {
        self.chain.iter().find_map(|set| set.value_for_key(key))
    }
}

/// One message set per locale.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    default_locale: String,
    sets: HashMap<String, Arc<MapMessages>>,
    /// Consulted last for every locale
    root: Option<Arc<MapMessages>>,
}

impl MessageCatalog {
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            sets: HashMap::new(),
            root: None,
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Register (or replace) the set for its locale.
    pub fn insert(&mut self, messages: MapMessages) {
        self.sets
            .insert(messages.locale().to_string(), Arc::new(messages));
    }

    /// Locale-independent set searched after the whole fallback chain.
    pub fn set_root(&mut self, messages: MapMessages) {
        self.root = Some(Arc::new(messages));
    }

    /// Parse a TOML table of messages. Nested tables are flattened with dots.
    pub fn insert_toml(&mut self, locale: &str, text: &str) -> Result<(), ConfigError> {
        self.insert_toml_from(locale, text, &format!("<{} messages>", locale))
    }

    fn insert_toml_from(&mut self, locale: &str, text: &str, origin: &str) -> Result<(), ConfigError> {
        let table: toml::Table = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        let mut properties = HashMap::new();
        flatten_table("", &table, &mut properties);
        debug!(locale, keys = properties.len(), "Loaded message catalog");
        self.insert(MapMessages::new(locale, properties));
        Ok(())
    }

    /// Load every `<locale>.toml` file in `dir`.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ConfigError> {
        let mut loaded = 0;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "Skipping message file with non UTF-8 name");
                continue;
            };
            let text = std::fs::read_to_string(&path)?;
            self.insert_toml_from(locale, &text, &path.display().to_string())?;
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// Resolve messages for `locale`, falling back through language and default locale.
    pub fn for_locale(&self, locale: &str) -> LocalizedMessages {
        let mut chain: Vec<Arc<MapMessages>> = Vec::new();
        for candidate in fallback_locales(locale, &self.default_locale) {
            if let Some(set) = self.sets.get(&candidate) {
                if !chain.iter().any(|c| Arc::ptr_eq(c, set)) {
                    chain.push(set.clone());
                }
            }
        }
        if let Some(root) = &self.root {
            if !chain.iter().any(|c| Arc::ptr_eq(c, root)) {
                chain.push(root.clone());
            }
        }
        LocalizedMessages {
            locale: locale.to_string(),
            chain,
        }
    }
}

/// English defaults for the framework's translator and validator message keys.
/// Placeholder `{0}` is the field label; `{1}` and up are constraint values.
pub fn validation_defaults() -> MapMessages {
    let pairs = [
        ("required", "You must provide a value for {0}."),
        ("minlength", "You must provide at least {1} characters for {0}."),
        ("maxlength", "You may provide at most {1} characters for {0}."),
        ("min", "{0} requires a value of at least {1}."),
        ("max", "{0} requires a value no larger than {1}."),
        ("regexp", "{0} does not match pattern '{1}'."),
        ("integer-format-exception", "You must provide an integer value for {0}."),
        ("integer-range-exception", "{0} must be between {1} and {2}."),
        ("number-format-exception", "You must provide a numeric value for {0}."),
        ("boolean-format-exception", "You must provide true or false for {0}."),
    ];
    let properties: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    MapMessages::new("en", properties)
}

/// `fr_CA_x` -> [`fr_CA_x`, `fr_CA`, `fr`, default]
fn fallback_locales(locale: &str, default_locale: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = locale.to_string();
    while !current.is_empty() {
        out.push(current.clone());
        match current.rfind('_') {
            Some(idx) => current.truncate(idx),
            None => break,
        }
    }
    if !out.iter().any(|l| l == default_locale) {
        out.push(default_locale.to_string());
    }
    out
}

fn flatten_table(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::Table(nested) => flatten_table(&full, nested, out),
            toml::Value::String(s) => {
                out.insert(full, s.clone());
            }
            other => {
                out.insert(full, other.to_string());
            }
        }
    }
}

/// Replace `{N}` with `args[N]`; out-of-range or malformed placeholders are kept verbatim.
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            args.get(index).map(|arg| (arg, close))
        });
        match replaced {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
