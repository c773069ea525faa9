//! Translator Registry
//!
//! Maps a value's runtime type to a translator that converts between the
//! client (string) representation and a typed [`FieldValue`]. Lookups walk the
//! type hierarchy and are cached per exact type; an invalidation notification
//! clears the cache while leaving the configured translators in place.

use crate::error::{ConfigError, LookupError, ValidationError};
use crate::invalidation::InvalidationListener;
use crate::messages::Messages;
use crate::types::{Field, FieldValue, TypeHierarchy, TypeTag};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

mod builtin;

pub use builtin::{BooleanTranslator, FloatTranslator, IntegerTranslator, StringTranslator};

/// Two-way conversion between client strings and typed field values.
pub trait Translator: Send + Sync {
    /// Unique name, used when a field names its translator explicitly
    fn name(&self) -> &str;

    /// Type this translator is registered under
    fn value_type(&self) -> TypeTag;

    /// Message key for the parse-failure message
    fn message_key(&self) -> &str;

    fn to_client(&self, value: &FieldValue) -> String;

    /// Parse `client_value` for `field`; failure messages come from `messages`.
    fn parse_client(
        &self,
        field: &Field,
        client_value: &str,
        messages: &dyn Messages,
    ) -> Result<FieldValue, ValidationError>;
}

/// Whether `find` may fall back to supertypes of the requested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupPolicy {
    /// Only a translator registered for the exact type matches
    Exact,
    /// Exact type first, then supertypes breadth first in declaration order
    #[default]
    Hierarchy,
}

/// Cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct TranslatorRegistry {
    by_type: HashMap<TypeTag, Arc<dyn Translator>>,
    by_name: BTreeMap<String, Arc<dyn Translator>>,
    hierarchy: TypeHierarchy,
    policy: LookupPolicy,
    cache: RwLock<HashMap<TypeTag, Option<Arc<dyn Translator>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TranslatorRegistry {
    /// Build a registry from its configuration. Duplicate names or types are rejected.
    pub fn new(
        translators: Vec<Arc<dyn Translator>>,
        hierarchy: TypeHierarchy,
        policy: LookupPolicy,
    ) -> Result<Self, ConfigError> {
        let mut by_type = HashMap::new();
        let mut by_name = BTreeMap::new();
        for translator in translators {
            let name = translator.name().to_string();
            if by_name.insert(name.clone(), translator.clone()).is_some() {
                return Err(ConfigError::Invalid(format!(
                    "Duplicate translator name '{}'",
                    name
                )));
            }
            if let Some(existing) = by_type.insert(translator.value_type(), translator.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "Translators '{}' and '{}' are both registered for type '{}'",
                    existing.name(),
                    name,
                    translator.value_type()
                )));
            }
        }
        info!(translators = by_name.len(), ?policy, "Translator registry configured");
        Ok(Self {
            by_type,
            by_name,
            hierarchy,
            policy,
            cache: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    /// Registry with the built-in string, integer, float, and boolean translators.
    pub fn with_builtins(hierarchy: TypeHierarchy, policy: LookupPolicy) -> Result<Self, ConfigError> {
        Self::new(builtin::all(), hierarchy, policy)
    }

    pub fn policy(&self) -> LookupPolicy {
        self.policy
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    /// Most specific translator for `value_type`, if any.
    pub fn find(&self, value_type: &TypeTag) -> Option<Arc<dyn Translator>> {
        if let Some(cached) = self.cache.read().get(value_type) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached.clone();
        }

        // Computed outside the lock; a concurrent invalidation only costs a recompute.
        self.misses.fetch_add(1, Ordering::Relaxed);
        let resolved = self.resolve(value_type);
        debug!(
            value_type = %value_type,
            translator = resolved.as_ref().map(|t| t.name()).unwrap_or("<none>"),
            "Resolved translator"
        );
        self.cache
            .write()
            .insert(value_type.clone(), resolved.clone());
        resolved
    }

    /// Like [`find`](Self::find), but a missing translator is an error.
    pub fn get_by_type(&self, value_type: &TypeTag) -> Result<Arc<dyn Translator>, LookupError> {
        self.find(value_type)
            .ok_or_else(|| LookupError::NoTranslatorForType(value_type.to_string()))
    }

    /// Translator by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Translator>, LookupError> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::UnknownTranslator {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Registered translator names, sorted
    pub fn names(&self) -> Vec<String> {
        self.by_name.keys().cloned().collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.read().len(),
        }
    }

    /// Clear the resolution cache. Configuration is untouched.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.write();
        debug!(entries = cache.len(), "Clearing translator cache");
        cache.clear();
    }

    fn resolve(&self, value_type: &TypeTag) -> Option<Arc<dyn Translator>> {
        match self.policy {
            LookupPolicy::Exact => self.by_type.get(value_type).cloned(),
            LookupPolicy::Hierarchy => self
                .hierarchy
                .lineage(value_type)
                .iter()
                .find_map(|tag| self.by_type.get(tag).cloned()),
        }
    }
}

impl InvalidationListener for TranslatorRegistry {
    fn object_was_invalidated(&self) {
        self.clear_cache();
    }
}

impl std::fmt::Debug for TranslatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorRegistry")
            .field("translators", &self.names())
            .field("policy", &self.policy)
            .field("cache", &self.cache_stats())
            .finish()
    }
}
