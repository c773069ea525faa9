//! Translator registry caching across invalidation events.

use pagewire::invalidation::{InvalidationEventHub, InvalidationListener};
use pagewire::translator::{LookupPolicy, TranslatorRegistry};
use pagewire::types::{TypeHierarchy, TypeTag};
use std::sync::Arc;

fn hierarchy() -> TypeHierarchy {
    let mut hierarchy = TypeHierarchy::builtin();
    hierarchy.declare("percent", &["u8"]);
    hierarchy.declare("tagged", &["object", "string"]);
    hierarchy
}

#[test]
fn test_subtype_lookup_walks_lineage_in_declaration_order() {
    let registry = TranslatorRegistry::with_builtins(hierarchy(), LookupPolicy::Hierarchy).unwrap();
    assert_eq!(registry.get_by_type(&TypeTag::from("percent")).unwrap().name(), "integer");
    // object has no translator, so the breadth-first walk reaches string
    assert_eq!(registry.get_by_type(&TypeTag::from("tagged")).unwrap().name(), "string");
    assert!(registry.get_by_type(&TypeTag::from("object")).is_err());
}

#[test]
fn test_hub_invalidation_clears_every_registered_cache() {
    let hub = InvalidationEventHub::new();
    let first = Arc::new(TranslatorRegistry::with_builtins(hierarchy(), LookupPolicy::Hierarchy).unwrap());
    let second = Arc::new(TranslatorRegistry::with_builtins(hierarchy(), LookupPolicy::Exact).unwrap());
    hub.add_listener(first.clone() as Arc<dyn InvalidationListener>);
    hub.add_listener(second.clone() as Arc<dyn InvalidationListener>);

    for _ in 0..3 {
        first.find(&TypeTag::from("i64"));
        second.find(&TypeTag::from("i64"));
    }
    assert_eq!(first.cache_stats().misses, 1);
    assert_eq!(first.cache_stats().hits, 2);
    assert!(first.find(&TypeTag::from("i64")).is_some());
    assert!(second.find(&TypeTag::from("i64")).is_none());

    hub.fire_invalidation_event();
    assert_eq!(first.cache_stats().entries, 0);
    assert_eq!(second.cache_stats().entries, 0);

    let before = first.cache_stats().misses;
    let again = first.find(&TypeTag::from("i64")).unwrap();
    assert_eq!(first.cache_stats().misses, before + 1);
    assert_eq!(again.name(), "integer");
    assert_eq!(first.names(), vec!["boolean", "float", "integer", "string"]);
}

#[test]
fn test_concurrent_lookups_race_invalidation() {
    let hub = InvalidationEventHub::new();
    let registry = Arc::new(TranslatorRegistry::with_builtins(hierarchy(), LookupPolicy::Hierarchy).unwrap());
    hub.add_listener(registry.clone() as Arc<dyn InvalidationListener>);

    let expected: Vec<(TypeTag, Option<&str>)> = vec![
        (TypeTag::from("percent"), Some("integer")),
        (TypeTag::from("f32"), Some("float")),
        (TypeTag::from("bool"), Some("boolean")),
        (TypeTag::from("tagged"), Some("string")),
        (TypeTag::from("object"), None),
    ];

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let registry = &registry;
            let expected = &expected;
            scope.spawn(move || {
                for round in 0..500 {
                    let (tag, name) = &expected[(worker + round) % expected.len()];
                    let found = registry.find(tag);
                    assert_eq!(found.as_ref().map(|t| t.name()), *name, "lookup of {}", tag);
                }
            });
        }
        let hub = &hub;
        scope.spawn(move || {
            for _ in 0..200 {
                hub.fire_invalidation_event();
                std::thread::yield_now();
            }
        });
    });

    let stats = registry.cache_stats();
    assert_eq!(stats.hits + stats.misses, 2000);
    assert!(stats.misses >= expected.len() as u64);
    for (tag, name) in &expected {
        assert_eq!(registry.find(tag).as_ref().map(|t| t.name()), *name);
    }
}
