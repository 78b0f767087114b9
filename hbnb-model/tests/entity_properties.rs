//! Property tests for the dictionary contract.
//!
//! - Rebuilding from `to_dict` preserves id, timestamps and attributes.
//! - Fresh entities never share an id or a registry key.

use hbnb_model::{Attributes, Entity, KindRegistry, RESERVED_KEYS};
use proptest::prelude::*;
use serde_json::Value;
use std::collections::HashSet;

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-4000i32..4000).prop_map(|n| Value::from(f64::from(n) / 4.0)),
        "[a-zA-Z0-9 _-]{0,20}".prop_map(Value::from),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn attributes_strategy() -> impl Strategy<Value = Attributes> {
    prop::collection::btree_map("[a-z][a-z_]{0,10}", value_strategy(), 0..8).prop_map(|m| {
        m.into_iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
            .collect()
    })
}

proptest! {
    #[test]
    fn dict_roundtrip_preserves_entity(attrs in attributes_strategy()) {
        let mut original = Entity::new("Widget");
        for (k, v) in attrs {
            original.set_attribute(k, v).unwrap();
        }

        let rebuilt = Entity::from_dict("Widget", original.to_dict()).unwrap();
        prop_assert_eq!(rebuilt.id(), original.id());
        prop_assert_eq!(rebuilt.created_at(), original.created_at());
        prop_assert_eq!(rebuilt.updated_at(), original.updated_at());
        prop_assert_eq!(rebuilt.attributes(), original.attributes());
    }

    #[test]
    fn dict_roundtrip_through_json_text(attrs in attributes_strategy()) {
        let mut original = Entity::new("Widget");
        for (k, v) in attrs {
            original.set_attribute(k, v).unwrap();
        }
        original.touch();

        let text = serde_json::to_string(&original.to_dict()).unwrap();
        let parsed: Attributes = serde_json::from_str(&text).unwrap();
        let registry = {
            let mut r = KindRegistry::new();
            r.register_plain("Widget").unwrap();
            r
        };
        let rebuilt = registry.reconstruct("Widget", parsed).unwrap();
        prop_assert_eq!(rebuilt.to_dict(), original.to_dict());
    }

    #[test]
    fn fresh_entities_are_unique(n in 1usize..200) {
        let entities: Vec<Entity> = (0..n).map(|_| Entity::new("Widget")).collect();
        let ids: HashSet<_> = entities.iter().map(|e| e.id().clone()).collect();
        let keys: HashSet<_> = entities.iter().map(Entity::key).collect();
        prop_assert_eq!(ids.len(), n);
        prop_assert_eq!(keys.len(), n);
    }
}
