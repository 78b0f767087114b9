use hbnb_types::{EntityId, Error};
use std::collections::HashSet;
use std::str::FromStr;

#[test]
fn entity_id_new_is_unique() {
    let a = EntityId::new();
    let b = EntityId::new();
    assert_ne!(a, b);
}

#[test]
fn entity_id_new_is_hyphenated_uuid() {
    let id = EntityId::new();
    let parsed = uuid::Uuid::parse_str(id.as_str()).unwrap();
    assert_eq!(parsed.get_version_num(), 4);
    assert_eq!(id.as_str().len(), 36);
    assert_eq!(id.as_str(), id.as_str().to_lowercase());
}

#[test]
fn thousand_ids_are_distinct() {
    let ids: HashSet<EntityId> = (0..1000).map(|_| EntityId::new()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn from_string_keeps_text_verbatim() {
    let id = EntityId::from_string("123");
    assert_eq!(id.as_str(), "123");
    assert_eq!(id.to_string(), "123");
}

#[test]
fn parse_rejects_empty() {
    assert_eq!(EntityId::parse(""), Err(Error::EmptyId));
    assert!(EntityId::from_str("").is_err());
}

#[test]
fn parse_accepts_non_uuid_text() {
    let id: EntityId = "legacy-id".parse().unwrap();
    assert_eq!(id.as_str(), "legacy-id");
}

#[test]
fn into_string_returns_text() {
    let id = EntityId::from("abc");
    assert_eq!(id.into_string(), "abc");
}

#[test]
fn default_is_fresh() {
    assert_ne!(EntityId::default(), EntityId::default());
}

#[test]
fn serde_is_transparent() {
    let id = EntityId::from("abc-123");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, r#""abc-123""#);
    let back: EntityId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn usable_as_hash_key() {
    let mut set = HashSet::new();
    let id = EntityId::new();
    set.insert(id.clone());
    set.insert(id.clone());
    assert_eq!(set.len(), 1);
}
