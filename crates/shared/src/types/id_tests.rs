use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_creation() {
    let id = AssetId::new();
    assert!(!id.to_string().is_empty());
}

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = BaseId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_from_u128_is_stable() {
    assert_eq!(BaseId::from_u128(7), BaseId::from_u128(7));
    assert_ne!(BaseId::from_u128(7), BaseId::from_u128(8));
}

#[test]
fn test_typed_id_ordering_follows_uuid() {
    let low = AssetId::from_u128(1);
    let high = AssetId::from_u128(2);
    assert!(low < high);
}

#[test]
fn test_typed_id_display() {
    let uuid = Uuid::new_v4();
    let id = ActorId::from_uuid(uuid);
    assert_eq!(format!("{id}"), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = AssetId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(BaseId::from_str("invalid").is_err());
}
