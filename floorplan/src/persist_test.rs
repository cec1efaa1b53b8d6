use super::*;
use crate::doc::Floor;

fn named(id: &str) -> Building {
    let mut b = Building::new_empty();
    b.building_id = id.into();
    b.name = format!("{id} mall");
    b
}

/// Storage that refuses every write, like a full browser quota.
struct FullStorage;

impl LocalStorage for FullStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), PersistError> {
        Err(PersistError::Storage("quota exceeded".into()))
    }

    fn remove(&mut self, _key: &str) {}
}

#[test]
fn cache_key_uses_prefix() {
    assert_eq!(cache_key("city-mall"), "intramap_building_city-mall");
}

#[test]
fn draft_round_trip() {
    let mut storage = MemoryStorage::new();
    assert!(load_draft(&storage).unwrap().is_none());

    let mut b = named("draft-one");
    b.floors.insert("floor_2".into(), Floor::new("Level 1"));
    save_draft(&mut storage, &b).unwrap();

    let restored = load_draft(&storage).unwrap().unwrap();
    assert_eq!(restored, b);
}

#[test]
fn corrupt_draft_is_a_validation_error() {
    let mut storage = MemoryStorage::new();
    storage.set(DRAFT_KEY, "{not json").unwrap();
    assert!(matches!(load_draft(&storage), Err(PersistError::Validation(_))));
}

#[test]
fn welcome_flag() {
    let mut storage = MemoryStorage::new();
    assert!(!welcome_dismissed(&storage));
    dismiss_welcome(&mut storage).unwrap();
    assert!(welcome_dismissed(&storage));
}

#[test]
fn query_selects_building() {
    assert_eq!(LoadTarget::from_query("?building=city-mall").unwrap(), LoadTarget::Remote("city-mall".into()));
    assert_eq!(LoadTarget::from_query("lang=en&building=City Mall").unwrap(), LoadTarget::Remote("city-mall".into()));
}

#[test]
fn sample_selects_demo() {
    assert_eq!(LoadTarget::from_query("?building=sample").unwrap(), LoadTarget::Demo);
    assert_eq!(LoadTarget::Demo.id(), "sample");
}

#[test]
fn missing_or_bad_query_is_invalid() {
    assert!(matches!(LoadTarget::from_query(""), Err(PersistError::InvalidId(_))));
    assert!(matches!(LoadTarget::from_query("?building="), Err(PersistError::InvalidId(_))));
    assert!(matches!(LoadTarget::from_query("?building=!!"), Err(PersistError::InvalidId(_))));
}

#[test]
fn viewer_url_is_sanitized() {
    assert_eq!(
        viewer_url("https://maps.example.com/", "City Mall"),
        "https://maps.example.com/viewer.html?building=city-mall"
    );
}

#[test]
fn remote_success_is_cached() {
    let mut storage = MemoryStorage::new();
    let (b, source) = resolve_load("city-mall", Ok(named("city-mall")), &mut storage).unwrap();
    assert_eq!(source, LoadSource::Remote);
    assert_eq!(b.building_id, "city-mall");
    assert_eq!(cached_building(&storage, "city-mall"), Some(b));
}

#[test]
fn remote_failure_falls_back_to_cache() {
    let mut storage = MemoryStorage::new();
    cache_building(&mut storage, "city-mall", &named("city-mall"));

    let (b, source) =
        resolve_load("city-mall", Err(PersistError::Transport("offline".into())), &mut storage).unwrap();
    assert_eq!(source, LoadSource::Cache);
    assert_eq!(b.name, "city-mall mall");
}

#[test]
fn cache_is_keyed_by_requested_id() {
    let mut storage = MemoryStorage::new();
    let (_, source) = resolve_load("city-mall", Ok(named("")), &mut storage).unwrap();
    assert_eq!(source, LoadSource::Remote);

    let (b, source) =
        resolve_load("city-mall", Err(PersistError::Transport("offline".into())), &mut storage).unwrap();
    assert_eq!(source, LoadSource::Cache);
    assert_eq!(b.name, " mall");
    assert!(storage.get(&cache_key("")).is_none());
}

#[test]
fn remote_failure_without_cache_keeps_error() {
    let mut storage = MemoryStorage::new();
    let err = resolve_load("city-mall", Err(PersistError::NotFound("city-mall".into())), &mut storage).unwrap_err();
    assert_eq!(err, PersistError::NotFound("city-mall".into()));
    assert_eq!(err.to_string(), "Building not found");
}

#[test]
fn failed_cache_write_does_not_fail_load() {
    let mut storage = FullStorage;
    let (_, source) = resolve_load("city-mall", Ok(named("city-mall")), &mut storage).unwrap();
    assert_eq!(source, LoadSource::Remote);
}

#[test]
fn unreadable_cache_entry_is_ignored() {
    let mut storage = MemoryStorage::new();
    storage.set(&cache_key("city-mall"), "[]").unwrap();
    assert!(cached_building(&storage, "city-mall").is_none());
}
