use std::collections::HashSet;

use super::*;

#[test]
fn builtin_has_thirteen_unique_icons() {
    let catalog = IconCatalog::builtin();
    assert_eq!(catalog.len(), 13);
    let ids: HashSet<_> = catalog.iter().map(|spec| spec.id).collect();
    assert_eq!(ids.len(), 13);
}

#[test]
fn every_glyph_uses_current_color() {
    for spec in IconCatalog::builtin().iter() {
        assert!(spec.svg.contains(CURRENT_COLOR), "{} has no color marker", spec.id);
        assert!(spec.color.starts_with('#') && spec.color.len() == 7, "{}", spec.id);
    }
}

#[test]
fn metadata_matches_catalog() {
    let catalog = IconCatalog::builtin();
    let atm = catalog.get("atm").unwrap();
    assert_eq!(atm.label, "ATM");
    assert_eq!(atm.category, "service");
    assert_eq!(atm.color, "#F59E0B");

    let restroom = catalog.get("restroom").unwrap();
    assert_eq!(restroom.color, "#10B981");
    assert_eq!(catalog.get("help").unwrap().label, "Help Desk");
    assert_eq!(catalog.get("exit").unwrap().color, "#DC2626");
}

#[test]
fn unknown_icon_is_absent() {
    let catalog = IconCatalog::default();
    assert!(catalog.get("fountain").is_none());
    assert!(!catalog.contains("fountain"));
    assert!(catalog.contains("cafe"));
}

#[test]
fn custom_catalog() {
    let catalog = IconCatalog::new(vec![IconSpec {
        id: "dot",
        label: "Dot",
        category: "test",
        color: "#000000",
        svg: "<svg/>",
    }]);
    assert_eq!(catalog.len(), 1);
    assert!(!catalog.is_empty());
    assert!(catalog.contains("dot"));
    assert!(!catalog.contains("cafe"));
}
