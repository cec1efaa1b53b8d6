//! Search across every floor of a building by label and tags.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use crate::doc::{Building, FloorId};

/// One matching object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub floor_id: FloorId,
    /// Index of the object within its floor.
    pub object_index: usize,
    /// Label, or `"Unnamed"` when empty.
    pub name: String,
    pub tags: String,
    pub floor_name: String,
}

/// Case-insensitive substring search over `objectLabel` and `objectTags`.
///
/// The query is trimmed first; an empty query matches nothing. Hits come back
/// in floor order, then object order within each floor.
#[must_use]
pub fn search(building: &Building, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for (floor_id, floor) in &building.floors {
        for (object_index, object) in floor.objects.iter().enumerate() {
            let matches = object.object_label.to_lowercase().contains(&needle)
                || object.object_tags.to_lowercase().contains(&needle);
            if matches {
                hits.push(SearchHit {
                    floor_id: floor_id.clone(),
                    object_index,
                    name: object.display_name().to_owned(),
                    tags: object.object_tags.clone(),
                    floor_name: floor.name.clone(),
                });
            }
        }
    }
    hits
}

/// Split a comma-separated tag string into trimmed, non-empty tags.
#[must_use]
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}
