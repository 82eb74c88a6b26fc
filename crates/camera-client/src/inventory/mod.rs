//! Preset inventory: ordered id to name mapping, its wire codec and grouping.

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

pub mod codec;
pub mod grouping;

pub use codec::PresetListCodec;
pub use grouping::{PresetGroup, PresetGroups, FALLBACK_GROUP, GROUP_DELIMITER};

/// Insertion-ordered mapping from preset id to display name.
///
/// Keys are unique. Iteration follows insertion order, which for a decoded
/// inventory is the order the camera reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetMap {
    entries: Vec<(String, String)>,
}

impl PresetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced entry keeps its original position.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) -> Option<String> {
        let id = id.into();
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some((_, existing)) => Some(std::mem::replace(existing, name)),
            None => {
                self.entries.push((id, name));
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, name)| name.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PresetMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, name) in iter {
            map.insert(id, name);
        }
        map
    }
}

impl Serialize for PresetMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, name) in &self.entries {
            map.serialize_entry(id, name)?;
        }
        map.end()
    }
}

/// One inventory fetch, stamped with when it was taken.
///
/// The camera's presets can change at any time through other control paths,
/// so a snapshot is stale as soon as it is returned.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PresetInventory {
    pub presets: PresetMap,
    pub fetched_at: DateTime<Utc>,
}

impl PresetInventory {
    pub fn new(presets: PresetMap) -> Self {
        Self {
            presets,
            fetched_at: Utc::now(),
        }
    }

    pub fn groups(&self) -> PresetGroups {
        PresetGroups::from_presets(&self.presets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let map: PresetMap = [("10", "Wide"), ("2", "Tele"), ("7", "Home")]
            .into_iter()
            .collect();

        assert_eq!(map.ids().collect::<Vec<_>>(), vec!["10", "2", "7"]);
        assert_eq!(map.get("2"), Some("Tele"));
        assert!(!map.contains("3"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = PresetMap::new();
        assert_eq!(map.insert("1", "a"), None);
        map.insert("2", "b");
        assert_eq!(map.insert("1", "c"), Some("a".to_string()));

        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("1", "c"), ("2", "b")]);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let map: PresetMap = [("3", "c"), ("1", "a")].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"3":"c","1":"a"}"#
        );
    }
}
