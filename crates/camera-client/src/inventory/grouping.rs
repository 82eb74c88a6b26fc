use super::PresetMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Separates the group label from the child name in a preset name.
pub const GROUP_DELIMITER: char = '_';

/// Group for presets whose name carries no delimiter.
pub const FALLBACK_GROUP: &str = "others";

/// Presets sharing a name prefix, keyed by their original id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetGroup {
    pub label: String,
    pub presets: PresetMap,
}

/// Groups in the order their label was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetGroups {
    groups: Vec<PresetGroup>,
}

impl PresetGroups {
    /// Partition presets by the text before the first `_` in their name.
    ///
    /// `"2_Wide"` lands in group `"2"` as `"Wide"`; a name without `_` lands
    /// unchanged in [`FALLBACK_GROUP`]. The fallback group sits wherever its
    /// first member appears, like any other group.
    pub fn from_presets(presets: &PresetMap) -> Self {
        let mut grouped = Self::default();

        for (id, name) in presets.iter() {
            let (label, child_name) = name
                .split_once(GROUP_DELIMITER)
                .unwrap_or((FALLBACK_GROUP, name));
            grouped.group_mut(label).presets.insert(id, child_name);
        }

        grouped
    }

    fn group_mut(&mut self, label: &str) -> &mut PresetGroup {
        let index = match self.groups.iter().position(|group| group.label == label) {
            Some(index) => index,
            None => {
                self.groups.push(PresetGroup {
                    label: label.to_string(),
                    presets: PresetMap::new(),
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    pub fn get(&self, label: &str) -> Option<&PresetGroup> {
        self.groups.iter().find(|group| group.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresetGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a PresetGroups {
    type Item = &'a PresetGroup;
    type IntoIter = std::slice::Iter<'a, PresetGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl Serialize for PresetGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.label, &group.presets)?;
        }
        map.end()
    }
}
