//! Property-based tests for the preset inventory codec and grouping.

use camera_client::inventory::{FALLBACK_GROUP, GROUP_DELIMITER};
use camera_client::{PresetGroups, PresetListCodec, PresetMap};
use proptest::prelude::*;

/// Ordered presets with unique ids; fields never contain `,`, `&` or `=`.
fn wire_safe_presets() -> impl Strategy<Value = PresetMap> {
    prop::collection::vec(("[^,&=]{0,8}", "[^,&=]{0,12}"), 0..20).prop_map(unique_ids)
}

/// Names drawn from a small alphabet so labels repeat and `_` is common.
fn grouped_presets() -> impl Strategy<Value = PresetMap> {
    prop::collection::vec(("[0-9]{1,3}", "[a-c]{0,2}(_[a-c_]{0,4})?"), 0..24).prop_map(unique_ids)
}

fn unique_ids(entries: Vec<(String, String)>) -> PresetMap {
    let mut presets = PresetMap::new();
    for (id, name) in entries {
        if !presets.contains(&id) {
            presets.insert(id, name);
        }
    }
    presets
}

fn label_of(name: &str) -> (&str, &str) {
    name.split_once(GROUP_DELIMITER)
        .unwrap_or((FALLBACK_GROUP, name))
}

proptest! {
    /// Encoding then decoding gives back the same presets in the same order.
    #[test]
    fn prop_encode_decode_roundtrip(presets in wire_safe_presets()) {
        let body = PresetListCodec::encode(&presets);
        prop_assert_eq!(PresetListCodec::decode(&body).ok(), Some(presets));
    }

    /// Other fields around `PresetName` do not change the decoded list.
    #[test]
    fn prop_decode_ignores_surrounding_fields(
        presets in wire_safe_presets(),
        max in 0u32..256,
    ) {
        let body = format!("PresetMax={max}&{}&Extra=1", PresetListCodec::encode(&presets));
        prop_assert_eq!(PresetListCodec::decode(&body).ok(), Some(presets));
    }

    /// Every preset lands in exactly one group, under the child name.
    #[test]
    fn prop_every_preset_in_exactly_one_group(presets in grouped_presets()) {
        let groups = PresetGroups::from_presets(&presets);

        let total: usize = groups.iter().map(|group| group.presets.len()).sum();
        prop_assert_eq!(total, presets.len());

        for (id, name) in presets.iter() {
            let (label, child_name) = label_of(name);
            let holders = groups.iter().filter(|group| group.presets.contains(id)).count();
            prop_assert_eq!(holders, 1);

            let group = groups.get(label);
            prop_assert!(group.is_some(), "no group {:?} for preset {:?}", label, id);
            prop_assert_eq!(group.and_then(|group| group.presets.get(id)), Some(child_name));
        }
    }

    /// Groups keep the source order, both between and within groups.
    #[test]
    fn prop_grouping_keeps_source_order(presets in grouped_presets()) {
        let groups = PresetGroups::from_presets(&presets);

        let mut first_seen: Vec<&str> = Vec::new();
        for (_, name) in presets.iter() {
            let (label, _) = label_of(name);
            if !first_seen.contains(&label) {
                first_seen.push(label);
            }
        }
        prop_assert_eq!(groups.labels().collect::<Vec<_>>(), first_seen);

        for group in &groups {
            let expected: Vec<&str> = presets
                .iter()
                .filter(|(_, name)| label_of(name).0 == group.label)
                .map(|(id, _)| id)
                .collect();
            prop_assert_eq!(group.presets.ids().collect::<Vec<_>>(), expected);
        }
    }
}
