//! Plain-text rendering of presets, one line per preset button.

use camera_client::{PresetGroups, PresetMap};

pub fn render_presets(presets: &PresetMap) -> String {
    presets
        .iter()
        .map(|(id, name)| format!("{id}: {name}\n"))
        .collect()
}

/// A `## label` heading per group followed by its `id: name` lines.
pub fn render_groups(groups: &PresetGroups) -> String {
    let mut out = String::new();
    for group in groups {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("## {}\n", group.label));
        out.push_str(&render_presets(&group.presets));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PresetMap {
        [("1", "2_Wide"), ("2", "2_Tele"), ("3", "Home")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_render_presets() {
        assert_eq!(render_presets(&sample()), "1: 2_Wide\n2: 2_Tele\n3: Home\n");
    }

    #[test]
    fn test_render_groups() {
        let groups = PresetGroups::from_presets(&sample());
        assert_eq!(
            render_groups(&groups),
            "## 2\n1: Wide\n2: Tele\n\n## others\n3: Home\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_presets(&PresetMap::new()), "");
        assert_eq!(render_groups(&PresetGroups::default()), "");
    }
}
