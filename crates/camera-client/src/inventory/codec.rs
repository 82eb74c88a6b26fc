//! Codec for the camera's preset inventory response.
//!
//! The body is `key=value` pairs joined with `&`, without percent-encoding.
//! The `PresetName` value is a flat comma list alternating id and name:
//!
//! ```text
//! PresetMax=16&PresetName=1,2_Wide,2,2_Tele,3,Home
//! ```

use super::PresetMap;
use crate::error::{CameraError, Result};

/// Key holding the preset list in an inventory response.
pub const PRESET_NAME_KEY: &str = "PresetName";

const PAIR_SEPARATOR: char = '&';
const KEY_VALUE_SEPARATOR: char = '=';
const LIST_SEPARATOR: char = ',';

pub struct PresetListCodec;

impl PresetListCodec {
    /// Decode an inventory body into an ordered id to name mapping.
    ///
    /// Any malformed segment fails the whole decode; no partial mapping is
    /// returned.
    pub fn decode(body: &str) -> Result<PresetMap> {
        let mut preset_field = None;

        for segment in body.split(PAIR_SEPARATOR) {
            let (key, value) = segment.split_once(KEY_VALUE_SEPARATOR).ok_or_else(|| {
                CameraError::malformed(format!("segment {segment:?} has no '='"))
            })?;

            if key == PRESET_NAME_KEY && preset_field.replace(value).is_some() {
                return Err(CameraError::malformed(format!(
                    "{PRESET_NAME_KEY} appears more than once"
                )));
            }
        }

        let list = preset_field
            .ok_or_else(|| CameraError::malformed(format!("missing {PRESET_NAME_KEY}")))?;

        let mut presets = PresetMap::new();
        if list.is_empty() {
            return Ok(presets);
        }

        let items: Vec<&str> = list.split(LIST_SEPARATOR).collect();
        if items.len() % 2 != 0 {
            return Err(CameraError::malformed(format!(
                "{PRESET_NAME_KEY} has {} elements, ids and names cannot be paired",
                items.len()
            )));
        }

        for pair in items.chunks_exact(2) {
            let [id, name] = pair else { continue };
            if presets.contains(id) {
                return Err(CameraError::malformed(format!(
                    "duplicate preset id {id:?}"
                )));
            }
            presets.insert(*id, *name);
        }

        Ok(presets)
    }

    /// Encode a mapping as a `PresetName=...` body.
    pub fn encode(presets: &PresetMap) -> String {
        let list = presets
            .iter()
            .flat_map(|(id, name)| [id, name])
            .collect::<Vec<_>>()
            .join(",");
        format!("{PRESET_NAME_KEY}={list}")
    }
}
