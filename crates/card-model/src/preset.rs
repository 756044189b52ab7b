//! Clip position presets.
//!
//! Presets live in exactly [`PRESET_SLOT_COUNT`] fixed slots. A slot is either
//! empty or holds a whole [`PositionPreset`]; slots are overwritten, never merged.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ModelError;

/// Number of preset slots.
pub const PRESET_SLOT_COUNT: usize = 9;

/// A saved clip position in the host's normalized coordinate space.
///
/// Coordinates are stored exactly as the host reported them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionPreset {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PositionPreset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, name: None }
    }

    pub fn named(x: f64, y: f64, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            name: Some(name.into()),
        }
    }
}

/// Zero-based index of a preset slot, always `< PRESET_SLOT_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(usize);

impl SlotIndex {
    pub fn new(index: usize) -> Result<Self, ModelError> {
        if index < PRESET_SLOT_COUNT {
            Ok(Self(index))
        } else {
            Err(ModelError::SlotOutOfRange {
                index,
                min: 0,
                max: PRESET_SLOT_COUNT - 1,
            })
        }
    }

    /// Build from the 1-based number shown on the slot button.
    pub fn from_display(number: usize) -> Result<Self, ModelError> {
        match number.checked_sub(1) {
            Some(index) if index < PRESET_SLOT_COUNT => Ok(Self(index)),
            _ => Err(ModelError::SlotOutOfRange {
                index: number,
                min: 1,
                max: PRESET_SLOT_COUNT,
            }),
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// 1-based number shown to the operator.
    pub fn display_number(self) -> usize {
        self.0 + 1
    }

    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (0..PRESET_SLOT_COUNT).map(SlotIndex)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_number())
    }
}

/// The fixed array of preset slots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresetSlots {
    slots: [Option<PositionPreset>; PRESET_SLOT_COUNT],
}

impl PresetSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: SlotIndex) -> Option<&PositionPreset> {
        self.slots[index.get()].as_ref()
    }

    /// Replace a slot wholesale.
    pub fn set(&mut self, index: SlotIndex, preset: PositionPreset) {
        self.slots[index.get()] = Some(preset);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, Option<&PositionPreset>)> {
        SlotIndex::all().map(move |i| (i, self.get(i)))
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn len(&self) -> usize {
        PRESET_SLOT_COUNT
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    /// Build from a persisted JSON value.
    ///
    /// Non-array input yields all-empty slots. Arrays are padded or truncated
    /// to the slot count, and entries that are not a valid preset become empty.
    pub fn from_json_value(value: serde_json::Value) -> Self {
        let mut slots = Self::default();
        if let serde_json::Value::Array(entries) = value {
            for (i, entry) in entries.into_iter().take(PRESET_SLOT_COUNT).enumerate() {
                slots.slots[i] = serde_json::from_value::<Option<PositionPreset>>(entry)
                    .ok()
                    .flatten()
                    .filter(|p| p.x.is_finite() && p.y.is_finite());
            }
        }
        slots
    }
}

impl Serialize for PresetSlots {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.slots.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PresetSlots {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_index_bounds() {
        assert!(SlotIndex::new(0).is_ok());
        assert!(SlotIndex::new(8).is_ok());
        assert!(SlotIndex::new(9).is_err());
        assert_eq!(SlotIndex::from_display(1).unwrap().get(), 0);
        assert_eq!(SlotIndex::from_display(9).unwrap().get(), 8);
        assert!(SlotIndex::from_display(0).is_err());
        assert!(SlotIndex::from_display(10).is_err());
        assert_eq!(SlotIndex::all().count(), 9);
    }

    #[test]
    fn test_set_overwrites_wholesale() {
        let mut slots = PresetSlots::new();
        let idx = SlotIndex::new(3).unwrap();
        slots.set(idx, PositionPreset::named(0.25, 0.75, "Preset 4"));
        slots.set(idx, PositionPreset::new(0.5, 0.9));
        assert_eq!(slots.get(idx), Some(&PositionPreset::new(0.5, 0.9)));
        assert_eq!(slots.filled_count(), 1);
        assert_eq!(slots.len(), 9);
    }

    #[test]
    fn test_serializes_as_nine_entry_array() {
        let mut slots = PresetSlots::new();
        slots.set(SlotIndex::new(0).unwrap(), PositionPreset::new(0.5, 0.85));
        let value = serde_json::to_value(&slots).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 9);
        assert_eq!(array[0]["x"], 0.5);
        assert!(array[1].is_null());
    }

    #[test]
    fn test_lenient_decode() {
        let short: PresetSlots = serde_json::from_str(r#"[{"x":0.1,"y":0.2}, null]"#).unwrap();
        assert_eq!(short.filled_count(), 1);
        assert_eq!(short.len(), 9);

        let json = r#"[null,{"x":"bad"},{"x":0.3,"y":0.4,"name":"Lower third"},1,2,3,4,5,6,{"x":1,"y":1}]"#;
        let long: PresetSlots = serde_json::from_str(json).unwrap();
        assert_eq!(long.filled_count(), 1);
        assert_eq!(
            long.get(SlotIndex::new(2).unwrap()).and_then(|p| p.name.as_deref()),
            Some("Lower third")
        );

        let not_array: PresetSlots = serde_json::from_str(r#"{"x":1}"#).unwrap();
        assert!(not_array.is_empty());
    }

    #[test]
    fn test_coordinates_are_not_clamped() {
        let mut slots = PresetSlots::new();
        let idx = SlotIndex::new(8).unwrap();
        slots.set(idx, PositionPreset::new(-0.2, 1.7));
        let json = serde_json::to_string(&slots).unwrap();
        let restored: PresetSlots = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.get(idx), Some(&PositionPreset::new(-0.2, 1.7)));
    }
}
