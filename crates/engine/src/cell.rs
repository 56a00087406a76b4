use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Recognized style keys, validated at the styling boundary.
///
/// The style bag itself stays open: keys outside this set are accepted and
/// carried through to rendering untouched. The enum exists so toolbar-level
/// callers have typed constants instead of loose strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKey {
    FontWeight,
    FontStyle,
    FontSize,
    Color,
}

impl StyleKey {
    pub const ALL: [StyleKey; 4] = [
        StyleKey::FontWeight,
        StyleKey::FontStyle,
        StyleKey::FontSize,
        StyleKey::Color,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleKey::FontWeight => "font-weight",
            StyleKey::FontStyle => "font-style",
            StyleKey::FontSize => "font-size",
            StyleKey::Color => "color",
        }
    }

    /// Classify a raw key. `None` means unrecognized (still stored, just
    /// not one of the keys the toolbar knows about).
    pub fn parse(key: &str) -> Option<StyleKey> {
        match key {
            "font-weight" => Some(StyleKey::FontWeight),
            "font-style" => Some(StyleKey::FontStyle),
            "font-size" => Some(StyleKey::FontSize),
            "color" => Some(StyleKey::Color),
            _ => None,
        }
    }
}

impl std::fmt::Display for StyleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Open key/value style bag for a single cell.
///
/// Ordered map so the serialized form is deterministic. Style mutations
/// merge entries; they never replace the whole bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(BTreeMap<String, String>);

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Merge a single entry, overwriting any previous value for the key.
    pub fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The atomic unit of the grid: a display value, an optional raw formula
/// source, and a style bag.
///
/// `value` is always present; the empty string is a valid value, never an
/// absent one. `raw` holds the formula source when the cell was edited with
/// `=`-prefixed input; display-time evaluation keys off `raw`, so a cell
/// whose `value` merely starts with `=` (e.g. loaded from an old blob or a
/// CSV) renders literally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default)]
    pub style: StyleMap,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an edit. The input becomes the cell's value; when it begins
    /// with `=` it is also captured as the raw formula source. Style is
    /// untouched.
    pub fn set(&mut self, input: &str) {
        self.value = input.to_string();
        self.raw = if input.starts_with('=') {
            Some(input.to_string())
        } else {
            None
        };
    }

    pub fn is_formula(&self) -> bool {
        self.raw.is_some()
    }

    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.style.is_empty()
    }
}
