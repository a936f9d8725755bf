//! Open string-keyed tuning values interpreted by individual strategies.

use std::collections::BTreeMap;

/// Strategy-specific extension values attached to a definition.
///
/// Values are stored as text and parsed on read. A missing key or a value that
/// fails to parse yields the caller's default without any diagnostic: authors
/// tune strategies by trial, and a typo must never take a creature out of play.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CustomFields {
    values: BTreeMap<String, String>,
}

impl CustomFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, used by tests and programmatic definitions.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.insert(key.into(), value.to_string());
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|value| value.trim())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn f32_or(&self, key: &str, default: f32) -> f32 {
        self.text(key)
            .and_then(|raw| raw.parse::<f32>().ok())
            .filter(|value| value.is_finite())
            .unwrap_or(default)
    }

    pub fn i32_or(&self, key: &str, default: i32) -> i32 {
        self.text(key)
            .and_then(|raw| {
                raw.parse::<i32>()
                    .ok()
                    // "3.0" is a common spelling for an integer in hand-written JSON
                    .or_else(|| {
                        raw.parse::<f32>()
                            .ok()
                            .filter(|v| v.is_finite())
                            .map(|v| v as i32)
                    })
            })
            .unwrap_or(default)
    }

    pub fn u32_or(&self, key: &str, default: u32) -> u32 {
        match self.i32_or(key, -1) {
            value if value >= 0 => value as u32,
            _ => default,
        }
    }

    /// Accepts `true`/`false` (any case), `yes`/`no`, and `1`/`0`.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.text(key).map(str::to_ascii_lowercase).as_deref() {
            Some("true" | "yes" | "1") => true,
            Some("false" | "no" | "0") => false,
            _ => default,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Scalar forms accepted in documents; numbers and booleans are kept as text.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CustomFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, RawField>::deserialize(deserializer)?;
        let values = raw
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    RawField::Text(text) => text,
                    RawField::Int(int) => int.to_string(),
                    RawField::Float(float) => float.to_string(),
                    RawField::Bool(flag) => flag.to_string(),
                };
                (key, text)
            })
            .collect();
        Ok(Self { values })
    }
}
