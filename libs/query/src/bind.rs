use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
}

impl BindValue {
    pub fn as_str(&self) -> &str {
        match self {
            BindValue::Text(v) => v,
        }
    }
}

impl fmt::Display for BindValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered named parameters for one statement.
///
/// Statements use positional `?` placeholders; entry `i` binds placeholder `i`.
/// Names (`:title`, `:artist`, ...) exist for diagnostics and are unique per binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    entries: Vec<(&'static str, BindValue)>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter and returns its 1-based placeholder position.
    pub fn push(&mut self, name: &'static str, value: impl Into<String>) -> usize {
        debug_assert!(
            self.get(name).is_none(),
            "duplicate bind parameter name {name}"
        );
        self.entries.push((name, BindValue::Text(value.into())));
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&BindValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Values in placeholder order.
    pub fn values(&self) -> impl Iterator<Item = &BindValue> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value:?}", value = value.as_str())?;
        }
        Ok(())
    }
}

/// Serializes as a `{":name": "value"}` object in placeholder order.
impl Serialize for Binding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value.as_str())?;
        }
        map.end()
    }
}
