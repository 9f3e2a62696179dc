//! Placeholder substitution for localized message templates.
//!
//! Templates mark substitution points with `{{KEY}}` tokens. Keys are
//! matched exactly and case-sensitively.

use serde_json::Value;

/// Replace every `{{key}}` token in `text` with `value`.
pub fn replace_key_in(text: &str, key: &str, value: &str) -> String {
    text.replace(&format!("{{{{{key}}}}}"), value)
}

/// Ordered key/value pairs substituted into a message template.
///
/// Iteration follows insertion order so that substitution over several
/// keys is deterministic for identical inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details {
    entries: Vec<(String, String)>,
}

impl Details {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a value, replacing an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build details from the JSON body of a failed analysis request.
    ///
    /// Strings are taken as-is, numbers and booleans are stringified,
    /// nulls and nested values are skipped. Returns `None` if `value` is
    /// not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut details = Self::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => continue,
            };
            details.insert(key.clone(), text);
        }
        Some(details)
    }

    /// Substitute every entry into `template`, in insertion order.
    pub fn apply(&self, template: &str) -> String {
        self.iter()
            .fold(template.to_string(), |text, (key, value)| {
                replace_key_in(&text, key, value)
            })
    }
}

impl<K, V> FromIterator<(K, V)> for Details
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut details = Self::new();
        for (key, value) in iter {
            details.insert(key, value);
        }
        details
    }
}
