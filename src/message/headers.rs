//! Insertion-ordered header multimap shared by requests and responses.

use std::fmt;

/// HTTP headers as captured: an ordered name → value-list multimap.
///
/// Insertion order is preserved because it is part of the captured data, not
/// an artifact of iteration. Name lookups are ASCII-case-insensitive; the
/// first-seen spelling of each name is the one kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    /// Creates an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a header map from `(name, value)` pairs in order.
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        let mut headers = Self::new();
        for (name, value) in pairs {
            headers.append(name, value);
        }
        headers
    }

    /// Appends a value under `name`, grouping with any existing values for
    /// the same name (case-insensitive).
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some((_, values)) = self.entry_mut(&name) {
            values.push(value);
        } else {
            self.entries.push((name, vec![value]));
        }
    }

    /// Replaces all values under `name` with the single given value, keeping
    /// the original position and spelling. Appends when the name is absent.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some((_, values)) = self.entry_mut(&name) {
            *values = vec![value];
        } else {
            self.entries.push((name, vec![value]));
        }
    }

    /// Removes every value under `name`. Returns `true` if anything was
    /// removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.entries.len() != before
    }

    /// Returns the first captured value for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first().map(String::as_str))
    }

    /// Returns every captured value for `name`, in capture order.
    #[must_use]
    pub fn all(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map_or(&[], |(_, values)| values.as_slice())
    }

    /// Returns `true` if a header with the given name was captured.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no headers were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut (String, Vec<String>)> {
        self.entries.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in self.iter() {
            for value in values {
                writeln!(f, "{name}: {value}")?;
            }
        }
        Ok(())
    }
}
