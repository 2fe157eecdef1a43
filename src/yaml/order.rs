//! Property ordering rules for tape documents.
//!
//! Tape types serialize their fields in a fixed declared order so that two
//! captures of the same traffic produce byte-identical documents. Generic
//! mappings, which have no declaration to follow, sort by key instead.

/// Field order for a tape document.
pub const TAPE_FIELDS: &[&str] = &["name", "interactions"];

/// Field order for a recorded interaction.
pub const INTERACTION_FIELDS: &[&str] = &["recorded", "request", "response"];

/// Slot order for a request's positional sequence.
pub const REQUEST_FIELDS: &[&str] = &["method", "uri", "headers", "body"];

/// Slot order for a response's positional sequence.
pub const RESPONSE_FIELDS: &[&str] = &["status", "headers", "body"];

/// Reorders `(name, value)` properties to match a declared field list.
///
/// Properties absent from the declaration keep their relative order and
/// follow the declared ones. Declared names missing from `properties` are
/// simply not emitted; elision upstream relies on that.
pub fn by_declared<K, T>(declared: &[&str], properties: Vec<(K, T)>) -> Vec<(K, T)>
where
    K: AsRef<str>,
{
    let mut remaining = properties;
    let mut ordered = Vec::with_capacity(remaining.len());
    for &field in declared {
        if let Some(at) = remaining.iter().position(|(name, _)| name.as_ref() == field) {
            ordered.push(remaining.remove(at));
        }
    }
    ordered.extend(remaining);
    ordered
}

/// Sorts `(name, value)` properties lexicographically by name.
pub fn by_key<T>(mut properties: Vec<(String, T)>) -> Vec<(String, T)> {
    properties.sort_by(|(a, _), (b, _)| a.cmp(b));
    properties
}
