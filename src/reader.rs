//! Read-only view over a loaded document.

use serde_yaml::{Mapping, Value};

/// Immutable tree of a loaded document. Lookup descends the mapping
/// segment-wise along a dotted path; any missing segment or non-mapping
/// prefix yields absent.
///
/// A reader is transient: the resource produces a fresh one per load.
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    root: Mapping,
}

impl PropertyReader {
    /// Builds a reader over a top-level mapping. `Value::Null` (empty
    /// file) is treated as an empty mapping; any other non-mapping top
    /// level is rejected by the resource before a reader is built.
    pub fn new(root: Mapping) -> Self {
        Self { root }
    }

    pub(crate) fn root(&self) -> &Mapping {
        &self.root
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get_object(path).is_some()
    }

    /// Raw value at `path`, or `None` if absent.
    pub fn get_object(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            match current {
                Value::Mapping(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// The string at `path`; non-strings are absent.
    pub fn get_string(&self, path: &str) -> Option<&str> {
        match self.get_object(path)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number at `path` as an integer. Floats qualify only when they
    /// are integral and within `i64` range.
    pub fn get_int(&self, path: &str) -> Option<i64> {
        match self.get_object(path)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                let f = n.as_f64()?;
                (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64)
                    .then_some(f as i64)
            }),
            _ => None,
        }
    }

    /// The number at `path` as a double; any numeric value qualifies.
    pub fn get_double(&self, path: &str) -> Option<f64> {
        match self.get_object(path)? {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// The boolean at `path`; numbers and strings are absent.
    pub fn get_boolean(&self, path: &str) -> Option<bool> {
        match self.get_object(path)? {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The sequence at `path`; non-sequences are absent.
    pub fn get_list(&self, path: &str) -> Option<&[Value]> {
        match self.get_object(path)? {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }
}
