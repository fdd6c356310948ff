//! Standard [`PropertyType`] implementations.
//!
//! A `PropertyType<T>` is a pair of total functions between a typed value
//! and the generic YAML tree: a forgiving `convert` (may record a
//! diagnostic and still return a best-effort value, or return `None` for
//! unconvertible input) and an exact `to_export_value`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;

use crate::convert::ConvertErrorRecorder;

/// Bidirectional conversion between `T` and a generic loaded value.
pub trait PropertyType<T>: Send + Sync {
    /// Converts a raw loaded value to `T`.
    ///
    /// Returns `None` when the input is unconvertible. Recoverable coercion
    /// problems (lossy truncation, stringified scalars, dropped list
    /// elements) are recorded on `errors` while still producing a value.
    fn convert(&self, value: &Value, errors: &mut ConvertErrorRecorder) -> Option<T>;

    /// Maps `T` back to the generic form accepted by the export layer.
    fn to_export_value(&self, value: &T) -> Value;
}

/// Strings stay strings; other scalars are stringified with a diagnostic.
pub struct StringType;

impl PropertyType<String> for StringType {
    fn convert(&self, value: &Value, errors: &mut ConvertErrorRecorder) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => {
                errors.set_has_error("value is a boolean, not a string");
                Some(b.to_string())
            }
            Value::Number(n) => {
                errors.set_has_error("value is a number, not a string");
                Some(n.to_string())
            }
            _ => None,
        }
    }

    fn to_export_value(&self, value: &String) -> Value {
        Value::String(value.clone())
    }
}

/// Integer numbers within `i32` range; integral floats accepted, fractional
/// floats truncated with a diagnostic.
pub struct IntType;

impl PropertyType<i32> for IntType {
    fn convert(&self, value: &Value, errors: &mut ConvertErrorRecorder) -> Option<i32> {
        let wide = LongType.convert(value, errors)?;
        match i32::try_from(wide) {
            Ok(v) => Some(v),
            Err(_) => {
                errors.set_has_error(format!("number {wide} is out of i32 range"));
                None
            }
        }
    }

    fn to_export_value(&self, value: &i32) -> Value {
        Value::Number((*value as i64).into())
    }
}

/// Integer numbers within `i64` range, with the same float handling as
/// [`IntType`].
pub struct LongType;

impl PropertyType<i64> for LongType {
    fn convert(&self, value: &Value, errors: &mut ConvertErrorRecorder) -> Option<i64> {
        let number = match value {
            Value::Number(n) => n,
            _ => return None,
        };
        if let Some(i) = number.as_i64() {
            return Some(i);
        }
        if let Some(f) = number.as_f64() {
            if f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                if f.fract() != 0.0 {
                    errors.set_has_error(format!("truncated fractional number {f}"));
                }
                return Some(f as i64);
            }
        }
        None
    }

    fn to_export_value(&self, value: &i64) -> Value {
        Value::Number((*value).into())
    }
}

/// Any number, widened to `f64`.
pub struct DoubleType;

impl PropertyType<f64> for DoubleType {
    fn convert(&self, value: &Value, _errors: &mut ConvertErrorRecorder) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    fn to_export_value(&self, value: &f64) -> Value {
        Value::Number((*value).into())
    }
}

/// Booleans only.
pub struct BooleanType;

impl PropertyType<bool> for BooleanType {
    fn convert(&self, value: &Value, _errors: &mut ConvertErrorRecorder) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn to_export_value(&self, value: &bool) -> Value {
        Value::Bool(*value)
    }
}

/// Sequence of strings. Elements that are not convertible to a string are
/// dropped with a diagnostic; a non-sequence value is unconvertible.
pub struct StringListType;

impl PropertyType<Vec<String>> for StringListType {
    fn convert(&self, value: &Value, errors: &mut ConvertErrorRecorder) -> Option<Vec<String>> {
        let items = match value {
            Value::Sequence(items) => items,
            _ => return None,
        };
        let mut result = Vec::with_capacity(items.len());
        for item in items {
            match StringType.convert(item, errors) {
                Some(s) => result.push(s),
                None => errors.set_has_error("dropped list element of unsupported type"),
            }
        }
        Some(result)
    }

    fn to_export_value(&self, value: &Vec<String>) -> Value {
        Value::Sequence(value.iter().cloned().map(Value::String).collect())
    }
}

/// Enum represented by its serde string form.
///
/// Conversion matches the loaded string against the enum's serde
/// representation: verbatim first, then common case foldings (upper,
/// lower, capitalized) so that files written with a different case
/// convention keep loading. A folded match records a diagnostic, which
/// makes the pipeline rewrite the file with the canonical spelling.
pub struct EnumType<E> {
    _marker: std::marker::PhantomData<fn() -> E>,
}

impl<E> EnumType<E> {
    pub fn new() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<E> Default for EnumType<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> PropertyType<E> for EnumType<E>
where
    E: Serialize + DeserializeOwned + Send + Sync,
{
    fn convert(&self, value: &Value, errors: &mut ConvertErrorRecorder) -> Option<E> {
        let text = match value {
            Value::String(s) => s.clone(),
            _ => return None,
        };
        if let Ok(e) = serde_yaml::from_value::<E>(Value::String(text.clone())) {
            return Some(e);
        }
        let mut capitalized = text.to_lowercase();
        if let Some(first) = capitalized.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        for candidate in [text.to_uppercase(), text.to_lowercase(), capitalized] {
            if candidate == text {
                continue;
            }
            if let Ok(e) = serde_yaml::from_value::<E>(Value::String(candidate)) {
                errors.set_has_error(format!("matched enum value '{text}' case-insensitively"));
                return Some(e);
            }
        }
        None
    }

    fn to_export_value(&self, value: &E) -> Value {
        // Serialization of a unit variant cannot fail.
        serde_yaml::to_value(value).unwrap_or(Value::Null)
    }
}
