//! Diagnostic accumulator for property value conversion.

/// Collects recoverable problems encountered while converting a loaded
/// value to a property's type.
///
/// A recorder is passed explicitly into
/// [`PropertyType::convert`](crate::types::PropertyType::convert). A
/// conversion may record an error and still return a best-effort value;
/// any recorded error marks the property as not fully valid, which makes
/// the load pipeline rewrite the file with the property's export form.
#[derive(Debug, Default)]
pub struct ConvertErrorRecorder {
    errors: Vec<String>,
}

impl ConvertErrorRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a conversion problem. Does not abort the conversion.
    pub fn set_has_error(&mut self, reason: impl Into<String>) {
        self.errors.push(reason.into());
    }

    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}
