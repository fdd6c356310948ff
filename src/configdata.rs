//! Registry of declared properties plus their current in-memory values.

use std::any::Any;
use std::collections::HashMap;

use serde_yaml::Value;

use crate::convert::ConvertErrorRecorder;
use crate::property::{Property, PropertyValue};
use crate::propertymap::{PropertyEntry, PropertyMap};
use crate::reader::PropertyReader;

/// Holds the registered [`PropertyMap`], the current value of every
/// property, comments for non-leaf paths, and the diagnostics of the most
/// recent load.
///
/// Values are seeded from a reader on load and mutable afterwards through
/// [`set_value`](Self::set_value). Typed access goes through the property
/// handle; a value that is missing or of the wrong type falls back to the
/// property's default.
pub struct ConfigurationData {
    map: PropertyMap,
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
    group_comments: HashMap<String, Vec<String>>,
    diagnostics: Vec<String>,
    all_present: bool,
}

impl ConfigurationData {
    pub fn new(map: PropertyMap) -> Self {
        Self {
            map,
            values: HashMap::new(),
            group_comments: HashMap::new(),
            diagnostics: Vec::new(),
            all_present: false,
        }
    }

    /// Attaches comment lines to a path prefix (a non-leaf path). They are
    /// emitted when the prefix's block is opened during export. Comments
    /// for leaf paths are given on [`PropertyMap::add`].
    pub fn set_comment(&mut self, path: impl Into<String>, comments: Vec<String>) {
        self.group_comments.insert(path.into(), comments);
    }

    /// The current value of `property`, or its default when no value is
    /// held for its path.
    pub fn get_value<T: PropertyValue>(&self, property: &Property<T>) -> T {
        self.values
            .get(property.path())
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
            .unwrap_or_else(|| property.default_value().clone())
    }

    pub fn set_value<T: PropertyValue>(&mut self, property: &Property<T>, value: T) {
        self.values
            .insert(property.path().to_string(), Box::new(value));
    }

    /// Seeds the value of every registered property from `reader`,
    /// replacing prior values and diagnostics.
    ///
    /// A property whose path is absent, or whose value produced any
    /// conversion diagnostic, marks the resource as incomplete; the
    /// settings manager then rewrites the file.
    pub fn init_values(&mut self, reader: &PropertyReader) {
        let Self {
            map,
            values,
            diagnostics,
            ..
        } = self;
        diagnostics.clear();
        let mut all_present = true;

        for entry in map.entries() {
            let property = entry.property();
            let mut errors = ConvertErrorRecorder::new();
            let (value, fully_valid) = property.determine_any(reader, &mut errors);
            if !fully_valid {
                all_present = false;
            }
            for reason in errors.errors() {
                let message = format!("{}: {}", property.path(), reason);
                log::warn!("{message}");
                diagnostics.push(message);
            }
            values.insert(property.path().to_string(), value);
        }
        self.all_present = all_present;
    }

    /// Whether the last [`init_values`](Self::init_values) found every
    /// registered property present and fully convertible.
    pub fn all_values_valid(&self) -> bool {
        self.all_present
    }

    /// Conversion diagnostics collected by the last load.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn property_map(&self) -> &PropertyMap {
        &self.map
    }

    pub(crate) fn comments_for(&self, path: &str) -> &[String] {
        self.group_comments
            .get(path)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn export_entry(&self, entry: &PropertyEntry) -> Option<Value> {
        let property = entry.property();
        match self.values.get(property.path()) {
            Some(value) => property.export_any(value.as_ref()),
            None => {
                let default = property.default_any();
                property.export_any(default.as_ref())
            }
        }
    }
}
