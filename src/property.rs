//! Typed property handles.
//!
//! A [`Property`] is an immutable `(path, default, type)` tuple. Handles
//! are created once at application init, registered in a
//! [`PropertyMap`](crate::PropertyMap), and then used for the life of the
//! process to read and write values through the
//! [`SettingsManager`](crate::SettingsManager).

use std::any::Any;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;

use crate::convert::ConvertErrorRecorder;
use crate::reader::PropertyReader;
use crate::types::{
    BooleanType, DoubleType, EnumType, IntType, LongType, PropertyType, StringListType, StringType,
};

/// Bounds every property value type must satisfy.
pub trait PropertyValue: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> PropertyValue for T {}

/// Value types with a canonical [`PropertyType`], enabling
/// [`Property::new`] without naming the type explicitly.
pub trait StandardType: Sized {
    fn property_type() -> Arc<dyn PropertyType<Self>>;
}

impl StandardType for String {
    fn property_type() -> Arc<dyn PropertyType<Self>> {
        Arc::new(StringType)
    }
}

impl StandardType for i32 {
    fn property_type() -> Arc<dyn PropertyType<Self>> {
        Arc::new(IntType)
    }
}

impl StandardType for i64 {
    fn property_type() -> Arc<dyn PropertyType<Self>> {
        Arc::new(LongType)
    }
}

impl StandardType for f64 {
    fn property_type() -> Arc<dyn PropertyType<Self>> {
        Arc::new(DoubleType)
    }
}

impl StandardType for bool {
    fn property_type() -> Arc<dyn PropertyType<Self>> {
        Arc::new(BooleanType)
    }
}

impl StandardType for Vec<String> {
    fn property_type() -> Arc<dyn PropertyType<Self>> {
        Arc::new(StringListType)
    }
}

/// A typed configuration property: dotted path, default value and
/// conversion type. Cheap to clone.
pub struct Property<T> {
    path: String,
    default: T,
    property_type: Arc<dyn PropertyType<T>>,
}

impl<T> Clone for Property<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            default: self.default.clone(),
            property_type: Arc::clone(&self.property_type),
        }
    }
}

impl<T: PropertyValue> Property<T> {
    /// Creates a property using the canonical type for `T`.
    pub fn new(path: impl Into<String>, default: T) -> Self
    where
        T: StandardType,
    {
        Self {
            path: path.into(),
            default,
            property_type: T::property_type(),
        }
    }

    /// Creates a property with a user-supplied [`PropertyType`].
    ///
    /// When the type's `convert` returns `None` for a loaded value, reads
    /// fall back to the default value.
    pub fn with_type(
        path: impl Into<String>,
        default: T,
        property_type: impl PropertyType<T> + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            default,
            property_type: Arc::new(property_type),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Reads the property from `reader`, falling back to the default when
    /// the path is absent or the value unconvertible. Never fails.
    pub fn get_value(&self, reader: &PropertyReader) -> T {
        let mut errors = ConvertErrorRecorder::new();
        self.determine_value(reader, &mut errors).0
    }

    /// Like [`get_value`](Self::get_value), but also reports whether the
    /// value came from the reader without any conversion diagnostic. The
    /// load pipeline treats `false` the same as an absent path.
    pub fn determine_value(
        &self,
        reader: &PropertyReader,
        errors: &mut ConvertErrorRecorder,
    ) -> (T, bool) {
        match reader.get_object(&self.path) {
            Some(raw) => match self.property_type.convert(raw, errors) {
                Some(value) => {
                    let fully_valid = !errors.has_error();
                    (value, fully_valid)
                }
                None => {
                    errors.set_has_error("value could not be converted");
                    (self.default.clone(), false)
                }
            },
            None => (self.default.clone(), false),
        }
    }

    /// Export form of a value of this property.
    pub fn to_export_value(&self, value: &T) -> Value {
        self.property_type.to_export_value(value)
    }
}

impl<E> Property<E>
where
    E: Serialize + DeserializeOwned + PropertyValue,
{
    /// Creates a property over a serde enum, stored as its string form.
    pub fn enumeration(path: impl Into<String>, default: E) -> Self {
        Self::with_type(path, default, EnumType::<E>::new())
    }
}

/// Object-safe view of a property, used by the registry to treat
/// heterogeneous `Property<T>` handles uniformly. Values cross this
/// boundary as `dyn Any` and are downcast back on typed access.
pub trait AnyProperty: Send + Sync {
    fn path(&self) -> &str;

    /// Default value, type-erased.
    fn default_any(&self) -> Box<dyn Any + Send + Sync>;

    /// Reads the value from the reader (default fallback applies) and
    /// reports whether it was present and fully convertible.
    fn determine_any(
        &self,
        reader: &PropertyReader,
        errors: &mut ConvertErrorRecorder,
    ) -> (Box<dyn Any + Send + Sync>, bool);

    /// Export form of a type-erased value; `None` when the value is not of
    /// this property's type.
    fn export_any(&self, value: &(dyn Any + Send + Sync)) -> Option<Value>;
}

impl<T: PropertyValue> AnyProperty for Property<T> {
    fn path(&self) -> &str {
        &self.path
    }

    fn default_any(&self) -> Box<dyn Any + Send + Sync> {
        Box::new(self.default.clone())
    }

    fn determine_any(
        &self,
        reader: &PropertyReader,
        errors: &mut ConvertErrorRecorder,
    ) -> (Box<dyn Any + Send + Sync>, bool) {
        let (value, fully_valid) = self.determine_value(reader, errors);
        (Box::new(value), fully_valid)
    }

    fn export_any(&self, value: &(dyn Any + Send + Sync)) -> Option<Value> {
        value
            .downcast_ref::<T>()
            .map(|v| self.property_type.to_export_value(v))
    }
}
