//! Typed configuration properties with YAML round-trip, comments and
//! migrations.
//!
//! Applications declare [`Property`] handles (dotted path, default value,
//! value type), register them in a [`PropertyMap`], and access them
//! through a [`SettingsManager`] built over a YAML file. Loading falls
//! back to defaults for missing or unconvertible values, a
//! [`MigrationService`] may reshape legacy entries, and the file is
//! written back in a stable, grouped, comment-annotated order whenever a
//! registered property was missing or a migration requires it.
//!
//! ```rust,no_run
//! use propconf::{ConfigurationData, Property, PropertyMap, SettingsManagerBuilder};
//!
//! # fn main() -> Result<(), propconf::ConfigError> {
//! let title_text = Property::new("title.text", "-Default-".to_string());
//! let title_size = Property::new("title.size", 10i32);
//!
//! let mut map = PropertyMap::new();
//! map.add(&title_text, &["The title text"])?;
//! map.add(&title_size, &[])?;
//!
//! let mut data = ConfigurationData::new(map);
//! data.set_comment("title", vec!["Title settings".to_string()]);
//!
//! let mut settings = SettingsManagerBuilder::with_yaml_file("config.yml")?
//!     .configuration_data(data)
//!     .create()?;
//!
//! println!("title: {}", settings.get_property(&title_text));
//! settings.set_property(&title_size, 14);
//! settings.save()?;
//! # Ok(())
//! # }
//! ```

mod atomic;
pub mod configdata;
pub mod convert;
pub mod error;
pub mod migration;
pub mod property;
pub mod propertymap;
pub mod reader;
pub mod resource;
pub mod settings;
pub mod types;

pub use configdata::ConfigurationData;
pub use convert::ConvertErrorRecorder;
pub use error::ConfigError;
pub use migration::{
    move_property, MigrationService, PlainMigrationService, MIGRATION_REQUIRED,
    NO_MIGRATION_NEEDED,
};
pub use property::{AnyProperty, Property, PropertyValue, StandardType};
pub use propertymap::{PropertyEntry, PropertyMap};
pub use reader::PropertyReader;
pub use resource::{PropertyResource, YamlFileResource};
pub use settings::{SettingsManager, SettingsManagerBuilder};
pub use types::PropertyType;
