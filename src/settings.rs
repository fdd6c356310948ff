//! Settings manager façade and its builder.

use std::fs;
use std::path::Path;

use crate::configdata::ConfigurationData;
use crate::error::ConfigError;
use crate::migration::{MigrationService, PlainMigrationService, MIGRATION_REQUIRED};
use crate::property::{Property, PropertyValue};
use crate::resource::{PropertyResource, YamlFileResource};

/// Entry point for applications: composes a resource, configuration data
/// and a migration service, and drives the load → migrate → rewrite
/// pipeline.
///
/// All operations are synchronous; [`save`](Self::save) and
/// [`reload`](Self::reload) block on file I/O. The manager is safe for
/// concurrent reads once constructed; mutating calls require external
/// synchronization.
pub struct SettingsManager {
    resource: Box<dyn PropertyResource>,
    data: ConfigurationData,
    migration_service: Option<Box<dyn MigrationService>>,
}

impl SettingsManager {
    /// The current in-memory value of `property`.
    pub fn get_property<T: PropertyValue>(&self, property: &Property<T>) -> T {
        self.data.get_value(property)
    }

    /// Updates the in-memory value of `property`. Not persisted until
    /// [`save`](Self::save) is called.
    pub fn set_property<T: PropertyValue>(&mut self, property: &Property<T>, value: T) {
        self.data.set_value(property, value);
    }

    /// Exports the current values to the backing resource.
    pub fn save(&mut self) -> Result<(), ConfigError> {
        self.resource.export_properties(&self.data)
    }

    /// Re-reads the resource and re-runs the load pipeline. In-memory
    /// changes that were not saved are lost.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.resource.reload()?;
        self.load_from_resource()
    }

    /// Diagnostics recorded while converting values during the last load.
    pub fn diagnostics(&self) -> &[String] {
        self.data.diagnostics()
    }

    fn load_from_resource(&mut self) -> Result<(), ConfigError> {
        let reader = self.resource.reader();
        self.data.init_values(reader);

        let rewrite_required = match &self.migration_service {
            Some(service) => service.check_and_migrate(reader, &mut self.data) == MIGRATION_REQUIRED,
            None => false,
        };

        if rewrite_required || !self.data.all_values_valid() {
            log::debug!("configuration incomplete or migrated, writing file back");
            self.resource.export_properties(&self.data)?;
        }
        Ok(())
    }
}

/// Single-use builder for [`SettingsManager`]; `create` consumes it.
pub struct SettingsManagerBuilder {
    resource: Box<dyn PropertyResource>,
    configuration_data: Option<ConfigurationData>,
    migration_service: Option<Box<dyn MigrationService>>,
}

impl SettingsManagerBuilder {
    /// Starts a builder over the YAML file at `path`, creating the file
    /// and its parent directories when missing.
    pub fn with_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            create_file(path).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(Self::with_resource(YamlFileResource::new(path)?))
    }

    /// Starts a builder over an already constructed resource.
    pub fn with_resource(resource: impl PropertyResource + 'static) -> Self {
        Self {
            resource: Box::new(resource),
            configuration_data: None,
            migration_service: Some(Box::new(PlainMigrationService)),
        }
    }

    pub fn configuration_data(mut self, data: ConfigurationData) -> Self {
        self.configuration_data = Some(data);
        self
    }

    /// Replaces the default [`PlainMigrationService`].
    pub fn migration_service(mut self, service: impl MigrationService + 'static) -> Self {
        self.migration_service = Some(Box::new(service));
        self
    }

    /// Disables migration checks entirely; the file is then only rewritten
    /// when a registered property is missing or invalid.
    pub fn without_migration_service(mut self) -> Self {
        self.migration_service = None;
        self
    }

    /// Builds the manager and runs the initial load pipeline, rewriting
    /// the file when the migration verdict or a missing property requires
    /// it.
    pub fn create(self) -> Result<SettingsManager, ConfigError> {
        let data = self
            .configuration_data
            .ok_or_else(|| ConfigError::Builder("configuration data must be provided".into()))?;
        let mut manager = SettingsManager {
            resource: self.resource,
            data,
            migration_service: self.migration_service,
        };
        manager.load_from_resource()?;
        Ok(manager)
    }
}

fn create_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::File::create(path)?;
    Ok(())
}
