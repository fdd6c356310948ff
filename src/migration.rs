//! Post-load migration of legacy configuration entries.

use crate::configdata::ConfigurationData;
use crate::property::{Property, PropertyValue};
use crate::reader::PropertyReader;

/// Verdict value: the file must be rewritten.
pub const MIGRATION_REQUIRED: bool = true;

/// Verdict value: the loaded file needs no rewrite.
pub const NO_MIGRATION_NEEDED: bool = false;

/// Policy object invoked once after each load.
///
/// Implementors override [`perform_migrations`](Self::perform_migrations)
/// to read legacy paths from the reader and write replacement values into
/// the configuration data. The provided
/// [`check_and_migrate`](Self::check_and_migrate) additionally requires a
/// rewrite whenever a registered property was absent or invalid, so a
/// plain implementation only has to exist.
pub trait MigrationService: Send {
    /// Returns [`MIGRATION_REQUIRED`] when the file must be written back.
    fn check_and_migrate(&self, reader: &PropertyReader, data: &mut ConfigurationData) -> bool {
        if self.perform_migrations(reader, data) == MIGRATION_REQUIRED || !data.all_values_valid()
        {
            MIGRATION_REQUIRED
        } else {
            NO_MIGRATION_NEEDED
        }
    }

    /// Hook for application-specific migrations. The default does nothing.
    fn perform_migrations(&self, _reader: &PropertyReader, _data: &mut ConfigurationData) -> bool {
        NO_MIGRATION_NEEDED
    }
}

/// Migration service without application-specific migrations: requires a
/// rewrite exactly when a registered property is missing from the file.
pub struct PlainMigrationService;

impl MigrationService for PlainMigrationService {}

/// Moves the value at `old`'s path onto `new`.
///
/// The move happens iff the old path is present in the reader and `new`
/// still holds its default value, so an already-migrated entry is never
/// overwritten. Returns `true` when a move occurred; callers typically OR
/// the results of several moves into their verdict.
pub fn move_property<T>(
    old: &Property<T>,
    new: &Property<T>,
    reader: &PropertyReader,
    data: &mut ConfigurationData,
) -> bool
where
    T: PropertyValue + PartialEq,
{
    if !reader.contains(old.path()) {
        return false;
    }
    if data.get_value(new) != *new.default_value() {
        log::debug!(
            "not moving '{}' to '{}': target already has a non-default value",
            old.path(),
            new.path()
        );
        return false;
    }
    let value = old.get_value(reader);
    data.set_value(new, value);
    true
}
