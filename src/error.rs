use std::path::PathBuf;

use thiserror::Error;

/// All fatal errors raised by this crate.
///
/// Per-property conversion problems are never surfaced here; they are
/// collected as diagnostics on [`ConfigurationData`](crate::ConfigurationData)
/// and only influence whether the file gets rewritten.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The loaded document's top level is a scalar or sequence.
    #[error("Top-level is not a map in '{path}'")]
    TopLevelNotMap { path: PathBuf },

    /// A property was registered at a path that is already taken.
    #[error("Path at '{0}' already exists")]
    DuplicatePath(String),

    /// A property was registered below a path that is itself a property,
    /// e.g. adding `a.b.c` when `a.b` is a registered leaf.
    #[error("Cannot register '{path}': '{prefix}' is already a property")]
    StructuralConflict { path: String, prefix: String },

    /// The settings manager builder was not fully configured.
    #[error("Builder misuse: {0}")]
    Builder(String),
}
