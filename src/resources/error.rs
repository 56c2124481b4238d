//! Error type of the resource layer.

use std::path::PathBuf;

use thiserror::Error;

use crate::resources::kind::ResourceKind;

/// Everything that can go wrong while loading, looking up or releasing assets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The named resource file cannot be located.
    #[error("cannot locate {kind} file '{file}' at {}", .path.display())]
    PathResolution {
        kind: ResourceKind,
        file: String,
        path: PathBuf,
    },

    /// The file exists but the platform could not decode it.
    #[error("failed to load {kind} from {}: {reason}", .path.display())]
    Loader {
        kind: ResourceKind,
        path: PathBuf,
        reason: String,
    },

    /// `register` was called twice for the same (kind, name).
    #[error("{kind} '{name}' is already registered")]
    DuplicateName { kind: ResourceKind, name: String },

    /// A lookup named something the catalog does not hold.
    #[error("no {kind} named '{name}' is loaded")]
    UnknownResource { kind: ResourceKind, name: String },

    /// The platform failed to release a handle.
    #[error("failed to release {kind} '{name}': {reason}")]
    Release {
        kind: ResourceKind,
        name: String,
        reason: String,
    },

    /// Load/free/lookup called out of order.
    #[error("resource lifecycle misuse: {0}")]
    LifecycleMisuse(String),

    /// The manifest could not be read or is inconsistent.
    #[error("invalid manifest: {0}")]
    Manifest(String),
}
