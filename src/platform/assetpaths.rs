//! On-disk resource folder layout.
//!
//! Assets live under one root directory, split by kind:
//!
//! ```text
//! Resources/
//!   fonts/    *.ttf
//!   images/   *.png, *.jpg
//!   sounds/   *.wav, *.ogg   (music tracks live here too)
//! ```

use std::path::{Path, PathBuf};

use crate::platform::PathResolver;
use crate::resources::error::ResourceError;
use crate::resources::kind::ResourceKind;

const DEFAULT_ASSET_ROOT: &str = "./Resources";

/// Resolves resource files inside a root folder and checks they exist.
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    root: PathBuf,
}

impl Default for AssetDirectory {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_ROOT)
    }
}

impl AssetDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sub-folder holding assets of `kind`.
    pub fn subdirectory(kind: ResourceKind) -> &'static str {
        match kind {
            ResourceKind::Font => "fonts",
            ResourceKind::Image => "images",
            ResourceKind::Sound | ResourceKind::Music => "sounds",
        }
    }
}

impl PathResolver for AssetDirectory {
    fn resolve(&self, kind: ResourceKind, file: &str) -> Result<PathBuf, ResourceError> {
        let path = self.root.join(Self::subdirectory(kind)).join(file);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ResourceError::PathResolution {
                kind,
                file: file.to_string(),
                path,
            })
        }
    }
}
