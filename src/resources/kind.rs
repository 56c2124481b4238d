//! Resource kinds.
//!
//! The closed set of asset kinds the resource layer manages. Each kind has
//! its own cache in the [`ResourceCatalog`](super::catalog::ResourceCatalog)
//! and its own load stage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of a loaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Font,
    Image,
    Sound,
    Music,
}

impl ResourceKind {
    /// All kinds, in load-stage order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Font,
        ResourceKind::Image,
        ResourceKind::Sound,
        ResourceKind::Music,
    ];

    /// Position of this kind in [`ResourceKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            ResourceKind::Font => 0,
            ResourceKind::Image => 1,
            ResourceKind::Sound => 2,
            ResourceKind::Music => 3,
        }
    }

    /// Lowercase name used in config files and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Font => "font",
            ResourceKind::Image => "image",
            ResourceKind::Sound => "sound",
            ResourceKind::Music => "music",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "font" | "fonts" => Ok(ResourceKind::Font),
            "image" | "images" => Ok(ResourceKind::Image),
            "sound" | "sounds" => Ok(ResourceKind::Sound),
            "music" => Ok(ResourceKind::Music),
            other => Err(format!("unknown resource kind '{}'", other)),
        }
    }
}
