//! Load manifest.
//!
//! The manifest is the only description of what gets loaded: one list of
//! entries per resource kind plus the small bootstrap set used by the
//! loading screen. It is either the built-in battleships asset list
//! ([`Manifest::default`]) or read from a JSON file:
//!
//! ```json
//! {
//!   "fonts":  [{ "name": "Courier", "file": "cour.ttf", "size": 14 }],
//!   "images": [{ "name": "Menu", "file": "main_page.jpg" }],
//!   "sounds": [{ "name": "Hit", "file": "hit.wav" }],
//!   "music":  [{ "name": "Background", "file": "horrordrone.ogg" }]
//! }
//! ```
//!
//! Missing lists are empty and a missing `bootstrap` section falls back to
//! [`BootstrapManifest::default`]. Adding or renaming an asset only ever
//! means editing the manifest.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::resources::error::ResourceError;
use crate::resources::kind::ResourceKind;

/// One asset to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Key the asset is looked up by.
    pub name: String,
    /// File name, relative to the kind's resource folder.
    pub file: String,
    /// Point size; required for fonts, ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl ManifestEntry {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            size: None,
        }
    }

    pub fn font(name: impl Into<String>, file: impl Into<String>, size: u32) -> Self {
        Self {
            size: Some(size),
            ..Self::new(name, file)
        }
    }
}

/// Files of the loading screen's own resource set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapManifest {
    pub background: String,
    /// Horizontal strip of intro animation cells.
    pub animation: String,
    pub font: String,
    pub font_size: u32,
    pub start_sound: String,
    pub bar_empty: String,
    pub bar_full: String,
}

impl Default for BootstrapManifest {
    fn default() -> Self {
        Self {
            background: "SplashBack.png".to_string(),
            animation: "SwinGameAni.jpg".to_string(),
            font: "arial.ttf".to_string(),
            font_size: 12,
            start_sound: "SwinGameStart.wav".to_string(),
            bar_empty: "loader_empty.png".to_string(),
            bar_full: "loader_full.png".to_string(),
        }
    }
}

/// Everything the load pass reads, grouped by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub fonts: Vec<ManifestEntry>,
    #[serde(default)]
    pub images: Vec<ManifestEntry>,
    #[serde(default)]
    pub sounds: Vec<ManifestEntry>,
    #[serde(default)]
    pub music: Vec<ManifestEntry>,
    #[serde(default)]
    pub bootstrap: BootstrapManifest,
}

impl Default for Manifest {
    /// The battleships asset list.
    fn default() -> Self {
        let fonts = vec![
            ManifestEntry::font("ArialLarge", "arial.ttf", 80),
            ManifestEntry::font("Courier", "cour.ttf", 14),
            ManifestEntry::font("CourierSmall", "cour.ttf", 8),
            ManifestEntry::font("Menu", "ffaccess.ttf", 8),
        ];

        let mut images = vec![
            // Backgrounds
            ManifestEntry::new("Menu", "main_page.jpg"),
            ManifestEntry::new("Discovery", "discover.jpg"),
            ManifestEntry::new("Deploy", "deploy.jpg"),
            // Deployment
            ManifestEntry::new("LeftRightButton", "deploy_dir_button_horiz.png"),
            ManifestEntry::new("UpDownButton", "deploy_dir_button_vert.png"),
            ManifestEntry::new("SelectedShip", "deploy_button_hl.png"),
            ManifestEntry::new("PlayButton", "deploy_play_button.png"),
            ManifestEntry::new("RandomButton", "deploy_randomize_button.png"),
        ];
        for i in 1..=5 {
            images.push(ManifestEntry::new(
                format!("ShipLR{}", i),
                format!("ship_deploy_horiz_{}.png", i),
            ));
            images.push(ManifestEntry::new(
                format!("ShipUD{}", i),
                format!("ship_deploy_vert_{}.png", i),
            ));
        }
        images.push(ManifestEntry::new("Explosion", "explosion.png"));
        images.push(ManifestEntry::new("Splash", "splash.png"));

        let sounds = vec![
            ManifestEntry::new("Error", "error.wav"),
            ManifestEntry::new("Hit", "hit.wav"),
            ManifestEntry::new("Sink", "sink.wav"),
            ManifestEntry::new("Siren", "siren.wav"),
            ManifestEntry::new("Miss", "watershot.wav"),
            ManifestEntry::new("Winner", "winner.wav"),
            ManifestEntry::new("Lose", "lose.wav"),
        ];

        let music = vec![ManifestEntry::new("Background", "horrordrone.ogg")];

        Self {
            fonts,
            images,
            sounds,
            music,
            bootstrap: BootstrapManifest::default(),
        }
    }
}

impl Manifest {
    /// Manifest with no entries and the default bootstrap set.
    pub fn empty() -> Self {
        Self {
            fonts: Vec::new(),
            images: Vec::new(),
            sounds: Vec::new(),
            music: Vec::new(),
            bootstrap: BootstrapManifest::default(),
        }
    }

    /// Entries of one kind.
    pub fn entries(&self, kind: ResourceKind) -> &[ManifestEntry] {
        match kind {
            ResourceKind::Font => &self.fonts,
            ResourceKind::Image => &self.images,
            ResourceKind::Sound => &self.sounds,
            ResourceKind::Music => &self.music,
        }
    }

    /// Total number of entries across all kinds.
    pub fn len(&self) -> usize {
        ResourceKind::ALL
            .iter()
            .map(|&kind| self.entries(kind).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the manifest is loadable: every font carries a point size.
    pub fn validate(&self) -> Result<(), ResourceError> {
        if let Some(entry) = self.fonts.iter().find(|e| e.size.is_none()) {
            return Err(ResourceError::Manifest(format!(
                "font '{}' ({}) has no size",
                entry.name, entry.file
            )));
        }
        if self.bootstrap.font_size == 0 {
            return Err(ResourceError::Manifest(
                "bootstrap font size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON manifest.
    pub fn from_json(json: &str) -> Result<Self, ResourceError> {
        let manifest: Manifest =
            serde_json::from_str(json).map_err(|e| ResourceError::Manifest(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read a JSON manifest from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ResourceError::Manifest(format!("cannot read {}: {}", path.display(), e))
        })?;
        let manifest = Self::from_json(&json)?;
        log::info!(
            "Loaded manifest {} ({} entries)",
            path.display(),
            manifest.len()
        );
        Ok(manifest)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ResourceError> {
        serde_json::to_string_pretty(self).map_err(|e| ResourceError::Manifest(e.to_string()))
    }
}
