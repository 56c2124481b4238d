//! Game configuration.
//!
//! Settings loaded from an INI configuration file. Provides defaults for
//! safe startup; keys missing from the file keep their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1024
//! height = 768
//! target_fps = 60
//!
//! [loading]
//! width = 800
//! height = 600
//! lead_in_ms = 1200
//! frame_count = 11
//! frame_delay_ms = 20
//! trailing_ms = 1500
//! stage_pause_ms = 100
//! end_delay_ms = 500
//!
//! [resources]
//! root = ./Resources
//! unreleasable = sound
//! ```

use configparser::ini::Ini;
use log::{info, warn};
use smallvec::SmallVec;
use std::path::PathBuf;

use crate::loading::loadingscreen::LoadingTimings;
use crate::resources::kind::ResourceKind;
use crate::resources::lifecycle::ReleasePolicy;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 1024;
const DEFAULT_WINDOW_HEIGHT: u32 = 768;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_LOADING_WIDTH: u32 = 800;
const DEFAULT_LOADING_HEIGHT: u32 = 600;
const DEFAULT_ASSET_ROOT: &str = "./Resources";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Window width in pixels once loading is done.
    pub window_width: u32,
    /// Window height in pixels once loading is done.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Window width while the loading screen is up.
    pub loading_width: u32,
    /// Window height while the loading screen is up.
    pub loading_height: u32,
    /// Loading screen pacing.
    pub timings: LoadingTimings,
    /// Root of the resource folder.
    pub asset_root: PathBuf,
    /// Kinds whose handles are never handed back to the platform.
    pub unreleasable: SmallVec<[ResourceKind; 4]>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            loading_width: DEFAULT_LOADING_WIDTH,
            loading_height: DEFAULT_LOADING_HEIGHT,
            timings: LoadingTimings::default(),
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            unreleasable: SmallVec::new(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: {}x{} window, {}x{} loading screen, fps={}, assets={:?}, unreleasable={:?}",
            self.window_width,
            self.window_height,
            self.loading_width,
            self.loading_height,
            self.target_fps,
            self.asset_root,
            self.unreleasable
        );

        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let uint = |section: &str, key: &str| -> Option<u32> {
            match config.getuint(section, key) {
                Ok(Some(value)) => match u32::try_from(value) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring [{}] {} = {}: out of range", section, key, value);
                        None
                    }
                },
                Ok(None) => None,
                Err(e) => {
                    warn!("Ignoring [{}] {}: {}", section, key, e);
                    None
                }
            }
        };

        // [window] section
        if let Some(width) = uint("window", "width") {
            self.window_width = width;
        }
        if let Some(height) = uint("window", "height") {
            self.window_height = height;
        }
        if let Some(fps) = uint("window", "target_fps") {
            self.target_fps = fps;
        }

        // [loading] section
        if let Some(width) = uint("loading", "width") {
            self.loading_width = width;
        }
        if let Some(height) = uint("loading", "height") {
            self.loading_height = height;
        }
        let timings = &mut self.timings;
        if let Some(ms) = uint("loading", "lead_in_ms") {
            timings.lead_in_ms = ms;
        }
        if let Some(count) = uint("loading", "frame_count") {
            timings.frame_count = count;
        }
        if let Some(ms) = uint("loading", "frame_delay_ms") {
            timings.frame_delay_ms = ms;
        }
        if let Some(ms) = uint("loading", "trailing_ms") {
            timings.trailing_ms = ms;
        }
        if let Some(ms) = uint("loading", "stage_pause_ms") {
            timings.stage_pause_ms = ms;
        }
        if let Some(ms) = uint("loading", "end_delay_ms") {
            timings.end_delay_ms = ms;
        }

        // [resources] section
        if let Some(root) = config.get("resources", "root") {
            self.asset_root = PathBuf::from(root);
        }
        if let Some(list) = config.get("resources", "unreleasable") {
            self.unreleasable.clear();
            for item in list.split(',').filter(|s| !s.trim().is_empty()) {
                match item.parse::<ResourceKind>() {
                    Ok(kind) if !self.unreleasable.contains(&kind) => self.unreleasable.push(kind),
                    Ok(_) => {}
                    Err(e) => warn!("Ignoring [resources] unreleasable entry: {}", e),
                }
            }
        }
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Get the loading screen size.
    pub fn loading_size(&self) -> (u32, u32) {
        (self.loading_width, self.loading_height)
    }

    /// Release policy built from the `unreleasable` list.
    pub fn release_policy(&self) -> ReleasePolicy {
        ReleasePolicy::skipping(self.unreleasable.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::new();
        assert_eq!(config.loading_size(), (800, 600));
        assert_eq!(config.timings.frame_count, 11);
        assert!(config.unreleasable.is_empty());
        assert!(config.release_policy().releases(ResourceKind::Sound));
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[window]\nwidth = 640\n\n[loading]\nframe_count = 5\n")
            .unwrap();
        assert_eq!(config.window_size(), (640, DEFAULT_WINDOW_HEIGHT));
        assert_eq!(config.timings.frame_count, 5);
        assert_eq!(config.timings.lead_in_ms, LoadingTimings::default().lead_in_ms);
        assert_eq!(config.asset_root, PathBuf::from(DEFAULT_ASSET_ROOT));
    }

    #[test]
    fn test_unreleasable_list_is_parsed() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[resources]\nroot = /opt/game\nunreleasable = sound, Music, sound, bogus\n")
            .unwrap();
        assert_eq!(config.asset_root, PathBuf::from("/opt/game"));
        assert_eq!(
            config.unreleasable.as_slice(),
            &[ResourceKind::Sound, ResourceKind::Music]
        );
        let policy = config.release_policy();
        assert!(!policy.releases(ResourceKind::Sound));
        assert!(!policy.releases(ResourceKind::Music));
        assert!(policy.releases(ResourceKind::Image));
    }

    #[test]
    fn test_out_of_range_values_keep_defaults() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[window]\nwidth = 4294967296\n\n[loading]\nframe_count = 99999999999\nlead_in_ms = -5\nend_delay_ms = 4294967295\n")
            .unwrap();
        assert_eq!(config.window_size(), (DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT));
        assert_eq!(config.timings.frame_count, LoadingTimings::default().frame_count);
        assert_eq!(config.timings.lead_in_ms, LoadingTimings::default().lead_in_ms);
        assert_eq!(config.timings.end_delay_ms, u32::MAX);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = GameConfig::with_path("/nonexistent/broadside/config.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.window_size(), (DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT));
    }
}
