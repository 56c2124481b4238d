//! Window-less platform.
//!
//! [`HeadlessPlatform`] implements every platform capability without a
//! window or audio device. Handles are numbered tokens; draw calls, event
//! pumps and waits are recorded as [`PlatformCall`]s and waits only advance
//! a virtual clock. It backs the `--check` mode of the binary, which walks
//! the whole load sequence to validate a manifest against an asset folder,
//! and it is what the tests drive the resource layer with.
//!
//! Loads and releases can be made to fail per file name to exercise error
//! paths.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::platform::{Asset, EventPump, MediaLoader, Rect, Surface, TextAlign, Timer};
use crate::resources::kind::ResourceKind;

const DEFAULT_RESOLUTION: (i32, i32) = (1280, 720);
const DEFAULT_IMAGE_SIZE: (i32, i32) = (260, 66);

/// Token standing in for a loaded asset.
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessHandle {
    /// Non-zero, unique per load.
    pub id: u32,
    pub kind: ResourceKind,
    pub path: PathBuf,
}

/// One recorded platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Load {
        kind: ResourceKind,
        id: u32,
        path: PathBuf,
        size: Option<u32>,
    },
    Release {
        kind: ResourceKind,
        id: u32,
    },
    PlaySound {
        id: u32,
    },
    DrawImage {
        id: u32,
        x: i32,
        y: i32,
    },
    DrawImagePart {
        id: u32,
        src: Rect,
        x: i32,
        y: i32,
    },
    DrawText {
        text: String,
        area: Rect,
        align: TextAlign,
    },
    Refresh,
    Clear,
    ProcessEvents,
    Delay(u32),
    SetResolution {
        width: i32,
        height: i32,
    },
}

/// Recording platform with a virtual clock.
#[derive(Debug)]
pub struct HeadlessPlatform {
    calls: Vec<PlatformCall>,
    next_id: u32,
    resolution: (i32, i32),
    image_size: (i32, i32),
    elapsed_ms: u64,
    verify_files: bool,
    failing_loads: FxHashSet<String>,
    failing_releases: FxHashSet<String>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    /// Platform that accepts any path without touching the filesystem.
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_id: 1,
            resolution: DEFAULT_RESOLUTION,
            image_size: DEFAULT_IMAGE_SIZE,
            elapsed_ms: 0,
            verify_files: false,
            failing_loads: FxHashSet::default(),
            failing_releases: FxHashSet::default(),
        }
    }

    /// Platform that reads every file it is asked to load and rejects
    /// unreadable or empty ones.
    pub fn verifying() -> Self {
        Self {
            verify_files: true,
            ..Self::new()
        }
    }

    pub fn with_resolution(mut self, width: i32, height: i32) -> Self {
        self.resolution = (width, height);
        self
    }

    /// Size reported for every image.
    pub fn with_image_size(mut self, width: i32, height: i32) -> Self {
        self.image_size = (width, height);
        self
    }

    /// Make loads of `file` fail as if it were corrupt.
    pub fn fail_load(&mut self, file: impl Into<String>) {
        self.failing_loads.insert(file.into());
    }

    /// Make releases of handles loaded from `file` fail.
    pub fn fail_release(&mut self, file: impl Into<String>) {
        self.failing_releases.insert(file.into());
    }

    pub fn calls(&self) -> &[PlatformCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&PlatformCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Total virtual time spent in [`Timer::delay`].
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn load(
        &mut self,
        kind: ResourceKind,
        path: &Path,
        size: Option<u32>,
    ) -> Result<HeadlessHandle, String> {
        if self.failing_loads.contains(&Self::file_name(path)) {
            return Err(format!("unsupported or corrupt file '{}'", path.display()));
        }
        if self.verify_files {
            let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
            if bytes.is_empty() {
                return Err(format!("'{}' is empty", path.display()));
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        self.calls.push(PlatformCall::Load {
            kind,
            id,
            path: path.to_path_buf(),
            size,
        });
        Ok(HeadlessHandle {
            id,
            kind,
            path: path.to_path_buf(),
        })
    }
}

impl MediaLoader for HeadlessPlatform {
    type Font = HeadlessHandle;
    type Image = HeadlessHandle;
    type Sound = HeadlessHandle;
    type Music = HeadlessHandle;

    fn load_font(&mut self, path: &Path, size: u32) -> Result<HeadlessHandle, String> {
        self.load(ResourceKind::Font, path, Some(size))
    }

    fn load_image(&mut self, path: &Path) -> Result<HeadlessHandle, String> {
        self.load(ResourceKind::Image, path, None)
    }

    fn load_sound(&mut self, path: &Path) -> Result<HeadlessHandle, String> {
        self.load(ResourceKind::Sound, path, None)
    }

    fn load_music(&mut self, path: &Path) -> Result<HeadlessHandle, String> {
        self.load(ResourceKind::Music, path, None)
    }

    fn release(&mut self, asset: Asset<Self>) -> Result<(), String> {
        let handle = match asset {
            Asset::Font(h) | Asset::Image(h) | Asset::Sound(h) | Asset::Music(h) => h,
        };
        self.calls.push(PlatformCall::Release {
            kind: handle.kind,
            id: handle.id,
        });
        if self.failing_releases.contains(&Self::file_name(&handle.path)) {
            return Err(format!("platform refused to free '{}'", handle.path.display()));
        }
        Ok(())
    }

    fn play_sound(&mut self, sound: &HeadlessHandle) {
        self.calls.push(PlatformCall::PlaySound { id: sound.id });
    }
}

impl Surface for HeadlessPlatform {
    fn image_size(&self, _image: &HeadlessHandle) -> (i32, i32) {
        self.image_size
    }

    fn draw_image(&mut self, image: &HeadlessHandle, x: i32, y: i32) {
        self.calls.push(PlatformCall::DrawImage { id: image.id, x, y });
    }

    fn draw_image_part(&mut self, image: &HeadlessHandle, src: Rect, x: i32, y: i32) {
        self.calls.push(PlatformCall::DrawImagePart {
            id: image.id,
            src,
            x,
            y,
        });
    }

    fn draw_text(&mut self, text: &str, _font: &HeadlessHandle, area: Rect, align: TextAlign) {
        self.calls.push(PlatformCall::DrawText {
            text: text.to_string(),
            area,
            align,
        });
    }

    fn refresh(&mut self) {
        self.calls.push(PlatformCall::Refresh);
    }

    fn clear(&mut self) {
        self.calls.push(PlatformCall::Clear);
    }

    fn resolution(&self) -> (i32, i32) {
        self.resolution
    }

    fn set_resolution(&mut self, width: i32, height: i32) {
        self.resolution = (width, height);
        self.calls.push(PlatformCall::SetResolution { width, height });
    }
}

impl EventPump for HeadlessPlatform {
    fn process_events(&mut self) {
        self.calls.push(PlatformCall::ProcessEvents);
    }
}

impl Timer for HeadlessPlatform {
    // The virtual clock has no event queue to drain, so waits record only
    // the delay itself.
    fn delay(&mut self, ms: u32) {
        self.elapsed_ms += ms as u64;
        self.calls.push(PlatformCall::Delay(ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique_and_non_zero() {
        let mut platform = HeadlessPlatform::new();
        let a = platform.load_image(Path::new("a.png")).unwrap();
        let b = platform.load_image(Path::new("b.png")).unwrap();
        assert_ne!(a.id, 0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_fail_load_matches_file_name() {
        let mut platform = HeadlessPlatform::new();
        platform.fail_load("broken.png");
        assert!(platform.load_image(Path::new("images/broken.png")).is_err());
        assert!(platform.load_image(Path::new("images/fine.png")).is_ok());
    }

    #[test]
    fn test_verifying_rejects_missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.wav");
        std::fs::write(&empty, b"").unwrap();
        let good = dir.path().join("good.wav");
        std::fs::write(&good, b"RIFF").unwrap();

        let mut platform = HeadlessPlatform::verifying();
        assert!(platform.load_sound(&dir.path().join("missing.wav")).is_err());
        assert!(platform.load_sound(&empty).is_err());
        assert!(platform.load_sound(&good).is_ok());
    }

    #[test]
    fn test_delay_advances_virtual_clock() {
        let mut platform = HeadlessPlatform::new();
        platform.delay(100);
        platform.delay(250);
        assert_eq!(platform.elapsed_ms(), 350);
        assert_eq!(platform.count(|c| matches!(c, PlatformCall::Delay(_))), 2);
    }
}
