//! Platform capabilities consumed by the resource layer.
//!
//! The resource layer never talks to a window, GPU or audio device directly.
//! It goes through the traits below, which a platform adapter implements:
//!
//! - [`MediaLoader`] – load and release fonts, images, sounds and music
//! - [`Surface`] – draw images and text, flip the frame buffer, resize
//! - [`EventPump`] – drain pending input/window events without blocking
//! - [`Timer`] – wait while keeping the event queue drained
//! - [`PathResolver`] – map a (kind, file name) pair to a full path
//!
//! Adapters
//! - [`raylibplatform::RaylibPlatform`] – the desktop window
//! - [`headless::HeadlessPlatform`] – window-less, records every call
//! - [`assetpaths::AssetDirectory`] – on-disk resource folder layout

pub mod assetpaths;
pub mod headless;
pub mod raylibplatform;

use std::path::{Path, PathBuf};

use crate::resources::error::ResourceError;
use crate::resources::kind::ResourceKind;

/// A loaded handle tagged with its kind.
pub enum Asset<P: MediaLoader + ?Sized> {
    Font(P::Font),
    Image(P::Image),
    Sound(P::Sound),
    Music(P::Music),
}

impl<P: MediaLoader + ?Sized> Asset<P> {
    /// Kind of the wrapped handle.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Asset::Font(_) => ResourceKind::Font,
            Asset::Image(_) => ResourceKind::Image,
            Asset::Sound(_) => ResourceKind::Sound,
            Asset::Music(_) => ResourceKind::Music,
        }
    }
}

/// Loads and releases media handles.
///
/// Failures are reported as plain strings; the resource layer wraps them
/// into [`ResourceError`] together with the kind and path involved.
pub trait MediaLoader {
    type Font;
    type Image;
    type Sound;
    type Music;

    fn load_font(&mut self, path: &Path, size: u32) -> Result<Self::Font, String>;
    fn load_image(&mut self, path: &Path) -> Result<Self::Image, String>;
    fn load_sound(&mut self, path: &Path) -> Result<Self::Sound, String>;
    fn load_music(&mut self, path: &Path) -> Result<Self::Music, String>;

    /// Release a handle. The handle is consumed whether or not this succeeds.
    fn release(&mut self, asset: Asset<Self>) -> Result<(), String>;

    /// Play a sound effect once.
    fn play_sound(&mut self, sound: &Self::Sound);
}

/// Integer rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Horizontal alignment of text inside a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Drawing target.
///
/// Draw calls accumulate into the current frame; [`Surface::refresh`]
/// presents it.
pub trait Surface: MediaLoader {
    /// Width and height of an image in pixels.
    fn image_size(&self, image: &Self::Image) -> (i32, i32);
    fn draw_image(&mut self, image: &Self::Image, x: i32, y: i32);
    /// Draw the `src` region of an image with its top-left corner at (x, y).
    fn draw_image_part(&mut self, image: &Self::Image, src: Rect, x: i32, y: i32);
    fn draw_text(&mut self, text: &str, font: &Self::Font, area: Rect, align: TextAlign);
    /// Present the current frame.
    fn refresh(&mut self);
    fn clear(&mut self);
    fn resolution(&self) -> (i32, i32);
    fn set_resolution(&mut self, width: i32, height: i32);
}

/// Drains pending input and window events without blocking.
pub trait EventPump {
    fn process_events(&mut self);
}

/// Timed waits that keep the window responsive.
pub trait Timer: EventPump {
    /// Wait `ms` milliseconds, pumping events while waiting.
    fn delay(&mut self, ms: u32);
}

/// Everything the load pass needs from the platform.
pub trait Platform: Surface + Timer {}

impl<T: Surface + Timer> Platform for T {}

/// Maps a resource file name to a platform path.
pub trait PathResolver {
    fn resolve(&self, kind: ResourceKind, file: &str) -> Result<PathBuf, ResourceError>;
}

/// Resolve `file` and load it with `load`, wrapping failures in typed errors.
pub fn load_resolved<T>(
    resolver: &(impl PathResolver + ?Sized),
    kind: ResourceKind,
    file: &str,
    load: impl FnOnce(&Path) -> Result<T, String>,
) -> Result<T, ResourceError> {
    let path = resolver.resolve(kind, file)?;
    log::debug!("loading {} '{}'", kind, path.display());
    load(&path).map_err(|reason| ResourceError::Loader {
        kind,
        path: path.clone(),
        reason,
    })
}
