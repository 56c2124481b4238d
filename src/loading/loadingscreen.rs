//! Loading screen.
//!
//! The loading screen owns a small bootstrap resource set (background,
//! intro animation strip, font, start sound and the two progress bar
//! images). It is loaded before the main catalog exists, used only while the
//! load pass runs, and released again before the game starts. None of its
//! handles ever enter the [`ResourceCatalog`](crate::resources::catalog::ResourceCatalog).
//!
//! Lifecycle: [`LoadingScreen::begin`] → [`LoadingScreen::play_intro`] →
//! progress via [`LoadingScreen::presenter`] → [`LoadingScreen::end`] (or
//! [`LoadingScreen::abort`] when the load pass failed).

use log::{info, warn};

use crate::loading::progress::{BarLayout, ProgressPresenter};
use crate::platform::{
    Asset, EventPump, MediaLoader, PathResolver, Platform, Rect, Surface, Timer, load_resolved,
};
use crate::resources::error::ResourceError;
use crate::resources::kind::ResourceKind;
use crate::resources::lifecycle::ReleasePolicy;
use crate::resources::manifest::BootstrapManifest;

/// Pacing of the loading screen, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingTimings {
    /// Wait after the start sound, before the first intro frame.
    pub lead_in_ms: u32,
    /// Number of intro animation frames.
    pub frame_count: u32,
    /// Wait per intro frame.
    pub frame_delay_ms: u32,
    /// Wait after the last intro frame.
    pub trailing_ms: u32,
    /// Pause after each load stage.
    pub stage_pause_ms: u32,
    /// Wait before the loading screen is torn down.
    pub end_delay_ms: u32,
}

impl Default for LoadingTimings {
    fn default() -> Self {
        Self {
            lead_in_ms: 1200,
            frame_count: 11,
            frame_delay_ms: 20,
            trailing_ms: 1500,
            stage_pause_ms: 100,
            end_delay_ms: 500,
        }
    }
}

impl LoadingTimings {
    /// Same frame count, no waits.
    pub fn instant() -> Self {
        Self {
            lead_in_ms: 0,
            frame_delay_ms: 0,
            trailing_ms: 0,
            stage_pause_ms: 0,
            end_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Total time [`LoadingScreen::play_intro`] waits.
    pub fn intro_duration_ms(&self) -> u64 {
        self.lead_in_ms as u64
            + self.frame_count as u64 * self.frame_delay_ms as u64
            + self.trailing_ms as u64
    }
}

/// Bootstrap resources of the loading screen.
pub struct LoadingScreen<P: MediaLoader> {
    background: P::Image,
    animation: P::Image,
    font: P::Font,
    start_sound: P::Sound,
    bar_empty: P::Image,
    bar_full: P::Image,
}

impl<P: Platform> LoadingScreen<P> {
    /// Load the bootstrap set.
    ///
    /// The background is shown as soon as it is loaded so the window is not
    /// blank while the rest of the set loads. If any file fails, the handles
    /// loaded so far are disposed of under `policy` before the error is
    /// returned.
    pub fn begin<R: PathResolver + ?Sized>(
        platform: &mut P,
        resolver: &R,
        files: &BootstrapManifest,
        policy: &ReleasePolicy,
    ) -> Result<Self, ResourceError> {
        let mut partial = PartialScreen::<P>::default();
        let error = match partial.load(platform, resolver, files) {
            Ok(()) => match partial.complete() {
                Ok(screen) => return Ok(screen),
                Err(rest) => {
                    partial = rest;
                    ResourceError::LifecycleMisuse("bootstrap set incomplete".to_string())
                }
            },
            Err(e) => e,
        };
        for failure in policy.dispose_all(platform, partial.into_assets()) {
            warn!("{}", failure);
        }
        Err(error)
    }

    /// Play the start sound and the intro animation.
    ///
    /// Pumps events once per frame; waits
    /// [`LoadingTimings::intro_duration_ms`] in total.
    pub fn play_intro(&self, platform: &mut P, timings: &LoadingTimings) {
        platform.play_sound(&self.start_sound);
        platform.delay(timings.lead_in_ms);

        let (screen_w, screen_h) = platform.resolution();
        let (strip_w, strip_h) = platform.image_size(&self.animation);
        // Wider counts than the strip leave cells zero pixels wide.
        let cell_w = match i32::try_from(timings.frame_count) {
            Ok(n) if n > 0 => strip_w / n,
            _ => 0,
        };

        for frame in 0..timings.frame_count {
            platform.draw_image(&self.background, 0, 0);
            let src_x = i32::try_from(frame).ok().and_then(|f| f.checked_mul(cell_w));
            if let (true, Some(src_x)) = (cell_w > 0, src_x) {
                platform.draw_image_part(
                    &self.animation,
                    Rect::new(src_x, 0, cell_w, strip_h),
                    (screen_w - cell_w) / 2,
                    (screen_h - strip_h) / 2,
                );
            }
            platform.delay(timings.frame_delay_ms);
            platform.refresh();
            platform.process_events();
        }

        platform.delay(timings.trailing_ms);
    }

    /// Progress bar drawn with this screen's bar images and font.
    pub fn presenter(&self, layout: BarLayout) -> ProgressPresenter<'_, P> {
        ProgressPresenter::new(&self.bar_empty, &self.bar_full, &self.font, layout)
    }

    /// Tear the screen down after a successful load and switch to
    /// `width` x `height`.
    ///
    /// Returns the release failures, if any.
    pub fn end(
        self,
        platform: &mut P,
        width: i32,
        height: i32,
        timings: &LoadingTimings,
        policy: &ReleasePolicy,
    ) -> Vec<ResourceError> {
        platform.process_events();
        platform.delay(timings.end_delay_ms);
        platform.clear();
        platform.refresh();
        let failures = self.release(platform, policy);
        platform.set_resolution(width, height);
        info!("Loading screen closed, resolution {}x{}", width, height);
        failures
    }

    /// Release the bootstrap set without the closing delay, after a failed
    /// load.
    pub fn abort(self, platform: &mut P, policy: &ReleasePolicy) -> Vec<ResourceError> {
        self.release(platform, policy)
    }

    fn release(self, platform: &mut P, policy: &ReleasePolicy) -> Vec<ResourceError> {
        if !policy.releases(ResourceKind::Sound) {
            info!("Skipping release of the loading start sound");
        }
        let LoadingScreen {
            background,
            animation,
            font,
            start_sound,
            bar_empty,
            bar_full,
        } = self;
        let assets = bootstrap_assets::<P>(
            Some(background),
            Some(animation),
            Some(font),
            Some(start_sound),
            Some(bar_empty),
            Some(bar_full),
        );
        policy.dispose_all(platform, assets)
    }
}

/// Bootstrap handles loaded so far by [`LoadingScreen::begin`].
struct PartialScreen<P: MediaLoader> {
    background: Option<P::Image>,
    animation: Option<P::Image>,
    font: Option<P::Font>,
    start_sound: Option<P::Sound>,
    bar_empty: Option<P::Image>,
    bar_full: Option<P::Image>,
}

impl<P: MediaLoader> Default for PartialScreen<P> {
    fn default() -> Self {
        Self {
            background: None,
            animation: None,
            font: None,
            start_sound: None,
            bar_empty: None,
            bar_full: None,
        }
    }
}

impl<P: Platform> PartialScreen<P> {
    fn load<R: PathResolver + ?Sized>(
        &mut self,
        platform: &mut P,
        resolver: &R,
        files: &BootstrapManifest,
    ) -> Result<(), ResourceError> {
        let background = load_resolved(resolver, ResourceKind::Image, &files.background, |p| {
            platform.load_image(p)
        })?;
        platform.draw_image(&background, 0, 0);
        platform.refresh();
        platform.process_events();
        self.background = Some(background);

        self.animation = Some(load_resolved(resolver, ResourceKind::Image, &files.animation, |p| {
            platform.load_image(p)
        })?);
        self.font = Some(load_resolved(resolver, ResourceKind::Font, &files.font, |p| {
            platform.load_font(p, files.font_size)
        })?);
        self.start_sound = Some(load_resolved(resolver, ResourceKind::Sound, &files.start_sound, |p| {
            platform.load_sound(p)
        })?);
        self.bar_full = Some(load_resolved(resolver, ResourceKind::Image, &files.bar_full, |p| {
            platform.load_image(p)
        })?);
        self.bar_empty = Some(load_resolved(resolver, ResourceKind::Image, &files.bar_empty, |p| {
            platform.load_image(p)
        })?);
        Ok(())
    }
}

impl<P: MediaLoader> PartialScreen<P> {
    /// The finished screen, or `self` back if a handle is missing.
    fn complete(self) -> Result<LoadingScreen<P>, Self> {
        match self {
            PartialScreen {
                background: Some(background),
                animation: Some(animation),
                font: Some(font),
                start_sound: Some(start_sound),
                bar_empty: Some(bar_empty),
                bar_full: Some(bar_full),
            } => Ok(LoadingScreen {
                background,
                animation,
                font,
                start_sound,
                bar_empty,
                bar_full,
            }),
            partial => Err(partial),
        }
    }

    fn into_assets(self) -> Vec<(&'static str, Asset<P>)> {
        bootstrap_assets::<P>(
            self.background,
            self.animation,
            self.font,
            self.start_sound,
            self.bar_empty,
            self.bar_full,
        )
    }
}

fn bootstrap_assets<P: MediaLoader>(
    background: Option<P::Image>,
    animation: Option<P::Image>,
    font: Option<P::Font>,
    start_sound: Option<P::Sound>,
    bar_empty: Option<P::Image>,
    bar_full: Option<P::Image>,
) -> Vec<(&'static str, Asset<P>)> {
    let mut assets = Vec::with_capacity(6);
    assets.extend(font.map(|h| ("loading font", Asset::Font(h))));
    assets.extend(background.map(|h| ("loading background", Asset::Image(h))));
    assets.extend(animation.map(|h| ("loading animation", Asset::Image(h))));
    assets.extend(bar_empty.map(|h| ("loading bar (empty)", Asset::Image(h))));
    assets.extend(bar_full.map(|h| ("loading bar (full)", Asset::Image(h))));
    assets.extend(start_sound.map(|h| ("loading start sound", Asset::Sound(h))));
    assets
}
