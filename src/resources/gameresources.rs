//! Game resources.
//!
//! [`GameResources`] is the one value the application holds for all of its
//! media. It is constructed once with a manifest and settings, loaded once
//! at startup, read through the `font`/`image`/`sound`/`music` lookups for
//! the life of the process, and freed once at shutdown.
//!
//! Phases: `Unloaded` → `Loaded` (or `Failed`) → `Freed`. Calls out of that
//! order fail with [`ResourceError::LifecycleMisuse`].

use log::{error, info, warn};

use crate::loading::loadingscreen::{LoadingScreen, LoadingTimings};
use crate::loading::progress::BarLayout;
use crate::loading::sequencer::{LoadSequencer, MediaStageLoader};
use crate::platform::{EventPump, MediaLoader, PathResolver, Platform, Surface};
use crate::resources::catalog::ResourceCatalog;
use crate::resources::error::ResourceError;
use crate::resources::gameconfig::GameConfig;
use crate::resources::lifecycle::{FreeReport, LifecycleManager, ReleasePolicy};
use crate::resources::manifest::Manifest;

/// Where the resources are in their lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourcePhase {
    Unloaded,
    Loaded,
    Failed,
    Freed,
}

/// Everything that shapes the load pass besides the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSettings {
    /// Window size while the loading screen is up.
    pub loading_resolution: (i32, i32),
    pub timings: LoadingTimings,
    pub layout: BarLayout,
    pub release_policy: ReleasePolicy,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            loading_resolution: (800, 600),
            timings: LoadingTimings::default(),
            layout: BarLayout::default(),
            release_policy: ReleasePolicy::default(),
        }
    }
}

impl LoadSettings {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            loading_resolution: (config.loading_width as i32, config.loading_height as i32),
            timings: config.timings,
            layout: BarLayout::default(),
            release_policy: config.release_policy(),
        }
    }
}

/// All loaded media of the game, keyed by manifest name.
pub struct GameResources<P: MediaLoader> {
    manifest: Manifest,
    settings: LoadSettings,
    catalog: ResourceCatalog<P>,
    phase: ResourcePhase,
}

impl<P: MediaLoader> GameResources<P> {
    pub fn new(manifest: Manifest, settings: LoadSettings) -> Self {
        Self {
            manifest,
            settings,
            catalog: ResourceCatalog::new(),
            phase: ResourcePhase::Unloaded,
        }
    }

    pub fn phase(&self) -> ResourcePhase {
        self.phase
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn settings(&self) -> &LoadSettings {
        &self.settings
    }

    /// The underlying catalog, for inspection.
    pub fn catalog(&self) -> &ResourceCatalog<P> {
        &self.catalog
    }

    fn ensure_loaded(&self, what: &str) -> Result<(), ResourceError> {
        match self.phase {
            ResourcePhase::Loaded => Ok(()),
            phase => Err(ResourceError::LifecycleMisuse(format!(
                "{} requested while resources are {:?}",
                what, phase
            ))),
        }
    }

    pub fn font(&self, name: &str) -> Result<&P::Font, ResourceError> {
        self.ensure_loaded("font")?;
        self.catalog.font(name)
    }

    pub fn image(&self, name: &str) -> Result<&P::Image, ResourceError> {
        self.ensure_loaded("image")?;
        self.catalog.image(name)
    }

    pub fn sound(&self, name: &str) -> Result<&P::Sound, ResourceError> {
        self.ensure_loaded("sound")?;
        self.catalog.sound(name)
    }

    pub fn music(&self, name: &str) -> Result<&P::Music, ResourceError> {
        self.ensure_loaded("music")?;
        self.catalog.music(name)
    }
}

impl<P: Platform> GameResources<P> {
    /// Show the loading screen, load every manifest entry, close the
    /// loading screen.
    ///
    /// Any load failure aborts the pass, releases the loading screen,
    /// restores the original resolution and is returned; the game must not
    /// continue past it.
    pub fn load_resources<R: PathResolver + ?Sized>(
        &mut self,
        platform: &mut P,
        resolver: &R,
    ) -> Result<(), ResourceError> {
        if self.phase != ResourcePhase::Unloaded {
            return Err(ResourceError::LifecycleMisuse(format!(
                "load_resources called while resources are {:?}",
                self.phase
            )));
        }

        let (width, height) = platform.resolution();
        let (loading_w, loading_h) = self.settings.loading_resolution;
        platform.set_resolution(loading_w, loading_h);

        let policy = &self.settings.release_policy;
        let screen = match LoadingScreen::begin(platform, resolver, &self.manifest.bootstrap, policy)
        {
            Ok(screen) => screen,
            Err(e) => {
                error!("Loading screen failed to start: {}", e);
                platform.set_resolution(width, height);
                self.phase = ResourcePhase::Failed;
                return Err(e);
            }
        };
        let timings = self.settings.timings;
        screen.play_intro(platform, &timings);

        let sequencer = LoadSequencer::new(&self.manifest);
        let mut loader = MediaStageLoader::new(resolver, policy);
        let result = {
            let mut presenter = screen.presenter(self.settings.layout);
            sequencer.run_all(
                platform,
                &mut self.catalog,
                &mut loader,
                &mut presenter,
                timings.stage_pause_ms,
            )
        };

        match result {
            Ok(()) => {
                for failure in screen.end(platform, width, height, &timings, policy) {
                    warn!("{}", failure);
                }
                self.phase = ResourcePhase::Loaded;
                info!("Resources ready: {} entries", self.catalog.total());
                Ok(())
            }
            Err(e) => {
                error!("Loading aborted: {}", e);
                for failure in screen.abort(platform, policy) {
                    warn!("{}", failure);
                }
                platform.set_resolution(width, height);
                self.phase = ResourcePhase::Failed;
                Err(e)
            }
        }
    }

    /// Release every cached handle.
    ///
    /// Valid once, after [`load_resources`](Self::load_resources) returned
    /// (successfully or not). Release failures are contained in the report.
    pub fn free_resources(&mut self, platform: &mut P) -> Result<FreeReport, ResourceError> {
        match self.phase {
            ResourcePhase::Loaded | ResourcePhase::Failed => {}
            phase => {
                return Err(ResourceError::LifecycleMisuse(format!(
                    "free_resources called while resources are {:?}",
                    phase
                )));
            }
        }

        let report =
            LifecycleManager::new(&self.settings.release_policy).free_all(platform, &mut self.catalog)?;
        platform.process_events();
        self.phase = ResourcePhase::Freed;
        Ok(report)
    }
}
