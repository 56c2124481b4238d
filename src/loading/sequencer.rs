//! Staged load pass.
//!
//! The manifest is turned into a fixed, ordered list of [`Stage`]s, one per
//! resource kind (fonts, images, sounds, music). [`LoadSequencer::run_all`]
//! drives them in order through a [`StageLoader`], reporting progress after
//! each one and pausing briefly so the loading screen can refresh.
//!
//! The pass stops at the first failing stage. Stages that completed before
//! it stay registered in the catalog; later stages never run. There is no
//! retry and no resume.

use arrayvec::ArrayVec;
use log::{debug, info, warn};

use crate::loading::progress::ProgressReporter;
use crate::platform::{Asset, MediaLoader, PathResolver, Timer, load_resolved};
use crate::resources::catalog::ResourceCatalog;
use crate::resources::error::ResourceError;
use crate::resources::kind::ResourceKind;
use crate::resources::lifecycle::ReleasePolicy;
use crate::resources::manifest::{Manifest, ManifestEntry};

/// Message shown once every stage has completed.
pub const LOADED_MESSAGE: &str = "Game loaded...";

/// One step of the load pass: every manifest entry of one kind.
#[derive(Debug, Clone, Copy)]
pub struct Stage<'m> {
    /// Zero-based position in the pass.
    pub index: usize,
    pub label: &'static str,
    pub kind: ResourceKind,
    pub entries: &'m [ManifestEntry],
}

fn stage_label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Font => "Loading fonts...",
        ResourceKind::Image => "Loading images...",
        ResourceKind::Sound => "Loading sounds...",
        ResourceKind::Music => "Loading music...",
    }
}

/// Loads the entries of one stage into the catalog.
pub trait StageLoader<P: MediaLoader> {
    fn load_stage(
        &mut self,
        platform: &mut P,
        stage: &Stage<'_>,
        catalog: &mut ResourceCatalog<P>,
    ) -> Result<(), ResourceError>;
}

/// Resolves each entry's file, loads it through the platform and registers
/// it under its manifest name.
///
/// A handle the catalog refuses is disposed of under `policy` before the
/// error is returned.
pub struct MediaStageLoader<'r, R: PathResolver + ?Sized> {
    resolver: &'r R,
    policy: &'r ReleasePolicy,
}

impl<'r, R: PathResolver + ?Sized> MediaStageLoader<'r, R> {
    pub fn new(resolver: &'r R, policy: &'r ReleasePolicy) -> Self {
        Self { resolver, policy }
    }

    fn load_entry<P: MediaLoader>(
        &self,
        platform: &mut P,
        kind: ResourceKind,
        entry: &ManifestEntry,
    ) -> Result<Asset<P>, ResourceError> {
        let file = entry.file.as_str();
        Ok(match kind {
            ResourceKind::Font => {
                let size = entry.size.ok_or_else(|| {
                    ResourceError::Manifest(format!("font '{}' has no size", entry.name))
                })?;
                Asset::Font(load_resolved(self.resolver, kind, file, |p| {
                    platform.load_font(p, size)
                })?)
            }
            ResourceKind::Image => Asset::Image(load_resolved(self.resolver, kind, file, |p| {
                platform.load_image(p)
            })?),
            ResourceKind::Sound => Asset::Sound(load_resolved(self.resolver, kind, file, |p| {
                platform.load_sound(p)
            })?),
            ResourceKind::Music => Asset::Music(load_resolved(self.resolver, kind, file, |p| {
                platform.load_music(p)
            })?),
        })
    }
}

impl<P: MediaLoader, R: PathResolver + ?Sized> StageLoader<P> for MediaStageLoader<'_, R> {
    fn load_stage(
        &mut self,
        platform: &mut P,
        stage: &Stage<'_>,
        catalog: &mut ResourceCatalog<P>,
    ) -> Result<(), ResourceError> {
        for entry in stage.entries {
            let asset = self.load_entry(platform, stage.kind, entry)?;
            if let Err(rejected) = catalog.register(entry.name.as_str(), asset) {
                if let Err(e) = self.policy.dispose(platform, &entry.name, rejected.asset) {
                    warn!("{}", e);
                }
                return Err(rejected.error);
            }
            debug!("Registered {} '{}' ({})", stage.kind, entry.name, entry.file);
        }
        Ok(())
    }
}

/// Ordered list of load stages built from a manifest.
pub struct LoadSequencer<'m> {
    stages: ArrayVec<Stage<'m>, 4>,
}

impl<'m> LoadSequencer<'m> {
    /// Stages in fixed order: fonts, images, sounds, music.
    pub fn new(manifest: &'m Manifest) -> Self {
        let stages = ResourceKind::ALL
            .iter()
            .enumerate()
            .map(|(index, &kind)| Stage {
                index,
                label: stage_label(kind),
                kind,
                entries: manifest.entries(kind),
            })
            .collect();
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage<'m>] {
        &self.stages
    }

    /// Run every stage in order.
    ///
    /// `progress` first receives 0 of `stages().len()` with the first
    /// stage's label. After stage `i` completes it receives `i + 1` with the
    /// next stage's label (or [`LOADED_MESSAGE`] after the last one), then
    /// the platform waits `pause_ms`. The first error aborts the pass and is
    /// returned.
    pub fn run_all<P, L, R>(
        &self,
        platform: &mut P,
        catalog: &mut ResourceCatalog<P>,
        loader: &mut L,
        progress: &mut R,
        pause_ms: u32,
    ) -> Result<(), ResourceError>
    where
        P: MediaLoader + Timer,
        L: StageLoader<P> + ?Sized,
        R: ProgressReporter<P> + ?Sized,
    {
        let total = self.stages.len();
        if let Some(first) = self.stages.first() {
            progress.report(platform, first.label, 0, total);
        }
        for stage in &self.stages {
            info!("{} ({} entries)", stage.label, stage.entries.len());
            loader.load_stage(platform, stage, catalog)?;

            let message = self
                .stages
                .get(stage.index + 1)
                .map_or(LOADED_MESSAGE, |next| next.label);
            progress.report(platform, message, stage.index + 1, total);
            platform.delay(pause_ms);
        }
        info!("Loaded {} resources in {} stages", catalog.total(), total);
        Ok(())
    }
}
