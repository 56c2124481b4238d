//! Shutdown of the resource catalog.
//!
//! [`LifecycleManager::free_all`] drains every cache of the catalog and hands
//! each handle back to the platform, exactly once. Kinds listed as
//! unreleasable in the [`ReleasePolicy`] are never passed to
//! [`MediaLoader::release`]: some audio backends fault when freeing sound
//! effects, so for those kinds the handle is leaked on purpose and counted
//! as skipped.

use log::{info, warn};
use smallvec::SmallVec;

use crate::platform::{Asset, MediaLoader};
use crate::resources::catalog::ResourceCatalog;
use crate::resources::error::ResourceError;
use crate::resources::kind::ResourceKind;

/// Which kinds may be handed back to the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleasePolicy {
    unreleasable: SmallVec<[ResourceKind; 4]>,
}

impl ReleasePolicy {
    /// Release every kind.
    pub fn release_all() -> Self {
        Self::default()
    }

    /// Release every kind except those in `kinds`.
    pub fn skipping(kinds: impl IntoIterator<Item = ResourceKind>) -> Self {
        let mut unreleasable = SmallVec::new();
        for kind in kinds {
            if !unreleasable.contains(&kind) {
                unreleasable.push(kind);
            }
        }
        Self { unreleasable }
    }

    pub fn releases(&self, kind: ResourceKind) -> bool {
        !self.unreleasable.contains(&kind)
    }

    /// Hand `asset` back to the platform, or forget it if its kind is
    /// unreleasable.
    ///
    /// Every handle leaving the resource layer goes through here, so the
    /// policy holds on error paths as well as at shutdown.
    pub fn dispose<P: MediaLoader + ?Sized>(
        &self,
        platform: &mut P,
        name: &str,
        asset: Asset<P>,
    ) -> Result<Disposal, ResourceError> {
        let kind = asset.kind();
        if !self.releases(kind) {
            std::mem::forget(asset);
            return Ok(Disposal::Skipped);
        }
        platform
            .release(asset)
            .map(|()| Disposal::Released)
            .map_err(|reason| ResourceError::Release {
                kind,
                name: name.to_string(),
                reason,
            })
    }

    /// [`dispose`](Self::dispose) each of `assets`, collecting the failures.
    pub fn dispose_all<P, N>(
        &self,
        platform: &mut P,
        assets: impl IntoIterator<Item = (N, Asset<P>)>,
    ) -> Vec<ResourceError>
    where
        P: MediaLoader + ?Sized,
        N: AsRef<str>,
    {
        let mut failures = Vec::new();
        for (name, asset) in assets {
            if let Err(e) = self.dispose(platform, name.as_ref(), asset) {
                failures.push(e);
            }
        }
        failures
    }
}

/// What [`ReleasePolicy::dispose`] did with a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposal {
    Released,
    Skipped,
}

/// Released and skipped handle counts of one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindTally {
    pub released: usize,
    pub skipped: usize,
}

/// Outcome of [`LifecycleManager::free_all`].
#[derive(Debug, Default)]
pub struct FreeReport {
    tallies: [KindTally; 4],
    /// Release failures; none of them stopped the remaining releases.
    pub failures: Vec<ResourceError>,
}

impl FreeReport {
    pub fn tally(&self, kind: ResourceKind) -> KindTally {
        self.tallies[kind.index()]
    }

    pub fn released(&self, kind: ResourceKind) -> usize {
        self.tallies[kind.index()].released
    }

    pub fn skipped(&self, kind: ResourceKind) -> usize {
        self.tallies[kind.index()].skipped
    }

    pub fn total_released(&self) -> usize {
        self.tallies.iter().map(|t| t.released).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.tallies.iter().map(|t| t.skipped).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Releases the catalog's handles at shutdown.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleManager<'a> {
    policy: &'a ReleasePolicy,
}

impl<'a> LifecycleManager<'a> {
    pub fn new(policy: &'a ReleasePolicy) -> Self {
        Self { policy }
    }

    /// Drain and release every handle in `catalog`, then retire it.
    ///
    /// Fails with [`ResourceError::LifecycleMisuse`] if the catalog was
    /// already freed. Release failures are collected in the report.
    pub fn free_all<P: MediaLoader>(
        &self,
        platform: &mut P,
        catalog: &mut ResourceCatalog<P>,
    ) -> Result<FreeReport, ResourceError> {
        if catalog.is_retired() {
            return Err(ResourceError::LifecycleMisuse(
                "resources were already freed".to_string(),
            ));
        }

        let mut report = FreeReport::default();
        for kind in ResourceKind::ALL {
            let entries = catalog.drain(kind);
            if !entries.is_empty() && !self.policy.releases(kind) {
                info!("Skipping release of {} {} handle(s)", entries.len(), kind);
            }

            let tally = &mut report.tallies[kind.index()];
            for (name, asset) in entries {
                match self.policy.dispose(platform, &name, asset) {
                    Ok(Disposal::Released) => tally.released += 1,
                    Ok(Disposal::Skipped) => tally.skipped += 1,
                    Err(e) => {
                        warn!("{}", e);
                        report.failures.push(e);
                    }
                }
            }
        }
        catalog.retire();

        info!(
            "Freed resources: {} released, {} skipped, {} failed",
            report.total_released(),
            report.total_skipped(),
            report.failures.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessPlatform, PlatformCall};
    use std::path::Path;

    fn filled_catalog(platform: &mut HeadlessPlatform) -> ResourceCatalog<HeadlessPlatform> {
        let mut catalog = ResourceCatalog::new();
        let font = platform.load_font(Path::new("a.ttf"), 12).unwrap();
        catalog.register("A", Asset::Font(font)).unwrap();
        for name in ["B", "C"] {
            let image = platform.load_image(Path::new(&format!("{}.png", name))).unwrap();
            catalog.register(name, Asset::Image(image)).unwrap();
        }
        for name in ["Hit", "Miss"] {
            let sound = platform.load_sound(Path::new(&format!("{}.wav", name))).unwrap();
            catalog.register(name, Asset::Sound(sound)).unwrap();
        }
        let music = platform.load_music(Path::new("bg.ogg")).unwrap();
        catalog.register("Background", Asset::Music(music)).unwrap();
        catalog
    }

    #[test]
    fn test_release_policy_dedups() {
        let policy = ReleasePolicy::skipping([ResourceKind::Sound, ResourceKind::Sound]);
        assert!(!policy.releases(ResourceKind::Sound));
        assert!(policy.releases(ResourceKind::Font));
        assert!(ReleasePolicy::release_all().releases(ResourceKind::Sound));
    }

    #[test]
    fn test_free_all_releases_each_handle_once() {
        let mut platform = HeadlessPlatform::new();
        let mut catalog = filled_catalog(&mut platform);
        platform.clear_calls();

        let policy = ReleasePolicy::release_all();
        let report = LifecycleManager::new(&policy)
            .free_all(&mut platform, &mut catalog)
            .unwrap();

        assert_eq!(report.total_released(), 6);
        assert_eq!(report.total_skipped(), 0);
        assert!(report.is_clean());
        let mut ids: Vec<u32> = platform
            .calls()
            .iter()
            .filter_map(|c| match c {
                PlatformCall::Release { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert!(catalog.is_retired());
        assert_eq!(catalog.total(), 0);
    }

    #[test]
    fn test_unreleasable_kind_is_skipped_not_released() {
        let mut platform = HeadlessPlatform::new();
        let mut catalog = filled_catalog(&mut platform);
        platform.clear_calls();

        let policy = ReleasePolicy::skipping([ResourceKind::Sound]);
        let report = LifecycleManager::new(&policy)
            .free_all(&mut platform, &mut catalog)
            .unwrap();

        assert_eq!(report.skipped(ResourceKind::Sound), 2);
        assert_eq!(report.released(ResourceKind::Sound), 0);
        assert_eq!(report.total_released(), 4);
        assert_eq!(
            platform.count(|c| matches!(
                c,
                PlatformCall::Release {
                    kind: ResourceKind::Sound,
                    ..
                }
            )),
            0
        );
    }

    #[test]
    fn test_release_failure_does_not_stop_the_rest() {
        let mut platform = HeadlessPlatform::new();
        let mut catalog = filled_catalog(&mut platform);
        platform.fail_release("B.png");
        platform.clear_calls();

        let policy = ReleasePolicy::release_all();
        let report = LifecycleManager::new(&policy)
            .free_all(&mut platform, &mut catalog)
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            &report.failures[0],
            ResourceError::Release { kind: ResourceKind::Image, name, .. } if name == "B"
        ));
        assert_eq!(report.total_released(), 5);
        assert_eq!(platform.count(|c| matches!(c, PlatformCall::Release { .. })), 6);
    }

    #[test]
    fn test_dispose_follows_policy() {
        let mut platform = HeadlessPlatform::new();
        let sound = platform.load_sound(Path::new("hit.wav")).unwrap();
        let image = platform.load_image(Path::new("menu.png")).unwrap();
        platform.clear_calls();

        let policy = ReleasePolicy::skipping([ResourceKind::Sound]);
        assert_eq!(
            policy.dispose(&mut platform, "Hit", Asset::Sound(sound)),
            Ok(Disposal::Skipped)
        );
        assert_eq!(
            policy.dispose(&mut platform, "Menu", Asset::Image(image)),
            Ok(Disposal::Released)
        );
        assert_eq!(platform.count(|c| matches!(c, PlatformCall::Release { .. })), 1);
    }

    #[test]
    fn test_dispose_all_collects_failures() {
        let mut platform = HeadlessPlatform::new();
        let a = platform.load_image(Path::new("a.png")).unwrap();
        let b = platform.load_image(Path::new("b.png")).unwrap();
        platform.fail_release("a.png");

        let failures = ReleasePolicy::release_all()
            .dispose_all(&mut platform, [("A", Asset::Image(a)), ("B", Asset::Image(b))]);
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            &failures[0],
            ResourceError::Release { kind: ResourceKind::Image, name, .. } if name == "A"
        ));
        assert_eq!(platform.count(|c| matches!(c, PlatformCall::Release { .. })), 2);
    }

    #[test]
    fn test_second_free_is_misuse() {
        let mut platform = HeadlessPlatform::new();
        let mut catalog = filled_catalog(&mut platform);
        let policy = ReleasePolicy::release_all();
        let manager = LifecycleManager::new(&policy);
        manager.free_all(&mut platform, &mut catalog).unwrap();
        assert!(matches!(
            manager.free_all(&mut platform, &mut catalog),
            Err(ResourceError::LifecycleMisuse(_))
        ));
    }
}
