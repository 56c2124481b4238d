//! End-to-end tests of the load → lookup → free lifecycle on the headless
//! platform.

use std::fs;
use std::path::{Path, PathBuf};

use broadside::loading::loadingscreen::LoadingTimings;
use broadside::loading::sequencer::LOADED_MESSAGE;
use broadside::platform::{PathResolver, Surface};
use broadside::platform::assetpaths::AssetDirectory;
use broadside::platform::headless::{HeadlessPlatform, PlatformCall};
use broadside::resources::error::ResourceError;
use broadside::resources::gameresources::{GameResources, LoadSettings, ResourcePhase};
use broadside::resources::kind::ResourceKind;
use broadside::resources::lifecycle::ReleasePolicy;
use broadside::resources::manifest::{Manifest, ManifestEntry};

/// Resolver that maps every file to itself.
struct FlatResolver;

impl PathResolver for FlatResolver {
    fn resolve(&self, _kind: ResourceKind, file: &str) -> Result<PathBuf, ResourceError> {
        Ok(PathBuf::from(file))
    }
}

fn instant_settings() -> LoadSettings {
    LoadSettings {
        timings: LoadingTimings::instant(),
        ..LoadSettings::default()
    }
}

fn two_entry_manifest() -> Manifest {
    let mut manifest = Manifest::empty();
    manifest.fonts = vec![ManifestEntry::font("A", "a.ttf", 12)];
    manifest.images = vec![ManifestEntry::new("B", "b.png")];
    manifest
}

fn progress_messages(platform: &HeadlessPlatform) -> Vec<String> {
    platform
        .calls()
        .iter()
        .filter_map(|c| match c {
            PlatformCall::DrawText { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn two_entry_manifest_loads_looks_up_and_frees() {
    let mut platform = HeadlessPlatform::new();
    let mut resources = GameResources::new(two_entry_manifest(), instant_settings());

    resources
        .load_resources(&mut platform, &FlatResolver)
        .unwrap();
    assert_eq!(resources.phase(), ResourcePhase::Loaded);
    assert_eq!(resources.catalog().total(), 2);

    let font = resources.font("A").unwrap();
    assert_ne!(font.id, 0);
    assert_eq!(font.path, PathBuf::from("a.ttf"));
    let image = resources.image("B").unwrap();
    assert_ne!(image.id, 0);
    assert_ne!(image.id, font.id);
    assert_eq!(image.path, PathBuf::from("b.png"));

    let report = resources.free_resources(&mut platform).unwrap();
    assert_eq!(report.total_released(), 2);
    assert!(report.is_clean());
    assert_eq!(resources.phase(), ResourcePhase::Freed);

    assert!(matches!(
        resources.font("A"),
        Err(ResourceError::LifecycleMisuse(_))
    ));
}

#[test]
fn unknown_names_fail_for_every_kind() {
    let mut platform = HeadlessPlatform::new();
    let mut resources = GameResources::new(two_entry_manifest(), instant_settings());
    resources
        .load_resources(&mut platform, &FlatResolver)
        .unwrap();

    assert!(matches!(
        resources.font("Missing"),
        Err(ResourceError::UnknownResource { kind: ResourceKind::Font, .. })
    ));
    assert!(matches!(
        resources.image("A"),
        Err(ResourceError::UnknownResource { kind: ResourceKind::Image, .. })
    ));
    assert!(matches!(
        resources.sound("Hit"),
        Err(ResourceError::UnknownResource { kind: ResourceKind::Sound, .. })
    ));
    assert!(matches!(
        resources.music("Background"),
        Err(ResourceError::UnknownResource { kind: ResourceKind::Music, .. })
    ));
}

#[test]
fn progress_is_reported_after_every_stage() {
    let mut platform = HeadlessPlatform::new();
    let mut resources = GameResources::new(Manifest::default(), instant_settings());
    resources
        .load_resources(&mut platform, &FlatResolver)
        .unwrap();

    assert_eq!(
        progress_messages(&platform),
        vec![
            "Loading fonts...",
            "Loading images...",
            "Loading sounds...",
            "Loading music...",
            LOADED_MESSAGE,
        ]
    );

    // The filled part of the bar only ever grows.
    let widths: Vec<i32> = platform
        .calls()
        .iter()
        .filter_map(|c| match c {
            PlatformCall::DrawImagePart { src, y: 453, .. } => Some(src.width),
            _ => None,
        })
        .collect();
    assert_eq!(widths.len(), 4);
    assert!(widths.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(widths.last(), Some(&260));
}

#[test]
fn failed_image_stage_stops_sounds_and_music() {
    let mut manifest = Manifest::default();
    manifest.images[3].file = "corrupt.png".to_string();
    let mut platform = HeadlessPlatform::new().with_resolution(1024, 768);
    platform.fail_load("corrupt.png");
    let mut resources = GameResources::new(manifest, instant_settings());

    let err = resources
        .load_resources(&mut platform, &FlatResolver)
        .unwrap_err();
    assert!(matches!(err, ResourceError::Loader { kind: ResourceKind::Image, .. }));
    assert_eq!(resources.phase(), ResourcePhase::Failed);

    let catalog = resources.catalog();
    assert_eq!(catalog.len(ResourceKind::Font), 4);
    assert_eq!(catalog.len(ResourceKind::Image), 3);
    assert_eq!(catalog.len(ResourceKind::Sound), 0);
    assert_eq!(catalog.len(ResourceKind::Music), 0);
    assert_eq!(
        progress_messages(&platform),
        vec!["Loading fonts...", "Loading images..."]
    );

    // No sound or music file was ever opened.
    assert_eq!(
        platform.count(|c| matches!(
            c,
            PlatformCall::Load {
                kind: ResourceKind::Music,
                ..
            }
        )),
        0
    );
    // Only the loading screen's start sound.
    assert_eq!(
        platform.count(|c| matches!(
            c,
            PlatformCall::Load {
                kind: ResourceKind::Sound,
                ..
            }
        )),
        1
    );
    assert_eq!(platform.resolution(), (1024, 768));

    // Lookups are refused, but the partial catalog can still be freed.
    assert!(matches!(
        resources.font("Courier"),
        Err(ResourceError::LifecycleMisuse(_))
    ));
    let report = resources.free_resources(&mut platform).unwrap();
    assert_eq!(report.total_released(), 7);
}

#[test]
fn unreleasable_sounds_are_skipped_everywhere() {
    let mut platform = HeadlessPlatform::new();
    let settings = LoadSettings {
        release_policy: ReleasePolicy::skipping([ResourceKind::Sound]),
        ..instant_settings()
    };
    let mut resources = GameResources::new(Manifest::default(), settings);
    resources
        .load_resources(&mut platform, &FlatResolver)
        .unwrap();
    let report = resources.free_resources(&mut platform).unwrap();

    assert_eq!(report.skipped(ResourceKind::Sound), 7);
    assert_eq!(report.released(ResourceKind::Sound), 0);
    assert_eq!(report.released(ResourceKind::Font), 4);
    assert_eq!(report.released(ResourceKind::Image), 20);
    assert_eq!(report.released(ResourceKind::Music), 1);
    // Neither the catalog's sounds nor the loading screen's start sound.
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
fn duplicate_name_handle_is_released() {
    let mut manifest = two_entry_manifest();
    manifest.images.push(ManifestEntry::new("B", "c.png"));
    let mut platform = HeadlessPlatform::new();
    let mut resources = GameResources::new(manifest, instant_settings());

    let err = resources
        .load_resources(&mut platform, &FlatResolver)
        .unwrap_err();
    assert!(matches!(
        err,
        ResourceError::DuplicateName { kind: ResourceKind::Image, .. }
    ));
    let report = resources.free_resources(&mut platform).unwrap();
    assert_eq!(report.total_released(), 2);

    let loads = platform.count(|c| matches!(c, PlatformCall::Load { .. }));
    let releases = platform.count(|c| matches!(c, PlatformCall::Release { .. }));
    assert_eq!(loads, 9);
    assert_eq!(releases, loads);
}

#[test]
fn failed_bootstrap_accounts_for_every_handle() {
    let mut platform = HeadlessPlatform::new();
    platform.fail_load("loader_empty.png");
    let settings = LoadSettings {
        release_policy: ReleasePolicy::skipping([ResourceKind::Sound]),
        ..instant_settings()
    };
    let mut resources = GameResources::new(two_entry_manifest(), settings);

    assert!(resources.load_resources(&mut platform, &FlatResolver).is_err());
    // Five bootstrap files loaded; the start sound is kept, the rest freed.
    assert_eq!(platform.count(|c| matches!(c, PlatformCall::Load { .. })), 5);
    assert_eq!(platform.count(|c| matches!(c, PlatformCall::Release { .. })), 4);
}

#[test]
fn second_free_is_misuse() {
    let mut platform = HeadlessPlatform::new();
    let mut resources = GameResources::new(two_entry_manifest(), instant_settings());
    resources
        .load_resources(&mut platform, &FlatResolver)
        .unwrap();
    resources.free_resources(&mut platform).unwrap();
    assert!(matches!(
        resources.free_resources(&mut platform),
        Err(ResourceError::LifecycleMisuse(_))
    ));
}

#[test]
fn default_timings_add_up() {
    let mut platform = HeadlessPlatform::new();
    let settings = LoadSettings::default();
    let mut resources = GameResources::new(two_entry_manifest(), settings);
    resources
        .load_resources(&mut platform, &FlatResolver)
        .unwrap();

    let timings = LoadingTimings::default();
    let expected = timings.intro_duration_ms()
        + 4 * timings.stage_pause_ms as u64
        + timings.end_delay_ms as u64;
    assert_eq!(platform.elapsed_ms(), expected);
}

fn write_asset(root: &Path, kind: ResourceKind, file: &str) {
    let dir = root.join(AssetDirectory::subdirectory(kind));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), b"data").unwrap();
}

fn write_bootstrap(root: &Path, manifest: &Manifest) {
    let b = &manifest.bootstrap;
    for file in [&b.background, &b.animation, &b.bar_empty, &b.bar_full] {
        write_asset(root, ResourceKind::Image, file);
    }
    write_asset(root, ResourceKind::Font, &b.font);
    write_asset(root, ResourceKind::Sound, &b.start_sound);
}

#[test]
fn asset_directory_check_passes_with_every_file_present() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = two_entry_manifest();
    write_bootstrap(dir.path(), &manifest);
    write_asset(dir.path(), ResourceKind::Font, "a.ttf");
    write_asset(dir.path(), ResourceKind::Image, "b.png");

    let mut platform = HeadlessPlatform::verifying();
    let mut resources = GameResources::new(manifest, instant_settings());
    resources
        .load_resources(&mut platform, &AssetDirectory::new(dir.path()))
        .unwrap();
    assert_eq!(
        resources.image("B").unwrap().path,
        dir.path().join("images").join("b.png")
    );
}

#[test]
fn asset_directory_check_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = two_entry_manifest();
    write_bootstrap(dir.path(), &manifest);
    write_asset(dir.path(), ResourceKind::Font, "a.ttf");

    let mut platform = HeadlessPlatform::verifying();
    let mut resources = GameResources::new(manifest, instant_settings());
    let err = resources
        .load_resources(&mut platform, &AssetDirectory::new(dir.path()))
        .unwrap_err();
    match err {
        ResourceError::PathResolution { kind, file, .. } => {
            assert_eq!(kind, ResourceKind::Image);
            assert_eq!(file, "b.png");
        }
        other => panic!("expected PathResolution, got {:?}", other),
    }
}

#[test]
fn json_manifest_drives_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("manifest.json");
    fs::write(
        &manifest_path,
        r#"{
            "fonts": [{ "name": "Title", "file": "title.ttf", "size": 40 }],
            "sounds": [{ "name": "Hit", "file": "hit.wav" }]
        }"#,
    )
    .unwrap();

    let manifest = Manifest::from_json_file(&manifest_path).unwrap();
    let mut platform = HeadlessPlatform::new();
    let mut resources = GameResources::new(manifest, instant_settings());
    resources
        .load_resources(&mut platform, &FlatResolver)
        .unwrap();
    assert!(resources.font("Title").is_ok());
    assert!(resources.sound("Hit").is_ok());
    assert_eq!(resources.catalog().total(), 2);
}
