//! Broadside main entry point.
//!
//! Opens the game window, runs the loading screen while every asset of the
//! manifest is loaded, shows the title screen until the window is closed,
//! then frees all resources.
//!
//! Uses:
//! - **raylib** for windowing, graphics, and audio
//! - **configparser** for `config.ini`
//! - **serde_json** for optional manifest files
//!
//! # Running
//!
//! ```sh
//! cargo run --release
//! # validate assets without opening a window
//! cargo run --release -- --check --assets ./Resources
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use broadside::loading::loadingscreen::LoadingTimings;
use broadside::platform::assetpaths::AssetDirectory;
use broadside::platform::headless::HeadlessPlatform;
use broadside::platform::raylibplatform::RaylibPlatform;
use broadside::platform::Surface;
use broadside::resources::gameconfig::GameConfig;
use broadside::resources::gameresources::{GameResources, LoadSettings};
use broadside::resources::kind::ResourceKind;
use broadside::resources::manifest::Manifest;
use clap::Parser;
use raylib::core::audio::RaylibAudio;

/// Broadside
#[derive(Parser)]
#[command(version, about = "Battleships, with a proper loading screen.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// JSON manifest to load instead of the built-in asset list.
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Resource folder; overrides `[resources] root`.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Run the whole load sequence without a window, verifying every file,
    /// and exit.
    #[arg(long)]
    check: bool,

    /// Write the built-in manifest as JSON and exit.
    /// Optionally provide a path (default: manifest.json).
    #[arg(long, value_name = "PATH")]
    dump_manifest: Option<Option<PathBuf>>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Early-exit: write the built-in manifest and quit (no window/audio needed)
    if let Some(maybe_path) = cli.dump_manifest {
        let path = maybe_path.unwrap_or_else(|| PathBuf::from("manifest.json"));
        let written = Manifest::default()
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Manifest written to {}", path.display());
        return;
    }

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    if let Some(assets) = cli.assets {
        config.asset_root = assets;
    }

    let manifest = match cli.manifest {
        Some(path) => match Manifest::from_json_file(&path) {
            Ok(manifest) => manifest,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => Manifest::default(),
    };
    let resolver = AssetDirectory::new(&config.asset_root);

    if cli.check {
        check_assets(&config, manifest, &resolver);
    } else {
        run_game(&config, manifest, &resolver);
    }
}

/// Walk the load sequence headlessly and report what would happen.
fn check_assets(config: &GameConfig, manifest: Manifest, resolver: &AssetDirectory) {
    let (w, h) = config.window_size();
    let mut platform = HeadlessPlatform::verifying().with_resolution(w as i32, h as i32);
    let settings = LoadSettings {
        timings: LoadingTimings::instant(),
        ..LoadSettings::from_config(config)
    };
    let mut resources = GameResources::new(manifest, settings);

    if let Err(e) = resources.load_resources(&mut platform, resolver) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    for kind in ResourceKind::ALL {
        println!("{:>6}: {}", kind, resources.catalog().len(kind));
    }
    println!(
        "{} resources load cleanly from {}",
        resources.catalog().total(),
        resolver.root().display()
    );

    match resources.free_resources(&mut platform) {
        Ok(report) if report.is_clean() => {}
        Ok(report) => {
            for failure in &report.failures {
                eprintln!("Error: {failure}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run_game(config: &GameConfig, manifest: Manifest, resolver: &AssetDirectory) {
    log::info!("Broadside starting");
    let (w, h) = config.window_size();
    let (mut rl, thread) = raylib::init()
        .size(w as i32, h as i32)
        .title("Broadside")
        .build();
    rl.set_target_fps(config.target_fps);

    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            log::error!("Failed to initialize audio device: {}", e);
            std::process::exit(1);
        }
    };

    let mut platform = RaylibPlatform::new(rl, thread, &audio);
    let mut resources = GameResources::new(manifest, LoadSettings::from_config(config));
    if let Err(e) = resources.load_resources(&mut platform, resolver) {
        log::error!("Cannot start without all resources: {}", e);
        std::process::exit(1);
    }

    // --------------- Title screen ---------------
    if let Ok(music) = resources.music("Background") {
        music.play_stream();
    }
    while !platform.window_should_close() {
        if let Ok(music) = resources.music("Background") {
            music.update_stream();
        }
        platform.clear();
        if let Ok(menu) = resources.image("Menu") {
            platform.draw_image(menu, 0, 0);
        }
        platform.refresh();
    }

    match resources.free_resources(&mut platform) {
        Ok(report) => {
            for failure in &report.failures {
                log::warn!("{}", failure);
            }
        }
        Err(e) => log::error!("{}", e),
    }
}
