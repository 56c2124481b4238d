//! The game's resource layer.
//!
//! Overview
//! - `kind` – the closed set of resource kinds
//! - `error` – error type shared by the whole layer
//! - `keyedcache` – generic name → handle cache
//! - `catalog` – one keyed cache per kind, the authoritative asset store
//! - `manifest` – static description of what gets loaded
//! - `gameconfig` – INI-backed settings (window, loading screen pacing, release policy)
//! - `lifecycle` – releases the catalog at shutdown
//! - `gameresources` – the single manager value the application holds
pub mod catalog;
pub mod error;
pub mod gameconfig;
pub mod gameresources;
pub mod keyedcache;
pub mod kind;
pub mod lifecycle;
pub mod manifest;
