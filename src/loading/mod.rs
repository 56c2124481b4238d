//! The load pass and its loading screen.
//!
//! - `sequencer` – ordered load stages, abort on first failure
//! - `loadingscreen` – bootstrap resources and intro animation
//! - `progress` – progress bar drawn between stages
pub mod loadingscreen;
pub mod progress;
pub mod sequencer;
