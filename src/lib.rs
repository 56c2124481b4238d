//! Broadside resource layer.
//!
//! Loads the game's fonts, images, sounds and music once at startup behind a
//! loading screen, serves them by name for the life of the process and
//! releases them at shutdown. Exposed as a library for the binary and the
//! integration tests.

pub mod loading;
pub mod platform;
pub mod resources;
