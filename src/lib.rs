//! Arcade Duo - two single-screen arcade games on one tick core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, game state)
//! - `render`: Draws a simulation snapshot onto any `Surface`
//! - `platform`: Terminal display, input polling and frame pacing
//! - `app`: The single-threaded poll/update/draw/sleep loop
//! - `config`: Immutable game configuration loaded once at start

pub mod app;
pub mod config;
pub mod error;
pub mod platform;
pub mod render;
pub mod sim;

pub use config::{Config, ShooterConfig, SnakeConfig};
pub use error::{GameError, StepError};

use glam::Vec2;

/// Scale `v` to length `len`.
///
/// Returns `None` for a zero-length (or non-finite) vector, which has no
/// direction to scale along.
#[inline]
pub fn scale_to_length(v: Vec2, len: f32) -> Option<Vec2> {
    v.try_normalize().map(|dir| dir * len)
}

/// Clamp each component of `v` into `[-max, max]`
#[inline]
pub fn clamp_per_axis(v: Vec2, max: f32) -> Vec2 {
    v.clamp(Vec2::splat(-max), Vec2::splat(max))
}
