//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod grid;
pub mod pipeline;
pub mod shooter;
pub mod snake;
pub mod spawn;
pub mod state;

pub use collision::{CollisionOutcome, Hit, head_hits_body, resolve_shooter};
pub use entity::{Arena, Boundary, Entity, Owner, Rect, Role};
pub use grid::{Cell, Direction, Grid};
pub use pipeline::{FailurePolicy, PolicyTable, Step};
pub use shooter::{ShooterGame, ShooterInput};
pub use snake::{SnakeGame, SnakeInput};
pub use spawn::{Cooldown, FireBlocked, Shot, enemy_spawn_position, fire_at, place_food};
pub use state::{GameEvent, GameOverReason, GamePhase, RngState};
