//! Shared game state types
//!
//! Phase machine, tick events and the seeded RNG wrapper used by both games.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Current phase of a run
///
/// `Setup` is transient: a reset passes through it and lands in `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Collections and timers being (re)initialized
    Setup,
    /// Active gameplay
    Running,
    /// Run ended; only restart input is processed
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Snake head entered its own body
    SelfCollision,
    /// No free cell left for food
    BoardFull,
    /// Player touched an enemy
    PlayerRammed { enemy_id: u32 },
    /// Player was hit by an enemy projectile
    PlayerShot { projectile_id: u32 },
}

/// Something that happened during a tick (for logging/HUD, not state)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Restarted,
    FoodEaten { score: u64, length: usize },
    EnemySpawned { id: u32 },
    ShotFired { id: u32, by_player: bool },
    EnemyDestroyed { enemy_id: u32, projectile_id: u32, score: u64 },
    GameOver(GameOverReason),
}

/// Seeded RNG plus the seed it came from
#[derive(Debug, Clone)]
pub struct RngState {
    pub seed: u64,
    rng: Pcg32,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}
