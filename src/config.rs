//! Game configuration
//!
//! Built once at process start and passed by reference to every component.
//! Loaded from the JSON file named by `ARCADE_CONFIG`, defaults otherwise.
//! Every field is optional in the file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV: &str = "ARCADE_CONFIG";

/// Grid snake settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Grid width in cells
    pub grid_width: i32,
    /// Grid height in cells
    pub grid_height: i32,
    /// Pixel size of one cell (world units for rendering)
    pub cell_size: f32,
    /// Simulation ticks per second
    pub tick_hz: u32,
    /// Body length at the start of a run
    pub initial_length: usize,
    /// Score awarded per food
    pub food_score: u64,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            grid_width: 32,
            grid_height: 24,
            cell_size: 20.0,
            tick_hz: 10,
            initial_length: 3,
            food_score: 10,
        }
    }
}

impl SnakeConfig {
    pub fn world_size(&self) -> (f32, f32) {
        (
            self.grid_width as f32 * self.cell_size,
            self.grid_height as f32 * self.cell_size,
        )
    }
}

/// AI vs AI shooter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Simulation ticks per second
    pub tick_hz: u32,

    // === Player ===
    pub player_size: f32,
    /// Per-axis speed cap (units per tick)
    pub player_max_speed: f32,
    /// Fraction of max speed the autopilot steers with
    pub player_ai_speed_factor: f32,
    /// Max random jitter added to each velocity axis per tick
    pub player_ai_jitter: f32,
    /// Ticks between player shots
    pub player_fire_cooldown: u32,

    // === Enemies ===
    pub enemy_size: f32,
    pub enemy_speed: f32,
    pub max_enemies: usize,
    /// Ticks between enemy spawns
    pub enemy_spawn_interval: u32,
    /// Enemy shot cooldown, sampled uniformly from `[min, max]` after each shot
    pub enemy_fire_cooldown_min: u32,
    pub enemy_fire_cooldown_max: u32,

    // === Projectiles ===
    pub projectile_size: f32,
    pub projectile_speed: f32,
    pub max_projectiles: usize,
    /// Reject new shots once `max_projectiles` are alive
    pub enforce_projectile_cap: bool,

    /// Score awarded per enemy destroyed
    pub kill_score: u64,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,
            tick_hz: 60,

            player_size: 30.0,
            player_max_speed: 5.0,
            player_ai_speed_factor: 0.7,
            player_ai_jitter: 0.5,
            player_fire_cooldown: 15,

            enemy_size: 25.0,
            enemy_speed: 2.0,
            max_enemies: 15,
            enemy_spawn_interval: 60,
            enemy_fire_cooldown_min: 60,
            enemy_fire_cooldown_max: 120,

            projectile_size: 6.0,
            projectile_speed: 8.0,
            max_projectiles: 10,
            enforce_projectile_cap: true,

            kill_score: 10,
        }
    }
}

/// Complete configuration for both games
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fixed RNG seed; a random one is drawn at start when absent
    pub seed: Option<u64>,
    pub snake: SnakeConfig,
    pub shooter: ShooterConfig,
}

impl Config {
    /// Load from `ARCADE_CONFIG` if set, otherwise defaults
    pub fn load() -> Result<Self, GameError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                log::info!("Using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| GameError::Init(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config document
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GameError::Init(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        let invalid = |msg: &str| Err(GameError::Init(format!("invalid config: {msg}")));

        let s = &self.snake;
        if s.grid_width <= 0 || s.grid_height <= 0 {
            return invalid("snake grid must have positive dimensions");
        }
        if s.tick_hz == 0 {
            return invalid("snake.tick_hz must be > 0");
        }
        if s.initial_length == 0 || s.initial_length > s.grid_width as usize {
            return invalid("snake.initial_length must fit in one grid row");
        }
        if !(s.cell_size > 0.0) {
            return invalid("snake.cell_size must be > 0");
        }

        let sh = &self.shooter;
        if sh.tick_hz == 0 {
            return invalid("shooter.tick_hz must be > 0");
        }
        for (name, size) in [
            ("player_size", sh.player_size),
            ("enemy_size", sh.enemy_size),
            ("projectile_size", sh.projectile_size),
        ] {
            if !(size > 0.0) || size >= sh.arena_width || size >= sh.arena_height {
                return invalid(&format!("shooter.{name} must be positive and fit the arena"));
            }
        }
        if !(sh.projectile_speed > 0.0) || !(sh.enemy_speed >= 0.0) || !(sh.player_max_speed >= 0.0) {
            return invalid("shooter speeds must be finite and non-negative");
        }
        if !(sh.player_ai_jitter >= 0.0) {
            return invalid("shooter.player_ai_jitter must be >= 0");
        }
        if sh.enemy_fire_cooldown_min > sh.enemy_fire_cooldown_max {
            return invalid("shooter enemy fire cooldown range is empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Config::default().validate().unwrap();
        assert_eq!(Config::default().shooter.max_enemies, 15);
        assert_eq!(Config::default().shooter.max_projectiles, 10);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "seed": 7, "snake": { "grid_width": 10 } }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.snake.grid_width, 10);
        assert_eq!(config.snake.grid_height, SnakeConfig::default().grid_height);
        assert_eq!(config.shooter, ShooterConfig::default());
    }

    #[test]
    fn test_rejects_zero_grid() {
        let err = Config::from_json(r#"{ "snake": { "grid_height": 0 } }"#).unwrap_err();
        assert!(matches!(err, GameError::Init(_)));
    }

    #[test]
    fn test_rejects_empty_cooldown_range() {
        let mut config = Config::default();
        config.shooter.enemy_fire_cooldown_min = 10;
        config.shooter.enemy_fire_cooldown_max = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(Config::from_json("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_is_init_error() {
        let err = Config::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, GameError::Init(_)));
    }
}
