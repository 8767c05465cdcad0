//! AI vs AI top-down shooter
//!
//! Per tick: steer -> spawn -> integrate -> collide -> prune. Every sub-step
//! runs under the shooter policy table, so a failing step is logged and the
//! rest of the tick still runs.

use glam::Vec2;
use rand::Rng;

use super::collision::resolve_shooter;
use super::entity::{Arena, Entity, Owner, Role};
use super::pipeline::{PolicyTable, Step};
use super::spawn::{Cooldown, FireBlocked, Shot, enemy_spawn_position, fire_at};
use super::state::{GameEvent, GamePhase, RngState};
use crate::config::ShooterConfig;
use crate::error::{GameError, StepError};
use crate::{clamp_per_axis, scale_to_length};

/// Input commands for a single shooter tick
#[derive(Debug, Clone, Copy, Default)]
pub struct ShooterInput {
    /// Start a new run from `GameOver`
    pub restart: bool,
}

/// Complete shooter game state
#[derive(Debug, Clone)]
pub struct ShooterGame {
    config: ShooterConfig,
    pub arena: Arena,
    pub player: Entity,
    /// Live enemies (sorted by id)
    pub enemies: Vec<Entity>,
    /// Live projectiles of both owners (sorted by id)
    pub projectiles: Vec<Entity>,
    pub score: u64,
    pub phase: GamePhase,
    pub time_ticks: u64,
    /// Ticks until the next enemy may spawn
    pub spawn_cooldown: Cooldown,
    rng: RngState,
    next_id: u32,
}

impl ShooterGame {
    /// Create a game and start the first run
    pub fn new(config: &ShooterConfig, seed: u64) -> Self {
        let arena = Arena::new(config.arena_width, config.arena_height);
        let mut game = Self {
            config: config.clone(),
            arena,
            player: Entity::centered(0, Role::Player, arena.center(), config.player_size),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            score: 0,
            phase: GamePhase::Setup,
            time_ticks: 0,
            spawn_cooldown: Cooldown::default(),
            rng: RngState::new(seed),
            next_id: 1,
        };
        game.reset();
        game
    }

    pub fn config(&self) -> &ShooterConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Setup -> Running: centered player, empty field, zero score
    pub fn reset(&mut self) {
        self.phase = GamePhase::Setup;

        let id = self.next_entity_id();
        self.player = Entity::centered(id, Role::Player, self.arena.center(), self.config.player_size);
        self.enemies.clear();
        self.projectiles.clear();
        self.score = 0;
        self.time_ticks = 0;
        self.spawn_cooldown.reset(self.config.enemy_spawn_interval);

        self.phase = GamePhase::Running;
        log::info!("Shooter run started");
    }

    /// Advance the game by one tick
    pub fn tick(&mut self, input: &ShooterInput) -> Result<Vec<GameEvent>, GameError> {
        let mut events = Vec::new();

        if self.phase == GamePhase::GameOver {
            if input.restart {
                self.reset();
                events.push(GameEvent::Restarted);
            }
            return Ok(events);
        }

        self.time_ticks += 1;
        let policy = PolicyTable::SHOOTER;
        policy.run(Step::Steer, || self.steer())?;
        policy.run(Step::Spawn, || {
            self.spawn(&mut events);
            Ok(())
        })?;
        policy.run(Step::Integrate, || self.integrate())?;
        policy.run(Step::Collide, || {
            self.collide(&mut events);
            Ok(())
        })?;
        policy.run(Step::Prune, || {
            self.prune();
            Ok(())
        })?;

        Ok(events)
    }

    /// Centroid of live enemies with finite positions
    pub fn enemy_centroid(&self) -> Option<Vec2> {
        let centers: Vec<Vec2> = self
            .enemies
            .iter()
            .filter(|e| e.alive)
            .map(Entity::center)
            .filter(|c| c.is_finite())
            .collect();
        if centers.is_empty() {
            return None;
        }
        Some(centers.iter().copied().sum::<Vec2>() / centers.len() as f32)
    }

    /// Center of the live enemy closest to the player
    pub fn nearest_enemy_center(&self) -> Option<Vec2> {
        let from = self.player.center();
        self.enemies
            .iter()
            .filter(|e| e.alive)
            .map(Entity::center)
            .filter(|c| c.is_finite())
            .min_by(|a, b| {
                a.distance_squared(from)
                    .partial_cmp(&b.distance_squared(from))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    pub fn live_projectiles(&self) -> usize {
        self.projectiles.iter().filter(|p| p.alive).count()
    }

    // --- Steer ---

    /// Enemies chase the player; the player chases the enemy centroid
    fn steer(&mut self) -> Result<(), StepError> {
        let target = self.player.center();
        if !target.is_finite() {
            return Err(StepError::NonFinite {
                id: self.player.id,
                pos: self.player.pos,
                vel: self.player.vel,
            });
        }

        let enemy_speed = self.config.enemy_speed;
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            enemy.vel = scale_to_length(target - enemy.center(), enemy_speed).unwrap_or(Vec2::ZERO);
        }

        let max_speed = self.config.player_max_speed;
        let desired = self
            .enemy_centroid()
            .and_then(|centroid| {
                scale_to_length(centroid - target, max_speed * self.config.player_ai_speed_factor)
            })
            .unwrap_or(Vec2::ZERO);
        let j = self.config.player_ai_jitter;
        let rng = self.rng.rng();
        let jitter = Vec2::new(rng.random_range(-j..=j), rng.random_range(-j..=j));
        self.player.vel = clamp_per_axis(desired + jitter, max_speed);
        Ok(())
    }

    // --- Spawn ---

    fn spawn(&mut self, events: &mut Vec<GameEvent>) {
        self.spawn_cooldown.tick();
        self.player.tick_cooldown();
        for enemy in &mut self.enemies {
            enemy.tick_cooldown();
        }

        if let Some(id) = self.spawn_enemy() {
            events.push(GameEvent::EnemySpawned { id });
        }

        match self.fire_player() {
            Ok(id) => events.push(GameEvent::ShotFired { id, by_player: true }),
            Err(FireBlocked::AtCapacity) => log::trace!("Player shot dropped: projectile cap"),
            Err(_) => {}
        }

        for idx in 0..self.enemies.len() {
            if let Ok(id) = self.fire_enemy(idx) {
                events.push(GameEvent::ShotFired { id, by_player: false });
            }
        }
    }

    /// Spawn one enemy on an edge if the timer has elapsed and there is room
    fn spawn_enemy(&mut self) -> Option<u32> {
        let live = self.enemies.iter().filter(|e| e.alive).count();
        if !self.spawn_cooldown.ready() || live >= self.config.max_enemies {
            return None;
        }

        let size = self.config.enemy_size;
        let pos = enemy_spawn_position(self.rng.rng(), &self.arena, size);
        let id = self.next_entity_id();
        let mut enemy = Entity::new(id, Role::Enemy, pos, size);
        enemy.cooldown = self.enemy_rearm();
        self.enemies.push(enemy);
        self.spawn_cooldown.reset(self.config.enemy_spawn_interval);

        log::debug!("Enemy {} spawned at {}", id, pos);
        Some(id)
    }

    /// Player shoots at the nearest enemy
    pub fn fire_player(&mut self) -> Result<u32, FireBlocked> {
        let target = self.nearest_enemy_center().ok_or(FireBlocked::NoTarget)?;
        self.check_projectile_cap()?;

        let shot = self.shot(Owner::Player, self.config.player_fire_cooldown);
        let projectile = fire_at(&mut self.player, target, shot)?;
        Ok(self.commit_projectile(projectile))
    }

    /// Enemy at `idx` shoots at the player
    pub fn fire_enemy(&mut self, idx: usize) -> Result<u32, FireBlocked> {
        if !self.enemies.get(idx).is_some_and(|e| e.alive && e.can_fire()) {
            return Err(FireBlocked::CoolingDown);
        }
        self.check_projectile_cap()?;

        let target = self.player.center();
        let rearm = self.enemy_rearm();
        let shot = self.shot(Owner::Enemy, rearm);
        let projectile = fire_at(&mut self.enemies[idx], target, shot)?;
        Ok(self.commit_projectile(projectile))
    }

    fn check_projectile_cap(&self) -> Result<(), FireBlocked> {
        if self.config.enforce_projectile_cap && self.live_projectiles() >= self.config.max_projectiles {
            return Err(FireBlocked::AtCapacity);
        }
        Ok(())
    }

    /// Shot parameters using the next free id (only consumed on success)
    fn shot(&self, owner: Owner, rearm: u32) -> Shot {
        Shot {
            id: self.next_id,
            owner,
            size: self.config.projectile_size,
            speed: self.config.projectile_speed,
            rearm,
        }
    }

    fn commit_projectile(&mut self, projectile: Entity) -> u32 {
        let id = self.next_entity_id();
        debug_assert_eq!(id, projectile.id);
        self.projectiles.push(projectile);
        id
    }

    /// Enemy fire cooldown, uniform in the configured range
    fn enemy_rearm(&mut self) -> u32 {
        let (min, max) = (self.config.enemy_fire_cooldown_min, self.config.enemy_fire_cooldown_max);
        self.rng.rng().random_range(min..=max)
    }

    // --- Integrate ---

    /// Move every live entity; entities with broken state are dropped
    fn integrate(&mut self) -> Result<(), StepError> {
        let mut first_err = None;

        if let Err(e) = self.player.integrate(&self.arena) {
            self.player.pos = self.arena.clamp(self.arena.center(), self.player.size);
            self.player.vel = Vec2::ZERO;
            first_err.get_or_insert(e);
        }
        for entity in self.enemies.iter_mut().chain(self.projectiles.iter_mut()) {
            if !entity.alive {
                continue;
            }
            if let Err(e) = entity.integrate(&self.arena) {
                entity.alive = false;
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // --- Collide ---

    fn collide(&mut self, events: &mut Vec<GameEvent>) {
        let outcome = resolve_shooter(&self.player, &mut self.enemies, &mut self.projectiles);

        for hit in outcome.hits {
            self.score += self.config.kill_score;
            events.push(GameEvent::EnemyDestroyed {
                enemy_id: hit.enemy_id,
                projectile_id: hit.projectile_id,
                score: self.score,
            });
        }

        if let Some(reason) = outcome.game_over {
            log::info!("Shooter run over: {:?}, score {}", reason, self.score);
            self.phase = GamePhase::GameOver;
            events.push(GameEvent::GameOver(reason));
        }
    }

    // --- Prune ---

    fn prune(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.projectiles.retain(|p| p.alive);
        self.normalize_order();
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}
