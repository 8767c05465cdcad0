//! Cooldown-gated spawning
//!
//! Food placement, enemy edge spawns and aimed projectile shots all share one
//! shape: emit an entity when allowed, then (re)arm a cooldown.

use glam::Vec2;
use rand::Rng;

use super::entity::{Arena, Entity, Owner, Role};
use super::grid::{Cell, Grid};
use crate::scale_to_length;

/// Random picks tried before falling back to scanning the free cells
const FOOD_RANDOM_ATTEMPTS: usize = 64;

/// A countdown gating the next spawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cooldown {
    remaining: u32,
}

impl Cooldown {
    pub fn new(ticks: u32) -> Self {
        Self { remaining: ticks }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn reset(&mut self, ticks: u32) {
        self.remaining = ticks;
    }
}

/// Pick a food cell uniformly among cells not in `occupied`
///
/// Rejection-samples first; if the board is nearly full, picks uniformly from
/// the remaining free cells instead. `None` when no cell is free.
pub fn place_food<R: Rng>(
    rng: &mut R,
    grid: &Grid,
    is_occupied: impl Fn(Cell) -> bool,
) -> Option<Cell> {
    for _ in 0..FOOD_RANDOM_ATTEMPTS {
        let cell = Cell::new(rng.random_range(0..grid.width), rng.random_range(0..grid.height));
        if !is_occupied(cell) {
            return Some(cell);
        }
    }

    let free: Vec<Cell> = grid.cells().filter(|&c| !is_occupied(c)).collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.random_range(0..free.len())])
    }
}

/// Top-left position for an enemy entering from a random edge
///
/// The enemy starts one body-size outside the visible bound, at a uniform
/// point along the chosen edge.
pub fn enemy_spawn_position<R: Rng>(rng: &mut R, arena: &Arena, size: f32) -> Vec2 {
    let along_x = rng.random_range(0.0..=(arena.width - size).max(0.0));
    let along_y = rng.random_range(0.0..=(arena.height - size).max(0.0));
    match rng.random_range(0..4u8) {
        0 => Vec2::new(along_x, -size),
        1 => Vec2::new(arena.width, along_y),
        2 => Vec2::new(along_x, arena.height),
        _ => Vec2::new(-size, along_y),
    }
}

/// Why a shot was not fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireBlocked {
    /// Shooter cooldown has not elapsed
    CoolingDown,
    /// Target center equals shooter center; there is no direction to aim
    ZeroAim,
    /// Projectile cap reached
    AtCapacity,
    /// Nothing to aim at
    NoTarget,
}

/// Parameters of one aimed shot
#[derive(Debug, Clone, Copy)]
pub struct Shot {
    pub id: u32,
    pub owner: Owner,
    pub size: f32,
    pub speed: f32,
    /// Cooldown armed on the shooter after a successful shot
    pub rearm: u32,
}

/// Fire from `shooter`'s center toward `target`
///
/// On success the shooter's cooldown is re-armed. A blocked shot leaves the
/// shooter untouched, so a zero-length aim retries on the next tick.
pub fn fire_at(shooter: &mut Entity, target: Vec2, shot: Shot) -> Result<Entity, FireBlocked> {
    if !shooter.can_fire() {
        return Err(FireBlocked::CoolingDown);
    }
    let origin = shooter.center();
    let vel = scale_to_length(target - origin, shot.speed).ok_or(FireBlocked::ZeroAim)?;

    let mut projectile = Entity::centered(shot.id, Role::Projectile { owner: shot.owner }, origin, shot.size);
    projectile.vel = vel;
    shooter.cooldown = shot.rearm;
    Ok(projectile)
}
