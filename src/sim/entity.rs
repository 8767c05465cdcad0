//! Movable bounding-box actors for the continuous arena
//!
//! One tagged entity type covers the player, enemies and projectiles. The
//! role decides the boundary policy; everything else is shared.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::StepError;

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Entity role tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Enemy,
    Projectile { owner: Owner },
}

/// What happens at the arena edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Clamp into `[0, bound - size]`
    Clamp,
    /// Die once the box is no longer fully inside the arena
    Expire,
}

impl Role {
    pub fn boundary(&self) -> Boundary {
        match self {
            Role::Player | Role::Enemy => Boundary::Clamp,
            Role::Projectile { .. } => Boundary::Expire,
        }
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn square(min: Vec2, side: f32) -> Self {
        Self::new(min, Vec2::splat(side))
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap; boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// Continuous bounded plane `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// Clamp a top-left position so a box of `size` stays inside
    pub fn clamp(&self, pos: Vec2, size: f32) -> Vec2 {
        let max = Vec2::new(self.width - size, self.height - size).max(Vec2::ZERO);
        pos.clamp(Vec2::ZERO, max)
    }

    /// Whether the box lies fully inside the arena
    pub fn contains(&self, rect: &Rect) -> bool {
        let max = rect.max();
        rect.min.x >= 0.0 && rect.min.y >= 0.0 && max.x <= self.width && max.y <= self.height
    }
}

/// A movable, collidable actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub role: Role,
    /// Top-left corner
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    /// Side length of the bounding square
    pub size: f32,
    pub alive: bool,
    /// Ticks until this entity may fire again
    pub cooldown: u32,
}

impl Entity {
    pub fn new(id: u32, role: Role, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            role,
            pos,
            vel: Vec2::ZERO,
            size,
            alive: true,
            cooldown: 0,
        }
    }

    /// Entity whose box is centered on `center`
    pub fn centered(id: u32, role: Role, center: Vec2, size: f32) -> Self {
        Self::new(id, role, center - Vec2::splat(size * 0.5), size)
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn is_projectile_of(&self, owner: Owner) -> bool {
        self.role == Role::Projectile { owner }
    }

    /// Count the fire cooldown down by one tick
    pub fn tick_cooldown(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown == 0
    }

    /// Advance one tick: add velocity, then apply the role's boundary policy
    ///
    /// A no-op under zero velocity for entities already inside the arena.
    pub fn integrate(&mut self, arena: &Arena) -> Result<(), StepError> {
        let next = self.pos + self.vel;
        if !next.is_finite() {
            return Err(StepError::NonFinite {
                id: self.id,
                pos: self.pos,
                vel: self.vel,
            });
        }

        match self.role.boundary() {
            Boundary::Clamp => self.pos = arena.clamp(next, self.size),
            Boundary::Expire => {
                self.pos = next;
                if !arena.contains(&self.rect()) {
                    self.alive = false;
                }
            }
        }
        Ok(())
    }
}
