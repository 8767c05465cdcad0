//! Collision resolution for both games
//!
//! Shooter: bounding-box overlap between live entities, resolved against the
//! set of entities alive at the start of the pass. Snake: cell equality.

use std::collections::VecDeque;

use super::entity::{Entity, Owner};
use super::grid::Cell;
use super::state::GameOverReason;

/// A player projectile destroying an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub enemy_id: u32,
    pub projectile_id: u32,
}

/// Result of one shooter collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Enemies destroyed this pass, in projectile order
    pub hits: Vec<Hit>,
    /// First terminal collision found, if any
    pub game_over: Option<GameOverReason>,
}

/// Resolve projectile/enemy hits and player terminal collisions
///
/// - Each player projectile destroys at most one enemy (first match wins),
///   and each enemy is destroyed at most once.
/// - Player vs enemy and player vs enemy projectile are terminal; neither
///   removes the other party.
///
/// Candidates are the entities alive when the pass starts, iterated in slice
/// order, so marking one enemy dead never shifts the iteration over the rest.
pub fn resolve_shooter(
    player: &Entity,
    enemies: &mut [Entity],
    projectiles: &mut [Entity],
) -> CollisionOutcome {
    let live_enemies: Vec<usize> = (0..enemies.len()).filter(|&i| enemies[i].alive).collect();
    let live_projectiles: Vec<usize> = (0..projectiles.len())
        .filter(|&i| projectiles[i].alive)
        .collect();

    let mut outcome = CollisionOutcome::default();

    // Terminal checks use the tick-start snapshot
    let player_rect = player.rect();
    if let Some(&i) = live_enemies
        .iter()
        .find(|&&i| enemies[i].rect().overlaps(&player_rect))
    {
        outcome.game_over = Some(GameOverReason::PlayerRammed {
            enemy_id: enemies[i].id,
        });
    } else if let Some(&i) = live_projectiles.iter().find(|&&i| {
        projectiles[i].is_projectile_of(Owner::Enemy) && projectiles[i].rect().overlaps(&player_rect)
    }) {
        outcome.game_over = Some(GameOverReason::PlayerShot {
            projectile_id: projectiles[i].id,
        });
    }

    for &pi in &live_projectiles {
        if !projectiles[pi].is_projectile_of(Owner::Player) {
            continue;
        }
        let shot = projectiles[pi].rect();
        let target = live_enemies
            .iter()
            .copied()
            .find(|&ei| enemies[ei].alive && enemies[ei].rect().overlaps(&shot));

        if let Some(ei) = target {
            enemies[ei].alive = false;
            projectiles[pi].alive = false;
            outcome.hits.push(Hit {
                enemy_id: enemies[ei].id,
                projectile_id: projectiles[pi].id,
            });
        }
    }

    outcome
}

/// Whether the head (first cell) sits on any other body cell
pub fn head_hits_body(body: &VecDeque<Cell>) -> bool {
    match body.front() {
        Some(head) => body.iter().skip(1).any(|c| c == head),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Role;
    use glam::Vec2;

    fn enemy(id: u32, x: f32, y: f32) -> Entity {
        Entity::new(id, Role::Enemy, Vec2::new(x, y), 25.0)
    }

    fn bullet(id: u32, owner: Owner, x: f32, y: f32) -> Entity {
        Entity::new(id, Role::Projectile { owner }, Vec2::new(x, y), 6.0)
    }

    fn far_player() -> Entity {
        Entity::new(1, Role::Player, Vec2::new(700.0, 500.0), 30.0)
    }

    #[test]
    fn test_projectile_destroys_single_enemy() {
        let mut enemies = vec![enemy(10, 100.0, 100.0), enemy(11, 300.0, 300.0)];
        let mut projectiles = vec![bullet(20, Owner::Player, 110.0, 110.0)];

        let out = resolve_shooter(&far_player(), &mut enemies, &mut projectiles);

        assert_eq!(
            out.hits,
            vec![Hit {
                enemy_id: 10,
                projectile_id: 20
            }]
        );
        assert!(!enemies[0].alive);
        assert!(enemies[1].alive);
        assert!(!projectiles[0].alive);
        assert_eq!(out.game_over, None);
    }

    #[test]
    fn test_first_match_wins_per_projectile() {
        // Both enemies overlap the projectile; only the first is destroyed
        let mut enemies = vec![enemy(10, 100.0, 100.0), enemy(11, 105.0, 105.0)];
        let mut projectiles = vec![bullet(20, Owner::Player, 110.0, 110.0)];

        let out = resolve_shooter(&far_player(), &mut enemies, &mut projectiles);

        assert_eq!(out.hits.len(), 1);
        assert!(!enemies[0].alive);
        assert!(enemies[1].alive);
    }

    #[test]
    fn test_enemy_destroyed_at_most_once() {
        let mut enemies = vec![enemy(10, 100.0, 100.0), enemy(11, 105.0, 105.0)];
        let mut projectiles = vec![
            bullet(20, Owner::Player, 110.0, 110.0),
            bullet(21, Owner::Player, 112.0, 112.0),
        ];

        let out = resolve_shooter(&far_player(), &mut enemies, &mut projectiles);

        // Second projectile moves on to the next live candidate
        assert_eq!(out.hits.len(), 2);
        assert_eq!(out.hits[1].enemy_id, 11);
        assert!(enemies.iter().all(|e| !e.alive));
        assert!(projectiles.iter().all(|p| !p.alive));
    }

    #[test]
    fn test_dead_entities_ignored() {
        let mut enemies = vec![enemy(10, 100.0, 100.0)];
        enemies[0].alive = false;
        let mut projectiles = vec![bullet(20, Owner::Player, 110.0, 110.0)];

        let out = resolve_shooter(&far_player(), &mut enemies, &mut projectiles);

        assert!(out.hits.is_empty());
        assert!(projectiles[0].alive);
    }

    #[test]
    fn test_enemy_projectiles_do_not_hit_enemies() {
        let mut enemies = vec![enemy(10, 100.0, 100.0)];
        let mut projectiles = vec![bullet(20, Owner::Enemy, 110.0, 110.0)];

        let out = resolve_shooter(&far_player(), &mut enemies, &mut projectiles);

        assert!(out.hits.is_empty());
        assert!(enemies[0].alive);
    }

    #[test]
    fn test_player_rammed_is_terminal_without_removal() {
        let player = Entity::new(1, Role::Player, Vec2::new(100.0, 100.0), 30.0);
        let mut enemies = vec![enemy(10, 110.0, 110.0)];
        let mut projectiles = Vec::new();

        let out = resolve_shooter(&player, &mut enemies, &mut projectiles);

        assert_eq!(out.game_over, Some(GameOverReason::PlayerRammed { enemy_id: 10 }));
        assert!(enemies[0].alive);
    }

    #[test]
    fn test_player_shot_is_terminal_without_removal() {
        let player = Entity::new(1, Role::Player, Vec2::new(100.0, 100.0), 30.0);
        let mut projectiles = vec![
            bullet(20, Owner::Player, 110.0, 110.0),
            bullet(21, Owner::Enemy, 110.0, 110.0),
        ];

        let out = resolve_shooter(&player, &mut [], &mut projectiles);

        assert_eq!(out.game_over, Some(GameOverReason::PlayerShot { projectile_id: 21 }));
        assert!(projectiles[1].alive);
    }

    #[test]
    fn test_head_hits_body() {
        let body: VecDeque<Cell> = [Cell::new(2, 2), Cell::new(3, 2), Cell::new(2, 2)].into();
        assert!(head_hits_body(&body));

        let body: VecDeque<Cell> = [Cell::new(2, 2), Cell::new(3, 2), Cell::new(4, 2)].into();
        assert!(!head_hits_body(&body));
        assert!(!head_hits_body(&VecDeque::new()));
    }
}
