//! Immediate-mode drawing of a simulation snapshot
//!
//! Only reads game state. Dead entities are never drawn.

use glam::Vec2;

use crate::error::StepError;
use crate::platform::{Rgb, Surface};
use crate::sim::{Cell, Entity, GamePhase, Owner, Rect, Role, ShooterGame, SnakeGame};

const HUD_MARGIN: f32 = 4.0;
const RESTART_HINT: &str = "Press SPACE or R to restart, ESC to quit";

/// Color for an entity by role
pub fn role_color(role: Role) -> Rgb {
    match role {
        Role::Player => Rgb::BLUE,
        Role::Enemy => Rgb::RED,
        Role::Projectile { owner: Owner::Player } => Rgb::YELLOW,
        Role::Projectile { owner: Owner::Enemy } => Rgb::ORANGE,
    }
}

fn cell_rect(cell: Cell, cell_size: f32) -> Rect {
    Rect::square(Vec2::new(cell.x as f32, cell.y as f32) * cell_size, cell_size)
}

/// Centered "game over" overlay with final score
fn draw_game_over(surface: &mut dyn Surface, score: u64) {
    let size = surface.size();
    let title = format!("GAME OVER  -  score {score}");
    // Rough centering; the surface decides the real glyph width
    let char_w = size.x / 80.0;
    let mid = size * 0.5;
    surface.draw_text(
        Vec2::new(mid.x - title.len() as f32 * char_w * 0.5, mid.y - char_w * 2.0),
        &title,
        Rgb::WHITE,
    );
    surface.draw_text(
        Vec2::new(mid.x - RESTART_HINT.len() as f32 * char_w * 0.5, mid.y + char_w * 2.0),
        RESTART_HINT,
        Rgb::GRAY,
    );
}

/// Draw the snake board, HUD and overlay, then present
pub fn draw_snake(surface: &mut dyn Surface, game: &SnakeGame) -> Result<(), StepError> {
    let cell_size = game.config().cell_size;
    surface.clear(Rgb::BLACK);

    if let Some(food) = game.food {
        let rect = cell_rect(food, cell_size);
        surface.fill_circle(rect.center(), cell_size * 0.5, Rgb::RED);
    }
    for (i, &cell) in game.body.iter().enumerate() {
        let color = if i == 0 { Rgb::GREEN } else { Rgb::DARK_GREEN };
        surface.fill_rect(cell_rect(cell, cell_size), color);
    }

    surface.draw_text(
        Vec2::splat(HUD_MARGIN),
        &format!("Score: {}  Length: {}", game.score, game.body.len()),
        Rgb::WHITE,
    );
    if game.phase == GamePhase::GameOver {
        draw_game_over(surface, game.score);
    }

    surface.present()?;
    Ok(())
}

fn draw_entity(surface: &mut dyn Surface, entity: &Entity) {
    let color = role_color(entity.role);
    match entity.role {
        Role::Projectile { .. } => surface.fill_circle(entity.center(), entity.size * 0.5, color),
        Role::Player => {
            surface.fill_rect(entity.rect(), color);
            surface.outline_rect(entity.rect(), Rgb::WHITE);
        }
        Role::Enemy => surface.fill_rect(entity.rect(), color),
    }
}

/// Draw the shooter arena, HUD and overlay, then present
pub fn draw_shooter(surface: &mut dyn Surface, game: &ShooterGame) -> Result<(), StepError> {
    surface.clear(Rgb::BLACK);
    surface.outline_rect(
        Rect::new(Vec2::ZERO, Vec2::new(game.arena.width, game.arena.height)),
        Rgb::GRAY,
    );

    for entity in game.enemies.iter().chain(&game.projectiles).filter(|e| e.alive) {
        draw_entity(surface, entity);
    }
    draw_entity(surface, &game.player);

    surface.draw_text(
        Vec2::splat(HUD_MARGIN) + Vec2::new(HUD_MARGIN, HUD_MARGIN),
        &format!(
            "AI vs AI  Score: {}  Enemies: {}  Shots: {}",
            game.score,
            game.enemies.len(),
            game.projectiles.len()
        ),
        Rgb::WHITE,
    );
    if game.phase == GamePhase::GameOver {
        draw_game_over(surface, game.score);
    }

    surface.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ShooterConfig, SnakeConfig};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Rect(Rect, Rgb),
        Outline(Rect, Rgb),
        Circle(Vec2, f32, Rgb),
        Text(String),
        Present,
    }

    /// Surface double that records draw calls
    struct Recorder {
        size: Vec2,
        ops: Vec<Op>,
        fail_present: bool,
    }

    impl Recorder {
        fn new(size: Vec2) -> Self {
            Self {
                size,
                ops: Vec::new(),
                fail_present: false,
            }
        }

        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for Recorder {
        fn size(&self) -> Vec2 {
            self.size
        }
        fn clear(&mut self, _color: Rgb) {
            self.ops.push(Op::Clear);
        }
        fn fill_rect(&mut self, rect: Rect, color: Rgb) {
            self.ops.push(Op::Rect(rect, color));
        }
        fn outline_rect(&mut self, rect: Rect, color: Rgb) {
            self.ops.push(Op::Outline(rect, color));
        }
        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
            self.ops.push(Op::Circle(center, radius, color));
        }
        fn draw_text(&mut self, _pos: Vec2, text: &str, _color: Rgb) {
            self.ops.push(Op::Text(text.to_string()));
        }
        fn present(&mut self) -> std::io::Result<()> {
            if self.fail_present {
                return Err(std::io::Error::other("display gone"));
            }
            self.ops.push(Op::Present);
            Ok(())
        }
    }

    #[test]
    fn test_snake_frame() {
        let config = SnakeConfig::default();
        let game = SnakeGame::new(&config, 5);
        let (w, h) = config.world_size();
        let mut surface = Recorder::new(Vec2::new(w, h));

        draw_snake(&mut surface, &game).unwrap();

        assert_eq!(surface.ops.first(), Some(&Op::Clear));
        assert_eq!(surface.ops.last(), Some(&Op::Present));
        let segments = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Rect(..)))
            .count();
        assert_eq!(segments, game.body.len());
        let head = cell_rect(game.head().unwrap(), config.cell_size);
        assert!(surface.ops.contains(&Op::Rect(head, Rgb::GREEN)));
        assert!(surface.ops.iter().any(|op| matches!(op, Op::Circle(_, _, Rgb::RED))));
        assert!(surface.texts().iter().any(|t| t.starts_with("Score: 0")));
        assert!(!surface.texts().iter().any(|t| t.starts_with("GAME OVER")));
    }

    #[test]
    fn test_game_over_overlay() {
        let config = SnakeConfig::default();
        let mut game = SnakeGame::new(&config, 5);
        game.phase = GamePhase::GameOver;
        let mut surface = Recorder::new(Vec2::new(640.0, 480.0));

        draw_snake(&mut surface, &game).unwrap();

        assert!(surface.texts().iter().any(|t| t.starts_with("GAME OVER")));
        assert!(surface.texts().contains(&RESTART_HINT));
    }

    #[test]
    fn test_shooter_skips_dead_entities() {
        let config = ShooterConfig::default();
        let mut game = ShooterGame::new(&config, 5);
        let mut alive = Entity::new(100, Role::Enemy, Vec2::new(50.0, 50.0), 25.0);
        let mut dead = Entity::new(101, Role::Enemy, Vec2::new(150.0, 50.0), 25.0);
        dead.alive = false;
        alive.alive = true;
        game.enemies = vec![alive.clone(), dead];
        let mut surface = Recorder::new(Vec2::new(800.0, 600.0));

        draw_shooter(&mut surface, &game).unwrap();

        let red: Vec<_> = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Rect(_, Rgb::RED)))
            .collect();
        assert_eq!(red, vec![&Op::Rect(alive.rect(), Rgb::RED)]);
        assert!(surface.ops.contains(&Op::Rect(game.player.rect(), Rgb::BLUE)));
    }

    #[test]
    fn test_present_failure_is_render_error() {
        let game = ShooterGame::new(&ShooterConfig::default(), 5);
        let mut surface = Recorder::new(Vec2::new(800.0, 600.0));
        surface.fail_present = true;

        let err = draw_shooter(&mut surface, &game).unwrap_err();
        assert!(matches!(err, StepError::Render(_)));
    }
}
