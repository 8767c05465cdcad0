//! Fixed-rate game loop shared by both binaries
//!
//! Each frame: poll input -> update one tick -> draw and present -> sleep out
//! the frame budget. Single-threaded; the simulation owns its state and input
//! is buffered between polls.

use std::fs::OpenOptions;
use std::io;

use glam::Vec2;

use crate::config::{Config, ShooterConfig, SnakeConfig};
use crate::error::{GameError, StepError};
use crate::platform::{FrameClock, InputEvent, Key, Surface};
use crate::render;
use crate::sim::{
    Direction, GameEvent, GamePhase, PolicyTable, ShooterGame, ShooterInput, SnakeGame,
    SnakeInput, Step,
};

/// Environment variable naming an append-only log file
pub const LOG_ENV: &str = "ARCADE_LOG";

/// Route `log` output to the file named by `ARCADE_LOG`
///
/// The terminal belongs to the game, so without a file logging stays off.
/// `RUST_LOG` still filters as usual (default `info`).
pub fn init_logging() -> Result<(), GameError> {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| GameError::Init(format!("cannot open log file {}: {e}", path.to_string_lossy())))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| GameError::Init(format!("logger: {e}")))
}

/// Configured seed, or a fresh random one
pub fn resolve_seed(config: &Config) -> u64 {
    config.seed.unwrap_or_else(rand::random)
}

/// A game the loop can drive
pub trait Game {
    fn title(&self) -> &'static str;
    fn tick_hz(&self) -> u32;
    /// World size the surface should map onto
    fn world_size(&self) -> Vec2;
    fn policies(&self) -> PolicyTable;
    /// Buffer a key press for the next tick
    fn handle_key(&mut self, key: Key);
    /// Advance one tick, consuming buffered input
    fn update(&mut self) -> Result<Vec<GameEvent>, GameError>;
    fn draw(&self, surface: &mut dyn Surface) -> Result<(), StepError>;
}

/// Snake driven by arrow keys
#[derive(Debug, Clone)]
pub struct SnakeApp {
    pub game: SnakeGame,
    input: SnakeInput,
}

impl SnakeApp {
    pub fn new(config: &SnakeConfig, seed: u64) -> Self {
        log::info!("Snake starting with seed: {}", seed);
        Self {
            game: SnakeGame::new(config, seed),
            input: SnakeInput::default(),
        }
    }
}

impl Game for SnakeApp {
    fn title(&self) -> &'static str {
        "Snake"
    }

    fn tick_hz(&self) -> u32 {
        self.game.config().tick_hz
    }

    fn world_size(&self) -> Vec2 {
        let (w, h) = self.game.config().world_size();
        Vec2::new(w, h)
    }

    fn policies(&self) -> PolicyTable {
        PolicyTable::SNAKE
    }

    fn handle_key(&mut self, key: Key) {
        let dir = match key {
            Key::Up => Direction::Up,
            Key::Down => Direction::Down,
            Key::Left => Direction::Left,
            Key::Right => Direction::Right,
            Key::Space | Key::R => {
                self.input.restart = true;
                return;
            }
            Key::Escape => return,
        };
        // Applied immediately so two presses between ticks are each checked
        if self.game.phase == GamePhase::Running {
            self.game.steer(dir);
        }
    }

    fn update(&mut self) -> Result<Vec<GameEvent>, GameError> {
        let input = std::mem::take(&mut self.input);
        Ok(self.game.tick(&input))
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), StepError> {
        render::draw_snake(surface, &self.game)
    }
}

/// Shooter that plays itself; keys only restart
#[derive(Debug, Clone)]
pub struct ShooterApp {
    pub game: ShooterGame,
    input: ShooterInput,
}

impl ShooterApp {
    pub fn new(config: &ShooterConfig, seed: u64) -> Self {
        log::info!("Skirmish starting with seed: {}", seed);
        Self {
            game: ShooterGame::new(config, seed),
            input: ShooterInput::default(),
        }
    }
}

impl Game for ShooterApp {
    fn title(&self) -> &'static str {
        "Skirmish - AI vs AI"
    }

    fn tick_hz(&self) -> u32 {
        self.game.config().tick_hz
    }

    fn world_size(&self) -> Vec2 {
        Vec2::new(self.game.arena.width, self.game.arena.height)
    }

    fn policies(&self) -> PolicyTable {
        PolicyTable::SHOOTER
    }

    fn handle_key(&mut self, key: Key) {
        if matches!(key, Key::Space | Key::R) {
            self.input.restart = true;
        }
    }

    fn update(&mut self) -> Result<Vec<GameEvent>, GameError> {
        let input = std::mem::take(&mut self.input);
        self.game.tick(&input)
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), StepError> {
        render::draw_shooter(surface, &self.game)
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::GameOver(reason) => log::info!("Game over: {:?}", reason),
        GameEvent::Restarted => log::info!("Restarted"),
        GameEvent::EnemyDestroyed { enemy_id, score, .. } => {
            log::debug!("Enemy {} destroyed, score {}", enemy_id, score)
        }
        other => log::trace!("{:?}", other),
    }
}

/// Run until a quit event, polling the terminal for input
pub fn run(game: &mut dyn Game, surface: &mut dyn Surface) -> Result<(), GameError> {
    run_with(game, surface, crate::platform::poll_events).map(|_| ())
}

/// Run until `poll` reports a quit
///
/// Returns the number of ticks played.
pub fn run_with<P>(game: &mut dyn Game, surface: &mut dyn Surface, mut poll: P) -> Result<u64, GameError>
where
    P: FnMut() -> io::Result<Vec<InputEvent>>,
{
    let policies = game.policies();
    let mut clock = FrameClock::new(game.tick_hz());
    let mut ticks = 0u64;
    log::info!("{} running at {} Hz", game.title(), game.tick_hz());

    loop {
        for event in poll().map_err(GameError::Loop)? {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => {
                    log::info!("Quit after {} ticks", ticks);
                    return Ok(ticks);
                }
                InputEvent::KeyDown(key) => game.handle_key(key),
            }
        }

        for event in game.update()? {
            log_event(&event);
        }
        ticks += 1;

        policies.run(Step::Render, || game.draw(surface))?;
        clock.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Rgb;
    use crate::sim::{Cell, GameOverReason, Rect};

    /// Surface that counts frames and can fail on present
    #[derive(Default)]
    struct CountingSurface {
        frames: usize,
        fail: bool,
    }

    impl Surface for CountingSurface {
        fn size(&self) -> Vec2 {
            Vec2::new(800.0, 600.0)
        }
        fn clear(&mut self, _color: Rgb) {}
        fn fill_rect(&mut self, _rect: Rect, _color: Rgb) {}
        fn outline_rect(&mut self, _rect: Rect, _color: Rgb) {}
        fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Rgb) {}
        fn draw_text(&mut self, _pos: Vec2, _text: &str, _color: Rgb) {}
        fn present(&mut self) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::other("surface lost"));
            }
            self.frames += 1;
            Ok(())
        }
    }

    /// Feed scripted events one frame at a time, then quit
    fn script(frames: Vec<Vec<InputEvent>>) -> impl FnMut() -> io::Result<Vec<InputEvent>> {
        let mut frames = frames.into_iter();
        move || Ok(frames.next().unwrap_or_else(|| vec![InputEvent::Quit]))
    }

    fn fast_snake() -> SnakeApp {
        let config = SnakeConfig {
            tick_hz: 1000,
            ..Default::default()
        };
        SnakeApp::new(&config, 7)
    }

    fn fast_shooter() -> ShooterApp {
        let config = ShooterConfig {
            tick_hz: 1000,
            ..Default::default()
        };
        ShooterApp::new(&config, 7)
    }

    #[test]
    fn test_quit_stops_before_update() {
        let mut app = fast_snake();
        let mut surface = CountingSurface::default();
        let ticks = run_with(&mut app, &mut surface, script(vec![])).unwrap();
        assert_eq!(ticks, 0);
        assert_eq!(surface.frames, 0);
    }

    #[test]
    fn test_escape_quits() {
        let mut app = fast_shooter();
        let mut surface = CountingSurface::default();
        let frames = vec![vec![], vec![], vec![InputEvent::KeyDown(Key::Escape)]];
        let ticks = run_with(&mut app, &mut surface, script(frames)).unwrap();
        assert_eq!(ticks, 2);
        assert_eq!(surface.frames, 2);
        assert_eq!(app.game.time_ticks, 2);
    }

    #[test]
    fn test_snake_keys_steer() {
        let mut app = fast_snake();
        app.game.food = Some(Cell::new(0, 0));
        let start = app.game.head().unwrap();
        let mut surface = CountingSurface::default();
        let frames = vec![vec![InputEvent::KeyDown(Key::Up)]];
        run_with(&mut app, &mut surface, script(frames)).unwrap();
        assert_eq!(app.game.head(), Some(Cell::new(start.x, start.y - 1)));
    }

    #[test]
    fn test_snake_render_failure_aborts() {
        let mut app = fast_snake();
        let mut surface = CountingSurface {
            fail: true,
            ..Default::default()
        };
        let err = run_with(&mut app, &mut surface, script(vec![vec![]; 5])).unwrap_err();
        assert!(matches!(err, GameError::Step { step: Step::Render, .. }));
        assert_eq!(app.game.time_ticks, 1);
    }

    #[test]
    fn test_shooter_render_failure_continues() {
        let mut app = fast_shooter();
        let mut surface = CountingSurface {
            fail: true,
            ..Default::default()
        };
        let ticks = run_with(&mut app, &mut surface, script(vec![vec![]; 5])).unwrap();
        assert_eq!(ticks, 5);
    }

    #[test]
    fn test_poll_error_is_loop_error() {
        let mut app = fast_snake();
        let mut surface = CountingSurface::default();
        let err = run_with(&mut app, &mut surface, || Err(io::Error::other("tty gone"))).unwrap_err();
        assert!(matches!(err, GameError::Loop(_)));
    }

    #[test]
    fn test_restart_key_consumed_once() {
        let mut app = fast_shooter();
        app.game.phase = GamePhase::GameOver;
        app.game.score = 30;

        app.handle_key(Key::R);
        let events = app.update().unwrap();
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert_eq!(app.game.score, 0);

        // Buffer was cleared; a later game over is not auto-restarted
        app.game.phase = GamePhase::GameOver;
        assert!(app.update().unwrap().is_empty());
        assert_eq!(app.game.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_snake_ignores_steer_while_over() {
        let mut app = fast_snake();
        app.game.phase = GamePhase::GameOver;
        app.handle_key(Key::Up);
        assert_eq!(app.game.direction, Direction::Right);

        app.handle_key(Key::Space);
        let events = app.update().unwrap();
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert!(!events.contains(&GameEvent::GameOver(GameOverReason::SelfCollision)));
    }

    #[test]
    fn test_resolve_seed_uses_config() {
        let config = Config {
            seed: Some(99),
            ..Default::default()
        };
        assert_eq!(resolve_seed(&config), 99);
    }
}
