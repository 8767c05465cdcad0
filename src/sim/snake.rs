//! Grid snake on a toroidal board
//!
//! Per tick: steer -> advance -> collide. A run ends on self-collision (or a
//! board with no room left for food) and stays frozen until restart.

use std::collections::VecDeque;

use super::collision::head_hits_body;
use super::grid::{Cell, Direction, Grid};
use super::spawn::place_food;
use super::state::{GameEvent, GameOverReason, GamePhase, RngState};
use crate::config::SnakeConfig;

/// Input commands for a single snake tick
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeInput {
    /// Requested heading (arrow keys)
    pub steer: Option<Direction>,
    /// Start a new run from `GameOver`
    pub restart: bool,
}

/// Complete snake game state
#[derive(Debug, Clone)]
pub struct SnakeGame {
    config: SnakeConfig,
    pub grid: Grid,
    /// Occupied cells, head first
    pub body: VecDeque<Cell>,
    /// Heading for the next move
    pub direction: Direction,
    /// Heading of the last completed move (reversal is checked against this)
    last_moved: Direction,
    /// Upcoming moves that keep the tail in place
    pub grow_pending: u32,
    pub food: Option<Cell>,
    pub score: u64,
    pub phase: GamePhase,
    pub time_ticks: u64,
    rng: RngState,
}

impl SnakeGame {
    /// Create a game and start the first run
    pub fn new(config: &SnakeConfig, seed: u64) -> Self {
        let grid = Grid::new(config.grid_width, config.grid_height);
        let mut game = Self {
            config: config.clone(),
            grid,
            body: VecDeque::new(),
            direction: Direction::Right,
            last_moved: Direction::Right,
            grow_pending: 0,
            food: None,
            score: 0,
            phase: GamePhase::Setup,
            time_ticks: 0,
            rng: RngState::new(seed),
        };
        game.reset();
        game
    }

    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed
    }

    pub fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    /// Setup -> Running: fresh body, score and food
    pub fn reset(&mut self) {
        self.phase = GamePhase::Setup;

        let center = self.grid.center();
        self.body = (0..self.config.initial_length as i32)
            .map(|i| self.grid.wrap(Cell::new(center.x - i, center.y)))
            .collect();
        self.direction = Direction::Right;
        self.last_moved = Direction::Right;
        self.grow_pending = 0;
        self.score = 0;
        self.time_ticks = 0;
        self.phase = GamePhase::Running;
        self.respawn_food();

        log::info!("Snake run started (length {})", self.body.len());
    }

    /// Change heading unless it reverses the last move
    ///
    /// Returns whether the new heading was accepted.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if dir == self.last_moved.opposite() {
            return false;
        }
        self.direction = dir;
        true
    }

    /// Advance the game by one tick
    pub fn tick(&mut self, input: &SnakeInput) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.phase == GamePhase::GameOver {
            if input.restart {
                self.reset();
                events.push(GameEvent::Restarted);
            }
            return events;
        }

        self.time_ticks += 1;
        if let Some(dir) = input.steer {
            self.steer(dir);
        }
        self.advance();
        self.collide(&mut events);
        events
    }

    /// Move the head one cell; pop the tail unless growth is pending
    fn advance(&mut self) {
        let Some(head) = self.head() else {
            return;
        };
        self.body.push_front(self.grid.step(head, self.direction));
        if self.grow_pending > 0 {
            self.grow_pending -= 1;
        } else {
            self.body.pop_back();
        }
        self.last_moved = self.direction;
    }

    fn collide(&mut self, events: &mut Vec<GameEvent>) {
        if head_hits_body(&self.body) {
            self.end_run(GameOverReason::SelfCollision, events);
            return;
        }

        if self.food.is_some() && self.head() == self.food {
            self.grow_pending += 1;
            self.score += self.config.food_score;
            events.push(GameEvent::FoodEaten {
                score: self.score,
                length: self.body.len() + self.grow_pending as usize,
            });
            self.respawn_food();
            if self.food.is_none() {
                self.end_run(GameOverReason::BoardFull, events);
            }
        }
    }

    fn respawn_food(&mut self) {
        let body = &self.body;
        self.food = place_food(self.rng.rng(), &self.grid, |c| body.contains(&c));
        if self.food.is_none() && self.phase == GamePhase::Running {
            log::info!("No free cell left for food");
            self.phase = GamePhase::GameOver;
        }
    }

    fn end_run(&mut self, reason: GameOverReason, events: &mut Vec<GameEvent>) {
        log::info!("Snake run over: {:?}, score {}", reason, self.score);
        self.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver(reason));
    }
}
