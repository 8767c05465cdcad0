//! Platform abstraction layer
//!
//! The collaborators the games call but do not implement:
//! - Drawing colored shapes and text onto a display surface
//! - Polling quit/key events
//! - Pacing the loop to a fixed tick rate

pub mod terminal;

use std::time::{Duration, Instant};

use glam::Vec2;

use crate::sim::Rect;

pub use terminal::{TerminalSurface, poll_events};

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GREEN: Rgb = Rgb(0, 200, 0);
    pub const DARK_GREEN: Rgb = Rgb(0, 120, 0);
    pub const RED: Rgb = Rgb(220, 40, 40);
    pub const BLUE: Rgb = Rgb(60, 120, 255);
    pub const YELLOW: Rgb = Rgb(255, 220, 0);
    pub const ORANGE: Rgb = Rgb(255, 140, 0);
    pub const GRAY: Rgb = Rgb(90, 90, 90);
}

/// A display surface in world coordinates
pub trait Surface {
    /// World-space size the surface maps onto its output
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Rgb);
    fn fill_rect(&mut self, rect: Rect, color: Rgb);
    fn outline_rect(&mut self, rect: Rect, color: Rgb);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb);
    /// Draw text with its first character at `pos`
    fn draw_text(&mut self, pos: Vec2, text: &str, color: Rgb);
    /// Push the finished frame to the output
    fn present(&mut self) -> std::io::Result<()>;
}

/// Keys the games react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    R,
    Escape,
}

/// Input event from the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
}

/// Blocks at the end of each frame to hold a fixed tick rate
#[derive(Debug)]
pub struct FrameClock {
    budget: Duration,
    frame_start: Instant,
}

impl FrameClock {
    pub fn new(target_hz: u32) -> Self {
        Self {
            budget: Duration::from_secs(1) / target_hz.max(1),
            frame_start: Instant::now(),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Sleep out whatever is left of the current frame, then start the next
    pub fn tick(&mut self) {
        let elapsed = self.frame_start.elapsed();
        if let Some(remaining) = self.budget.checked_sub(elapsed) {
            std::thread::sleep(remaining);
        } else {
            log::trace!("Frame over budget by {:?}", elapsed - self.budget);
        }
        self.frame_start = Instant::now();
    }
}
