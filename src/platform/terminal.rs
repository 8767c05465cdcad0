//! Terminal backend
//!
//! World coordinates are scaled onto the terminal's character grid. The
//! surface owns raw mode and the alternate screen for its whole lifetime and
//! gives both back on drop, whichever way the loop exits.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use glam::Vec2;

use super::{InputEvent, Key, Rgb, Surface};
use crate::sim::Rect;

const FILL: char = '█';
const DOT: char = '•';

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

impl Cell {
    fn blank(bg: Rgb) -> Self {
        Self { ch: ' ', fg: Rgb::WHITE, bg }
    }
}

/// Character-cell framebuffer mapped onto a world-space rectangle
#[derive(Debug, Clone)]
struct FrameBuffer {
    world: Vec2,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(world: Vec2, cols: u16, rows: u16) -> Self {
        Self {
            world,
            cols,
            rows,
            cells: vec![Cell::blank(Rgb::BLACK); cols as usize * rows as usize],
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        if (cols, rows) != (self.cols, self.rows) {
            *self = Self::new(self.world, cols, rows);
        }
    }

    /// World units per character cell on each axis
    fn scale(&self) -> Vec2 {
        self.world / Vec2::new(self.cols.max(1) as f32, self.rows.max(1) as f32)
    }

    fn to_cell(&self, p: Vec2) -> (i32, i32) {
        let c = (p / self.scale()).floor();
        (c.x as i32, c.y as i32)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Rgb) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx].ch = ch;
        self.cells[idx].fg = fg;
    }

    /// Cell span covered by a rect; never empty for a visible rect
    fn span(&self, rect: &Rect) -> ((i32, i32), (i32, i32)) {
        let (x0, y0) = self.to_cell(rect.min);
        let (x1, y1) = self.to_cell(rect.max() - Vec2::splat(0.001));
        ((x0, y0), (x1.max(x0), y1.max(y0)))
    }
}

/// Terminal display surface (scoped: restores the terminal on drop)
pub struct TerminalSurface {
    out: Stdout,
    fb: FrameBuffer,
}

impl TerminalSurface {
    /// Take over the terminal and map `world` onto it
    pub fn open(title: &str, world: Vec2) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        terminal::enable_raw_mode()?;

        let mut out = io::stdout();
        if let Err(e) = execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::SetTitle(title)
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }

        log::info!("Terminal surface {}x{} for world {}", cols, rows, world);
        Ok(Self {
            out,
            fb: FrameBuffer::new(world, cols, rows),
        })
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        log::info!("Terminal restored");
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> Vec2 {
        self.fb.world
    }

    fn clear(&mut self, color: Rgb) {
        if let Ok((cols, rows)) = terminal::size() {
            self.fb.resize(cols, rows);
        }
        self.fb.cells.fill(Cell::blank(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let ((x0, y0), (x1, y1)) = self.fb.span(&rect);
        for row in y0..=y1 {
            for col in x0..=x1 {
                self.fb.put(col, row, FILL, color);
            }
        }
    }

    fn outline_rect(&mut self, rect: Rect, color: Rgb) {
        let ((x0, y0), (x1, y1)) = self.fb.span(&rect);
        for col in x0..=x1 {
            self.fb.put(col, y0, '─', color);
            self.fb.put(col, y1, '─', color);
        }
        for row in y0..=y1 {
            self.fb.put(x0, row, '│', color);
            self.fb.put(x1, row, '│', color);
        }
        self.fb.put(x0, y0, '┌', color);
        self.fb.put(x1, y0, '┐', color);
        self.fb.put(x0, y1, '└', color);
        self.fb.put(x1, y1, '┘', color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let rect = Rect::new(center - Vec2::splat(radius), Vec2::splat(radius * 2.0));
        let ((x0, y0), (x1, y1)) = self.fb.span(&rect);
        if (x0, y0) == (x1, y1) {
            self.fb.put(x0, y0, DOT, color);
            return;
        }
        let scale = self.fb.scale();
        for row in y0..=y1 {
            for col in x0..=x1 {
                let cell_center = (Vec2::new(col as f32, row as f32) + 0.5) * scale;
                if cell_center.distance(center) <= radius {
                    self.fb.put(col, row, FILL, color);
                }
            }
        }
        let (cx, cy) = self.fb.to_cell(center);
        self.fb.put(cx, cy, FILL, color);
    }

    fn draw_text(&mut self, pos: Vec2, text: &str, color: Rgb) {
        let (col, row) = self.fb.to_cell(pos);
        for (i, ch) in text.chars().enumerate() {
            self.fb.put(col + i as i32, row, ch, color);
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let mut last: Option<(Rgb, Rgb)> = None;
        for row in 0..self.fb.rows {
            queue!(self.out, cursor::MoveTo(0, row))?;
            let start = row as usize * self.fb.cols as usize;
            for cell in &self.fb.cells[start..start + self.fb.cols as usize] {
                if last != Some((cell.fg, cell.bg)) {
                    queue!(
                        self.out,
                        SetForegroundColor(color(cell.fg)),
                        SetBackgroundColor(color(cell.bg))
                    )?;
                    last = Some((cell.fg, cell.bg));
                }
                queue!(self.out, Print(cell.ch))?;
            }
        }
        self.out.flush()
    }
}

fn color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

/// Drain every pending terminal event without blocking
pub fn poll_events() -> io::Result<Vec<InputEvent>> {
    let mut events = Vec::new();
    while event::poll(Duration::ZERO)? {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        {
            if kind == KeyEventKind::Release {
                continue;
            }
            if let Some(ev) = map_key(code, modifiers) {
                events.push(ev);
            }
        }
    }
    Ok(events)
}

/// Translate a terminal key press into a game input event
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<InputEvent> {
    let key = match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(InputEvent::Quit);
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(InputEvent::Quit),
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char('r') | KeyCode::Char('R') => Key::R,
        _ => return None,
    };
    Some(InputEvent::KeyDown(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(KeyCode::Up, KeyModifiers::NONE), Some(InputEvent::KeyDown(Key::Up)));
        assert_eq!(map_key(KeyCode::Char('R'), KeyModifiers::SHIFT), Some(InputEvent::KeyDown(Key::R)));
        assert_eq!(map_key(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(InputEvent::Quit));
        assert_eq!(map_key(KeyCode::Char('q'), KeyModifiers::NONE), Some(InputEvent::Quit));
        assert_eq!(map_key(KeyCode::Esc, KeyModifiers::NONE), Some(InputEvent::KeyDown(Key::Escape)));
        assert_eq!(map_key(KeyCode::Char('x'), KeyModifiers::NONE), None);
    }

    #[test]
    fn test_world_to_cell_mapping() {
        let fb = FrameBuffer::new(Vec2::new(800.0, 600.0), 80, 30);
        assert_eq!(fb.to_cell(Vec2::ZERO), (0, 0));
        assert_eq!(fb.to_cell(Vec2::new(799.0, 599.0)), (79, 29));
        assert_eq!(fb.to_cell(Vec2::new(405.0, 300.0)), (40, 15));
    }

    #[test]
    fn test_small_rect_covers_one_cell() {
        let fb = FrameBuffer::new(Vec2::new(800.0, 600.0), 80, 30);
        let span = fb.span(&Rect::square(Vec2::new(101.0, 101.0), 2.0));
        assert_eq!(span, ((10, 5), (10, 5)));
    }

    #[test]
    fn test_put_clips_out_of_range() {
        let mut fb = FrameBuffer::new(Vec2::new(100.0, 100.0), 10, 10);
        fb.put(-1, 0, 'x', Rgb::RED);
        fb.put(10, 3, 'x', Rgb::RED);
        fb.put(3, 3, 'x', Rgb::RED);
        assert_eq!(fb.cells.iter().filter(|c| c.ch == 'x').count(), 1);
    }
}
