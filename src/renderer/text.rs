//! Text renderer
//!
//! Draws the track as one glyph per cell to any `io::Write`, with the vehicle
//! footprint overlaid and an arrow marking its nose. Optional 24-bit ANSI
//! background colors use the shared palette.

use std::fmt::Write as _;
use std::io::Write;
use std::time::{Duration, Instant};

use super::palette;
use super::{Frame, Renderer};
use crate::error::RenderError;
use crate::sim::{Heading, TileKind};

const BODY_GLYPH: char = 'X';

fn nose_glyph(heading: Heading) -> char {
    match heading {
        Heading::East => '>',
        Heading::South => 'v',
        Heading::West => '<',
        Heading::North => '^',
    }
}

/// Sleeps so consecutive frames are at least `1 / fps` apart
#[derive(Debug, Default)]
struct FramePacer {
    last: Option<Instant>,
}

impl FramePacer {
    fn wait(&mut self, fps: u32) {
        let interval = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Tile(TileKind),
    Body,
    Nose(Heading),
}

/// Renderer writing text frames to a sink
pub struct TextRenderer<W: Write> {
    out: Option<W>,
    color: bool,
    pacer: FramePacer,
    frames: u64,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Some(out),
            color: false,
            pacer: FramePacer::default(),
            frames: 0,
        }
    }

    /// Enable ANSI truecolor backgrounds
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    /// Recover the sink (None once closed)
    pub fn into_inner(self) -> Option<W> {
        self.out
    }

    fn compose(frame: &Frame<'_>) -> Vec<Vec<Cell>> {
        let track = frame.track;
        let mut cells: Vec<Vec<Cell>> = track
            .rows()
            .map(|row| row.iter().map(|t| Cell::Tile(*t)).collect())
            .collect();

        let v = &frame.vehicle;
        let bbox = frame.footprint.aabb(v.pos, v.heading);
        let (h, w) = (track.height() as i64, track.width() as i64);
        let rows = (bbox.min.y.floor() as i64).max(0)..(bbox.max.y.ceil() as i64).min(h);
        for r in rows {
            let cols = (bbox.min.x.floor() as i64).max(0)..(bbox.max.x.ceil() as i64).min(w);
            for c in cols {
                cells[r as usize][c as usize] = Cell::Body;
            }
        }

        // Nose sits half a cell inside the front edge
        let nose = v.pos + v.heading.unit() * (frame.footprint.length / 2.0 - 0.5).max(0.0);
        let (nr, nc) = (nose.y.floor() as i64, nose.x.floor() as i64);
        if (0..h).contains(&nr) && (0..w).contains(&nc) {
            cells[nr as usize][nc as usize] = Cell::Nose(v.heading);
        }
        cells
    }

    fn paint(&self, line: &mut String, cell: Cell, row: usize, col: usize) {
        let (glyph, rgb) = match cell {
            Cell::Tile(kind) => (kind.glyph(), palette::cell_color(kind, row, col)),
            Cell::Body => (BODY_GLYPH, palette::VEHICLE),
            Cell::Nose(heading) => (nose_glyph(heading), palette::WINDSHIELD),
        };
        if self.color {
            let [r, g, b] = rgb;
            // Writing into a String cannot fail
            let _ = write!(line, "\x1b[48;2;{r};{g};{b}m{glyph}\x1b[0m");
        } else {
            line.push(glyph);
        }
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, frame: &Frame<'_>, fps: u32) -> Result<(), RenderError> {
        if self.out.is_none() {
            return Err(RenderError::Closed);
        }
        let cells = Self::compose(frame);
        let mut text = String::new();
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                self.paint(&mut text, *cell, r, c);
            }
            text.push('\n');
        }
        text.push('\n');

        self.pacer.wait(fps);
        let out = self.out.as_mut().ok_or(RenderError::Closed)?;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        self.frames += 1;
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut out) = self.out.take() {
            let _ = out.flush();
        }
    }
}
