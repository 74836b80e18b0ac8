//! Tile track: loading and spatial queries
//!
//! Coordinates: `x` grows with column, `y` grows with row. A continuous point
//! `(x, y)` lies in cell `(floor(y), floor(x))`.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::tile::TileKind;
use crate::error::{ConfigError, FormatError, TrackError};

/// Immutable rectangular tile grid
///
/// Serialized as a list of rows; deserializing runs the same checks as
/// [`Track::from_rows`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<TileKind>>", into = "Vec<Vec<TileKind>>")]
pub struct Track {
    height: usize,
    width: usize,
    /// Row-major cells
    cells: Vec<TileKind>,
}

impl Track {
    /// Build from already-decoded rows
    pub fn from_rows(rows: Vec<Vec<TileKind>>) -> Result<Self, FormatError> {
        let width = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(FormatError::Empty),
        };
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for (row, tiles) in rows.into_iter().enumerate() {
            if tiles.len() != width {
                return Err(FormatError::RaggedRow {
                    row,
                    expected: width,
                    found: tiles.len(),
                });
            }
            cells.extend(tiles);
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Parse comma-separated track text
    ///
    /// Blank lines and empty fields are skipped; fields are trimmed. Row
    /// numbers in errors count only non-blank rows.
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let mut rows = Vec::new();
        for line in source.lines() {
            let fields: Vec<&str> = line
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .collect();
            if fields.is_empty() {
                continue;
            }
            let row = rows.len();
            let tiles = fields
                .iter()
                .enumerate()
                .map(|(col, token)| {
                    TileKind::from_token(token).ok_or_else(|| FormatError::UnknownToken {
                        row,
                        col,
                        token: (*token).to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(tiles);
        }
        Self::from_rows(rows)
    }

    /// Read and parse a track file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TrackError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let track = Self::parse(&source)?;
        log::info!(
            "Loaded track {} ({}x{}, {} goal cells)",
            path.display(),
            track.height,
            track.width,
            track.goal_centers().len()
        );
        Ok(track)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Row-major cell slice
    pub fn cells(&self) -> &[TileKind] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileKind]> {
        self.cells.chunks(self.width)
    }

    /// Tile at a signed cell index; `Outside` beyond the grid
    pub fn tile_at(&self, row: i64, col: i64) -> TileKind {
        if row < 0 || col < 0 || row >= self.height as i64 || col >= self.width as i64 {
            return TileKind::Outside;
        }
        self.cells[row as usize * self.width + col as usize]
    }

    /// Tile containing a world point, with the cell index clamped into the grid
    pub fn tile_under(&self, pos: DVec2) -> TileKind {
        let row = (pos.y.floor() as i64).clamp(0, self.height as i64 - 1);
        let col = (pos.x.floor() as i64).clamp(0, self.width as i64 - 1);
        self.tile_at(row, col)
    }

    /// Whether any cell touched by the rectangle is `kind`
    ///
    /// Covers columns `floor(x_min)..=ceil(x_max)` and rows
    /// `floor(y_min)..=ceil(y_max)`, so a graze counts as overlap.
    pub fn rect_overlaps(&self, kind: TileKind, x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> bool {
        self.rect_any(x_min, y_min, x_max, y_max, |t| t == kind)
    }

    /// Same cell coverage as [`Track::rect_overlaps`], with a tile predicate
    pub fn rect_any(
        &self,
        x_min: f64,
        y_min: f64,
        x_max: f64,
        y_max: f64,
        pred: impl Fn(TileKind) -> bool,
    ) -> bool {
        let (c0, c1) = (x_min.floor() as i64, x_max.ceil() as i64);
        let (r0, r1) = (y_min.floor() as i64, y_max.ceil() as i64);
        (r0..=r1).any(|row| (c0..=c1).any(|col| pred(self.tile_at(row, col))))
    }

    fn positions_of(&self, kind: TileKind) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, t)| **t == kind)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    /// Centres of all goal cells, row-major
    pub fn goal_centers(&self) -> Vec<DVec2> {
        self.positions_of(TileKind::Goal)
            .map(|(row, col)| DVec2::new(col as f64 + 0.5, row as f64 + 0.5))
            .collect()
    }

    /// Spawn centre derived from the two start cells
    ///
    /// The vehicle's rear edge sits on the start column's left edge and its
    /// centre lies midway between the two start rows.
    pub fn spawn_pose(&self, vehicle_length: f64) -> Result<DVec2, ConfigError> {
        let starts: Vec<(usize, usize)> = self.positions_of(TileKind::Start).collect();
        let &[(r0, c0), (r1, c1)] = starts.as_slice() else {
            return Err(ConfigError::StartCount {
                found: starts.len(),
            });
        };
        if c0 != c1 {
            return Err(ConfigError::StartColumnsDiffer {
                first: c0,
                second: c1,
            });
        }
        // Row-major discovery guarantees r0 < r1
        Ok(DVec2::new(
            c0 as f64 + vehicle_length / 2.0,
            (r0 + r1 + 1) as f64 / 2.0,
        ))
    }
}

impl TryFrom<Vec<Vec<TileKind>>> for Track {
    type Error = FormatError;

    fn try_from(rows: Vec<Vec<TileKind>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Track> for Vec<Vec<TileKind>> {
    fn from(track: Track) -> Self {
        track.rows().map(<[TileKind]>::to_vec).collect()
    }
}
