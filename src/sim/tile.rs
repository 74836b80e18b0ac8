//! Tile kinds and their per-kind properties

use serde::{Deserialize, Serialize};

/// Number of tile kinds (one-hot channel count)
pub const TILE_KIND_COUNT: usize = 8;

/// Category of a single track cell
///
/// Discriminants are the stable integer codes used in track files and as
/// observation channel indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    #[default]
    Pavement = 0,
    /// The only kind the vehicle can crash into
    Wall = 1,
    /// Also returned for every query outside the grid
    Outside = 2,
    Oil = 3,
    Dirt = 4,
    Boost = 5,
    Start = 6,
    Goal = 7,
}

impl TileKind {
    pub const ALL: [TileKind; TILE_KIND_COUNT] = [
        TileKind::Pavement,
        TileKind::Wall,
        TileKind::Outside,
        TileKind::Oil,
        TileKind::Dirt,
        TileKind::Boost,
        TileKind::Start,
        TileKind::Goal,
    ];

    /// Stable integer code
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Parse a single track-file field: an integer code or a reserved letter
    /// (`S` start, `M` goal, case-insensitive)
    pub fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("s") {
            return Some(TileKind::Start);
        }
        if token.eq_ignore_ascii_case("m") {
            return Some(TileKind::Goal);
        }
        token.parse::<u8>().ok().and_then(Self::from_code)
    }

    /// Observation channel for this kind
    #[inline]
    pub fn channel(self) -> usize {
        self as usize
    }

    /// Single-character glyph used by the text renderer
    pub fn glyph(&self) -> char {
        match self {
            TileKind::Pavement => '.',
            TileKind::Wall => '#',
            TileKind::Outside => ' ',
            TileKind::Oil => 'o',
            TileKind::Dirt => ':',
            TileKind::Boost => '>',
            TileKind::Start => 'S',
            TileKind::Goal => 'M',
        }
    }

    /// Tiles that end the episode on contact
    pub fn is_solid(&self) -> bool {
        matches!(self, TileKind::Wall)
    }
}
