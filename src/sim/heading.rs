//! Cardinal headings and the orientation table
//!
//! Every orientation-dependent quantity (travel direction, local-to-world
//! rotation for perception, footprint swap for the bounding box) comes from
//! [`ORIENTATIONS`]. Nothing else branches on heading.

use glam::{DMat2, DVec2};
use serde::{Deserialize, Serialize};

/// Discrete travel direction, cyclic in 90° steps (clockwise on screen, y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Heading {
    #[default]
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

/// Geometry attached to a heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Unit displacement per unit speed
    pub unit: DVec2,
    /// Maps a local (forward, lateral) offset to a world (dx, dy) delta
    pub local_to_world: DMat2,
    /// Whether vehicle length lies along the world y axis
    pub swaps_footprint: bool,
}

/// Indexed by `Heading as usize`
pub const ORIENTATIONS: [Orientation; 4] = [
    // East: (f, l) -> (f, l)
    Orientation {
        unit: DVec2::X,
        local_to_world: DMat2::from_cols(DVec2::X, DVec2::Y),
        swaps_footprint: false,
    },
    // South: (f, l) -> (-l, f)
    Orientation {
        unit: DVec2::Y,
        local_to_world: DMat2::from_cols(DVec2::Y, DVec2::NEG_X),
        swaps_footprint: true,
    },
    // West: (f, l) -> (-f, -l)
    Orientation {
        unit: DVec2::NEG_X,
        local_to_world: DMat2::from_cols(DVec2::NEG_X, DVec2::NEG_Y),
        swaps_footprint: false,
    },
    // North: (f, l) -> (l, -f)
    Orientation {
        unit: DVec2::NEG_Y,
        local_to_world: DMat2::from_cols(DVec2::NEG_Y, DVec2::X),
        swaps_footprint: true,
    },
];

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::East, Heading::South, Heading::West, Heading::North];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    #[inline]
    pub fn orientation(self) -> &'static Orientation {
        &ORIENTATIONS[self.index()]
    }

    /// 90° clockwise (steer right)
    pub fn turned_right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// 90° counter-clockwise (steer left)
    pub fn turned_left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    #[inline]
    pub fn unit(self) -> DVec2 {
        self.orientation().unit
    }

    /// Rotate an integer local offset into a world delta
    #[inline]
    pub fn local_to_world(self, forward: i32, lateral: i32) -> DVec2 {
        self.orientation().local_to_world * DVec2::new(forward as f64, lateral as f64)
    }
}
