//! Footprint containment and contact detection against the tile grid
//!
//! Contacts are conservative: any cell the bounding box touches counts as a
//! full overlap, so the vehicle reads slightly larger than it is near walls
//! and goals.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::Footprint;
use super::tile::TileKind;
use super::track::Track;

/// Axis-aligned rectangle in grid units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn overlaps(&self, track: &Track, kind: TileKind) -> bool {
        track.rect_overlaps(kind, self.min.x, self.min.y, self.max.x, self.max.y)
    }

    /// Whether the box touches any tile that blocks the vehicle
    pub fn touches_solid(&self, track: &Track) -> bool {
        track.rect_any(self.min.x, self.min.y, self.max.x, self.max.y, |t| t.is_solid())
    }
}

/// Events detected for one footprint placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contacts {
    pub collision: bool,
    pub goal: bool,
}

impl Contacts {
    #[inline]
    pub fn any(&self) -> bool {
        self.collision || self.goal
    }
}

/// Wall and goal tests, evaluated independently
pub fn detect_contacts(track: &Track, bbox: &Aabb) -> Contacts {
    Contacts {
        collision: bbox.touches_solid(track),
        goal: bbox.overlaps(track, TileKind::Goal),
    }
}

/// Lower bound first, then upper: an empty range resolves to `hi`
#[inline]
fn clip(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Keep the vehicle centre far enough from the grid edges
///
/// `x` is bounded by half the length and `y` by half the width regardless of
/// heading.
pub fn clamp_to_track(pos: DVec2, footprint: &Footprint, track: &Track) -> DVec2 {
    let half_len = footprint.length / 2.0;
    let half_wid = footprint.width / 2.0;
    DVec2::new(
        clip(pos.x, half_len, track.width() as f64 - half_len),
        clip(pos.y, half_wid, track.height() as f64 - half_wid),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::heading::Heading;
    use proptest::prelude::*;

    fn corridor() -> Track {
        Track::parse("0,0,0,0,1\n0,0,0,0,1\n0,0,0,0,M\n").unwrap()
    }

    #[test]
    fn test_no_contact_in_open_space() {
        let track = corridor();
        let fp = Footprint {
            length: 2.0,
            width: 1.0,
        };
        let bb = fp.aabb(DVec2::new(1.2, 1.0), Heading::East);
        assert_eq!(detect_contacts(&track, &bb), Contacts::default());
    }

    #[test]
    fn test_wall_contact() {
        let track = corridor();
        let fp = Footprint {
            length: 2.0,
            width: 1.0,
        };
        // max.x = 3.1 touches column 4
        let bb = fp.aabb(DVec2::new(2.1, 0.5), Heading::East);
        let contacts = detect_contacts(&track, &bb);
        assert!(contacts.collision);
        assert!(contacts.any());
    }

    #[test]
    fn test_wall_and_goal_together() {
        let track = corridor();
        let fp = Footprint {
            length: 2.0,
            width: 1.0,
        };
        let bb = fp.aabb(DVec2::new(3.0, 1.5), Heading::East);
        let contacts = detect_contacts(&track, &bb);
        assert!(contacts.collision);
        assert!(contacts.goal);
    }

    #[test]
    fn test_only_walls_are_solid() {
        // Outside, oil and dirt beside the box, wall two columns further
        let track = Track::parse("2,3,4,0,1\n2,3,4,0,1\n").unwrap();
        let bb = Aabb {
            min: DVec2::new(0.2, 0.2),
            max: DVec2::new(2.8, 1.8),
        };
        assert!(!bb.touches_solid(&track));
        assert!(!detect_contacts(&track, &bb).collision);

        let bb = Aabb {
            min: DVec2::new(1.2, 0.2),
            max: DVec2::new(3.2, 1.8),
        };
        assert!(bb.touches_solid(&track));
        assert!(detect_contacts(&track, &bb).collision);
    }

    #[test]
    fn test_clamp_uses_length_on_x_and_width_on_y() {
        let track = corridor();
        let fp = Footprint {
            length: 2.0,
            width: 1.0,
        };
        assert_eq!(
            clamp_to_track(DVec2::new(-10.0, -10.0), &fp, &track),
            DVec2::new(1.0, 0.5)
        );
        assert_eq!(
            clamp_to_track(DVec2::new(10.0, 10.0), &fp, &track),
            DVec2::new(4.0, 2.5)
        );
    }

    #[test]
    fn test_clamp_degenerate_range() {
        let track = Track::parse("0,0\n").unwrap();
        let fp = Footprint {
            length: 4.0,
            width: 2.0,
        };
        // Track narrower than the vehicle: resolves to the upper bound
        let pos = clamp_to_track(DVec2::new(1.0, 0.5), &fp, &track);
        assert_eq!(pos, DVec2::new(0.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_clamp_bounds(x in -20.0f64..40.0, y in -20.0f64..40.0) {
            let track = corridor();
            let fp = Footprint { length: 2.0, width: 1.0 };
            let p = clamp_to_track(DVec2::new(x, y), &fp, &track);
            prop_assert!(p.x >= 1.0 && p.x <= 4.0);
            prop_assert!(p.y >= 0.5 && p.y <= 2.5);
        }
    }
}
