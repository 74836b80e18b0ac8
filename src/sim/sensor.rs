//! Egocentric perception patch
//!
//! Output row `i` is the forward axis (rows below `back_margin` look behind
//! the vehicle) and column `j` the lateral axis, centred on `width / 2`. The
//! same vehicle-relative layout is produced for every heading.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::heading::Heading;
use super::tile::{TILE_KIND_COUNT, TileKind};
use super::track::Track;

/// One-hot tile patch, `height x width x 8`, channel-last
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl Observation {
    fn zeros(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            data: vec![0.0; height * width * TILE_KIND_COUNT],
        }
    }

    /// `(height, width, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, TILE_KIND_COUNT)
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        (i * self.width + j) * TILE_KIND_COUNT
    }

    /// Channel value at `(i, j, c)`
    pub fn get(&self, i: usize, j: usize, channel: usize) -> f32 {
        self.data[self.offset(i, j) + channel]
    }

    /// The one-hot channel vector at `(i, j)`
    pub fn cell(&self, i: usize, j: usize) -> &[f32] {
        let start = self.offset(i, j);
        &self.data[start..start + TILE_KIND_COUNT]
    }

    /// Decode the hot channel at `(i, j)`
    pub fn tile(&self, i: usize, j: usize) -> Option<TileKind> {
        let cell = self.cell(i, j);
        cell.iter()
            .position(|v| *v == 1.0)
            .and_then(|c| TileKind::from_code(c as u8))
    }

    /// Flat height-major, width-minor, channel-last buffer
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw bytes of [`Self::as_slice`] for zero-copy hand-off
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Sample the oriented window around `center`
pub fn extract(
    track: &Track,
    center: DVec2,
    heading: Heading,
    width: usize,
    height: usize,
    back_margin: usize,
) -> Observation {
    let mut obs = Observation::zeros(height, width);
    let half = (width / 2) as i32;
    for i in 0..height {
        let forward = i as i32 - back_margin as i32;
        for j in 0..width {
            let lateral = j as i32 - half;
            let p = center + heading.local_to_world(forward, lateral);
            let kind = track.tile_at(p.y.floor() as i64, p.x.floor() as i64);
            let at = obs.offset(i, j) + kind.channel();
            obs.data[at] = 1.0;
        }
    }
    obs
}

#[cfg(test)]
mod tests {
    use super::*;

    // 5x5 with a unique tile in each direction from the centre cell (2, 2)
    //   north: Boost   east: Wall   south: Oil   west: Dirt
    const CROSS: &str = "0,0,0,0,0\n0,0,5,0,0\n0,4,0,1,0\n0,0,3,0,0\n0,0,0,0,0\n";

    fn centre() -> DVec2 {
        DVec2::new(2.5, 2.5)
    }

    #[test]
    fn test_shape_and_one_hot() {
        let track = Track::parse(CROSS).unwrap();
        let obs = extract(&track, centre(), Heading::East, 7, 9, 3);
        assert_eq!(obs.shape(), (9, 7, 8));
        assert_eq!(obs.as_slice().len(), 9 * 7 * 8);
        for i in 0..9 {
            for j in 0..7 {
                let sum: f32 = obs.cell(i, j).iter().sum();
                assert_eq!(sum, 1.0);
            }
        }
        assert_eq!(obs.as_bytes().len(), 9 * 7 * 8 * 4);
    }

    #[test]
    fn test_forward_cell_is_egocentric() {
        let track = Track::parse(CROSS).unwrap();
        let back = 1;
        // Row back+1 is one cell ahead, centre column is straight ahead
        let ahead = |h| extract(&track, centre(), h, 3, 3, back).tile(back + 1, 1);
        assert_eq!(ahead(Heading::East), Some(TileKind::Wall));
        assert_eq!(ahead(Heading::South), Some(TileKind::Oil));
        assert_eq!(ahead(Heading::West), Some(TileKind::Dirt));
        assert_eq!(ahead(Heading::North), Some(TileKind::Boost));
    }

    #[test]
    fn test_behind_and_lateral() {
        let track = Track::parse(CROSS).unwrap();
        let obs = extract(&track, centre(), Heading::East, 3, 3, 1);
        // Row 0 looks one cell behind (west)
        assert_eq!(obs.tile(0, 1), Some(TileKind::Dirt));
        // Column 2 is +1 lateral, which is south when facing east
        assert_eq!(obs.tile(1, 2), Some(TileKind::Oil));
        assert_eq!(obs.tile(1, 0), Some(TileKind::Boost));
        assert_eq!(obs.tile(1, 1), Some(TileKind::Pavement));
    }

    #[test]
    fn test_off_grid_is_outside() {
        let track = Track::parse(CROSS).unwrap();
        let obs = extract(&track, DVec2::new(0.5, 0.5), Heading::North, 3, 3, 0);
        // Everything ahead of a north-facing vehicle in row 0 is off the grid
        assert_eq!(obs.tile(1, 1), Some(TileKind::Outside));
        assert_eq!(obs.get(1, 1, TileKind::Outside.channel()), 1.0);
        assert_eq!(obs.tile(0, 1), Some(TileKind::Pavement));
    }
}
