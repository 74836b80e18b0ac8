//! Colors for track elements (8-bit sRGB)

use crate::sim::TileKind;

pub const VEHICLE: [u8; 3] = [220, 20, 60];
pub const WINDSHIELD: [u8; 3] = [100, 120, 160];
/// Goal cells are drawn as a checkerboard of these two
pub const CHECKER_LIGHT: [u8; 3] = [240, 240, 240];
pub const CHECKER_DARK: [u8; 3] = [15, 15, 15];

/// Base fill color for a tile kind
pub fn tile_color(kind: TileKind) -> [u8; 3] {
    match kind {
        TileKind::Pavement => [128, 128, 128],
        TileKind::Wall => [255, 215, 0],
        TileKind::Outside => [34, 139, 34],
        TileKind::Oil => [20, 20, 20],
        TileKind::Dirt => [139, 90, 43],
        TileKind::Boost => [0, 191, 255],
        TileKind::Start => CHECKER_LIGHT,
        TileKind::Goal => CHECKER_LIGHT,
    }
}

/// Fill color for a cell, with the goal checkerboard resolved by position
pub fn cell_color(kind: TileKind, row: usize, col: usize) -> [u8; 3] {
    match kind {
        TileKind::Goal if (row + col) % 2 == 1 => CHECKER_DARK,
        _ => tile_color(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_checkerboard() {
        assert_eq!(cell_color(TileKind::Goal, 0, 0), CHECKER_LIGHT);
        assert_eq!(cell_color(TileKind::Goal, 0, 1), CHECKER_DARK);
        assert_eq!(cell_color(TileKind::Oil, 0, 1), tile_color(TileKind::Oil));
    }
}
