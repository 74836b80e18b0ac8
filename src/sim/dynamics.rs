//! Vehicle kinematics
//!
//! Pure functions: speed/boost transition and heading-aligned displacement.
//! The speed update order is load-bearing: throttle, boost decay, surface
//! multiplier, boost retrigger.

use glam::DVec2;

use super::heading::Heading;
use super::tick::Throttle;
use super::tile::TileKind;
use crate::settings::DynamicsSettings;

/// Speed multiplier applied for the surface under the vehicle centre
pub fn surface_multiplier(params: &DynamicsSettings, tile: TileKind) -> f64 {
    match tile {
        TileKind::Oil => params.oil_multiplier,
        TileKind::Dirt => params.dirt_multiplier,
        TileKind::Pavement
        | TileKind::Wall
        | TileKind::Outside
        | TileKind::Boost
        | TileKind::Start
        | TileKind::Goal => 1.0,
    }
}

/// Advance speed and boost timer by one step
///
/// `tile` is the tile under the vehicle centre before this step's move.
/// Returns `(speed, boost_timer)`.
pub fn advance(
    params: &DynamicsSettings,
    speed: f64,
    throttle: Throttle,
    tile: TileKind,
    boost_timer: u32,
    dt: f64,
) -> (f64, u32) {
    let mut v = speed;
    let mut timer = boost_timer;

    match throttle {
        Throttle::Accelerate => v = params.max_speed.min(v + params.acceleration * dt),
        Throttle::Brake => v = (v - params.braking * dt).max(0.0),
        Throttle::Neutral => {}
    }

    if timer > 0 {
        v = params.max_speed.min(v * params.boost_factor.powf(dt));
        timer -= 1;
    }

    v *= surface_multiplier(params, tile);

    if tile == TileKind::Boost {
        // Refresh, never stack
        timer = timer.max(params.boost_duration);
    }

    (v, timer)
}

/// World displacement for one step along `heading`
#[inline]
pub fn displacement(heading: Heading, speed: f64, dt: f64) -> DVec2 {
    heading.unit() * (speed * dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params() -> DynamicsSettings {
        DynamicsSettings::default()
    }

    #[test]
    fn test_throttle() {
        let p = params();
        let (v, _) = advance(&p, 0.0, Throttle::Accelerate, TileKind::Pavement, 0, 1.0);
        assert_eq!(v, p.acceleration);

        let (v, _) = advance(&p, p.max_speed, Throttle::Accelerate, TileKind::Pavement, 0, 1.0);
        assert_eq!(v, p.max_speed);

        let (v, _) = advance(&p, 0.1, Throttle::Brake, TileKind::Pavement, 0, 1.0);
        assert_eq!(v, 0.0);

        let (v, _) = advance(&p, 1.25, Throttle::Neutral, TileKind::Pavement, 0, 1.0);
        assert_eq!(v, 1.25);
    }

    #[test]
    fn test_surfaces() {
        let p = params();
        let (v, _) = advance(&p, 1.0, Throttle::Neutral, TileKind::Oil, 0, 1.0);
        assert_eq!(v, 0.9);
        let (v, _) = advance(&p, 1.0, Throttle::Neutral, TileKind::Dirt, 0, 1.0);
        assert_eq!(v, 0.95);
        for kind in [TileKind::Pavement, TileKind::Start, TileKind::Goal, TileKind::Outside] {
            assert_eq!(surface_multiplier(&p, kind), 1.0);
        }
    }

    #[test]
    fn test_boost_order() {
        let p = params();
        // Decay applies before surface, then the timer refreshes on a boost tile
        let (v, timer) = advance(&p, 1.0, Throttle::Neutral, TileKind::Boost, 3, 1.0);
        assert_eq!(v, 1.0 * 1.05);
        assert_eq!(timer, 10);

        // Fresh trigger: no multiplier on the step it is picked up
        let (v, timer) = advance(&p, 1.0, Throttle::Neutral, TileKind::Boost, 0, 1.0);
        assert_eq!(v, 1.0);
        assert_eq!(timer, 10);

        // Boost never exceeds max speed
        let (v, _) = advance(&p, p.max_speed, Throttle::Neutral, TileKind::Pavement, 5, 1.0);
        assert_eq!(v, p.max_speed);
    }

    #[test]
    fn test_boost_refresh_does_not_stack() {
        let p = DynamicsSettings {
            boost_duration: 10,
            ..params()
        };
        let (_, timer) = advance(&p, 0.0, Throttle::Neutral, TileKind::Boost, 25, 1.0);
        assert_eq!(timer, 24);
    }

    #[test]
    fn test_boost_pin_and_decay() {
        let p = params();
        let mut v = 0.5;
        let mut timer = 0;
        for _ in 0..7 {
            (v, timer) = advance(&p, v, Throttle::Neutral, TileKind::Boost, timer, 1.0);
            assert_eq!(timer, 10);
        }
        for expected in (0..10).rev() {
            (v, timer) = advance(&p, v, Throttle::Neutral, TileKind::Pavement, timer, 1.0);
            assert_eq!(timer, expected);
        }
        let before = v;
        (v, timer) = advance(&p, v, Throttle::Neutral, TileKind::Pavement, timer, 1.0);
        assert_eq!(timer, 0);
        assert_eq!(v, before);
    }

    #[test]
    fn test_displacement() {
        assert_eq!(displacement(Heading::East, 2.0, 0.5), DVec2::new(1.0, 0.0));
        assert_eq!(displacement(Heading::North, 1.5, 1.0), DVec2::new(0.0, -1.5));
        assert_eq!(displacement(Heading::West, 0.0, 1.0).length(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_speed_stays_in_range(
            speed in 0.0f64..2.0,
            throttle in 0usize..3,
            tile in 0u8..8,
            timer in 0u32..20,
            dt in 0.05f64..1.0,
        ) {
            let p = params();
            let throttle = Throttle::from_index(throttle);
            let tile = TileKind::from_code(tile).unwrap();
            let (v, t) = advance(&p, speed, throttle, tile, timer, dt);
            prop_assert!(v >= 0.0);
            prop_assert!(v <= p.max_speed);
            prop_assert!(t <= timer.max(p.boost_duration));
        }
    }
}
