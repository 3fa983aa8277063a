//! Road scroller: two stacked tiles give the illusion of an endless road.

/// Pair of congruent road tiles. The segment y-offsets always differ by
/// exactly one tile height.
#[derive(Debug, Clone)]
pub struct Road {
    pub screen_height: f64,
    pub tile_height: f64,
    /// Top edge of each segment.
    segments: [f64; 2],
}

impl Road {
    /// First tile fills the screen from the top, second sits directly above it.
    pub fn new(screen_height: f64, tile_height: f64) -> Self {
        Self {
            screen_height,
            tile_height,
            segments: [0.0, -tile_height],
        }
    }

    pub fn segment_offsets(&self) -> [f64; 2] {
        self.segments
    }

    /// Scroll both segments by `scroll_speed`. A segment whose top edge has
    /// reached the bottom of the screen moves directly above the other one.
    ///
    /// Negative speeds scroll upwards; a segment whose bottom edge has passed
    /// above the screen is moved directly below the other one. A segment
    /// resting exactly one tile above the screen stays put.
    pub fn update(&mut self, scroll_speed: f64) {
        self.segments[0] += scroll_speed;
        self.segments[1] += scroll_speed;

        if self.segments[0] >= self.screen_height {
            self.segments[0] = self.segments[1] - self.tile_height;
        } else if self.segments[1] >= self.screen_height {
            self.segments[1] = self.segments[0] - self.tile_height;
        } else if self.segments[0] + self.tile_height < 0.0 {
            self.segments[0] = self.segments[1] + self.tile_height;
        } else if self.segments[1] + self.tile_height < 0.0 {
            self.segments[1] = self.segments[0] + self.tile_height;
        }
    }

    /// Maps a screen y to the row inside the tile covering it, as a fraction
    /// of the tile height in `[0, 1)`. `None` if neither segment covers `y`.
    pub fn tile_fraction_at(&self, y: f64) -> Option<f64> {
        self.segments.iter().find_map(|&top| {
            let offset = y - top;
            (offset >= 0.0 && offset < self.tile_height).then(|| offset / self.tile_height)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const SCREEN: f64 = 650.0;

    fn assert_tiled(road: &Road) {
        let [a, b] = road.segment_offsets();
        assert!(
            ((a - b).abs() - road.tile_height).abs() < 1e-6,
            "segments {} and {} are not one tile apart",
            a,
            b
        );
    }

    #[test]
    fn test_initial_layout() {
        let road = Road::new(SCREEN, SCREEN);
        assert_eq!(road.segment_offsets(), [0.0, -SCREEN]);
        assert_tiled(&road);
    }

    #[test]
    fn test_scroll_moves_both_segments() {
        let mut road = Road::new(SCREEN, SCREEN);
        road.update(10.0);
        assert_eq!(road.segment_offsets(), [10.0, -640.0]);
    }

    #[test]
    fn test_wrap_when_top_reaches_screen_height() {
        let mut road = Road::new(SCREEN, SCREEN);
        // Advance until segment 0 lands exactly on the boundary
        for _ in 0..65 {
            road.update(10.0);
        }
        let [a, b] = road.segment_offsets();
        assert_eq!(b, 0.0);
        assert_eq!(a, -SCREEN);
        assert_tiled(&road);
    }

    #[test]
    fn test_zero_speed_is_stationary() {
        let mut road = Road::new(SCREEN, SCREEN);
        for _ in 0..5 {
            road.update(0.0);
            assert_eq!(road.segment_offsets(), [0.0, -SCREEN]);
        }
    }

    #[test]
    fn test_stopping_right_after_wrap_is_stationary() {
        let mut road = Road::new(SCREEN, SCREEN);
        for _ in 0..65 {
            road.update(10.0);
        }
        let settled = road.segment_offsets();
        assert_eq!(settled, [-SCREEN, 0.0]);
        for _ in 0..5 {
            road.update(0.0);
            assert_eq!(road.segment_offsets(), settled);
        }
    }

    #[test]
    fn test_negative_speed_wraps_upwards() {
        let mut road = Road::new(SCREEN, SCREEN);
        road.update(-20.0);
        let [a, b] = road.segment_offsets();
        // Segment 1 left through the top and now sits below segment 0
        assert_eq!(a, -20.0);
        assert_eq!(b, 630.0);
        assert_tiled(&road);
    }

    #[test]
    fn test_tiling_invariant_random_speeds() {
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut road = Road::new(SCREEN, SCREEN + rng.gen_range(0.0..200.0));
            for _ in 0..2000 {
                let speed = match rng.gen_range(0..4) {
                    0 => 0.0,
                    1 => -rng.gen_range(0.0..30.0),
                    _ => rng.gen_range(0.0..30.0),
                };
                road.update(speed);
                assert_tiled(&road);
            }
        }
    }

    #[test]
    fn test_screen_always_covered() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut road = Road::new(SCREEN, SCREEN);
        for _ in 0..1000 {
            road.update(rng.gen_range(0.0..30.0));
            for y in [0.0, 1.0, SCREEN / 2.0, SCREEN - 1.0] {
                assert!(road.tile_fraction_at(y).is_some(), "gap at y={}", y);
            }
        }
    }

    #[test]
    fn test_tile_fraction() {
        let road = Road::new(SCREEN, SCREEN);
        assert_eq!(road.tile_fraction_at(0.0), Some(0.0));
        assert_eq!(road.tile_fraction_at(325.0), Some(0.5));
        assert_eq!(road.tile_fraction_at(-325.0), Some(0.5));
        assert_eq!(road.tile_fraction_at(-700.0), None);
    }
}
