//! Resistance curve applied to motion past a boundary.

/// Clamp `value` against `[min, max]` with decaying resistance.
///
/// Inside the range the value passes through. Past a boundary the overshoot
/// is mapped to `band_length * (1 - 1 / (overshoot / band_length + 1))`, which
/// grows monotonically and never reaches `band_length`. A zero band is a hard
/// clamp. Infinite bounds mean "no boundary" on that side.
pub fn rubber_band(value: f32, min: f32, max: f32, band_length: f32) -> f32 {
    if value > max {
        max + resist(value - max, band_length)
    } else if value < min {
        min - resist(min - value, band_length)
    } else {
        value
    }
}

fn resist(overshoot: f32, band_length: f32) -> f32 {
    if band_length <= 0.0 {
        return 0.0;
    }
    band_length * (1.0 - 1.0 / (overshoot / band_length + 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_inside_range_pass_through() {
        for value in [-10.0, 0.0, 33.3, 100.0] {
            assert_eq!(rubber_band(value, -10.0, 100.0, 50.0), value);
        }
    }

    #[test]
    fn overshoot_is_monotonic_and_bounded() {
        let mut previous = 100.0;
        for step in 1..200 {
            let value = 100.0 + step as f32 * 5.0;
            let banded = rubber_band(value, 0.0, 100.0, 50.0);
            assert!(banded > previous, "{banded} should exceed {previous}");
            assert!(banded < 150.0, "{banded} should stay below the band");
            previous = banded;
        }

        let mut previous = 0.0;
        for step in 1..200 {
            let value = -(step as f32) * 5.0;
            let banded = rubber_band(value, 0.0, 100.0, 50.0);
            assert!(banded < previous);
            assert!(banded > -50.0);
            previous = banded;
        }
    }

    #[test]
    fn known_overshoot_values() {
        // 20 past the max with a 50 band: 50 * (1 - 1 / 1.4)
        let banded = rubber_band(120.0, 0.0, 100.0, 50.0);
        assert!((banded - 114.285_71).abs() < 1e-3);
        assert!(banded > 100.0 && banded < 120.0);

        // 30 below the min: 50 * (1 - 1 / 1.6) = 18.75
        assert!((rubber_band(-30.0, 0.0, f32::INFINITY, 50.0) + 18.75).abs() < 1e-4);
    }

    #[test]
    fn zero_band_is_hard_clamp() {
        assert_eq!(rubber_band(150.0, 0.0, 100.0, 0.0), 100.0);
        assert_eq!(rubber_band(-5.0, 0.0, 100.0, 0.0), 0.0);
    }

    #[test]
    fn infinite_bounds_never_band() {
        let value = 1.0e30;
        assert_eq!(
            rubber_band(value, f32::NEG_INFINITY, f32::INFINITY, 50.0),
            value
        );
        assert_eq!(rubber_band(-value, -f32::MAX, f32::MAX, 0.0), -value);
    }

    #[test]
    fn infinite_value_approaches_band_limit() {
        assert_eq!(rubber_band(f32::INFINITY, 0.0, 100.0, 50.0), 150.0);
    }
}
