//! Hand angle mapping
//!
//! Angles are measured clockwise from twelve o'clock, in radians.

use std::f64::consts::TAU;

use meridian_core::HandUnit;

/// Linear map from a clock unit to a hand rotation in `[0, 2π)`
#[derive(Debug, Clone, Copy, Default)]
pub struct AngleMapper;

impl AngleMapper {
    /// Rotation for `value` expressed in `unit`.
    ///
    /// Values outside the unit's domain wrap by its modulus (60 for seconds
    /// and minutes, 12 for hours). Returns `None` for an unrecognized unit.
    pub fn angle(unit: HandUnit, value: f64) -> Option<f64> {
        let modulus = unit.modulus()?;
        if !value.is_finite() {
            return Some(0.0);
        }

        let angle = value.rem_euclid(modulus) / modulus * TAU;
        // rem_euclid may round a tiny negative up to the modulus itself
        if angle >= TAU {
            Some(0.0)
        } else {
            Some(angle)
        }
    }

    /// Hand tip position for a radius, in a y-down coordinate system centered
    /// on the dial pivot.
    pub fn tip(angle: f64, radius: f64) -> (f64, f64) {
        (radius * angle.sin(), -radius * angle.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_is_twelve_o_clock() {
        assert_eq!(AngleMapper::angle(HandUnit::Seconds, 0.0), Some(0.0));
        assert_eq!(AngleMapper::angle(HandUnit::Hours, 0.0), Some(0.0));
    }

    #[test]
    fn test_quarter_turns() {
        let quarter = TAU / 4.0;
        let minutes = AngleMapper::angle(HandUnit::Minutes, 15.0).unwrap();
        let hours = AngleMapper::angle(HandUnit::Hours, 3.0).unwrap();
        assert!((minutes - quarter).abs() < 1e-12);
        assert!((hours - quarter).abs() < 1e-12);
    }

    #[test]
    fn test_seconds_end_of_range() {
        let angle = AngleMapper::angle(HandUnit::Seconds, 59.999).unwrap();
        assert!(angle < TAU);
        assert!((TAU - angle) < 1e-3);
    }

    #[test]
    fn test_hours_wrap() {
        assert!(AngleMapper::angle(HandUnit::Hours, 11.999).unwrap() < TAU);
        assert_eq!(
            AngleMapper::angle(HandUnit::Hours, 0.0),
            AngleMapper::angle(HandUnit::Hours, 12.0 % 12.0)
        );
        assert_eq!(
            AngleMapper::angle(HandUnit::Hours, 12.0),
            AngleMapper::angle(HandUnit::Hours, 0.0)
        );
        let afternoon = AngleMapper::angle(HandUnit::Hours, 15.5).unwrap();
        let morning = AngleMapper::angle(HandUnit::Hours, 3.5).unwrap();
        assert!((afternoon - morning).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_domain_clamped() {
        assert!(AngleMapper::angle(HandUnit::Seconds, -1e-18).unwrap() < TAU);
        assert_eq!(AngleMapper::angle(HandUnit::Seconds, f64::NAN), Some(0.0));
        let negative = AngleMapper::angle(HandUnit::Minutes, -15.0).unwrap();
        assert!((negative - 3.0 * TAU / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_unrecognized_unit() {
        assert_eq!(AngleMapper::angle(HandUnit::Unrecognized, 10.0), None);
    }

    #[test]
    fn test_tip() {
        let (x, y) = AngleMapper::tip(0.0, 70.0);
        assert!(x.abs() < 1e-12);
        assert!((y + 70.0).abs() < 1e-12);
        let (x, y) = AngleMapper::tip(TAU / 4.0, 50.0);
        assert!((x - 50.0).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_seconds_strictly_increasing(a in 0.0f64..59.99, delta in 1e-6f64..1.0) {
            let b = (a + delta).min(59.999_999);
            prop_assume!(b > a);
            let lo = AngleMapper::angle(HandUnit::Seconds, a).unwrap();
            let hi = AngleMapper::angle(HandUnit::Seconds, b).unwrap();
            prop_assert!(lo < hi);
        }

        #[test]
        fn prop_angle_in_range(unit in prop_oneof![
            Just(HandUnit::Hours),
            Just(HandUnit::Minutes),
            Just(HandUnit::Seconds),
        ], value in -1000.0f64..1000.0) {
            let angle = AngleMapper::angle(unit, value).unwrap();
            prop_assert!((0.0..TAU).contains(&angle));
        }

        #[test]
        fn prop_hours_periodic(h in 0.0f64..12.0) {
            let a = AngleMapper::angle(HandUnit::Hours, h).unwrap();
            let b = AngleMapper::angle(HandUnit::Hours, h + 12.0).unwrap();
            prop_assert!((a - b).abs() < 1e-9 || (TAU - (a - b).abs()) < 1e-9);
        }
    }
}
