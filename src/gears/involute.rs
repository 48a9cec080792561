//! Involute function, its inverse, and roll-angle conversions.
//!
//! Every other gear module builds on these. Angles are in radians.

use std::f64::consts::FRAC_PI_3;

use crate::gears::error::{GearError, GearResult};

/// Largest angle (60 deg) for which [`inverse_involute`] holds about six
/// significant figures.
pub const MAX_ACCURATE_INVERSE_INVOLUTE_ANGLE: f64 = FRAC_PI_3;

/// Involute function `tan(a) - a` of a pressure angle.
///
/// Defined for `0 <= a < pi/2`; singular at `pi/2`.
#[must_use]
pub fn involute(pressure_angle: f64) -> f64 {
    pressure_angle.tan() - pressure_angle
}

/// Solves `tan(a) - a = value` for `a`.
///
/// Uses Cheng's direct series approximation. Results are accurate to about
/// six significant figures up to [`MAX_ACCURATE_INVERSE_INVOLUTE_ANGLE`];
/// past that the error grows and is not bounded.
///
/// # Errors
///
/// Returns a domain error when `value` is negative or not finite.
pub fn inverse_involute(value: f64) -> GearResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(GearError::domain(
            "inverse_involute",
            format!("involute value {value} must be finite and non-negative"),
        ));
    }
    Ok(cheng_approximation(value))
}

/// Cheng's series for the inverse involute, without domain checks.
pub(crate) fn cheng_approximation(q: f64) -> f64 {
    let cbrt3 = 3.0_f64.cbrt();
    let cbrt9 = cbrt3 * cbrt3;
    let q13 = q.cbrt();
    let q23 = q13 * q13;

    let q53 = q * q23;
    let q73 = q * q * q13;
    let q93 = q * q * q;
    let q113 = q93 * q23;
    let q133 = q93 * q * q13;

    (3.0 * q).cbrt() - 2.0 * q / 5.0 + (9.0 / 175.0) * cbrt9 * q53
        - (2.0 / 175.0) * cbrt3 * q73
        - (144.0 / 67375.0) * q93
        + (3258.0 / 3_128_125.0) * cbrt9 * q113
        - (49711.0 / 153_278_125.0) * cbrt3 * q133
}

/// Converts an involute point's diameter to its roll angle.
///
/// # Errors
///
/// Returns a domain error when `base_diameter` is not positive or when
/// `diameter` lies inside the base circle.
pub fn diameter_to_roll_angle(base_diameter: f64, diameter: f64) -> GearResult<f64> {
    if base_diameter <= 0.0 {
        return Err(GearError::domain(
            "diameter_to_roll_angle",
            format!("base diameter {base_diameter} must be positive"),
        ));
    }
    if diameter < base_diameter {
        return Err(GearError::domain(
            "diameter_to_roll_angle",
            format!("diameter {diameter} is inside the base circle {base_diameter}"),
        ));
    }
    Ok((base_diameter / diameter).acos().tan())
}

/// Converts an involute roll angle to the diameter of that point.
#[must_use]
pub fn roll_angle_to_diameter(base_diameter: f64, roll_angle: f64) -> f64 {
    base_diameter / roll_angle.atan().cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn involute_of_twenty_degrees() {
        // Tabulated: inv(20 deg) = 0.014904
        assert_abs_diff_eq!(involute(20f64.to_radians()), 0.014_904, epsilon = 1e-6);
        assert_abs_diff_eq!(involute(0.0), 0.0);
    }

    #[test]
    fn inverse_round_trip() {
        for i in 1..100 {
            let angle = f64::from(i) / 100.0;
            let back = inverse_involute(involute(angle)).unwrap();
            assert_abs_diff_eq!(back, angle, epsilon = 1e-5);
        }
    }

    #[test]
    fn inverse_is_tight_at_small_angles() {
        let angle = 0.35;
        let back = inverse_involute(involute(angle)).unwrap();
        assert_abs_diff_eq!(back, angle, epsilon = 1e-9);
    }

    #[test]
    fn inverse_of_zero_is_zero() {
        assert_abs_diff_eq!(inverse_involute(0.0).unwrap(), 0.0);
    }

    #[test]
    fn inverse_rejects_negative() {
        assert!(matches!(
            inverse_involute(-0.001),
            Err(GearError::Domain { .. })
        ));
        assert!(inverse_involute(f64::NAN).is_err());
    }

    #[test]
    fn roll_angle_round_trip() {
        let base = 37.5;
        for d in [37.5, 40.0, 45.0, 60.0] {
            let roll = diameter_to_roll_angle(base, d).unwrap();
            assert_abs_diff_eq!(roll_angle_to_diameter(base, roll), d, epsilon = 1e-9);
        }
    }

    #[test]
    fn roll_angle_at_base_circle_is_zero() {
        assert_abs_diff_eq!(diameter_to_roll_angle(50.0, 50.0).unwrap(), 0.0);
    }

    #[test]
    fn roll_angle_rejects_inside_base_circle() {
        assert!(diameter_to_roll_angle(50.0, 49.0).is_err());
        assert!(diameter_to_roll_angle(0.0, 49.0).is_err());
    }
}
