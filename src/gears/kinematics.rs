//! Gear mesh kinematics: ratios, pitch-line and sliding velocities.
//!
//! Angular velocities are signed (rad/s). Tangential velocities are
//! magnitudes; sliding velocities of the two gears are equal and opposite.

use serde::Serialize;

use crate::gears::error::{GearError, GearResult};
use crate::gears::mesh::{pressure_angle_transverse_contact, GearPair};

pub use crate::gears::mesh::{transmission_ratio, working_pitch_diameters};

/// Linear velocity of the pitch point, `w d / 2`.
///
/// This is the surface speed of the working pitch circle. Some references
/// tabulate `d w` instead, which is twice this value. Equal in magnitude for
/// both gears of a pair.
#[must_use]
pub fn pitch_line_velocity(working_pitch_diameter: f64, angular_velocity: f64) -> f64 {
    angular_velocity * working_pitch_diameter / 2.0
}

/// Velocity of the contact point along the tooth profile, as a magnitude.
///
/// Never negative, whatever the sign of the angular velocity or of the
/// pressure angle.
#[must_use]
pub fn tangential_velocity(
    base_diameter: f64,
    pressure_angle_contact: f64,
    angular_velocity: f64,
) -> f64 {
    (angular_velocity * pressure_angle_contact.tan() * base_diameter / 2.0).abs()
}

/// Sliding velocity of each gear at a contact point, `(v1, -v1)`.
#[must_use]
pub fn sliding_velocity(
    base_diameter1: f64,
    base_diameter2: f64,
    pressure_angle_contact1: f64,
    pressure_angle_contact2: f64,
    angular_velocity1: f64,
    angular_velocity2: f64,
) -> (f64, f64) {
    let v1 = tangential_velocity(base_diameter1, pressure_angle_contact1, angular_velocity1);
    let v2 = tangential_velocity(base_diameter2, pressure_angle_contact2, angular_velocity2);
    let sliding = v1 - v2;
    (sliding, -sliding)
}

/// Specific sliding of each gear: its sliding velocity over its own
/// tangential velocity.
///
/// # Errors
///
/// Returns [`GearError::ZeroTangentialVelocity`] when a gear's tangential
/// velocity is zero, i.e. the contact point is at that gear's base circle
/// or the gear is at rest.
pub fn specific_sliding(
    base_diameter1: f64,
    base_diameter2: f64,
    pressure_angle_contact1: f64,
    pressure_angle_contact2: f64,
    angular_velocity1: f64,
    angular_velocity2: f64,
) -> GearResult<(f64, f64)> {
    let v1 = tangential_velocity(base_diameter1, pressure_angle_contact1, angular_velocity1);
    let v2 = tangential_velocity(base_diameter2, pressure_angle_contact2, angular_velocity2);
    if v1 == 0.0 {
        return Err(GearError::ZeroTangentialVelocity { gear: 1 });
    }
    if v2 == 0.0 {
        return Err(GearError::ZeroTangentialVelocity { gear: 2 });
    }

    let (s1, s2) = sliding_velocity(
        base_diameter1,
        base_diameter2,
        pressure_angle_contact1,
        pressure_angle_contact2,
        angular_velocity1,
        angular_velocity2,
    );
    Ok((s1 / v1, s2 / v2))
}

/// Angular velocities of a meshing pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pair: GearPair,
    angular_velocity1: f64,
    angular_velocity2: f64,
}

/// Velocities at one point on the line of action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContactKinematics {
    /// Transverse pressure angles of gear 1 and gear 2 at the point (rad).
    pub pressure_angles: (f64, f64),
    /// Tangential velocity magnitudes (mm/s).
    pub tangential_velocity: (f64, f64),
    /// Sliding velocities (mm/s).
    pub sliding_velocity: (f64, f64),
    /// Specific sliding, `None` where a tangential velocity is zero.
    pub specific_sliding: Option<(f64, f64)>,
}

impl KinematicState {
    /// Creates a state from explicit angular velocities of both gears.
    #[must_use]
    pub const fn new(pair: GearPair, angular_velocity1: f64, angular_velocity2: f64) -> Self {
        Self {
            pair,
            angular_velocity1,
            angular_velocity2,
        }
    }

    /// Creates a state from the driver's angular velocity; gear 2 of the
    /// external pair turns the opposite way at `w1 / i`.
    #[must_use]
    pub fn from_driver(pair: GearPair, angular_velocity1: f64) -> Self {
        let angular_velocity2 = -angular_velocity1 / pair.transmission_ratio();
        Self::new(pair, angular_velocity1, angular_velocity2)
    }

    /// The gear pair.
    #[must_use]
    pub const fn pair(&self) -> &GearPair {
        &self.pair
    }

    /// Angular velocities `(w1, w2)` (rad/s).
    #[must_use]
    pub const fn angular_velocities(&self) -> (f64, f64) {
        (self.angular_velocity1, self.angular_velocity2)
    }

    /// Pitch-line velocity of gear 1 (mm/s).
    #[must_use]
    pub fn pitch_line_velocity(&self) -> f64 {
        pitch_line_velocity(self.pair.working_pitch_diameters().0, self.angular_velocity1)
    }

    /// Velocities at the contact point where gear 1 has the transverse
    /// pressure angle `pressure_angle1`.
    #[must_use]
    pub fn at_contact(&self, pressure_angle1: f64) -> ContactKinematics {
        let gear1 = self.pair.gear1();
        let gear2 = self.pair.gear2();
        let pressure_angle2 = pressure_angle_transverse_contact(
            self.pair.working_pressure_angle(),
            gear2.number_of_teeth(),
            gear1.number_of_teeth(),
            pressure_angle1,
        );
        let (db1, db2) = (gear1.base_diameter(), gear2.base_diameter());
        let (w1, w2) = self.angular_velocities();

        let specific = match specific_sliding(db1, db2, pressure_angle1, pressure_angle2, w1, w2) {
            Ok(values) => Some(values),
            Err(e) => {
                tracing::debug!(error = %e, "Specific sliding undefined at contact point");
                None
            }
        };

        ContactKinematics {
            pressure_angles: (pressure_angle1, pressure_angle2),
            tangential_velocity: (
                tangential_velocity(db1, pressure_angle1, w1),
                tangential_velocity(db2, pressure_angle2, w2),
            ),
            sliding_velocity: sliding_velocity(db1, db2, pressure_angle1, pressure_angle2, w1, w2),
            specific_sliding: specific,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gears::tooth::Gear;
    use approx::assert_abs_diff_eq;

    fn deg(value: f64) -> f64 {
        value.to_radians()
    }

    fn helical_pair() -> GearPair {
        let g1 = Gear::new(2.0, deg(20.0), deg(15.0), 20, 0.2).unwrap();
        let g2 = Gear::new(2.0, deg(20.0), deg(-15.0), 40, 0.0).unwrap();
        GearPair::new(g1, g2, 62.608_059_259_534_04).unwrap()
    }

    #[test]
    fn pitch_line_velocity_is_surface_speed() {
        assert_abs_diff_eq!(pitch_line_velocity(60.0, 10.0), 300.0);
        assert_abs_diff_eq!(pitch_line_velocity(60.0, -10.0), -300.0);

        let (d1, _) = working_pitch_diameters(90.0, 20, 40);
        assert_abs_diff_eq!(pitch_line_velocity(d1, 10.0), 300.0, epsilon = 1e-12);
    }

    #[test]
    fn tangential_velocity_is_magnitude() {
        let v = tangential_velocity(40.0, deg(30.0), -5.0);
        assert!(v > 0.0);
        assert_abs_diff_eq!(v, 5.0 * deg(30.0).tan() * 20.0, epsilon = 1e-12);

        // inside the base circle the pressure angle is negative
        let inside = tangential_velocity(20.0, -0.2, 10.0);
        assert_abs_diff_eq!(inside, 10.0 * 0.2_f64.tan() * 10.0, epsilon = 1e-12);
    }

    #[test]
    fn sliding_velocity_is_antisymmetric() {
        let cases = [
            (40.0, 80.0, deg(30.0), deg(15.0), 100.0, -50.0),
            (37.0, 55.0, deg(5.0), deg(40.0), -12.0, 3.0),
            (20.0, 20.0, deg(22.0), deg(22.0), 1.0, -1.0),
        ];
        for (db1, db2, a1, a2, w1, w2) in cases {
            let (s1, s2) = sliding_velocity(db1, db2, a1, a2, w1, w2);
            assert_eq!(s1, -s2);
        }
    }

    #[test]
    fn specific_sliding_at_tip_of_pinion() {
        let state = KinematicState::from_driver(helical_pair(), 100.0);
        let contact = state.at_contact(0.576_140_530_443_696_7);
        assert_abs_diff_eq!(contact.pressure_angles.1, 0.268_746, epsilon = 1e-5);
        assert_abs_diff_eq!(contact.sliding_velocity.0, 725.148_855, epsilon = 1e-3);
        let (ss1, ss2) = contact.specific_sliding.unwrap();
        assert_abs_diff_eq!(ss1, 0.576_078, epsilon = 1e-5);
        assert_abs_diff_eq!(ss2, -1.358_922, epsilon = 1e-5);
    }

    #[test]
    fn no_sliding_at_pitch_point() {
        let pair = helical_pair();
        let state = KinematicState::from_driver(pair, 100.0);
        let contact = state.at_contact(pair.working_pressure_angle());
        assert_abs_diff_eq!(contact.sliding_velocity.0, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(contact.tangential_velocity.0, contact.tangential_velocity.1, epsilon = 1e-9);
    }

    #[test]
    fn specific_sliding_undefined_at_base_circle() {
        let err = specific_sliding(40.0, 80.0, 0.0, deg(25.0), 10.0, -5.0).unwrap_err();
        assert_eq!(err, GearError::ZeroTangentialVelocity { gear: 1 });
        let err = specific_sliding(40.0, 80.0, deg(25.0), 0.0, 10.0, -5.0).unwrap_err();
        assert_eq!(err, GearError::ZeroTangentialVelocity { gear: 2 });
    }

    #[test]
    fn driven_gear_turns_opposite() {
        let state = KinematicState::from_driver(helical_pair(), 100.0);
        let (w1, w2) = state.angular_velocities();
        assert_abs_diff_eq!(w1, 100.0);
        assert_abs_diff_eq!(w2, -50.0);
        assert_abs_diff_eq!(state.pitch_line_velocity(), 2_086.935_309, epsilon = 1e-4);
    }
}
