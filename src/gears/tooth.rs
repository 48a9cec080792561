//! Single-gear tooth geometry.
//!
//! Transverse quantities derive from normal quantities through the helix
//! angle; at a helix angle of zero (spur gear) the two coincide. Formulas
//! that divide by `sin` or `tan` of the helix angle return `None` for spur
//! gears instead of dividing by zero.
//!
//! Angles are in radians and lengths in millimetres. Tooth counts are signed
//! in the free functions so that internal gears can be expressed; [`Gear`]
//! itself only models external gears.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::gears::error::{GearError, GearResult};
use crate::gears::involute::involute;
use crate::gears::rack::GearToolProfile;
use crate::gears::units::MM_PER_INCH;

// ---------------------------------------------------------------------------
// Helix
// ---------------------------------------------------------------------------

/// Axial pitch (lead) of a helix of `radius` and `helix_angle`.
///
/// Returns `None` for a spur gear, whose helix has no finite lead.
#[must_use]
pub fn helix_pitch(radius: f64, helix_angle: f64) -> Option<f64> {
    let tan = helix_angle.abs().tan();
    (tan != 0.0).then(|| 2.0 * PI * radius / tan)
}

/// Helix angle at an arbitrary diameter, from the helix angle at a reference
/// diameter.
#[must_use]
pub fn helix_angle_at_diameter(diameter: f64, helix_angle_ref: f64, diameter_ref: f64) -> f64 {
    (diameter * helix_angle_ref.tan() / diameter_ref).atan()
}

/// Helix angle at the base circle.
#[must_use]
pub fn helix_angle_base(helix_angle: f64, pressure_angle_transverse: f64) -> f64 {
    (helix_angle.tan() * pressure_angle_transverse.cos()).atan()
}

// ---------------------------------------------------------------------------
// Tooth size
// ---------------------------------------------------------------------------

/// Transverse module.
#[must_use]
pub fn module_transverse(module_normal: f64, helix_angle: f64) -> f64 {
    module_normal / helix_angle.cos()
}

/// Theoretical (reference) pitch diameter.
#[must_use]
pub fn pitch_diameter(module_transverse: f64, number_of_teeth: i32) -> f64 {
    module_transverse * f64::from(number_of_teeth)
}

/// Transverse pitch at an arbitrary diameter.
///
/// Passing the base diameter gives the transverse base pitch.
#[must_use]
pub fn pitch_transverse(diameter: f64, number_of_teeth: i32) -> f64 {
    PI * diameter / f64::from(number_of_teeth)
}

/// Normal pitch.
#[must_use]
pub fn pitch_normal(module_normal: f64) -> f64 {
    PI * module_normal
}

/// Axial pitch, `None` for a spur gear.
#[must_use]
pub fn pitch_axial(module_normal: f64, helix_angle: f64) -> Option<f64> {
    let sin = helix_angle.sin();
    (sin != 0.0).then(|| PI * module_normal / sin)
}

/// Normal base pitch.
#[must_use]
pub fn base_pitch_normal(module_normal: f64, pressure_angle_normal: f64) -> f64 {
    PI * module_normal * pressure_angle_normal.cos()
}

/// Axial base pitch, `None` for a spur gear.
///
/// The lead of the tooth helix does not change with diameter, so this equals
/// the axial pitch at the reference diameter.
#[must_use]
pub fn base_pitch_axial(
    module_normal: f64,
    pressure_angle_normal: f64,
    helix_angle_base: f64,
) -> Option<f64> {
    let sin = helix_angle_base.sin();
    (sin != 0.0).then(|| PI * module_normal * pressure_angle_normal.cos() / sin)
}

/// Diametral pitch (teeth per inch of pitch diameter) of a module in mm.
#[must_use]
pub fn diametral_pitch(module: f64) -> f64 {
    MM_PER_INCH / module
}

// ---------------------------------------------------------------------------
// Pressure angle
// ---------------------------------------------------------------------------

/// Transverse pressure angle at the reference diameter.
#[must_use]
pub fn pressure_angle_transverse(pressure_angle_normal: f64, helix_angle: f64) -> f64 {
    (pressure_angle_normal.tan() / helix_angle.cos()).atan()
}

/// Transverse pressure angle at an arbitrary diameter.
///
/// # Errors
///
/// Returns a domain error when `diameter` lies inside the base circle.
pub fn pressure_angle_at_diameter(base_diameter: f64, diameter: f64) -> GearResult<f64> {
    let ratio = base_diameter / diameter;
    if !(0.0..=1.0).contains(&ratio) {
        return Err(GearError::domain(
            "pressure_angle_at_diameter",
            format!("diameter {diameter} is inside the base circle {base_diameter}"),
        ));
    }
    Ok(ratio.acos())
}

/// Diameter at which the involute has the given transverse pressure angle.
#[must_use]
pub fn diameter_at_pressure_angle(base_diameter: f64, pressure_angle_transverse: f64) -> f64 {
    base_diameter / pressure_angle_transverse.cos()
}

// ---------------------------------------------------------------------------
// Diameters
// ---------------------------------------------------------------------------

/// Base circle diameter.
#[must_use]
pub fn base_diameter(pitch_diameter: f64, pressure_angle_transverse: f64) -> f64 {
    pitch_diameter * pressure_angle_transverse.cos()
}

/// Root diameter. `rack_dedendum` and `profile_shift` are lengths in mm.
#[must_use]
pub fn root_diameter(pitch_diameter: f64, rack_dedendum: f64, profile_shift: f64) -> f64 {
    2.0f64.mul_add(-(rack_dedendum - profile_shift), pitch_diameter)
}

/// Tip diameter. `rack_addendum` and `profile_shift` are lengths in mm.
#[must_use]
pub fn tip_diameter(pitch_diameter: f64, rack_addendum: f64, profile_shift: f64) -> f64 {
    2.0f64.mul_add(rack_addendum + profile_shift, pitch_diameter)
}

// ---------------------------------------------------------------------------
// Tooth thickness
// ---------------------------------------------------------------------------

/// Circular tooth thickness in the transverse plane at the reference diameter.
#[must_use]
pub fn tooth_thickness_transverse(
    module_normal: f64,
    pressure_angle_normal: f64,
    helix_angle: f64,
    profile_shift_coefficient: f64,
) -> f64 {
    module_normal / helix_angle.cos()
        * (2.0 * profile_shift_coefficient).mul_add(pressure_angle_normal.tan(), FRAC_PI_2)
}

/// Circular tooth thickness in the transverse plane at an arbitrary diameter.
///
/// The transverse pressure angle, transverse module, reference diameter and
/// base diameter are derived in that order, each feeding the next.
///
/// # Errors
///
/// Returns a domain error when `diameter` lies inside the base circle.
pub fn tooth_thickness_transverse_at_diameter(
    diameter: f64,
    module_normal: f64,
    pressure_angle_normal: f64,
    number_of_teeth: i32,
    helix_angle: f64,
    profile_shift_coefficient: f64,
) -> GearResult<f64> {
    let alpha_t = pressure_angle_transverse(pressure_angle_normal, helix_angle);
    let m_t = module_transverse(module_normal, helix_angle);
    let d = pitch_diameter(m_t, number_of_teeth);
    let d_b = base_diameter(d, alpha_t);
    let alpha_y = pressure_angle_at_diameter(d_b, diameter)?;

    let z = f64::from(number_of_teeth);
    Ok(diameter
        * (PI / (2.0 * z)
            + 2.0 * profile_shift_coefficient * pressure_angle_normal.tan() / z
            + involute(alpha_t)
            - involute(alpha_y)))
}

/// Circular tooth thickness in the normal plane.
#[must_use]
pub fn tooth_thickness_normal(tooth_thickness_transverse: f64, helix_angle: f64) -> f64 {
    tooth_thickness_transverse * helix_angle.cos()
}

/// Half of the angle subtended by the tooth in the transverse plane.
#[must_use]
pub fn tooth_thickness_half_angle(diameter: f64, tooth_thickness_transverse_at_diameter: f64) -> f64 {
    tooth_thickness_transverse_at_diameter / diameter
}

// ---------------------------------------------------------------------------
// Gear
// ---------------------------------------------------------------------------

/// An external involute gear, spur or helical.
///
/// Only the defining parameters are stored; everything else is derived on
/// demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gear {
    module_normal: f64,
    pressure_angle_normal: f64,
    helix_angle: f64,
    number_of_teeth: i32,
    profile_shift_coefficient: f64,
}

impl Gear {
    /// Creates a gear after validating its parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the module is not positive, the normal pressure
    /// angle is outside `(0, pi/2)`, the helix angle is outside
    /// `(-pi/2, pi/2)`, the tooth count is not positive, or the profile
    /// shift coefficient is not finite.
    pub fn new(
        module_normal: f64,
        pressure_angle_normal: f64,
        helix_angle: f64,
        number_of_teeth: i32,
        profile_shift_coefficient: f64,
    ) -> GearResult<Self> {
        if !(module_normal.is_finite() && module_normal > 0.0) {
            return Err(GearError::invalid_parameter(
                "module_normal",
                format!("{module_normal} must be positive"),
            ));
        }
        if !(pressure_angle_normal > 0.0 && pressure_angle_normal < FRAC_PI_2) {
            return Err(GearError::invalid_parameter(
                "pressure_angle_normal",
                format!("{pressure_angle_normal} rad must lie in (0, pi/2)"),
            ));
        }
        if !(helix_angle > -FRAC_PI_2 && helix_angle < FRAC_PI_2) {
            return Err(GearError::invalid_parameter(
                "helix_angle",
                format!("{helix_angle} rad must lie in (-pi/2, pi/2)"),
            ));
        }
        if number_of_teeth <= 0 {
            return Err(GearError::invalid_parameter(
                "number_of_teeth",
                format!("{number_of_teeth} must be positive"),
            ));
        }
        if !profile_shift_coefficient.is_finite() {
            return Err(GearError::invalid_parameter(
                "profile_shift_coefficient",
                "must be finite",
            ));
        }

        Ok(Self {
            module_normal,
            pressure_angle_normal,
            helix_angle,
            number_of_teeth,
            profile_shift_coefficient,
        })
    }

    /// Creates a spur gear (zero helix angle).
    ///
    /// # Errors
    ///
    /// See [`Gear::new`].
    pub fn spur(
        module: f64,
        pressure_angle: f64,
        number_of_teeth: i32,
        profile_shift_coefficient: f64,
    ) -> GearResult<Self> {
        Self::new(module, pressure_angle, 0.0, number_of_teeth, profile_shift_coefficient)
    }

    /// Normal module (mm).
    #[must_use]
    pub const fn module_normal(&self) -> f64 {
        self.module_normal
    }

    /// Normal pressure angle (rad).
    #[must_use]
    pub const fn pressure_angle_normal(&self) -> f64 {
        self.pressure_angle_normal
    }

    /// Helix angle at the reference diameter (rad); the sign is the hand.
    #[must_use]
    pub const fn helix_angle(&self) -> f64 {
        self.helix_angle
    }

    /// Number of teeth.
    #[must_use]
    pub const fn number_of_teeth(&self) -> i32 {
        self.number_of_teeth
    }

    /// Profile shift coefficient.
    #[must_use]
    pub const fn profile_shift_coefficient(&self) -> f64 {
        self.profile_shift_coefficient
    }

    /// Returns `true` for a spur gear.
    #[must_use]
    pub fn is_spur(&self) -> bool {
        self.helix_angle == 0.0
    }

    /// Profile shift as a length (mm).
    #[must_use]
    pub fn profile_shift(&self) -> f64 {
        self.profile_shift_coefficient * self.module_normal
    }

    /// Transverse module (mm).
    #[must_use]
    pub fn module_transverse(&self) -> f64 {
        module_transverse(self.module_normal, self.helix_angle)
    }

    /// Transverse pressure angle at the reference diameter (rad).
    #[must_use]
    pub fn pressure_angle_transverse(&self) -> f64 {
        pressure_angle_transverse(self.pressure_angle_normal, self.helix_angle)
    }

    /// Reference pitch diameter (mm).
    #[must_use]
    pub fn pitch_diameter(&self) -> f64 {
        pitch_diameter(self.module_transverse(), self.number_of_teeth)
    }

    /// Base circle diameter (mm).
    #[must_use]
    pub fn base_diameter(&self) -> f64 {
        base_diameter(self.pitch_diameter(), self.pressure_angle_transverse())
    }

    /// Helix angle at the base circle (rad).
    #[must_use]
    pub fn helix_angle_base(&self) -> f64 {
        helix_angle_base(self.helix_angle, self.pressure_angle_transverse())
    }

    /// Transverse base pitch (mm).
    #[must_use]
    pub fn base_pitch_transverse(&self) -> f64 {
        pitch_transverse(self.base_diameter(), self.number_of_teeth)
    }

    /// Axial pitch (mm), `None` for a spur gear.
    #[must_use]
    pub fn pitch_axial(&self) -> Option<f64> {
        pitch_axial(self.module_normal, self.helix_angle)
    }

    /// Lead of the tooth helix (mm), `None` for a spur gear.
    #[must_use]
    pub fn lead(&self) -> Option<f64> {
        helix_pitch(self.pitch_diameter() / 2.0, self.helix_angle)
    }

    /// Root diameter generated by `tool` (mm).
    #[must_use]
    pub fn root_diameter(&self, tool: &GearToolProfile) -> f64 {
        root_diameter(
            self.pitch_diameter(),
            tool.dedendum(self.module_normal),
            self.profile_shift(),
        )
    }

    /// Tip diameter for the addendum of `tool` (mm).
    #[must_use]
    pub fn tip_diameter(&self, tool: &GearToolProfile) -> f64 {
        tip_diameter(
            self.pitch_diameter(),
            tool.addendum(self.module_normal),
            self.profile_shift(),
        )
    }

    /// Transverse pressure angle at `diameter` (rad).
    ///
    /// # Errors
    ///
    /// Returns a domain error when `diameter` lies inside the base circle.
    pub fn pressure_angle_at(&self, diameter: f64) -> GearResult<f64> {
        pressure_angle_at_diameter(self.base_diameter(), diameter)
    }

    /// Transverse circular tooth thickness at the reference diameter (mm).
    #[must_use]
    pub fn tooth_thickness_transverse(&self) -> f64 {
        tooth_thickness_transverse(
            self.module_normal,
            self.pressure_angle_normal,
            self.helix_angle,
            self.profile_shift_coefficient,
        )
    }

    /// Normal circular tooth thickness at the reference diameter (mm).
    #[must_use]
    pub fn tooth_thickness_normal(&self) -> f64 {
        tooth_thickness_normal(self.tooth_thickness_transverse(), self.helix_angle)
    }

    /// Transverse circular tooth thickness at `diameter` (mm).
    ///
    /// # Errors
    ///
    /// Returns a domain error when `diameter` lies inside the base circle.
    pub fn tooth_thickness_at(&self, diameter: f64) -> GearResult<f64> {
        tooth_thickness_transverse_at_diameter(
            diameter,
            self.module_normal,
            self.pressure_angle_normal,
            self.number_of_teeth,
            self.helix_angle,
            self.profile_shift_coefficient,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn deg(value: f64) -> f64 {
        value.to_radians()
    }

    #[test]
    fn spur_transverse_equals_normal() {
        assert_abs_diff_eq!(module_transverse(3.0, 0.0), 3.0);
        assert_abs_diff_eq!(pressure_angle_transverse(deg(20.0), 0.0), deg(20.0), epsilon = 1e-15);
    }

    #[test]
    fn helical_transverse_values() {
        // mn = 2, beta = 15 deg, alpha_n = 20 deg
        assert_abs_diff_eq!(module_transverse(2.0, deg(15.0)), 2.070_552, epsilon = 1e-6);
        assert_abs_diff_eq!(
            pressure_angle_transverse(deg(20.0), deg(15.0)).to_degrees(),
            20.646_896,
            epsilon = 1e-5
        );
    }

    #[test]
    fn spur_axial_quantities_are_not_applicable() {
        assert!(pitch_axial(2.0, 0.0).is_none());
        assert!(base_pitch_axial(2.0, deg(20.0), 0.0).is_none());
        assert!(helix_pitch(20.0, 0.0).is_none());
        assert!(pitch_axial(2.0, deg(15.0)).is_some());
    }

    #[test]
    fn axial_pitch_of_helix() {
        let pa = pitch_axial(2.0, deg(30.0)).unwrap();
        assert_abs_diff_eq!(pa, 4.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn diameters_of_standard_spur_gear() {
        let d = pitch_diameter(2.0, 20);
        assert_abs_diff_eq!(d, 40.0);
        assert_abs_diff_eq!(tip_diameter(d, 2.0, 0.0), 44.0);
        assert_abs_diff_eq!(root_diameter(d, 2.5, 0.0), 35.0);
        assert_abs_diff_eq!(base_diameter(d, deg(20.0)), 37.587_705, epsilon = 1e-6);
    }

    #[test]
    fn profile_shift_moves_root_and_tip_together() {
        let d = 40.0;
        assert_abs_diff_eq!(tip_diameter(d, 2.0, 0.5), 45.0);
        assert_abs_diff_eq!(root_diameter(d, 2.5, 0.5), 36.0);
    }

    #[test]
    fn pressure_angle_at_base_and_pitch() {
        let db = base_diameter(40.0, deg(20.0));
        assert_abs_diff_eq!(pressure_angle_at_diameter(db, db).unwrap(), 0.0);
        assert_abs_diff_eq!(
            pressure_angle_at_diameter(db, 40.0).unwrap(),
            deg(20.0),
            epsilon = 1e-12
        );
        assert!(pressure_angle_at_diameter(db, db - 0.1).is_err());
        assert_abs_diff_eq!(diameter_at_pressure_angle(db, deg(20.0)), 40.0, epsilon = 1e-12);
    }

    #[test]
    fn thickness_at_pitch_diameter_matches_reference() {
        let reference = tooth_thickness_transverse(2.0, deg(20.0), deg(15.0), 0.3);
        let d = pitch_diameter(module_transverse(2.0, deg(15.0)), 25);
        let at_pitch =
            tooth_thickness_transverse_at_diameter(d, 2.0, deg(20.0), 25, deg(15.0), 0.3).unwrap();
        assert_abs_diff_eq!(at_pitch, reference, epsilon = 1e-9);
    }

    #[test]
    fn thickness_of_unshifted_spur_is_half_pitch() {
        assert_abs_diff_eq!(tooth_thickness_transverse(2.0, deg(20.0), 0.0, 0.0), PI);
        assert_abs_diff_eq!(tooth_thickness_normal(PI, 0.0), PI);
    }

    #[test]
    fn thickness_shrinks_towards_tip() {
        let at_pitch = tooth_thickness_transverse_at_diameter(40.0, 2.0, deg(20.0), 20, 0.0, 0.0)
            .unwrap();
        let at_tip = tooth_thickness_transverse_at_diameter(44.0, 2.0, deg(20.0), 20, 0.0, 0.0)
            .unwrap();
        assert!(at_tip < at_pitch);
        assert!(at_tip > 0.0);
        assert_abs_diff_eq!(tooth_thickness_half_angle(40.0, at_pitch), PI / 40.0, epsilon = 1e-12);
    }

    #[test]
    fn helix_angle_follows_diameter() {
        let beta = deg(20.0);
        assert_abs_diff_eq!(helix_angle_at_diameter(50.0, beta, 50.0), beta, epsilon = 1e-15);
        assert!(helix_angle_at_diameter(40.0, beta, 50.0) < beta);
        assert_abs_diff_eq!(helix_angle_base(0.0, deg(20.0)), 0.0);
    }

    #[test]
    fn diametral_pitch_of_one_millimetre_module() {
        assert_abs_diff_eq!(diametral_pitch(1.0), 25.4);
    }

    #[test]
    fn gear_validates_parameters() {
        assert!(Gear::new(0.0, deg(20.0), 0.0, 20, 0.0).is_err());
        assert!(Gear::new(2.0, 0.0, 0.0, 20, 0.0).is_err());
        assert!(Gear::new(2.0, deg(20.0), deg(90.0), 20, 0.0).is_err());
        assert!(Gear::new(2.0, deg(20.0), 0.0, 0, 0.0).is_err());
        assert!(Gear::new(2.0, deg(20.0), 0.0, 20, f64::NAN).is_err());
        assert!(Gear::new(2.0, deg(20.0), deg(-15.0), 20, -0.4).is_ok());
    }

    #[test]
    fn gear_base_diameter_invariant() {
        for beta in [0.0, 10.0, 25.0, -30.0] {
            let gear = Gear::new(2.5, deg(20.0), deg(beta), 31, 0.2).unwrap();
            assert_abs_diff_eq!(
                gear.base_diameter(),
                gear.pitch_diameter() * gear.pressure_angle_transverse().cos(),
                epsilon = 1e-12
            );
            assert!(gear.base_diameter() <= gear.pitch_diameter());
        }
    }

    #[test]
    fn gear_diameters_with_standard_tool() {
        let gear = Gear::spur(2.0, deg(20.0), 20, 0.0).unwrap();
        let tool = GearToolProfile::standard();
        assert_abs_diff_eq!(gear.tip_diameter(&tool), 44.0, epsilon = 1e-12);
        assert_abs_diff_eq!(gear.root_diameter(&tool), 35.0, epsilon = 1e-12);
        assert!(gear.is_spur());
        assert!(gear.lead().is_none());
    }
}
