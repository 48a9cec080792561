//! Gear pair geometry: center distance, working pressure angle, clearance,
//! backlash, and contact ratios.
//!
//! # Backlash chain
//!
//! Backlash is derived in a fixed order, each quantity defined relative to
//! the plane of the previous one:
//!
//! ```text
//! radial -> circumferential -> { angular, profile } -> normal
//! ```
//!
//! [`Backlash`] applies the chain in that order.

use std::f64::consts::PI;

use crate::gears::error::{GearError, GearResult};
use crate::gears::involute::{cheng_approximation, involute};
use crate::gears::outcome::{Advisory, Feasibility, Infeasibility};
use crate::gears::rack::GearToolProfile;
use crate::gears::tooth::Gear;

// ---------------------------------------------------------------------------
// Pressure angle
// ---------------------------------------------------------------------------

/// Working transverse pressure angle at the actual center distance.
///
/// # Errors
///
/// Returns a domain error when `center_distance` is not positive or is too
/// small for the base circles, i.e. `(db1 + db2) / (2 a)` lies outside
/// `[-1, 1]`.
pub fn working_pressure_angle(
    center_distance: f64,
    base_diameter1: f64,
    base_diameter2: f64,
) -> GearResult<f64> {
    if !(center_distance.is_finite() && center_distance > 0.0) {
        return Err(GearError::domain(
            "working_pressure_angle",
            format!("center distance {center_distance} must be positive"),
        ));
    }
    let cosine = (base_diameter1 + base_diameter2) / (2.0 * center_distance);
    if !(-1.0..=1.0).contains(&cosine) {
        return Err(GearError::domain(
            "working_pressure_angle",
            format!(
                "center distance {center_distance} is smaller than the base radii sum {}",
                (base_diameter1 + base_diameter2) / 2.0
            ),
        ));
    }
    Ok(cosine.acos())
}

/// Working transverse pressure angle for zero backlash, from the profile
/// shifts and tooth counts.
///
/// Returns [`Infeasibility::NegativeInvolute`] when the involute argument is
/// negative, typically from a large negative profile shift sum.
pub fn working_pressure_angle_theoretical(
    profile_shift_coefficient1: f64,
    profile_shift_coefficient2: f64,
    number_of_teeth1: i32,
    number_of_teeth2: i32,
    pressure_angle_normal: f64,
    pressure_angle_transverse: f64,
) -> Feasibility<f64> {
    let shift_sum = profile_shift_coefficient1 + profile_shift_coefficient2;
    let teeth_sum = f64::from(number_of_teeth1) + f64::from(number_of_teeth2);
    let inv_w = involute(pressure_angle_transverse)
        + 2.0 * pressure_angle_normal.tan() * shift_sum / teeth_sum;

    if inv_w >= 0.0 {
        Feasibility::Feasible(cheng_approximation(inv_w))
    } else {
        Feasibility::Infeasible(Infeasibility::NegativeInvolute { involute: inv_w })
    }
}

// ---------------------------------------------------------------------------
// Center distance
// ---------------------------------------------------------------------------

/// Center distance without profile shift or backlash (null center distance).
#[must_use]
pub fn center_distance_reference(
    module_normal: f64,
    number_of_teeth1: i32,
    number_of_teeth2: i32,
    helix_angle: f64,
) -> f64 {
    module_normal * (f64::from(number_of_teeth1) + f64::from(number_of_teeth2))
        / (2.0 * helix_angle.cos())
}

/// Center distance with profile shift and zero backlash.
///
/// `working_pressure_angle_theoretical` must be the zero-backlash angle from
/// [`working_pressure_angle_theoretical`]; passing the actual working angle
/// gives the actual center distance back, not the theoretical one.
#[must_use]
pub fn center_distance_theoretical(
    reference_center_distance: f64,
    working_pressure_angle_theoretical: f64,
    pressure_angle_transverse: f64,
) -> f64 {
    reference_center_distance * pressure_angle_transverse.cos()
        / working_pressure_angle_theoretical.cos()
}

/// Transmission ratio `w1 / w2 = z2 / z1`.
#[must_use]
pub fn transmission_ratio(number_of_teeth1: i32, number_of_teeth2: i32) -> f64 {
    f64::from(number_of_teeth2) / f64::from(number_of_teeth1)
}

/// Working pitch diameters at `center_distance`.
///
/// Derived from the center distance and tooth ratio alone; the pitch point
/// is where the two circles touch.
#[must_use]
pub fn working_pitch_diameters(
    center_distance: f64,
    number_of_teeth1: i32,
    number_of_teeth2: i32,
) -> (f64, f64) {
    let ratio = transmission_ratio(number_of_teeth1, number_of_teeth2);
    let d1 = 2.0 * center_distance / (ratio + 1.0);
    (d1, d1 * ratio)
}

// ---------------------------------------------------------------------------
// Clearance
// ---------------------------------------------------------------------------

/// Radial clearance between a root circle and the mating tip circle.
#[must_use]
pub fn root_clearance(center_distance: f64, root_diameter: f64, mating_tip_diameter: f64) -> f64 {
    center_distance - mating_tip_diameter / 2.0 - root_diameter / 2.0
}

/// Radial clearance between a tip circle and the mating root circle.
#[must_use]
pub fn tip_clearance(center_distance: f64, tip_diameter: f64, mating_root_diameter: f64) -> f64 {
    center_distance - tip_diameter / 2.0 - mating_root_diameter / 2.0
}

// ---------------------------------------------------------------------------
// Backlash
// ---------------------------------------------------------------------------

/// Backlash along the center line.
#[must_use]
pub fn backlash_radial(center_distance_actual: f64, center_distance_theoretical: f64) -> f64 {
    center_distance_actual - center_distance_theoretical
}

/// Circumferential backlash on the working pitch circle, transverse plane.
#[must_use]
pub fn backlash_circumferential(backlash_radial: f64, working_pressure_angle: f64) -> f64 {
    2.0 * backlash_radial * working_pressure_angle.tan()
}

/// Angular backlash of one gear (rad).
#[must_use]
pub fn backlash_angular(backlash_circumferential: f64, working_pitch_diameter: f64) -> f64 {
    2.0 * backlash_circumferential / working_pitch_diameter
}

/// Backlash along the line of action, transverse plane.
#[must_use]
pub fn backlash_profile(backlash_circumferential: f64, working_pressure_angle: f64) -> f64 {
    backlash_circumferential * working_pressure_angle.cos()
}

/// Backlash normal to the tooth surfaces, the shortest distance between them.
#[must_use]
pub fn backlash_normal(backlash_profile: f64, helix_angle_base: f64) -> f64 {
    backlash_profile * helix_angle_base.cos()
}

/// Backlash of a gear pair in every plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backlash {
    /// Along the center line (mm).
    pub radial: f64,
    /// On the working pitch circle (mm).
    pub circumferential: f64,
    /// Rotational play of gear 1 and gear 2 (rad).
    pub angular: (f64, f64),
    /// Along the line of action (mm).
    pub profile: f64,
    /// Normal to the tooth surfaces (mm).
    pub normal: f64,
}

impl Backlash {
    /// Applies the backlash chain from the actual and zero-backlash center
    /// distances.
    #[must_use]
    pub fn from_center_distances(
        center_distance_actual: f64,
        center_distance_theoretical: f64,
        working_pressure_angle: f64,
        helix_angle_base: f64,
        working_pitch_diameters: (f64, f64),
    ) -> Self {
        let radial = backlash_radial(center_distance_actual, center_distance_theoretical);
        let circumferential = backlash_circumferential(radial, working_pressure_angle);
        let angular = (
            backlash_angular(circumferential, working_pitch_diameters.0),
            backlash_angular(circumferential, working_pitch_diameters.1),
        );
        let profile = backlash_profile(circumferential, working_pressure_angle);
        let normal = backlash_normal(profile, helix_angle_base);

        Self {
            radial,
            circumferential,
            angular,
            profile,
            normal,
        }
    }
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// Transverse pressure angle of a gear at a contact point, given the mating
/// gear's pressure angle at the same point.
///
/// With the mate's end of active profile (EAP) this gives this gear's start
/// of active profile (SAP).
#[must_use]
pub fn pressure_angle_transverse_contact(
    working_pressure_angle: f64,
    number_of_teeth: i32,
    mating_number_of_teeth: i32,
    mating_pressure_angle_contact: f64,
) -> f64 {
    let tan_w = working_pressure_angle.tan();
    let ratio = f64::from(mating_number_of_teeth) / f64::from(number_of_teeth);
    ratio
        .mul_add(-(mating_pressure_angle_contact.tan() - tan_w), tan_w)
        .atan()
}

/// Length of the path of contact in the transverse plane.
#[must_use]
pub fn contact_plane_length(
    working_pressure_angle: f64,
    base_diameter1: f64,
    base_diameter2: f64,
    pressure_angle_eap1: f64,
    pressure_angle_eap2: f64,
) -> f64 {
    let tan_w = working_pressure_angle.tan();
    base_diameter2 / 2.0 * (pressure_angle_eap2.tan() - tan_w)
        + base_diameter1 / 2.0 * (pressure_angle_eap1.tan() - tan_w)
}

/// Transverse contact ratio (profile overlap).
#[must_use]
pub fn contact_ratio_transverse(
    working_pressure_angle: f64,
    number_of_teeth1: i32,
    number_of_teeth2: i32,
    pressure_angle_eap1: f64,
    pressure_angle_eap2: f64,
) -> f64 {
    let tan_w = working_pressure_angle.tan();
    let approach = f64::from(number_of_teeth1) * (pressure_angle_eap1.tan() - tan_w);
    let recess = f64::from(number_of_teeth2) * (pressure_angle_eap2.tan() - tan_w);
    (approach + recess) / (2.0 * PI)
}

/// Axial contact ratio (overlap ratio); zero for a spur gear.
#[must_use]
pub fn contact_ratio_axial(facewidth_effective: f64, helix_angle: f64, module_normal: f64) -> f64 {
    facewidth_effective * helix_angle.abs().sin() / (PI * module_normal)
}

/// Total contact ratio.
#[must_use]
pub fn contact_ratio_total(contact_ratio_transverse: f64, contact_ratio_axial: f64) -> f64 {
    contact_ratio_transverse + contact_ratio_axial
}

/// Mean total length of the contact lines over a mesh cycle.
#[must_use]
pub fn contact_lines_length_mean(
    facewidth_effective: f64,
    contact_ratio_transverse: f64,
    helix_angle_base: f64,
) -> f64 {
    facewidth_effective * contact_ratio_transverse / helix_angle_base.cos()
}

/// Minimum total length of the contact lines over a mesh cycle.
///
/// The minimum depends on where the fractional parts of the transverse and
/// axial contact ratios place the fewest engaged lines:
///
/// - axial ratio exactly zero (spur): `mean (1 - fa / ea)`
/// - `fa + fb <= 1`: `mean (1 - fa fb / (ea eb))`
/// - otherwise: `mean (1 - (1 - fa)(1 - fb) / (ea eb))`
#[must_use]
pub fn contact_lines_length_min(
    contact_lines_length_mean: f64,
    contact_ratio_transverse: f64,
    contact_ratio_axial: f64,
) -> f64 {
    let cr_t = contact_ratio_transverse;
    let cr_a = contact_ratio_axial;
    let n_t = cr_t.rem_euclid(1.0);
    let n_a = cr_a.rem_euclid(1.0);

    if cr_a == 0.0 {
        contact_lines_length_mean * (1.0 - n_t / cr_t)
    } else if n_t + n_a <= 1.0 {
        contact_lines_length_mean * (1.0 - n_t * n_a / (cr_t * cr_a))
    } else {
        contact_lines_length_mean * (1.0 - (1.0 - n_t) * (1.0 - n_a) / (cr_t * cr_a))
    }
}

// ---------------------------------------------------------------------------
// Gear pair
// ---------------------------------------------------------------------------

/// Relative tolerance when checking that two gears share a basic rack.
const MATCH_TOLERANCE: f64 = 1e-9;

/// Two external gears meshing at a center distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearPair {
    gear1: Gear,
    gear2: Gear,
    center_distance: f64,
    working_pressure_angle: f64,
}

impl GearPair {
    /// Creates a gear pair at `center_distance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the gears do not share the normal module, normal
    /// pressure angle and helix angle magnitude, if a helical pair has the
    /// same hand on both gears, or if the center distance is too small for
    /// the base circles.
    pub fn new(gear1: Gear, gear2: Gear, center_distance: f64) -> GearResult<Self> {
        check_mesh_compatibility(&gear1, &gear2)?;
        let working_pressure_angle = working_pressure_angle(
            center_distance,
            gear1.base_diameter(),
            gear2.base_diameter(),
        )?;

        tracing::trace!(
            center_distance,
            working_pressure_angle,
            "Resolved gear pair working pressure angle"
        );

        Ok(Self {
            gear1,
            gear2,
            center_distance,
            working_pressure_angle,
        })
    }

    /// Creates a gear pair at the zero-backlash center distance.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`GearPair::new`].
    pub fn zero_backlash(gear1: Gear, gear2: Gear) -> GearResult<Feasibility<Self>> {
        check_mesh_compatibility(&gear1, &gear2)?;
        match theoretical_center_distance(&gear1, &gear2) {
            Feasibility::Feasible(a) => Ok(Feasibility::Feasible(Self::new(gear1, gear2, a)?)),
            Feasibility::Infeasible(reason) => Ok(Feasibility::Infeasible(reason)),
        }
    }

    /// First gear (usually the driver).
    #[must_use]
    pub const fn gear1(&self) -> &Gear {
        &self.gear1
    }

    /// Second gear.
    #[must_use]
    pub const fn gear2(&self) -> &Gear {
        &self.gear2
    }

    /// Actual center distance (mm).
    #[must_use]
    pub const fn center_distance(&self) -> f64 {
        self.center_distance
    }

    /// Working transverse pressure angle at the actual center distance (rad).
    #[must_use]
    pub const fn working_pressure_angle(&self) -> f64 {
        self.working_pressure_angle
    }

    /// Transverse pressure angle at the reference diameters (rad).
    #[must_use]
    pub fn pressure_angle_transverse(&self) -> f64 {
        self.gear1.pressure_angle_transverse()
    }

    /// Base helix angle magnitude of the pair (rad).
    #[must_use]
    pub fn helix_angle_base(&self) -> f64 {
        self.gear1.helix_angle_base().abs()
    }

    /// Transmission ratio `z2 / z1`.
    #[must_use]
    pub fn transmission_ratio(&self) -> f64 {
        transmission_ratio(self.gear1.number_of_teeth(), self.gear2.number_of_teeth())
    }

    /// Working pitch diameters at the actual center distance (mm).
    #[must_use]
    pub fn working_pitch_diameters(&self) -> (f64, f64) {
        working_pitch_diameters(
            self.center_distance,
            self.gear1.number_of_teeth(),
            self.gear2.number_of_teeth(),
        )
    }

    /// Center distance without profile shift or backlash (mm).
    #[must_use]
    pub fn reference_center_distance(&self) -> f64 {
        reference_center_distance(&self.gear1, &self.gear2)
    }

    /// Zero-backlash working transverse pressure angle (rad).
    pub fn working_pressure_angle_theoretical(&self) -> Feasibility<f64> {
        theoretical_working_angle(&self.gear1, &self.gear2)
    }

    /// Zero-backlash center distance (mm).
    pub fn theoretical_center_distance(&self) -> Feasibility<f64> {
        theoretical_center_distance(&self.gear1, &self.gear2)
    }

    /// Backlash at the actual center distance.
    pub fn backlash(&self) -> Feasibility<Backlash> {
        self.theoretical_center_distance().map(|theoretical| {
            Backlash::from_center_distances(
                self.center_distance,
                theoretical,
                self.working_pressure_angle,
                self.helix_angle_base(),
                self.working_pitch_diameters(),
            )
        })
    }

    /// Tip clearances `(gear 1 tip to gear 2 root, gear 2 tip to gear 1 root)` (mm).
    #[must_use]
    pub fn tip_clearances(&self, tool: &GearToolProfile) -> (f64, f64) {
        (
            tip_clearance(
                self.center_distance,
                self.gear1.tip_diameter(tool),
                self.gear2.root_diameter(tool),
            ),
            tip_clearance(
                self.center_distance,
                self.gear2.tip_diameter(tool),
                self.gear1.root_diameter(tool),
            ),
        )
    }

    /// Contact geometry for the given end-of-active-profile angles.
    #[must_use]
    pub fn contact_geometry(
        &self,
        pressure_angle_eap1: f64,
        pressure_angle_eap2: f64,
        facewidth_effective: f64,
    ) -> ContactGeometry {
        ContactGeometry::new(self, pressure_angle_eap1, pressure_angle_eap2, facewidth_effective)
    }

    /// Contact geometry with the active profiles ending at the tip circles.
    ///
    /// # Errors
    ///
    /// Returns a domain error if a tip circle lies inside its base circle.
    pub fn contact_geometry_at_tips(
        &self,
        tool: &GearToolProfile,
        facewidth_effective: f64,
    ) -> GearResult<ContactGeometry> {
        let eap1 = self.gear1.pressure_angle_at(self.gear1.tip_diameter(tool))?;
        let eap2 = self.gear2.pressure_angle_at(self.gear2.tip_diameter(tool))?;
        Ok(self.contact_geometry(eap1, eap2, facewidth_effective))
    }
}

fn check_mesh_compatibility(gear1: &Gear, gear2: &Gear) -> GearResult<()> {
    let close = |a: f64, b: f64| (a - b).abs() <= MATCH_TOLERANCE * a.abs().max(b.abs()).max(1.0);

    if !close(gear1.module_normal(), gear2.module_normal()) {
        return Err(GearError::invalid_parameter(
            "module_normal",
            format!(
                "gears must share the normal module ({} vs {})",
                gear1.module_normal(),
                gear2.module_normal()
            ),
        ));
    }
    if !close(gear1.pressure_angle_normal(), gear2.pressure_angle_normal()) {
        return Err(GearError::invalid_parameter(
            "pressure_angle_normal",
            "gears must share the normal pressure angle",
        ));
    }
    if !close(gear1.helix_angle(), -gear2.helix_angle()) {
        return Err(GearError::invalid_parameter(
            "helix_angle",
            "external gears must have equal helix angles of opposite hand",
        ));
    }
    Ok(())
}

fn reference_center_distance(gear1: &Gear, gear2: &Gear) -> f64 {
    center_distance_reference(
        gear1.module_normal(),
        gear1.number_of_teeth(),
        gear2.number_of_teeth(),
        gear1.helix_angle(),
    )
}

fn theoretical_working_angle(gear1: &Gear, gear2: &Gear) -> Feasibility<f64> {
    working_pressure_angle_theoretical(
        gear1.profile_shift_coefficient(),
        gear2.profile_shift_coefficient(),
        gear1.number_of_teeth(),
        gear2.number_of_teeth(),
        gear1.pressure_angle_normal(),
        gear1.pressure_angle_transverse(),
    )
}

fn theoretical_center_distance(gear1: &Gear, gear2: &Gear) -> Feasibility<f64> {
    let reference = reference_center_distance(gear1, gear2);
    theoretical_working_angle(gear1, gear2).map(|angle| {
        center_distance_theoretical(reference, angle, gear1.pressure_angle_transverse())
    })
}

/// Contact geometry of a gear pair.
///
/// The end-of-active-profile (EAP) angles are inputs; they come from the tip
/// circles or from a tip/root intersection procedure outside this crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGeometry {
    /// Transverse pressure angle at the EAP of gear 1 (rad).
    pub pressure_angle_eap1: f64,
    /// Transverse pressure angle at the EAP of gear 2 (rad).
    pub pressure_angle_eap2: f64,
    /// Transverse pressure angle at the SAP of gear 1 (rad).
    pub pressure_angle_sap1: f64,
    /// Transverse pressure angle at the SAP of gear 2 (rad).
    pub pressure_angle_sap2: f64,
    /// Length of the path of contact (mm).
    pub contact_plane_length: f64,
    /// Transverse contact ratio.
    pub contact_ratio_transverse: f64,
    /// Axial contact ratio.
    pub contact_ratio_axial: f64,
    /// Total contact ratio.
    pub contact_ratio_total: f64,
    /// Mean total contact line length (mm).
    pub contact_lines_length_mean: f64,
    /// Minimum total contact line length (mm).
    pub contact_lines_length_min: f64,
}

impl ContactGeometry {
    /// Computes the contact geometry of `pair`.
    #[must_use]
    pub fn new(
        pair: &GearPair,
        pressure_angle_eap1: f64,
        pressure_angle_eap2: f64,
        facewidth_effective: f64,
    ) -> Self {
        let alpha_w = pair.working_pressure_angle();
        let z1 = pair.gear1().number_of_teeth();
        let z2 = pair.gear2().number_of_teeth();

        let pressure_angle_sap1 =
            pressure_angle_transverse_contact(alpha_w, z1, z2, pressure_angle_eap2);
        let pressure_angle_sap2 =
            pressure_angle_transverse_contact(alpha_w, z2, z1, pressure_angle_eap1);

        let contact_plane_length = contact_plane_length(
            alpha_w,
            pair.gear1().base_diameter(),
            pair.gear2().base_diameter(),
            pressure_angle_eap1,
            pressure_angle_eap2,
        );
        let cr_t =
            contact_ratio_transverse(alpha_w, z1, z2, pressure_angle_eap1, pressure_angle_eap2);
        let cr_a = contact_ratio_axial(
            facewidth_effective,
            pair.gear1().helix_angle(),
            pair.gear1().module_normal(),
        );
        let mean = contact_lines_length_mean(facewidth_effective, cr_t, pair.helix_angle_base());

        Self {
            pressure_angle_eap1,
            pressure_angle_eap2,
            pressure_angle_sap1,
            pressure_angle_sap2,
            contact_plane_length,
            contact_ratio_transverse: cr_t,
            contact_ratio_axial: cr_a,
            contact_ratio_total: contact_ratio_total(cr_t, cr_a),
            contact_lines_length_mean: mean,
            contact_lines_length_min: contact_lines_length_min(mean, cr_t, cr_a),
        }
    }

    /// Gears whose start of active profile falls inside the base circle.
    ///
    /// A negative SAP angle means the mate's tip engages below the involute,
    /// so the tooth pair interferes and the SAP has no involute diameter.
    #[must_use]
    pub fn interference(&self) -> Vec<Advisory> {
        [(1, self.pressure_angle_sap1), (2, self.pressure_angle_sap2)]
            .into_iter()
            .filter(|&(_, angle)| angle < 0.0)
            .map(|(gear, pressure_angle_sap)| Advisory::Interference {
                gear,
                pressure_angle_sap,
            })
            .collect()
    }
}
