//! Form diameter and undercut detection.
//!
//! [`form_diameter`] evaluates the boundary between the root fillet and the
//! involute flank generated by a rack-type cutter with a tip radius. It is
//! the authoritative undercut test. [`minimum_teeth_to_avoid_undercut`] and
//! [`minimum_profile_shift_to_avoid_undercut`] are closed-form estimates
//! under the rack generation (hobbing) assumption; for non-standard cutters
//! they may disagree with the form diameter, which [`UndercutCheck`] reports.
//!
//! A boundary pressure angle of exactly zero counts as valid everywhere.

use serde::Serialize;

use crate::gears::outcome::{Feasibility, Infeasibility};
use crate::gears::rack::GearToolProfile;
use crate::gears::tooth::{
    base_diameter, diameter_at_pressure_angle, module_transverse, pitch_diameter,
    pressure_angle_transverse, Gear,
};

/// Diameter of the boundary point between root fillet and involute flank.
///
/// Returns [`Infeasibility::Undercut`] when the boundary falls below the base
/// circle.
#[must_use]
pub fn form_diameter(
    module_normal: f64,
    pressure_angle_normal: f64,
    helix_angle: f64,
    number_of_teeth: i32,
    cutter_addendum_coefficient: f64,
    profile_shift_coefficient: f64,
    tip_radius_coefficient: f64,
) -> Feasibility<f64> {
    let alpha_t = pressure_angle_transverse(pressure_angle_normal, helix_angle);
    let d = pitch_diameter(module_transverse(module_normal, helix_angle), number_of_teeth);
    let d_b = base_diameter(d, alpha_t);

    // height of the straight cutter flank above the datum line, less profile shift
    let h_f = cutter_addendum_coefficient * module_normal;
    let rho = tip_radius_coefficient * module_normal;
    let flank_end = rho.mul_add(pressure_angle_normal.sin(), h_f - rho)
        - profile_shift_coefficient * module_normal;

    let boundary = (alpha_t.tan() - flank_end / (d_b / 2.0 * alpha_t.sin())).atan();
    classify_boundary(boundary, d_b)
}

fn classify_boundary(boundary_pressure_angle: f64, base_diameter: f64) -> Feasibility<f64> {
    if boundary_pressure_angle >= 0.0 {
        Feasibility::Feasible(diameter_at_pressure_angle(
            base_diameter,
            boundary_pressure_angle,
        ))
    } else {
        Feasibility::Infeasible(Infeasibility::Undercut {
            boundary_pressure_angle,
        })
    }
}

/// Smallest profile shift coefficient that avoids undercut under rack
/// generation.
#[must_use]
pub fn minimum_profile_shift_to_avoid_undercut(
    rack_addendum_coefficient: f64,
    pressure_angle_normal: f64,
    number_of_teeth: i32,
    helix_angle: f64,
) -> f64 {
    let alpha_t = pressure_angle_transverse(pressure_angle_normal, helix_angle);
    let numerator = f64::from(number_of_teeth) * alpha_t.sin().powi(2);
    rack_addendum_coefficient - numerator / (2.0 * helix_angle.cos())
}

/// Smallest tooth count that avoids undercut under rack generation.
///
/// Returned as a real number; any tooth count at or above it is free of
/// undercut by this estimate.
#[must_use]
pub fn minimum_teeth_to_avoid_undercut(
    rack_addendum_coefficient: f64,
    pressure_angle_normal: f64,
    profile_shift_coefficient: f64,
    helix_angle: f64,
) -> f64 {
    let alpha_t = pressure_angle_transverse(pressure_angle_normal, helix_angle);
    2.0 * helix_angle.cos() * (rack_addendum_coefficient - profile_shift_coefficient)
        / alpha_t.sin().powi(2)
}

/// Undercut assessment of one gear cut by one tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UndercutCheck {
    /// Form diameter (mm), `None` when undercut.
    pub form_diameter: Option<f64>,

    /// Authoritative verdict from the form diameter.
    pub undercut: bool,

    /// Minimum tooth count estimate for the gear's profile shift.
    pub minimum_teeth: f64,

    /// Minimum profile shift coefficient estimate for the gear's tooth count.
    pub minimum_profile_shift_coefficient: f64,

    /// Whether the minimum tooth count estimate reaches the same verdict.
    pub estimates_agree: bool,
}

impl UndercutCheck {
    /// Evaluates undercut for `gear` generated by `tool`.
    #[must_use]
    pub fn evaluate(gear: &Gear, tool: &GearToolProfile) -> Self {
        let form = gear_form_diameter(gear, tool);
        let minimum_teeth = minimum_teeth_to_avoid_undercut(
            tool.addendum_coefficient,
            gear.pressure_angle_normal(),
            gear.profile_shift_coefficient(),
            gear.helix_angle(),
        );
        let minimum_profile_shift_coefficient = minimum_profile_shift_to_avoid_undercut(
            tool.addendum_coefficient,
            gear.pressure_angle_normal(),
            gear.number_of_teeth(),
            gear.helix_angle(),
        );

        let undercut = !form.is_feasible();
        let estimated_undercut = f64::from(gear.number_of_teeth()) < minimum_teeth;

        Self {
            form_diameter: form.value(),
            undercut,
            minimum_teeth,
            minimum_profile_shift_coefficient,
            estimates_agree: undercut == estimated_undercut,
        }
    }
}

/// Form diameter of `gear` cut by `tool`; the cutter addendum is the rack
/// dedendum.
#[must_use]
pub fn gear_form_diameter(gear: &Gear, tool: &GearToolProfile) -> Feasibility<f64> {
    form_diameter(
        gear.module_normal(),
        gear.pressure_angle_normal(),
        gear.helix_angle(),
        gear.number_of_teeth(),
        tool.dedendum_coefficient,
        gear.profile_shift_coefficient(),
        tool.tip_radius_coefficient,
    )
}
