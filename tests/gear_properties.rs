//! Property tests for the involute gear equations.
//!
//! These tests exercise the public API end to end, from single gears through
//! gear pairs to mesh kinematics.

use approx::assert_abs_diff_eq;
use helical_gears::gears::involute::{involute, inverse_involute};
use helical_gears::gears::kinematics::sliding_velocity;
use helical_gears::gears::mesh::center_distance_reference;
use helical_gears::gears::undercut::form_diameter;
use helical_gears::gears::{
    Advisory, Feasibility, Gear, GearPair, GearToolProfile, Infeasibility, KinematicState,
    UndercutCheck,
};

fn deg(value: f64) -> f64 {
    value.to_radians()
}

/// Zero-backlash pair with gear 2 of opposite hand.
fn pair(module: f64, helix_deg: f64, z1: i32, z2: i32, x1: f64, x2: f64) -> GearPair {
    let g1 = Gear::new(module, deg(20.0), deg(helix_deg), z1, x1).unwrap();
    let g2 = Gear::new(module, deg(20.0), -deg(helix_deg), z2, x2).unwrap();
    match GearPair::zero_backlash(g1, g2).unwrap() {
        Feasibility::Feasible(pair) => pair,
        Feasibility::Infeasible(reason) => panic!("pair should be feasible: {reason}"),
    }
}

// =============================================================================
// Involute
// =============================================================================

#[test]
fn involute_round_trip() {
    for step in 1..=99 {
        let angle = f64::from(step) / 100.0;
        let back = inverse_involute(involute(angle)).unwrap();
        assert_abs_diff_eq!(back, angle, epsilon = 1e-5);
    }
}

#[test]
fn inverse_involute_rejects_negative_input() {
    assert!(inverse_involute(-1e-3).is_err());
    assert!(inverse_involute(f64::NAN).is_err());
}

// =============================================================================
// Single gear
// =============================================================================

#[test]
fn base_diameter_invariant() {
    for (module, alpha, beta, z, x) in [
        (1.0, 20.0, 0.0, 17, 0.0),
        (2.5, 20.0, 15.0, 33, 0.3),
        (4.0, 25.0, -30.0, 61, -0.2),
        (0.5, 14.5, 45.0, 120, 0.0),
    ] {
        let gear = Gear::new(module, deg(alpha), deg(beta), z, x).unwrap();
        assert_abs_diff_eq!(
            gear.base_diameter(),
            gear.pitch_diameter() * gear.pressure_angle_transverse().cos(),
            epsilon = 1e-12
        );
        assert!(gear.base_diameter() < gear.pitch_diameter());
    }
}

#[test]
fn spur_gear_has_no_helix_quantities() {
    let gear = Gear::spur(3.0, deg(20.0), 20, 0.0).unwrap();
    assert!(gear.is_spur());
    assert_eq!(gear.pitch_axial(), None);
    assert_eq!(gear.lead(), None);
    assert_abs_diff_eq!(gear.helix_angle_base(), 0.0);
}

#[test]
fn gear_rejects_invalid_parameters() {
    assert!(Gear::new(0.0, deg(20.0), 0.0, 20, 0.0).is_err());
    assert!(Gear::new(2.0, deg(90.0), 0.0, 20, 0.0).is_err());
    assert!(Gear::new(2.0, deg(20.0), deg(90.0), 20, 0.0).is_err());
    assert!(Gear::new(2.0, deg(20.0), 0.0, 0, 0.0).is_err());
    assert!(Gear::new(2.0, deg(20.0), 0.0, 20, f64::INFINITY).is_err());
}

// =============================================================================
// Undercut
// =============================================================================

#[test]
fn eight_teeth_spur_gear_is_undercut() {
    let form = form_diameter(2.0, deg(20.0), 0.0, 8, 1.0, 0.0, 0.38);
    assert!(matches!(
        form,
        Feasibility::Infeasible(Infeasibility::Undercut { .. })
    ));

    let gear = Gear::spur(2.0, deg(20.0), 8, 0.0).unwrap();
    let check = UndercutCheck::evaluate(&gear, &GearToolProfile::standard());
    assert!(check.undercut);
    assert!(check.estimates_agree);
    assert!(check.minimum_profile_shift_coefficient > 0.0);
}

#[test]
fn profile_shift_removes_undercut() {
    let tool = GearToolProfile::standard();
    let shifted = Gear::spur(2.0, deg(20.0), 8, 0.6).unwrap();
    let check = UndercutCheck::evaluate(&shifted, &tool);
    assert!(!check.undercut);
    assert!(check.form_diameter.unwrap() >= shifted.base_diameter());
}

// =============================================================================
// Mesh
// =============================================================================

#[test]
fn reference_center_distance_of_spur_pair() {
    assert_abs_diff_eq!(center_distance_reference(3.0, 20, 40, 0.0), 90.0);
    let spur = pair(3.0, 0.0, 20, 40, 0.0, 0.0);
    assert_abs_diff_eq!(spur.center_distance(), 90.0, epsilon = 1e-9);
}

#[test]
fn contact_ratios_are_positive() {
    let tool = GearToolProfile::standard();
    for (module, helix, z1, z2, x1, x2) in [
        (1.0, 0.0, 18, 35, 0.0, 0.0),
        (2.0, 15.0, 20, 40, 0.2, 0.0),
        (3.0, 25.0, 25, 73, 0.4, -0.3),
        (1.5, 10.0, 30, 30, 0.0, 0.0),
    ] {
        let contact = pair(module, helix, z1, z2, x1, x2)
            .contact_geometry_at_tips(&tool, 15.0)
            .unwrap();
        assert!(contact.contact_ratio_transverse > 0.0);
        assert!(contact.contact_ratio_axial >= 0.0);
        assert!(contact.contact_ratio_total >= contact.contact_ratio_transverse);
        assert!(contact.contact_lines_length_min <= contact.contact_lines_length_mean);
    }
}

#[test]
fn spur_pair_has_no_axial_overlap() {
    let contact = pair(3.0, 0.0, 20, 40, 0.0, 0.0)
        .contact_geometry_at_tips(&GearToolProfile::standard(), 30.0)
        .unwrap();
    assert_eq!(contact.contact_ratio_axial, 0.0);
    assert_eq!(contact.contact_ratio_total, contact.contact_ratio_transverse);
}

#[test]
fn backlash_grows_with_center_distance() {
    let base = pair(2.0, 15.0, 20, 40, 0.2, 0.0);
    let zero = base.backlash().value().unwrap();
    assert_abs_diff_eq!(zero.normal, 0.0, epsilon = 1e-12);

    let opened = GearPair::new(*base.gear1(), *base.gear2(), base.center_distance() + 0.05)
        .unwrap()
        .backlash()
        .value()
        .unwrap();
    assert!(opened.circumferential > 0.0);
    assert!(opened.profile < opened.circumferential);
    assert!(opened.normal < opened.profile);
}

#[test]
fn center_distance_below_base_circles_is_rejected() {
    let g1 = Gear::spur(2.0, deg(20.0), 20, 0.0).unwrap();
    let g2 = Gear::spur(2.0, deg(20.0), 40, 0.0).unwrap();
    assert!(GearPair::new(g1, g2, 50.0).is_err());
}

#[test]
fn oversized_rack_root_radius_is_advisory() {
    let tool = GearToolProfile::new(1.0, 1.25, 0.6, None).unwrap();
    let land = tool.root_land_half_width(2.0, deg(20.0)).unwrap();
    assert!(matches!(
        land.advisories.as_slice(),
        [Advisory::RackRootInfeasible { .. }]
    ));
}

// =============================================================================
// Kinematics
// =============================================================================

#[test]
fn sliding_velocity_antisymmetry() {
    let mesh = pair(2.0, 15.0, 20, 40, 0.2, 0.0);
    let contact = mesh
        .contact_geometry_at_tips(&GearToolProfile::standard(), 20.0)
        .unwrap();
    let state = KinematicState::from_driver(mesh, 150.0);

    for angle in [
        contact.pressure_angle_sap1,
        mesh.working_pressure_angle(),
        contact.pressure_angle_eap1,
    ] {
        let point = state.at_contact(angle);
        assert_eq!(point.sliding_velocity.0, -point.sliding_velocity.1);
    }

    let (s1, s2) = sliding_velocity(40.0, 80.0, deg(30.0), deg(12.0), 10.0, -5.0);
    assert_eq!(s1, -s2);
}

#[test]
fn both_gears_share_pitch_line_velocity() {
    let mesh = pair(2.0, 15.0, 20, 40, 0.2, 0.0);
    let state = KinematicState::from_driver(mesh, 150.0);
    let (w1, w2) = state.angular_velocities();
    let (dw1, dw2) = mesh.working_pitch_diameters();
    assert_abs_diff_eq!(dw1 + dw2, 2.0 * mesh.center_distance(), epsilon = 1e-9);
    assert_abs_diff_eq!(w1 * dw1, -w2 * dw2, epsilon = 1e-9);
    assert_abs_diff_eq!(state.pitch_line_velocity(), w1 * dw1 / 2.0, epsilon = 1e-9);
}
