//! Design file and configuration loading, and the end-to-end mesh report.

use std::fs;
use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use helical_gears::config::{load_config, Config};
use helical_gears::error::{ConfigError, DesignError};
use helical_gears::gears::{AngleUnit, GearError, GearToolProfile};
use helical_gears::report::{evaluate, load_design};
use tempfile::TempDir;

const HELICAL_DESIGN: &str = r#"{
    "_comment": "20/40 helical pair with 0.1 mm radial backlash",
    "module_normal": 2.0,
    "pressure_angle_normal_deg": 20.0,
    "helix_angle_deg": 15.0,
    "center_distance": 62.608059259534,
    "facewidth": 20.0,
    "input_speed_rpm": 1500.0,
    "gear1": { "number_of_teeth": 20, "profile_shift_coefficient": 0.2 },
    "gear2": { "number_of_teeth": 40, "profile_shift_coefficient": 0.0 }
}"#;

/// Writes `contents` to `name` inside a fresh temporary directory.
fn write_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}

// =============================================================================
// Design files
// =============================================================================

#[test]
fn helical_design_end_to_end() {
    let (_dir, path) = write_file("pair.json", HELICAL_DESIGN);
    let design = load_design(&path).unwrap();
    let config = Config::default();
    let tool = config.tool.to_profile().unwrap();

    let report = evaluate(&design, &tool, AngleUnit::Degrees).unwrap();
    assert_eq!(report.angle_unit, AngleUnit::Degrees);
    assert_abs_diff_eq!(report.gears[0].helix_angle, 15.0, epsilon = 1e-12);
    assert_abs_diff_eq!(report.gears[1].helix_angle, -15.0, epsilon = 1e-12);
    assert_abs_diff_eq!(report.mesh.transmission_ratio, 2.0);

    let backlash = report.mesh.backlash.unwrap();
    assert_abs_diff_eq!(backlash.radial, 0.1, epsilon = 1e-9);
    assert!(backlash.normal > 0.0);

    assert!(report.contact.contact_ratio_total > 2.0);
    let kinematics = report.kinematics.unwrap();
    let start = kinematics.start_of_contact;
    let end = kinematics.end_of_contact;
    assert!(start.sliding_velocity.0 < 0.0);
    assert!(end.sliding_velocity.0 > 0.0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["angle_unit"], "degrees");
    assert!(json["gears"][0]["undercut"]["form_diameter"].is_number());
    assert_eq!(json["advisories"][0]["kind"], "root_below_base_circle");
}

#[test]
fn spur_design_without_center_distance() {
    let (_dir, path) = write_file(
        "spur.json",
        r#"{
            "module_normal": 3.0,
            "pressure_angle_normal_deg": 20.0,
            "facewidth": 30.0,
            "gear1": { "number_of_teeth": 20 },
            "gear2": { "number_of_teeth": 40 }
        }"#,
    );
    let design = load_design(&path).unwrap();
    let report = evaluate(
        &design,
        &GearToolProfile::standard(),
        AngleUnit::Radians,
    )
    .unwrap();

    assert_abs_diff_eq!(report.mesh.center_distance, 90.0, epsilon = 1e-9);
    assert_abs_diff_eq!(report.mesh.reference_center_distance, 90.0, epsilon = 1e-12);
    assert_eq!(report.contact.contact_ratio_axial, 0.0);
    assert_eq!(report.gears[0].lead, None);
    assert!(report.kinematics.is_none());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["gears"][0]["pitch_axial"].is_null());
}

#[test]
fn missing_design_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_design(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DesignError::ReadError { .. }));
}

#[test]
fn malformed_design_is_parse_error() {
    let (_dir, path) = write_file("bad.json", r#"{ "module_normal": "two" }"#);
    let err = load_design(&path).unwrap_err();
    assert!(matches!(err, DesignError::ParseError { .. }));
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn invalid_geometry_is_reported_as_design_error() {
    let (_dir, path) = write_file(
        "tight.json",
        r#"{
            "module_normal": 2.0,
            "pressure_angle_normal_deg": 20.0,
            "center_distance": 50.0,
            "facewidth": 10.0,
            "gear1": { "number_of_teeth": 20 },
            "gear2": { "number_of_teeth": 40 }
        }"#,
    );
    let design = load_design(&path).unwrap();
    let err = evaluate(
        &design,
        &GearToolProfile::standard(),
        AngleUnit::Radians,
    )
    .unwrap_err();
    assert!(matches!(err, DesignError::Geometry(GearError::Domain { .. })));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn configured_tool_changes_root_diameter() {
    let (_cfg_dir, cfg_path) = write_file(
        "config.json",
        r#"{
            "tool": { "dedendum_coefficient": 1.4 },
            "output": { "angle_unit": "radians" }
        }"#,
    );
    let config = load_config(Some(&cfg_path)).unwrap();
    assert_eq!(config.output.angle_unit, AngleUnit::Radians);
    let tool = config.tool.to_profile().unwrap();

    let (_dir, path) = write_file("pair.json", HELICAL_DESIGN);
    let design = load_design(&path).unwrap();
    let report = evaluate(&design, &tool, config.output.angle_unit).unwrap();
    let gear2 = &report.gears[1];
    assert_abs_diff_eq!(gear2.root_diameter, gear2.pitch_diameter - 5.6, epsilon = 1e-9);
}

#[test]
fn config_with_unknown_section_is_rejected() {
    let (_dir, path) = write_file("config.json", r#"{ "plotting": {} }"#);
    let err = load_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}
