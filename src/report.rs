//! Gear pair design files and the mesh report pipeline.
//!
//! A [`MeshDesign`] is the JSON input of the `gear-mesh` tool: shared tooth
//! parameters, per-gear tooth counts and profile shifts, and the operating
//! center distance. [`evaluate`] runs the full derivation chain on it and
//! collects every advisory raised along the way into a [`MeshReport`].
//!
//! Angles in the design file carry a `_deg` suffix and are converted to
//! radians here; report angles are expressed in the requested [`AngleUnit`].

use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ToolConfig;
use crate::error::DesignError;
use crate::gears::involute::MAX_ACCURATE_INVERSE_INVOLUTE_ANGLE;
use crate::gears::mesh::pressure_angle_transverse_contact;
use crate::gears::tooth::diameter_at_pressure_angle;
use crate::gears::{
    Advisory, AngleUnit, ContactGeometry, ContactKinematics, Feasibility, Gear, GearError,
    GearPair, GearResult, GearToolProfile, Infeasibility, KinematicState, UndercutCheck,
};

/// A gear pair design, as read from a design file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshDesign {
    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Normal module (mm).
    pub module_normal: f64,

    /// Normal pressure angle of the basic rack (degrees).
    pub pressure_angle_normal_deg: f64,

    /// Helix angle of gear 1 (degrees); gear 2 has the opposite hand.
    /// Zero for a spur pair.
    #[serde(default)]
    pub helix_angle_deg: f64,

    /// Operating center distance (mm). The zero-backlash center distance is
    /// used when absent.
    #[serde(default)]
    pub center_distance: Option<f64>,

    /// Effective facewidth (mm).
    pub facewidth: f64,

    /// Speed of gear 1 (rpm). Kinematics are reported only when given.
    #[serde(default)]
    pub input_speed_rpm: Option<f64>,

    /// Basic rack of the cutting tool. The configured tool applies when
    /// absent.
    #[serde(default)]
    pub tool: Option<ToolConfig>,

    /// Gear 1, usually the pinion and driver.
    pub gear1: GearDesign,

    /// Gear 2.
    pub gear2: GearDesign,
}

/// Per-gear part of a design.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GearDesign {
    /// Number of teeth.
    pub number_of_teeth: i32,

    /// Profile shift coefficient. Default: 0.0
    #[serde(default)]
    pub profile_shift_coefficient: f64,
}

impl MeshDesign {
    /// Builds both gears, gear 2 with the opposite helix hand.
    ///
    /// # Errors
    ///
    /// Returns an error if a gear parameter is out of range.
    pub fn gears(&self) -> GearResult<(Gear, Gear)> {
        let pressure_angle = self.pressure_angle_normal_deg.to_radians();
        let helix_angle = self.helix_angle_deg.to_radians();
        let gear1 = Gear::new(
            self.module_normal,
            pressure_angle,
            helix_angle,
            self.gear1.number_of_teeth,
            self.gear1.profile_shift_coefficient,
        )?;
        let gear2 = Gear::new(
            self.module_normal,
            pressure_angle,
            -helix_angle,
            self.gear2.number_of_teeth,
            self.gear2.profile_shift_coefficient,
        )?;
        Ok((gear1, gear2))
    }

    /// Builds the gear pair at the design center distance, or at the
    /// zero-backlash center distance when none is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the gears are invalid, the center distance is too
    /// small, or no zero-backlash center distance exists.
    pub fn pair(&self) -> GearResult<GearPair> {
        let (gear1, gear2) = self.gears()?;
        match self.center_distance {
            Some(center_distance) => GearPair::new(gear1, gear2, center_distance),
            None => match GearPair::zero_backlash(gear1, gear2)? {
                Feasibility::Feasible(pair) => Ok(pair),
                Feasibility::Infeasible(reason) => Err(GearError::domain(
                    "zero_backlash_center_distance",
                    reason.to_string(),
                )),
            },
        }
    }

    /// Resolves the tool: the design's own, or `default_tool`.
    ///
    /// # Errors
    ///
    /// Returns an error if the design's tool has invalid coefficients.
    pub fn tool(&self, default_tool: &GearToolProfile) -> GearResult<GearToolProfile> {
        self.tool
            .as_ref()
            .map_or(Ok(*default_tool), ToolConfig::to_profile)
    }
}

/// Loads a design file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid design.
pub fn load_design(path: &Path) -> Result<MeshDesign, DesignError> {
    let contents = std::fs::read_to_string(path).map_err(|e| DesignError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let design: MeshDesign = serde_json::from_str(&contents).map_err(|e| DesignError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "Loaded design");
    Ok(design)
}

/// Full evaluation of one gear pair design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshReport {
    /// Unit of every angle in the report.
    pub angle_unit: AngleUnit,

    /// Per-gear geometry, gear 1 first.
    pub gears: [GearReport; 2],

    /// Center distances, pressure angles, backlash and clearances.
    pub mesh: MeshSummary,

    /// Active profile and contact ratios.
    pub contact: ContactReport,

    /// Velocities along the line of action, when an input speed is given.
    pub kinematics: Option<KinematicsReport>,

    /// Non-fatal diagnostics raised during evaluation.
    pub advisories: Vec<Advisory>,
}

/// Geometry of one gear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GearReport {
    pub number_of_teeth: i32,
    pub profile_shift_coefficient: f64,
    pub helix_angle: f64,
    pub helix_angle_base: f64,
    pub module_transverse: f64,
    pub pressure_angle_transverse: f64,
    pub pitch_diameter: f64,
    pub base_diameter: f64,
    pub root_diameter: f64,
    pub tip_diameter: f64,
    pub working_pitch_diameter: f64,
    pub base_pitch_transverse: f64,
    /// `None` for spur gears.
    pub pitch_axial: Option<f64>,
    /// `None` for spur gears.
    pub lead: Option<f64>,
    pub tooth_thickness_transverse: f64,
    pub tooth_thickness_normal: f64,
    pub undercut: UndercutCheck,
}

/// Pair-level geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSummary {
    pub center_distance: f64,
    pub reference_center_distance: f64,
    /// Zero-backlash center distance, `None` when infeasible.
    pub theoretical_center_distance: Option<f64>,
    pub working_pressure_angle: f64,
    /// Zero-backlash working pressure angle, `None` when infeasible.
    pub working_pressure_angle_theoretical: Option<f64>,
    /// Why the zero-backlash quantities are missing.
    pub infeasibility: Option<Infeasibility>,
    pub transmission_ratio: f64,
    /// Tip clearances, gear 1 tip first (mm).
    pub tip_clearances: (f64, f64),
    pub backlash: Option<BacklashReport>,
}

/// Backlash chain with the angular play in the report unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BacklashReport {
    pub radial: f64,
    pub circumferential: f64,
    pub angular: (f64, f64),
    pub profile: f64,
    pub normal: f64,
}

/// Active profile limits and contact ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContactReport {
    pub pressure_angle_sap: (f64, f64),
    pub pressure_angle_eap: (f64, f64),
    /// Diameters at the start of active profile (mm), `None` for a gear
    /// whose SAP lies inside its base circle.
    pub diameter_sap: (Option<f64>, Option<f64>),
    /// Diameters at the end of active profile (mm).
    pub diameter_eap: (f64, f64),
    pub contact_plane_length: f64,
    pub contact_ratio_transverse: f64,
    pub contact_ratio_axial: f64,
    pub contact_ratio_total: f64,
    pub contact_lines_length_mean: f64,
    pub contact_lines_length_min: f64,
}

/// Kinematics of the pair driven through gear 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KinematicsReport {
    pub input_speed_rpm: f64,
    /// Signed angular velocities (rad/s).
    pub angular_velocities: (f64, f64),
    /// Pitch-line velocity (mm/s).
    pub pitch_line_velocity: f64,
    /// At the start of active profile of gear 1, or at its base circle when
    /// gear 1 interferes.
    pub start_of_contact: ContactPointReport,
    /// At the pitch point.
    pub pitch_point: ContactPointReport,
    /// At the end of active profile of gear 1, or where contact reaches the
    /// base circle of gear 2 when gear 2 interferes.
    pub end_of_contact: ContactPointReport,
}

/// Velocities at one point of the line of action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContactPointReport {
    pub pressure_angles: (f64, f64),
    /// Magnitudes (mm/s).
    pub tangential_velocity: (f64, f64),
    /// Equal and opposite (mm/s).
    pub sliding_velocity: (f64, f64),
    /// `None` where a tangential velocity vanishes.
    pub specific_sliding: Option<(f64, f64)>,
}

impl ContactPointReport {
    fn new(kinematics: &ContactKinematics, unit: AngleUnit) -> Self {
        Self {
            pressure_angles: convert_pair(unit, kinematics.pressure_angles),
            tangential_velocity: kinematics.tangential_velocity,
            sliding_velocity: kinematics.sliding_velocity,
            specific_sliding: kinematics.specific_sliding,
        }
    }
}

fn convert_pair(unit: AngleUnit, angles: (f64, f64)) -> (f64, f64) {
    (unit.express(angles.0), unit.express(angles.1))
}

/// Evaluates `design`, cutting both gears with the design's tool or
/// `default_tool`.
///
/// # Errors
///
/// Returns an error when the design describes invalid gears or an
/// impossible mesh. Infeasible zero-backlash quantities and undercut are
/// reported, not returned as errors.
pub fn evaluate(
    design: &MeshDesign,
    default_tool: &GearToolProfile,
    unit: AngleUnit,
) -> Result<MeshReport, DesignError> {
    if !(design.facewidth.is_finite() && design.facewidth > 0.0) {
        return Err(GearError::invalid_parameter(
            "facewidth",
            format!("{} must be positive", design.facewidth),
        )
        .into());
    }

    let tool = design.tool(default_tool)?;
    let pair = design.pair()?;
    let (gear1, gear2) = (*pair.gear1(), *pair.gear2());
    tracing::debug!(
        z1 = gear1.number_of_teeth(),
        z2 = gear2.number_of_teeth(),
        center_distance = pair.center_distance(),
        "Evaluating gear pair"
    );

    let mut advisories = tool
        .root_land_half_width(gear1.module_normal(), gear1.pressure_angle_normal())?
        .advisories;

    let working_diameters = pair.working_pitch_diameters();
    let gears = [
        gear_report(&gear1, &tool, working_diameters.0, 1, unit, &mut advisories),
        gear_report(&gear2, &tool, working_diameters.1, 2, unit, &mut advisories),
    ];

    let mesh = mesh_summary(&pair, &tool, unit, &mut advisories);
    let contact = pair.contact_geometry_at_tips(&tool, design.facewidth)?;
    tracing::trace!(
        contact_ratio_total = contact.contact_ratio_total,
        "Resolved contact geometry"
    );
    advisories.extend(contact.interference());

    let kinematics = design
        .input_speed_rpm
        .map(|rpm| kinematics_report(&pair, &contact, rpm, unit));

    for advisory in &advisories {
        tracing::warn!("{advisory}");
    }

    Ok(MeshReport {
        angle_unit: unit,
        gears,
        mesh,
        contact: contact_report(&pair, &contact, unit),
        kinematics,
        advisories,
    })
}

fn gear_report(
    gear: &Gear,
    tool: &GearToolProfile,
    working_pitch_diameter: f64,
    index: u8,
    unit: AngleUnit,
    advisories: &mut Vec<Advisory>,
) -> GearReport {
    let root_diameter = gear.root_diameter(tool);
    let base_diameter = gear.base_diameter();
    if root_diameter < base_diameter {
        advisories.push(Advisory::RootBelowBaseCircle {
            gear: index,
            root_diameter,
            base_diameter,
        });
    }

    let undercut = UndercutCheck::evaluate(gear, tool);
    if undercut.undercut {
        tracing::warn!(gear = index, "Gear is undercut");
    }
    if !undercut.estimates_agree {
        advisories.push(Advisory::UndercutEstimateDisagrees { gear: index });
    }

    GearReport {
        number_of_teeth: gear.number_of_teeth(),
        profile_shift_coefficient: gear.profile_shift_coefficient(),
        helix_angle: unit.express(gear.helix_angle()),
        helix_angle_base: unit.express(gear.helix_angle_base()),
        module_transverse: gear.module_transverse(),
        pressure_angle_transverse: unit.express(gear.pressure_angle_transverse()),
        pitch_diameter: gear.pitch_diameter(),
        base_diameter,
        root_diameter,
        tip_diameter: gear.tip_diameter(tool),
        working_pitch_diameter,
        base_pitch_transverse: gear.base_pitch_transverse(),
        pitch_axial: gear.pitch_axial(),
        lead: gear.lead(),
        tooth_thickness_transverse: gear.tooth_thickness_transverse(),
        tooth_thickness_normal: gear.tooth_thickness_normal(),
        undercut,
    }
}

fn mesh_summary(
    pair: &GearPair,
    tool: &GearToolProfile,
    unit: AngleUnit,
    advisories: &mut Vec<Advisory>,
) -> MeshSummary {
    let theoretical_angle = pair.working_pressure_angle_theoretical();
    if let Feasibility::Feasible(angle) = theoretical_angle {
        if angle > MAX_ACCURATE_INVERSE_INVOLUTE_ANGLE {
            advisories.push(Advisory::InverseInvoluteInaccurate { angle });
        }
    }

    let tip_clearances = pair.tip_clearances(tool);
    for (index, clearance) in [(1, tip_clearances.0), (2, tip_clearances.1)] {
        if clearance < 0.0 {
            advisories.push(Advisory::NegativeClearance {
                gear: index,
                clearance,
            });
        }
    }

    let backlash = pair.backlash().value().map(|b| BacklashReport {
        radial: b.radial,
        circumferential: b.circumferential,
        angular: convert_pair(unit, b.angular),
        profile: b.profile,
        normal: b.normal,
    });

    MeshSummary {
        center_distance: pair.center_distance(),
        reference_center_distance: pair.reference_center_distance(),
        theoretical_center_distance: pair.theoretical_center_distance().value(),
        working_pressure_angle: unit.express(pair.working_pressure_angle()),
        working_pressure_angle_theoretical: theoretical_angle
            .value()
            .map(|angle| unit.express(angle)),
        infeasibility: theoretical_angle.reason(),
        transmission_ratio: pair.transmission_ratio(),
        tip_clearances,
        backlash,
    }
}

fn contact_report(pair: &GearPair, contact: &ContactGeometry, unit: AngleUnit) -> ContactReport {
    let (db1, db2) = (pair.gear1().base_diameter(), pair.gear2().base_diameter());
    ContactReport {
        pressure_angle_sap: convert_pair(
            unit,
            (contact.pressure_angle_sap1, contact.pressure_angle_sap2),
        ),
        pressure_angle_eap: convert_pair(
            unit,
            (contact.pressure_angle_eap1, contact.pressure_angle_eap2),
        ),
        diameter_sap: (
            involute_diameter(db1, contact.pressure_angle_sap1),
            involute_diameter(db2, contact.pressure_angle_sap2),
        ),
        diameter_eap: (
            diameter_at_pressure_angle(db1, contact.pressure_angle_eap1),
            diameter_at_pressure_angle(db2, contact.pressure_angle_eap2),
        ),
        contact_plane_length: contact.contact_plane_length,
        contact_ratio_transverse: contact.contact_ratio_transverse,
        contact_ratio_axial: contact.contact_ratio_axial,
        contact_ratio_total: contact.contact_ratio_total,
        contact_lines_length_mean: contact.contact_lines_length_mean,
        contact_lines_length_min: contact.contact_lines_length_min,
    }
}

/// Diameter of the involute point at `pressure_angle`; a negative angle lies
/// inside the base circle where there is no involute.
fn involute_diameter(base_diameter: f64, pressure_angle: f64) -> Option<f64> {
    (pressure_angle >= 0.0).then(|| diameter_at_pressure_angle(base_diameter, pressure_angle))
}

fn kinematics_report(
    pair: &GearPair,
    contact: &ContactGeometry,
    input_speed_rpm: f64,
    unit: AngleUnit,
) -> KinematicsReport {
    let state = KinematicState::from_driver(*pair, input_speed_rpm * 2.0 * PI / 60.0);
    let point = |pressure_angle1: f64| ContactPointReport::new(&state.at_contact(pressure_angle1), unit);

    // Interfering contact is cut off where it leaves the involute of either gear.
    let start = contact.pressure_angle_sap1.max(0.0);
    let end = if contact.pressure_angle_sap2 < 0.0 {
        pressure_angle_transverse_contact(
            pair.working_pressure_angle(),
            pair.gear1().number_of_teeth(),
            pair.gear2().number_of_teeth(),
            0.0,
        )
    } else {
        contact.pressure_angle_eap1
    };

    KinematicsReport {
        input_speed_rpm,
        angular_velocities: state.angular_velocities(),
        pitch_line_velocity: state.pitch_line_velocity(),
        start_of_contact: point(start),
        pitch_point: point(pair.working_pressure_angle()),
        end_of_contact: point(end),
    }
}
