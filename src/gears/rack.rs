//! Basic rack (generating tool) profile.
//!
//! The [`GearToolProfile`] describes the basic rack a cutter generates. Its
//! addendum and dedendum are those of the rack reference profile; the cutter
//! tip sits on the rack dedendum line and the cutter tip radius is the rack
//! root radius. All coefficients are multiples of the module.
//!
//! Rack profile polylines for plotting are not produced here; only the
//! quantities and feasibility checks derived from the profile.

use crate::gears::error::{GearError, GearResult};
use crate::gears::outcome::{Advisory, Diagnosed};

use std::f64::consts::PI;

/// Optional protuberance (undercut) on the flank of the cutter tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolUndercut {
    /// Flank angle of the protuberance (rad), smaller than the pressure angle.
    pub angle: f64,

    /// Protuberance size as a coefficient of module.
    pub size_coefficient: f64,
}

/// Basic rack profile of the generating tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearToolProfile {
    /// Rack addendum coefficient (gear addendum).
    pub addendum_coefficient: f64,

    /// Rack dedendum coefficient (cutter addendum, gear dedendum).
    pub dedendum_coefficient: f64,

    /// Rack root radius coefficient (cutter tip radius).
    pub tip_radius_coefficient: f64,

    /// Protuberance on the cutter tip.
    pub undercut: Option<ToolUndercut>,
}

impl Default for GearToolProfile {
    fn default() -> Self {
        Self::standard()
    }
}

impl GearToolProfile {
    /// Creates a tool profile after validating its coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error if any coefficient is not positive, or if an
    /// undercut has a non-positive angle or size.
    pub fn new(
        addendum_coefficient: f64,
        dedendum_coefficient: f64,
        tip_radius_coefficient: f64,
        undercut: Option<ToolUndercut>,
    ) -> GearResult<Self> {
        let profile = Self {
            addendum_coefficient,
            dedendum_coefficient,
            tip_radius_coefficient,
            undercut,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Standard basic rack: addendum 1.0, dedendum 1.25, root radius 0.38.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            addendum_coefficient: 1.0,
            dedendum_coefficient: 1.25,
            tip_radius_coefficient: 0.38,
            undercut: None,
        }
    }

    /// Validates the coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error if any coefficient is not positive.
    pub fn validate(&self) -> GearResult<()> {
        let checks = [
            ("addendum_coefficient", self.addendum_coefficient),
            ("dedendum_coefficient", self.dedendum_coefficient),
            ("tip_radius_coefficient", self.tip_radius_coefficient),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(GearError::invalid_parameter(
                    name,
                    format!("{value} must be positive"),
                ));
            }
        }
        if let Some(undercut) = self.undercut {
            if !(undercut.angle > 0.0) {
                return Err(GearError::invalid_parameter(
                    "undercut.angle",
                    format!("{} rad must be positive", undercut.angle),
                ));
            }
            if !(undercut.size_coefficient > 0.0) {
                return Err(GearError::invalid_parameter(
                    "undercut.size_coefficient",
                    format!("{} must be positive", undercut.size_coefficient),
                ));
            }
        }
        Ok(())
    }

    /// Rack addendum for `module` (mm).
    #[must_use]
    pub fn addendum(&self, module: f64) -> f64 {
        self.addendum_coefficient * module
    }

    /// Rack dedendum for `module` (mm).
    #[must_use]
    pub fn dedendum(&self, module: f64) -> f64 {
        self.dedendum_coefficient * module
    }

    /// Rack root radius for `module` (mm).
    #[must_use]
    pub fn tip_radius(&self, module: f64) -> f64 {
        self.tip_radius_coefficient * module
    }

    /// Total tooth depth available from the profile (mm).
    #[must_use]
    pub fn tooth_depth(&self, module: f64) -> f64 {
        self.addendum(module) + self.dedendum(module)
    }

    /// Half-width of the rack root land between the two root fillets (mm).
    ///
    /// A negative width means the fillets overlap; the value is still
    /// returned, flagged with [`Advisory::RackRootInfeasible`].
    ///
    /// # Errors
    ///
    /// Returns a domain error when an undercut angle is not smaller than
    /// `pressure_angle`.
    pub fn root_land_half_width(
        &self,
        module: f64,
        pressure_angle: f64,
    ) -> GearResult<Diagnosed<f64>> {
        let dedendum = self.dedendum(module);
        let rho = self.tip_radius(module);
        let quarter_pitch = rack_pitch(module) / 4.0;

        let half_width = match self.undercut {
            None => {
                let fillet_height = rho - rho * pressure_angle.sin();
                let flank_height = dedendum - fillet_height;
                quarter_pitch - flank_height * pressure_angle.tan() - rho * pressure_angle.cos()
            }
            Some(undercut) => {
                let relief = pressure_angle - undercut.angle;
                if relief <= 0.0 {
                    return Err(GearError::domain(
                        "root_land_half_width",
                        format!(
                            "undercut angle {} rad must be smaller than pressure angle {pressure_angle} rad",
                            undercut.angle
                        ),
                    ));
                }
                let size = undercut.size_coefficient * module;
                let fillet_height = rho - rho * undercut.angle.sin();
                let fillet_offset = rho * (1.0 - relief.cos());
                let undercut_length = (size - fillet_offset) / relief.sin();
                let undercut_height = undercut_length * undercut.angle.cos();
                let flank_height = dedendum - (fillet_height + undercut_height);

                quarter_pitch
                    - flank_height * pressure_angle.tan()
                    - undercut_height * undercut.angle.tan()
                    - rho * undercut.angle.cos()
            }
        };

        if half_width < 0.0 {
            Ok(Diagnosed::flagged(
                half_width,
                Advisory::RackRootInfeasible {
                    root_land_half_width: half_width,
                },
            ))
        } else {
            Ok(Diagnosed::clean(half_width))
        }
    }
}

/// Pitch of the basic rack.
#[must_use]
pub fn rack_pitch(module: f64) -> f64 {
    PI * module
}

/// Base pitch of the basic rack.
#[must_use]
pub fn rack_base_pitch(module: f64, pressure_angle: f64) -> f64 {
    PI * module * pressure_angle.cos()
}

/// Bottom clearance of the basic rack.
#[must_use]
pub fn bottom_clearance(addendum: f64, dedendum: f64) -> f64 {
    dedendum - addendum
}

/// Root radius that exactly fills the bottom clearance.
#[must_use]
pub fn bottom_clearance_root_radius(addendum: f64, dedendum: f64, pressure_angle: f64) -> f64 {
    bottom_clearance(addendum, dedendum) / (1.0 - pressure_angle.sin())
}

/// Largest root radius the basic rack allows.
///
/// The smaller of the radius limited by bottom clearance and the full root
/// radius that closes the space width. Only meaningful without undercut.
#[must_use]
pub fn max_root_radius(module: f64, pressure_angle: f64, addendum: f64, dedendum: f64) -> f64 {
    let clearance_limit = bottom_clearance_root_radius(addendum, dedendum, pressure_angle);

    let half_space = PI * module / 2.0;
    let tan_a = pressure_angle.tan();
    let sec_a = 1.0 / pressure_angle.cos();
    let y_fillet = (half_space * tan_a - half_space * sec_a + 2.0 * dedendum)
        / (2.0 * (tan_a * sec_a - tan_a * tan_a - 1.0));
    let full_root_radius = (dedendum + y_fillet) / (1.0 - pressure_angle.sin());

    clearance_limit.min(full_root_radius)
}
