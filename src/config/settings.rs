//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.
//! Angles are written in degrees here and converted once, when the tool
//! section is turned into a [`GearToolProfile`].

use serde::Deserialize;

use crate::error::ConfigError;
use crate::gears::{AngleUnit, GearResult, GearToolProfile, ToolUndercut};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Default basic rack, used when a design file names no tool.
    #[serde(default)]
    pub tool: ToolConfig,

    /// Report output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tool
            .to_profile()
            .map_err(|e| ConfigError::ValidationError {
                message: format!("Invalid tool profile: {e}"),
            })?;

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        Ok(())
    }
}

/// Basic rack coefficients, as multiples of the module.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Rack addendum coefficient. Default: 1.0
    #[serde(default = "default_addendum")]
    pub addendum_coefficient: f64,

    /// Rack dedendum coefficient. Default: 1.25
    #[serde(default = "default_dedendum")]
    pub dedendum_coefficient: f64,

    /// Rack root radius coefficient. Default: 0.38
    #[serde(default = "default_tip_radius")]
    pub tip_radius_coefficient: f64,

    /// Optional protuberance on the cutter tip.
    #[serde(default)]
    pub undercut: Option<UndercutConfig>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            addendum_coefficient: default_addendum(),
            dedendum_coefficient: default_dedendum(),
            tip_radius_coefficient: default_tip_radius(),
            undercut: None,
        }
    }
}

impl ToolConfig {
    /// Builds the validated tool profile, converting the undercut angle to
    /// radians.
    ///
    /// # Errors
    ///
    /// Returns an error if any coefficient is not positive.
    pub fn to_profile(&self) -> GearResult<GearToolProfile> {
        GearToolProfile::new(
            self.addendum_coefficient,
            self.dedendum_coefficient,
            self.tip_radius_coefficient,
            self.undercut.map(|u| ToolUndercut {
                angle: u.angle_deg.to_radians(),
                size_coefficient: u.size_coefficient,
            }),
        )
    }
}

const fn default_addendum() -> f64 {
    GearToolProfile::standard().addendum_coefficient
}

const fn default_dedendum() -> f64 {
    GearToolProfile::standard().dedendum_coefficient
}

const fn default_tip_radius() -> f64 {
    GearToolProfile::standard().tip_radius_coefficient
}

/// Cutter tip protuberance.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UndercutConfig {
    /// Flank angle of the protuberance in degrees.
    pub angle_deg: f64,

    /// Protuberance size as a coefficient of module.
    pub size_coefficient: f64,
}

/// Report output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Unit for angles in the report: "radians" or "degrees".
    /// Default: "degrees"
    #[serde(default = "default_angle_unit")]
    pub angle_unit: AngleUnit,

    /// Pretty-print the JSON report.
    #[serde(default)]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            angle_unit: default_angle_unit(),
            pretty: false,
        }
    }
}

const fn default_angle_unit() -> AngleUnit {
    AngleUnit::Degrees
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
