//! Angle units.
//!
//! The core works in radians and millimetres only. Degrees appear at the
//! input and output boundaries (design files, reports), where values carry a
//! `_deg` suffix or are converted through [`AngleUnit`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Millimetres per inch, used by the diametral pitch conversion.
pub const MM_PER_INCH: f64 = 25.4;

/// Unit used when presenting angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    /// Radians, the unit used by every core formula.
    #[default]
    Radians,

    /// Degrees.
    Degrees,
}

impl AngleUnit {
    /// Parses an angle unit from a string.
    ///
    /// Accepts: "rad", "radians", "deg", "degrees" (case-insensitive).
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rad" | "radian" | "radians" => Some(Self::Radians),
            "deg" | "degree" | "degrees" => Some(Self::Degrees),
            _ => None,
        }
    }

    /// Converts an angle in radians into this unit.
    #[must_use]
    pub fn express(self, radians: f64) -> f64 {
        match self {
            Self::Radians => radians,
            Self::Degrees => radians.to_degrees(),
        }
    }

    /// Converts an angle expressed in this unit into radians.
    #[must_use]
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            Self::Radians => value,
            Self::Degrees => value.to_radians(),
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radians => write!(f, "rad"),
            Self::Degrees => write!(f, "deg"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn unit_from_string() {
        assert_eq!(AngleUnit::from_str_loose("rad"), Some(AngleUnit::Radians));
        assert_eq!(AngleUnit::from_str_loose("Radians"), Some(AngleUnit::Radians));
        assert_eq!(AngleUnit::from_str_loose("DEG"), Some(AngleUnit::Degrees));
        assert_eq!(AngleUnit::from_str_loose("degrees"), Some(AngleUnit::Degrees));
        assert_eq!(AngleUnit::from_str_loose("grad"), None);
    }

    #[test]
    fn conversions() {
        assert!((AngleUnit::Degrees.express(PI) - 180.0).abs() < 1e-12);
        assert!((AngleUnit::Degrees.to_radians(90.0) - PI / 2.0).abs() < 1e-12);
        assert!((AngleUnit::Radians.express(0.3) - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn unit_display() {
        assert_eq!(AngleUnit::Radians.to_string(), "rad");
        assert_eq!(AngleUnit::Degrees.to_string(), "deg");
    }
}
