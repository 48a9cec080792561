//! Outcome types for infeasible and suspect results.
//!
//! [`Feasibility`] replaces a missing value for configurations that are
//! physically impossible but expected in normal use, such as an undercut
//! tooth root found while sweeping profile shift. [`Diagnosed`] carries a
//! computed value together with non-fatal [`Advisory`] flags.

use std::fmt;

use serde::Serialize;

/// Why a quantity has no physically meaningful value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Infeasibility {
    /// The root fillet boundary lies below the base circle.
    Undercut {
        /// Transverse pressure angle of the fillet boundary point (rad), negative.
        boundary_pressure_angle: f64,
    },

    /// The zero-backlash involute argument is negative, typically from a
    /// large negative sum of profile shifts.
    NegativeInvolute {
        /// Value of the involute function that was rejected.
        involute: f64,
    },
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undercut {
                boundary_pressure_angle,
            } => write!(
                f,
                "undercut: fillet boundary pressure angle {boundary_pressure_angle:.6} rad is negative"
            ),
            Self::NegativeInvolute { involute } => {
                write!(f, "zero-backlash involute argument {involute:.6} is negative")
            }
        }
    }
}

/// A value that may not exist for physical reasons.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub enum Feasibility<T> {
    /// The configuration is feasible and yields a value.
    Feasible(T),

    /// The configuration is infeasible.
    Infeasible(Infeasibility),
}

impl<T> Feasibility<T> {
    /// Returns `true` for a feasible result.
    pub const fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible(_))
    }

    /// Returns the value, discarding the reason for infeasibility.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Feasible(v) => Some(v),
            Self::Infeasible(_) => None,
        }
    }

    /// Returns the reason for infeasibility, if any.
    pub const fn reason(&self) -> Option<Infeasibility> {
        match self {
            Self::Feasible(_) => None,
            Self::Infeasible(reason) => Some(*reason),
        }
    }

    /// Applies `f` to a feasible value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Feasibility<U> {
        match self {
            Self::Feasible(v) => Feasibility::Feasible(f(v)),
            Self::Infeasible(reason) => Feasibility::Infeasible(reason),
        }
    }

    /// Chains another feasibility-producing computation.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Feasibility<U>) -> Feasibility<U> {
        match self {
            Self::Feasible(v) => f(v),
            Self::Infeasible(reason) => Feasibility::Infeasible(reason),
        }
    }
}

/// A non-fatal diagnostic attached to a computed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The rack root fillets overlap, leaving a negative root land.
    RackRootInfeasible {
        /// Half-width of the root land (mm), negative.
        root_land_half_width: f64,
    },

    /// The root circle lies inside the base circle.
    RootBelowBaseCircle {
        /// Gear index within the pair (1 or 2), 0 for a single gear.
        gear: u8,
        /// Root diameter (mm).
        root_diameter: f64,
        /// Base diameter (mm).
        base_diameter: f64,
    },

    /// An inverse involute result lies past the accurate range of the
    /// approximation.
    InverseInvoluteInaccurate {
        /// Angle returned by the approximation (rad).
        angle: f64,
    },

    /// The tip clearance of a gear against its mate's root is negative.
    NegativeClearance {
        /// Gear index whose tip interferes (1 or 2).
        gear: u8,
        /// Clearance (mm).
        clearance: f64,
    },

    /// The start of active profile lies inside the base circle, so the mate's
    /// tip engages below the involute.
    Interference {
        /// Gear index whose flank is cut into (1 or 2).
        gear: u8,
        /// Transverse pressure angle at the start of active profile (rad), negative.
        pressure_angle_sap: f64,
    },

    /// The undercut estimate from the minimum tooth count disagrees with
    /// the form diameter evaluation.
    UndercutEstimateDisagrees {
        /// Gear index within the pair (1 or 2), 0 for a single gear.
        gear: u8,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RackRootInfeasible {
                root_land_half_width,
            } => write!(
                f,
                "rack root geometry is not feasible (root land half-width {root_land_half_width:.4} mm)"
            ),
            Self::RootBelowBaseCircle {
                gear,
                root_diameter,
                base_diameter,
            } => write!(
                f,
                "gear {gear}: root diameter {root_diameter:.4} mm is below base diameter {base_diameter:.4} mm"
            ),
            Self::InverseInvoluteInaccurate { angle } => write!(
                f,
                "inverse involute result {:.3} deg is past the accurate range",
                angle.to_degrees()
            ),
            Self::NegativeClearance { gear, clearance } => write!(
                f,
                "gear {gear}: tip clearance {clearance:.4} mm is negative"
            ),
            Self::Interference {
                gear,
                pressure_angle_sap,
            } => write!(
                f,
                "gear {gear}: start of active profile at {:.3} deg lies inside the base circle (involute interference)",
                pressure_angle_sap.to_degrees()
            ),
            Self::UndercutEstimateDisagrees { gear } => write!(
                f,
                "gear {gear}: minimum-teeth undercut estimate disagrees with the form diameter"
            ),
        }
    }
}

/// A computed value with the advisories raised while computing it.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Diagnosed<T> {
    /// The computed value, returned even when advisories are present.
    pub value: T,

    /// Advisories raised during the computation.
    pub advisories: Vec<Advisory>,
}

impl<T> Diagnosed<T> {
    /// Wraps a value without advisories.
    pub const fn clean(value: T) -> Self {
        Self {
            value,
            advisories: Vec::new(),
        }
    }

    /// Wraps a value with a single advisory.
    pub fn flagged(value: T, advisory: Advisory) -> Self {
        Self {
            value,
            advisories: vec![advisory],
        }
    }

    /// Returns `true` when any advisory was raised.
    pub fn is_suspect(&self) -> bool {
        !self.advisories.is_empty()
    }
}
