//! Involute helical and spur gear geometry.
//!
//! Closed-form macro-geometry and kinematics of external gear pairs, built
//! bottom-up:
//!
//! - [`involute`] - involute function, its inverse, roll angles
//! - [`tooth`] - module, pitch, pressure angles, diameters, tooth thickness
//! - [`rack`] - basic rack (tool) profile and its feasibility
//! - [`undercut`] - form diameter and undercut limits
//! - [`mesh`] - center distance, backlash, contact ratios
//! - [`kinematics`] - pitch-line, tangential and sliding velocities
//!
//! Angles are in radians and lengths in millimetres. Every function is pure;
//! gears and pairs are small `Copy` values that can be evaluated in parallel
//! without coordination.
//!
//! # Example
//!
//! ```
//! use helical_gears::gears::{Gear, GearPair, GearToolProfile, KinematicState};
//!
//! let deg = |v: f64| v.to_radians();
//! let pinion = Gear::new(2.0, deg(20.0), deg(15.0), 20, 0.2)?;
//! let wheel = Gear::new(2.0, deg(20.0), deg(-15.0), 40, 0.0)?;
//!
//! let pair = GearPair::new(pinion, wheel, 62.6)?;
//! let contact = pair.contact_geometry_at_tips(&GearToolProfile::standard(), 20.0)?;
//! assert!(contact.contact_ratio_total > 2.0);
//!
//! let state = KinematicState::from_driver(pair, 157.0);
//! let at_tip = state.at_contact(contact.pressure_angle_eap1);
//! assert_eq!(at_tip.sliding_velocity.0, -at_tip.sliding_velocity.1);
//! # Ok::<(), helical_gears::gears::GearError>(())
//! ```

pub mod error;
pub mod involute;
pub mod kinematics;
pub mod mesh;
pub mod outcome;
pub mod rack;
pub mod tooth;
pub mod undercut;
pub mod units;

pub use error::{GearError, GearResult};
pub use kinematics::{ContactKinematics, KinematicState};
pub use mesh::{Backlash, ContactGeometry, GearPair};
pub use outcome::{Advisory, Diagnosed, Feasibility, Infeasibility};
pub use rack::{GearToolProfile, ToolUndercut};
pub use tooth::Gear;
pub use undercut::UndercutCheck;
pub use units::AngleUnit;
