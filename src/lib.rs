//! helical-gears: macro-geometry and meshing kinematics of involute gear pairs
//!
//! This library computes tooth geometry, center distances, backlash, contact
//! ratios, undercut limits and sliding velocities of external helical and
//! spur gear pairs from closed-form involute-gear equations.
//!
//! # Architecture
//!
//! - **Core**: pure functions and small value types in [`gears`], radians and
//!   millimetres throughout
//! - **Report pipeline**: [`report`] reads a JSON gear pair design and runs the
//!   whole derivation chain, collecting advisories
//! - **Tooling**: [`config`] and the `gear-mesh` binary
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Configuration and design file errors
//! - [`gears`] - Involute gear geometry and kinematics
//! - [`report`] - Design files and mesh reports

pub mod config;
pub mod error;
pub mod gears;
pub mod report;
