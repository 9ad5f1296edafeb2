//! Tread Core - Foundational types for the Tread character controller
//!
//! This crate provides the core types that all other Tread crates depend on:
//! - `NodeId` - Stable scene node identifiers
//! - `Transform`, `Vec3` - Spatial types (Y up, forward is -Z)
//! - Angle helpers for heading/pitch in degrees
//! - Error types and Result alias

mod angle;
mod error;
mod id;
mod types;

pub use angle::{approach, heading_forward, heading_right, wrap_degrees};
pub use error::{Result, TreadError};
pub use id::NodeId;
pub use types::{Transform, Vec3};
