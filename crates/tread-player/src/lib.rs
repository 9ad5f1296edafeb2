//! Tread Player - third-person avatar controller
//!
//! This crate ties the Tread crates into a playable character:
//! - `Avatar` - per-frame camera orbit, locomotion, grounding and animation
//! - `CameraRig` - compass pivot orbiting with the pointer
//! - `MoveIntent` - WASD/shift input mapped onto camera-relative headings
//! - `ControllerConfig` - the TOML file all of the above is tuned from
//! - `ScenarioRunner` - scripted headless runs used by the `tread` binary

pub mod avatar;
pub mod camera;
pub mod config;
pub mod locomotion;
pub mod scenario;

pub use avatar::{Avatar, AvatarSnapshot, AVATAR_NODE};
pub use camera::{CameraConfig, CameraRig, CameraView};
pub use config::ControllerConfig;
pub use locomotion::{Gait, MoveIntent, MovementConfig, Stride};
pub use scenario::{FrameEvent, InputStep, RunOptions, RunReport, Scenario, ScenarioRunner};
