//! Animation blending for the Tread controller
//!
//! The controller never owns mesh or skeletal data. It decides which clip
//! should be playing and how strongly each clip contributes:
//! - `ClipSet` / `AnimationConfig` - the named clips and their timing
//! - `BlendMap` - per-clip crossfade weights
//! - `Animator` - current/previous clip, looping playback, weighted layers
//! - `blend` - pose mixing for hosts that sample skeletal clips themselves

pub mod animator;
pub mod blend;
pub mod blend_map;
pub mod clip;
pub mod playback;

pub use animator::{AnimationChange, AnimationLayer, Animator, PoseSampler};
pub use blend::{blend_poses, blend_weighted, JointPose};
pub use blend_map::BlendMap;
pub use clip::{AnimationConfig, ClipDesc, ClipRoles, ClipSet, MotionState};
pub use playback::ClipPlayback;
