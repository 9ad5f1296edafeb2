//! Tread Scene - minimal scene graph
//!
//! Holds the node hierarchy the controller mutates every frame:
//! the avatar, its compass-flagged camera pivot and the camera itself.

mod graph;

pub use graph::{SceneGraph, SceneNode, ROOT_NAME};
