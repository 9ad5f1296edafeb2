//! Runtime system trait

use tread_core::Result;
use tread_scene::SceneGraph;

/// A system that can be ticked by the frame loop
///
/// Systems are updated in registration order and each call runs to
/// completion before the next system sees the scene.
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self, scene: &mut SceneGraph) -> Result<()>;

    /// Called once per frame with the frame time in seconds
    fn update(&mut self, scene: &mut SceneGraph, dt: f64) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
