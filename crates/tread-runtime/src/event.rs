//! Controller events

use serde::Serialize;
use tread_core::Vec3;

/// Notifications raised by the controller during a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Feet left the ground by jumping
    Jumped { position: Vec3 },
    /// Touched down after being airborne
    Landed { position: Vec3, impact_speed: f32 },
    /// Walked off a ledge
    LeftGround { position: Vec3 },
    /// Fell below the kill height and was put back at the spawn point
    Respawned { position: Vec3 },
    /// Horizontal motion was cut short by level geometry
    Blocked { requested: f32, moved: f32 },
    /// The animation crossfade target changed
    AnimationChanged { from: String, to: String },
}
