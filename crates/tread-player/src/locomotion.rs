//! Keyed movement relative to the camera

use serde::{Deserialize, Serialize};
use tread_animation::MotionState;
use tread_core::{heading_forward, wrap_degrees, Result, TreadError, Vec3};
use tread_runtime::InputState;

pub const ACTION_FORWARD: &str = "move_forward";
pub const ACTION_BACKWARD: &str = "move_backward";
pub const ACTION_LEFT: &str = "move_left";
pub const ACTION_RIGHT: &str = "move_right";
pub const ACTION_RUN: &str = "run";
pub const ACTION_JUMP: &str = "jump";

/// `[movement]` section of the controller config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Ground speed while walking, units per second
    pub walk_speed: f32,
    /// Ground speed while the run action is held
    pub run_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 6.0,
            run_speed: 14.0,
        }
    }
}

impl MovementConfig {
    pub fn validate(&self) -> Result<()> {
        TreadError::check_range("movement.walk_speed", self.walk_speed as f64, 0.0, 1000.0)?;
        TreadError::check_range("movement.run_speed", self.run_speed as f64, 0.0, 1000.0)?;
        Ok(())
    }

    pub fn speed(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Idle => 0.0,
            Gait::Walk => self.walk_speed,
            Gait::Run => self.run_speed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gait {
    #[default]
    Idle,
    Walk,
    Run,
}

impl Gait {
    /// Animation state for this gait; airborne always falls
    pub fn motion_state(self, grounded: bool) -> MotionState {
        match (grounded, self) {
            (false, _) => MotionState::Fall,
            (true, Gait::Idle) => MotionState::Idle,
            (true, Gait::Walk) => MotionState::Walk,
            (true, Gait::Run) => MotionState::Run,
        }
    }
}

/// Movement keys held this frame, reduced to axes.
///
/// `forward` is +1 for forward and -1 for backward, `side` is +1 for right
/// and -1 for left. Opposite keys cancel out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: i8,
    pub side: i8,
    pub run: bool,
}

impl MoveIntent {
    pub fn from_input(input: &InputState) -> Self {
        let axis = |positive: &str, negative: &str| {
            input.is_action_pressed(positive) as i8 - input.is_action_pressed(negative) as i8
        };
        Self {
            forward: axis(ACTION_FORWARD, ACTION_BACKWARD),
            side: axis(ACTION_RIGHT, ACTION_LEFT),
            run: input.is_action_pressed(ACTION_RUN),
        }
    }

    /// Heading offset from the camera for the held keys, `None` when not moving
    pub fn angle(&self) -> Option<f32> {
        let angle = match (self.forward.signum(), self.side.signum()) {
            (1, 0) => 0.0,
            (1, -1) => 45.0,
            (0, -1) => 90.0,
            (-1, -1) => 135.0,
            (-1, 0) => 180.0,
            (-1, 1) => -135.0,
            (0, 1) => -90.0,
            (1, 1) => -45.0,
            _ => return None,
        };
        Some(angle)
    }

    pub fn gait(&self) -> Gait {
        match (self.angle(), self.run) {
            (None, _) => Gait::Idle,
            (Some(_), false) => Gait::Walk,
            (Some(_), true) => Gait::Run,
        }
    }

    /// Resolve against the camera heading into a facing and a velocity
    pub fn stride(&self, camera_heading: f32, config: &MovementConfig) -> Option<Stride> {
        let angle = self.angle()?;
        let gait = self.gait();
        let heading = wrap_degrees(camera_heading + angle);
        Some(Stride {
            heading,
            velocity: heading_forward(heading) * config.speed(gait),
            gait,
        })
    }
}

/// One frame of intended ground motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stride {
    /// Heading the avatar turns to face, degrees
    pub heading: f32,
    /// Horizontal velocity, units per second
    pub velocity: Vec3,
    pub gait: Gait,
}
