//! Mouse-driven orbit camera around the avatar

use serde::{Deserialize, Serialize};
use tread_core::{wrap_degrees, NodeId, Result, TreadError, Vec3};
use tread_runtime::InputState;
use tread_scene::SceneGraph;

pub const PIVOT_NODE: &str = "camera-pivot";
pub const CAMERA_NODE: &str = "camera";

/// `[camera]` section of the controller config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Height of the orbit pivot above the avatar's feet
    pub pivot_height: f32,
    /// Distance from the pivot to the camera
    pub distance: f32,
    /// Scaled pointer offsets at or below this are ignored
    pub tolerance: f32,
    /// Multiplier applied to the normalized pointer position
    pub pointer_scale: f32,
    /// Degrees of rotation per unit of scaled pointer offset
    pub turn_scale: f32,
    /// Pitch never leaves [-pitch_limit, pitch_limit]
    pub pitch_limit: f32,
    /// Flip vertical pointer motion before it reaches the pitch
    pub invert_y: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pivot_height: 3.0,
            distance: 20.0,
            tolerance: 0.005,
            pointer_scale: 20.0,
            turn_scale: 10.0,
            pitch_limit: 70.0,
            invert_y: false,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<()> {
        TreadError::check_range("camera.pivot_height", self.pivot_height as f64, -100.0, 100.0)?;
        TreadError::check_range("camera.distance", self.distance as f64, 0.0, 10_000.0)?;
        TreadError::check_range("camera.tolerance", self.tolerance as f64, 0.0, 10.0)?;
        TreadError::check_range("camera.pointer_scale", self.pointer_scale as f64, 0.0, 1000.0)?;
        TreadError::check_range("camera.turn_scale", self.turn_scale as f64, 0.0, 1000.0)?;
        TreadError::check_range("camera.pitch_limit", self.pitch_limit as f64, 0.0, 89.0)?;
        Ok(())
    }
}

/// Where the camera is and what it looks at, in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

/// A compass pivot above the avatar with the camera hanging behind it.
///
/// The pivot follows the avatar's position but not its heading, so turning
/// the avatar never swings the camera around.
pub struct CameraRig {
    pivot: NodeId,
    camera: NodeId,
    config: CameraConfig,
}

impl CameraRig {
    /// Create the pivot and camera nodes under `avatar`
    pub fn attach(scene: &mut SceneGraph, avatar: NodeId, config: &CameraConfig) -> Result<Self> {
        let pivot = scene.attach_new_node(avatar, PIVOT_NODE)?;
        scene.set_pos(pivot, Vec3::new(0.0, config.pivot_height, 0.0))?;
        scene.set_compass(pivot, true)?;

        let camera = scene.attach_new_node(pivot, CAMERA_NODE)?;
        scene.set_pos(camera, Vec3::new(0.0, 0.0, config.distance))?;

        Ok(Self {
            pivot,
            camera,
            config: config.clone(),
        })
    }

    /// Consume the pointer offset from the window center and orbit by it.
    ///
    /// Does nothing while the pointer is outside the window. Otherwise the
    /// pointer is recentered, so each offset is applied exactly once.
    /// Returns whether the orientation changed.
    pub fn update(&self, input: &mut InputState, scene: &mut SceneGraph) -> Result<bool> {
        let Some((px, py)) = input.pointer() else {
            return Ok(false);
        };
        input.recenter_pointer();

        let x = px * self.config.pointer_scale;
        let mut y = py * self.config.pointer_scale;
        if self.config.invert_y {
            y = -y;
        }
        self.orbit(scene, x, y)
    }

    /// Rotate by already-scaled pointer offsets
    pub fn orbit(&self, scene: &mut SceneGraph, x: f32, y: f32) -> Result<bool> {
        let tolerance = self.config.tolerance;
        let limit = self.config.pitch_limit;
        let mut changed = false;

        if x.abs() > tolerance {
            let heading = scene.h(self.pivot)?;
            scene.set_h(self.pivot, wrap_degrees(heading - x * self.config.turn_scale))?;
            changed = true;
        }

        let pitch = scene.p(self.pivot)?;
        if (y > tolerance && pitch < limit) || (y < -tolerance && pitch > -limit) {
            let pitch = (pitch + y * self.config.turn_scale).clamp(-limit, limit);
            scene.set_p(self.pivot, pitch)?;
            changed = true;
        }

        Ok(changed)
    }

    pub fn heading(&self, scene: &SceneGraph) -> Result<f32> {
        scene.h(self.pivot)
    }

    pub fn pitch(&self, scene: &SceneGraph) -> Result<f32> {
        scene.p(self.pivot)
    }

    /// Point the camera along a heading, e.g. behind a freshly spawned avatar
    pub fn set_heading(&self, scene: &mut SceneGraph, heading: f32) -> Result<()> {
        scene.set_h(self.pivot, wrap_degrees(heading))
    }

    pub fn view(&self, scene: &SceneGraph) -> Result<CameraView> {
        let eye = scene.world_position(self.camera)?;
        let target = scene.world_position(self.pivot)?;
        let up = scene.world_transform(self.pivot)?.up();
        Ok(CameraView { eye, target, up })
    }

    pub fn pivot(&self) -> NodeId {
        self.pivot
    }

    pub fn camera(&self) -> NodeId {
        self.camera
    }
}
