//! Controller configuration file

use crate::camera::CameraConfig;
use crate::locomotion::MovementConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tread_animation::AnimationConfig;
use tread_core::Result;
use tread_physics::GroundConfig;
use tread_runtime::InputConfig;

/// All controller tuning, one TOML section per subsystem.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub camera: CameraConfig,
    pub movement: MovementConfig,
    pub ground: GroundConfig,
    pub animation: AnimationConfig,
    pub input: InputConfig,
}

impl ControllerConfig {
    /// Read, parse and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "loaded controller config");
        Ok(config)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Report the first out-of-range or unresolvable value
    pub fn validate(&self) -> Result<()> {
        self.camera.validate()?;
        self.movement.validate()?;
        self.ground.validate()?;
        self.animation.validate()?;
        self.input.validate()?;
        Ok(())
    }
}
