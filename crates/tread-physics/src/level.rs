//! Serializable level geometry

use crate::world::PhysicsWorld;
use serde::{Deserialize, Serialize};
use tread_core::{Result, TreadError, Vec3};

/// One static box in a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDesc {
    pub name: String,
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
}

/// Static level: an optional floor, boxes and where the avatar starts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDesc {
    pub spawn: [f32; 3],
    /// Height of an unbounded floor, if the level has one
    pub floor: Option<f32>,
    #[serde(rename = "box")]
    pub boxes: Vec<BoxDesc>,
}

impl LevelDesc {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let level: Self = toml::from_str(source)?;
        level.validate()?;
        Ok(level)
    }

    pub fn spawn_point(&self) -> Vec3 {
        Vec3::from_array(self.spawn)
    }

    pub fn validate(&self) -> Result<()> {
        for b in &self.boxes {
            if b.half_extents.iter().any(|h| !(*h > 0.0)) {
                return Err(TreadError::PhysicsError(format!(
                    "box '{}' needs positive half extents, got {:?}",
                    b.name, b.half_extents
                )));
            }
        }
        Ok(())
    }

    /// Build the collision world for this level
    pub fn build(&self) -> Result<PhysicsWorld> {
        self.validate()?;

        let mut world = PhysicsWorld::new();
        if let Some(height) = self.floor {
            world.add_ground_plane(height);
        }
        for b in &self.boxes {
            world.add_box(
                b.name.clone(),
                Vec3::from_array(b.center),
                Vec3::from_array(b.half_extents),
            );
        }

        tracing::info!(
            colliders = world.collider_count(),
            "level collision built"
        );
        Ok(world)
    }
}
