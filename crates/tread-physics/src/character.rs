//! Box-shaped horizontal mover using Rapier's kinematic character controller

use crate::ground::GroundConfig;
use crate::world::PhysicsWorld;
use rapier3d::control::{CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;
use tread_core::Vec3;

/// Outcome of one horizontal move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Horizontal translation actually applied
    pub translation: Vec3,
    /// Whether level geometry shortened the requested move
    pub blocked: bool,
}

/// Slides a collision box along walls.
///
/// The box floats `step_height` above the feet, so the floor and anything
/// low enough to step onto never touch it; vertical contact is left to the
/// ground ray.
pub struct CharacterMover {
    controller: KinematicCharacterController,
    shape: Cuboid,
    /// Distance from the feet to the box center
    center_offset: f32,
}

impl CharacterMover {
    pub fn new(config: &GroundConfig) -> Self {
        let controller = KinematicCharacterController {
            offset: CharacterLength::Absolute(0.01),
            slide: true,
            autostep: None,
            snap_to_ground: None,
            ..KinematicCharacterController::default()
        };

        let [hx, hy, hz] = config.body_half_extents;
        Self {
            controller,
            shape: Cuboid::new(vector![hx, hy, hz]),
            center_offset: config.step_height + hy,
        }
    }

    /// Move the box from `feet` by the horizontal part of `desired`
    pub fn move_horizontal(
        &self,
        world: &PhysicsWorld,
        feet: Vec3,
        desired: Vec3,
        dt: f32,
    ) -> MoveResult {
        let wanted = desired.horizontal();
        if wanted.length() < 1e-6 {
            return MoveResult {
                translation: Vec3::ZERO,
                blocked: false,
            };
        }

        let position = Isometry::translation(feet.x, feet.y + self.center_offset, feet.z);
        let corrected = self.controller.move_shape(
            dt,
            &world.rigid_body_set,
            &world.collider_set,
            &world.query_pipeline,
            &self.shape,
            &position,
            vector![wanted.x, 0.0, wanted.z],
            QueryFilter::default(),
            |_| {},
        );

        let translation = Vec3::new(corrected.translation.x, 0.0, corrected.translation.z);
        let blocked = translation.length() + 1e-3 < wanted.length();
        if blocked {
            tracing::trace!(
                requested = wanted.length(),
                moved = translation.length(),
                "horizontal move blocked"
            );
        }

        MoveResult {
            translation,
            blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_free_move_is_unchanged() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane(0.0);
        let mover = CharacterMover::new(&GroundConfig::default());

        let result = mover.move_horizontal(&world, Vec3::ZERO, Vec3::new(0.1, 0.0, -0.1), DT);
        assert!(!result.blocked);
        assert!((result.translation.x - 0.1).abs() < 1e-3);
        assert!((result.translation.z + 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_vertical_request_is_ignored() {
        let world = PhysicsWorld::new();
        let mover = CharacterMover::new(&GroundConfig::default());
        let result = mover.move_horizontal(&world, Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0), DT);
        assert_eq!(result.translation, Vec3::ZERO);
        assert!(!result.blocked);
    }

    #[test]
    fn test_wall_blocks() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane(0.0);
        // Tall wall whose face is at x = 1.0
        world.add_box("wall", Vec3::new(1.5, 2.0, 0.0), Vec3::new(0.5, 2.0, 5.0));
        let mover = CharacterMover::new(&GroundConfig::default());

        // Box face sits at x = 0.4; ask to move 2 units into the wall
        let result = mover.move_horizontal(&world, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), DT);
        assert!(result.blocked);
        assert!(result.translation.x < 0.65);
    }

    #[test]
    fn test_low_step_does_not_block() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane(0.0);
        // 0.2 high step, lower than the default step height
        world.add_box("step", Vec3::new(1.5, 0.1, 0.0), Vec3::new(0.5, 0.1, 5.0));
        let mover = CharacterMover::new(&GroundConfig::default());

        let result = mover.move_horizontal(&world, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), DT);
        assert!(!result.blocked);
        assert!((result.translation.x - 2.0).abs() < 1e-3);
    }
}
