//! Ground contact, jumping and falling
//!
//! Vertical motion is driven entirely by a downward ray: the box mover only
//! handles horizontal collisions. Each frame the state either keeps the feet
//! glued to the surface under them, integrates gravity while airborne, or
//! lands when the feet reach the surface again.

use crate::world::PhysicsWorld;
use serde::{Deserialize, Serialize};
use tread_core::{Result, TreadError, Vec3};

/// Tuning for grounding, jumping and the collision box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// How far above the feet the ground ray starts
    pub ray_height: f32,
    /// How far below the feet the ray still finds ground
    pub probe_depth: f32,
    /// Largest drop the feet follow while staying grounded (slopes, steps down)
    pub snap_distance: f32,
    /// Initial upward speed of a jump
    pub jump_speed: f32,
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Fastest the avatar can fall
    pub terminal_speed: f32,
    /// Obstacles lower than this are stepped onto instead of blocking
    pub step_height: f32,
    /// Half extents of the collision box
    pub body_half_extents: [f32; 3],
    /// Below this height the avatar is put back at the spawn point
    pub kill_height: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            ray_height: 2.0,
            probe_depth: 0.5,
            snap_distance: 0.35,
            jump_speed: 8.0,
            gravity: 20.0,
            terminal_speed: 50.0,
            step_height: 0.4,
            body_half_extents: [0.4, 0.9, 0.4],
            kill_height: -50.0,
        }
    }
}

impl GroundConfig {
    pub fn validate(&self) -> Result<()> {
        TreadError::check_range("ground.ray_height", self.ray_height as f64, 0.01, 100.0)?;
        TreadError::check_range("ground.probe_depth", self.probe_depth as f64, 0.0, 100.0)?;
        TreadError::check_range(
            "ground.snap_distance",
            self.snap_distance as f64,
            0.0,
            self.probe_depth as f64,
        )?;
        TreadError::check_range("ground.jump_speed", self.jump_speed as f64, 0.0, 1000.0)?;
        TreadError::check_range("ground.gravity", self.gravity as f64, 0.001, 1000.0)?;
        TreadError::check_range(
            "ground.terminal_speed",
            self.terminal_speed as f64,
            0.001,
            10_000.0,
        )?;
        TreadError::check_range(
            "ground.step_height",
            self.step_height as f64,
            0.0,
            self.ray_height as f64,
        )?;
        for (i, half) in self.body_half_extents.iter().enumerate() {
            TreadError::check_range(
                &format!("ground.body_half_extents[{i}]"),
                *half as f64,
                0.01,
                100.0,
            )?;
        }
        Ok(())
    }
}

/// Changes in ground contact reported by [`GroundState::step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundEvent {
    Jumped,
    Landed { impact_speed: f32 },
    LeftGround,
}

/// Downward ray anchored above the avatar's feet
#[derive(Debug, Clone, Copy)]
pub struct GroundProbe {
    ray_height: f32,
    max_distance: f32,
}

impl GroundProbe {
    pub fn new(config: &GroundConfig) -> Self {
        Self {
            ray_height: config.ray_height,
            max_distance: config.ray_height + config.probe_depth,
        }
    }

    /// Height of the ground under `feet`, if any is within reach
    pub fn ground_height(&self, world: &PhysicsWorld, feet: Vec3) -> Option<f32> {
        self.swept_height(world, feet, 0.0)
    }

    /// Like [`ground_height`](Self::ground_height), with the ray lengthened
    /// to also cover the `fallen` distance the feet dropped this frame.
    pub fn swept_height(&self, world: &PhysicsWorld, feet: Vec3, fallen: f32) -> Option<f32> {
        let fallen = fallen.max(0.0);
        let origin = Vec3::new(feet.x, feet.y + fallen + self.ray_height, feet.z);
        world
            .cast_ray_down(origin, fallen + self.max_distance)
            .map(|hit| hit.height)
    }
}

/// Vertical motion state of the avatar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundState {
    pub grounded: bool,
    pub vertical_velocity: f32,
}

impl Default for GroundState {
    fn default() -> Self {
        Self {
            grounded: false,
            vertical_velocity: 0.0,
        }
    }
}

impl GroundState {
    /// Forget any motion, e.g. after a respawn
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance vertical motion by `dt` seconds and return what changed.
    ///
    /// `ground` maps a feet position and the distance fallen this frame to
    /// the ground height under it (see [`GroundProbe::swept_height`]). It is
    /// queried once, after gravity has been applied, so a fast fall cannot
    /// skip over a floor between two frames.
    pub fn step(
        &mut self,
        config: &GroundConfig,
        feet: &mut Vec3,
        jump_requested: bool,
        ground: impl Fn(Vec3, f32) -> Option<f32>,
        dt: f32,
    ) -> Vec<GroundEvent> {
        let mut events = Vec::new();
        let start_y = feet.y;

        if self.grounded && jump_requested {
            self.grounded = false;
            self.vertical_velocity = config.jump_speed;
            events.push(GroundEvent::Jumped);
        }

        if !self.grounded {
            self.vertical_velocity =
                (self.vertical_velocity - config.gravity * dt).max(-config.terminal_speed);
            feet.y += self.vertical_velocity * dt;
        }

        let ground_height = ground(*feet, start_y - feet.y);

        if self.grounded {
            match ground_height {
                Some(height) if feet.y - height <= config.snap_distance => {
                    feet.y = height;
                }
                _ => {
                    self.grounded = false;
                    self.vertical_velocity = 0.0;
                    events.push(GroundEvent::LeftGround);
                }
            }
        } else if self.vertical_velocity <= 0.0 {
            // Only surfaces the feet crossed count; anything higher is overhead
            if let Some(height) = ground_height {
                if feet.y <= height && height <= start_y + config.step_height {
                    let impact_speed = -self.vertical_velocity;
                    feet.y = height;
                    self.grounded = true;
                    self.vertical_velocity = 0.0;
                    events.push(GroundEvent::Landed { impact_speed });
                }
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn flat(height: f32) -> impl Fn(Vec3, f32) -> Option<f32> {
        move |_, _| Some(height)
    }

    fn grounded() -> GroundState {
        GroundState {
            grounded: true,
            vertical_velocity: 0.0,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        GroundConfig::default().validate().unwrap();
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GroundConfig {
            gravity: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GroundConfig {
            snap_distance: 1.0,
            probe_depth: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_falls_and_lands() {
        let config = GroundConfig::default();
        let mut state = GroundState::default();
        let mut feet = Vec3::new(0.0, 3.0, 0.0);

        let mut landed = None;
        for _ in 0..600 {
            for event in state.step(&config, &mut feet, false, flat(0.0), DT) {
                if let GroundEvent::Landed { impact_speed } = event {
                    landed = Some(impact_speed);
                }
            }
            if state.grounded {
                break;
            }
        }

        assert!(state.grounded);
        assert_eq!(feet.y, 0.0);
        assert_eq!(state.vertical_velocity, 0.0);
        assert!(landed.unwrap() > 0.0);
    }

    #[test]
    fn test_jump_rises_and_lands() {
        let config = GroundConfig::default();
        let mut state = grounded();
        let mut feet = Vec3::ZERO;

        let events = state.step(&config, &mut feet, true, flat(0.0), DT);
        assert_eq!(events, vec![GroundEvent::Jumped]);
        assert!(!state.grounded);
        assert!(feet.y > 0.0);

        let mut peak = feet.y;
        let mut frames = 0;
        while !state.grounded && frames < 600 {
            state.step(&config, &mut feet, false, flat(0.0), DT);
            peak = peak.max(feet.y);
            frames += 1;
        }

        assert!(state.grounded);
        assert_eq!(feet.y, 0.0);
        // v^2 / 2g with a little integration error
        let expected = config.jump_speed * config.jump_speed / (2.0 * config.gravity);
        assert!((peak - expected).abs() < 0.2, "peak {peak}, expected {expected}");
    }

    #[test]
    fn test_no_double_jump() {
        let config = GroundConfig::default();
        let mut state = grounded();
        let mut feet = Vec3::ZERO;

        state.step(&config, &mut feet, true, flat(0.0), DT);
        let velocity = state.vertical_velocity;
        let events = state.step(&config, &mut feet, true, flat(0.0), DT);
        assert!(events.is_empty());
        assert!(state.vertical_velocity < velocity);
    }

    #[test]
    fn test_follows_step_up_and_small_drop() {
        let config = GroundConfig::default();
        let mut state = grounded();
        let mut feet = Vec3::ZERO;

        state.step(&config, &mut feet, false, flat(0.3), DT);
        assert!(state.grounded);
        assert_eq!(feet.y, 0.3);

        state.step(&config, &mut feet, false, flat(0.1), DT);
        assert!(state.grounded);
        assert_eq!(feet.y, 0.1);
    }

    #[test]
    fn test_walks_off_ledge() {
        let config = GroundConfig::default();
        let mut state = grounded();
        let mut feet = Vec3::new(0.0, 2.0, 0.0);

        // Ground far below the snap distance
        let events = state.step(&config, &mut feet, false, flat(0.0), DT);
        assert_eq!(events, vec![GroundEvent::LeftGround]);
        assert!(!state.grounded);
        assert_eq!(feet.y, 2.0);

        // Nothing below at all also leaves the ground
        let mut state = grounded();
        let events = state.step(&config, &mut feet, false, |_, _| None, DT);
        assert_eq!(events, vec![GroundEvent::LeftGround]);
    }

    #[test]
    fn test_terminal_speed() {
        let config = GroundConfig {
            terminal_speed: 5.0,
            ..Default::default()
        };
        let mut state = GroundState::default();
        let mut feet = Vec3::new(0.0, 1000.0, 0.0);
        for _ in 0..600 {
            state.step(&config, &mut feet, false, |_, _| None, DT);
        }
        assert_eq!(state.vertical_velocity, -5.0);
    }

    #[test]
    fn test_rising_does_not_land_on_ledge() {
        let config = GroundConfig::default();
        let mut state = GroundState {
            grounded: false,
            vertical_velocity: 5.0,
        };
        let mut feet = Vec3::ZERO;
        // Ground above the feet while still moving up
        let events = state.step(&config, &mut feet, false, flat(0.5), DT);
        assert!(events.is_empty());
        assert!(!state.grounded);
    }

    #[test]
    fn test_fast_fall_does_not_skip_the_floor() {
        let config = GroundConfig::default();
        let probe_depth = config.probe_depth;
        let ray_height = config.ray_height;
        // A single floor at 0, visible only inside the probe's reach
        let floor = move |feet: Vec3, fallen: f32| {
            let top = feet.y + fallen.max(0.0) + ray_height;
            let bottom = feet.y - probe_depth;
            (bottom <= 0.0 && 0.0 <= top).then_some(0.0)
        };

        let mut state = GroundState::default();
        let mut feet = Vec3::new(0.0, 40.0, 0.0);
        for _ in 0..40 {
            state.step(&config, &mut feet, false, floor, 0.25);
            if state.grounded {
                break;
            }
        }

        assert!(state.grounded);
        assert_eq!(feet.y, 0.0);
    }

    #[test]
    fn test_does_not_land_on_surface_overhead() {
        let config = GroundConfig::default();
        let mut state = GroundState {
            grounded: false,
            vertical_velocity: -1.0,
        };
        let mut feet = Vec3::new(0.0, 1.0, 0.0);
        // Something reports a surface well above where the feet started
        let events = state.step(&config, &mut feet, false, flat(3.0), DT);
        assert!(events.is_empty());
        assert!(!state.grounded);
        assert!(feet.y < 1.0);
    }
}
