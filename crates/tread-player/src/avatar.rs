//! The player avatar: camera, locomotion, grounding and animation in one frame

use crate::camera::{CameraRig, CameraView};
use crate::config::ControllerConfig;
use crate::locomotion::{Gait, MoveIntent, ACTION_JUMP};
use serde::Serialize;
use tread_animation::{AnimationLayer, Animator};
use tread_core::{NodeId, Result, Vec3};
use tread_physics::{CharacterMover, GroundEvent, GroundProbe, GroundState, PhysicsWorld};
use tread_runtime::{EventBus, GameEvent, InputState, RuntimeSystem};
use tread_scene::SceneGraph;

pub const AVATAR_NODE: &str = "avatar";

/// Serializable view of the avatar after a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarSnapshot {
    pub position: Vec3,
    pub heading: f32,
    pub grounded: bool,
    pub vertical_velocity: f32,
    pub gait: Gait,
    pub camera_heading: f32,
    pub camera_pitch: f32,
    pub camera: CameraView,
    pub animation: String,
    pub layers: Vec<AnimationLayer>,
}

/// Third-person player controller.
///
/// Owns the avatar node and its camera rig. Each frame runs camera orbit,
/// then locomotion, then grounding, then animation selection, always in that
/// order and always against the same avatar transform.
pub struct Avatar {
    node: NodeId,
    camera: CameraRig,
    config: ControllerConfig,
    physics: PhysicsWorld,
    probe: GroundProbe,
    mover: CharacterMover,
    ground: GroundState,
    animator: Animator,
    events: EventBus,
    spawn: Vec3,
    intent: MoveIntent,
    gait: Gait,
    jump_requested: bool,
    blocked: bool,
}

impl Avatar {
    /// Attach the avatar and camera nodes under the scene root at `spawn`.
    ///
    /// Without a physics world the avatar gets an empty one and will fall
    /// until it reaches the kill height.
    pub fn new(
        scene: &mut SceneGraph,
        config: &ControllerConfig,
        physics: Option<PhysicsWorld>,
        spawn: Vec3,
    ) -> Result<Self> {
        config.validate()?;

        let physics = physics.unwrap_or_else(|| {
            tracing::warn!("avatar created without a physics world; it has no ground to stand on");
            PhysicsWorld::new()
        });

        let node = scene.attach_new_node(scene.root(), AVATAR_NODE)?;
        let camera = CameraRig::attach(scene, node, &config.camera)?;

        let mut avatar = Self {
            node,
            camera,
            probe: GroundProbe::new(&config.ground),
            mover: CharacterMover::new(&config.ground),
            config: config.clone(),
            physics,
            ground: GroundState::default(),
            animator: Animator::new(&config.animation)?,
            events: EventBus::new(),
            spawn,
            intent: MoveIntent::default(),
            gait: Gait::Idle,
            jump_requested: false,
            blocked: false,
        };
        avatar.place(scene, spawn)?;
        Ok(avatar)
    }

    /// Run one full frame: read input, then advance by `dt` seconds
    pub fn update(&mut self, input: &mut InputState, scene: &mut SceneGraph, dt: f64) -> Result<()> {
        self.handle_input(input, scene)?;
        RuntimeSystem::update(self, scene, dt)
    }

    /// Orbit the camera and record what the movement keys ask for.
    ///
    /// A jump press is remembered until the next frame step, which consumes
    /// it whether or not the avatar could jump.
    pub fn handle_input(&mut self, input: &mut InputState, scene: &mut SceneGraph) -> Result<()> {
        self.camera.update(input, scene)?;
        self.intent = MoveIntent::from_input(input);
        if input.is_action_just_pressed(ACTION_JUMP) {
            self.jump_requested = true;
        }
        Ok(())
    }

    /// Put the avatar back at its spawn point with no motion
    pub fn respawn(&mut self, scene: &mut SceneGraph) -> Result<()> {
        self.place(scene, self.spawn)?;
        self.events.push(GameEvent::Respawned {
            position: self.spawn,
        });
        Ok(())
    }

    fn place(&mut self, scene: &mut SceneGraph, mut feet: Vec3) -> Result<()> {
        self.ground.reset();
        self.blocked = false;
        self.jump_requested = false;

        // Start grounded if a surface is close enough to stand on
        if let Some(height) = self.probe.ground_height(&self.physics, feet) {
            if feet.y - height <= self.config.ground.snap_distance {
                feet.y = height;
                self.ground.grounded = true;
            }
        }
        scene.set_pos(self.node, feet)
    }

    fn step(&mut self, scene: &mut SceneGraph, dt: f32) -> Result<()> {
        let mut feet = scene.pos(self.node)?;

        // Locomotion
        let camera_heading = self.camera.heading(scene)?;
        match self.intent.stride(camera_heading, &self.config.movement) {
            Some(stride) => {
                scene.set_h(self.node, stride.heading)?;
                let desired = stride.velocity * dt;
                let moved = self.mover.move_horizontal(&self.physics, feet, desired, dt);
                feet += moved.translation;

                if moved.blocked && !self.blocked {
                    self.events.push(GameEvent::Blocked {
                        requested: desired.length(),
                        moved: moved.translation.length(),
                    });
                }
                self.blocked = moved.blocked;
                self.gait = stride.gait;
            }
            None => {
                self.blocked = false;
                self.gait = Gait::Idle;
            }
        }

        // Grounding
        let jump = std::mem::take(&mut self.jump_requested);
        let probe = self.probe;
        let physics = &self.physics;
        let changes = self.ground.step(
            &self.config.ground,
            &mut feet,
            jump,
            |at, fallen| probe.swept_height(physics, at, fallen),
            dt,
        );
        for change in changes {
            let event = match change {
                GroundEvent::Jumped => GameEvent::Jumped { position: feet },
                GroundEvent::Landed { impact_speed } => GameEvent::Landed {
                    position: feet,
                    impact_speed,
                },
                GroundEvent::LeftGround => GameEvent::LeftGround { position: feet },
            };
            self.events.push(event);
        }

        if feet.y < self.config.ground.kill_height {
            tracing::info!(y = feet.y, "avatar fell out of the level");
            self.respawn(scene)?;
        } else {
            scene.set_pos(self.node, feet)?;
        }

        // Animation
        let state = self.gait.motion_state(self.ground.grounded);
        if let Some(change) = self.animator.request_motion(state)? {
            self.events.push(GameEvent::AnimationChanged {
                from: change.from,
                to: change.to,
            });
        }
        self.animator.advance(dt as f64);

        Ok(())
    }

    // --- Accessors ---

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn position(&self, scene: &SceneGraph) -> Result<Vec3> {
        scene.pos(self.node)
    }

    pub fn heading(&self, scene: &SceneGraph) -> Result<f32> {
        scene.h(self.node)
    }

    pub fn grounded(&self) -> bool {
        self.ground.grounded
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.ground.vertical_velocity
    }

    pub fn gait(&self) -> Gait {
        self.gait
    }

    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn camera_view(&self, scene: &SceneGraph) -> Result<CameraView> {
        self.camera.view(scene)
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn snapshot(&self, scene: &SceneGraph) -> Result<AvatarSnapshot> {
        Ok(AvatarSnapshot {
            position: self.position(scene)?,
            heading: self.heading(scene)?,
            grounded: self.ground.grounded,
            vertical_velocity: self.ground.vertical_velocity,
            gait: self.gait,
            camera_heading: self.camera.heading(scene)?,
            camera_pitch: self.camera.pitch(scene)?,
            camera: self.camera.view(scene)?,
            animation: self.animator.current().to_string(),
            layers: self.animator.layers(),
        })
    }
}

impl RuntimeSystem for Avatar {
    fn initialize(&mut self, scene: &mut SceneGraph) -> Result<()> {
        self.physics.refresh();
        self.place(scene, self.spawn)?;
        tracing::info!(
            spawn = ?self.spawn,
            grounded = self.ground.grounded,
            colliders = self.physics.collider_count(),
            "avatar initialized"
        );
        Ok(())
    }

    /// Advance movement, grounding and animation using the input recorded by
    /// the last `handle_input`
    fn update(&mut self, scene: &mut SceneGraph, dt: f64) -> Result<()> {
        self.step(scene, dt as f32)
    }

    fn shutdown(&mut self) -> Result<()> {
        tracing::info!("avatar shut down");
        Ok(())
    }

    fn name(&self) -> &str {
        "avatar"
    }
}
