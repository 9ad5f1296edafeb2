//! Tread Physics - Rapier 3D integration
//!
//! Provides the collision side of the controller:
//! - `PhysicsWorld` - static level colliders and the Rapier query pipeline
//! - `LevelDesc` - serializable level geometry (boxes, floor, spawn point)
//! - `GroundProbe` / `GroundState` - downward ray grounding, jumping and falling
//! - `CharacterMover` - box-shaped horizontal motion that slides along walls

pub mod character;
pub mod ground;
pub mod level;
pub mod world;

pub use character::{CharacterMover, MoveResult};
pub use ground::{GroundConfig, GroundEvent, GroundProbe, GroundState};
pub use level::{BoxDesc, LevelDesc};
pub use world::{PhysicsWorld, RayHit};
