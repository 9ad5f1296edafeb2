//! Tread Runtime - frame loop infrastructure
//!
//! Provides the building blocks the controller is ticked with:
//! - `GameClock` - frame time and count, from the wall clock or explicit steps
//! - `InputState` - keyboard tracking with action bindings and a window pointer
//! - `GameEvent` / `EventBus` - typed event queue for controller notifications
//! - `RuntimeSystem` - trait for systems ticked once per frame

mod clock;
mod event;
mod event_bus;
mod input;
mod system;

pub use clock::GameClock;
pub use event::GameEvent;
pub use event_bus::EventBus;
pub use input::{parse_key_code, InputConfig, InputState};
pub use system::RuntimeSystem;
