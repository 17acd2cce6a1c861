//! Input subsystem.
//!
//! Public API is platform-agnostic; `platform` holds the translators from
//! windowing events.

pub mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{ButtonState, InputEvent, MouseButton, PointerButtonEvent, WheelDelta};
