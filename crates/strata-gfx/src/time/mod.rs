//! Frame timing.
//!
//! One `FrameClock` per render loop; `tick()` once per presented frame. The
//! resulting `FrameTime` is passed to whatever animates, so nothing reads a
//! global start time.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
