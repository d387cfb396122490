//! Time subsystem.
//!
//! Frame timing for the render loop, decoupled from the windowing runtime:
//! - one `FrameClock` per render loop; `tick()` once per presented frame
//! - `FrameStats` accumulates throughput and reports once per window of time

mod frame_clock;
mod stats;

pub use frame_clock::{FrameClock, FrameTime};
pub use stats::{FrameReport, FrameStats};
