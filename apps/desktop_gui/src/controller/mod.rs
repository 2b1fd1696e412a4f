//! Controller layer: backend events, the selection reducer, and command dispatch.

pub mod events;
pub mod orchestration;
pub mod reducer;
