//! Simulation kernel: camera pose, movement integration, and the frame step.
//!
//! # Invariants
//! - The frame step is a pure function of (previous state, input frame).
//! - Forward is always re-derived from yaw; pitch and roll stay zero.

pub mod camera;
pub mod state;

pub use camera::{CameraController, CameraPose, Projection};
pub use state::SimulationState;
