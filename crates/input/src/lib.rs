//! Movement input: four discrete signals sampled once per frame.
//!
//! # Invariants
//! - Each frame sees only the instantaneous key state; nothing is buffered.
//! - Signals are independent; any combination may be active together.

pub mod action;

pub use action::{Action, InputFrame, InputScript, ScriptError};
