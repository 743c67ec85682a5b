//! Shared types for the roomview scene viewer.
//!
//! # Invariants
//! - Every vertex of a mesh carries the same attribute set.
//! - A mesh is immutable once loaded.

mod types;

pub use types::{Mesh, Triangle, Vertex};
