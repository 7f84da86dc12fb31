//! Engine data structures: models, textures, primitives and instances.
//!
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `primitive` generates CPU mesh data for the diorama's basic shapes
//! - `instance` holds per-object transformation data

pub mod instance;
pub mod model;
pub mod primitive;
pub mod texture;
