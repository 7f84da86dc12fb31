//! templeyard
//!
//! A small cross-platform (native and WASM) demo scene: an ancient temple
//! loaded from OBJ, a ring of colored primitives, a spinning textured
//! tetrahedron, a six-faced skybox, a point light and a shadow-casting spot
//! light, all under an orbit camera.
//!
//! High-level modules
//! - `app`: the winit event loop, redraw/resize handling and async startup
//! - `camera`: orbit camera, projection and uniforms for view/projection
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: meshes, instances, textures and procedural primitives
//! - `pipelines`: the lit scene, sky and shadow pipelines plus the light rig
//! - `resources`: helpers to load textures/models and create GPU resources
//! - `scene`: what is in the diorama and where
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod pipelines;
pub mod resources;
pub mod scene;

pub use app::run;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    if let Err(e) = run() {
        log::error!("fatal: {:#}", e);
    }
}
