//! Render pipeline definitions.
//!
//! - `basic` builds the lit scene pipeline and the shared pipeline helper
//! - `sky` builds the front-culling pipeline for the skybox faces
//! - `shadow` builds the depth-only pipeline for the spot light's shadow map
//! - `light` owns the light rig, its uniform buffer and the shadow map

pub mod basic;
pub mod light;
pub mod shadow;
pub mod sky;

/// All pipelines the renderer cycles through in a frame.
#[derive(Debug)]
pub struct Pipelines {
    pub scene: wgpu::RenderPipeline,
    pub sky: wgpu::RenderPipeline,
    pub shadow: wgpu::RenderPipeline,
}
