//! The light rig: one point light, one shadow-casting spot light.
//!
//! CPU-side configuration lives in [`PointLight`] and [`SpotLight`]; the
//! packed [`LightsUniform`] is what shaders see. The spot light owns a
//! depth-only shadow map sized by its [`ShadowConfig`].

use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, perspective};
use wgpu::util::DeviceExt;

use crate::{camera::OPENGL_TO_WGPU_MATRIX, data_structures::texture::Texture};

#[derive(Clone, Debug)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Shadow-map parameters of the spot light: texture resolution and the
/// frustum rendered from the light's point of view.
#[derive(Clone, Debug)]
pub struct ShadowConfig {
    pub resolution: u32,
    pub near: f32,
    pub far: f32,
    pub fov: Deg<f32>,
}

#[derive(Clone, Debug)]
pub struct SpotLight {
    pub position: Point3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    /// The point the cone is aimed at.
    pub target: Point3<f32>,
    pub shadow: ShadowConfig,
}

impl SpotLight {
    pub fn direction(&self) -> cgmath::Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// View-projection from the light's point of view, used both to render
    /// the shadow map and to project fragments into it.
    pub fn view_proj(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(self.position, self.target, cgmath::Vector3::unit_y());
        let proj = perspective(self.shadow.fov, 1.0, self.shadow.near, self.shadow.far);
        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}

/// Packed light data, 16-byte aligned for the uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    point_position: [f32; 3],
    point_intensity: f32,
    point_color: [f32; 3],
    _padding: f32,
    spot_position: [f32; 3],
    spot_intensity: f32,
    spot_direction: [f32; 3],
    spot_cutoff_inner: f32,
    spot_color: [f32; 3],
    spot_cutoff_outer: f32,
    light_view_proj: [[f32; 4]; 4],
}

impl LightsUniform {
    pub fn new(point: &PointLight, spot: &SpotLight) -> Self {
        let half_angle = Rad::from(spot.shadow.fov).0 / 2.0;
        Self {
            point_position: point.position.to_vec().into(),
            point_intensity: point.intensity,
            point_color: point.color,
            _padding: 0.0,
            spot_position: spot.position.to_vec().into(),
            spot_intensity: spot.intensity,
            spot_direction: spot.direction().into(),
            // The inner cone is a bit tighter than the shadow frustum so
            // the edge falls off smoothly.
            spot_cutoff_inner: (half_angle * 0.85).cos(),
            spot_cutoff_outer: half_angle.cos(),
            spot_color: spot.color,
            light_view_proj: spot.view_proj().into(),
        }
    }
}

/// Uniform for the shadow pass vertex stage: just the light's matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ShadowPassUniform {
    view_proj: [[f32; 4]; 4],
}

#[derive(Debug)]
pub struct LightResources {
    pub point: PointLight,
    pub spot: SpotLight,
    pub uniform: LightsUniform,
    pub buffer: wgpu::Buffer,
    pub shadow_map: Texture,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub shadow_bind_group: wgpu::BindGroup,
    pub shadow_bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, point: PointLight, spot: SpotLight) -> Self {
        let uniform = LightsUniform::new(&point, &spot);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let resolution = spot.shadow.resolution;
        let shadow_map =
            Texture::create_depth_texture(device, [resolution, resolution], "shadow_map");

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Depth,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
            label: Some("lights_bind_group_layout"),
        });

        let shadow_sampler = shadow_map
            .sampler
            .clone()
            .expect("depth textures always carry a comparison sampler");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
            label: Some("lights_bind_group"),
        });

        let shadow_uniform = ShadowPassUniform {
            view_proj: spot.view_proj().into(),
        };
        let shadow_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shadow Pass Buffer"),
            contents: bytemuck::cast_slice(&[shadow_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let shadow_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("shadow_pass_bind_group_layout"),
            });
        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &shadow_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: shadow_buffer.as_entire_binding(),
            }],
            label: Some("shadow_pass_bind_group"),
        });

        Self {
            point,
            spot,
            uniform,
            buffer,
            shadow_map,
            bind_group,
            bind_group_layout,
            shadow_bind_group,
            shadow_bind_group_layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> (PointLight, SpotLight) {
        let point = PointLight {
            position: Point3::new(8.0, 10.0, 5.0),
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
        };
        let spot = SpotLight {
            position: Point3::new(-6.0, 12.0, 6.0),
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            target: Point3::new(0.0, 0.0, 0.0),
            shadow: ShadowConfig {
                resolution: 1024,
                near: 0.5,
                far: 60.0,
                fov: Deg(30.0),
            },
        };
        (point, spot)
    }

    #[test]
    fn spot_direction_is_normalized_and_aims_at_target() {
        let (_, spot) = rig();
        let dir = spot.direction();
        assert!((dir.magnitude() - 1.0).abs() < 1e-6);
        // Pointing down towards the origin from above.
        assert!(dir.y < 0.0);
    }

    #[test]
    fn cutoffs_are_cosines_with_inner_tighter_than_outer() {
        let (point, spot) = rig();
        let uniform = LightsUniform::new(&point, &spot);
        assert!(uniform.spot_cutoff_inner > uniform.spot_cutoff_outer);
        assert!(uniform.spot_cutoff_outer > 0.0 && uniform.spot_cutoff_outer < 1.0);
    }
}
