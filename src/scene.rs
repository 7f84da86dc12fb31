//! The diorama itself: what is in it and where.
//!
//! Scene content is described twice. [`ObjectPlan`]s are plain data produced
//! by the builder functions below; they are pure and carry no GPU handles.
//! [`SceneObject`]s are the realized form, holding uploaded buffers. The
//! builders run exactly once at startup.

use std::f32::consts::TAU;

use cgmath::{Euler, Rad, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::Instance,
        model::{Material, Model},
        primitive::{self, MeshData},
        texture::Texture,
    },
    resources,
};

/// Which side of a triangle the rasterizer keeps.
///
/// `Back` objects (the skybox faces) go through the sky pipeline, which
/// culls front faces so the box is visible from the inside only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MaterialPlan {
    Solid([f32; 4]),
    Textured(&'static str),
}

/// A scene object before any GPU resource exists for it.
#[derive(Clone, Debug)]
pub struct ObjectPlan {
    pub name: &'static str,
    pub mesh: MeshData,
    pub material: MaterialPlan,
    pub side: Side,
    pub casts_shadow: bool,
    pub receives_shadow: bool,
    pub position: Vector3<f32>,
}

/// How many primitives stand in the circle around the temple.
pub const RING_COUNT: u32 = 21;
/// Radius of that circle.
pub const RING_RADIUS: f32 = 5.0;
/// Per-frame rotation increment of the spinner, on x and y.
pub const SPIN_STEP: f32 = 0.01;

/// The one animated object: a textured tetrahedron floating above the temple.
pub fn spinner_plan() -> ObjectPlan {
    ObjectPlan {
        name: "spinner",
        mesh: primitive::tetrahedron(0.5),
        material: MaterialPlan::Textured("block.png"),
        side: Side::Front,
        casts_shadow: true,
        receives_shadow: true,
        position: Vector3::new(0.0, 4.25, 0.0),
    }
}

/// The circle of primitives: cube, cylinder, icosahedron, repeating.
pub fn ring_plans() -> Vec<ObjectPlan> {
    (0..RING_COUNT)
        .map(|i| {
            let (name, mesh, color) = match i % 3 {
                0 => ("ring cube", primitive::cuboid(1.0, 1.0, 1.0), [1.0, 1.0, 0.0, 1.0]),
                1 => ("ring cylinder", primitive::cylinder(0.25, 1.0, 32), [0.0, 1.0, 1.0, 1.0]),
                _ => ("ring icosahedron", primitive::icosahedron(0.5), [1.0, 0.0, 1.0, 1.0]),
            };
            let angle = TAU * i as f32 / RING_COUNT as f32;
            ObjectPlan {
                name,
                mesh,
                material: MaterialPlan::Solid(color),
                side: Side::Front,
                casts_shadow: true,
                receives_shadow: true,
                position: Vector3::new(RING_RADIUS * angle.sin(), 0.0, RING_RADIUS * angle.cos()),
            }
        })
        .collect()
}

/// The six faces of the 500-unit skybox, one texture each, back side only.
pub fn skybox_plans() -> Vec<ObjectPlan> {
    let textures = [
        "skybox/gloom_ft.jpg",
        "skybox/gloom_bk.jpg",
        "skybox/gloom_up.jpg",
        "skybox/gloom_dn.jpg",
        "skybox/gloom_rt.jpg",
        "skybox/gloom_lf.jpg",
    ];
    textures
        .iter()
        .enumerate()
        .map(|(face, texture)| ObjectPlan {
            name: "skybox face",
            mesh: primitive::box_face(face, 500.0),
            material: MaterialPlan::Textured(texture),
            side: Side::Back,
            casts_shadow: false,
            receives_shadow: false,
            position: Vector3::new(0.0, 0.0, 0.0),
        })
        .collect()
}

/// The ground plane under the temple. Catches shadows, casts none.
pub fn ground_plan() -> ObjectPlan {
    ObjectPlan {
        name: "ground",
        mesh: primitive::plane(60.0, 60.0),
        material: MaterialPlan::Solid([0.35, 0.35, 0.35, 1.0]),
        side: Side::Front,
        casts_shadow: false,
        receives_shadow: true,
        position: Vector3::new(0.0, -0.5, 0.0),
    }
}

/// A realized object: uploaded model plus its single-instance buffer.
#[derive(Debug)]
pub struct SceneObject {
    pub name: String,
    pub model: Model,
    pub instance: Instance,
    pub instance_buffer: wgpu::Buffer,
    pub side: Side,
    pub casts_shadow: bool,
    pub receives_shadow: bool,
    dirty: bool,
}

impl SceneObject {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        model: Model,
        instance: Instance,
        side: Side,
        casts_shadow: bool,
        receives_shadow: bool,
    ) -> Self {
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Instance Buffer")),
            contents: bytemuck::cast_slice(&[instance.to_raw(receives_shadow)]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            name: name.to_string(),
            model,
            instance,
            instance_buffer,
            side,
            casts_shadow,
            receives_shadow,
            dirty: false,
        }
    }

    /// Realize a plan: load or synthesize its material and upload the mesh.
    pub async fn from_plan(
        plan: ObjectPlan,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_layout: &wgpu::BindGroupLayout,
    ) -> anyhow::Result<Self> {
        let (diffuse_texture, color) = match plan.material {
            MaterialPlan::Solid(color) => (Texture::create_white_pixel(device, queue), color),
            MaterialPlan::Textured(file) => (
                resources::texture::load_texture(file, device, queue).await?,
                [1.0, 1.0, 1.0, 1.0],
            ),
        };
        let material = Material::new(device, plan.name, diffuse_texture, color, material_layout);
        let mesh = plan.mesh.upload(device, plan.name, 0);
        let model = Model {
            meshes: vec![mesh],
            materials: vec![material],
        };
        Ok(Self::new(
            device,
            plan.name,
            model,
            Instance::from(plan.position),
            plan.side,
            plan.casts_shadow,
            plan.receives_shadow,
        ))
    }
}

/// Handle returned by [`Scene::attach`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectHandle(usize);

/// Flat list of everything renderable, plus which object spins.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    spinner: Option<ObjectHandle>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Objects stay attached for the lifetime of the scene; there is no
    /// detach.
    pub fn attach(&mut self, object: SceneObject) -> ObjectHandle {
        self.objects.push(object);
        ObjectHandle(self.objects.len() - 1)
    }

    pub fn set_spinner(&mut self, handle: ObjectHandle) {
        self.spinner = Some(handle);
    }

    /// Advance the animated object's rotation by `step` on x and y.
    ///
    /// A no-op while no spinner is registered.
    pub fn spin(&mut self, step: f32) {
        if let Some(ObjectHandle(index)) = self.spinner {
            let object = &mut self.objects[index];
            object.instance.rotation = advance_spin(object.instance.rotation, step);
            object.dirty = true;
        }
    }

    /// Flush transforms changed since the last call to the GPU.
    pub fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        for object in self.objects.iter_mut().filter(|o| o.dirty) {
            let raw = object.instance.to_raw(object.receives_shadow);
            queue.write_buffer(&object.instance_buffer, 0, bytemuck::cast_slice(&[raw]));
            object.dirty = false;
        }
    }
}

/// One spin tick: x and y advance by `step`, kept in [0, 2π).
pub fn advance_spin(rotation: Euler<Rad<f32>>, step: f32) -> Euler<Rad<f32>> {
    Euler::new(
        Rad((rotation.x.0 + step).rem_euclid(TAU)),
        Rad((rotation.y.0 + step).rem_euclid(TAU)),
        rotation.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_has_21_objects_with_repeating_kinds() {
        let plans = ring_plans();
        assert_eq!(plans.len(), 21);
        for (i, plan) in plans.iter().enumerate() {
            let expected = match i % 3 {
                0 => "ring cube",
                1 => "ring cylinder",
                _ => "ring icosahedron",
            };
            assert_eq!(plan.name, expected);
        }
    }

    #[test]
    fn ring_positions_lie_on_the_circle() {
        for (i, plan) in ring_plans().iter().enumerate() {
            let angle = TAU * i as f32 / 21.0;
            assert_eq!(plan.position.x, 5.0 * angle.sin());
            assert_eq!(plan.position.y, 0.0);
            assert_eq!(plan.position.z, 5.0 * angle.cos());
        }
    }

    #[test]
    fn skybox_is_six_back_sided_faces() {
        let plans = skybox_plans();
        assert_eq!(plans.len(), 6);
        for plan in &plans {
            assert_eq!(plan.side, Side::Back);
            assert!(!plan.casts_shadow);
        }
    }

    #[test]
    fn skybox_textures_are_distinct() {
        let plans = skybox_plans();
        for (i, a) in plans.iter().enumerate() {
            for b in plans.iter().skip(i + 1) {
                assert_ne!(a.material, b.material);
            }
        }
    }

    #[test]
    fn spin_accumulates_exactly() {
        let mut rotation = Euler::new(Rad(0.0), Rad(0.0), Rad(0.0));
        for _ in 0..250 {
            rotation = advance_spin(rotation, SPIN_STEP);
        }
        assert!((rotation.x.0 - 2.5).abs() < 1e-4);
        assert!((rotation.y.0 - 2.5).abs() < 1e-4);
        assert_eq!(rotation.z.0, 0.0);
    }

    #[test]
    fn spin_wraps_at_full_turns() {
        let mut rotation = Euler::new(Rad(0.0), Rad(0.0), Rad(0.0));
        rotation = advance_spin(rotation, TAU + 0.25);
        assert!((rotation.x.0 - 0.25).abs() < 1e-5);
    }

    #[test]
    fn spin_without_a_spinner_is_a_no_op() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());
        scene.spin(SPIN_STEP);
        assert_eq!(scene.len(), 0);
    }

    #[test]
    fn spinner_floats_above_the_temple() {
        let plan = spinner_plan();
        assert_eq!(plan.position.y, 4.25);
        assert_eq!(plan.material, MaterialPlan::Textured("block.png"));
    }
}
