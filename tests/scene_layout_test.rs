//! Layout checks for the startup scene, exercised through the public API.
//! Everything here is CPU-side; no GPU device is created.

use std::f32::consts::TAU;

use templeyard::scene::{self, MaterialPlan, Side, RING_COUNT, RING_RADIUS, SPIN_STEP};

#[test]
fn startup_plans_add_up_to_twenty_nine_objects() {
    let total = 1 // spinner
        + scene::ring_plans().len()
        + scene::skybox_plans().len()
        + 1; // ground
    assert_eq!(total, 29);
}

#[test]
fn ring_kind_and_position_follow_the_index() {
    let plans = scene::ring_plans();
    assert_eq!(plans.len(), RING_COUNT as usize);

    let expected_colors = [
        [1.0, 1.0, 0.0, 1.0], // cube: yellow
        [0.0, 1.0, 1.0, 1.0], // cylinder: cyan
        [1.0, 0.0, 1.0, 1.0], // icosahedron: magenta
    ];
    for (i, plan) in plans.iter().enumerate() {
        assert_eq!(
            plan.material,
            MaterialPlan::Solid(expected_colors[i % 3]),
            "object {i}"
        );

        let angle = TAU * i as f32 / RING_COUNT as f32;
        assert_eq!(plan.position.x, RING_RADIUS * angle.sin());
        assert_eq!(plan.position.y, 0.0);
        assert_eq!(plan.position.z, RING_RADIUS * angle.cos());
    }
}

#[test]
fn ring_shapes_have_the_expected_triangle_counts() {
    let plans = scene::ring_plans();
    // Cube: 12, cylinder with 32 segments: 128, icosahedron: 20.
    assert_eq!(plans[0].mesh.triangle_count(), 12);
    assert_eq!(plans[1].mesh.triangle_count(), 128);
    assert_eq!(plans[2].mesh.triangle_count(), 20);
}

#[test]
fn skybox_faces_render_back_side_only() {
    let plans = scene::skybox_plans();
    assert_eq!(plans.len(), 6);
    for plan in &plans {
        assert_eq!(plan.side, Side::Back);
        assert!(!plan.casts_shadow);
        assert!(!plan.receives_shadow);
        assert!(matches!(plan.material, MaterialPlan::Textured(_)));
    }
}

#[test]
fn spinner_rotation_is_frame_counted() {
    use cgmath::{Euler, Rad};

    let mut rotation = Euler::new(Rad(0.0_f32), Rad(0.0), Rad(0.0));
    let frames = 700u32; // just past one full turn
    for _ in 0..frames {
        rotation = scene::advance_spin(rotation, SPIN_STEP);
    }
    let expected = (frames as f32 * SPIN_STEP).rem_euclid(TAU);
    assert!((rotation.x.0 - expected).abs() < 1e-3);
    assert!((rotation.y.0 - expected).abs() < 1e-3);
}

#[test]
fn empty_scene_stays_empty_without_attach() {
    // A failed background load never calls attach, so the count is stable.
    let mut scene = scene::Scene::new();
    assert_eq!(scene.len(), 0);
    scene.spin(SPIN_STEP);
    assert_eq!(scene.len(), 0);
}
