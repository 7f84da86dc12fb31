//! Orbit camera, projection and the camera uniform.
//!
//! The camera circles a focal point: pointer drags change yaw and pitch,
//! the scroll wheel changes the orbit distance, and a damped per-frame
//! update smooths the motion out. Only the controller and the resize
//! handler ever mutate camera state.

use cgmath::{EuclideanSpace, Matrix4, Point3, Rad, Vector3, perspective};
use instant::Duration;
use winit::event::{MouseScrollDelta, WindowEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_PITCH_LIMIT: Rad<f32> = Rad(std::f32::consts::FRAC_PI_2 - 0.01);
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 400.0;

/// Orbit camera state: a focal target plus spherical coordinates around it.
#[derive(Clone, Debug)]
pub struct Camera {
    pub target: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub distance: f32,
}

impl Camera {
    pub fn new<T: Into<Point3<f32>>, R: Into<Rad<f32>>>(
        target: T,
        yaw: R,
        pitch: R,
        distance: f32,
    ) -> Self {
        Self {
            target: target.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
            distance,
        }
    }

    /// World position derived from the orbit parameters. Yaw 0 / pitch 0
    /// places the camera on the positive z axis looking at the target.
    pub fn position(&self) -> Point3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        self.target
            + Vector3::new(
                self.distance * cos_pitch * sin_yaw,
                self.distance * sin_pitch,
                self.distance * cos_pitch * cos_yaw,
            )
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position(), self.target, Vector3::unit_y())
    }
}

/// Perspective projection. The aspect ratio is recomputed on every window
/// resize; everything else stays fixed.
#[derive(Clone, Debug)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// The camera data visible to shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position().to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Damped orbit input: drag deltas and scroll accumulate between frames
/// and bleed into the camera a little each update.
#[derive(Debug)]
pub struct OrbitController {
    rotate_horizontal: f32,
    rotate_vertical: f32,
    scroll: f32,
    sensitivity: f32,
    zoom_speed: f32,
    /// Fraction of the pending input applied per second of frame time.
    damping: f32,
}

impl OrbitController {
    pub fn new(sensitivity: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            scroll: 0.0,
            sensitivity,
            zoom_speed,
            damping: 10.0,
        }
    }

    /// Accumulate a pointer drag delta (pixels).
    pub fn handle_mouse(&mut self, mouse_dx: f64, mouse_dy: f64) {
        self.rotate_horizontal += mouse_dx as f32;
        self.rotate_vertical += mouse_dy as f32;
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        if let WindowEvent::MouseWheel { delta, .. } = event {
            self.scroll += match delta {
                MouseScrollDelta::LineDelta(_, lines) => *lines,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
            };
        }
    }

    /// Apply a damped share of the pending input to the camera.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();
        let share = (self.damping * dt).min(1.0);

        camera.yaw -= Rad(self.rotate_horizontal * share * self.sensitivity * 0.005);
        camera.pitch += Rad(self.rotate_vertical * share * self.sensitivity * 0.005);
        camera.distance =
            (camera.distance - self.scroll * share * self.zoom_speed).clamp(MIN_DISTANCE, MAX_DISTANCE);

        self.rotate_horizontal *= 1.0 - share;
        self.rotate_vertical *= 1.0 - share;
        self.scroll *= 1.0 - share;

        if camera.pitch < -SAFE_PITCH_LIMIT {
            camera.pitch = -SAFE_PITCH_LIMIT;
        } else if camera.pitch > SAFE_PITCH_LIMIT {
            camera.pitch = SAFE_PITCH_LIMIT;
        }
    }
}

/// Everything the renderer needs to bind the camera.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    #[test]
    fn resize_recomputes_aspect_every_time() {
        let mut projection = Projection::new(800, 600, Deg(75.0), 0.1, 1000.0);
        // Repeated signals with the same dimensions are idempotent.
        for _ in 0..5 {
            projection.resize(1920, 1080);
            assert_eq!(projection.aspect, 1920.0 / 1080.0);
        }
        projection.resize(640, 480);
        assert_eq!(projection.aspect, 640.0 / 480.0);
    }

    #[test]
    fn default_orbit_sits_on_positive_z() {
        let camera = Camera::new((0.0, 0.0, 0.0), Rad(0.0), Rad(0.0), 2.0);
        let position = camera.position();
        assert!((position.x).abs() < 1e-6);
        assert!((position.y).abs() < 1e-6);
        assert!((position.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped_below_vertical() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), Rad(0.0), Rad(0.0), 2.0);
        let mut controller = OrbitController::new(10.0, 0.4);
        for _ in 0..1000 {
            controller.handle_mouse(0.0, 500.0);
            controller.update(&mut camera, Duration::from_millis(16));
        }
        assert!(camera.pitch <= SAFE_PITCH_LIMIT);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), Rad(0.0), Rad(0.0), 2.0);
        let mut controller = OrbitController::new(10.0, 0.4);
        for _ in 0..1000 {
            controller.scroll = 100.0;
            controller.update(&mut camera, Duration::from_millis(16));
        }
        assert!(camera.distance >= MIN_DISTANCE);
    }
}
