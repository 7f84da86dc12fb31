//! Application event loop.
//!
//! The winit `ApplicationHandler` drives everything: window creation,
//! asynchronous startup, input routing, and the per-frame shadow and main
//! passes. Once running the loop is perpetual; every redraw requests the
//! next one, until the window closes.
//!
//! The temple model loads on a background task while the first frames
//! already render. Completion comes back through the event-loop proxy as an
//! [`AppEvent::TempleLoaded`] and attaches the model to the scene; a failed
//! load is logged and leaves the scene as it is.

use std::{fmt::Debug, iter, sync::Arc};

use instant::Instant;

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    context::Context,
    data_structures::{instance::Instance, model::DrawModel},
    resources,
    scene::{self, Scene, SceneObject, Side, SPIN_STEP},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

const TEMPLE_OBJ: &str = "AncientTemple.obj";
const TEMPLE_TEXTURE: &str = "AncientTemple.png";
/// The temple sits a little below the primitive ring.
const TEMPLE_Y_OFFSET: f32 = -0.5;

const CLEAR_COLOUR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.07,
    a: 1.0,
};

/// GPU context plus the scene, bundled once initialization finishes.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    pub(crate) scene: Scene,
    mouse_pressed: bool,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>) -> Self {
        let ctx = match Context::new(window).await {
            Ok(ctx) => ctx,
            Err(e) => panic!(
                "App initialization failed. Cannot create the main context: {}",
                e
            ),
        };
        let scene = match build_scene(&ctx).await {
            Ok(scene) => scene,
            Err(e) => panic!("App initialization failed. Cannot build the scene: {}", e),
        };
        Self {
            ctx,
            scene,
            mouse_pressed: false,
            is_surface_configured: true,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.is_surface_configured = true;
            self.ctx.resize(width, height);
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Reschedule straight away; the loop never stops on its own.
        self.ctx.window.request_redraw();

        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });

        // Shadow pass: casters only, into the spot light's depth map.
        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.light.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            shadow_pass.set_pipeline(&self.ctx.pipelines.shadow);
            for object in self.scene.objects().iter().filter(|o| o.casts_shadow) {
                shadow_pass.set_vertex_buffer(1, object.instance_buffer.slice(..));
                shadow_pass.draw_model_depth(&object.model, 0..1, &self.ctx.light.shadow_bind_group);
            }
        }

        // Main pass: lit objects, then the skybox.
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOUR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.ctx.pipelines.scene);
            for object in self
                .scene
                .objects()
                .iter()
                .filter(|o| o.side == Side::Front)
            {
                render_pass.set_vertex_buffer(1, object.instance_buffer.slice(..));
                render_pass.draw_model_instanced(
                    &object.model,
                    0..1,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }

            render_pass.set_pipeline(&self.ctx.pipelines.sky);
            for object in self.scene.objects().iter().filter(|o| o.side == Side::Back) {
                render_pass.set_vertex_buffer(1, object.instance_buffer.slice(..));
                render_pass.draw_model_sky(&object.model, 0..1, &self.ctx.camera.bind_group);
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Realize every startup plan. The builders run exactly once, here.
async fn build_scene(ctx: &Context) -> anyhow::Result<Scene> {
    let mut scene = Scene::new();

    let spinner = SceneObject::from_plan(
        scene::spinner_plan(),
        &ctx.device,
        &ctx.queue,
        &ctx.material_layout,
    )
    .await?;
    let handle = scene.attach(spinner);
    scene.set_spinner(handle);

    for plan in scene::ring_plans() {
        let object =
            SceneObject::from_plan(plan, &ctx.device, &ctx.queue, &ctx.material_layout).await?;
        scene.attach(object);
    }
    for plan in scene::skybox_plans() {
        let object =
            SceneObject::from_plan(plan, &ctx.device, &ctx.queue, &ctx.material_layout).await?;
        scene.attach(object);
    }
    let ground = SceneObject::from_plan(
        scene::ground_plan(),
        &ctx.device,
        &ctx.queue,
        &ctx.material_layout,
    )
    .await?;
    scene.attach(ground);

    Ok(scene)
}

pub enum AppEvent {
    /// Startup finished on a wasm background task.
    #[allow(dead_code)]
    Initialized(AppState),
    /// The temple OBJ finished loading, successfully or not.
    TempleLoaded(anyhow::Result<crate::data_structures::model::Model>),
}

impl Debug for AppEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::TempleLoaded(result) => f
                .debug_tuple("TempleLoaded")
                .field(&result.as_ref().map(|_| "Model"))
                .finish(),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<AppEvent>,
    state: Option<AppState>,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<AppEvent>) -> Self {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().unwrap();
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            last_time: Instant::now(),
        }
    }

    /// Kick off the temple load in the background. Device and queue clones
    /// only bump internal refcounts.
    fn spawn_temple_load(&self) {
        let state = match &self.state {
            Some(state) => state,
            None => return,
        };
        let device = state.ctx.device.clone();
        let queue = state.ctx.queue.clone();
        let proxy = self.proxy.clone();

        let load = async move {
            let result =
                resources::load_model_obj(TEMPLE_OBJ, TEMPLE_TEXTURE, &device, &queue).await;
            if proxy.send_event(AppEvent::TempleLoaded(result)).is_err() {
                log::warn!("event loop closed before the temple finished loading");
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        self.async_runtime.spawn(load);
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(load);
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("temple diorama");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let app_state = self.async_runtime.block_on(AppState::new(window));
            self.state = Some(app_state);
            self.spawn_temple_load();
            if let Some(state) = &self.state {
                state.ctx.window.request_redraw();
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let app_state = AppState::new(window).await;
                assert!(proxy.send_event(AppEvent::Initialized(app_state)).is_ok());
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Initialized(state) => {
                // This is the message from our wasm `spawn_local`
                self.state = Some(state);
                let state = self.state.as_mut().unwrap();
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
                self.spawn_temple_load();
            }
            AppEvent::TempleLoaded(Ok(model)) => {
                if let Some(state) = &mut self.state {
                    let mut instance = Instance::new();
                    instance.position.y = TEMPLE_Y_OFFSET;
                    let object = SceneObject::new(
                        &state.ctx.device,
                        "temple",
                        model,
                        instance,
                        Side::Front,
                        true,
                        true,
                    );
                    state.scene.attach(object);
                }
            }
            AppEvent::TempleLoaded(Err(e)) => {
                // The scene stays as it is; the temple is simply absent.
                log::error!("failed to load the temple model: {:#}", e);
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if state.mouse_pressed {
                state.ctx.camera.controller.handle_mouse(dx, dy);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                state.mouse_pressed = button_state == ElementState::Pressed;
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                // Fixed per-frame increment, deliberately not scaled by dt.
                state.scene.spin(SPIN_STEP);

                state
                    .ctx
                    .camera
                    .controller
                    .update(&mut state.ctx.camera.camera, dt);
                state
                    .ctx
                    .camera
                    .uniform
                    .update_view_proj(&state.ctx.camera.camera, &state.ctx.projection);
                state.ctx.queue.write_buffer(
                    &state.ctx.camera.buffer,
                    0,
                    bytemuck::cast_slice(&[state.ctx.camera.uniform]),
                );
                state.scene.write_to_buffers(&state.ctx.queue);

                match state.render() {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<AppEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop);
    event_loop.run_app(&mut app)?;

    Ok(())
}
