//! winit application: window lifecycle, input routing and the per-frame
//! GUI -> commands -> scene -> GPU sequence.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use corelib::frame::FrameDriver;
use corelib::input::{Command, CommandQueue};
use corelib::state::SceneState;
use renderer::uniforms::FrameRecorder;
use renderer::{GpuState, Overlay};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::RunConfig;
use crate::gui;
use crate::input::{DragTracker, key_command};
use crate::meshes;

const TITLE: &str = "Armature";

pub struct App {
    config: RunConfig,
    state: AppState,
    failure: Option<anyhow::Error>,
}

enum AppState {
    Pending,
    Running(Box<Running>),
}

struct Running {
    window: Arc<Window>,
    gpu: GpuState,
    egui_state: egui_winit::State,
    scene: SceneState,
    driver: FrameDriver,
    recorder: FrameRecorder,
    queue: CommandQueue,
    drag: DragTracker,
    fps: FpsCounter,
}

impl App {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            state: AppState::Pending,
            failure: None,
        }
    }

    /// The error that stopped the loop, if any.
    pub fn finish(self) -> Result<()> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let attrs = WindowAttributes::default()
            .with_title(TITLE)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| anyhow!("Failed to create window: {e}"))?,
        );
        let PhysicalSize { width, height } = window.inner_size();
        log::info!("Window created: {width}x{height}");

        let scene_meshes = meshes::scene_meshes(self.config.bunny.as_deref());
        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            self.config.backends,
            &scene_meshes,
        ))?;

        let egui_state = egui_winit::State::new(
            egui::Context::default(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let scene = SceneState::new(self.config.scene);
        let driver = FrameDriver::new(&self.config.scene);
        let mut queue = CommandQueue::new();
        queue.push(Command::Resize { width, height });

        window.request_redraw();
        Ok(Running {
            window,
            gpu,
            egui_state,
            scene,
            driver,
            recorder: FrameRecorder::new(),
            queue,
            drag: DragTracker::default(),
            fps: FpsCounter::new(Instant::now()),
        })
    }
}

impl Running {
    fn redraw(&mut self, show_fps: bool) -> Result<()> {
        let Running {
            window,
            gpu,
            egui_state,
            scene,
            driver,
            recorder,
            queue,
            fps,
            ..
        } = self;

        let ctx = egui_state.egui_ctx().clone();
        let raw_input = egui_state.take_egui_input(window);
        let output = ctx.run(raw_input, |ctx| gui::parameter_panel(ctx, scene, queue));
        egui_state.handle_platform_output(window, output.platform_output);
        let paint_jobs = ctx.tessellate(output.shapes, output.pixels_per_point);

        let applied = scene.drain(queue);
        if applied > 0 {
            log::trace!("applied {applied} commands");
        }

        driver.render(scene, recorder)?;

        let overlay = Overlay {
            paint_jobs,
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        };
        match gpu.render(recorder, overlay) {
            Ok(()) => {}
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::info!("Surface {err:?}; reconfiguring");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout; frame skipped"),
            Err(err) => return Err(anyhow!("Surface error: {err}")),
        }

        if let Some(rate) = fps.tick(Instant::now()) {
            if show_fps {
                window.set_title(&format!("{TITLE} - {rate:.0} FPS"));
            }
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let AppState::Pending = self.state {
            match self.start(event_loop) {
                Ok(running) => self.state = AppState::Running(Box::new(running)),
                Err(err) => self.fail(event_loop, err),
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running(running) = &mut self.state else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !response.consumed =>
            {
                if event.logical_key == Key::Named(NamedKey::Escape) {
                    log::info!("Escape pressed. Exiting event loop.");
                    event_loop.exit();
                } else if let Some(command) = key_command(&event.logical_key) {
                    running.queue.push(command);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if !response.consumed || state == ElementState::Released {
                    running.drag.button(button, state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (_, height) = running.gpu.size();
                if let Some(command) = running.drag.moved(position.x, position.y, height) {
                    if !response.consumed {
                        running.queue.push(command);
                    }
                }
            }
            WindowEvent::CursorLeft { .. } => running.drag.left(),
            WindowEvent::Resized(size) => {
                log::info!("Resized: {}x{}", size.width, size.height);
                running.gpu.resize(size.width, size.height);
                let (width, height) = running.gpu.size();
                running.queue.push(Command::Resize { width, height });
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::info!("Scale factor changed: {scale_factor:.3}");
            }
            WindowEvent::RedrawRequested => {
                let result = running.redraw(self.config.show_fps);
                running.window.request_redraw();
                if let Err(err) = result {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }
}

/// Frames per second, sampled once a second.
#[derive(Debug)]
struct FpsCounter {
    since: Instant,
    frames: u32,
}

impl FpsCounter {
    const PERIOD: Duration = Duration::from_secs(1);

    fn new(now: Instant) -> Self {
        Self {
            since: now,
            frames: 0,
        }
    }

    fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.since);
        if elapsed < Self::PERIOD {
            return None;
        }
        let rate = self.frames as f32 / elapsed.as_secs_f32();
        self.since = now;
        self.frames = 0;
        Some(rate)
    }
}
