// Pastel orrery: a slowly turning solar system drawn behind a panel of
// portfolio project cards.
//
//   orrery.toml → OrreryConfig → State { Renderer, SceneContext, Overlay }
//   RedrawRequested → scene.tick → draw_scene → overlay → present

mod config;
mod engine;
mod error;
mod works;

use chrono::Datelike;
use log::{debug, error, info, warn};
use std::sync::Arc;
use winit::{
    event::{ElementState, Event as WinitEvent, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use config::OrreryConfig;
use engine::{
    ContainerSize, FrameClock, FrameStats, InputState, Overlay, OverlayContent, Renderer,
    SceneContext, StatsAccumulator,
};
use error::OrreryError;
use works::{CardGrid, WORKS, footer_text, render_cards};

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct State {
    window: Arc<Window>,
    renderer: Renderer,
    scene: Option<SceneContext>,
    overlay: Overlay,
    input: InputState,
    clock: FrameClock,

    works: Option<CardGrid>,
    footer: Option<String>,

    // Stats
    stats: StatsAccumulator,
    summary: (u32, f32, f32, f32),
    draw_calls: u32,
}

impl State {
    async fn new(window: Arc<Window>, config: &OrreryConfig) -> Result<Self, OrreryError> {
        let size = window.inner_size();
        let container = ContainerSize::new(size.width, size.height);

        let mut renderer = Renderer::new(window.clone(), container.effective(), config.scene.msaa).await?;

        // The window stands in for the display container; a disabled scene
        // behaves like a page without one.
        let mut scene = SceneContext::bootstrap(
            config.scene.enabled.then_some(container),
            config.scene.damping_factor,
        );
        match scene.as_mut() {
            Some(scene) => {
                let mut rng = rand::thread_rng();
                scene.populate(&mut renderer, &mut rng, config.scene.star_count as usize);
            }
            None => info!("scene disabled, showing cards only"),
        }

        let mut works = config.works.enabled.then(CardGrid::new);
        let cards = render_cards(WORKS, works.as_mut());
        info!("rendered {cards} project cards");

        if let (Some(grid), Some(path)) = (&works, &config.works.export_html) {
            if let Err(e) = grid.export(path) {
                warn!("could not export card markup to {}: {e}", path.display());
            }
        }

        let footer = config
            .footer
            .show_year
            .then(|| footer_text(chrono::Local::now().year(), &config.footer.owner));

        let card_font = config.works.card_font.as_deref().and_then(|path| {
            std::fs::read(path)
                .inspect_err(|e| warn!("could not read card font {}: {e}", path.display()))
                .ok()
        });

        let mut overlay = Overlay::new(&window, &renderer.device, renderer.format(), card_font);
        overlay.works_visible = config.works.visible;

        Ok(Self {
            window,
            renderer,
            scene,
            overlay,
            input: InputState::new(),
            clock: FrameClock::new(),
            works,
            footer,
            stats: StatsAccumulator::new(),
            summary: (0, 0.0, 0.0, 0.0),
            draw_calls: 0,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        let container = ContainerSize::new(new_size.width, new_size.height);
        let viewport = match self.scene.as_mut() {
            Some(scene) => scene.resize(container),
            None => container.effective(),
        };
        self.renderer.resize(viewport);
    }

    fn update(&mut self) {
        let dt = self.clock.delta();

        if let Some(scene) = self.scene.as_mut() {
            scene.tick(&self.input, dt);
        }
        self.input.end_frame();

        if let Some(summary) = self.stats.record(dt) {
            self.summary = summary;
            let (fps, avg, _, _) = summary;
            debug!(
                "FPS: {} | Frame: {:.2} ms | Bodies: {} | Draw calls: {}",
                fps,
                avg,
                self.scene.as_ref().map_or(0, SceneContext::body_count),
                self.draw_calls
            );
        }
    }

    fn frame_stats(&self) -> FrameStats {
        let (fps, avg, min, max) = self.summary;
        FrameStats {
            fps,
            frame_time_avg_ms: avg,
            frame_time_min_ms: min,
            frame_time_max_ms: max,
            body_count: self.scene.as_ref().map_or(0, SceneContext::body_count),
            draw_calls: self.draw_calls,
            resolution: self.renderer.size(),
            camera_distance: self.scene.as_ref().map_or(0.0, |s| s.controller.distance()),
            elapsed_s: self.scene.as_ref().map_or(0.0, |s| s.animation.elapsed()),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let mut frame = self.renderer.begin_frame()?;
        self.draw_calls = self.renderer.draw_scene(&mut frame, self.scene.as_mut());

        let stats = self.overlay.stats_visible.then(|| self.frame_stats());
        let (width, height) = self.renderer.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        self.overlay.render(
            &self.renderer.device,
            &self.renderer.queue,
            &mut frame.encoder,
            &self.window,
            &frame.view,
            &screen_descriptor,
            OverlayContent {
                stats: stats.as_ref(),
                works: self.works.as_ref(),
                footer: self.footer.as_deref(),
            },
        );

        self.renderer.finish(frame);
        Ok(())
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), OrreryError> {
    let config = config::load_default()?;

    let event_loop = EventLoop::new()?;

    let window_attributes = Window::default_attributes()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.window.width, config.window.height));

    let window = Arc::new(event_loop.create_window(window_attributes)?);

    let mut state = pollster::block_on(State::new(window.clone(), &config))?;

    event_loop.run(move |event, control_flow| {
        match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                let response = state.overlay.handle_window_event(&window, event);

                match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::Escape),
                                ..
                            },
                        ..
                    } => control_flow.exit(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(code),
                                repeat: false,
                                ..
                            },
                        ..
                    } if !response.consumed => match code {
                        KeyCode::F3 => state.overlay.toggle_stats(),
                        KeyCode::KeyW => state.overlay.toggle_works(),
                        _ => {}
                    },
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        state.update();
                        match state.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                state.renderer.reconfigure()
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                error!("out of GPU memory");
                                control_flow.exit()
                            }
                            Err(e) => warn!("{:?}", e),
                        }
                    }
                    other if !response.consumed => state.input.process_event(other),
                    _ => {}
                }
            }
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
