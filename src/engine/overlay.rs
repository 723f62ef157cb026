use egui::epaint::Shadow;

use crate::works::{CardBlock, CardGrid, ClickTarget, Navigator, PLACEHOLDER_THUMB};

pub struct FrameStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub frame_time_min_ms: f32,
    pub frame_time_max_ms: f32,
    pub body_count: usize,
    pub draw_calls: u32,
    pub resolution: (u32, u32),
    pub camera_distance: f32,
    pub elapsed_s: f32,
}

/// Collects frame times and publishes a [`FrameStats`] snapshot once
/// per second.
pub struct StatsAccumulator {
    frames: u32,
    window_s: f32,
    sum_ms: f32,
    min_ms: f32,
    max_ms: f32,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self { frames: 0, window_s: 0.0, sum_ms: 0.0, min_ms: f32::MAX, max_ms: 0.0 }
    }

    /// Record one frame of `dt` seconds. Returns `(fps, avg, min, max)` in
    /// milliseconds when a full second has been collected.
    pub fn record(&mut self, dt: f32) -> Option<(u32, f32, f32, f32)> {
        let ms = dt * 1000.0;
        self.frames += 1;
        self.window_s += dt;
        self.sum_ms += ms;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);

        if self.window_s < 1.0 {
            return None;
        }
        let summary = (self.frames, self.sum_ms / self.frames as f32, self.min_ms, self.max_ms);
        *self = Self::new();
        Some(summary)
    }
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens links through egui's platform output, which egui-winit hands to
/// the system browser as a new tab.
pub struct EguiNavigator<'a> {
    ctx: &'a egui::Context,
}

impl Navigator for EguiNavigator<'_> {
    fn open_in_new_context(&mut self, url: &str) {
        log::info!("opening {url}");
        self.ctx.open_url(egui::OpenUrl::new_tab(url));
    }
}

/// What to draw this frame. `None` hides a layer.
pub struct OverlayContent<'a> {
    pub stats: Option<&'a FrameStats>,
    pub works: Option<&'a CardGrid>,
    pub footer: Option<&'a str>,
}

pub struct Overlay {
    pub stats_visible: bool,
    pub works_visible: bool,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

const PASTEL_ACCENT: egui::Color32 = egui::Color32::from_rgb(0xc7, 0xd2, 0xfe);
const MUTED: egui::Color32 = egui::Color32::from_rgb(0x9f, 0xb3, 0xd1);

impl Overlay {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        card_font: Option<Vec<u8>>,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        // The default fonts carry no CJK glyphs; card titles need them.
        if let Some(bytes) = card_font {
            let mut fonts = egui::FontDefinitions::default();
            fonts
                .font_data
                .insert("cards".to_owned(), egui::FontData::from_owned(bytes).into());
            for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                fonts.families.entry(family).or_default().push("cards".to_owned());
            }
            egui_ctx.set_fonts(fonts);
        }

        // Dark translucent panels over the starfield
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(10, 12, 24, 200);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.hyperlink_color = PASTEL_ACCENT;
        egui_ctx.set_visuals(visuals);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // no depth
            1,     // drawn onto the resolved frame
            false, // no dithering
        );

        Self {
            stats_visible: false,
            works_visible: true,
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn toggle_stats(&mut self) {
        self.stats_visible = !self.stats_visible;
    }

    pub fn toggle_works(&mut self) {
        self.works_visible = !self.works_visible;
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Run one egui frame and record it into `encoder` on top of `view`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        content: OverlayContent<'_>,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);
        let works_visible = self.works_visible;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(grid) = content.works.filter(|_| works_visible) {
                works_panel(ctx, grid);
            }

            if let Some(footer) = content.footer {
                egui::TopBottomPanel::bottom("footer")
                    .frame(egui::Frame::none().inner_margin(egui::Margin::symmetric(12.0, 6.0)))
                    .show_separator_line(false)
                    .show(ctx, |ui| {
                        ui.label(egui::RichText::new(footer).color(MUTED).small());
                    });
            }

            if let Some(stats) = content.stats {
                stats_panel(ctx, stats);
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn works_panel(ctx: &egui::Context, grid: &CardGrid) {
    egui::SidePanel::right("works")
        .resizable(false)
        .exact_width(340.0)
        .frame(
            egui::Frame::none()
                .fill(egui::Color32::from_rgba_premultiplied(10, 12, 24, 200))
                .inner_margin(egui::Margin::same(12.0)),
        )
        .show(ctx, |ui| {
            ui.heading(egui::RichText::new("Works").color(PASTEL_ACCENT));
            ui.add_space(6.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                let mut nav = EguiNavigator { ctx };
                for block in grid.blocks() {
                    card(ui, block, &mut nav);
                    ui.add_space(8.0);
                }
            });
        });
}

/// Draw one project card. The card's click sense sits beneath its
/// children, so the title link keeps its own clicks and the rest of the
/// card catches everything else. Returns the title link's response.
fn card(
    ui: &mut egui::Ui,
    block: &CardBlock,
    nav: &mut dyn Navigator,
) -> egui::InnerResponse<Option<egui::Response>> {
    let record = &block.record;
    let clickable = block.is_clickable();
    let sense = if clickable { egui::Sense::click() } else { egui::Sense::hover() };

    let card = ui.scope_builder(egui::UiBuilder::new().sense(sense), |ui| {
        // Selectable labels sense drags and would swallow card clicks.
        ui.style_mut().interaction.selectable_labels = false;

        egui::Frame::group(ui.style())
            .rounding(6.0)
            .inner_margin(egui::Margin::same(8.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());

                let thumb = if record.thumb.is_empty() { PLACEHOLDER_THUMB } else { record.thumb };
                ui.label(egui::RichText::new(thumb).color(MUTED).small().italics());

                let link = if clickable {
                    Some(ui.link(egui::RichText::new(record.title).strong()))
                } else {
                    ui.label(egui::RichText::new(record.title).strong());
                    None
                };

                ui.horizontal_wrapped(|ui| {
                    for tag in record.stack {
                        egui::Frame::none()
                            .fill(egui::Color32::from_rgba_premultiplied(60, 70, 110, 160))
                            .rounding(8.0)
                            .inner_margin(egui::Margin::symmetric(6.0, 1.0))
                            .show(ui, |ui| {
                                ui.label(egui::RichText::new(*tag).small());
                            });
                    }
                });

                if !record.desc.is_empty() {
                    ui.label(egui::RichText::new(record.desc).color(MUTED));
                }

                link
            })
            .inner
    });

    if clickable {
        if card.response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if card.inner.as_ref().is_some_and(|link| link.clicked()) {
            block.handle_click(ClickTarget::InnerLink, nav);
        } else if card.response.clicked() {
            block.handle_click(ClickTarget::Card, nav);
        }
    }

    card
}

fn stats_panel(ctx: &egui::Context, stats: &FrameStats) {
    egui::Area::new(egui::Id::new("stats_overlay"))
        .fixed_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                .inner_margin(egui::Margin::same(8.0))
                .rounding(4.0)
                .show(ui, |ui: &mut egui::Ui| {
                    ui.style_mut().override_font_id = Some(egui::FontId::monospace(13.0));
                    ui.label(format!("FPS: {}", stats.fps));
                    ui.label(format!(
                        "Frame: {:.2} ms (min: {:.1} | max: {:.1})",
                        stats.frame_time_avg_ms,
                        stats.frame_time_min_ms,
                        stats.frame_time_max_ms
                    ));
                    ui.label(format!("Bodies: {}", stats.body_count));
                    ui.label(format!("Draw calls: {}", stats.draw_calls));
                    ui.label(format!(
                        "Resolution: {} x {}",
                        stats.resolution.0, stats.resolution.1
                    ));
                    ui.label(format!("Camera distance: {:.1}", stats.camera_distance));
                    ui.label(format!("Elapsed: {:.1} s", stats.elapsed_s));
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_after_one_second() {
        let mut acc = StatsAccumulator::new();
        for _ in 0..59 {
            assert!(acc.record(1.0 / 60.0).is_none());
        }
        let (fps, avg, min, max) = acc.record(1.0 / 60.0 + 0.001).unwrap();
        assert_eq!(fps, 60);
        assert!((avg - 16.68).abs() < 0.05);
        assert!((min - 16.667).abs() < 0.01);
        assert!((max - 17.667).abs() < 0.01);
    }

    #[test]
    fn window_resets_after_summary() {
        let mut acc = StatsAccumulator::new();
        assert!(acc.record(1.5).is_some());
        assert!(acc.record(0.1).is_none());
    }

    use crate::works::ProjectRecord;
    use std::num::NonZeroUsize;

    const HOOK: ProjectRecord = ProjectRecord {
        title: "Hook Adventure",
        stack: &["Unity", "C#"],
        thumb: "source/hook.gif",
        url: "https://unityroom.com/games/hook_adventure",
        desc: "grapple action",
    };

    #[derive(Default)]
    struct Opened(Vec<String>);

    impl Navigator for Opened {
        fn open_in_new_context(&mut self, url: &str) {
            self.0.push(url.to_string());
        }
    }

    /// Headless egui host for a single card.
    struct CardHarness {
        ctx: egui::Context,
        block: CardBlock,
        nav: Opened,
    }

    impl CardHarness {
        fn new(record: ProjectRecord) -> Self {
            let ctx = egui::Context::default();
            ctx.options_mut(|o| o.max_passes = NonZeroUsize::MIN);
            Self { ctx, block: CardBlock::new(record), nav: Opened::default() }
        }

        /// Run one frame and return `(card rect, title link rect)`.
        fn frame(&mut self, events: Vec<egui::Event>) -> (egui::Rect, Option<egui::Rect>) {
            let input = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(
                    egui::Pos2::ZERO,
                    egui::vec2(400.0, 600.0),
                )),
                events,
                ..Default::default()
            };
            let mut rects = (egui::Rect::NOTHING, None);
            let Self { ctx, block, nav } = self;
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    let shown = card(ui, block, nav);
                    rects = (shown.response.rect, shown.inner.map(|link| link.rect));
                });
            });
            rects
        }

        fn click(&mut self, pos: egui::Pos2) {
            let button = |pressed| egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                modifiers: egui::Modifiers::NONE,
            };
            self.frame(vec![egui::Event::PointerMoved(pos)]);
            self.frame(vec![button(true)]);
            self.frame(vec![button(false)]);
            self.frame(Vec::new());
        }
    }

    #[test]
    fn title_click_navigates_once() {
        let mut harness = CardHarness::new(HOOK);
        let (_, link) = harness.frame(Vec::new());
        let link = link.expect("clickable card shows a title link");

        harness.click(link.center());

        assert_eq!(harness.nav.0, vec![HOOK.url.to_string()]);
    }

    #[test]
    fn body_click_navigates_once() {
        let mut harness = CardHarness::new(HOOK);
        let (card_rect, link) = harness.frame(Vec::new());
        let body = card_rect.left_bottom() + egui::vec2(3.0, -3.0);
        assert!(card_rect.contains(body));
        assert!(!link.is_some_and(|l| l.contains(body)));

        harness.click(body);

        assert_eq!(harness.nav.0, vec![HOOK.url.to_string()]);
    }

    #[test]
    fn placeholder_card_ignores_clicks() {
        let mut harness = CardHarness::new(ProjectRecord { url: "#", ..HOOK });
        let (card_rect, link) = harness.frame(Vec::new());
        assert!(link.is_none());

        harness.click(card_rect.center());

        assert!(harness.nav.0.is_empty());
    }
}
