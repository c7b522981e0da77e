use std::time::Duration;

use egui::{Color32, ColorImage, Event, Rect, Sense, Shape, Vec2, pos2};
use log::{info, warn};

use crate::animation::{BounceAnimation, RepaintScheduler};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::drawing::Drawing;
use crate::export::{self, ExportHandle, Exporter};
use crate::input::{self, BrushSettings, InputAdapter, InputOutcome, Viewport};
use crate::renderer::{self, Rasterizer};
use crate::surface_cache::{SurfaceCache, SurfaceKey};

/// Canvas size and DPI the cached surface is rendered for.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CanvasGeometry {
    size: Vec2,
    pixels_per_point: f32,
}

impl CanvasGeometry {
    fn rasterizer(&self, background: Color32) -> Rasterizer {
        Rasterizer::for_canvas(self.size, self.pixels_per_point).with_background(background)
    }
}

pub struct SketchApp {
    config: Config,
    drawing: Drawing,
    brush: BrushSettings,
    input: InputAdapter<Viewport>,
    // In-progress stroke as drawn so far, in drawing space
    live_shapes: Vec<Shape>,
    surface_cache: SurfaceCache,
    surface_geometry: Option<CanvasGeometry>,
    // Latest geometry seen, waiting out the debounce
    observed_geometry: Option<CanvasGeometry>,
    resize_debounce: Debouncer,
    bounce: BounceAnimation,
    scheduler: RepaintScheduler,
    exporter: Exporter,
    pending_export: Option<ExportHandle>,
    notice: Option<String>,
    show_clear_confirm: bool,
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        Self::with_context(cc.egui_ctx.clone(), config)
    }

    pub fn with_context(ctx: egui::Context, config: Config) -> Self {
        Self {
            drawing: Drawing::new(),
            brush: BrushSettings::from(&config.brush),
            input: InputAdapter::new(Viewport::new(Rect::NOTHING)),
            live_shapes: Vec::new(),
            surface_cache: SurfaceCache::new(),
            surface_geometry: None,
            observed_geometry: None,
            resize_debounce: Debouncer::new(config.canvas.resize_debounce_secs()),
            bounce: BounceAnimation::new(config.bounce.clone()),
            scheduler: RepaintScheduler::new(ctx),
            exporter: Exporter::new(&config.export),
            pending_export: None,
            notice: None,
            show_clear_confirm: false,
            config,
        }
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    fn undo(&mut self) {
        self.drawing.undo();
    }

    fn clear(&mut self) {
        self.drawing.clear();
        self.live_shapes.clear();
    }

    fn request_clear(&mut self) {
        self.show_clear_confirm = true;
    }

    fn confirm_clear(&mut self) {
        self.clear();
        self.show_clear_confirm = false;
    }

    fn cancel_clear(&mut self) {
        self.show_clear_confirm = false;
    }

    fn rasterizer(&self) -> Option<Rasterizer> {
        self.surface_geometry
            .map(|geometry| geometry.rasterizer(self.config.canvas.background32()))
    }

    /// What the canvas texture should currently be rendered from.
    fn surface_key(&self) -> Option<SurfaceKey> {
        self.rasterizer().map(|rasterizer| SurfaceKey {
            revision: self.drawing.revision(),
            size_px: rasterizer.size_px(),
        })
    }

    fn start_export(&mut self) {
        let Some(rasterizer) = self.rasterizer() else {
            return;
        };
        let Some(surface) = rasterizer.render(&self.drawing) else {
            warn!("Cannot allocate a {:?} surface for export", rasterizer.size_px());
            self.notice = Some("Export failed: canvas too large".to_owned());
            return;
        };
        info!("Exporting {}x{} drawing", surface.width(), surface.height());
        self.pending_export = Some(self.exporter.export(surface));
        self.notice = Some("Exporting…".to_owned());
    }

    fn poll_export(&mut self) {
        let Some(handle) = &mut self.pending_export else {
            return;
        };
        let Some(result) = export::poll_export(handle) else {
            return;
        };
        self.pending_export = None;
        self.notice = Some(match result {
            Ok(path) => format!("Saved {}", path.display()),
            Err(err) => {
                warn!("Export failed: {err}");
                format!("Export failed: {err}")
            }
        });
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Color:");
            egui::color_picker::color_edit_button_srgba(
                ui,
                &mut self.brush.color,
                egui::color_picker::Alpha::Opaque,
            );

            ui.label("Size:");
            let range = self.config.brush.min_size..=self.config.brush.max_size;
            ui.add(egui::Slider::new(&mut self.brush.size, range));

            ui.separator();

            if ui
                .add_enabled(self.drawing.can_undo(), egui::Button::new("⟲ Undo"))
                .clicked()
            {
                self.undo();
            }
            if ui
                .add_enabled(!self.drawing.is_empty(), egui::Button::new("🗑 Clear"))
                .clicked()
            {
                self.request_clear();
            }
            if ui
                .add_enabled(self.pending_export.is_none(), egui::Button::new("💾 Export PNG"))
                .clicked()
            {
                self.start_export();
            }

            ui.separator();
            ui.label(format!("Strokes: {}", self.drawing.len()));
            if let Some(notice) = &self.notice {
                ui.separator();
                ui.label(notice);
            }
        });
    }

    fn clear_confirmation(&mut self, ctx: &egui::Context) {
        if !self.show_clear_confirm {
            return;
        }
        egui::Window::new("Clear drawing?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("This removes every stroke and cannot be undone.");
                ui.horizontal(|ui| {
                    if ui.button("Clear").clicked() {
                        self.confirm_clear();
                    }
                    if ui.button("Cancel").clicked() {
                        self.cancel_clear();
                    }
                });
            });
    }

    fn bounce_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Bounce");
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.bounce.is_running(), egui::Button::new("▶ Play"))
                .clicked()
            {
                self.bounce.play(&mut self.scheduler);
            }
            if ui
                .add_enabled(self.bounce.is_running(), egui::Button::new("⏸ Pause"))
                .clicked()
            {
                self.bounce.pause(&mut self.scheduler);
            }
        });

        let (response, painter) = ui.allocate_painter(self.bounce.bounds(), Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);
        let ball = self.bounce.ball();
        painter.circle_filled(
            rect.min + ball.position.to_vec2(),
            self.bounce.radius(),
            Color32::from_rgb(230, 120, 40),
        );
    }

    /// Track canvas geometry changes, redrawing once they settle.
    fn update_geometry(&mut self, ctx: &egui::Context, observed: CanvasGeometry, now: f64) {
        if self.surface_geometry.is_none() {
            self.surface_geometry = Some(observed);
            self.observed_geometry = Some(observed);
        }
        if self.observed_geometry != Some(observed) {
            self.observed_geometry = Some(observed);
            self.resize_debounce.trigger(now);
        }

        if self.resize_debounce.poll(now) {
            self.surface_geometry = self.observed_geometry;
        } else if let Some(remaining) = self.resize_debounce.remaining(now) {
            ctx.request_repaint_after(Duration::from_secs_f64(remaining));
        }
    }

    fn apply_input(&mut self, outcome: &InputOutcome) {
        match outcome {
            InputOutcome::Began => {
                self.live_shapes = self
                    .drawing
                    .in_progress()
                    .map(|builder| renderer::shapes_for_stroke(&builder.to_stroke(), Vec2::ZERO))
                    .unwrap_or_default();
            }
            InputOutcome::Extended(segment) => {
                self.live_shapes
                    .extend(renderer::shapes_for_segment(segment, Vec2::ZERO));
            }
            InputOutcome::Ended { .. } => self.live_shapes.clear(),
            InputOutcome::Ignored => {}
        }
    }

    // Pointer events reach the drawing only while no dialog is open
    fn handle_canvas_input(&mut self, events: &[Event]) {
        if self.show_clear_confirm {
            return;
        }
        for outcome in self.input.handle_events(events, &mut self.drawing, &self.brush) {
            self.apply_input(&outcome);
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
        let rect = response.rect;
        self.input.mapper_mut().set_canvas_rect(rect);

        let now = ctx.input(|i| i.time);
        let observed = CanvasGeometry {
            size: rect.size(),
            pixels_per_point: ctx.pixels_per_point(),
        };
        self.update_geometry(&ctx, observed, now);

        let mut events = ctx.input(|i| i.events.clone());
        input::retain_unobstructed(&mut events, ui.layer_id(), |pos| ctx.layer_id_at(pos));
        self.handle_canvas_input(&events);

        let (Some(rasterizer), Some(key)) = (self.rasterizer(), self.surface_key()) else {
            return;
        };
        let drawing = &self.drawing;
        let background = self.config.canvas.background32();
        let texture = self.surface_cache.get_or_render(&ctx, key, || {
            rasterizer
                .render_committed(drawing)
                .map(|surface| surface.to_color_image())
                .unwrap_or_else(|| ColorImage::new([1, 1], background))
        });
        painter.image(
            texture,
            rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        let offset = rect.min.to_vec2();
        painter.extend(self.live_shapes.iter().cloned().map(|mut shape| {
            shape.translate(offset);
            shape
        }));
    }
}

impl eframe::App for SketchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(frame) = self.bounce.pending_frame() {
            let now = ctx.input(|i| i.time);
            self.bounce.on_frame(frame, now, &mut self.scheduler);
        }

        let undo_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z);
        if ctx.input_mut(|i| i.consume_shortcut(&undo_shortcut)) {
            self.undo();
        }

        self.poll_export();
        if self.pending_export.is_some() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::SidePanel::right("bounce").show(ctx, |ui| self.bounce_panel(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas(ui));

        self.clear_confirmation(ctx);
    }
}
