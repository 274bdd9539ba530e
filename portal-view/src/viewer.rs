//! Interactive portal diagram surface built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation session and a
//! stable arena of per-category visual handles, and implements
//! [`eframe::App`] to render the diagram and translate input.
//!
//! The per-frame update is:
//! 1. Detect viewport changes and reseed through the session.
//! 2. Forward pointer position (normalized) and focus/activation keys.
//! 3. Advance the session one tick and patch only the attributes the
//!    returned [`SurfaceUpdate`] says changed.
//! 4. Draw mesh, region outlines, labels and hit circles.

use eframe::App;
use glam::Vec2;
use portal_core::{
    error::ConfigError,
    navigation::{Navigator, RecordingNavigator},
    session::{DiagramSession, SessionState, SurfaceUpdate},
    tessellation::Segment,
};
use rand::Rng;
use tracing::info;

/// Persistent visual handle for one category region.
///
/// The handle's identity (its index and destination slug) is fixed at
/// construction; rebuilds only patch its geometry in place. Activation always
/// resolves through this fixed identity, never through a nearest-region
/// lookup at click time.
struct RegionHandle {
    slug: &'static str,
    title: &'static str,
    outline: Vec<Vec2>,
    label: Vec2,
    hit_radius: f32,
    visible: bool,
}

impl RegionHandle {
    fn new(slug: &'static str, title: &'static str) -> Self {
        Self {
            slug,
            title,
            outline: Vec::new(),
            label: Vec2::ZERO,
            hit_radius: 0.0,
            visible: false,
        }
    }
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`DiagramSession`] (field, pointer, timers).
/// - The persistent surface: one [`RegionHandle`] per category plus the
///   background mesh segments.
/// - eframe/egui callbacks for drawing and user interaction.
///
/// ### Fields
/// - `session` - Owned simulation context driven once per frame.
/// - `handles` - Stable per-category visual handles, patched in place.
/// - `mesh` - Most recently pushed background mesh segments.
/// - `mesh_alpha` - Mesh opacity derived from pointer energy.
///
/// - `navigator` - Navigation collaborator receiving activations.
/// - `focused` - Index of the keyboard-focused handle, if any.
///
/// - `paused` - Whether ticking is suspended (geometry keeps its last state).
/// - `static_mode` - Reduced-motion mode: seed once, never animate.
///
/// - `surface_size` - Last seen canvas size, for resize detection.
/// - `pointer_inside` - Whether the pointer was over the canvas last frame.
/// - `last_tick` - Time stamp of the last tick (egui time).
///
/// - `rng` - Random number generator for the "new seed" control.
pub struct Viewer {
    session: DiagramSession,
    handles: Vec<RegionHandle>,
    mesh: Vec<Segment>,
    mesh_alpha: f32,

    navigator: RecordingNavigator,
    focused: Option<usize>,

    paused: bool,
    /// Reduced-motion mode: seed once, never animate, energy pinned to zero.
    static_mode: bool,

    surface_size: egui::Vec2,
    pointer_inside: bool,
    last_tick: f64,

    rng: rand::rngs::ThreadRng,
}

impl Viewer {
    /// Builds the viewer with the default diagram configuration.
    ///
    /// One visual handle is created per category up front; the handle arena
    /// never grows or shrinks afterwards. The session stays `Idle` until the
    /// first frame reports a usable canvas size.
    ///
    /// ### Returns
    /// A fully-initialized [`Viewer`] ready to be passed to
    /// `eframe::run_native`, or the configuration error that makes the
    /// diagram impossible to build.
    pub fn new() -> Result<Self, ConfigError> {
        let session = DiagramSession::new(Default::default())?;
        let handles = session
            .config()
            .categories
            .iter()
            .map(|c| RegionHandle::new(c.slug, c.title))
            .collect();

        Ok(Self {
            session,
            handles,
            mesh: Vec::new(),
            mesh_alpha: 0.0,
            navigator: RecordingNavigator::default(),
            focused: None,
            paused: false,
            static_mode: false,
            surface_size: egui::Vec2::ZERO,
            pointer_inside: false,
            last_tick: 0.0,
            rng: rand::rng(),
        })
    }

    /// Patches the persistent surface with whatever changed this tick.
    fn apply(&mut self, update: SurfaceUpdate) {
        if let Some(regions) = update.regions {
            for region in regions {
                let handle = &mut self.handles[region.category];
                handle.outline = region.outline;
                handle.label = region.label;
                handle.hit_radius = region.hit_radius;
                handle.visible = true;
            }
        }
        if let Some(mesh) = update.mesh {
            self.mesh = mesh;
        }
        self.mesh_alpha = update.mesh_alpha;
    }

    /// Issues one navigation request for the region handle at `index`.
    fn activate(&mut self, index: usize) {
        let slug = self.handles[index].slug;
        info!(destination = slug, "region activated");
        self.navigator.navigate(slug);
    }

    /// Hit-tests a local surface position against the displayed handles.
    fn hit_region(&self, local: Vec2) -> Option<usize> {
        self.handles.iter().position(|h| {
            h.visible && local.distance_squared(h.label) <= h.hit_radius * h.hit_radius
        })
    }

    /// Moves keyboard focus to the next visible handle in `dir`.
    fn focus_step(&mut self, dir: isize) {
        let n = self.handles.len() as isize;
        if n == 0 {
            return;
        }
        let mut idx = self
            .focused
            .map(|f| f as isize)
            .unwrap_or(if dir > 0 { -1 } else { 0 });
        for _ in 0..n {
            idx = (idx + dir).rem_euclid(n);
            if self.handles[idx as usize].visible {
                self.focused = Some(idx as usize);
                return;
            }
        }
    }

    /// Picks a fresh random seed and forces a reseed on the next frame.
    fn reseed_random(&mut self) {
        let seed = self.rng.random_range(1..=i64::from(i32::MAX));
        self.session.set_seed(seed);
        // Zeroing the remembered size makes the next frame's size check
        // reseed through the normal resize path.
        self.surface_size = egui::Vec2::ZERO;
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (next, prev, activate) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Tab) || i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Space),
            )
        });
        if next {
            self.focus_step(1);
        }
        if prev {
            self.focus_step(-1);
        }
        if activate && let Some(index) = self.focused {
            self.activate(index);
        }
    }

    /// Builds the top panel (run controls, static mode, reseed).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.paused { "▶ Run" } else { "⏸ Pause" })
                    .clicked()
                {
                    self.paused = !self.paused;
                }

                if ui.checkbox(&mut self.static_mode, "Static").changed() && self.static_mode {
                    // The frozen diagram shows no pointer highlight.
                    self.session.pointer_left();
                }

                if ui.button("New seed").clicked() {
                    self.reseed_random();
                }

                ui.separator();
                ui.label(format!("seed = {}", self.session.config().seed));
            });
        });
    }

    /// Builds the bottom status bar (counts, energy, last navigation).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("energy = {:.2}", self.session.energy()));
                ui.separator();
                ui.label(format!(
                    "points = {}",
                    self.session.field().map_or(0, |f| f.points.len())
                ));
                ui.label(format!(
                    "regions = {}",
                    self.handles.iter().filter(|h| h.visible).count()
                ));
                if let Some(last) = self.navigator.requests.last() {
                    ui.separator();
                    ui.label(format!("last navigation: {last}"));
                }
            });
        });
    }

    /// Builds the central panel where the diagram lives.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click());
            let rect = response.rect;
            let painter = ui.painter_at(rect);
            let now = ctx.input(|i| i.time);

            // Resize (and first mount): reseed through the session.
            if (rect.size() - self.surface_size).length() > 0.5 {
                self.surface_size = rect.size();
                let update = self.session.resize(rect.width(), rect.height(), now);
                self.apply(update);
            }

            // Pointer tracking in normalized surface coordinates. A press
            // counts as a move.
            if let Some(pos) = response.hover_pos() {
                let norm = Vec2::new(
                    (pos.x - rect.min.x) / rect.width().max(1.0),
                    (pos.y - rect.min.y) / rect.height().max(1.0),
                );
                self.session.pointer_moved(norm);
                self.pointer_inside = true;
            } else if self.pointer_inside {
                self.session.pointer_left();
                self.pointer_inside = false;
            }

            self.handle_keys(ctx);

            // Click activation through the stable handle identity.
            if response.clicked()
                && let Some(pos) = response.interact_pointer_pos()
            {
                let local = Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y);
                if let Some(index) = self.hit_region(local) {
                    self.focused = Some(index);
                    self.activate(index);
                }
            }

            // Advance the simulation.
            if !self.paused && !self.static_mode && self.session.state() != SessionState::Idle {
                let dt = if self.last_tick > 0.0 {
                    ((now - self.last_tick) as f32).max(0.001)
                } else {
                    1.0 / 60.0
                };
                self.last_tick = now;
                let update = self.session.tick(now, dt);
                self.apply(update);
                ctx.request_repaint();
            } else {
                // Keep the clock warm so resuming does not jump.
                self.last_tick = now;
            }

            self.draw(&painter, rect);
        });
    }

    fn draw(&self, painter: &egui::Painter, rect: egui::Rect) {
        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(12, 14, 20));
        let origin = rect.min;
        let to_screen = |p: Vec2| egui::pos2(origin.x + p.x, origin.y + p.y);

        // Background mesh; opacity tracks pointer energy.
        let mesh_stroke = egui::Stroke::new(
            1.0,
            egui::Color32::from_white_alpha((self.mesh_alpha * 255.0) as u8),
        );
        for [a, b] in &self.mesh {
            painter.line_segment([to_screen(*a), to_screen(*b)], mesh_stroke);
        }

        let min_dim = rect.width().min(rect.height());
        let energy = self.session.energy();
        let outline_alpha = 110 + (energy * 90.0) as u8;

        for (i, handle) in self.handles.iter().enumerate() {
            if !handle.visible {
                continue;
            }

            let points: Vec<egui::Pos2> = handle.outline.iter().map(|p| to_screen(*p)).collect();
            painter.add(egui::Shape::closed_line(
                points,
                egui::Stroke::new(
                    1.4,
                    egui::Color32::from_rgba_unmultiplied(142, 178, 255, outline_alpha),
                ),
            ));

            painter.circle_stroke(
                to_screen(handle.label),
                handle.hit_radius,
                egui::Stroke::new(1.0, egui::Color32::from_white_alpha(24)),
            );

            if self.focused == Some(i) {
                painter.circle_stroke(
                    to_screen(handle.label),
                    handle.hit_radius + 4.0,
                    egui::Stroke::new(1.5, egui::Color32::YELLOW),
                );
            }

            // Label baseline sits slightly above the centroid.
            let label_pos = to_screen(handle.label - Vec2::new(0.0, min_dim * 0.006));
            painter.text(
                label_pos,
                egui::Align2::CENTER_CENTER,
                handle.title,
                egui::FontId::proportional(16.0),
                egui::Color32::WHITE,
            );
        }
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);
    }
}
