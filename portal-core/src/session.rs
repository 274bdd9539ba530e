//! The owned simulation context and sync layer.
//!
//! A [`DiagramSession`] bundles everything one animated surface needs: the
//! point field, pointer state, refresh timers, and the per-category
//! continuity cache. It has an explicit lifecycle — construct on mount, drop
//! on unmount — and is driven from a single timeline: the frame loop calls
//! [`tick`](DiagramSession::tick), resize signals call
//! [`resize`](DiagramSession::resize), pointer events call the pointer
//! setters between ticks.

use crate::{
    config::DiagramConfig,
    error::ConfigError,
    field::PointField,
    motion,
    pointer::PointerState,
    region::{Region, extract_regions},
    rng::SeededRng,
    tessellation::{Segment, Tessellation},
    throttle::{IntervalPair, RefreshTimer},
};
use glam::Vec2;
use tracing::{debug, info, warn};

/// Base mesh opacity with an idle pointer.
const MESH_ALPHA_BASE: f32 = 0.32;
/// Additional mesh opacity at full pointer energy.
const MESH_ALPHA_GAIN: f32 = 0.36;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No usable viewport yet (or the last resize had zero extent).
    Idle,
    /// Field seeded and an initial partition built; no tick has run since.
    Seeded,
    /// The frame loop is advancing the field.
    Animating,
}

/// What one tick or resize wants written into the persistent surface.
///
/// `regions` and `mesh` are `None` when that part did not change, so the
/// surface only patches the attributes that moved and visual handles keep
/// their identity between frames.
#[derive(Clone, Debug, Default)]
pub struct SurfaceUpdate {
    pub regions: Option<Vec<Region>>,
    pub mesh: Option<Vec<Segment>>,
    /// Smoothed pointer energy in `[0, 1]`, for cosmetic intensity.
    pub energy: f32,
    /// Derived mesh opacity.
    pub mesh_alpha: f32,
}

pub struct DiagramSession {
    cfg: DiagramConfig,
    state: SessionState,
    field: Option<PointField>,
    pointer: PointerState,
    diagram_timer: RefreshTimer,
    mesh_timer: RefreshTimer,
    /// Last valid geometry per category; reused when a rebuild drops a cell
    /// so the surface never pops to an empty shape.
    displayed: Vec<Option<Region>>,
}

impl DiagramSession {
    /// Validates the configuration and creates an idle session.
    pub fn new(cfg: DiagramConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        info!(
            categories = cfg.categories.len(),
            points = cfg.total_points(),
            "diagram session created"
        );
        let displayed = vec![None; cfg.categories.len()];
        Ok(Self {
            cfg,
            state: SessionState::Idle,
            field: None,
            pointer: PointerState::default(),
            diagram_timer: RefreshTimer::default(),
            mesh_timer: RefreshTimer::default(),
            displayed,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.cfg
    }

    pub fn field(&self) -> Option<&PointField> {
        self.field.as_ref()
    }

    pub fn energy(&self) -> f32 {
        self.pointer.energy()
    }

    pub fn mesh_alpha(&self) -> f32 {
        MESH_ALPHA_BASE + self.pointer.energy() * MESH_ALPHA_GAIN
    }

    /// Replaces the placement seed. Takes effect on the next resize/reseed.
    pub fn set_seed(&mut self, seed: i64) {
        self.cfg.seed = seed;
    }

    /// Pointer moved or pressed at a normalized surface position.
    pub fn pointer_moved(&mut self, norm: Vec2) {
        self.pointer.point_at(norm);
    }

    /// Pointer left the surface.
    pub fn pointer_left(&mut self) {
        self.pointer.leave();
    }

    /// Reseeds the field for a new viewport size and rebuilds the partition
    /// unconditionally. Zero-extent sizes park the session in `Idle`; the
    /// next resize signal retries.
    ///
    /// The field is always rebuilt from scratch at the new size, never
    /// rescaled, and cached geometry from the old size is discarded before
    /// the rebuild.
    ///
    /// ### Parameters
    /// - `width`, `height` - New viewport extent in pixels.
    /// - `now` - Current animation clock in seconds (egui time).
    ///
    /// ### Returns
    /// A [`SurfaceUpdate`] carrying the freshly built regions and mesh, or
    /// one with both set to `None` when the viewport had zero extent.
    pub fn resize(&mut self, width: f32, height: f32, now: f64) -> SurfaceUpdate {
        let mut rng = SeededRng::new(self.cfg.seed);
        match PointField::seeded(&self.cfg, width, height, &mut rng) {
            Some(field) => {
                debug!(width, height, seed = self.cfg.seed, "field reseeded");
                self.field = Some(field);
                self.state = SessionState::Seeded;
                // Geometry from the old size must not survive the resize.
                self.displayed.fill(None);
                self.rebuild(now, true)
            }
            None => {
                warn!(width, height, "zero-extent viewport, seeding deferred");
                self.field = None;
                self.state = SessionState::Idle;
                self.displayed.fill(None);
                self.idle_update()
            }
        }
    }

    /// One animation tick. Integration always completes before the throttled
    /// rebuild decision, so a rebuild reads the positions exactly as this
    /// tick left them.
    ///
    /// ### Parameters
    /// - `now` - Current animation clock in seconds (egui time).
    /// - `dt` - Elapsed seconds since the previous tick.
    ///
    /// ### Returns
    /// A [`SurfaceUpdate`] whose `regions`/`mesh` members are populated only
    /// when the corresponding refresh timer came due this tick.
    pub fn tick(&mut self, now: f64, dt: f32) -> SurfaceUpdate {
        let Some(field) = self.field.as_mut() else {
            return self.idle_update();
        };
        let peak = motion::advance(field, &self.pointer, now, dt, &self.cfg);
        self.pointer.relax(peak);
        self.state = SessionState::Animating;

        let active = self.pointer.active;
        let diagram_interval = IntervalPair {
            active: self.cfg.diagram_interval_active,
            idle: self.cfg.diagram_interval_idle,
        }
        .current(active);
        let mesh_interval = IntervalPair {
            active: self.cfg.mesh_interval_active,
            idle: self.cfg.mesh_interval_idle,
        }
        .current(active);

        let refresh_mesh = self.mesh_timer.due(now, mesh_interval);
        if refresh_mesh || self.diagram_timer.due(now, diagram_interval) {
            self.rebuild(now, refresh_mesh)
        } else {
            self.idle_update()
        }
    }

    fn idle_update(&self) -> SurfaceUpdate {
        SurfaceUpdate {
            regions: None,
            mesh: None,
            energy: self.pointer.energy(),
            mesh_alpha: self.mesh_alpha(),
        }
    }

    /// Rebuilds the partition from the current positions and merges the
    /// surviving regions over the continuity cache.
    fn rebuild(&mut self, now: f64, refresh_mesh: bool) -> SurfaceUpdate {
        let Some(field) = &self.field else {
            return self.idle_update();
        };
        let size = Vec2::new(field.width, field.height);

        let Some(tess) = Tessellation::build(&field.positions(), size) else {
            // Previous geometry stays on screen; timers stay unmarked so the
            // next tick retries.
            debug!("rebuild abandoned, previous geometry stays");
            return self.idle_update();
        };

        for region in extract_regions(&tess, &self.cfg, size) {
            let category = region.category;
            self.displayed[category] = Some(region);
        }
        self.diagram_timer.mark(now);

        let mesh = if refresh_mesh {
            self.mesh_timer.mark(now);
            Some(tess.mesh_segments())
        } else {
            None
        };

        SurfaceUpdate {
            regions: Some(self.displayed.iter().flatten().cloned().collect()),
            mesh,
            energy: self.pointer.energy(),
            mesh_alpha: self.mesh_alpha(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagramConfig;

    const DT: f32 = 1.0 / 60.0;

    fn session() -> DiagramSession {
        DiagramSession::new(DiagramConfig::default()).expect("valid default config")
    }

    #[test]
    fn invalid_config_fails_at_construction() {
        let mut cfg = DiagramConfig::default();
        cfg.frame_anchors.truncate(3);
        assert!(DiagramSession::new(cfg).is_err());
    }

    #[test]
    fn zero_extent_resize_parks_the_session_idle() {
        let mut s = session();
        let update = s.resize(0.0, 600.0, 0.0);
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.field().is_none());
        assert!(update.regions.is_none());

        // The next signal with a real size recovers.
        let update = s.resize(800.0, 600.0, 0.0);
        assert_eq!(s.state(), SessionState::Seeded);
        assert!(s.field().is_some());
        assert!(update.regions.is_some());
    }

    #[test]
    fn resize_rebuilds_immediately_with_mesh() {
        let mut s = session();
        let update = s.resize(800.0, 600.0, 0.0);
        let regions = update.regions.expect("regions after resize");
        assert!(!regions.is_empty());
        assert!(regions.len() <= 6);
        assert!(update.mesh.expect("mesh after resize").len() > 0);
    }

    #[test]
    fn tick_before_any_seed_is_a_no_op() {
        let mut s = session();
        let update = s.tick(0.016, DT);
        assert_eq!(s.state(), SessionState::Idle);
        assert!(update.regions.is_none());
        assert!(update.mesh.is_none());
    }

    #[test]
    fn rebuilds_are_throttled_between_intervals() {
        let mut s = session();
        s.resize(800.0, 600.0, 0.0);

        // Right after the resize rebuild nothing is due.
        let update = s.tick(0.016, DT);
        assert_eq!(s.state(), SessionState::Animating);
        assert!(update.regions.is_none());
        assert!(update.mesh.is_none());

        // Past the idle diagram interval (90 ms) but not the mesh interval
        // (150 ms): regions refresh, the mesh does not.
        let update = s.tick(0.1, DT);
        assert!(update.regions.is_some());
        assert!(update.mesh.is_none());

        // Past the mesh interval as well: both refresh.
        let update = s.tick(0.3, DT);
        assert!(update.regions.is_some());
        assert!(update.mesh.is_some());
    }

    #[test]
    fn pointer_activity_tightens_the_diagram_interval() {
        let mut s = session();
        s.resize(800.0, 600.0, 0.0);
        s.pointer_moved(Vec2::splat(0.5));

        // 60 ms: past the active interval (48 ms), short of the idle one.
        let update = s.tick(0.06, DT);
        assert!(update.regions.is_some());
    }

    #[test]
    fn resize_reseeds_instead_of_rescaling() {
        let mut s = session();
        s.resize(800.0, 600.0, 0.0);
        // Let the field move away from its seeded positions.
        for i in 1..10 {
            s.tick(i as f64 * DT as f64, DT);
        }

        s.resize(400.0, 300.0, 1.0);
        let field = s.field().expect("seeded");

        // The new field must equal a from-scratch seed at the new size, not
        // any rescaling of the old one.
        let cfg = DiagramConfig::default();
        let mut rng = SeededRng::new(cfg.seed);
        let expected = PointField::seeded(&cfg, 400.0, 300.0, &mut rng).expect("seed");
        assert_eq!(field, &expected);
        assert_eq!(s.state(), SessionState::Seeded);
    }

    #[test]
    fn sessions_with_the_same_seed_and_size_agree() {
        let mut a = session();
        let mut b = session();
        a.resize(800.0, 600.0, 0.0);
        b.resize(800.0, 600.0, 0.0);
        assert_eq!(a.field(), b.field());
    }

    #[test]
    fn energy_is_zero_after_a_thousand_inactive_ticks() {
        let mut s = session();
        s.resize(800.0, 600.0, 0.0);
        for i in 0..1000 {
            let update = s.tick(i as f64 * DT as f64, DT);
            assert!(update.energy >= 0.0 && update.energy <= 1.0);
        }
        assert!(s.energy() < 1e-6);
    }

    #[test]
    fn pointer_leave_drops_energy_and_it_stays_down() {
        let mut s = session();
        s.resize(800.0, 600.0, 0.0);
        s.pointer_moved(Vec2::splat(0.5));
        for i in 0..30 {
            s.tick(i as f64 * DT as f64, DT);
        }

        s.pointer_left();
        let mut last = s.energy();
        for i in 30..60 {
            s.tick(i as f64 * DT as f64, DT);
            assert!(s.energy() <= last);
            last = s.energy();
        }
    }

    #[test]
    fn region_identity_survives_rebuilds() {
        let mut s = session();
        let first = s.resize(800.0, 600.0, 0.0).regions.expect("regions");
        let update = s.tick(0.2, DT);
        let second = update.regions.expect("regions after rebuild");

        // Same categories in the same order, whatever the geometry did.
        let ids_first: Vec<usize> = first.iter().map(|r| r.category).collect();
        let ids_second: Vec<usize> = second.iter().map(|r| r.category).collect();
        assert_eq!(ids_first, ids_second);
    }
}
