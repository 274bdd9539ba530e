//! Per-tick kinetic integration of the point field.
//!
//! [`advance`] runs once per animation tick and mutates positions (and, for
//! drift points, velocities) in place according to each point's kind,
//! folding in the pointer attraction field. It touches neither the partition
//! nor the rendered output; the sync layer decides separately whether this
//! tick's positions are worth a rebuild.

use crate::{
    config::DiagramConfig,
    field::{PointField, PointKind},
    pointer::PointerState,
};
use glam::Vec2;

/// Global clock scale: wall-clock seconds are slowed by this factor before
/// feeding the kinetic sinusoids.
const TIME_SCALE: f32 = 0.16;
/// Drift points reflect off the viewport edges inside this margin.
const EDGE_MARGIN: f32 = 2.0;
/// Pointer attraction weight for category anchors.
const CATEGORY_PULL: f32 = 0.028;
/// Pointer attraction weight for spoke points.
const SPOKE_PULL: f32 = 0.04;

/// Pointer influence at `pos`: exponential falloff in the squared distance
/// to the pointer. `falloff_sq` is the σ² scale in pixels².
#[inline]
pub fn influence(pos: Vec2, pointer_px: Vec2, falloff_sq: f32) -> f32 {
    let d = pos - pointer_px;
    (-d.length_squared() / falloff_sq).exp()
}

/// Advances every point by one tick.
///
/// `time` is the animation clock in seconds, `dt` the elapsed seconds since
/// the previous tick. Returns the peak pointer influence observed across
/// category and spoke points this tick (zero while the pointer is inactive);
/// the caller feeds it into [`PointerState::relax`].
pub fn advance(
    field: &mut PointField,
    pointer: &PointerState,
    time: f64,
    dt: f32,
    cfg: &DiagramConfig,
) -> f32 {
    let width = field.width;
    let height = field.height;
    let center = field.center();
    let min_dim = field.min_dim();
    let t = time as f32 * TIME_SCALE;

    let pointer_px = pointer.px(width, height);
    let falloff_sq = min_dim * min_dim * cfg.pointer_falloff_ratio;
    let mut peak = 0.0f32;

    // Pulls `pos` toward the pointer and records the influence peak.
    let attract = |pos: Vec2, weight: f32, peak: &mut f32| -> Vec2 {
        let pull = influence(pos, pointer_px, falloff_sq);
        *peak = (*peak).max(pull);
        pos + (pointer_px - pos) * (weight * pull)
    };

    for p in &mut field.points {
        match p.kind {
            PointKind::Category => {
                let breathing = 1.0 + (t * 0.9 + p.phase).sin() * 0.05;
                let swirl = (t * 0.62 + p.phase * 1.1).sin() * 0.18;
                let angle = p.base_angle + swirl * 0.55;
                let wobble = p.base_radius * 0.05;
                let mut next = center
                    + Vec2::from_angle(angle) * (p.base_radius * breathing)
                    + Vec2::from_angle(p.phase + t * 2.1) * wobble;
                if pointer.active {
                    next = attract(next, CATEGORY_PULL, &mut peak);
                }
                p.pos = next;
            }
            PointKind::SpokeInner | PointKind::SpokeOuter => {
                let outer = p.kind == PointKind::SpokeOuter;
                let (twist_rate, twist_mag) = if outer { (0.44, 0.15) } else { (0.58, 0.10) };
                let radial_mag = if outer { 0.068 } else { 0.042 };
                let sway_mag = if outer { 0.011 } else { 0.0075 };

                let twist =
                    (t * twist_rate + p.phase + p.spoke_progress * 3.0).sin() * twist_mag;
                let angle = p.base_angle + twist;
                let pulse = 1.0 + (t * 0.48 + p.phase + p.spoke_progress * 2.2).sin() * radial_mag;
                let sway = (t * 0.68 + p.phase + p.spoke as f32 * 0.38 + p.spoke_progress * 3.0)
                    .sin()
                    * min_dim
                    * sway_mag;
                let mut next =
                    center + Vec2::from_angle(angle) * (p.base_radius * pulse) + p.perp * sway;
                if pointer.active {
                    next = attract(next, SPOKE_PULL, &mut peak);
                }
                p.pos = next;
            }
            PointKind::Frame => {
                // Oscillating tension about the fixed base anchor; the clamp
                // keeps frame points on the visible surface no matter what.
                let tension = 1.0 + (t * 0.33 + p.phase).sin() * 0.042;
                let pulled = center + (p.base_pos - center) * tension;
                p.pos = pulled.clamp(Vec2::ZERO, Vec2::new(width, height));
            }
            PointKind::Drift => {
                let accel = Vec2::new(
                    (t * 1.08 + p.phase).sin(),
                    (t * 1.02 + p.phase).cos(),
                ) * (0.0014 * p.speed_scale);
                p.vel += accel * (dt * 60.0);
                p.pos += p.vel;

                if p.pos.x <= EDGE_MARGIN || p.pos.x >= width - EDGE_MARGIN {
                    p.vel.x *= -cfg.drift_bounce_damping;
                    p.pos.x = p.pos.x.clamp(EDGE_MARGIN, width - EDGE_MARGIN);
                }
                if p.pos.y <= EDGE_MARGIN || p.pos.y >= height - EDGE_MARGIN {
                    p.vel.y *= -cfg.drift_bounce_damping;
                    p.pos.y = p.pos.y.clamp(EDGE_MARGIN, height - EDGE_MARGIN);
                }

                let limit = cfg.drift_speed_limit;
                p.vel = p.vel.clamp(Vec2::splat(-limit), Vec2::splat(limit));
            }
        }
    }

    peak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;
    use glam::Vec2;

    fn seeded_field() -> (DiagramConfig, PointField) {
        let cfg = DiagramConfig::default();
        let mut rng = SeededRng::new(cfg.seed);
        let field = PointField::seeded(&cfg, 800.0, 600.0, &mut rng).expect("seeding");
        (cfg, field)
    }

    fn run_ticks(field: &mut PointField, pointer: &PointerState, cfg: &DiagramConfig, n: usize) {
        let dt = 1.0 / 60.0;
        for i in 0..n {
            advance(field, pointer, i as f64 * dt as f64, dt, cfg);
        }
    }

    #[test]
    fn influence_peaks_at_the_pointer_and_falls_off() {
        let falloff_sq = 600.0 * 600.0 * 0.2;
        let pointer = Vec2::new(400.0, 300.0);
        assert_eq!(influence(pointer, pointer, falloff_sq), 1.0);

        let near = influence(pointer + Vec2::new(50.0, 0.0), pointer, falloff_sq);
        let far = influence(pointer + Vec2::new(400.0, 0.0), pointer, falloff_sq);
        assert!(near > far);
        assert!(far > 0.0);
    }

    #[test]
    fn kinds_never_change_after_seeding() {
        let (cfg, mut field) = seeded_field();
        let kinds: Vec<_> = field.points.iter().map(|p| p.kind).collect();

        let mut pointer = PointerState::default();
        pointer.point_at(Vec2::splat(0.5));
        run_ticks(&mut field, &pointer, &cfg, 500);

        let after: Vec<_> = field.points.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, after);
    }

    #[test]
    fn frame_points_never_leave_the_viewport() {
        let (cfg, mut field) = seeded_field();
        let pointer = PointerState::default();
        let dt = 1.0 / 60.0;
        for i in 0..1000 {
            advance(&mut field, &pointer, i as f64 * dt as f64, dt, &cfg);
            for p in field.points.iter().filter(|p| p.kind == PointKind::Frame) {
                assert!((0.0..=field.width).contains(&p.pos.x), "x = {}", p.pos.x);
                assert!((0.0..=field.height).contains(&p.pos.y), "y = {}", p.pos.y);
            }
        }
    }

    #[test]
    fn drift_velocity_respects_the_ceiling() {
        let (cfg, mut field) = seeded_field();
        let pointer = PointerState::default();
        let dt = 1.0 / 60.0;
        for i in 0..1000 {
            advance(&mut field, &pointer, i as f64 * dt as f64, dt, &cfg);
            for p in field.points.iter().filter(|p| p.kind == PointKind::Drift) {
                assert!(p.vel.x.abs() <= cfg.drift_speed_limit + 1e-6);
                assert!(p.vel.y.abs() <= cfg.drift_speed_limit + 1e-6);
            }
        }
    }

    #[test]
    fn active_pointer_attracts_category_points() {
        let (cfg, base) = seeded_field();

        let mut with_pointer = base.clone();
        let mut without_pointer = base;
        let mut pointer = PointerState::default();
        pointer.point_at(Vec2::splat(0.5));
        let idle = PointerState::default();

        advance(&mut with_pointer, &pointer, 1.0, 1.0 / 60.0, &cfg);
        advance(&mut without_pointer, &idle, 1.0, 1.0 / 60.0, &cfg);

        let target = pointer.px(800.0, 600.0);
        for (a, b) in with_pointer
            .points
            .iter()
            .zip(without_pointer.points.iter())
            .filter(|(p, _)| p.kind == PointKind::Category)
        {
            // The attracted position is a lerp toward the pointer, so it can
            // only be closer than the undisturbed one.
            assert!(a.pos.distance_squared(target) < b.pos.distance_squared(target));
        }
    }

    #[test]
    fn peak_influence_is_zero_while_pointer_is_inactive() {
        let (cfg, mut field) = seeded_field();
        let pointer = PointerState::default();
        let peak = advance(&mut field, &pointer, 0.5, 1.0 / 60.0, &cfg);
        assert_eq!(peak, 0.0);
    }

    #[test]
    fn peak_influence_is_positive_near_an_active_pointer() {
        let (cfg, mut field) = seeded_field();
        let mut pointer = PointerState::default();
        pointer.point_at(Vec2::splat(0.5));
        let peak = advance(&mut field, &pointer, 0.5, 1.0 / 60.0, &cfg);
        assert!(peak > 0.0);
        assert!(peak <= 1.0);
    }
}
