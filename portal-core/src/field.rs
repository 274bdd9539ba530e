//! The animated point field.
//!
//! A [`PointField`] is a dense array of points with per-point kinetic
//! metadata, built in one pass from a [`SeededRng`] for a concrete viewport
//! size. It is rebuilt whole on every resize; kinds and counts never change
//! between rebuilds, only positions and velocities do (see
//! [`crate::motion`]).

use crate::{config::DiagramConfig, rng::SeededRng};
use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Kinetic behavior class of a point. Immutable after seeding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointKind {
    /// One per navigation destination; owns a Voronoi region.
    Category,
    /// Inner level of a radial spoke.
    SpokeInner,
    /// Outermost level of a radial spoke.
    SpokeOuter,
    /// Pinned near a viewport edge to anchor the partition boundary.
    Frame,
    /// Free filler point with its own velocity.
    Drift,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub pos: Vec2,
    pub kind: PointKind,
    /// Seeding-time polar angle about the viewport center (un-jittered).
    pub base_angle: f32,
    /// Seeding-time polar radius about the viewport center.
    pub base_radius: f32,
    pub phase: f32,
    pub speed_scale: f32,
    /// Unit vector perpendicular to the owning spoke; zero otherwise.
    pub perp: Vec2,
    /// Owning spoke index, or -1 for points not on a spoke.
    pub spoke: i16,
    /// 0 at the innermost spoke level, 1 at the outermost.
    pub spoke_progress: f32,
    /// Seeding-time position; the anchor Frame points are pulled toward.
    pub base_pos: Vec2,
    /// Only Drift points carry a velocity.
    pub vel: Vec2,
}

impl Point {
    fn at(pos: Vec2, kind: PointKind) -> Self {
        Self {
            pos,
            kind,
            base_angle: 0.0,
            base_radius: 0.0,
            phase: 0.0,
            speed_scale: 0.0,
            perp: Vec2::ZERO,
            spoke: -1,
            spoke_progress: 0.0,
            base_pos: pos,
            vel: Vec2::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointField {
    pub points: Vec<Point>,
    pub width: f32,
    pub height: f32,
}

impl PointField {
    /// Builds a fully populated field for the given viewport, or `None` when
    /// either dimension is zero (the caller retries on the next resize
    /// signal).
    ///
    /// Seeding order is fixed: category anchors first (matching the config's
    /// category order, so partition cell index maps back to category), then
    /// the spoke lattice, frame anchors, and drift filler. Every stochastic
    /// draw comes from `rng`, making the result reproducible per seed.
    pub fn seeded(
        cfg: &DiagramConfig,
        width: f32,
        height: f32,
        rng: &mut SeededRng,
    ) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }

        let min_dim = width.min(height);
        let diag_radius = width.hypot(height) * 0.5;
        let center = Vec2::new(width, height) * 0.5;
        let mut points = Vec::with_capacity(cfg.total_points());

        // Category anchors on a circle around the center, evenly spaced by
        // angle, perturbed by per-point jitter.
        let anchor_radius = min_dim * cfg.anchor_radius_ratio;
        for i in 0..cfg.categories.len() {
            let angle = (i as f32 / cfg.categories.len() as f32) * TAU - PI / 2.0;
            let jitter = min_dim * 0.028;
            let base_radius = anchor_radius * (0.95 + rng.next_unit() * 0.12);
            let phase = rng.next_angle();
            let speed_scale = 0.65 + rng.next_unit() * 0.38;
            let pos = center
                + Vec2::from_angle(angle) * base_radius
                + Vec2::new(rng.next_signed(jitter), rng.next_signed(jitter));
            let mut p = Point::at(pos, PointKind::Category);
            p.base_angle = angle;
            p.base_radius = base_radius;
            p.phase = phase;
            p.speed_scale = speed_scale;
            points.push(p);
        }

        // Spoke lattice: evenly spaced angles plus one random global
        // rotation; jitter grows with the level index.
        let base_rotation = rng.next_angle();
        let levels = cfg.spoke_levels.len();
        for spoke in 0..cfg.spoke_count {
            let angle = base_rotation + (spoke as f32 / cfg.spoke_count as f32) * TAU;
            let dir = Vec2::from_angle(angle);
            let perp = Vec2::new(-dir.y, dir.x);

            for (li, &level) in cfg.spoke_levels.iter().enumerate() {
                let scaled = level * (0.94 + rng.next_unit() * 0.05);
                let radius = diag_radius * scaled;
                let lateral_jitter = min_dim * (0.008 + li as f32 * 0.004);
                let along_jitter = min_dim * 0.008;
                let perp_offset = rng.next_signed(lateral_jitter);
                let along_offset = rng.next_signed(along_jitter);
                let pos = center + dir * (radius + along_offset) + perp * perp_offset;

                let kind = if li + 1 < levels {
                    PointKind::SpokeInner
                } else {
                    PointKind::SpokeOuter
                };
                let mut p = Point::at(pos, kind);
                p.base_angle = angle;
                p.base_radius = radius;
                p.phase = rng.next_angle();
                p.speed_scale = 0.45 + rng.next_unit() * 0.64;
                p.perp = perp;
                p.spoke = spoke as i16;
                p.spoke_progress = if levels > 1 {
                    li as f32 / (levels - 1) as f32
                } else {
                    0.0
                };
                points.push(p);
            }
        }

        // Frame anchors pinned at fixed fractional coordinates.
        for anchor in &cfg.frame_anchors {
            let pos = Vec2::new(width * anchor.x, height * anchor.y);
            let mut p = Point::at(pos, PointKind::Frame);
            p.phase = rng.next_angle();
            p.speed_scale = 0.24 + rng.next_unit() * 0.28;
            points.push(p);
        }

        // Drift filler: random positions, small random velocities.
        for _ in 0..cfg.drift_count {
            let pos = Vec2::new(rng.next_unit() * width, rng.next_unit() * height);
            let mut p = Point::at(pos, PointKind::Drift);
            p.vel = Vec2::new(rng.next_signed(0.2), rng.next_signed(0.2));
            p.phase = rng.next_angle();
            p.speed_scale = 0.3 + rng.next_unit() * 0.4;
            points.push(p);
        }

        Some(Self {
            points,
            width,
            height,
        })
    }

    pub fn min_dim(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// Current positions of all points, in seeding order.
    pub fn positions(&self) -> Vec<Vec2> {
        self.points.iter().map(|p| p.pos).collect()
    }
}
