//! Per-category region geometry derived from the Voronoi partition.

use crate::{config::DiagramConfig, tessellation::Tessellation};
use glam::Vec2;
use std::f32::consts::PI;
use tracing::debug;

/// Signed areas below this are treated as degenerate.
const AREA_EPSILON: f32 = 1e-5;
/// Fallback hit radius (as a fraction of min(width, height)) when the cell
/// area collapsed to zero.
const FALLBACK_RADIUS_RATIO: f32 = 0.03;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonMetrics {
    pub centroid: Vec2,
    pub area: f32,
}

/// Shoelace area and centroid of a closed polygon.
///
/// Near-zero areas fall back to the arithmetic vertex mean with area 0, so a
/// sliver never produces a centroid at infinity.
pub fn polygon_metrics(points: &[Vec2]) -> PolygonMetrics {
    let n = points.len();
    let mut area = 0.0f32;
    let mut cx = 0.0f32;
    let mut cy = 0.0f32;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    area *= 0.5;
    if area.abs() < AREA_EPSILON {
        let sum: Vec2 = points.iter().copied().sum();
        return PolygonMetrics {
            centroid: sum / n as f32,
            area: 0.0,
        };
    }
    PolygonMetrics {
        centroid: Vec2::new(cx, cy) / (6.0 * area),
        area: area.abs(),
    }
}

/// Drawable geometry for one category's cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Index into the fixed category list. This identity never changes, no
    /// matter how the geometry moves between rebuilds.
    pub category: usize,
    /// Closed outline ring in viewport coordinates.
    pub outline: Vec<Vec2>,
    /// Label anchor (polygon centroid).
    pub label: Vec2,
    /// Clamped hit-test radius around the label anchor.
    pub hit_radius: f32,
}

impl Region {
    pub fn hit_test(&self, p: Vec2) -> bool {
        self.label.distance_squared(p) <= self.hit_radius * self.hit_radius
    }
}

/// Extracts the regions of all categories whose Voronoi cell survived this
/// rebuild. A degenerate cell is omitted (never emitted with empty or NaN
/// geometry), so the result length is at most the category count.
pub fn extract_regions(tess: &Tessellation, cfg: &DiagramConfig, size: Vec2) -> Vec<Region> {
    let min_dim = size.min_element();
    let max_radius = cfg
        .min_hit_radius
        .max(min_dim * cfg.max_hit_radius_ratio);

    (0..cfg.categories.len())
        .filter_map(|category| {
            let Some(outline) = tess.cell_polygon(category) else {
                debug!(category, "cell degenerate this rebuild, region omitted");
                return None;
            };
            let metrics = polygon_metrics(&outline);
            let derived = if metrics.area > 0.0 {
                (metrics.area / PI).sqrt() * cfg.hit_radius_scale
            } else {
                min_dim * FALLBACK_RADIUS_RATIO
            };
            Some(Region {
                category,
                outline,
                label: metrics.centroid,
                hit_radius: derived.clamp(cfg.min_hit_radius, max_radius),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::PointField, rng::SeededRng};
    use approx::assert_abs_diff_eq;

    #[test]
    fn unit_square_metrics() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let m = polygon_metrics(&square);
        assert_abs_diff_eq!(m.area, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(m.centroid.x, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(m.centroid.y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn winding_direction_does_not_change_the_area() {
        let ccw = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let cw: Vec<Vec2> = ccw.iter().rev().copied().collect();
        let a = polygon_metrics(&ccw);
        let b = polygon_metrics(&cw);
        assert_abs_diff_eq!(a.area, b.area, epsilon = 1e-6);
        assert_abs_diff_eq!(a.centroid.x, b.centroid.x, epsilon = 1e-6);
        assert_abs_diff_eq!(a.centroid.y, b.centroid.y, epsilon = 1e-6);
    }

    #[test]
    fn collinear_polygon_falls_back_to_vertex_mean() {
        let sliver = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
        ];
        let m = polygon_metrics(&sliver);
        assert_eq!(m.area, 0.0);
        assert_abs_diff_eq!(m.centroid.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(m.centroid.y, 0.0, epsilon = 1e-6);
        assert!(m.centroid.is_finite());
    }

    #[test]
    fn hit_test_uses_the_clamped_radius() {
        let region = Region {
            category: 0,
            outline: vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)],
            label: Vec2::new(5.0, 5.0),
            hit_radius: 12.0,
        };
        assert!(region.hit_test(Vec2::new(5.0, 5.0)));
        assert!(region.hit_test(Vec2::new(16.0, 5.0)));
        assert!(!region.hit_test(Vec2::new(18.0, 5.0)));
    }

    #[test]
    fn regions_cover_at_most_the_category_count() {
        let cfg = DiagramConfig::default();
        let size = Vec2::new(800.0, 600.0);
        let mut rng = SeededRng::new(cfg.seed);
        let field = PointField::seeded(&cfg, size.x, size.y, &mut rng).expect("seeding");
        let tess = Tessellation::build(&field.positions(), size).expect("tessellation");

        let regions = extract_regions(&tess, &cfg, size);
        assert!(regions.len() <= cfg.categories.len());
        // With the default layout every category anchor is interior, so all
        // six cells should actually survive.
        assert_eq!(regions.len(), cfg.categories.len());

        for r in &regions {
            assert!(r.outline.len() >= 3);
            assert!(r.label.is_finite());
            assert!(r.hit_radius >= cfg.min_hit_radius);
            let max_radius = cfg
                .min_hit_radius
                .max(size.min_element() * cfg.max_hit_radius_ratio);
            assert!(r.hit_radius <= max_radius + 1e-6);
        }
    }

    #[test]
    fn region_identity_follows_seeding_order() {
        let cfg = DiagramConfig::default();
        let size = Vec2::new(800.0, 600.0);
        let mut rng = SeededRng::new(cfg.seed);
        let field = PointField::seeded(&cfg, size.x, size.y, &mut rng).expect("seeding");
        let tess = Tessellation::build(&field.positions(), size).expect("tessellation");

        let regions = extract_regions(&tess, &cfg, size);
        for (i, r) in regions.iter().enumerate() {
            assert_eq!(r.category, i);
            // The generator point must lie inside its own cell's hit area
            // neighborhood; at minimum the label anchor should be finite and
            // inside the viewport.
            assert!((0.0..=size.x).contains(&r.label.x));
            assert!((0.0..=size.y).contains(&r.label.y));
        }
    }
}
