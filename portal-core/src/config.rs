use crate::error::ConfigError;
use glam::Vec2;

/// Minimum number of frame anchors needed for a non-degenerate closed
/// partition boundary.
pub const MIN_FRAME_ANCHORS: usize = 6;

/// One navigation destination backing a diagram region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Category {
    pub slug: &'static str,
    pub title: &'static str,
}

/// Compile-time tuning for the whole diagram.
///
/// The numeric values are aesthetic defaults; correctness only depends on the
/// invariants checked by [`DiagramConfig::validate`].
#[derive(Clone, Debug)]
pub struct DiagramConfig {
    /// Ordered destination list. Seeding order of the category anchors matches
    /// this order exactly, which later maps partition cell index to category.
    pub categories: Vec<Category>,
    /// Number of radial spokes. A prime-leaning count reduces periodic
    /// banding in the mesh.
    pub spoke_count: usize,
    /// Radius of each spoke level as a fraction of the viewport half-diagonal.
    pub spoke_levels: Vec<f32>,
    /// Frame anchor positions as fractions of the viewport size.
    pub frame_anchors: Vec<Vec2>,
    /// Number of free-drifting filler points.
    pub drift_count: usize,
    /// Seed for the placement RNG.
    pub seed: i64,
    /// Category anchor circle radius as a fraction of min(width, height).
    pub anchor_radius_ratio: f32,

    /// Region rebuild interval while the pointer is active, in seconds.
    pub diagram_interval_active: f64,
    /// Region rebuild interval while the pointer is idle, in seconds.
    pub diagram_interval_idle: f64,
    /// Mesh outline rebuild interval while the pointer is active, in seconds.
    pub mesh_interval_active: f64,
    /// Mesh outline rebuild interval while the pointer is idle, in seconds.
    pub mesh_interval_idle: f64,

    /// Lower clamp for the per-region hit-test radius, in pixels.
    pub min_hit_radius: f32,
    /// Upper clamp for the hit-test radius as a fraction of min(width, height).
    pub max_hit_radius_ratio: f32,
    /// Scale applied to the area-derived radius `sqrt(area / π)`.
    pub hit_radius_scale: f32,

    /// Pointer falloff σ² as a fraction of min(width, height)².
    pub pointer_falloff_ratio: f32,
    /// Per-component ceiling for drift point velocity.
    pub drift_speed_limit: f32,
    /// Velocity retained when a drift point reflects off a viewport edge.
    pub drift_bounce_damping: f32,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                Category { slug: "about", title: "About" },
                Category { slug: "art", title: "Art" },
                Category { slug: "music", title: "Music" },
                Category { slug: "graphics", title: "Graphics" },
                Category { slug: "poems", title: "Poems" },
                Category { slug: "photos", title: "Photos" },
            ],
            spoke_count: 29,
            spoke_levels: vec![0.56, 0.86, 1.1],
            frame_anchors: vec![
                Vec2::new(0.5, 0.0),
                Vec2::new(1.0, 0.23),
                Vec2::new(1.0, 0.74),
                Vec2::new(0.5, 1.0),
                Vec2::new(0.0, 0.74),
                Vec2::new(0.0, 0.23),
                Vec2::new(0.18, 0.0),
                Vec2::new(0.82, 1.0),
            ],
            drift_count: 16,
            seed: 42,
            anchor_radius_ratio: 0.3,
            diagram_interval_active: 0.048,
            diagram_interval_idle: 0.090,
            mesh_interval_active: 0.080,
            mesh_interval_idle: 0.150,
            min_hit_radius: 12.0,
            max_hit_radius_ratio: 0.06,
            hit_radius_scale: 0.24,
            pointer_falloff_ratio: 0.2,
            drift_speed_limit: 0.22,
            drift_bounce_damping: 0.9,
        }
    }
}

impl DiagramConfig {
    /// Checks the invariants that seeding and tessellation rely on.
    ///
    /// Called once at session construction; a failure here is fatal and is
    /// never retried.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        if self.spoke_levels.is_empty() {
            return Err(ConfigError::NoSpokeLevels);
        }
        if self.frame_anchors.len() < MIN_FRAME_ANCHORS {
            return Err(ConfigError::TooFewFrameAnchors {
                needed: MIN_FRAME_ANCHORS,
                got: self.frame_anchors.len(),
            });
        }
        Ok(())
    }

    /// Total point budget for one seeded field.
    pub fn total_points(&self) -> usize {
        self.categories.len()
            + self.spoke_count * self.spoke_levels.len()
            + self.frame_anchors.len()
            + self.drift_count
    }
}
