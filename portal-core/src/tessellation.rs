//! Delaunay triangulation and clipped Voronoi geometry.
//!
//! A [`Tessellation`] is disposable derived state: it is rebuilt whole from
//! the live point positions whenever the sync layer decides a rebuild is
//! due, and never patched incrementally. Degenerate configurations never
//! raise; a cell that cannot produce a valid polygon is simply absent from
//! that rebuild's output.

use glam::Vec2;
use spade::{DelaunayTriangulation, Point2, Triangulation};
use tracing::{debug, warn};

/// One clipped Voronoi edge of the background mesh.
pub type Segment = [Vec2; 2];

pub struct Tessellation {
    triangulation: DelaunayTriangulation<Point2<f32>>,
    size: Vec2,
}

impl Tessellation {
    /// Triangulates the given positions, keeping the input order: vertex `i`
    /// of the triangulation corresponds to `positions[i]`.
    ///
    /// Returns `None` for zero-extent viewports, fewer than three points, a
    /// failed bulk load, or when the triangulation merged duplicate points
    /// (which would break the index correspondence the region extractor
    /// relies on). The caller keeps the previous frame's geometry in all of
    /// these cases.
    pub fn build(positions: &[Vec2], size: Vec2) -> Option<Self> {
        if size.x <= 0.0 || size.y <= 0.0 || positions.len() < 3 {
            return None;
        }
        let points: Vec<Point2<f32>> =
            positions.iter().map(|p| Point2::new(p.x, p.y)).collect();
        let triangulation = match DelaunayTriangulation::bulk_load_stable(points) {
            Ok(t) => t,
            Err(err) => {
                warn!(?err, "triangulation rejected the point set");
                return None;
            }
        };
        if triangulation.num_vertices() != positions.len() {
            warn!(
                input = positions.len(),
                kept = triangulation.num_vertices(),
                "duplicate points merged, abandoning this rebuild"
            );
            return None;
        }
        Some(Self {
            triangulation,
            size,
        })
    }

    /// The Voronoi cell polygon of the point seeded at `index`, clipped to
    /// the viewport rectangle, as a closed counter-clockwise vertex ring.
    ///
    /// `None` for hull cells (unbounded), collapsed cells, and non-finite
    /// circumcenters — the region is dropped from this frame.
    pub fn cell_polygon(&self, index: usize) -> Option<Vec<Vec2>> {
        let vertex = self
            .triangulation
            .vertices()
            .find(|v| v.fix().index() == index)?;
        let generator = vertex.position();

        let mut corners: Vec<Vec2> = Vec::new();
        for edge in vertex.out_edges() {
            let face = edge.face();
            if face.is_outer() {
                debug!(index, "hull cell is unbounded, dropped for this frame");
                return None;
            }
            if let Some(inner) = face.as_inner() {
                let cc = inner.circumcenter();
                if !cc.x.is_finite() || !cc.y.is_finite() {
                    debug!(index, "non-finite circumcenter, cell dropped");
                    return None;
                }
                corners.push(Vec2::new(cc.x, cc.y));
            }
        }
        if corners.len() < 3 {
            return None;
        }

        corners.sort_unstable_by(|a, b| {
            let angle_a = (a.y - generator.y).atan2(a.x - generator.x);
            let angle_b = (b.y - generator.y).atan2(b.x - generator.x);
            angle_a.total_cmp(&angle_b)
        });

        let clipped = clip_polygon_to_rect(&corners, self.size);
        (clipped.len() >= 3).then_some(clipped)
    }

    /// Every Voronoi edge of the partition clipped to the viewport, for the
    /// background mesh outline. Hull edges are extended as rays away from
    /// the triangulation before clipping.
    pub fn mesh_segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        for edge in self.triangulation.undirected_edges() {
            let directed = edge.as_directed();
            let face_a = directed.face();
            let face_b = directed.rev().face();

            match (face_a.as_inner(), face_b.as_inner()) {
                (Some(a), Some(b)) => {
                    let start = a.circumcenter();
                    let end = b.circumcenter();
                    let start = Vec2::new(start.x, start.y);
                    let end = Vec2::new(end.x, end.y);
                    if let Some(seg) = clip_segment(start, end, self.size) {
                        segments.push(seg);
                    }
                }
                (Some(inner), None) | (None, Some(inner)) => {
                    let cc = inner.circumcenter();
                    let start = Vec2::new(cc.x, cc.y);
                    if !start.is_finite() {
                        continue;
                    }
                    // The dual of a hull edge is a ray: perpendicular
                    // bisector of the edge, leaving the triangulation.
                    let va = directed.from().fix();
                    let vb = directed.to().fix();
                    let ga = to_vec2(directed.from().position());
                    let gb = to_vec2(directed.to().position());
                    let mid = (ga + gb) * 0.5;
                    let opposite = inner
                        .vertices()
                        .iter()
                        .find(|v| v.fix() != va && v.fix() != vb)
                        .map(|v| to_vec2(v.position()))
                        .unwrap_or(mid);

                    let edge_vec = gb - ga;
                    let mut normal = Vec2::new(-edge_vec.y, edge_vec.x).normalize_or_zero();
                    if normal == Vec2::ZERO {
                        continue;
                    }
                    if normal.dot(mid - opposite) < 0.0 {
                        normal = -normal;
                    }
                    let reach = (self.size.x + self.size.y) * 2.0;
                    let far = start + normal * reach;
                    if let Some(seg) = clip_segment(start, far, self.size) {
                        segments.push(seg);
                    }
                }
                (None, None) => {}
            }
        }
        segments
    }
}

fn to_vec2(p: Point2<f32>) -> Vec2 {
    Vec2::new(p.x, p.y)
}

/// Sutherland–Hodgman clip of a convex polygon against the viewport
/// rectangle `[0, size.x] × [0, size.y]`.
pub(crate) fn clip_polygon_to_rect(subject: &[Vec2], size: Vec2) -> Vec<Vec2> {
    let mut output: Vec<Vec2> = subject.to_vec();
    for edge in 0..4 {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        let n = input.len();
        for i in 0..n {
            let current = input[i];
            let previous = input[(i + n - 1) % n];
            let current_in = rect_inside(current, edge, size);
            let previous_in = rect_inside(previous, edge, size);
            if current_in {
                if !previous_in {
                    output.push(rect_intersect(previous, current, edge, size));
                }
                output.push(current);
            } else if previous_in {
                output.push(rect_intersect(previous, current, edge, size));
            }
        }
    }
    output
}

fn rect_inside(p: Vec2, edge: usize, size: Vec2) -> bool {
    match edge {
        0 => p.x >= 0.0,
        1 => p.x <= size.x,
        2 => p.y >= 0.0,
        _ => p.y <= size.y,
    }
}

fn rect_intersect(a: Vec2, b: Vec2, edge: usize, size: Vec2) -> Vec2 {
    match edge {
        0 => cross_vertical(a, b, 0.0),
        1 => cross_vertical(a, b, size.x),
        2 => cross_horizontal(a, b, 0.0),
        _ => cross_horizontal(a, b, size.y),
    }
}

fn cross_vertical(a: Vec2, b: Vec2, x: f32) -> Vec2 {
    let run = b.x - a.x;
    if run.abs() < f32::EPSILON {
        return Vec2::new(x, a.y);
    }
    Vec2::new(x, a.y + (b.y - a.y) * (x - a.x) / run)
}

fn cross_horizontal(a: Vec2, b: Vec2, y: f32) -> Vec2 {
    let rise = b.y - a.y;
    if rise.abs() < f32::EPSILON {
        return Vec2::new(a.x, y);
    }
    Vec2::new(a.x + (b.x - a.x) * (y - a.y) / rise, y)
}

const OUT_LEFT: u8 = 1;
const OUT_RIGHT: u8 = 2;
const OUT_LOW: u8 = 4;
const OUT_HIGH: u8 = 8;

fn outcode(p: Vec2, size: Vec2) -> u8 {
    let mut code = 0;
    if p.x < 0.0 {
        code |= OUT_LEFT;
    } else if p.x > size.x {
        code |= OUT_RIGHT;
    }
    if p.y < 0.0 {
        code |= OUT_LOW;
    } else if p.y > size.y {
        code |= OUT_HIGH;
    }
    code
}

/// Cohen–Sutherland clip of a line segment against the viewport rectangle.
pub(crate) fn clip_segment(mut a: Vec2, mut b: Vec2, size: Vec2) -> Option<Segment> {
    if !a.is_finite() || !b.is_finite() {
        return None;
    }
    let mut code_a = outcode(a, size);
    let mut code_b = outcode(b, size);
    loop {
        if (code_a | code_b) == 0 {
            return Some([a, b]);
        }
        if (code_a & code_b) != 0 {
            return None;
        }

        let out = if code_a != 0 { code_a } else { code_b };
        let d = b - a;
        let p = if (out & OUT_HIGH) != 0 {
            let x = if d.y.abs() > f32::EPSILON {
                a.x + d.x * (size.y - a.y) / d.y
            } else {
                a.x
            };
            Vec2::new(x, size.y)
        } else if (out & OUT_LOW) != 0 {
            let x = if d.y.abs() > f32::EPSILON {
                a.x + d.x * (0.0 - a.y) / d.y
            } else {
                a.x
            };
            Vec2::new(x, 0.0)
        } else if (out & OUT_RIGHT) != 0 {
            let y = if d.x.abs() > f32::EPSILON {
                a.y + d.y * (size.x - a.x) / d.x
            } else {
                a.y
            };
            Vec2::new(size.x, y)
        } else {
            let y = if d.x.abs() > f32::EPSILON {
                a.y + d.y * (0.0 - a.x) / d.x
            } else {
                a.y
            };
            Vec2::new(0.0, y)
        };

        if out == code_a {
            a = p;
            code_a = outcode(a, size);
        } else {
            b = p;
            code_b = outcode(b, size);
        }
    }
}
