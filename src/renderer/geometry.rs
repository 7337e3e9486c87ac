//! Wireframe geometry for the floating shapes
//!
//! Every builder returns a line list (pairs of vertices). Tube shapes are
//! drawn as their ring/segment grid; polyhedra as their edges.

use glam::Vec3;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::scene::ShapeKind;

/// Torus: ring radius and tube radius relative to object scale
const RING_RADIUS: f32 = 0.8;
const RING_TUBE: f32 = 0.2;
const RING_SEGMENTS: usize = 64;

/// Torus knot (p, q) = (2, 3)
const KNOT_RADIUS: f32 = 0.5;
const KNOT_TUBE: f32 = 0.15;
const KNOT_TUBULAR_SEGMENTS: usize = 100;
const KNOT_RADIAL_SEGMENTS: usize = 16;
const KNOT_P: f32 = 2.0;
const KNOT_Q: f32 = 3.0;

/// Circumradius of both polyhedra
const POLYHEDRON_RADIUS: f32 = 0.7;

/// Build the wireframe line list for a shape at the given scale
pub fn wireframe(kind: ShapeKind, scale: f32) -> Vec<Vertex> {
    match kind {
        ShapeKind::Ring => torus(RING_RADIUS * scale, RING_TUBE * scale, RING_SEGMENTS, RING_SEGMENTS),
        ShapeKind::Knot => torus_knot(
            KNOT_RADIUS * scale,
            KNOT_TUBE * scale,
            KNOT_TUBULAR_SEGMENTS,
            KNOT_RADIAL_SEGMENTS,
        ),
        ShapeKind::Octahedron => polyhedron(&octahedron_vertices(), POLYHEDRON_RADIUS * scale),
        ShapeKind::Icosahedron => polyhedron(&icosahedron_vertices(), POLYHEDRON_RADIUS * scale),
    }
}

/// Connect a (rows+1) x (cols+1) grid of points with lines along both directions
fn grid_lines(points: &[(Vec3, Vec3)], rows: usize, cols: usize) -> Vec<Vertex> {
    let stride = cols + 1;
    let vertex = |i: usize, j: usize| {
        let (p, n) = points[i * stride + j];
        Vertex::new(p.to_array(), n.to_array())
    };

    let mut lines = Vec::with_capacity(rows * cols * 4);
    for i in 0..rows {
        for j in 0..cols {
            lines.push(vertex(i, j));
            lines.push(vertex(i + 1, j));
            lines.push(vertex(i, j));
            lines.push(vertex(i, j + 1));
        }
    }
    lines
}

/// Torus around the z axis
fn torus(radius: f32, tube: f32, radial_segments: usize, tubular_segments: usize) -> Vec<Vertex> {
    let mut points = Vec::with_capacity((radial_segments + 1) * (tubular_segments + 1));
    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let p = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            points.push((p, (p - center).normalize_or_zero()));
        }
    }
    grid_lines(&points, radial_segments, tubular_segments)
}

fn knot_curve(u: f32, radius: f32) -> Vec3 {
    let qu_over_p = KNOT_Q / KNOT_P * u;
    let cs = qu_over_p.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * qu_over_p.sin() * 0.5,
    )
}

/// Tube swept along a (p, q) torus knot
fn torus_knot(radius: f32, tube: f32, tubular_segments: usize, radial_segments: usize) -> Vec<Vertex> {
    let mut points = Vec::with_capacity((tubular_segments + 1) * (radial_segments + 1));
    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * KNOT_P * TAU;
        let p1 = knot_curve(u, radius);
        let p2 = knot_curve(u + 0.01, radius);

        // Frame along the curve
        let tangent = p2 - p1;
        let binormal = tangent.cross(p2 + p1).normalize_or_zero();
        let normal = binormal.cross(tangent).normalize_or_zero();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let p = p1 + normal * cx + binormal * cy;
            points.push((p, (p - p1).normalize_or_zero()));
        }
    }
    grid_lines(&points, tubular_segments, radial_segments)
}

fn octahedron_vertices() -> Vec<Vec3> {
    vec![Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z]
}

fn icosahedron_vertices() -> Vec<Vec3> {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    vec![
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
}

/// Edges of a regular polyhedron: every vertex pair at the shortest distance
fn polyhedron(corners: &[Vec3], radius: f32) -> Vec<Vertex> {
    let dirs: Vec<Vec3> = corners.iter().map(|c| c.normalize()).collect();

    let mut edge_length = f32::MAX;
    for (i, a) in dirs.iter().enumerate() {
        for b in &dirs[i + 1..] {
            edge_length = edge_length.min(a.distance(*b));
        }
    }

    let mut lines = Vec::new();
    for (i, a) in dirs.iter().enumerate() {
        for b in &dirs[i + 1..] {
            if (a.distance(*b) - edge_length).abs() < 1e-4 {
                lines.push(Vertex::new((*a * radius).to_array(), a.to_array()));
                lines.push(Vertex::new((*b * radius).to_array(), b.to_array()));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_extent(lines: &[Vertex]) -> f32 {
        lines
            .iter()
            .map(|v| Vec3::from_array(v.position).length())
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_polyhedron_edge_counts() {
        assert_eq!(wireframe(ShapeKind::Octahedron, 1.0).len(), 12 * 2);
        assert_eq!(wireframe(ShapeKind::Icosahedron, 1.0).len(), 30 * 2);
    }

    #[test]
    fn test_polyhedra_on_circumsphere() {
        for kind in [ShapeKind::Octahedron, ShapeKind::Icosahedron] {
            for v in wireframe(kind, 2.0) {
                let r = Vec3::from_array(v.position).length();
                assert!((r - 1.4).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_torus_grid() {
        let lines = wireframe(ShapeKind::Ring, 1.0);
        assert_eq!(lines.len(), RING_SEGMENTS * RING_SEGMENTS * 4);
        assert!(max_extent(&lines) <= (RING_RADIUS + RING_TUBE) + 1e-4);
    }

    #[test]
    fn test_knot_grid() {
        let lines = wireframe(ShapeKind::Knot, 1.0);
        assert_eq!(lines.len(), KNOT_TUBULAR_SEGMENTS * KNOT_RADIAL_SEGMENTS * 4);
        assert!(lines.iter().all(|v| Vec3::from_array(v.position).is_finite()));
    }

    #[test]
    fn test_scale_grows_shape() {
        let small = max_extent(&wireframe(ShapeKind::Ring, 1.0));
        let large = max_extent(&wireframe(ShapeKind::Ring, 1.5));
        assert!((large / small - 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_normals_are_unit() {
        for kind in ShapeKind::ALL {
            for v in wireframe(kind, 1.0) {
                let n = Vec3::from_array(v.normal).length();
                assert!((n - 1.0).abs() < 1e-3, "{kind:?} normal length {n}");
            }
        }
    }
}
