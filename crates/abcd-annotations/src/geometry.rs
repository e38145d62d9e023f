//! Surface-area helpers for normalized boxes and polygons.
//!
//! Areas are returned in percent of the frame (a full-frame box is 100).

use abcd_models::{NormalizedBoundingBox, NormalizedVertex};
use tracing::debug;

/// How missing box edges are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDefault {
    /// Missing edges sit on the frame border (left/top 0, right/bottom 1).
    FrameEdges,
    /// Missing edges are 0.
    Zero,
}

/// Area of a quadrilateral from its four vertices, in percent of the frame.
///
/// The polygon is split into four triangles anchored at the origin. Any
/// vertex count other than four yields 0.
pub fn polygon_area(vertices: &[NormalizedVertex]) -> f64 {
    if vertices.len() != 4 {
        debug!(vertices = vertices.len(), "Polygon does not have 4 vertices, area is 0");
        return 0.0;
    }

    let area: f64 = (0..4)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % 4];
            0.5 * (a.x * b.y - b.x * a.y).abs()
        })
        .sum();

    area * 100.0
}

/// Area of a normalized box, in percent of the frame.
pub fn box_area(bbox: &NormalizedBoundingBox, defaults: EdgeDefault) -> f64 {
    let (left, top, right, bottom) = match defaults {
        EdgeDefault::FrameEdges => (
            bbox.left.unwrap_or(0.0),
            bbox.top.unwrap_or(0.0),
            bbox.right.unwrap_or(1.0),
            bbox.bottom.unwrap_or(1.0),
        ),
        EdgeDefault::Zero => (
            bbox.left.unwrap_or(0.0),
            bbox.top.unwrap_or(0.0),
            bbox.right.unwrap_or(0.0),
            bbox.bottom.unwrap_or(0.0),
        ),
    };

    (right - left) * (bottom - top) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> NormalizedVertex {
        NormalizedVertex { x, y }
    }

    #[test]
    fn test_unit_square_is_100() {
        let square = [v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)];
        assert!((polygon_area(&square) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_box_polygon() {
        let quad = [v(0.1, 0.1), v(0.3, 0.1), v(0.3, 0.2), v(0.1, 0.2)];
        assert!(polygon_area(&quad) > 0.0);
        assert!(polygon_area(&quad) < 100.0);
    }

    #[test]
    fn test_wrong_vertex_count_is_zero() {
        assert_eq!(polygon_area(&[v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0)]), 0.0);
        assert_eq!(polygon_area(&[]), 0.0);
    }

    #[test]
    fn test_box_area_defaults() {
        let partial = NormalizedBoundingBox {
            left: Some(0.5),
            top: Some(0.5),
            right: None,
            bottom: None,
        };
        assert!((box_area(&partial, EdgeDefault::FrameEdges) - 25.0).abs() < 1e-9);

        let corner = NormalizedBoundingBox {
            left: None,
            top: None,
            right: Some(0.4),
            bottom: Some(0.4),
        };
        assert!((box_area(&corner, EdgeDefault::Zero) - 16.0).abs() < 1e-9);

        let full = NormalizedBoundingBox::default();
        assert!((box_area(&full, EdgeDefault::FrameEdges) - 100.0).abs() < 1e-9);
        assert_eq!(box_area(&full, EdgeDefault::Zero), 0.0);
    }
}
