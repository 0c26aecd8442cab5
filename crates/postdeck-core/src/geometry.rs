//! Coordinate conversions and box math shared by the controller, drawing
//! engine and rasterizer.

use kurbo::{Affine, Point, Rect, Size};

/// Convert a client-space (viewport) point to canvas-local coordinates.
pub fn client_to_local(client: Point, canvas_origin: Point) -> Point {
    (client - canvas_origin).to_point()
}

/// Rectangle spanned by two corners, normalized to its min corner with
/// non-negative extents.
pub fn normalized_rect(anchor: Point, current: Point) -> Rect {
    let x = anchor.x.min(current.x);
    let y = anchor.y.min(current.y);
    let width = (current.x - anchor.x).abs();
    let height = (current.y - anchor.y).abs();
    Rect::new(x, y, x + width, y + height)
}

/// Strict bounding-box overlap. Boxes that only touch along an edge do not
/// overlap.
pub fn boxes_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Rotation by `degrees` (clockwise on screen) about the center of `rect`.
pub fn rotation_about_center(rect: Rect, degrees: f64) -> Affine {
    if degrees == 0.0 {
        return Affine::IDENTITY;
    }
    let center = rect.center().to_vec2();
    Affine::translate(center) * Affine::rotate(degrees.to_radians()) * Affine::translate(-center)
}

/// Map a canvas-local point into the local space of a rotated box, with the
/// box's top-left at the origin.
pub fn canvas_to_box_local(point: Point, rect: Rect, degrees: f64) -> Point {
    let unrotated = rotation_about_center(rect, degrees).inverse() * point;
    Point::new(unrotated.x - rect.x0, unrotated.y - rect.y0)
}

/// Box size produced by dragging a resize handle to `pointer`, floored at
/// `min` on each axis.
pub fn resized_box(origin: Point, pointer: Point, min: Size) -> Size {
    Size::new(
        (pointer.x - origin.x).max(min.width),
        (pointer.y - origin.y).max(min.height),
    )
}

/// Number of device pixels backing `css` CSS pixels at `dpr`, at least one.
pub fn device_pixels(css: f64, dpr: f64) -> u32 {
    let px = (css * dpr).ceil();
    if px.is_finite() && px >= 1.0 {
        px.min(u32::MAX as f64) as u32
    } else {
        1
    }
}
