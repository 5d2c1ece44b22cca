//! Stateless geometric collision predicates.
//!
//! Boundary conventions differ between the point tests and the shape-vs-shape
//! tests and are kept that way:
//!
//! - [`point_rect`] and [`point_circle`] are inclusive: a point on the edge is inside.
//! - [`rect_rect`] and [`circle_circle`] are exclusive: shapes that only touch do
//!   not collide.
//!
//! Rectangles are given as top-left corner plus width and height.

/// Point inside an axis-aligned rectangle, edges included.
pub fn point_rect(px: f32, py: f32, rx: f32, ry: f32, rw: f32, rh: f32) -> bool {
    px >= rx && px <= rx + rw && py >= ry && py <= ry + rh
}

/// Point inside a circle, boundary included.
pub fn point_circle(px: f32, py: f32, cx: f32, cy: f32, r: f32) -> bool {
    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy <= r * r
}

/// AABB overlap. Rectangles sharing only an edge do not collide.
#[allow(clippy::too_many_arguments)]
pub fn rect_rect(
    x1: f32,
    y1: f32,
    w1: f32,
    h1: f32,
    x2: f32,
    y2: f32,
    w2: f32,
    h2: f32,
) -> bool {
    x1 < x2 + w2 && x1 + w1 > x2 && y1 < y2 + h2 && y1 + h1 > y2
}

/// Circle overlap. Circles exactly touching do not collide.
pub fn circle_circle(x1: f32, y1: f32, r1: f32, x2: f32, y2: f32, r2: f32) -> bool {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt() < r1 + r2
}
