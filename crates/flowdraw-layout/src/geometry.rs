use std::f64::consts::PI;

use flowdraw_model::{NodeId, Point};
use serde::{Deserialize, Serialize};

/// Gap left between a node outline and the edge endpoint.
pub const BOUNDARY_BUFFER: f64 = 5.0;
pub const SELF_LOOP_RADIUS: f64 = 40.0;
pub const SELF_LOOP_ANGLE: f64 = PI / 6.0;
pub const REVERSE_EDGE_OFFSET: f64 = 8.0;
pub const REVERSE_EDGE_CURVATURE: f64 = 40.0;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 3.0;
const MIN_ZOOM_PERCENT: i64 = 10;
const MAX_ZOOM_PERCENT: i64 = 300;
const ZOOM_STEP_PERCENT: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(min: Point, max: Point) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn expand(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.x - dx,
            self.y - dy,
            self.width + dx * 2.0,
            self.height + dy * 2.0,
        )
    }

    pub fn union(&self, other: &Rect) -> Self {
        let min = Point::new(self.left().min(other.left()), self.top().min(other.top()));
        let max = Point::new(
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        );
        Self::from_corners(min, max)
    }

    pub fn include(&self, point: Point) -> Self {
        self.union(&Rect::new(point.x, point.y, 0.0, 0.0))
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

pub fn snap_to_grid(point: Point, grid_size: f64, enabled: bool) -> Point {
    if !enabled || grid_size <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Where a ray from the rectangle's centre at `angle` leaves the rectangle,
/// pushed out by [`BOUNDARY_BUFFER`]. The target side walks the ray backwards.
pub fn rectangle_boundary_point(rect: &Rect, angle: f64, is_source_side: bool) -> Point {
    let center = rect.center();
    let (sin, cos) = angle.sin_cos();
    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;

    let t = if cos.abs() * half_h > sin.abs() * half_w {
        (half_w + BOUNDARY_BUFFER) / cos.abs()
    } else {
        (half_h + BOUNDARY_BUFFER) / sin.abs()
    };
    let sign = if is_source_side { 1.0 } else { -1.0 };
    Point::new(center.x + sign * cos * t, center.y + sign * sin * t)
}

pub fn straight_edge_endpoints(source: &Rect, target: &Rect) -> (Point, Point) {
    let from = source.center();
    let to = target.center();
    let angle = (to.y - from.y).atan2(to.x - from.x);
    (
        rectangle_boundary_point(source, angle, true),
        rectangle_boundary_point(target, angle, false),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfLoopGeometry {
    pub start: Point,
    pub end: Point,
    pub cp1: Point,
    pub cp2: Point,
    pub label: Point,
}

pub fn self_loop_geometry(rect: &Rect) -> SelfLoopGeometry {
    let center = rect.center();
    let radius = rect.width.max(rect.height) / 2.0 + BOUNDARY_BUFFER;
    let on_circle = |angle: f64| {
        Point::new(
            center.x + angle.cos() * radius,
            center.y + angle.sin() * radius,
        )
    };
    let start = on_circle(-SELF_LOOP_ANGLE);
    let end = on_circle(SELF_LOOP_ANGLE);

    SelfLoopGeometry {
        start,
        end,
        cp1: Point::new(center.x + SELF_LOOP_RADIUS * 2.0, start.y - SELF_LOOP_RADIUS),
        cp2: Point::new(center.x + SELF_LOOP_RADIUS * 2.0, end.y + SELF_LOOP_RADIUS),
        label: Point::new(center.x + SELF_LOOP_RADIUS * 1.5, center.y),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseEdgeGeometry {
    pub start: Point,
    pub end: Point,
    pub control: Point,
    pub label: Point,
}

impl ReverseEdgeGeometry {
    pub fn curvature_sign(&self) -> f64 {
        let mid_y = (self.start.y + self.end.y) / 2.0;
        (self.control.y - mid_y).signum()
    }
}

/// One of a pair of opposite edges between the same two nodes. The edge whose
/// source id sorts first bows up, the other bows down.
pub fn paired_reverse_edge_geometry(
    source_point: Point,
    target_point: Point,
    source_id: &NodeId,
    target_id: &NodeId,
) -> ReverseEdgeGeometry {
    let curve_up = source_id < target_id;
    let direction = if curve_up { -1.0 } else { 1.0 };
    let offset = direction * REVERSE_EDGE_OFFSET;

    let start = source_point.offset(0.0, offset);
    let end = target_point.offset(0.0, offset);
    let mid = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);

    ReverseEdgeGeometry {
        start,
        end,
        control: Point::new(mid.x, mid.y + direction * REVERSE_EDGE_CURVATURE),
        label: Point::new(mid.x, mid.y + direction * REVERSE_EDGE_CURVATURE * 0.5),
    }
}

pub fn hexagon_points(rect: &Rect) -> [Point; 6] {
    let quarter = rect.width / 4.0;
    let mid_y = rect.y + rect.height / 2.0;
    [
        Point::new(rect.left(), mid_y),
        Point::new(rect.left() + quarter, rect.top()),
        Point::new(rect.right() - quarter, rect.top()),
        Point::new(rect.right(), mid_y),
        Point::new(rect.right() - quarter, rect.bottom()),
        Point::new(rect.left() + quarter, rect.bottom()),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}

pub fn zoom_around_point(
    current_zoom: f64,
    current_pan: Point,
    cursor: Point,
    direction: ZoomDirection,
) -> (f64, Point) {
    let zoom = clamp_zoom(current_zoom);
    let percent = (zoom * 100.0).round() as i64;
    let step = match direction {
        ZoomDirection::In => ZOOM_STEP_PERCENT,
        ZoomDirection::Out => -ZOOM_STEP_PERCENT,
    };
    let new_zoom = (percent + step).clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT) as f64 / 100.0;
    let delta = new_zoom - zoom;
    let pan = Point::new(
        current_pan.x - (cursor.x - current_pan.x) * delta / zoom,
        current_pan.y - (cursor.y - current_pan.y) * delta / zoom,
    );
    (new_zoom, pan)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ORIGIN,
        }
    }
}

impl ViewTransform {
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.pan.x,
            world.y * self.zoom + self.pan.y,
        )
    }

    pub fn zoom_at(&mut self, cursor: Point, direction: ZoomDirection) {
        let (zoom, pan) = zoom_around_point(self.zoom, self.pan, cursor, direction);
        self.zoom = zoom;
        self.pan = pan;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = self.pan.offset(dx, dy);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub(crate) fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

pub(crate) fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-12 {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + dx * t, a.y + dy * t))
}
