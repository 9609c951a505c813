use flowdraw_model::Point;

use crate::geometry::Rect;
use crate::scene::Scene;

pub const NODE_BOUNDS_MARGIN: f64 = 4.0;
pub const LABEL_HALF_WIDTH: f64 = 50.0;
pub const LABEL_HALF_HEIGHT: f64 = 40.0;
pub const EXPORT_PADDING: f64 = 60.0;
pub const MAX_GRID_LINES_PER_AXIS: usize = 10_000;
pub const DEFAULT_BOUNDS: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

pub fn scene_bounds(scene: &Scene) -> Rect {
    let mut bounds: Option<Rect> = None;
    let mut finite = true;
    let mut grow = |rect: Rect| {
        finite &= rect.is_finite();
        bounds = Some(match bounds {
            Some(current) => current.union(&rect),
            None => rect,
        });
    };

    for node in &scene.nodes {
        grow(node.rect.expand(NODE_BOUNDS_MARGIN, NODE_BOUNDS_MARGIN));
    }
    for edge in &scene.edges {
        for point in edge.path.points() {
            grow(Rect::new(point.x, point.y, 0.0, 0.0));
        }
        if edge.has_label() {
            let anchor = edge.label_anchor;
            grow(Rect::new(
                anchor.x - LABEL_HALF_WIDTH,
                anchor.y - LABEL_HALF_HEIGHT,
                LABEL_HALF_WIDTH * 2.0,
                LABEL_HALF_HEIGHT * 2.0,
            ));
        }
    }

    match bounds {
        Some(rect) if finite && rect.is_finite() => rect,
        Some(_) => {
            tracing::warn!("scene bounds were not finite; using default box");
            DEFAULT_BOUNDS
        }
        None => DEFAULT_BOUNDS,
    }
}

pub fn export_viewport(scene: &Scene) -> Rect {
    scene_bounds(scene).expand(EXPORT_PADDING, EXPORT_PADDING)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
}

/// Grid lines at multiples of `grid_size` in world space, spanning `viewport`.
/// An axis that would need more than [`MAX_GRID_LINES_PER_AXIS`] lines, or
/// where one step no longer changes the coordinate, gets none.
pub fn grid_lines(viewport: &Rect, grid_size: f64) -> Vec<GridLine> {
    if grid_size <= 0.0 || !grid_size.is_finite() || !viewport.is_finite() {
        return Vec::new();
    }
    let mut lines: Vec<GridLine> = grid_positions(viewport.left(), viewport.right(), grid_size)
        .into_iter()
        .map(|x| GridLine {
            from: Point::new(x, viewport.top()),
            to: Point::new(x, viewport.bottom()),
        })
        .collect();
    lines.extend(
        grid_positions(viewport.top(), viewport.bottom(), grid_size)
            .into_iter()
            .map(|y| GridLine {
                from: Point::new(viewport.left(), y),
                to: Point::new(viewport.right(), y),
            }),
    );
    lines
}

fn grid_positions(low: f64, high: f64, grid_size: f64) -> Vec<f64> {
    let first = (low / grid_size).floor() * grid_size;
    let steps = ((high - first) / grid_size).floor();
    if !steps.is_finite() || steps < 0.0 || steps >= MAX_GRID_LINES_PER_AXIS as f64 {
        return Vec::new();
    }
    if first + grid_size == first || high + grid_size == high {
        tracing::debug!(first, grid_size, "grid step below float resolution; skipping axis");
        return Vec::new();
    }
    (0..=steps as usize)
        .map(|k| first + k as f64 * grid_size)
        .collect()
}
