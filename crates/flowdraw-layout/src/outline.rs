use flowdraw_model::{NodeShape, Point};

use crate::geometry::{Rect, hexagon_points};
use crate::style::{RECT_CORNER_RADIUS, ROUNDED_CORNER_RADIUS};

#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    RoundedRect { rect: Rect, radius: f64 },
    Ellipse { rect: Rect },
    Polygon { points: Vec<Point> },
}

pub fn node_outline(shape: NodeShape, rect: &Rect, inflate: f64) -> Outline {
    let rect = rect.expand(inflate, inflate);
    match shape {
        NodeShape::RoundedRect => Outline::RoundedRect {
            rect,
            radius: ROUNDED_CORNER_RADIUS + inflate,
        },
        NodeShape::Rect => Outline::RoundedRect {
            rect,
            radius: RECT_CORNER_RADIUS + inflate,
        },
        NodeShape::Circle => Outline::Ellipse { rect },
        NodeShape::Hexagon => Outline::Polygon {
            points: hexagon_points(&rect).to_vec(),
        },
    }
}
