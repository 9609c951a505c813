use flowdraw_model::{EdgeId, NodeId, NodeShape, Point};

use crate::geometry::distance_to_segment;
use crate::scene::Scene;

pub const EDGE_HIT_TOLERANCE: f64 = 10.0;
const CURVE_SAMPLES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Node(NodeId),
    Edge(EdgeId),
}

pub fn hit_test(scene: &Scene, world: Point) -> Option<Hit> {
    if let Some(node) = scene.nodes.iter().rev().find(|node| {
        let rect = node.rect;
        match node.shape {
            NodeShape::Circle => {
                let c = rect.center();
                let rx = rect.width / 2.0;
                let ry = rect.height / 2.0;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let dx = (world.x - c.x) / rx;
                let dy = (world.y - c.y) / ry;
                dx * dx + dy * dy <= 1.0
            }
            _ => rect.contains(world),
        }
    }) {
        return Some(Hit::Node(node.id.clone()));
    }

    scene
        .edges
        .iter()
        .rev()
        .find(|edge| {
            edge.path
                .sample(CURVE_SAMPLES)
                .windows(2)
                .any(|pair| distance_to_segment(world, pair[0], pair[1]) <= EDGE_HIT_TOLERANCE)
        })
        .map(|edge| Hit::Edge(edge.id.clone()))
}
