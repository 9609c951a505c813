use flowdraw_model::{Edge, EdgeId, Graph, Node, NodeId, NodeKind, NodeShape, Point, Selection};

use crate::geometry::{
    Rect, distance, paired_reverse_edge_geometry, self_loop_geometry, straight_edge_endpoints,
};
use crate::style::{EdgeAppearance, Highlight, edge_appearance};

pub const DELETE_AFFORDANCE_RADIUS: f64 = 10.0;
pub const EDGE_DELETE_DROP: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgePath {
    Line {
        start: Point,
        end: Point,
    },
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
    Cubic {
        start: Point,
        cp1: Point,
        cp2: Point,
        end: Point,
    },
}

impl EdgePath {
    pub fn start(&self) -> Point {
        match *self {
            EdgePath::Line { start, .. }
            | EdgePath::Quadratic { start, .. }
            | EdgePath::Cubic { start, .. } => start,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            EdgePath::Line { end, .. }
            | EdgePath::Quadratic { end, .. }
            | EdgePath::Cubic { end, .. } => end,
        }
    }

    pub fn points(&self) -> Vec<Point> {
        match *self {
            EdgePath::Line { start, end } => vec![start, end],
            EdgePath::Quadratic {
                start,
                control,
                end,
            } => vec![start, control, end],
            EdgePath::Cubic {
                start,
                cp1,
                cp2,
                end,
            } => vec![start, cp1, cp2, end],
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        match *self {
            EdgePath::Line { start, end } => Point::new(
                start.x + (end.x - start.x) * t,
                start.y + (end.y - start.y) * t,
            ),
            EdgePath::Quadratic {
                start,
                control,
                end,
            } => Point::new(
                mt * mt * start.x + 2.0 * mt * t * control.x + t * t * end.x,
                mt * mt * start.y + 2.0 * mt * t * control.y + t * t * end.y,
            ),
            EdgePath::Cubic {
                start,
                cp1,
                cp2,
                end,
            } => {
                let a = mt * mt * mt;
                let b = 3.0 * mt * mt * t;
                let c = 3.0 * mt * t * t;
                let d = t * t * t;
                Point::new(
                    a * start.x + b * cp1.x + c * cp2.x + d * end.x,
                    a * start.y + b * cp1.y + c * cp2.y + d * end.y,
                )
            }
        }
    }

    pub fn sample(&self, segments: usize) -> Vec<Point> {
        if let EdgePath::Line { start, end } = *self {
            return vec![start, end];
        }
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    pub fn end_direction(&self) -> Option<(f64, f64)> {
        let end = self.end();
        let points = self.points();
        let from = points
            .iter()
            .rev()
            .skip(1)
            .find(|p| distance(**p, end) > 1e-9)?;
        let len = distance(*from, end);
        Some(((end.x - from.x) / len, (end.y - from.y) / len))
    }

    pub fn arrowhead(&self, length: f64, half_width: f64) -> Option<[Point; 3]> {
        let (ux, uy) = self.end_direction()?;
        let tip = self.end();
        let base = Point::new(tip.x - ux * length, tip.y - uy * length);
        Some([
            tip,
            Point::new(base.x - uy * half_width, base.y + ux * half_width),
            Point::new(base.x + uy * half_width, base.y - ux * half_width),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    pub path: EdgePath,
    pub label: Point,
}

pub fn node_rect(node: &Node) -> Rect {
    Rect::new(node.x, node.y, node.width, node.height)
}

pub fn edge_geometry(graph: &Graph, edge: &Edge) -> Option<EdgeGeometry> {
    let source = graph.node(&edge.source)?;
    let target = graph.node(&edge.target)?;
    let source_rect = node_rect(source);

    if edge.is_self_loop() {
        let l = self_loop_geometry(&source_rect);
        return Some(EdgeGeometry {
            path: EdgePath::Cubic {
                start: l.start,
                cp1: l.cp1,
                cp2: l.cp2,
                end: l.end,
            },
            label: l.label,
        });
    }

    let (start, end) = straight_edge_endpoints(&source_rect, &node_rect(target));
    if graph.has_reverse_edge(edge) {
        let curve = paired_reverse_edge_geometry(start, end, &edge.source, &edge.target);
        return Some(EdgeGeometry {
            path: EdgePath::Quadratic {
                start: curve.start,
                control: curve.control,
                end: curve.end,
            },
            label: curve.label,
        });
    }

    Some(EdgeGeometry {
        path: EdgePath::Line { start, end },
        label: Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub shape: NodeShape,
    pub rect: Rect,
    pub fill: String,
    pub label: String,
    pub highlight: Highlight,
    pub tool_names: Vec<String>,
}

impl SceneNode {
    pub fn has_tools(&self) -> bool {
        !self.tool_names.is_empty()
    }

    pub fn delete_affordance(&self) -> Option<Point> {
        (self.highlight == Highlight::Selected).then(|| {
            Point::new(self.rect.right() - 2.0, self.rect.top() + 2.0)
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub path: EdgePath,
    pub label: String,
    pub label_anchor: Point,
    pub appearance: EdgeAppearance,
    pub selected: bool,
}

impl SceneEdge {
    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }

    pub fn delete_affordance(&self) -> Option<Point> {
        self.selected
            .then(|| self.label_anchor.offset(0.0, EDGE_DELETE_DROP))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

pub fn layout_scene(graph: &Graph, selection: &Selection) -> Scene {
    let edges = graph
        .edges
        .iter()
        .filter_map(|edge| {
            let geometry = edge_geometry(graph, edge)?;
            let selected = selection.is_edge_selected(&edge.id);
            Some(SceneEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                path: geometry.path,
                label: edge.label.clone(),
                label_anchor: geometry.label,
                appearance: edge_appearance(edge, selected),
                selected,
            })
        })
        .collect();

    let nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let highlight = if selection.is_node_selected(&node.id) {
                Highlight::Selected
            } else if selection.is_node_member(&node.id) {
                Highlight::MultiSelected
            } else {
                Highlight::None
            };
            SceneNode {
                id: node.id.clone(),
                kind: node.kind,
                shape: node.shape,
                rect: node_rect(node),
                fill: node.color.clone(),
                label: node.label.clone(),
                highlight,
                tool_names: graph.tools_of(node).map(|tool| tool.name.clone()).collect(),
            }
        })
        .collect();

    Scene { nodes, edges }
}
