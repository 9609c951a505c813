mod svg;

pub use svg::render_svg;

use flowdraw_layout::{
    ArrowMarker, DELETE_AFFORDANCE_RADIUS, EDGE_LABEL_COLOR, EDGE_LABEL_RISE, EDGE_LABEL_SIZE,
    EdgePath, GRID_COLOR, GRID_LINE_WIDTH, HIT_STROKE_WIDTH, Hit, NODE_LABEL_COLOR,
    NODE_LABEL_INSET, NODE_LABEL_LINE_HEIGHT, NODE_LABEL_SIZE, Outline, RING_OFFSET, RING_WIDTH,
    Rect, Scene, SceneEdge, SceneNode, TOOL_DOT_COLOR, TOOL_DOT_OFFSET, TOOL_DOT_RADIUS,
    approximate_text_width, export_viewport, first_baseline, grid_lines, node_outline,
    wrap_words,
};
use flowdraw_model::Point;

const DELETE_COLOR: &str = "#EF4444";
const LABEL_BACKING_PAD_X: f64 = 3.0;
const LABEL_BACKING_PAD_Y: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct VectorRenderOptions {
    pub show_grid: bool,
    pub grid_size: f64,
    pub interactive: bool,
    pub viewport: Option<Rect>,
}

impl Default for VectorRenderOptions {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_size: 20.0,
            interactive: true,
            viewport: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    GridLine {
        from: Point,
        to: Point,
        color: &'static str,
        width: f64,
    },
    HitStroke {
        target: Hit,
        path: EdgePath,
        width: f64,
    },
    EdgeStroke {
        path: EdgePath,
        color: String,
        width: f64,
        dash: Option<[f64; 2]>,
        marker: ArrowMarker,
    },
    EdgeLabel {
        text: String,
        anchor: Point,
        backing: Rect,
        size: f64,
        color: &'static str,
    },
    NodeShape {
        target: Hit,
        outline: Outline,
        fill: String,
    },
    Ring {
        outline: Outline,
        color: &'static str,
        width: f64,
    },
    NodeLabel {
        lines: Vec<String>,
        center_x: f64,
        first_baseline: f64,
        line_step: f64,
        size: f64,
        color: &'static str,
    },
    ToolBadge {
        center: Point,
        radius: f64,
        color: &'static str,
        tooltip: String,
    },
    DeleteButton {
        target: Hit,
        center: Point,
        radius: f64,
        color: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub viewport: Rect,
    pub commands: Vec<DrawCommand>,
}

pub fn render_display_list(scene: &Scene, options: &VectorRenderOptions) -> DisplayList {
    let viewport = options.viewport.unwrap_or_else(|| export_viewport(scene));
    let mut commands = Vec::new();

    if options.show_grid {
        for line in grid_lines(&viewport, options.grid_size) {
            commands.push(DrawCommand::GridLine {
                from: line.from,
                to: line.to,
                color: GRID_COLOR,
                width: GRID_LINE_WIDTH,
            });
        }
    }

    for edge in &scene.edges {
        push_edge(&mut commands, edge, options);
    }
    for node in &scene.nodes {
        push_node(&mut commands, node, options);
    }

    DisplayList { viewport, commands }
}

fn push_edge(commands: &mut Vec<DrawCommand>, edge: &SceneEdge, options: &VectorRenderOptions) {
    if options.interactive {
        commands.push(DrawCommand::HitStroke {
            target: Hit::Edge(edge.id.clone()),
            path: edge.path,
            width: HIT_STROKE_WIDTH,
        });
    }
    commands.push(DrawCommand::EdgeStroke {
        path: edge.path,
        color: edge.appearance.stroke.clone(),
        width: edge.appearance.width,
        dash: edge.appearance.dash,
        marker: edge.appearance.marker,
    });

    if edge.has_label() {
        let anchor = edge.label_anchor.offset(0.0, -EDGE_LABEL_RISE);
        let width = approximate_text_width(&edge.label, EDGE_LABEL_SIZE);
        commands.push(DrawCommand::EdgeLabel {
            text: edge.label.clone(),
            anchor,
            backing: Rect::new(
                anchor.x - width / 2.0 - LABEL_BACKING_PAD_X,
                anchor.y - EDGE_LABEL_SIZE - LABEL_BACKING_PAD_Y,
                width + LABEL_BACKING_PAD_X * 2.0,
                EDGE_LABEL_SIZE + LABEL_BACKING_PAD_Y * 3.0,
            ),
            size: EDGE_LABEL_SIZE,
            color: EDGE_LABEL_COLOR,
        });
    }

    if options.interactive {
        if let Some(center) = edge.delete_affordance() {
            commands.push(DrawCommand::DeleteButton {
                target: Hit::Edge(edge.id.clone()),
                center,
                radius: DELETE_AFFORDANCE_RADIUS,
                color: DELETE_COLOR,
            });
        }
    }
}

fn push_node(commands: &mut Vec<DrawCommand>, node: &SceneNode, options: &VectorRenderOptions) {
    commands.push(DrawCommand::NodeShape {
        target: Hit::Node(node.id.clone()),
        outline: node_outline(node.shape, &node.rect, 0.0),
        fill: node.fill.clone(),
    });

    if let Some(color) = node.highlight.ring_color() {
        commands.push(DrawCommand::Ring {
            outline: node_outline(node.shape, &node.rect, RING_OFFSET),
            color,
            width: RING_WIDTH,
        });
    }

    let max_width = (node.rect.width - NODE_LABEL_INSET * 2.0).max(0.0);
    let lines = wrap_words(&node.label, max_width, |text| {
        approximate_text_width(text, NODE_LABEL_SIZE)
    });
    if !lines.is_empty() {
        let center = node.rect.center();
        commands.push(DrawCommand::NodeLabel {
            first_baseline: first_baseline(
                center.y,
                lines.len(),
                NODE_LABEL_SIZE,
                NODE_LABEL_LINE_HEIGHT,
            ),
            lines,
            center_x: center.x,
            line_step: NODE_LABEL_SIZE * NODE_LABEL_LINE_HEIGHT,
            size: NODE_LABEL_SIZE,
            color: NODE_LABEL_COLOR,
        });
    }

    if node.has_tools() {
        commands.push(DrawCommand::ToolBadge {
            center: Point::new(
                node.rect.left() + TOOL_DOT_OFFSET,
                node.rect.top() + TOOL_DOT_OFFSET,
            ),
            radius: TOOL_DOT_RADIUS,
            color: TOOL_DOT_COLOR,
            tooltip: format!("Tools: {}", node.tool_names.join(", ")),
        });
    }

    if options.interactive {
        if let Some(center) = node.delete_affordance() {
            commands.push(DrawCommand::DeleteButton {
                target: Hit::Node(node.id.clone()),
                center,
                radius: DELETE_AFFORDANCE_RADIUS,
                color: DELETE_COLOR,
            });
        }
    }
}
