use flowdraw_layout::{
    ARROW_HALF_WIDTH, ARROW_LENGTH, EDGE_LABEL_COLOR, EDGE_LABEL_RISE, EDGE_LABEL_SIZE, EdgePath,
    GRID_COLOR, GRID_LINE_WIDTH, NODE_LABEL_COLOR, NODE_LABEL_INSET, NODE_LABEL_LINE_HEIGHT,
    NODE_LABEL_SIZE, Outline, RING_OFFSET, RING_WIDTH, Rect, Rgba, Scene, SceneEdge, SceneNode,
    TOOL_DOT_COLOR, TOOL_DOT_OFFSET, TOOL_DOT_RADIUS, first_baseline, grid_lines, node_outline,
    wrap_words,
};
use flowdraw_model::Point;
use skia_safe::{Canvas, Color, Font, Paint, PaintStyle, PathBuilder, PathEffect};

use crate::{build_text_paint, to_color};

const LABEL_BACKING_PAD_X: f32 = 3.0;
const LABEL_BACKING_PAD_Y: f32 = 2.0;

fn pt(point: Point) -> skia_safe::Point {
    skia_safe::Point::new(point.x as f32, point.y as f32)
}

fn sk_rect(rect: &Rect) -> skia_safe::Rect {
    skia_safe::Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

fn color_of(text: &str) -> Color {
    to_color(Rgba::parse_or(text, Rgba::BLACK))
}

fn sized(font: &Font, size: f64) -> Font {
    let mut font = font.clone();
    font.set_size(size as f32);
    font
}

pub(crate) fn draw_grid(canvas: &Canvas, viewport: &Rect, grid_size: f64) {
    let mut paint = Paint::default();
    paint.set_style(PaintStyle::Stroke);
    paint.set_color(color_of(GRID_COLOR));
    paint.set_stroke_width(GRID_LINE_WIDTH as f32);

    canvas.save();
    canvas.clip_rect(sk_rect(viewport), None, None);
    for line in grid_lines(viewport, grid_size) {
        canvas.draw_line(pt(line.from), pt(line.to), &paint);
    }
    canvas.restore();
}

pub(crate) fn draw_edges(canvas: &Canvas, scene: &Scene, font: &Font) {
    let label_font = sized(font, EDGE_LABEL_SIZE);
    for edge in &scene.edges {
        draw_edge_path(canvas, edge);
        if edge.has_label() {
            draw_edge_label(canvas, edge, &label_font);
        }
    }
}

fn build_path(path: &EdgePath) -> skia_safe::Path {
    let mut builder = PathBuilder::new();
    builder.move_to(pt(path.start()));
    match *path {
        EdgePath::Line { end, .. } => {
            builder.line_to(pt(end));
        }
        EdgePath::Quadratic { control, end, .. } => {
            builder.quad_to(pt(control), pt(end));
        }
        EdgePath::Cubic { cp1, cp2, end, .. } => {
            builder.cubic_to(pt(cp1), pt(cp2), pt(end));
        }
    }
    builder.detach()
}

fn draw_edge_path(canvas: &Canvas, edge: &SceneEdge) {
    let appearance = &edge.appearance;
    let color = color_of(&appearance.stroke);

    let mut stroke = Paint::default();
    stroke.set_style(PaintStyle::Stroke);
    stroke.set_anti_alias(true);
    stroke.set_color(color);
    stroke.set_stroke_width(appearance.width as f32);
    if let Some([on, off]) = appearance.dash {
        stroke.set_path_effect(PathEffect::dash(&[on as f32, off as f32], 0.0));
    }
    canvas.draw_path(&build_path(&edge.path), &stroke);

    draw_arrowhead(canvas, &edge.path, color);
}

fn draw_arrowhead(canvas: &Canvas, path: &EdgePath, color: Color) {
    let Some([tip, left, right]) = path.arrowhead(ARROW_LENGTH, ARROW_HALF_WIDTH) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_style(PaintStyle::Fill);
    paint.set_anti_alias(true);
    paint.set_color(color);

    let mut builder = PathBuilder::new();
    builder.move_to(pt(tip));
    builder.line_to(pt(left));
    builder.line_to(pt(right));
    builder.close();
    canvas.draw_path(&builder.detach(), &paint);
}

fn draw_edge_label(canvas: &Canvas, edge: &SceneEdge, font: &Font) {
    let text_paint = build_text_paint(EDGE_LABEL_COLOR);
    let (text_width, _) = font.measure_str(&edge.label, Some(&text_paint));
    let size = EDGE_LABEL_SIZE as f32;
    let baseline = pt(edge.label_anchor.offset(0.0, -EDGE_LABEL_RISE));

    let mut backing = Paint::default();
    backing.set_style(PaintStyle::Fill);
    backing.set_color(Color::WHITE);
    canvas.draw_rect(
        skia_safe::Rect::from_xywh(
            baseline.x - text_width / 2.0 - LABEL_BACKING_PAD_X,
            baseline.y - size - LABEL_BACKING_PAD_Y,
            text_width + LABEL_BACKING_PAD_X * 2.0,
            size + LABEL_BACKING_PAD_Y * 3.0,
        ),
        &backing,
    );
    canvas.draw_str(
        &edge.label,
        (baseline.x - text_width / 2.0, baseline.y),
        font,
        &text_paint,
    );
}

pub(crate) fn draw_nodes(canvas: &Canvas, scene: &Scene, font: &Font) {
    let label_font = sized(font, NODE_LABEL_SIZE);
    for node in &scene.nodes {
        draw_node(canvas, node, &label_font);
    }
}

fn draw_outline(canvas: &Canvas, outline: &Outline, paint: &Paint) {
    match outline {
        Outline::RoundedRect { rect, radius } => {
            let r = *radius as f32;
            canvas.draw_round_rect(sk_rect(rect), r, r, paint);
        }
        Outline::Ellipse { rect } => {
            canvas.draw_oval(sk_rect(rect), paint);
        }
        Outline::Polygon { points } => {
            let Some((first, rest)) = points.split_first() else {
                return;
            };
            let mut builder = PathBuilder::new();
            builder.move_to(pt(*first));
            for point in rest {
                builder.line_to(pt(*point));
            }
            builder.close();
            canvas.draw_path(&builder.detach(), paint);
        }
    }
}

fn draw_node(canvas: &Canvas, node: &SceneNode, font: &Font) {
    let mut fill = Paint::default();
    fill.set_style(PaintStyle::Fill);
    fill.set_anti_alias(true);
    fill.set_color(color_of(&node.fill));
    draw_outline(canvas, &node_outline(node.shape, &node.rect, 0.0), &fill);

    if let Some(ring_color) = node.highlight.ring_color() {
        let mut ring = Paint::default();
        ring.set_style(PaintStyle::Stroke);
        ring.set_anti_alias(true);
        ring.set_color(color_of(ring_color));
        ring.set_stroke_width(RING_WIDTH as f32);
        draw_outline(
            canvas,
            &node_outline(node.shape, &node.rect, RING_OFFSET),
            &ring,
        );
    }

    draw_node_label(canvas, node, font);

    if node.has_tools() {
        let mut dot = Paint::default();
        dot.set_style(PaintStyle::Fill);
        dot.set_anti_alias(true);
        dot.set_color(color_of(TOOL_DOT_COLOR));
        canvas.draw_circle(
            pt(Point::new(
                node.rect.left() + TOOL_DOT_OFFSET,
                node.rect.top() + TOOL_DOT_OFFSET,
            )),
            TOOL_DOT_RADIUS as f32,
            &dot,
        );
    }
}

fn draw_node_label(canvas: &Canvas, node: &SceneNode, font: &Font) {
    let text_paint = build_text_paint(NODE_LABEL_COLOR);
    let max_width = (node.rect.width - NODE_LABEL_INSET * 2.0).max(0.0);
    let lines = wrap_words(&node.label, max_width, |text| {
        f64::from(font.measure_str(text, Some(&text_paint)).0)
    });
    if lines.is_empty() {
        return;
    }

    let center = node.rect.center();
    let step = NODE_LABEL_SIZE * NODE_LABEL_LINE_HEIGHT;
    let mut baseline = first_baseline(
        center.y,
        lines.len(),
        NODE_LABEL_SIZE,
        NODE_LABEL_LINE_HEIGHT,
    );
    for line in &lines {
        let (width, _) = font.measure_str(line, Some(&text_paint));
        canvas.draw_str(
            line,
            (center.x as f32 - width / 2.0, baseline as f32),
            font,
            &text_paint,
        );
        baseline += step;
    }
}
