use chrono::{TimeZone, Utc};
use flowdraw_layout::{
    ArrowMarker, DEFAULT_BOUNDS, EdgePath, Highlight, Hit, ImageExportOptions, ImageFormat,
    MAX_GRID_LINES_PER_AXIS, Rect,
    edge_appearance, export_file_name, export_viewport, grid_lines, hit_test, layout_scene,
    scene_bounds,
};
use flowdraw_model::{
    EdgeKind, EdgePatch, EdgeStyle, Graph, NodeId, NodeKind, Point, Selection, import_design,
};

fn pair() -> (Graph, NodeId, NodeId) {
    let mut graph = Graph::new();
    let a = graph.add_node(NodeKind::Generic, Point::new(0.0, 0.0));
    let b = graph.add_node(NodeKind::Generic, Point::new(300.0, 0.0));
    (graph, a, b)
}

#[test]
fn single_edge_is_a_straight_line() {
    let (mut graph, a, b) = pair();
    graph.add_edge(&a, &b, EdgeKind::Plain, false).expect("edge");
    let scene = layout_scene(&graph, &Selection::None);

    assert_eq!(scene.edges.len(), 1);
    let edge = &scene.edges[0];
    match edge.path {
        EdgePath::Line { start, end } => {
            assert_eq!(start, Point::new(125.0, 30.0));
            assert_eq!(end, Point::new(295.0, 30.0));
        }
        other => panic!("expected a line, got {other:?}"),
    }
    assert_eq!(edge.label_anchor, Point::new(210.0, 30.0));
}

#[test]
fn reverse_edges_become_opposite_curves() {
    let (mut graph, a, b) = pair();
    graph.add_edge(&a, &b, EdgeKind::Plain, false).expect("forward");
    graph.add_edge(&b, &a, EdgeKind::Plain, false).expect("backward");
    let scene = layout_scene(&graph, &Selection::None);

    let controls: Vec<f64> = scene
        .edges
        .iter()
        .map(|edge| match edge.path {
            EdgePath::Quadratic { control, .. } => control.y,
            other => panic!("expected a curve, got {other:?}"),
        })
        .collect();
    assert!(controls[0] < 30.0);
    assert!(controls[1] > 30.0);
}

#[test]
fn self_loop_is_cubic() {
    let (mut graph, a, _) = pair();
    graph.add_edge(&a, &a, EdgeKind::Plain, true).expect("loop");
    let scene = layout_scene(&graph, &Selection::None);
    assert!(matches!(scene.edges[0].path, EdgePath::Cubic { .. }));
}

#[test]
fn dangling_edges_are_skipped() {
    let graph = import_design(
        r#"{"nodes": [{"id": "node-1"}],
            "edges": [{"id": "edge-1", "source": "node-1", "target": "node-9"}]}"#,
    )
    .expect("import failed");
    let scene = layout_scene(&graph, &Selection::None);
    assert_eq!(scene.nodes.len(), 1);
    assert!(scene.edges.is_empty());
}

#[test]
fn appearance_prefers_selection_then_condition() {
    let (mut graph, a, b) = pair();
    let id = graph.add_edge(&a, &b, EdgeKind::Conditional, false).expect("edge");
    let edge = graph.edge(&id).expect("edge").clone();

    let selected = edge_appearance(&edge, true);
    assert_eq!(selected.stroke, "#3B82F6");
    assert_eq!(selected.width, 3.0);
    assert_eq!(selected.marker, ArrowMarker::Blue);
    assert_eq!(selected.dash, Some([8.0, 4.0]));

    let idle = edge_appearance(&edge, false);
    assert_eq!(idle.stroke, "#F59E0B");
    assert_eq!(idle.width, 2.0);
    assert_eq!(idle.marker, ArrowMarker::Orange);
}

#[test]
fn plain_edges_use_their_own_colour_and_style() {
    let (mut graph, a, b) = pair();
    let id = graph.add_edge(&a, &b, EdgeKind::Plain, false).expect("edge");
    graph.update_edge(
        &id,
        EdgePatch {
            color: Some("#10B981".to_string()),
            style: Some(EdgeStyle::Dashed),
            ..EdgePatch::default()
        },
    );
    let appearance = edge_appearance(graph.edge(&id).expect("edge"), false);
    assert_eq!(appearance.stroke, "#10B981");
    assert_eq!(appearance.dash, Some([5.0, 5.0]));
    assert_eq!(appearance.marker, ArrowMarker::Gray);

    graph.update_edge(
        &id,
        EdgePatch {
            color: Some(String::new()),
            ..EdgePatch::default()
        },
    );
    let appearance = edge_appearance(graph.edge(&id).expect("edge"), false);
    assert_eq!(appearance.stroke, "#6B7280");
}

#[test]
fn highlights_follow_selection() {
    let (graph, a, b) = pair();
    let scene = layout_scene(&graph, &Selection::Node(a.clone()));
    assert_eq!(scene.nodes[0].highlight, Highlight::Selected);
    assert_eq!(scene.nodes[1].highlight, Highlight::None);
    assert!(scene.nodes[0].delete_affordance().is_some());

    let mut selection = Selection::None;
    selection.select_nodes([a, b]);
    let scene = layout_scene(&graph, &selection);
    assert!(scene
        .nodes
        .iter()
        .all(|node| node.highlight == Highlight::MultiSelected));
    assert!(scene.nodes[0].delete_affordance().is_none());
}

#[test]
fn nodes_list_their_tool_names() {
    let (mut graph, a, _) = pair();
    let tool = graph.add_tool("search").expect("tool");
    graph.toggle_tool_on_node(&a, &tool);
    let scene = layout_scene(&graph, &Selection::None);
    assert_eq!(scene.nodes[0].tool_names, vec!["search".to_string()]);
    assert!(!scene.nodes[1].has_tools());
}

#[test]
fn empty_scene_uses_default_bounds() {
    let scene = layout_scene(&Graph::new(), &Selection::None);
    assert_eq!(scene_bounds(&scene), DEFAULT_BOUNDS);
    assert_eq!(export_viewport(&scene), Rect::new(-60.0, -60.0, 920.0, 720.0));
}

#[test]
fn bounds_cover_nodes_and_labels() {
    let (mut graph, a, b) = pair();
    let scene = layout_scene(&graph, &Selection::None);
    assert_eq!(scene_bounds(&scene), Rect::new(-4.0, -4.0, 428.0, 68.0));

    graph.add_edge(&a, &b, EdgeKind::Conditional, false).expect("edge");
    let scene = layout_scene(&graph, &Selection::None);
    let bounds = scene_bounds(&scene);
    // Label anchor at (210, 30) reserves a 100x80 box.
    assert_eq!(bounds.top(), -10.0);
    assert_eq!(bounds.bottom(), 70.0);
}

#[test]
fn non_finite_bounds_fall_back() {
    let (mut graph, a, _) = pair();
    graph.node_mut(&a).expect("a").x = f64::NAN;
    let scene = layout_scene(&graph, &Selection::None);
    assert_eq!(scene_bounds(&scene), DEFAULT_BOUNDS);
}

#[test]
fn grid_lines_align_to_world_multiples() {
    let lines = grid_lines(&Rect::new(-30.0, -10.0, 60.0, 20.0), 20.0);
    let verticals: Vec<f64> = lines
        .iter()
        .filter(|line| line.from.x == line.to.x)
        .map(|line| line.from.x)
        .collect();
    assert_eq!(verticals, vec![-40.0, -20.0, 0.0, 20.0]);
    assert!(grid_lines(&Rect::new(0.0, 0.0, 10.0, 10.0), 0.0).is_empty());
}

#[test]
fn grid_lines_skip_axes_beyond_float_resolution() {
    let graph = import_design(r#"{"nodes":[{"id":"node-1","x":1e18,"y":0}]}"#).expect("design");
    let scene = layout_scene(&graph, &Selection::None);
    let viewport = export_viewport(&scene);
    assert!(viewport.is_finite());

    let lines = grid_lines(&viewport, 20.0);
    assert!(lines.iter().all(|line| line.from.y == line.to.y));
    assert!(!lines.is_empty());
}

#[test]
fn grid_lines_are_capped_per_axis() {
    let wide = Rect::new(0.0, 0.0, 20.0 * MAX_GRID_LINES_PER_AXIS as f64 * 2.0, 40.0);
    let lines = grid_lines(&wide, 20.0);
    assert_eq!(lines.len(), 3);

    let fits = Rect::new(0.0, 0.0, 20.0 * 100.0, 40.0);
    assert_eq!(grid_lines(&fits, 20.0).len(), 101 + 3);
}

#[test]
fn hit_test_prefers_nodes() {
    let (mut graph, a, b) = pair();
    let edge = graph.add_edge(&a, &b, EdgeKind::Plain, false).expect("edge");
    let scene = layout_scene(&graph, &Selection::None);

    assert_eq!(
        hit_test(&scene, Point::new(60.0, 30.0)),
        Some(Hit::Node(a.clone()))
    );
    assert_eq!(hit_test(&scene, Point::new(210.0, 36.0)), Some(Hit::Edge(edge)));
    assert_eq!(hit_test(&scene, Point::new(210.0, 80.0)), None);
}

#[test]
fn start_nodes_hit_as_ellipses() {
    let mut graph = Graph::new();
    let start = graph.add_node(NodeKind::Start, Point::ORIGIN);
    let scene = layout_scene(&graph, &Selection::None);
    assert_eq!(hit_test(&scene, Point::new(2.0, 2.0)), None);
    assert_eq!(hit_test(&scene, Point::new(60.0, 30.0)), Some(Hit::Node(start)));
}

#[test]
fn jpeg_export_never_transparent() {
    let options = ImageExportOptions {
        format: ImageFormat::Jpeg,
        transparent_background: true,
        ..ImageExportOptions::default()
    };
    let normalized = options.normalized();
    assert!(!normalized.transparent_background);

    let png = ImageExportOptions {
        transparent_background: true,
        ..ImageExportOptions::default()
    };
    assert!(png.normalized().transparent_background);
}

#[test]
fn density_doubles_on_high_dpi() {
    let mut options = ImageExportOptions::default();
    assert_eq!(options.density_scale(), 1.0);
    options.device_pixel_ratio = 1.5;
    assert_eq!(options.density_scale(), 2.0);
    options.device_pixel_ratio = 3.0;
    assert_eq!(options.density_scale(), 2.0);
}

#[test]
fn export_options_read_camel_case_with_defaults() {
    let options: ImageExportOptions =
        serde_json::from_str(r#"{"format": "jpeg", "showGrid": false}"#).expect("options");
    assert_eq!(options.format, ImageFormat::Jpeg);
    assert!(!options.show_grid);
    assert_eq!(options.jpeg_quality, 92);
}

#[test]
fn file_names_embed_timestamp() {
    let at = Utc
        .with_ymd_and_hms(2026, 10, 17, 9, 5, 3)
        .single()
        .expect("valid time");
    assert_eq!(
        export_file_name(ImageFormat::Png, &at),
        "flowdraw-20261017-090503.png"
    );
    assert_eq!(
        export_file_name(ImageFormat::Jpeg, &at),
        "flowdraw-20261017-090503.jpg"
    );
}
