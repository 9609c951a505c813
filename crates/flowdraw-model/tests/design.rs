use flowdraw_model::{
    EdgeKind, EdgeStyle, Graph, ImportError, NodeId, NodeKind, NodeShape, Point, export_design,
    export_design_compact, import_design,
};
use proptest::prelude::*;

#[test]
fn rejects_malformed_json() {
    let err = import_design("{ nodes: ").unwrap_err();
    assert!(matches!(err, ImportError::Syntax(_)));
}

#[test]
fn rejects_non_object_roots() {
    for text in ["null", "[]", "42", "\"design\"", "true"] {
        let err = import_design(text).unwrap_err();
        assert!(matches!(err, ImportError::NotAnObject), "accepted {text}");
    }
}

#[test]
fn rejects_wrong_field_shapes() {
    let err = import_design(r#"{"nodes": 3}"#).unwrap_err();
    assert!(matches!(err, ImportError::Schema(_)));

    let err = import_design(r#"{"nodes": [{"id": "node-1", "type": "decision"}]}"#).unwrap_err();
    assert!(matches!(err, ImportError::Schema(_)));
}

#[test]
fn empty_object_gets_defaults() {
    let graph = import_design("{}").expect("import failed");
    assert_eq!(graph, Graph::new());
}

#[test]
fn fills_missing_node_and_edge_fields() {
    let text = r#"{
        "nodes": [
            {"id": "node-4", "type": "END", "x": 10, "y": 20},
            {"id": "node-5"}
        ],
        "edges": [
            {"id": "edge-2", "source": "node-4", "target": "node-5", "type": "conditional_edge"}
        ],
        "nextNodeId": 6
    }"#;
    let graph = import_design(text).expect("import failed");
    assert_eq!(graph.next_node_id, 6);
    assert_eq!(graph.next_edge_id, 1);

    let end = graph.node(&NodeId::from("node-4")).expect("node-4");
    assert_eq!(end.kind, NodeKind::End);
    assert_eq!(end.shape, NodeShape::Rect);
    assert_eq!(end.color, "#EF4444");
    assert_eq!((end.x, end.y, end.width, end.height), (10.0, 20.0, 120.0, 60.0));

    let generic = graph.node(&NodeId::from("node-5")).expect("node-5");
    assert_eq!(generic.kind, NodeKind::Generic);
    assert_eq!(generic.shape, NodeShape::RoundedRect);

    let edge = &graph.edges[0];
    assert_eq!(edge.style, EdgeStyle::Dashed);
    assert_eq!(edge.label, "condition");
    assert_eq!(edge.condition, "");
}

#[test]
fn keeps_dangling_edges_until_pruned() {
    let text = r#"{"edges": [{"id": "edge-1", "source": "node-1", "target": "node-2"}]}"#;
    let mut graph = import_design(text).expect("import failed");
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.prune_dangling_edges(), 1);
    assert!(graph.edges.is_empty());
}

#[test]
fn exports_wire_names() {
    let mut graph = Graph::new();
    let a = graph.add_node(NodeKind::Start, Point::new(20.0, 40.0));
    let b = graph.add_node(NodeKind::Subgraph, Point::new(220.0, 40.0));
    graph.add_edge(&a, &b, EdgeKind::Conditional, false);
    graph.add_tool("search");

    let text = export_design(&graph).expect("export failed");
    assert!(text.contains("\"nextNodeId\": 3"));
    assert!(text.contains("\"type\": \"START\""));
    assert!(text.contains("\"shape\": \"hexagon\""));
    assert!(text.contains("\"type\": \"conditional_edge\""));
    assert!(text.contains("\n  \"edges\""));

    let compact = export_design_compact(&graph).expect("export failed");
    assert!(!compact.contains('\n'));
}

#[test]
fn round_trips_a_built_design() {
    let mut graph = Graph::new();
    let a = graph.add_node(NodeKind::Start, Point::new(20.0, 40.0));
    let b = graph.add_node(NodeKind::Generic, Point::new(220.5, 40.25));
    let tool = graph.add_tool("retriever").expect("tool");
    graph.toggle_tool_on_node(&b, &tool);
    graph.add_edge(&a, &b, EdgeKind::Plain, false);
    graph.add_edge(&b, &b, EdgeKind::Conditional, true);
    graph.delete_node(&a);
    graph
        .node_mut(&b)
        .expect("b")
        .properties
        .insert("retries".to_string(), serde_json::json!({"max": 3}));

    let text = export_design(&graph).expect("export failed");
    let restored = import_design(&text).expect("import failed");
    assert_eq!(restored, graph);
}

fn node_kind() -> impl Strategy<Value = NodeKind> {
    prop::sample::select(NodeKind::ALL.to_vec())
}

fn design_strategy() -> impl Strategy<Value = Graph> {
    (
        prop::collection::vec((node_kind(), -5000.0f64..5000.0, -5000.0f64..5000.0, ".{0,12}"), 0..8),
        prop::collection::vec((0usize..8, 0usize..8, any::<bool>()), 0..10),
        prop::collection::vec("[a-z]{1,8}", 0..4),
    )
        .prop_map(|(nodes, edges, tools)| {
            let mut graph = Graph::new();
            let mut ids = Vec::new();
            for (kind, x, y, label) in nodes {
                let id = graph.add_node(kind, Point::new(x, y));
                graph.node_mut(&id).expect("just added").label = label;
                ids.push(id);
            }
            for (source, target, conditional) in edges {
                if let (Some(source), Some(target)) = (ids.get(source), ids.get(target)) {
                    let kind = if conditional {
                        EdgeKind::Conditional
                    } else {
                        EdgeKind::Plain
                    };
                    graph.add_edge(source, target, kind, true);
                }
            }
            for name in tools {
                if let Some(tool) = graph.add_tool(&name) {
                    if let Some(first) = ids.first() {
                        graph.toggle_tool_on_node(first, &tool);
                    }
                }
            }
            graph
        })
}

proptest! {
    #[test]
    fn export_then_import_is_identity(graph in design_strategy()) {
        let text = export_design(&graph).expect("export failed");
        let restored = import_design(&text).expect("import failed");
        prop_assert_eq!(restored, graph);
    }
}
