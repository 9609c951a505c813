use flowdraw_layout::{
    Hit, Scene, ViewTransform, ZoomDirection, hit_test, layout_scene, snap_to_grid,
};
use flowdraw_model::{
    EdgeId, EdgeKind, EdgePatch, Graph, ImportError, NodeId, NodeKind, NodePatch, Point,
    Selection, ToolId, export_design, export_design_compact, import_design,
};
use tracing::debug;

use crate::align::{AlignEdge, Axis, align_nodes, distribute_nodes};
use crate::config::{EditorConfig, clamp_grid_size};
use crate::history::History;
use crate::input::HitTarget;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Gesture {
    Idle,
    Drag {
        node: NodeId,
        origin: Point,
        moved: bool,
    },
    Pan {
        last: Point,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub kind: EdgeKind,
    pub start: Option<NodeId>,
}

/// Everything one open design needs: the graph, what is selected, how it is
/// viewed, and the undo log.
///
/// Every graph mutation goes through a method here and is followed by exactly
/// one history capture. View changes and mode toggles are never captured.
#[derive(Debug, Clone)]
pub struct EditorState {
    graph: Graph,
    selection: Selection,
    multi_select: bool,
    connection: Option<Connection>,
    view: ViewTransform,
    config: EditorConfig,
    history: History,
    pub(crate) gesture: Gesture,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorState {
    pub fn new(config: EditorConfig) -> Self {
        let config = config.sanitized();
        Self {
            graph: Graph::new(),
            selection: Selection::None,
            multi_select: false,
            connection: None,
            view: ViewTransform::default(),
            history: History::new(config.history_capacity),
            config,
            gesture: Gesture::Idle,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Drag { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Pan { .. })
    }

    pub(crate) fn commit(&mut self) -> bool {
        self.history.capture(&self.graph)
    }

    pub(crate) fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    fn snap(&self, point: Point) -> Point {
        snap_to_grid(point, self.config.grid_size, self.config.snap_to_grid)
    }

    // Nodes

    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let world = self.view.screen_to_world(self.config.spawn_point);
        let id = self.add_node_at(kind, world);
        self.selection.select_node(id.clone());
        id
    }

    pub fn add_node_at(&mut self, kind: NodeKind, position: Point) -> NodeId {
        let position = self.snap(position);
        let id = self.graph.add_node(kind, position);
        self.commit();
        id
    }

    pub fn add_node_named(&mut self, tag: &str) -> Option<NodeId> {
        match tag.parse::<NodeKind>() {
            Ok(kind) => Some(self.add_node(kind)),
            Err(err) => {
                debug!(%err, "ignored add_node");
                None
            }
        }
    }

    pub fn delete_node(&mut self, id: &NodeId) -> bool {
        if !self.graph.delete_node(id) {
            return false;
        }
        self.selection.forget_node(id);
        if let Some(connection) = self.connection.as_mut()
            && connection.start.as_ref() == Some(id)
        {
            connection.start = None;
        }
        self.commit();
        true
    }

    pub fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> bool {
        let changed = self.graph.update_node(id, patch);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn move_node(&mut self, id: &NodeId, position: Point) -> bool {
        let changed = self.graph.move_node(id, position);
        if changed {
            self.commit();
        }
        changed
    }

    // Edges

    /// Connects two existing nodes. Self-loops are accepted here; only the
    /// interactive connect gesture consults the self-loop policy.
    pub fn add_edge(&mut self, source: &NodeId, target: &NodeId, kind: EdgeKind) -> Option<EdgeId> {
        let id = self.graph.add_edge(source, target, kind, true)?;
        self.commit();
        Some(id)
    }

    pub fn delete_edge(&mut self, id: &EdgeId) -> bool {
        if !self.graph.delete_edge(id) {
            return false;
        }
        self.selection.forget_edge(id);
        self.commit();
        true
    }

    pub fn update_edge(&mut self, id: &EdgeId, patch: EdgePatch) -> bool {
        let changed = self.graph.update_edge(id, patch);
        if changed {
            self.commit();
        }
        changed
    }

    // Tools

    pub fn add_tool(&mut self, name: &str) -> Option<ToolId> {
        let id = self.graph.add_tool(name)?;
        self.commit();
        Some(id)
    }

    pub fn delete_tool(&mut self, id: &ToolId) -> bool {
        let changed = self.graph.delete_tool(id);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn toggle_tool_on_node(&mut self, node: &NodeId, tool: &ToolId) -> bool {
        let changed = self.graph.toggle_tool_on_node(node, tool);
        if changed {
            self.commit();
        }
        changed
    }

    // Selection

    pub fn select_node(&mut self, id: &NodeId) -> bool {
        if !self.graph.contains_node(id) {
            return false;
        }
        self.selection.select_node(id.clone());
        true
    }

    pub fn select_edge(&mut self, id: &EdgeId) -> bool {
        if self.graph.edge(id).is_none() {
            return false;
        }
        self.selection.select_edge(id.clone());
        true
    }

    pub fn select_all(&mut self) {
        let ids: Vec<NodeId> = self.graph.node_ids().cloned().collect();
        self.selection.select_nodes(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn toggle_membership(&mut self, id: &NodeId) -> bool {
        if !self.graph.contains_node(id) {
            return false;
        }
        self.selection.toggle_membership(id.clone());
        true
    }

    pub fn toggle_multi_select_mode(&mut self) -> bool {
        self.set_multi_select_mode(!self.multi_select);
        self.multi_select
    }

    pub fn set_multi_select_mode(&mut self, enabled: bool) {
        self.multi_select = enabled;
        self.selection.clear();
    }

    pub fn delete_selected(&mut self) -> usize {
        match std::mem::take(&mut self.selection) {
            Selection::Nodes(members) => {
                let removed = self.graph.delete_nodes(&members);
                if removed > 0 {
                    self.commit();
                }
                removed
            }
            Selection::Node(id) => usize::from(self.delete_node(&id)),
            Selection::Edge(id) => usize::from(self.delete_edge(&id)),
            Selection::None => 0,
        }
    }

    pub fn duplicate_selected(&mut self) -> Vec<NodeId> {
        let Selection::Nodes(members) = &self.selection else {
            return Vec::new();
        };
        let copies = self.graph.duplicate_nodes(members);
        if copies.is_empty() {
            return copies;
        }
        self.selection.select_nodes(copies.iter().cloned());
        self.commit();
        copies
    }

    pub fn align(&mut self, edge: AlignEdge) -> bool {
        let members = self.selection.members();
        let changed = align_nodes(&mut self.graph, &members, edge);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn distribute(&mut self, axis: Axis) -> bool {
        let members = self.selection.members();
        let changed = distribute_nodes(&mut self.graph, &members, axis);
        if changed {
            self.commit();
        }
        changed
    }

    // History

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: Graph) {
        self.graph = snapshot;
        self.selection.clear();
        self.gesture = Gesture::Idle;
        if let Some(connection) = self.connection.as_mut() {
            connection.start = None;
        }
        // Consumes the suppression set by undo/redo.
        self.commit();
    }

    // Serialization

    pub fn import_json(&mut self, text: &str) -> Result<(), ImportError> {
        let graph = import_design(text)?;
        self.replace_graph(graph);
        Ok(())
    }

    pub fn replace_graph(&mut self, graph: Graph) {
        self.graph = graph;
        self.selection.clear();
        self.connection = None;
        self.gesture = Gesture::Idle;
        self.commit();
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        export_design(&self.graph)
    }

    pub fn export_json_compact(&self) -> Result<String, serde_json::Error> {
        export_design_compact(&self.graph)
    }

    // Connection mode

    pub fn start_connection(&mut self, kind: EdgeKind) {
        self.connection = Some(Connection { kind, start: None });
    }

    pub fn cancel_connection(&mut self) {
        self.connection = None;
    }

    pub(crate) fn connect_through(&mut self, node: &NodeId) -> bool {
        let Some(connection) = self.connection.as_mut() else {
            return false;
        };
        let Some(start) = connection.start.clone() else {
            connection.start = Some(node.clone());
            return true;
        };
        let kind = connection.kind;
        let allow_self_loop = self.config.allow_self_loop_connections;
        match self.graph.add_edge(&start, node, kind, allow_self_loop) {
            Some(edge) => {
                self.selection.select_edge(edge);
                self.connection = None;
                self.commit();
                true
            }
            None => false,
        }
    }

    // Gestures

    pub(crate) fn begin_drag(&mut self, node: &NodeId) -> bool {
        let Some(origin) = self.graph.node(node).map(|n| n.position()) else {
            return false;
        };
        self.selection.select_node(node.clone());
        self.gesture = Gesture::Drag {
            node: node.clone(),
            origin,
            moved: false,
        };
        true
    }

    pub(crate) fn begin_pan(&mut self, screen: Point) {
        self.gesture = Gesture::Pan { last: screen };
    }

    pub(crate) fn continue_gesture(&mut self, screen: Point) -> bool {
        match &mut self.gesture {
            Gesture::Idle => false,
            Gesture::Pan { last } => {
                let (dx, dy) = (screen.x - last.x, screen.y - last.y);
                *last = screen;
                self.view.pan_by(dx, dy);
                dx != 0.0 || dy != 0.0
            }
            Gesture::Drag { node, moved, .. } => {
                let world = self.view.screen_to_world(screen);
                let Some(current) = self.graph.node(node) else {
                    return false;
                };
                let target = snap_to_grid(
                    world.offset(-current.width / 2.0, -current.height / 2.0),
                    self.config.grid_size,
                    self.config.snap_to_grid,
                );
                if current.position() == target {
                    return false;
                }
                self.graph.move_node(node, target);
                *moved = true;
                true
            }
        }
    }

    pub(crate) fn finish_gesture(&mut self) -> bool {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Drag { node, moved: true, .. } => {
                debug!(%node, "finished drag");
                self.commit();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cancel_gesture(&mut self) -> bool {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Drag {
                node,
                origin,
                moved: true,
            } => self.graph.move_node(&node, origin),
            _ => false,
        }
    }

    pub fn clear_single_selection(&mut self) {
        if matches!(self.selection, Selection::Node(_) | Selection::Edge(_)) {
            self.selection.clear();
        }
    }

    pub fn cancel_modes(&mut self) {
        self.connection = None;
        self.multi_select = false;
        if matches!(self.selection, Selection::Nodes(_)) {
            self.selection.clear();
        }
    }

    // View

    pub fn zoom_at(&mut self, cursor: Point, direction: ZoomDirection) {
        self.view.zoom_at(cursor, direction);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_at(Point::ORIGIN, ZoomDirection::In);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_at(Point::ORIGIN, ZoomDirection::Out);
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.view.pan_by(dx, dy);
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.view.screen_to_world(screen)
    }

    pub fn set_grid_size(&mut self, size: f64) {
        self.config.grid_size = clamp_grid_size(size);
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.config.snap_to_grid = enabled;
    }

    // Rendering

    pub fn scene(&self) -> Scene {
        layout_scene(&self.graph, &self.selection)
    }

    pub fn hit_test(&self, screen: Point) -> HitTarget {
        match hit_test(&self.scene(), self.view.screen_to_world(screen)) {
            Some(Hit::Node(id)) => HitTarget::Node(id),
            Some(Hit::Edge(id)) => HitTarget::Edge(id),
            None => HitTarget::Canvas,
        }
    }
}
