use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{
    Edge, EdgeId, EdgeKind, EdgePatch, Node, NodeId, NodeKind, NodePatch, Point, Tool, ToolId,
};

pub const DUPLICATE_OFFSET: f64 = 50.0;

/// The node/edge/tool triple plus its id counters.
///
/// This is also the exchange document and the history snapshot: cloning a
/// `Graph` is the deep copy the undo log stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "GraphRecord")]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub tools: Vec<Tool>,
    pub next_node_id: u64,
    pub next_edge_id: u64,
    pub next_tool_id: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphRecord {
    #[serde(default)]
    nodes: Option<Vec<Node>>,
    #[serde(default)]
    edges: Option<Vec<Edge>>,
    #[serde(default)]
    tools: Option<Vec<Tool>>,
    #[serde(default)]
    next_node_id: Option<u64>,
    #[serde(default)]
    next_edge_id: Option<u64>,
    #[serde(default)]
    next_tool_id: Option<u64>,
}

impl From<GraphRecord> for Graph {
    fn from(record: GraphRecord) -> Self {
        // Counters start at 1; a missing or zero counter falls back to that.
        let counter = |value: Option<u64>| value.filter(|n| *n > 0).unwrap_or(1);
        Graph {
            nodes: record.nodes.unwrap_or_default(),
            edges: record.edges.unwrap_or_default(),
            tools: record.tools.unwrap_or_default(),
            next_node_id: counter(record.next_node_id),
            next_edge_id: counter(record.next_edge_id),
            next_tool_id: counter(record.next_tool_id),
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            tools: Vec::new(),
            next_node_id: 1,
            next_edge_id: 1,
            next_tool_id: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.tools.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| &node.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|edge| &edge.id == id)
    }

    pub fn tool(&self, id: &ToolId) -> Option<&Tool> {
        self.tools.iter().find(|tool| &tool.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|node| &node.id)
    }

    pub fn edges_touching<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |edge| edge.touches(node))
    }

    pub fn has_reverse_edge(&self, edge: &Edge) -> bool {
        self.edges.iter().any(|other| {
            other.source == edge.target && other.target == edge.source && other.id != edge.id
        })
    }

    pub fn is_dangling(&self, edge: &Edge) -> bool {
        !self.contains_node(&edge.source) || !self.contains_node(&edge.target)
    }

    pub fn tools_of<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Tool> + 'a {
        self.tools
            .iter()
            .filter(move |tool| node.tools.contains(&tool.id))
    }

    pub fn add_node(&mut self, kind: NodeKind, position: Point) -> NodeId {
        let counter = self.next_node_id;
        let id = NodeId::from_counter(counter);
        let label = format!("{} {}", kind.defaults().label, counter);
        self.nodes
            .push(Node::new(id.clone(), kind, label, position));
        self.next_node_id += 1;
        debug!(node = %id, kind = kind.as_str(), "added node");
        id
    }

    pub fn delete_node(&mut self, id: &NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| &node.id != id);
        if self.nodes.len() == before {
            return false;
        }
        self.edges.retain(|edge| !edge.touches(id));
        debug!(node = %id, "deleted node");
        true
    }

    pub fn delete_nodes(&mut self, ids: &BTreeSet<NodeId>) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|node| !ids.contains(&node.id));
        self.edges
            .retain(|edge| !ids.contains(&edge.source) && !ids.contains(&edge.target));
        let removed = before - self.nodes.len();
        if removed > 0 {
            debug!(removed, "deleted nodes");
        }
        removed
    }

    pub fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> bool {
        let tools = patch.tools.map(|tools| {
            tools
                .into_iter()
                .filter(|tool| self.tool(tool).is_some())
                .collect::<Vec<_>>()
        });
        let Some(node) = self.node_mut(id) else {
            return false;
        };

        if let Some(kind) = patch.kind {
            if kind != node.kind {
                let defaults = kind.defaults();
                node.color = defaults.color.to_string();
                node.shape = defaults.shape;
            }
            node.kind = kind;
        }
        if let Some(label) = patch.label {
            node.label = label;
        }
        if let Some(position) = patch.position {
            node.x = position.x;
            node.y = position.y;
        }
        if let Some(width) = patch.width {
            node.width = width;
        }
        if let Some(height) = patch.height {
            node.height = height;
        }
        if let Some(color) = patch.color {
            node.color = color;
        }
        if let Some(shape) = patch.shape {
            node.shape = shape;
        }
        if let Some(description) = patch.description {
            node.description = description;
        }
        if let Some(properties) = patch.properties {
            node.properties = properties;
        }
        if let Some(tools) = tools {
            node.tools = tools;
        }
        true
    }

    pub fn move_node(&mut self, id: &NodeId, position: Point) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.x = position.x;
                node.y = position.y;
                true
            }
            None => false,
        }
    }

    pub fn add_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        kind: EdgeKind,
        allow_self_loop: bool,
    ) -> Option<EdgeId> {
        if source == target && !allow_self_loop {
            return None;
        }
        if !self.contains_node(source) || !self.contains_node(target) {
            return None;
        }
        let id = EdgeId::from_counter(self.next_edge_id);
        self.edges
            .push(Edge::new(id.clone(), source.clone(), target.clone(), kind));
        self.next_edge_id += 1;
        debug!(edge = %id, %source, %target, kind = kind.as_str(), "added edge");
        Some(id)
    }

    pub fn delete_edge(&mut self, id: &EdgeId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|edge| &edge.id != id);
        before != self.edges.len()
    }

    pub fn update_edge(&mut self, id: &EdgeId, patch: EdgePatch) -> bool {
        let Some(edge) = self.edges.iter_mut().find(|edge| &edge.id == id) else {
            return false;
        };

        if let Some(kind) = patch.kind {
            let defaults = kind.defaults();
            edge.kind = kind;
            edge.style = defaults.style;
            edge.color = defaults.color.to_string();
        }
        if let Some(label) = patch.label {
            edge.label = label;
        }
        if let Some(style) = patch.style {
            edge.style = style;
        }
        if let Some(color) = patch.color {
            edge.color = color;
        }
        if let Some(condition) = patch.condition {
            edge.condition = condition;
        }
        true
    }

    pub fn add_tool(&mut self, name: &str) -> Option<ToolId> {
        let name = name.trim();
        if name.is_empty() || self.tools.iter().any(|tool| tool.name == name) {
            return None;
        }
        let id = ToolId::from_counter(self.next_tool_id);
        self.tools.push(Tool {
            id: id.clone(),
            name: name.to_string(),
        });
        self.next_tool_id += 1;
        debug!(tool = %id, name, "added tool");
        Some(id)
    }

    pub fn delete_tool(&mut self, id: &ToolId) -> bool {
        let before = self.tools.len();
        self.tools.retain(|tool| &tool.id != id);
        if before == self.tools.len() {
            return false;
        }
        for node in &mut self.nodes {
            node.tools.retain(|tool| tool != id);
        }
        true
    }

    pub fn toggle_tool_on_node(&mut self, node_id: &NodeId, tool_id: &ToolId) -> bool {
        if self.tool(tool_id).is_none() {
            return false;
        }
        let Some(node) = self.node_mut(node_id) else {
            return false;
        };
        if let Some(index) = node.tools.iter().position(|tool| tool == tool_id) {
            node.tools.remove(index);
        } else {
            node.tools.push(tool_id.clone());
        }
        true
    }

    /// Copies the given nodes with fresh, contiguous ids, offset by
    /// [`DUPLICATE_OFFSET`]. Edges between the originals are not copied.
    pub fn duplicate_nodes(&mut self, ids: &BTreeSet<NodeId>) -> Vec<NodeId> {
        let copies: Vec<Node> = self
            .nodes
            .iter()
            .filter(|node| ids.contains(&node.id))
            .enumerate()
            .map(|(offset, node)| Node {
                id: NodeId::from_counter(self.next_node_id + offset as u64),
                x: node.x + DUPLICATE_OFFSET,
                y: node.y + DUPLICATE_OFFSET,
                ..node.clone()
            })
            .collect();

        let new_ids: Vec<NodeId> = copies.iter().map(|node| node.id.clone()).collect();
        self.next_node_id += copies.len() as u64;
        self.nodes.extend(copies);
        if !new_ids.is_empty() {
            debug!(count = new_ids.len(), "duplicated nodes");
        }
        new_ids
    }

    pub fn prune_dangling_edges(&mut self) -> usize {
        let nodes: BTreeSet<NodeId> = self.node_ids().cloned().collect();
        let before = self.edges.len();
        self.edges
            .retain(|edge| nodes.contains(&edge.source) && nodes.contains(&edge.target));
        before - self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_fall_back_to_one() {
        let record = GraphRecord {
            nodes: None,
            edges: None,
            tools: None,
            next_node_id: Some(0),
            next_edge_id: None,
            next_tool_id: Some(7),
        };
        let graph = Graph::from(record);
        assert_eq!(graph.next_node_id, 1);
        assert_eq!(graph.next_edge_id, 1);
        assert_eq!(graph.next_tool_id, 7);
    }

    #[test]
    fn update_with_unknown_tool_keeps_known_ones() {
        let mut graph = Graph::new();
        let node = graph.add_node(NodeKind::Generic, Point::ORIGIN);
        let tool = graph.add_tool("search").expect("tool");
        let patch = NodePatch {
            tools: Some(vec![tool.clone(), ToolId::from("tool-99")]),
            ..NodePatch::default()
        };
        assert!(graph.update_node(&node, patch));
        assert_eq!(graph.node(&node).map(|n| n.tools.clone()), Some(vec![tool]));
    }
}
