use std::collections::BTreeSet;

use crate::types::{EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Edge(EdgeId),
    Nodes(BTreeSet<NodeId>),
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::None => true,
            Selection::Nodes(set) => set.is_empty(),
            Selection::Node(_) | Selection::Edge(_) => false,
        }
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    pub fn select_node(&mut self, id: NodeId) {
        *self = Selection::Node(id);
    }

    pub fn select_edge(&mut self, id: EdgeId) {
        *self = Selection::Edge(id);
    }

    pub fn select_nodes(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        *self = Selection::Nodes(ids.into_iter().collect());
    }

    pub fn toggle_membership(&mut self, id: NodeId) {
        match self {
            Selection::Nodes(set) => {
                if !set.remove(&id) {
                    set.insert(id);
                }
            }
            _ => *self = Selection::Nodes(BTreeSet::from([id])),
        }
    }

    pub fn selected_node(&self) -> Option<&NodeId> {
        match self {
            Selection::Node(id) => Some(id),
            _ => None,
        }
    }

    pub fn selected_edge(&self) -> Option<&EdgeId> {
        match self {
            Selection::Edge(id) => Some(id),
            _ => None,
        }
    }

    pub fn members(&self) -> BTreeSet<NodeId> {
        match self {
            Selection::Nodes(set) => set.clone(),
            _ => BTreeSet::new(),
        }
    }

    pub fn is_node_selected(&self, id: &NodeId) -> bool {
        matches!(self, Selection::Node(selected) if selected == id)
    }

    pub fn is_node_member(&self, id: &NodeId) -> bool {
        matches!(self, Selection::Nodes(set) if set.contains(id))
    }

    pub fn is_edge_selected(&self, id: &EdgeId) -> bool {
        matches!(self, Selection::Edge(selected) if selected == id)
    }

    pub fn forget_node(&mut self, id: &NodeId) {
        if self.is_node_selected(id) {
            self.clear();
        } else if let Selection::Nodes(set) = self {
            set.remove(id);
        }
    }

    pub fn forget_edge(&mut self, id: &EdgeId) {
        if self.is_edge_selected(id) {
            self.clear();
        }
    }
}
