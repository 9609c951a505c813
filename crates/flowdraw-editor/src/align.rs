use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use flowdraw_model::{Graph, NodeId, UnknownTagError};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MIN_ALIGN_MEMBERS: usize = 2;
pub const MIN_DISTRIBUTE_MEMBERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignEdge {
    Left,
    Right,
    Top,
    Bottom,
    HorizontalCenter,
    VerticalCenter,
}

impl AlignEdge {
    pub const ALL: [AlignEdge; 6] = [
        AlignEdge::Left,
        AlignEdge::Right,
        AlignEdge::Top,
        AlignEdge::Bottom,
        AlignEdge::HorizontalCenter,
        AlignEdge::VerticalCenter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlignEdge::Left => "left",
            AlignEdge::Right => "right",
            AlignEdge::Top => "top",
            AlignEdge::Bottom => "bottom",
            AlignEdge::HorizontalCenter => "horizontal-center",
            AlignEdge::VerticalCenter => "vertical-center",
        }
    }
}

impl fmt::Display for AlignEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlignEdge {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlignEdge::ALL
            .into_iter()
            .find(|edge| edge.as_str() == s)
            .ok_or_else(|| UnknownTagError::new("alignment", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

impl FromStr for Axis {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Axis::Horizontal),
            "vertical" => Ok(Axis::Vertical),
            other => Err(UnknownTagError::new("axis", other)),
        }
    }
}

pub fn align_nodes(graph: &mut Graph, members: &BTreeSet<NodeId>, edge: AlignEdge) -> bool {
    let coords: Vec<(f64, f64)> = graph
        .nodes
        .iter()
        .filter(|node| members.contains(&node.id))
        .map(|node| (node.x, node.y))
        .collect();
    if coords.len() < MIN_ALIGN_MEMBERS {
        return false;
    }

    let xs = coords.iter().map(|(x, _)| *x);
    let ys = coords.iter().map(|(_, y)| *y);
    let count = coords.len() as f64;
    let target = match edge {
        AlignEdge::Left => xs.fold(f64::INFINITY, f64::min),
        AlignEdge::Right => xs.fold(f64::NEG_INFINITY, f64::max),
        AlignEdge::Top => ys.fold(f64::INFINITY, f64::min),
        AlignEdge::Bottom => ys.fold(f64::NEG_INFINITY, f64::max),
        AlignEdge::HorizontalCenter => ys.sum::<f64>() / count,
        AlignEdge::VerticalCenter => xs.sum::<f64>() / count,
    };

    let sets_x = matches!(
        edge,
        AlignEdge::Left | AlignEdge::Right | AlignEdge::VerticalCenter
    );
    for node in graph
        .nodes
        .iter_mut()
        .filter(|node| members.contains(&node.id))
    {
        if sets_x {
            node.x = target;
        } else {
            node.y = target;
        }
    }
    debug!(edge = edge.as_str(), target, count = coords.len(), "aligned nodes");
    true
}

pub fn distribute_nodes(graph: &mut Graph, members: &BTreeSet<NodeId>, axis: Axis) -> bool {
    let coord = |x: f64, y: f64| match axis {
        Axis::Horizontal => x,
        Axis::Vertical => y,
    };
    let mut ordered: Vec<(NodeId, f64)> = graph
        .nodes
        .iter()
        .filter(|node| members.contains(&node.id))
        .map(|node| (node.id.clone(), coord(node.x, node.y)))
        .collect();
    if ordered.len() < MIN_DISTRIBUTE_MEMBERS {
        return false;
    }
    ordered.sort_by(|a, b| a.1.total_cmp(&b.1));

    let first = ordered[0].1;
    let last = ordered[ordered.len() - 1].1;
    let spacing = (last - first) / (ordered.len() - 1) as f64;
    let interior = &ordered[1..ordered.len() - 1];
    for (index, (id, _)) in interior.iter().enumerate() {
        let value = first + (index + 1) as f64 * spacing;
        if let Some(node) = graph.node_mut(id) {
            match axis {
                Axis::Horizontal => node.x = value,
                Axis::Vertical => node.y = value,
            }
        }
    }
    debug!(axis = axis.as_str(), spacing, count = ordered.len(), "distributed nodes");
    true
}
