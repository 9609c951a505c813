use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::UnknownTagError;

pub const DEFAULT_NODE_WIDTH: f64 = 120.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn from_counter(counter: u64) -> Self {
                Self(format!(concat!($prefix, "-{}"), counter))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    NodeId,
    "node"
);
string_id!(EdgeId, "edge");
string_id!(ToolId, "tool");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "node")]
    Generic,
    #[serde(rename = "START")]
    Start,
    #[serde(rename = "END")]
    End,
    #[serde(rename = "subgraph")]
    Subgraph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeDefaults {
    pub label: &'static str,
    pub color: &'static str,
    pub shape: NodeShape,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Generic,
        NodeKind::Start,
        NodeKind::End,
        NodeKind::Subgraph,
    ];

    pub fn defaults(self) -> NodeDefaults {
        match self {
            NodeKind::Generic => NodeDefaults {
                label: "Node",
                color: "#3B82F6",
                shape: NodeShape::RoundedRect,
            },
            NodeKind::Start => NodeDefaults {
                label: "START",
                color: "#8B5CF6",
                shape: NodeShape::Circle,
            },
            NodeKind::End => NodeDefaults {
                label: "END",
                color: "#EF4444",
                shape: NodeShape::Rect,
            },
            NodeKind::Subgraph => NodeDefaults {
                label: "Subgraph",
                color: "#6366F1",
                shape: NodeShape::Hexagon,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Generic => "node",
            NodeKind::Start => "START",
            NodeKind::End => "END",
            NodeKind::Subgraph => "subgraph",
        }
    }
}

impl FromStr for NodeKind {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownTagError::new("node", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeShape {
    #[serde(rename = "rounded")]
    RoundedRect,
    #[serde(rename = "circle")]
    Circle,
    #[serde(rename = "square")]
    Rect,
    #[serde(rename = "hexagon")]
    Hexagon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    #[serde(rename = "edge")]
    Plain,
    #[serde(rename = "conditional_edge")]
    Conditional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeDefaults {
    pub label: &'static str,
    pub color: &'static str,
    pub style: EdgeStyle,
}

impl EdgeKind {
    pub fn defaults(self) -> EdgeDefaults {
        match self {
            EdgeKind::Plain => EdgeDefaults {
                label: "",
                color: "#6B7280",
                style: EdgeStyle::Solid,
            },
            EdgeKind::Conditional => EdgeDefaults {
                label: "condition",
                color: "#F59E0B",
                style: EdgeStyle::Dashed,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Plain => "edge",
            EdgeKind::Conditional => "conditional_edge",
        }
    }
}

impl FromStr for EdgeKind {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edge" => Ok(EdgeKind::Plain),
            "conditional_edge" => Ok(EdgeKind::Conditional),
            other => Err(UnknownTagError::new("edge", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeRecord")]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub shape: NodeShape,
    pub description: String,
    pub properties: BTreeMap<String, Value>,
    pub tools: Vec<ToolId>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, label: String, position: Point) -> Self {
        let defaults = kind.defaults();
        Self {
            id,
            kind,
            label,
            x: position.x,
            y: position.y,
            width: DEFAULT_NODE_WIDTH,
            height: DEFAULT_NODE_HEIGHT,
            color: defaults.color.to_string(),
            shape: defaults.shape,
            description: String::new(),
            properties: BTreeMap::new(),
            tools: Vec::new(),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }
}

#[derive(Deserialize)]
struct NodeRecord {
    id: NodeId,
    #[serde(rename = "type", default)]
    kind: Option<NodeKind>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    shape: Option<NodeShape>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    properties: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    tools: Option<Vec<ToolId>>,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        let kind = record.kind.unwrap_or(NodeKind::Generic);
        let defaults = kind.defaults();
        Node {
            label: record
                .label
                .unwrap_or_else(|| defaults.label.to_string()),
            id: record.id,
            kind,
            x: record.x.unwrap_or(0.0),
            y: record.y.unwrap_or(0.0),
            width: record.width.unwrap_or(DEFAULT_NODE_WIDTH),
            height: record.height.unwrap_or(DEFAULT_NODE_HEIGHT),
            color: record
                .color
                .unwrap_or_else(|| defaults.color.to_string()),
            shape: record.shape.unwrap_or(defaults.shape),
            description: record.description.unwrap_or_default(),
            properties: record.properties.unwrap_or_default(),
            tools: record.tools.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EdgeRecord")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub label: String,
    pub style: EdgeStyle,
    pub color: String,
    pub condition: String,
}

impl Edge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        let defaults = kind.defaults();
        Self {
            id,
            source,
            target,
            kind,
            label: defaults.label.to_string(),
            style: defaults.style,
            color: defaults.color.to_string(),
            condition: String::new(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

#[derive(Deserialize)]
struct EdgeRecord {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    #[serde(rename = "type", default)]
    kind: Option<EdgeKind>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    style: Option<EdgeStyle>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    condition: Option<String>,
}

impl From<EdgeRecord> for Edge {
    fn from(record: EdgeRecord) -> Self {
        let kind = record.kind.unwrap_or(EdgeKind::Plain);
        let defaults = kind.defaults();
        Edge {
            id: record.id,
            source: record.source,
            target: record.target,
            kind,
            label: record
                .label
                .unwrap_or_else(|| defaults.label.to_string()),
            style: record.style.unwrap_or(defaults.style),
            color: record
                .color
                .unwrap_or_else(|| defaults.color.to_string()),
            condition: record.condition.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub id: ToolId,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub kind: Option<NodeKind>,
    pub label: Option<String>,
    pub position: Option<Point>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
    pub shape: Option<NodeShape>,
    pub description: Option<String>,
    pub properties: Option<BTreeMap<String, Value>>,
    pub tools: Option<Vec<ToolId>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePatch {
    pub kind: Option<EdgeKind>,
    pub label: Option<String>,
    pub style: Option<EdgeStyle>,
    pub color: Option<String>,
    pub condition: Option<String>,
}
