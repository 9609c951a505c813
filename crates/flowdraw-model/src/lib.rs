mod design;
mod graph;
mod selection;
mod types;

pub use design::{
    DESIGN_FILE_NAME, export_design, export_design_compact, import_design, import_design_value,
};
pub use graph::{DUPLICATE_OFFSET, Graph};
pub use selection::Selection;
pub use types::{
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, Edge, EdgeDefaults, EdgeId, EdgeKind, EdgePatch,
    EdgeStyle, Node, NodeDefaults, NodeId, NodeKind, NodePatch, NodeShape, Point, Tool, ToolId,
};

use thiserror::Error;

/// Why a design document could not be imported. The current model is never
/// touched when one of these is returned.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("design is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("design root must be a JSON object")]
    NotAnObject,

    #[error("design does not match the expected shape: {0}")]
    Schema(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {category} type '{tag}'")]
pub struct UnknownTagError {
    pub category: &'static str,
    pub tag: String,
}

impl UnknownTagError {
    pub fn new(category: &'static str, tag: &str) -> Self {
        Self {
            category,
            tag: tag.to_string(),
        }
    }
}
