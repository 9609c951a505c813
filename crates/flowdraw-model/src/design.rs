use serde_json::Value;
use tracing::{info, warn};

use crate::graph::Graph;
use crate::ImportError;

pub const DESIGN_FILE_NAME: &str = "flowdraw-design.json";

pub fn export_design(graph: &Graph) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(graph)
}

pub fn export_design_compact(graph: &Graph) -> Result<String, serde_json::Error> {
    serde_json::to_string(graph)
}

pub fn import_design(text: &str) -> Result<Graph, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(|err| {
        warn!(%err, "rejected design: malformed JSON");
        ImportError::Syntax(err)
    })?;
    import_design_value(value)
}

pub fn import_design_value(value: Value) -> Result<Graph, ImportError> {
    if !value.is_object() {
        warn!("rejected design: root is not an object");
        return Err(ImportError::NotAnObject);
    }
    let graph: Graph = serde_json::from_value(value).map_err(|err| {
        warn!(%err, "rejected design: schema mismatch");
        ImportError::Schema(err)
    })?;
    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        tools = graph.tools.len(),
        "imported design"
    );
    Ok(graph)
}
