mod align;
mod config;
mod export;
mod history;
mod input;
mod state;

pub use align::{
    AlignEdge, Axis, MIN_ALIGN_MEMBERS, MIN_DISTRIBUTE_MEMBERS, align_nodes, distribute_nodes,
};
pub use config::{
    DEFAULT_GRID_SIZE, EditorConfig, MAX_GRID_SIZE, MIN_GRID_SIZE, clamp_grid_size,
};
pub use export::{ExportError, ExportSlot, ExportTicket, ExportedImage};
pub use history::{DEFAULT_HISTORY_CAPACITY, History};
pub use input::{HitTarget, InputEvent, Key, Modifiers, ShortcutAction, resolve_shortcut};
pub use state::{Connection, EditorState};
