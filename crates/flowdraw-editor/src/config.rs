use flowdraw_model::Point;
use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_CAPACITY;

pub const MIN_GRID_SIZE: f64 = 10.0;
pub const MAX_GRID_SIZE: f64 = 50.0;
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub grid_size: f64,
    pub snap_to_grid: bool,
    pub history_capacity: usize,
    pub allow_self_loop_connections: bool,
    pub spawn_point: Point,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            snap_to_grid: true,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            allow_self_loop_connections: false,
            spawn_point: Point::new(200.0, 200.0),
        }
    }
}

impl EditorConfig {
    pub fn sanitized(&self) -> Self {
        Self {
            grid_size: clamp_grid_size(self.grid_size),
            history_capacity: self.history_capacity.max(1),
            ..self.clone()
        }
    }
}

pub fn clamp_grid_size(size: f64) -> f64 {
    if size.is_finite() {
        size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE)
    } else {
        DEFAULT_GRID_SIZE
    }
}
