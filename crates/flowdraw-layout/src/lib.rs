mod bounds;
mod export;
mod geometry;
mod hit;
mod outline;
mod scene;
mod style;
mod text;

pub use bounds::{
    DEFAULT_BOUNDS, EXPORT_PADDING, GridLine, LABEL_HALF_HEIGHT, LABEL_HALF_WIDTH,
    MAX_GRID_LINES_PER_AXIS, NODE_BOUNDS_MARGIN, export_viewport, grid_lines, scene_bounds,
};
pub use export::{DEFAULT_JPEG_QUALITY, ImageExportOptions, ImageFormat, export_file_name};
pub use geometry::{
    BOUNDARY_BUFFER, MAX_ZOOM, MIN_ZOOM, REVERSE_EDGE_CURVATURE, REVERSE_EDGE_OFFSET, Rect,
    ReverseEdgeGeometry, SELF_LOOP_ANGLE, SELF_LOOP_RADIUS, SelfLoopGeometry, ViewTransform,
    ZoomDirection, clamp_zoom, hexagon_points, paired_reverse_edge_geometry,
    rectangle_boundary_point, self_loop_geometry, snap_to_grid, straight_edge_endpoints,
    zoom_around_point,
};
pub use hit::{EDGE_HIT_TOLERANCE, Hit, hit_test};
pub use outline::{Outline, node_outline};
pub use scene::{
    DELETE_AFFORDANCE_RADIUS, EDGE_DELETE_DROP, EdgeGeometry, EdgePath, Scene, SceneEdge,
    SceneNode, edge_geometry, layout_scene, node_rect,
};
pub use style::*;
pub use text::{approximate_text_width, first_baseline, wrap_words};
