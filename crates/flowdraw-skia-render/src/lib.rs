mod paint;

use std::fs;
use std::path::{Path, PathBuf};

use flowdraw_layout::{ImageExportOptions, ImageFormat, Rect, Rgba, Scene, export_viewport};
use skia_safe::{
    Color, EncodedImageFormat, Font, FontHinting, FontMgr, FontStyle, Paint, font::Edging,
    surfaces,
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct RasterOptions {
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("could not allocate a {width}x{height} drawing surface")]
    SurfaceUnavailable { width: i32, height: i32 },
    #[error("{0} encoding is not available in this build")]
    EncodeUnsupported(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("font load failed: {0}")]
    FontLoadFailed(String),
}

const MAX_SURFACE_EDGE: f64 = 16_384.0;
const FONT_CANDIDATES: [&str; 6] = [
    "Helvetica",
    "Arial",
    "DejaVu Sans",
    "Liberation Sans",
    "Menlo",
    "Courier New",
];

pub fn render_to_bytes(
    scene: &Scene,
    export: &ImageExportOptions,
    options: &RasterOptions,
) -> Result<Vec<u8>, RasterError> {
    let export = export.normalized();
    let viewport = export_viewport(scene);
    let scale = fit_scale(&viewport, export.density_scale());

    let width = surface_edge(viewport.width * scale);
    let height = surface_edge(viewport.height * scale);
    let mut surface = surfaces::raster_n32_premul((width, height))
        .ok_or(RasterError::SurfaceUnavailable { width, height })?;
    debug!(width, height, scale, "allocated raster surface");

    let mut font = load_font(options)?;
    configure_font(&mut font);

    let canvas = surface.canvas();
    if export.transparent_background {
        canvas.clear(Color::TRANSPARENT);
    } else {
        canvas.clear(Color::WHITE);
    }
    canvas.scale((scale as f32, scale as f32));
    canvas.translate((-viewport.x as f32, -viewport.y as f32));

    if export.show_grid {
        paint::draw_grid(canvas, &viewport, export.grid_size);
    }
    paint::draw_edges(canvas, scene, &font);
    paint::draw_nodes(canvas, scene, &font);

    let image = surface.image_snapshot();
    let (encoded, label) = match export.format {
        ImageFormat::Png => (image.encode(None, EncodedImageFormat::PNG, 100), "PNG"),
        ImageFormat::Jpeg => (
            image.encode(None, EncodedImageFormat::JPEG, u32::from(export.jpeg_quality)),
            "JPEG",
        ),
    };
    let data = encoded.ok_or(RasterError::EncodeUnsupported(label))?;
    let bytes = data.as_bytes().to_vec();
    info!(width, height, format = label, bytes = bytes.len(), "rasterized design");
    Ok(bytes)
}

pub fn render_to_file(
    scene: &Scene,
    export: &ImageExportOptions,
    options: &RasterOptions,
    path: &Path,
) -> Result<(), RasterError> {
    let bytes = render_to_bytes(scene, export, options)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Pixels per world unit. Shrinks below `density` when the padded viewport
/// would not fit in a [`MAX_SURFACE_EDGE`] surface.
fn fit_scale(viewport: &Rect, density: f64) -> f64 {
    let longest = viewport.width.max(viewport.height);
    if !longest.is_finite() || longest * density <= MAX_SURFACE_EDGE {
        return density;
    }
    let scale = MAX_SURFACE_EDGE / longest;
    warn!(density, scale, "design too large for full density; downscaling export");
    scale
}

fn surface_edge(length: f64) -> i32 {
    if length.is_finite() {
        length.ceil().clamp(1.0, MAX_SURFACE_EDGE) as i32
    } else {
        1
    }
}

pub(crate) fn load_font(options: &RasterOptions) -> Result<Font, RasterError> {
    let font_mgr = FontMgr::new();
    if let Some(path) = options.font_path.as_ref() {
        let data = fs::read(path).map_err(|err| {
            RasterError::FontLoadFailed(format!("failed to read font {path:?}: {err}"))
        })?;
        let typeface = font_mgr
            .new_from_data(&data, 0)
            .ok_or_else(|| RasterError::FontLoadFailed(format!("failed to load font {path:?}")))?;
        return Ok(Font::from_typeface(typeface, 12.0));
    }

    let mut font = Font::default();
    let style = FontStyle::default();
    if let Some(typeface) = FONT_CANDIDATES
        .iter()
        .find_map(|family| font_mgr.match_family_style(family, style))
    {
        font.set_typeface(typeface);
    }
    Ok(font)
}

pub(crate) fn configure_font(font: &mut Font) {
    font.set_edging(Edging::AntiAlias);
    font.set_hinting(FontHinting::Slight);
    font.set_subpixel(true);
}

pub(crate) fn build_text_paint(color: &str) -> Paint {
    let mut paint = Paint::default();
    paint.set_color(to_color(Rgba::parse_or(color, Rgba::BLACK)));
    paint.set_anti_alias(true);
    paint
}

pub(crate) fn to_color(rgba: Rgba) -> Color {
    Color::from_argb(rgba.a, rgba.r, rgba.g, rgba.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_edges_are_bounded() {
        assert_eq!(surface_edge(919.2), 920);
        assert_eq!(surface_edge(0.0), 1);
        assert_eq!(surface_edge(f64::INFINITY), 1);
        assert_eq!(surface_edge(1e9), 16_384);
    }

    #[test]
    fn wide_designs_are_downscaled_to_fit() {
        let viewport = Rect::new(-64.0, -64.0, 20_248.0, 188.0);
        let scale = fit_scale(&viewport, 2.0);
        assert!(scale < 1.0);
        let width = surface_edge(viewport.width * scale);
        assert!(width <= 16_384);
        let far_node_right = (20_000.0 + 120.0 - viewport.x) * scale;
        assert!(far_node_right <= f64::from(width));

        let small = Rect::new(0.0, 0.0, 400.0, 300.0);
        assert_eq!(fit_scale(&small, 2.0), 2.0);
        assert_eq!(fit_scale(&small, 1.0), 1.0);
    }
}
