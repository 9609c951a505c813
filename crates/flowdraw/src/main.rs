use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use flowdraw_editor::{EditorState, ExportSlot, InputEvent};
use flowdraw_layout::{ImageExportOptions, ImageFormat, scene_bounds};
use flowdraw_model::{EdgeKind, Graph};
use flowdraw_skia_render::{RasterOptions, render_to_bytes};
use flowdraw_vector_render::{VectorRenderOptions, render_display_list, render_svg};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render and inspect workflow design files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rasterize a design to PNG or JPEG
    Render(RenderArgs),
    /// Write a design as an SVG document
    Svg(SvgArgs),
    /// Re-emit a design in canonical form
    Normalize(NormalizeArgs),
    /// Print a summary of a design
    Inspect(InputArgs),
    /// Apply recorded input events to a design and print the result
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Design file; reads stdin when omitted
    design: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
}

impl From<FormatArg> for ImageFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Jpeg => ImageFormat::Jpeg,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(short, long, value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,

    /// Leave the background transparent (PNG only)
    #[arg(long)]
    transparent: bool,

    #[arg(long)]
    no_grid: bool,

    #[arg(long, default_value_t = 20.0)]
    grid_size: f64,

    /// Device pixel ratio; anything above 1 renders at double density
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    #[arg(long, default_value_t = flowdraw_layout::DEFAULT_JPEG_QUALITY)]
    quality: u8,

    /// TrueType/OpenType font for labels
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output file; defaults to a timestamped name in the current directory
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SvgArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long)]
    no_grid: bool,

    #[arg(long, default_value_t = 20.0)]
    grid_size: f64,

    /// Include hit strokes and delete buttons
    #[arg(long)]
    interactive: bool,

    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Single-line output
    #[arg(long)]
    compact: bool,

    /// Drop edges whose endpoints are missing
    #[arg(long)]
    prune_dangling: bool,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// JSON array of input events
    events: PathBuf,

    /// Starting design; an empty design when omitted
    #[arg(long)]
    design: Option<PathBuf>,

    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Render(args) => render(args),
        Command::Svg(args) => svg(args),
        Command::Normalize(args) => normalize(args),
        Command::Inspect(args) => inspect(args),
        Command::Replay(args) => replay(args),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn load_editor(path: Option<&Path>) -> Result<EditorState> {
    let text = read_input(path)?;
    let mut editor = EditorState::default();
    editor
        .import_json(&text)
        .context("failed to import design")?;
    Ok(editor)
}

fn write_output(path: Option<&Path>, contents: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            println!("{}", String::from_utf8_lossy(contents));
            Ok(())
        }
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let mut editor = load_editor(args.input.design.as_deref())?;
    editor.set_grid_size(args.grid_size);

    let options = ImageExportOptions {
        format: args.format.into(),
        transparent_background: args.transparent,
        show_grid: !args.no_grid,
        device_pixel_ratio: args.dpr,
        jpeg_quality: args.quality,
        ..ImageExportOptions::default()
    };
    let raster = RasterOptions {
        font_path: args.font,
    };
    let slot = ExportSlot::new();
    let Some(image) = editor.export_image(&slot, &options, |scene, options| {
        render_to_bytes(scene, options, &raster)
    })?
    else {
        bail!("another export is already running");
    };

    let path = args.out.unwrap_or_else(|| PathBuf::from(&image.file_name));
    fs::write(&path, &image.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), mime = image.mime_type, "wrote image");
    println!("{}", path.display());
    Ok(())
}

fn svg(args: SvgArgs) -> Result<()> {
    let editor = load_editor(args.input.design.as_deref())?;
    let options = VectorRenderOptions {
        show_grid: !args.no_grid,
        grid_size: flowdraw_editor::clamp_grid_size(args.grid_size),
        interactive: args.interactive,
        viewport: None,
    };
    let list = render_display_list(&editor.scene(), &options);
    write_output(args.out.as_deref(), render_svg(&list).as_bytes())
}

fn normalize(args: NormalizeArgs) -> Result<()> {
    let text = read_input(args.input.design.as_deref())?;
    let mut graph = flowdraw_model::import_design(&text).context("failed to import design")?;
    if args.prune_dangling {
        let pruned = graph.prune_dangling_edges();
        info!(pruned, "removed dangling edges");
    }
    let output = if args.compact {
        flowdraw_model::export_design_compact(&graph)?
    } else {
        flowdraw_model::export_design(&graph)?
    };
    println!("{output}");
    Ok(())
}

fn inspect(args: InputArgs) -> Result<()> {
    let editor = load_editor(args.design.as_deref())?;
    print!("{}", summarize(&editor));
    Ok(())
}

fn replay(args: ReplayArgs) -> Result<()> {
    let mut editor = match args.design.as_deref() {
        Some(path) => load_editor(Some(path))?,
        None => EditorState::default(),
    };
    let events = fs::read_to_string(&args.events)
        .with_context(|| format!("failed to read {}", args.events.display()))?;
    let events: Vec<InputEvent> =
        serde_json::from_str(&events).context("events must be a JSON array of input events")?;

    let changed = events
        .into_iter()
        .map(|event| editor.handle_event(event))
        .filter(|changed| *changed)
        .count();
    info!(changed, "replayed events");

    let output = if args.compact {
        editor.export_json_compact()?
    } else {
        editor.export_json()?
    };
    println!("{output}");
    Ok(())
}

fn summarize(editor: &EditorState) -> String {
    let graph = editor.graph();
    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for node in &graph.nodes {
        *kinds.entry(node.kind.as_str()).or_default() += 1;
    }

    let mut out = String::new();
    out.push_str(&format!("nodes: {}\n", graph.nodes.len()));
    for (kind, count) in &kinds {
        out.push_str(&format!("  {kind}: {count}\n"));
    }
    let stats = edge_stats(graph);
    out.push_str(&format!("edges: {}\n", graph.edges.len()));
    out.push_str(&format!("  conditional: {}\n", stats.conditional));
    out.push_str(&format!("  self-loops: {}\n", stats.self_loops));
    out.push_str(&format!("  reverse pairs: {}\n", stats.reverse_pairs));
    out.push_str(&format!("  dangling: {}\n", stats.dangling));
    out.push_str(&format!("tools: {}\n", graph.tools.len()));
    for tool in &graph.tools {
        let used = graph
            .nodes
            .iter()
            .filter(|node| node.tools.contains(&tool.id))
            .count();
        out.push_str(&format!("  {} ({used} nodes)\n", tool.name));
    }
    let bounds = scene_bounds(&editor.scene());
    out.push_str(&format!(
        "bounds: {} {} {} {}\n",
        bounds.x, bounds.y, bounds.width, bounds.height
    ));
    out
}

#[derive(Debug, Default, PartialEq, Eq)]
struct EdgeStats {
    conditional: usize,
    self_loops: usize,
    reverse_pairs: usize,
    dangling: usize,
}

fn edge_stats(graph: &Graph) -> EdgeStats {
    let mut stats = EdgeStats::default();
    let mut reversed = 0;
    for edge in &graph.edges {
        if edge.kind == EdgeKind::Conditional {
            stats.conditional += 1;
        }
        if graph.is_dangling(edge) {
            stats.dangling += 1;
        } else if edge.is_self_loop() {
            stats.self_loops += 1;
        } else if graph.has_reverse_edge(edge) {
            reversed += 1;
        }
    }
    // Each pair was counted from both ends.
    stats.reverse_pairs = reversed / 2;
    stats
}
