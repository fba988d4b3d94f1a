use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

use pixgraph::{
    BuiltinColors, CastSpaceOp, CastSpaceParams, Engine, EngineOpts, Graph, INPUT_PAD,
    LinearSinusoidOp, LinearSinusoidParams, MemoryStore, MemoryStoreOpts, NodeId, Rect,
    ShiftDirection, ShiftOp, ShiftParams, TileOpts,
};

#[derive(Parser, Debug)]
#[command(name = "pixgraph", version)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the sinusoid -> shift -> cast-space pipeline to a PNG.
    Render(RenderArgs),
    /// Print bounding boxes and negotiated formats of the pipeline.
    Info(PipelineArgs),
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// Pattern period along x, in pixels.
    #[arg(long, default_value_t = 256.0)]
    x_period: f64,

    /// Pattern period along y, in pixels.
    #[arg(long, default_value_t = 256.0)]
    y_period: f64,

    /// Amplitude of the x wave.
    #[arg(long, default_value_t = 0.25)]
    x_amplitude: f64,

    /// Amplitude of the y wave.
    #[arg(long, default_value_t = 0.25)]
    y_amplitude: f64,

    /// Angle between the wave axes, in degrees.
    #[arg(long, default_value_t = 90.0)]
    angle: f64,

    /// Pattern rotation, in degrees.
    #[arg(long, default_value_t = 0.0)]
    rotation: f64,

    /// Power applied to the pattern value.
    #[arg(long, default_value_t = 1.0)]
    exponent: f64,

    /// Anti-aliasing level (0..=4).
    #[arg(long, default_value_t = 0)]
    supersampling: u32,

    /// Maximum row/column displacement (0 disables the shift).
    #[arg(long, default_value_t = 5)]
    shift: i32,

    /// Displacement axis.
    #[arg(long, value_enum, default_value_t = DirectionChoice::Horizontal)]
    direction: DirectionChoice,

    /// Displacement seed.
    #[arg(long, default_value_t = 0)]
    seed: u32,

    /// Target color space name.
    #[arg(long, default_value = "sRGB")]
    space: String,

    /// ICC profile to tag the output with; overrides --space.
    #[arg(long)]
    icc: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width in pixels.
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 512)]
    height: u32,

    /// Level of detail (each level halves the resolution).
    #[arg(long, default_value_t = 0)]
    level: u32,

    /// Tile edge length in pixels.
    #[arg(long, default_value_t = 128)]
    tile_size: u32,

    /// Render tiles on a rayon pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Worker threads when --parallel is set.
    #[arg(long)]
    threads: Option<usize>,

    /// Largest single buffer allocation, in MiB.
    #[arg(long, default_value_t = 512)]
    max_alloc_mib: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionChoice {
    Horizontal,
    Vertical,
}

struct Pipeline {
    graph: Graph,
    nodes: [NodeId; 3],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn build_pipeline(args: &PipelineArgs) -> anyhow::Result<Pipeline> {
    let icc_profile = match &args.icc {
        Some(path) => Some(
            std::fs::read(path)
                .with_context(|| format!("read icc profile '{}'", path.display()))?,
        ),
        None => None,
    };

    let pattern = LinearSinusoidOp::new(LinearSinusoidParams {
        x_period: args.x_period,
        y_period: args.y_period,
        x_amplitude: args.x_amplitude,
        y_amplitude: args.y_amplitude,
        angle: args.angle,
        rotation: args.rotation,
        exponent: args.exponent,
        supersampling: args.supersampling,
        ..LinearSinusoidParams::default()
    })
    .context("linear-sinusoid parameters")?;
    let shift = ShiftOp::new(ShiftParams {
        shift: args.shift,
        direction: match args.direction {
            DirectionChoice::Horizontal => ShiftDirection::Horizontal,
            DirectionChoice::Vertical => ShiftDirection::Vertical,
        },
        seed: args.seed,
    })
    .context("shift parameters")?;
    let cast = CastSpaceOp::new(CastSpaceParams {
        space: args.space.clone(),
        icc_profile,
    })
    .context("cast-space parameters")?;

    let mut graph = Graph::new();
    let a = graph.add_node(pattern);
    let b = graph.add_node(shift);
    let c = graph.add_node(cast);
    graph.connect(a, b, INPUT_PAD)?;
    graph.connect(b, c, INPUT_PAD)?;
    Ok(Pipeline {
        graph,
        nodes: [a, b, c],
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut pipeline = build_pipeline(&args.pipeline)?;
    let store = MemoryStore::new(MemoryStoreOpts {
        max_alloc_bytes: args.max_alloc_mib.saturating_mul(1024 * 1024),
        ..MemoryStoreOpts::default()
    });
    let engine = Engine::new(
        Arc::new(store),
        Arc::new(BuiltinColors),
        EngineOpts::default(),
    );
    engine.prepare(&mut pipeline.graph)?;

    let region = Rect::new(
        0,
        0,
        i32::try_from(args.width).context("width")?,
        i32::try_from(args.height).context("height")?,
    );
    let opts = TileOpts {
        tile_size: args.tile_size,
        parallel: args.parallel,
        threads: args.threads,
    };
    let out = pixgraph::render_tiled(
        &engine,
        &pipeline.graph,
        pipeline.nodes[2],
        region,
        args.level,
        &opts,
    )?;
    tracing::info!(format = %out.format(), "rendered");

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    pixgraph::to_rgba8(&out)?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_info(args: PipelineArgs) -> anyhow::Result<()> {
    let mut pipeline = build_pipeline(&args)?;
    let engine = Engine::default();
    let report = engine.prepare(&mut pipeline.graph)?;

    for id in pipeline.nodes {
        let node = pipeline.graph.node(id)?;
        let bbox = node.bounding_box();
        let extent = if bbox.is_infinite() {
            "infinite".to_string()
        } else {
            format!("{}x{}+{}+{}", bbox.width, bbox.height, bbox.x, bbox.y)
        };
        println!("node {} {} bbox={extent}", id.0, node.op().name());
        for pad in node.pads() {
            let format = pad
                .format()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            println!("  {:<6} {format}", pad.name());
        }
    }
    for w in &report.warnings {
        println!("warning: node {}: {}", w.node.0, w.error);
    }
    Ok(())
}
