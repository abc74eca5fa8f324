use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "boltzanim", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve `GET /boltzmann` over HTTP.
    Serve(ServeArgs),
    /// Render one animation to a GIF file.
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct SimArgs {
    /// JSON config file; flags below override its fields.
    #[arg(long, env = "BOLTZ_CONFIG")]
    config: Option<PathBuf>,

    /// Number of visible units.
    #[arg(long, env = "BOLTZ_VISIBLE")]
    visible: Option<usize>,

    /// Number of hidden units.
    #[arg(long, env = "BOLTZ_HIDDEN")]
    hidden: Option<usize>,

    /// Frames per animation.
    #[arg(long, env = "BOLTZ_FRAMES")]
    frames: Option<usize>,

    /// Display duration per frame (ms).
    #[arg(long, env = "BOLTZ_DURATION_MS")]
    duration_ms: Option<u32>,

    /// Sampling temperature (> 0).
    #[arg(long, env = "BOLTZ_TEMPERATURE")]
    temperature: Option<f64>,

    /// Neighbor-read policy for each sweep.
    #[arg(long, value_enum, env = "BOLTZ_POLICY")]
    policy: Option<PolicyChoice>,

    /// Fixed RNG seed for reproducible output.
    #[arg(long, env = "BOLTZ_SEED")]
    seed: Option<u64>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Caption drawn above the network.
    #[arg(long)]
    title: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    Snapshot,
    Sequential,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "BOLTZ_ADDR", default_value = "127.0.0.1:8000")]
    addr: SocketAddr,

    #[command(flatten)]
    sim: SimArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    sim: SimArgs,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Sweeps to run before capturing (>= 1).
    #[arg(long, default_value_t = 1)]
    steps: usize,

    #[command(flatten)]
    sim: SimArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_config(args: &SimArgs) -> anyhow::Result<boltzanim::AnimationConfig> {
    let mut cfg = match &args.config {
        Some(path) => boltzanim::AnimationConfig::from_path(path)?,
        None => boltzanim::AnimationConfig::default(),
    };

    if let Some(v) = args.visible {
        cfg.visible_units = v;
    }
    if let Some(v) = args.hidden {
        cfg.hidden_units = v;
    }
    if let Some(v) = args.frames {
        cfg.frame_count = v;
    }
    if let Some(v) = args.duration_ms {
        cfg.frame_duration_ms = v;
    }
    if let Some(v) = args.temperature {
        cfg.temperature = boltzanim::Temperature::new(v)?;
    }
    if let Some(p) = args.policy {
        cfg.update_policy = match p {
            PolicyChoice::Snapshot => boltzanim::UpdatePolicy::Snapshot,
            PolicyChoice::Sequential => boltzanim::UpdatePolicy::Sequential,
        };
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    if let Some(w) = args.width {
        cfg.render.canvas.width = w;
    }
    if let Some(h) = args.height {
        cfg.render.canvas.height = h;
    }
    if let Some(t) = &args.title {
        cfg.render.title = t.clone();
    }

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.sim)?;
    let state = boltzanim::server::AppState::new(cfg)?;
    let app = boltzanim::server::create_router(state);

    let rt = tokio::runtime::Runtime::new().context("start tokio runtime")?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(args.addr)
            .await
            .with_context(|| format!("bind {}", args.addr))?;
        tracing::info!(addr = %args.addr, "listening");
        axum::serve(listener, app).await.context("serve http")
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.sim)?;
    let anim = boltzanim::render_gif(&cfg)?;
    write_output(&args.out, &anim.bytes)?;
    eprintln!("wrote {} ({} frames)", args.out.display(), anim.frame_count);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.sim)?;
    let png = boltzanim::render_png_frame(&cfg, args.steps)?;
    write_output(&args.out, &png)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
