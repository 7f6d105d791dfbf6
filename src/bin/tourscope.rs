use std::io::BufRead as _;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use tourscope::{
    Control, FfmpegSink, FfmpegSinkOpts, Fps, PlaybackDriver, PlaybackSummary, PngSequenceSink,
    PreviewFile, RealtimeClock, Timeline, TraceStore, TraceValidation, ViewerConfig, VirtualClock,
    Visualizer,
};

#[derive(Parser, Debug)]
#[command(name = "tourscope", version, about = "Replay recorded TSP optimization traces")]
struct Cli {
    /// JSON viewer config; flags override its fields.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (repeat for more).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of a trace.
    Inspect(InspectArgs),
    /// Render one playback step as a PNG.
    Frame(FrameArgs),
    /// Play a trace offline into an MP4 (requires `ffmpeg` on PATH) or a PNG sequence.
    Render(RenderArgs),
    /// Play a trace in real time into a preview PNG, reading commands from stdin.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct TraceArgs {
    /// Trace JSON file.
    #[arg(long = "in", conflicts_with = "trace")]
    in_path: Option<PathBuf>,

    /// Trace base name, resolved against the config's data directory.
    #[arg(long)]
    trace: Option<String>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Theme name (blue, red, dark).
    #[arg(long)]
    theme: Option<String>,

    /// Label font (TTF/OTF).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Admit traces whose tours are not permutations; bad tours are skipped per frame.
    #[arg(long)]
    lenient: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    trace: TraceArgs,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    trace: TraceArgs,

    /// Generation index (0-based).
    #[arg(long, default_value_t = 0)]
    generation: usize,

    /// Population member index (0-based).
    #[arg(long, default_value_t = 0)]
    step: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    trace: TraceArgs,

    /// Output MP4 path.
    #[arg(long, conflicts_with = "png_dir", required_unless_present = "png_dir")]
    out: Option<PathBuf>,

    /// Directory for a numbered PNG sequence.
    #[arg(long)]
    png_dir: Option<PathBuf>,

    /// Speed level; delay is max(5, 500·0.95^level) ms.
    #[arg(long, allow_negative_numbers = true)]
    speed: Option<i32>,

    /// Generation to start from (0-based).
    #[arg(long)]
    from: Option<usize>,

    /// Output frames per second.
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    trace: TraceArgs,

    /// Preview PNG, overwritten on every step.
    #[arg(long)]
    preview: PathBuf,

    /// Speed level; delay is max(5, 500·0.95^level) ms.
    #[arg(long, allow_negative_numbers = true)]
    speed: Option<i32>,

    /// Generation to start from (0-based).
    #[arg(long)]
    from: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let cfg = match &cli.config {
        Some(path) => ViewerConfig::from_path(path)?,
        None => ViewerConfig::default(),
    };

    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(cfg, args),
        Command::Frame(args) => cmd_frame(cfg, args),
        Command::Render(args) => cmd_render(cfg, args),
        Command::Play(args) => cmd_play(cfg, args),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        match verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

struct Session {
    cfg: ViewerConfig,
    store: TraceStore,
    trace_path: PathBuf,
}

impl Session {
    fn open(mut cfg: ViewerConfig, args: &TraceArgs) -> anyhow::Result<Self> {
        if let Some(width) = args.width {
            cfg.canvas.width = width;
        }
        if let Some(height) = args.height {
            cfg.canvas.height = height;
        }
        if let Some(theme) = &args.theme {
            cfg.theme = theme.clone();
        }
        if let Some(font) = &args.font {
            cfg.font = Some(font.clone());
        }
        if args.lenient {
            cfg.validation = TraceValidation::Lenient;
        }
        cfg.validate()?;

        let trace_path = match &args.in_path {
            Some(path) => path.clone(),
            None => cfg.trace_path(args.trace.as_deref()),
        };
        let mut store = TraceStore::new();
        store
            .load(&trace_path, cfg.validation)
            .with_context(|| format!("load trace '{}'", trace_path.display()))?;
        Ok(Self {
            cfg,
            store,
            trace_path,
        })
    }

    fn visualizer(&self) -> anyhow::Result<Visualizer> {
        let mut vis = Visualizer::new(
            self.store.num_nodes(),
            self.cfg.canvas,
            self.cfg.theme_state()?,
            self.cfg.background,
        )?;
        if let Some(font) = self.cfg.load_font()? {
            vis.set_font(font)?;
        }
        Ok(vis)
    }
}

fn cmd_inspect(cfg: ViewerConfig, args: InspectArgs) -> anyhow::Result<()> {
    let session = Session::open(cfg, &args.trace)?;
    let trace = session
        .store
        .trace()
        .context("trace missing after load")?;
    let min = trace
        .min_solution_value()
        .map_or_else(|| "n/a".to_string(), |v| v.to_string());

    println!("trace: {}", session.trace_path.display());
    println!("generations: {}", trace.len());
    println!("nodes: {}", trace.num_nodes());
    println!("total steps: {}", trace.total_steps());
    println!("min solution: {min}");
    Ok(())
}

fn cmd_frame(cfg: ViewerConfig, args: FrameArgs) -> anyhow::Result<()> {
    let session = Session::open(cfg, &args.trace)?;
    let mut vis = session.visualizer()?;
    let frame = tourscope::render_snapshot(&session.store, &mut vis, args.generation, args.step)?;
    tourscope::write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(cfg: ViewerConfig, args: RenderArgs) -> anyhow::Result<()> {
    let mut session = Session::open(cfg, &args.trace)?;
    let mut vis = session.visualizer()?;
    let fps = match args.fps {
        Some(num) => Fps::new(num, 1)?,
        None => session.cfg.fps,
    };
    let speed = args.speed.or(session.cfg.speed_level);
    let from = args.from.unwrap_or(session.cfg.start_generation);
    let mut driver = PlaybackDriver::new(VirtualClock::new()).with_speed(speed);

    let (summary, written) = if let Some(dir) = &args.png_dir {
        let mut timeline = Timeline::new(PngSequenceSink::new(dir), fps);
        let summary = driver.run(&mut session.store, &mut vis, &mut timeline, from)?;
        (summary, dir.clone())
    } else {
        let out = args.out.clone().context("either --out or --png-dir is required")?;
        let mut opts = FfmpegSinkOpts::new(&out);
        opts.background = session.cfg.background;
        let mut timeline = Timeline::new(FfmpegSink::new(opts), fps);
        let summary = driver.run(&mut session.store, &mut vis, &mut timeline, from)?;
        (summary, out)
    };

    report(&summary);
    eprintln!("wrote {}", written.display());
    Ok(())
}

fn cmd_play(cfg: ViewerConfig, args: PlayArgs) -> anyhow::Result<()> {
    let mut session = Session::open(cfg, &args.trace)?;
    let mut vis = session.visualizer()?;
    let speed = args.speed.or(session.cfg.speed_level);
    let from = args.from.unwrap_or(session.cfg.start_generation);

    let (clock, controls) = RealtimeClock::new();
    std::thread::spawn(move || read_controls(controls));

    eprintln!("commands: p (pause), s N (speed), t NAME (theme), r W H (resize), q (quit)");
    let mut preview = PreviewFile::new(&args.preview);
    let mut driver = PlaybackDriver::new(clock).with_speed(speed);
    let summary = driver.run(&mut session.store, &mut vis, &mut preview, from)?;

    report(&summary);
    Ok(())
}

fn read_controls(controls: Sender<Control>) {
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        match parse_control(&line) {
            Ok(Some(control)) => {
                let stop = control == Control::Stop;
                if controls.send(control).is_err() || stop {
                    break;
                }
            }
            Ok(None) => {}
            Err(msg) => eprintln!("{msg}"),
        }
    }
}

fn parse_control(line: &str) -> Result<Option<Control>, String> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();
    let control = match (cmd, rest.as_slice()) {
        ("p", []) => Control::TogglePause,
        ("q", []) => Control::Stop,
        ("s", [level]) => Control::SetSpeed(
            level
                .parse()
                .map_err(|_| format!("speed level must be an integer, got \"{level}\""))?,
        ),
        ("t", [name]) => Control::SetTheme((*name).to_string()),
        ("r", [w, h]) => {
            let parse = |v: &str| {
                v.parse::<u32>()
                    .map_err(|_| format!("size must be a positive integer, got \"{v}\""))
            };
            Control::Resize {
                width: parse(w)?,
                height: parse(h)?,
            }
        }
        _ => return Err(format!("unknown command \"{}\"", line.trim())),
    };
    Ok(Some(control))
}

fn report(summary: &PlaybackSummary) {
    let best = summary
        .best_value
        .map_or_else(|| "n/a".to_string(), |v| v.to_string());
    eprintln!(
        "{} steps over {} generation(s) in {:.2}s, best {best}{}",
        summary.steps_shown,
        summary.generations_completed,
        summary.elapsed.as_secs_f64(),
        if summary.completed { "" } else { " (stopped)" }
    );
}
