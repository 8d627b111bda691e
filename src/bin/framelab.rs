use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use framelab::{
    DisplaySurface as _, DriverState, FrameRing, Gradient, LoopDriver, ManualScheduler,
    PixelBuffer, SessionConfig, SurfaceSet, TransformOutput, TransformSpec, apply_transform,
    colorize_field,
};

#[derive(Parser, Debug)]
#[command(name = "framelab", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a headless session and write view snapshots as PNGs.
    Run(RunArgs),
    /// Apply one single-frame transform (affine or spectrum) to an image.
    Still(StillArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Session config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Output directory for snapshots and `summary.json`.
    #[arg(long)]
    out: PathBuf,

    /// Write snapshots every k processed frames (the last frame is always written).
    #[arg(long)]
    snapshot_every: Option<u64>,

    /// Pace ticks in wall-clock time at the target rate instead of simulating time.
    #[arg(long)]
    realtime: bool,
}

#[derive(Parser, Debug)]
struct StillArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Transform JSON, e.g. `{"kind":"affine","rotation_deg":30}`.
    #[arg(long)]
    transform: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Still(args) => cmd_still(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    let cfg = match path {
        Some(p) => SessionConfig::load(p)?,
        None => {
            let mut cfg = SessionConfig::default();
            cfg.apply_env_overrides();
            cfg.validate()?;
            cfg
        }
    };
    Ok(cfg)
}

fn write_png(path: &Path, frame: &PixelBuffer) -> anyhow::Result<()> {
    image::save_buffer_with_format(
        path,
        frame.data(),
        frame.width(),
        frame.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn write_snapshots(out: &Path, tick: u64, surfaces: &SurfaceSet) -> anyhow::Result<usize> {
    let mut written = 0;
    for (kind, surface) in surfaces.iter() {
        let path = out.join(format!("{}_{tick:05}.png", kind.as_str()));
        write_png(&path, &surface.snapshot())?;
        written += 1;
    }
    Ok(written)
}

#[derive(serde::Serialize)]
struct ViewSummary {
    view: &'static str,
    labels: Vec<framelab::Label>,
}

#[derive(serde::Serialize)]
struct RunSummary {
    state: DriverState,
    stats: framelab::DriverStats,
    last_motion: Option<framelab::MotionSummary>,
    failure: Option<String>,
    snapshots_written: usize,
    views: Vec<ViewSummary>,
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let mut driver = LoopDriver::new(
        ManualScheduler::new(),
        cfg.initial_controls(),
        SurfaceSet::cpu(),
        cfg.driver_options(),
    )?;
    driver.set_source(cfg.build_source()?);
    driver.start();

    let interval = cfg.frame_interval();
    let every = args.snapshot_every.filter(|&k| k > 0);
    let started = Instant::now();
    let mut failure = driver.take_failure_notice();
    let mut snapshots_written = 0;
    let mut processed = 0u64;

    for i in 0..args.frames {
        if driver.scheduler_mut().fire().is_none() {
            break;
        }
        let now = if args.realtime {
            let due = interval.mul_f64(i as f64);
            if let Some(wait) = due.checked_sub(started.elapsed()) {
                std::thread::sleep(wait);
            }
            started.elapsed()
        } else {
            interval.mul_f64(i as f64)
        };

        let report = driver.tick(now);
        if let Some(notice) = driver.take_failure_notice() {
            eprintln!("source unavailable: {notice}");
            failure = Some(notice);
        }
        if report.processed {
            processed += 1;
            if every.is_some_and(|k| processed.is_multiple_of(k)) {
                snapshots_written += write_snapshots(&args.out, processed, driver.surfaces())?;
            }
        }
    }

    if processed > 0 && !every.is_some_and(|k| processed.is_multiple_of(k)) {
        snapshots_written += write_snapshots(&args.out, processed, driver.surfaces())?;
    }

    let summary = RunSummary {
        state: driver.state(),
        stats: driver.stats().clone(),
        last_motion: driver.last_motion().cloned(),
        failure,
        snapshots_written,
        views: driver
            .surfaces()
            .iter()
            .map(|(kind, s)| ViewSummary {
                view: kind.as_str(),
                labels: s.labels().to_vec(),
            })
            .collect(),
    };
    driver.stop();

    let summary_path = args.out.join("summary.json");
    let json = serde_json::to_string_pretty(&summary).context("serialize run summary")?;
    std::fs::write(&summary_path, json)
        .with_context(|| format!("write summary '{}'", summary_path.display()))?;

    eprintln!(
        "processed {processed} frames ({} skipped), wrote {}",
        summary.stats.frames_skipped,
        args.out.display()
    );
    Ok(())
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let spec: TransformSpec =
        serde_json::from_str(&args.transform).context("parse transform JSON")?;
    spec.validate()?;

    let img = image::open(&args.in_path)
        .with_context(|| format!("decode image '{}'", args.in_path.display()))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    let frame = PixelBuffer::from_raw(w, h, img.into_raw())?;

    let mut ring = FrameRing::new(1)?;
    ring.push(frame)?;
    let out = apply_transform(&spec, &ring)?.with_context(|| {
        format!(
            "{} needs more than one frame of history",
            spec.kind().as_str()
        )
    })?;
    let rendered = match out {
        TransformOutput::Pixels(p) => p,
        TransformOutput::Field(f) => colorize_field(&f, &Gradient::Grayscale),
        TransformOutput::Motion(_) => anyhow::bail!("motion output has no still rendering"),
    };

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(&args.out, &rendered)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
