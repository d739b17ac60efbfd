//! Scene viewer
//!
//! Run with:
//!   cargo run
//!   cargo run -- --config viewer.toml --seed 7
//!   cargo run -- --headless --frames 600 --dt 0.016
//!
//! Controls: see `scene_viewer::input`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use scene_viewer::{window, FrameInput, LogSink, Viewer, ViewerConfig, ViewerResult};

#[derive(Parser, Debug)]
#[command(name = "scene-viewer", about = "Free-fly scene viewer with day/night cycle")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for actor goal sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Simulate without opening a window
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Seconds per headless frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Window width override
    #[arg(long)]
    width: Option<u32>,

    /// Window height override
    #[arg(long)]
    height: Option<u32>,

    /// Log a frame summary every N frames
    #[arg(long, default_value_t = 60)]
    summary_interval: u64,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("scene-viewer: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> ViewerResult<()> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    config.validate()?;

    let mut viewer = Viewer::from_config(&config);
    let mut sink = LogSink::new(args.summary_interval);

    if args.headless {
        log::info!("Headless run: {} frames at dt={}", args.frames, args.dt);
        let input = FrameInput::default();
        for _ in 0..args.frames {
            viewer.step(&input, args.dt, config.aspect(), &mut sink)?;
        }
        return Ok(());
    }

    window::run(&config, viewer, sink)
}
