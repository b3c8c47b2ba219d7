//! gesture-canvas: headless driver for the gesture canvas pipeline.
//!
//! Plays a scripted hand-tracking scenario through a canvas session and
//! logs what would be drawn.

mod backend;

use clap::Parser;
use gesture_canvas::CanvasConfig;
use tracing::info;

use backend::headless::{HeadlessConfig, Scenario};

#[derive(Parser, Debug)]
#[command(
    name = "gesture-canvas",
    version,
    about = "Hand-gesture drawing canvas (headless driver)"
)]
struct Cli {
    /// Scripted gesture scenario to play
    #[arg(long, value_enum, default_value_t = Scenario::Tour)]
    scenario: Scenario,

    /// Stop after N frames (default: play the whole script)
    #[arg(long)]
    frames: Option<u64>,

    /// Nominal frame rate of the synthetic detector
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Surface width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 720.0)]
    height: f32,

    /// Pace frames to wall-clock time
    #[arg(long)]
    realtime: bool,

    /// Thumb-to-finger distance that counts as a pinch (normalized)
    #[arg(long)]
    pinch_threshold: Option<f32>,

    /// How long the thumbs must stay joined before clearing (ms)
    #[arg(long)]
    clear_hold_ms: Option<f64>,

    /// Fingertip smoothing factor (0-1]
    #[arg(long)]
    smoothing: Option<f32>,

    /// Eraser radius in pixels
    #[arg(long)]
    erase_radius: Option<f32>,
}

impl Cli {
    fn canvas_config(&self) -> CanvasConfig {
        let mut config = CanvasConfig::default();
        if let Some(v) = self.pinch_threshold {
            config.pinch_threshold = v;
        }
        if let Some(v) = self.clear_hold_ms {
            config.clear_hold_ms = v;
        }
        if let Some(v) = self.smoothing {
            config.smoothing = v;
        }
        if let Some(v) = self.erase_radius {
            config.erase_radius = v;
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_canvas=info".into()),
        )
        .init();

    info!("gesture-canvas v{} starting", env!("CARGO_PKG_VERSION"));

    backend::headless::run(HeadlessConfig {
        scenario: cli.scenario,
        width: cli.width,
        height: cli.height,
        fps: cli.fps,
        max_frames: cli.frames,
        realtime: cli.realtime,
        canvas: cli.canvas_config(),
    })
}
