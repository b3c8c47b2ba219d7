//! Frame sources and the frame loop that feeds them into a session.

pub mod headless;

use std::time::{Duration, Instant};

use anyhow::Context;
use gesture_canvas::hand::RawHand;
use gesture_canvas::render::FrameRenderer;
use gesture_canvas::CanvasSession;
use tracing::{debug, info};

/// Anything that yields detector results one frame at a time.
pub trait LandmarkSource {
    /// Hands detected in the next frame.  `None` ends the stream.
    fn next_frame(&mut self) -> Option<Vec<RawHand>>;

    /// Release the underlying detector / camera.
    fn close(&mut self);
}

/// Frame loop settings.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Nominal frame interval in milliseconds.
    pub frame_interval_ms: f64,
    /// Stop after this many frames even if the source keeps going.
    pub max_frames: Option<u64>,
    /// Sleep between frames to match wall-clock time.
    pub realtime: bool,
}

/// Pull frames from `source` until it ends, drive the session, and hand
/// each descriptor to `renderer`.  Fails without pulling a frame if the
/// frame interval is not a representable duration; otherwise the source
/// is always closed.  Returns the number of frames processed.
pub fn run_loop<S, R>(
    session: &mut CanvasSession,
    source: &mut S,
    renderer: &mut R,
    config: &LoopConfig,
) -> anyhow::Result<u64>
where
    S: LandmarkSource,
    R: FrameRenderer,
{
    let interval = Duration::try_from_secs_f64(config.frame_interval_ms / 1000.0)
        .with_context(|| format!("invalid frame interval {}ms", config.frame_interval_ms))?;
    let mut frames = 0u64;

    while config.max_frames.map_or(true, |max| frames < max) {
        let started = Instant::now();
        let Some(hands) = source.next_frame() else {
            debug!("Landmark source exhausted after {} frames", frames);
            break;
        };

        // Frame timestamps follow the nominal rate so runs are reproducible.
        let now_ms = frames as f64 * config.frame_interval_ms;
        let report = session.process_frame(&hands, now_ms);
        renderer.draw(&report.render);

        for event in &report.events {
            debug!("frame {}: {:?}", frames, event);
        }
        frames += 1;

        if config.realtime {
            if let Some(remaining) = interval.checked_sub(started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    source.close();
    info!("Frame loop finished after {} frames", frames);
    Ok(frames)
}
