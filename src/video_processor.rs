use crate::config::TrackingTuning;
use crate::display::{Control, DisplaySink};
use crate::locator::ObjectLocator;
use crate::progress::VideoProgressTracker;
use crate::session::{TrackedFrame, TrackingSession};
use crate::source::FrameSource;
use crate::video_processor_utils::{self, StopSignal};
use anyhow::Result;
use chrono::{DateTime, Local};
use image::RgbImage;
use tracing::info;

/// Outcome of a full run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frames: usize,
    pub hits: usize,
    /// Frames handed to the display as hits or retained frames
    pub shown: usize,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

/// Base trait for processors that record tracked frames and replay a selection of them
pub trait VideoProcessor {
    /// Runs the live pass until the stream ends or a stop is requested, then
    /// replays the selected frames
    fn process_video<S: FrameSource, L: ObjectLocator>(
        &mut self,
        session: &mut TrackingSession<S, L>,
        display: &mut dyn DisplaySink,
        stop: &StopSignal,
        tuning: &TrackingTuning,
    ) -> Result<RunSummary> {
        let started_at = Local::now();
        let mut progress = VideoProgressTracker::new_unknown_total("live pass");

        while let Some(tracked) = session.step(stop)? {
            self.print_debug_info(session.stats().frames - 1, &tracked);
            progress.update_frame();

            let live = if self.shows_live_frames() {
                display.show(&tracked.annotated, tuning.live_hold)?
            } else {
                Control::Continue
            };

            let is_hit = tracked.is_hit();
            let recorded = self.record_frame(tracked.annotated, is_hit, display, tuning)?;

            // if the quit key is pressed, stop the loop
            if live == Control::Quit || recorded == Control::Quit {
                info!("quit requested, ending the live pass");
                break;
            }
        }
        progress.finish();

        let stats = session.stats();
        info!("live pass done: {} frames, {} hits", stats.frames, stats.hits);

        let shown = self.finish_stream(display, stop, tuning)?;
        Ok(RunSummary {
            frames: stats.frames,
            hits: stats.hits,
            shown,
            started_at,
            finished_at: Local::now(),
        })
    }

    /// Whether annotated frames are shown as they are tracked
    fn shows_live_frames(&self) -> bool {
        true
    }

    /// Stores one annotated frame (to be implemented by concrete processors)
    fn record_frame(
        &mut self,
        frame: RgbImage,
        is_hit: bool,
        display: &mut dyn DisplaySink,
        tuning: &TrackingTuning,
    ) -> Result<Control>;

    /// Called once after the live pass; returns how many frames were shown
    /// in total by the processor. A stop request arriving while it runs ends it.
    fn finish_stream(
        &mut self,
        display: &mut dyn DisplaySink,
        stop: &StopSignal,
        tuning: &TrackingTuning,
    ) -> Result<usize>;

    /// Prints debug information (can be overridden by concrete processors)
    fn print_debug_info(&self, index: usize, tracked: &TrackedFrame) {
        video_processor_utils::print_default_debug_info(index, tracked);
    }
}
