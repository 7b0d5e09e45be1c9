use crate::config::TrackingTuning;
use crate::display::{Control, DisplaySink};
use crate::history::FrameRecord;
use crate::retention::StreamingSelector;
use crate::session::TrackedFrame;
use crate::video_processor::VideoProcessor;
use crate::video_processor_utils::{self, StopSignal};
use anyhow::Result;
use image::RgbImage;
use tracing::{debug, info};

/// Video processor that keeps only a sliding window of frames and shows
/// each selected frame as soon as its retain flag can no longer change
pub struct StreamingVideoProcessor {
    selector: Option<StreamingSelector>,
    frame_buffer: usize,
    shown: usize,
    quit: bool,
}

impl StreamingVideoProcessor {
    /// Creates a new streaming processor with a window of `frame_buffer` frames
    pub fn new(frame_buffer: usize) -> Self {
        Self {
            selector: Some(StreamingSelector::new(frame_buffer)),
            frame_buffer,
            shown: 0,
            quit: false,
        }
    }

    fn show(&mut self, record: &FrameRecord, display: &mut dyn DisplaySink, tuning: &TrackingTuning) -> Result<Control> {
        if self.quit {
            return Ok(Control::Quit);
        }
        let control = display.show(&record.frame, tuning.playback_hold)?;
        self.shown += 1;
        if control == Control::Quit {
            self.quit = true;
        }
        Ok(control)
    }
}

impl VideoProcessor for StreamingVideoProcessor {
    fn shows_live_frames(&self) -> bool {
        false
    }

    fn record_frame(
        &mut self,
        frame: RgbImage,
        is_hit: bool,
        display: &mut dyn DisplaySink,
        tuning: &TrackingTuning,
    ) -> Result<Control> {
        let selector = self
            .selector
            .get_or_insert_with(|| StreamingSelector::new(self.frame_buffer));
        match selector.push(FrameRecord::new(frame, is_hit)) {
            Some(record) => self.show(&record, display, tuning),
            None => Ok(Control::Continue),
        }
    }

    fn finish_stream(
        &mut self,
        display: &mut dyn DisplaySink,
        stop: &StopSignal,
        tuning: &TrackingTuning,
    ) -> Result<usize> {
        let seen = stop.requests();
        if let Some(selector) = self.selector.take() {
            let remaining = selector.finish();
            debug!("flushing {} selected frames from the window", remaining.len());
            for record in &remaining {
                if stop.raised_since(seen) {
                    info!("stop requested, flush ends after {} frames", self.shown);
                    break;
                }
                if self.show(record, display, tuning)? == Control::Quit {
                    break;
                }
            }
        }
        info!("streaming selection showed {} frames", self.shown);
        Ok(self.shown)
    }

    /// Override debug info to include the window fill
    fn print_debug_info(&self, index: usize, tracked: &TrackedFrame) {
        video_processor_utils::print_default_debug_info(index, tracked);
        if let Some(selector) = &self.selector {
            debug!("window: {}/{}", selector.buffered(), self.frame_buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::HeadlessDisplay;
    use crate::geometry::Point;
    use crate::locator::{Detection, ObjectLocator};
    use crate::retention;
    use crate::session::TrackingSession;
    use crate::source::MemorySource;
    use std::collections::VecDeque;
    use std::time::Duration;

    struct ScriptedLocator(VecDeque<bool>);

    impl ObjectLocator for ScriptedLocator {
        fn locate(&mut self, _frame: &RgbImage) -> Result<Option<Detection>> {
            let hit = self.0.pop_front().unwrap_or(false);
            Ok(hit.then(|| Detection::at(Point::new(2, 2))))
        }
    }

    fn run(hits: &[bool], frame_buffer: usize, display: &mut HeadlessDisplay) -> usize {
        let tuning = TrackingTuning {
            working_width: 8,
            frame_buffer,
            playback_hold: Duration::ZERO,
            live_hold: Duration::ZERO,
            ..TrackingTuning::default()
        };
        let frames = (0..hits.len()).map(|_| RgbImage::new(8, 8)).collect();
        let mut session = TrackingSession::new(
            MemorySource::recorded(frames),
            ScriptedLocator(hits.iter().copied().collect()),
            16,
            &tuning,
        );
        let mut processor = StreamingVideoProcessor::new(frame_buffer);
        processor
            .process_video(&mut session, display, &StopSignal::new(), &tuning)
            .unwrap()
            .shown
    }

    #[test]
    fn test_shows_same_count_as_two_pass_selection() {
        let hits = [
            false, true, true, false, false, false, false, false, false, true, false, true, true, true, false,
            false, false, false, false, false, false, false,
        ];
        for frame_buffer in [2, 4, 6, 30] {
            let flags = retention::retained_flags(&hits, frame_buffer);
            let expected = (0..hits.len()).filter(|&i| hits[i] || flags[i]).count();
            let mut display = HeadlessDisplay::default();
            assert_eq!(run(&hits, frame_buffer, &mut display), expected);
            // live frames are not shown in streaming mode
            assert_eq!(display.shown(), expected);
        }
    }

    #[test]
    fn test_quit_while_emitting_ends_the_run() {
        let hits = [true; 12];
        let mut display = HeadlessDisplay::quitting_after(2);
        assert_eq!(run(&hits, 4, &mut display), 2);
    }

    /// Raises a stop request while showing its `at`-th frame
    struct StoppingDisplay {
        stop: StopSignal,
        at: usize,
        shown: usize,
    }

    impl DisplaySink for StoppingDisplay {
        fn show(&mut self, _frame: &RgbImage, _hold: Duration) -> Result<Control> {
            self.shown += 1;
            if self.shown == self.at {
                self.stop.raise();
            }
            Ok(Control::Continue)
        }
    }

    #[test]
    fn test_stop_during_flush_ends_it() {
        let tuning = TrackingTuning {
            playback_hold: Duration::ZERO,
            ..TrackingTuning::default()
        };
        let mut processor = StreamingVideoProcessor::new(8);
        let stop = StopSignal::new();
        let mut display = StoppingDisplay {
            stop: stop.clone(),
            at: 3,
            shown: 0,
        };
        for _ in 0..6 {
            let control = processor
                .record_frame(RgbImage::new(2, 2), true, &mut display, &tuning)
                .unwrap();
            assert_eq!(control, Control::Continue);
        }
        // the window still holds all six selected frames
        assert_eq!(display.shown, 0);
        let shown = processor.finish_stream(&mut display, &stop, &tuning).unwrap();
        assert_eq!(shown, 3);
        assert_eq!(display.shown, 3);
    }

    #[test]
    fn test_stop_from_live_pass_still_flushes() {
        let tuning = TrackingTuning {
            playback_hold: Duration::ZERO,
            ..TrackingTuning::default()
        };
        let mut processor = StreamingVideoProcessor::new(8);
        let mut display = HeadlessDisplay::default();
        for _ in 0..6 {
            processor
                .record_frame(RgbImage::new(2, 2), true, &mut display, &tuning)
                .unwrap();
        }
        let stop = StopSignal::new();
        stop.raise();
        assert_eq!(processor.finish_stream(&mut display, &stop, &tuning).unwrap(), 6);
    }
}
