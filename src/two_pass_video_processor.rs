use crate::config::TrackingTuning;
use crate::display::{Control, DisplaySink};
use crate::history::{FrameRecord, FrameRecordStore};
use crate::playback::Playback;
use crate::retention;
use crate::video_processor::VideoProcessor;
use crate::video_processor_utils::StopSignal;
use anyhow::Result;
use image::RgbImage;

/// Records every frame, selects retained frames once the stream has ended,
/// then replays hits and retained frames
#[derive(Default)]
pub struct TwoPassVideoProcessor {
    store: FrameRecordStore,
}

impl TwoPassVideoProcessor {
    /// Creates a new two-pass processor
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &FrameRecordStore {
        &self.store
    }
}

impl VideoProcessor for TwoPassVideoProcessor {
    fn record_frame(
        &mut self,
        frame: RgbImage,
        is_hit: bool,
        _display: &mut dyn DisplaySink,
        _tuning: &TrackingTuning,
    ) -> Result<Control> {
        self.store.push(FrameRecord::new(frame, is_hit));
        Ok(Control::Continue)
    }

    fn finish_stream(
        &mut self,
        display: &mut dyn DisplaySink,
        stop: &StopSignal,
        tuning: &TrackingTuning,
    ) -> Result<usize> {
        retention::select_retained(&mut self.store, tuning.frame_buffer);
        Playback::new(&self.store).play(display, tuning.playback_hold, stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::HeadlessDisplay;
    use crate::geometry::Point;
    use crate::locator::{Detection, ObjectLocator};
    use crate::session::TrackingSession;
    use crate::source::MemorySource;
    use std::collections::VecDeque;

    struct ScriptedLocator(VecDeque<bool>);

    impl ObjectLocator for ScriptedLocator {
        fn locate(&mut self, _frame: &RgbImage) -> Result<Option<Detection>> {
            let hit = self.0.pop_front().unwrap_or(false);
            Ok(hit.then(|| Detection::at(Point::new(4, 4))))
        }
    }

    /// Raises the stop signal while locating frame `stop_at` (0-based)
    struct StoppingLocator {
        hits: VecDeque<bool>,
        stop: StopSignal,
        stop_at: usize,
        seen: usize,
    }

    impl ObjectLocator for StoppingLocator {
        fn locate(&mut self, _frame: &RgbImage) -> Result<Option<Detection>> {
            if self.seen == self.stop_at {
                self.stop.raise();
            }
            self.seen += 1;
            let hit = self.hits.pop_front().unwrap_or(false);
            Ok(hit.then(|| Detection::at(Point::new(4, 4))))
        }
    }

    fn tuning(frame_buffer: usize) -> TrackingTuning {
        TrackingTuning {
            working_width: 16,
            frame_buffer,
            playback_hold: std::time::Duration::ZERO,
            live_hold: std::time::Duration::ZERO,
            ..TrackingTuning::default()
        }
    }

    fn run(hits: &[bool], frame_buffer: usize) -> (TwoPassVideoProcessor, usize, usize) {
        let frames = (0..hits.len()).map(|_| RgbImage::new(16, 8)).collect();
        let locator = ScriptedLocator(hits.iter().copied().collect());
        let tuning = tuning(frame_buffer);
        let mut session = TrackingSession::new(MemorySource::recorded(frames), locator, 64, &tuning);
        let mut processor = TwoPassVideoProcessor::new();
        let mut display = HeadlessDisplay::default();
        let summary = processor
            .process_video(&mut session, &mut display, &StopSignal::new(), &tuning)
            .unwrap();
        assert_eq!(summary.frames, hits.len());
        assert!(summary.finished_at >= summary.started_at);
        (processor, summary.shown, display.shown())
    }

    #[test]
    fn test_sustained_contact_is_replayed_with_context() {
        let (processor, shown, displayed) = run(&[false, false, true, true, false], 4);
        assert_eq!(processor.store().hits(), vec![false, false, true, true, false]);
        assert_eq!(processor.store().retained(), vec![false, true, true, true, true]);
        assert_eq!(shown, 4);
        // five live frames plus four replayed
        assert_eq!(displayed, 9);
    }

    #[test]
    fn test_clip_without_hits_replays_nothing() {
        let (processor, shown, displayed) = run(&[false; 8], 30);
        assert_eq!(processor.store().len(), 8);
        assert_eq!(shown, 0);
        assert_eq!(displayed, 8);
    }

    #[test]
    fn test_empty_source_gives_empty_store() {
        let (processor, shown, _) = run(&[], 30);
        assert!(processor.store().is_empty());
        assert_eq!(shown, 0);
    }

    #[test]
    fn test_quit_during_live_pass_keeps_recorded_frames() {
        let hits = [true, true, false, false, false, false];
        let frames = (0..hits.len()).map(|_| RgbImage::new(16, 8)).collect();
        let tuning = tuning(4);
        let mut session = TrackingSession::new(
            MemorySource::recorded(frames),
            ScriptedLocator(hits.iter().copied().collect()),
            64,
            &tuning,
        );
        let mut processor = TwoPassVideoProcessor::new();
        let mut display = HeadlessDisplay::quitting_after(3);
        let summary = processor
            .process_video(&mut session, &mut display, &StopSignal::new(), &tuning)
            .unwrap();

        assert_eq!(processor.store().len(), 3);
        assert_eq!(summary.frames, 3);
        // anchor min(1 + 2, 2) = 2 marks 2, 1, 0; playback quits right away
        assert_eq!(processor.store().retained(), vec![true, true, true]);
        assert_eq!(summary.shown, 1);
    }

    #[test]
    fn test_stop_signal_mid_run_still_selects_and_replays() {
        let hits = [false, true, true, false, false, false, false, false, false, false];
        let frames = (0..hits.len()).map(|_| RgbImage::new(16, 8)).collect();
        let tuning = tuning(4);
        let stop = StopSignal::new();
        let locator = StoppingLocator {
            hits: hits.iter().copied().collect(),
            stop: stop.clone(),
            stop_at: 4,
            seen: 0,
        };
        let mut session = TrackingSession::new(MemorySource::recorded(frames), locator, 64, &tuning);
        let mut processor = TwoPassVideoProcessor::default();
        let mut display = HeadlessDisplay::default();
        let summary = processor.process_video(&mut session, &mut display, &stop, &tuning).unwrap();

        // the frame being located when the stop arrives is still recorded
        assert_eq!(processor.store().len(), 5);
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.hits, 2);
        // anchor min(2 + 2, 4) = 4 marks 4, 3, 2, 1
        assert_eq!(processor.store().retained(), vec![false, true, true, true, true]);
        assert_eq!(summary.shown, 4);
        assert_eq!(display.shown(), 5 + 4);
    }
}
