use crate::display::{Control, DisplaySink};
use crate::history::{FrameRecord, FrameRecordStore};
use crate::progress::VideoProgressTracker;
use crate::video_processor_utils::StopSignal;
use anyhow::Result;
use std::time::Duration;
use tracing::info;

/// Read-only view over the frames worth replaying
pub struct Playback<'a> {
    store: &'a FrameRecordStore,
}

impl<'a> Playback<'a> {
    pub fn new(store: &'a FrameRecordStore) -> Self {
        Self { store }
    }

    /// Hit or retained records in capture order; can be called any number of times
    pub fn frames(&self) -> impl Iterator<Item = &'a FrameRecord> + 'a {
        self.store.records().iter().filter(|r| r.is_selected())
    }

    pub fn len(&self) -> usize {
        self.frames().count()
    }

    pub fn is_empty(&self) -> bool {
        self.frames().next().is_none()
    }

    /// Shows every selected frame for `hold`, stopping early on quit or on a
    /// stop request newer than the ones already counted when playback starts
    pub fn play(&self, display: &mut dyn DisplaySink, hold: Duration, stop: &StopSignal) -> Result<usize> {
        let total = self.len();
        info!("playback: {} of {} frames selected", total, self.store.len());
        let seen = stop.requests();
        let mut progress = VideoProgressTracker::new(total as u64, "playback");
        let mut shown = 0;
        for record in self.frames() {
            if stop.raised_since(seen) {
                info!("stop requested, playback ends after {} frames", shown);
                break;
            }
            let control = display.show(&record.frame, hold)?;
            shown += 1;
            progress.update_frame();
            if control == Control::Quit {
                info!("playback stopped after {} frames", shown);
                break;
            }
        }
        progress.finish();
        Ok(shown)
    }
}
