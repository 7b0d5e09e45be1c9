use crate::annotate;
use crate::config::TrackingTuning;
use crate::locator::{Detection, ObjectLocator};
use crate::source::FrameSource;
use crate::trajectory::TrajectoryBuffer;
use crate::video_processor_utils::StopSignal;
use anyhow::Result;
use image::RgbImage;
use image::imageops::{FilterType, resize};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Pause between reads of a live source that returned nothing
const LIVE_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Result of tracking one frame
pub struct TrackedFrame {
    /// Copy of the frame with trail and markers drawn
    pub annotated: RgbImage,
    pub detection: Option<Detection>,
    /// Trail segments drawn on `annotated`
    pub segments: usize,
}

impl TrackedFrame {
    pub fn is_hit(&self) -> bool {
        self.detection.is_some()
    }
}

/// Counters of a session so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: usize,
    pub hits: usize,
    /// Live reads that returned no frame and were retried
    pub misses: usize,
}

/// All state of one tracking run: the source, the locator and the trail
///
/// Created when the run starts and owned by the pass that drives it.
pub struct TrackingSession<S, L> {
    source: S,
    locator: L,
    trajectory: TrajectoryBuffer,
    working_width: u32,
    stats: SessionStats,
}

impl<S: FrameSource, L: ObjectLocator> TrackingSession<S, L> {
    pub fn new(source: S, locator: L, buffer_size: usize, tuning: &TrackingTuning) -> Self {
        Self {
            source,
            locator,
            trajectory: TrajectoryBuffer::new(buffer_size, tuning.thickness_scale),
            working_width: tuning.working_width,
            stats: SessionStats::default(),
        }
    }

    /// Reads the next frame, retrying live misses until a frame arrives or
    /// `stop` is raised; `None` ends the pass
    pub fn next_frame(&mut self, stop: &StopSignal) -> Result<Option<RgbImage>> {
        loop {
            if stop.is_raised() {
                return Ok(None);
            }
            match self.source.next_frame()? {
                Some(frame) => return Ok(Some(self.fit_width(frame))),
                None if self.source.is_finite() => return Ok(None),
                None => {
                    self.stats.misses += 1;
                    debug!("live source missed a frame ({} so far)", self.stats.misses);
                    thread::sleep(LIVE_RETRY_DELAY);
                }
            }
        }
    }

    fn fit_width(&self, frame: RgbImage) -> RgbImage {
        let (width, height) = frame.dimensions();
        if width == self.working_width || width == 0 {
            return frame;
        }
        let new_height = ((height as f64 * self.working_width as f64 / width as f64).round() as u32).max(1);
        resize(&frame, self.working_width, new_height, FilterType::Triangle)
    }

    /// Locates the object, extends the trail and annotates a copy of `frame`
    pub fn track(&mut self, frame: &RgbImage) -> TrackedFrame {
        let detection = match self.locator.locate(frame) {
            Ok(detection) => detection,
            Err(e) => {
                warn!("locating failed on frame {}: {:#}", self.stats.frames, e);
                None
            }
        };

        self.trajectory.push(detection.map(|d| d.center));
        let (annotated, segments) = annotate::annotate_frame(frame, &self.trajectory, detection.as_ref());

        self.stats.frames += 1;
        if detection.is_some() {
            self.stats.hits += 1;
        }
        TrackedFrame {
            annotated,
            detection,
            segments,
        }
    }

    /// Reads and tracks the next frame
    pub fn step(&mut self, stop: &StopSignal) -> Result<Option<TrackedFrame>> {
        let Some(frame) = self.next_frame(stop)? else {
            return Ok(None);
        };
        Ok(Some(self.track(&frame)))
    }

    pub fn trajectory(&self) -> &TrajectoryBuffer {
        &self.trajectory
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }
}
