use crate::cli::Args;
use crate::mask::Hsv;
use anyhow::{Result, ensure};
use std::time::Duration;

/// Number of frames marked around each sustained detection
pub const FRAME_BUFFER: usize = 30;

/// Where frames come from
#[derive(Debug, Clone, PartialEq)]
pub enum VideoSource {
    /// A recorded, finite video file
    File(String),
    /// A live camera device; missing frames are retried
    Camera(String),
}

impl VideoSource {
    pub fn location(&self) -> &str {
        match self {
            VideoSource::File(path) => path,
            VideoSource::Camera(device) => device,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, VideoSource::File(_))
    }
}

/// How retained frames are selected and replayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Record every frame, select after the stream ends
    TwoPass,
    /// Keep a window of `FRAME_BUFFER` frames and emit with a bounded delay
    Streaming,
}

/// Fixed tuning values of the tracker
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingTuning {
    /// Lower HSV bound of the tracked color (inclusive)
    pub color_lower: Hsv,
    /// Upper HSV bound of the tracked color (inclusive)
    pub color_upper: Hsv,
    /// Enclosing-circle radius a region must exceed to count
    pub min_radius: f32,
    /// Multiplier of the tapered trail thickness
    pub thickness_scale: f32,
    /// Frames are resized to this width before tracking
    pub working_width: u32,
    pub frame_buffer: usize,
    /// How long each replayed frame stays on screen
    pub playback_hold: Duration,
    /// Wait between live frames, used to poll the quit key
    pub live_hold: Duration,
}

impl Default for TrackingTuning {
    fn default() -> Self {
        Self {
            color_lower: Hsv::new(29, 86, 6),
            color_upper: Hsv::new(64, 255, 255),
            min_radius: 0.1,
            thickness_scale: 2.5,
            working_width: 600,
            frame_buffer: FRAME_BUFFER,
            playback_hold: Duration::from_millis(100),
            live_hold: Duration::from_millis(1),
        }
    }
}

/// Validated startup configuration of a tracking session
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub source: VideoSource,
    pub buffer_size: usize,
    pub mode: SelectionMode,
    pub headless: bool,
    pub tuning: TrackingTuning,
}

impl TrackerConfig {
    pub fn new(source: VideoSource, buffer_size: usize) -> Self {
        Self {
            source,
            buffer_size,
            mode: SelectionMode::TwoPass,
            headless: false,
            tuning: TrackingTuning::default(),
        }
    }

    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_tuning(mut self, tuning: TrackingTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Checks values that would make the session meaningless
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.source.location().trim().is_empty(),
            "video source must not be empty"
        );
        let (lo, hi) = (&self.tuning.color_lower, &self.tuning.color_upper);
        ensure!(
            lo.h <= hi.h && lo.s <= hi.s && lo.v <= hi.v,
            "color bounds are inverted: lower {:?}, upper {:?}",
            lo,
            hi
        );
        ensure!(self.tuning.working_width > 0, "working width must be positive");
        Ok(())
    }
}

/// Builds a tracker configuration from command line arguments
pub fn build_config(args: &Args) -> Result<TrackerConfig> {
    let source = match &args.video {
        Some(path) => VideoSource::File(path.clone()),
        None => VideoSource::Camera(args.camera.clone()),
    };
    let mode = if args.streaming {
        SelectionMode::Streaming
    } else {
        SelectionMode::TwoPass
    };

    let config = TrackerConfig::new(source, args.buffer)
        .with_mode(mode)
        .with_headless(args.headless);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(video: Option<&str>) -> Args {
        Args {
            video: video.map(String::from),
            camera: String::from("/dev/video0"),
            buffer: 64,
            headless: true,
            streaming: false,
        }
    }

    #[test]
    fn test_missing_video_uses_camera() {
        let config = build_config(&args(None)).unwrap();
        assert_eq!(config.source, VideoSource::Camera("/dev/video0".into()));
        assert!(!config.source.is_finite());
        assert_eq!(config.buffer_size, 64);
        assert_eq!(config.mode, SelectionMode::TwoPass);
    }

    #[test]
    fn test_video_path_is_finite() {
        let mut a = args(Some("clip.mp4"));
        a.streaming = true;
        let config = build_config(&a).unwrap();
        assert!(config.source.is_finite());
        assert_eq!(config.mode, SelectionMode::Streaming);
        assert!(config.headless);
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(build_config(&args(Some("  "))).is_err());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let tuning = TrackingTuning {
            color_lower: Hsv::new(70, 86, 6),
            ..TrackingTuning::default()
        };
        let config = TrackerConfig::new(VideoSource::File("a.mp4".into()), 8).with_tuning(tuning);
        assert!(config.validate().is_err());
    }
}
