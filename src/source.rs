use crate::config::VideoSource;
use anyhow::{Context, Result};
use image::RgbImage;
use std::collections::VecDeque;
use tracing::{debug, warn};
use usls::{DataLoader, Image};

/// Ordered supply of raw frames
pub trait FrameSource {
    /// Next frame, or `None` when no frame could be read
    ///
    /// For finite sources `None` means the stream ended. For live sources it
    /// is a transient miss and the caller may ask again.
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;

    /// Whether `None` from `next_frame` means end of stream
    fn is_finite(&self) -> bool;
}

type Batches = Box<dyn Iterator<Item = Vec<Image>>>;

/// Frames decoded by the usls data loader: files, streams or camera devices
pub struct DataLoaderSource {
    location: String,
    live: bool,
    batches: Option<Batches>,
    pending: VecDeque<RgbImage>,
}

impl DataLoaderSource {
    /// Opens the source; failing here is a startup error
    pub fn open(source: &VideoSource) -> Result<Self> {
        let location = source.location().to_string();
        let batches = open_batches(&location)?;
        Ok(Self {
            location,
            live: !source.is_finite(),
            batches: Some(batches),
            pending: VecDeque::new(),
        })
    }
}

fn open_batches(location: &str) -> Result<Batches> {
    let loader = DataLoader::new(location)
        .with_context(|| format!("failed to open video source {}", location))?
        .with_batch(1)
        .build()
        .with_context(|| format!("failed to start decoding {}", location))?;
    Ok(Box::new(loader.into_iter()))
}

impl FrameSource for DataLoaderSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        if let Some(frame) = self.pending.pop_front() {
            return Ok(Some(frame));
        }

        let batch = self.batches.as_mut().and_then(|batches| batches.next());
        match batch {
            Some(images) => {
                self.pending.extend(images.iter().map(|img| img.to_rgb8()));
                Ok(self.pending.pop_front())
            }
            None if self.live => {
                // the device stopped delivering; reopen and let the caller retry
                debug!("live source {} returned no frame, reopening", self.location);
                self.batches = match open_batches(&self.location) {
                    Ok(batches) => Some(batches),
                    Err(e) => {
                        warn!("reopening {} failed: {:#}", self.location, e);
                        None
                    }
                };
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn is_finite(&self) -> bool {
        !self.live
    }
}

/// Frames held in memory, optionally interleaved with read misses
pub struct MemorySource {
    reads: VecDeque<Option<RgbImage>>,
    finite: bool,
}

impl MemorySource {
    /// A finite recording of `frames`
    pub fn recorded(frames: Vec<RgbImage>) -> Self {
        Self {
            reads: frames.into_iter().map(Some).collect(),
            finite: true,
        }
    }

    /// A live source replaying `reads`; `None` entries are transient misses
    pub fn live(reads: Vec<Option<RgbImage>>) -> Self {
        Self {
            reads: reads.into(),
            finite: false,
        }
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        Ok(self.reads.pop_front().flatten())
    }

    fn is_finite(&self) -> bool {
        self.finite
    }
}
