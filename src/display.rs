use anyhow::Result;
use image::RgbImage;
use std::time::Duration;
use usls::{Image, Key, Viewer};

/// What the viewer asked the caller to do after showing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Something that can put a frame in front of the user
pub trait DisplaySink {
    /// Shows `frame` and waits up to `hold` for a quit request
    fn show(&mut self, frame: &RgbImage, hold: Duration) -> Result<Control>;
}

/// Window backed by the usls viewer; Escape, `q` or closing the window quits
#[derive(Default)]
pub struct ViewerDisplay {
    viewer: Viewer,
}

impl ViewerDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Keys that end the current pass
pub fn is_quit_key(key: Key) -> bool {
    matches!(key, Key::Escape | Key::Q)
}

impl DisplaySink for ViewerDisplay {
    fn show(&mut self, frame: &RgbImage, hold: Duration) -> Result<Control> {
        if self.viewer.is_window_exist() && !self.viewer.is_window_open() {
            return Ok(Control::Quit);
        }

        self.viewer.imshow(&Image::from(frame.clone()))?;

        // Handle key events and delay
        let delay = hold.as_millis().max(1).try_into().unwrap_or(1);
        if let Some(key) = self.viewer.wait_key(delay) {
            if is_quit_key(key) {
                return Ok(Control::Quit);
            }
        }
        Ok(Control::Continue)
    }
}

/// Display that only counts frames, used with `--headless` and in tests
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    shown: usize,
    quit_after: Option<usize>,
}

impl HeadlessDisplay {
    /// Asks to quit once `frames` frames were shown
    pub fn quitting_after(frames: usize) -> Self {
        Self {
            shown: 0,
            quit_after: Some(frames),
        }
    }

    pub fn shown(&self) -> usize {
        self.shown
    }
}

impl DisplaySink for HeadlessDisplay {
    fn show(&mut self, _frame: &RgbImage, _hold: Duration) -> Result<Control> {
        self.shown += 1;
        match self.quit_after {
            Some(limit) if self.shown >= limit => Ok(Control::Quit),
            _ => Ok(Control::Continue),
        }
    }
}
