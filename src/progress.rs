use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Progress reporting for the live pass and playback
pub struct VideoProgressTracker {
    progress_bar: ProgressBar,
    start_time: Instant,
    total_frames: Option<u64>,
    processed_frames: u64,
}

impl VideoProgressTracker {
    /// Creates a new progress tracker with known total frames
    pub fn new(total_frames: u64, operation_name: &str) -> Self {
        let progress_bar = ProgressBar::new(total_frames);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({percent}%) | {msg}")
        {
            progress_bar.set_style(style.progress_chars("#>-"));
        }
        progress_bar.set_message(operation_name.to_string());

        Self {
            progress_bar,
            start_time: Instant::now(),
            total_frames: Some(total_frames),
            processed_frames: 0,
        }
    }

    /// Creates a new progress tracker for streams of unknown length
    pub fn new_unknown_total(operation_name: &str) -> Self {
        let progress_bar = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} frames | {msg}")
        {
            progress_bar.set_style(style);
        }
        progress_bar.set_message(operation_name.to_string());

        Self {
            progress_bar,
            start_time: Instant::now(),
            total_frames: None,
            processed_frames: 0,
        }
    }

    /// Updates the progress by one frame
    pub fn update_frame(&mut self) {
        self.processed_frames += 1;
        self.progress_bar.inc(1);
        let msg = self.get_progress_message();
        self.progress_bar.set_message(msg);
    }

    fn get_progress_message(&self) -> String {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let fps = if elapsed > 0.0 {
            self.processed_frames as f64 / elapsed
        } else {
            0.0
        };
        format!("Speed: {:.1} fps", fps)
    }

    /// Finishes the progress bar
    pub fn finish(&self) {
        let total_time = self.start_time.elapsed();
        let avg_fps = if total_time.as_secs_f64() > 0.0 {
            self.processed_frames as f64 / total_time.as_secs_f64()
        } else {
            0.0
        };
        self.progress_bar.finish_with_message(format!(
            "Completed! {} frames in {} | Avg FPS: {:.1}",
            self.processed_frames,
            format_duration(total_time.as_secs_f64()),
            avg_fps
        ));
    }

    /// Gets the total number of frames
    pub fn total_frames(&self) -> Option<u64> {
        self.total_frames
    }

    /// Gets the current number of processed frames
    pub fn processed_frames(&self) -> u64 {
        self.processed_frames
    }
}

/// Formats a duration in seconds to h:mm:ss format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
