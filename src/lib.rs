pub mod annotate;
pub mod background;
pub mod cli;
pub mod config;
pub mod display;
pub mod geometry;
pub mod history;
pub mod locator;
pub mod mask;
pub mod playback;
pub mod progress;
pub mod retention;
pub mod session;
pub mod source;
pub mod streaming_video_processor;
pub mod trajectory;
pub mod two_pass_video_processor;
pub mod video_processor;
pub mod video_processor_utils;
