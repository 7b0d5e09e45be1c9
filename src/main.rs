use anyhow::Result;
use balltrail::cli::Args;
use balltrail::config::{self, SelectionMode};
use balltrail::display::{DisplaySink, HeadlessDisplay, ViewerDisplay};
use balltrail::locator::ColorBlobLocator;
use balltrail::progress::format_duration;
use balltrail::session::TrackingSession;
use balltrail::source::DataLoaderSource;
use balltrail::streaming_video_processor::StreamingVideoProcessor;
use balltrail::two_pass_video_processor::TwoPassVideoProcessor;
use balltrail::video_processor::VideoProcessor;
use balltrail::video_processor_utils::{self, StopSignal};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Respect RUST_LOG; default to info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Args = argh::from_env();
    let config = config::build_config(&args)?;
    info!("source: {:?}", config.source);
    info!("buffer size: {}, mode: {:?}", config.buffer_size, config.mode);

    // An unavailable source is reported before any frame is processed
    let source = DataLoaderSource::open(&config.source)?;
    let locator = ColorBlobLocator::new(&config.tuning);
    let mut session = TrackingSession::new(source, locator, config.buffer_size, &config.tuning);

    let stop = StopSignal::new();
    video_processor_utils::spawn_ctrl_c_listener(stop.clone());

    let mut display: Box<dyn DisplaySink> = if config.headless {
        Box::new(HeadlessDisplay::default())
    } else {
        Box::new(ViewerDisplay::new())
    };

    // Choose processor based on selection mode
    let summary = match config.mode {
        SelectionMode::TwoPass => {
            let mut processor = TwoPassVideoProcessor::new();
            processor.process_video(&mut session, display.as_mut(), &stop, &config.tuning)?
        }
        SelectionMode::Streaming => {
            let mut processor = StreamingVideoProcessor::new(config.tuning.frame_buffer);
            processor.process_video(&mut session, display.as_mut(), &stop, &config.tuning)?
        }
    };

    let elapsed = (summary.finished_at - summary.started_at).num_milliseconds() as f64 / 1000.0;
    info!(
        "session {} - {} ({}): {} frames, {} hits, {} shown",
        summary.started_at.format("%Y-%m-%d %H:%M:%S"),
        summary.finished_at.format("%H:%M:%S"),
        format_duration(elapsed),
        summary.frames,
        summary.hits,
        summary.shown
    );

    Ok(())
}
