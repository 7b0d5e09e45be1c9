use argh::FromArgs;

/// Track a colored ball through a video and replay the frames around each contact
#[derive(FromArgs, Debug)]
pub struct Args {
    /// path to the (optional) video file; the camera is used when omitted
    #[argh(option, short = 'v')]
    pub video: Option<String>,

    /// camera device used when no video file is given
    #[argh(option, default = "String::from(\"/dev/video0\")")]
    pub camera: String,

    /// max trajectory buffer size
    #[argh(option, short = 'b', default = "64")]
    pub buffer: usize,

    /// use headless mode (no windows, frames are only counted)
    #[argh(switch)]
    pub headless: bool,

    /// select frames with a bounded sliding window instead of after the stream ends
    #[argh(switch)]
    pub streaming: bool,
}
