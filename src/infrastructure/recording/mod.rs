//! Recording infrastructure module
//!
//! Clips are captured by an external `ffmpeg` process.

mod ffmpeg;

pub use ffmpeg::FfmpegClipRecorder;
