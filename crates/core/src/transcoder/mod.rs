//! Transcoder module for converting in-memory media payloads.
//!
//! The `Transcoder` trait takes a resolved byte payload plus a target
//! format and returns the transcoded bytes. The FFmpeg implementation
//! picks one of two execution strategies per request: streaming through
//! the process's standard pipes, or staging through temporary files when
//! the target container needs seekable output (MP4-family muxers).
//!
//! Audio conversions also recover the output duration in whole seconds
//! from the process's diagnostic stream.

mod config;
mod duration;
mod error;
mod ffmpeg;
mod plan;
mod pool;
mod runner;
mod traits;
mod types;

pub use config::TranscoderConfig;
pub use duration::extract_duration_secs;
pub use error::TranscodeError;
pub use ffmpeg::FfmpegTranscoder;
pub use plan::{ExecutionPlan, IoMode};
pub use pool::{BufferPool, PooledBuffer};
pub use runner::ProcessRunner;
pub use traits::Transcoder;
pub use types::{ConversionOutput, ConversionRequest, OutputFormat, ProcessOutcome};
