//! Testing utilities and mock implementations.
//!
//! This module provides a mock implementation of the `Transcoder` trait so
//! API-level tests can run without an ffmpeg binary.

mod mock_transcoder;

pub use mock_transcoder::{MockTranscoder, RecordedRequest};
