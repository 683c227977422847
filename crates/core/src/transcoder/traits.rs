//! Trait definitions for the transcoder module.

use async_trait::async_trait;

use super::error::TranscodeError;
use super::types::{ConversionOutput, ConversionRequest};

/// A transcoder that converts in-memory media payloads between formats.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Converts a resolved payload to the requested output format.
    async fn convert(&self, request: ConversionRequest)
        -> Result<ConversionOutput, TranscodeError>;

    /// Validates that the transcoder is properly configured and ready.
    async fn validate(&self) -> Result<(), TranscodeError>;
}
