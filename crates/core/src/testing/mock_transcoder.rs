//! Mock transcoder for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transcoder::{
    ConversionOutput, ConversionRequest, TranscodeError, Transcoder,
};

/// A recorded conversion for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The request that was submitted.
    pub request: ConversionRequest,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Transcoder trait.
///
/// Provides controllable behavior for testing:
/// - Track submitted requests for assertions
/// - Fix the bytes and duration returned on success
/// - Inject a failure for the next operation
#[derive(Debug)]
pub struct MockTranscoder {
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    output_bytes: Arc<RwLock<Vec<u8>>>,
    duration_secs: Arc<RwLock<Option<u64>>>,
    next_error: Arc<RwLock<Option<TranscodeError>>>,
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranscoder {
    /// Create a new mock transcoder that echoes fixed bytes.
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(Vec::new())),
            output_bytes: Arc::new(RwLock::new(b"transcoded".to_vec())),
            duration_secs: Arc::new(RwLock::new(Some(42))),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all recorded requests.
    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Get the number of conversions performed.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Set the bytes returned by successful conversions.
    pub async fn set_output_bytes(&self, bytes: Vec<u8>) {
        *self.output_bytes.write().await = bytes;
    }

    /// Set the duration reported by successful conversions.
    pub async fn set_duration_secs(&self, duration_secs: Option<u64>) {
        *self.duration_secs.write().await = duration_secs;
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: TranscodeError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<TranscodeError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionOutput, TranscodeError> {
        if request.payload.is_empty() {
            return Err(TranscodeError::EmptyPayload);
        }

        if let Some(err) = self.take_error().await {
            self.requests.write().await.push(RecordedRequest {
                request,
                success: false,
            });
            return Err(err);
        }

        let output_format = request.output_format;
        self.requests.write().await.push(RecordedRequest {
            request,
            success: true,
        });

        Ok(ConversionOutput {
            bytes: self.output_bytes.read().await.clone(),
            duration_secs: if output_format.is_audio() {
                *self.duration_secs.read().await
            } else {
                None
            },
            output_format,
        })
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(())
    }
}
