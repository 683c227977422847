//! Input resolution: one request, one payload.
//!
//! A caller may supply an uploaded file, a base64 field, or a URL. When
//! more than one channel is present, the upload wins over base64, which
//! wins over the URL. The transcoder itself only ever sees raw bytes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;

use super::fetch::Fetcher;
use crate::transcoder::TranscodeError;

/// The channels a caller can supply input through, before precedence is
/// applied.
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    /// Uploaded file bytes.
    pub file: Option<Vec<u8>>,
    /// Base64-encoded payload field.
    pub base64: Option<String>,
    /// URL of a remote input.
    pub url: Option<String>,
}

/// The winning input channel after precedence is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Upload(Vec<u8>),
    Base64(String),
    Url(String),
}

impl RawInput {
    /// Applies the precedence order: file over base64 over URL.
    ///
    /// Presence decides, not validity. A present-but-broken channel is
    /// selected and then fails, it does not fall through to the next one.
    pub fn into_source(self) -> Result<InputSource, TranscodeError> {
        if let Some(file) = self.file {
            return Ok(InputSource::Upload(file));
        }
        if let Some(encoded) = self.base64 {
            return Ok(InputSource::Base64(encoded));
        }
        if let Some(url) = self.url {
            return Ok(InputSource::Url(url));
        }
        Err(TranscodeError::NoInput)
    }
}

/// Resolves raw request input into a byte payload.
pub struct InputResolver {
    fetcher: Fetcher,
}

impl InputResolver {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Resolves the winning channel into bytes. Empty payloads are
    /// rejected here so no process is ever spawned for them.
    pub async fn resolve(&self, input: RawInput) -> Result<Vec<u8>, TranscodeError> {
        let payload = match input.into_source()? {
            InputSource::Upload(bytes) => {
                debug!(bytes = bytes.len(), "input from upload");
                bytes
            }
            InputSource::Base64(encoded) => {
                let bytes = BASE64
                    .decode(encoded.trim())
                    .map_err(|e| TranscodeError::InvalidBase64(e.to_string()))?;
                debug!(bytes = bytes.len(), "input from base64 field");
                bytes
            }
            InputSource::Url(url) => self.fetcher.fetch(&url).await?,
        };

        if payload.is_empty() {
            return Err(TranscodeError::EmptyPayload);
        }
        Ok(payload)
    }
}
