//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

use super::config::TranscoderConfig;
use super::duration::extract_duration_secs;
use super::error::TranscodeError;
use super::plan::{ExecutionPlan, IoMode};
use super::runner::ProcessRunner;
use super::traits::Transcoder;
use super::types::{ConversionOutput, ConversionRequest};

/// FFmpeg-based transcoder implementation.
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
    runner: ProcessRunner,
}

impl FfmpegTranscoder {
    /// Creates a new FFmpeg transcoder with the given configuration.
    pub fn new(config: TranscoderConfig) -> Self {
        let runner = ProcessRunner::new(
            config.ffmpeg_path.clone(),
            config.temp_dir.clone(),
            Duration::from_secs(config.timeout_secs),
        );
        Self { config, runner }
    }

    /// Creates a transcoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TranscoderConfig::default())
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionOutput, TranscodeError> {
        if request.payload.is_empty() {
            return Err(TranscodeError::EmptyPayload);
        }

        let start = Instant::now();
        let plan = ExecutionPlan::resolve(request.output_format);
        debug!(
            output_format = ?request.output_format,
            io_mode = ?plan.io_mode,
            input_bytes = request.payload.len(),
            "starting conversion"
        );

        let outcome = match plan.io_mode {
            IoMode::Pipe => {
                let args = plan.args("pipe:0", "pipe:1");
                self.runner.run_piped(&args, &request.payload).await?
            }
            IoMode::TempFile => {
                self.runner
                    .run_staged(|input, output| plan.args(input, output), &request.payload)
                    .await?
            }
        };

        // Missing duration degrades the response, not the conversion.
        let duration_secs = if request.output_format.is_audio() {
            match extract_duration_secs(&outcome.diagnostics) {
                Ok(secs) => Some(secs),
                Err(err) => {
                    warn!(output_format = ?request.output_format, %err, "duration unavailable");
                    None
                }
            }
        } else {
            None
        };

        debug!(
            output_format = ?request.output_format,
            output_bytes = outcome.stdout.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "conversion finished"
        );

        Ok(ConversionOutput {
            bytes: outcome.stdout,
            duration_secs,
            output_format: request.output_format,
        })
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        let result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(TranscodeError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                });
            }
            return Err(TranscodeError::Io(e));
        }

        tokio::fs::create_dir_all(&self.config.temp_dir).await?;

        Ok(())
    }
}
