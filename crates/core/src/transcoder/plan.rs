//! Execution-strategy dispatch: which I/O mode a conversion uses and which
//! arguments the external transcoder is invoked with.

use super::types::OutputFormat;

/// How input and output bytes travel between the gateway and the external
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoMode {
    /// Stream through the process's standard streams. No filesystem
    /// footprint, lower latency.
    Pipe,
    /// Stage input and output through temporary files. Required for
    /// containers whose muxer seeks back into already-written data.
    TempFile,
}

/// The resolved strategy for one conversion request.
///
/// Derived deterministically from the target format, recomputed per request
/// and never cached: two requests with the same format always get the same
/// plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub io_mode: IoMode,
    pub output_format: OutputFormat,
}

impl ExecutionPlan {
    /// Resolves the plan for a target format.
    pub fn resolve(output_format: OutputFormat) -> Self {
        let io_mode = if output_format.requires_seekable_output() {
            IoMode::TempFile
        } else {
            IoMode::Pipe
        };
        Self {
            io_mode,
            output_format,
        }
    }

    /// Builds the full argument list with the given I/O endpoints filled in.
    ///
    /// In pipe mode the endpoints are `pipe:0` / `pipe:1`; in temp-file mode
    /// they are the staged artifact paths. Everything between them is a
    /// fixed per-format template.
    pub fn args(&self, input_endpoint: &str, output_endpoint: &str) -> Vec<String> {
        let mut args: Vec<String> =
            vec!["-y".to_string(), "-i".to_string(), input_endpoint.to_string()];
        args.extend(
            self.output_format
                .codec_args()
                .iter()
                .map(|s| s.to_string()),
        );
        args.push(output_endpoint.to_string());
        args
    }
}

impl OutputFormat {
    /// Whether this format's container needs random-access writes during
    /// encoding. MP4-family muxers rewrite index metadata after encoding
    /// and deterministically fail on a non-seekable pipe.
    pub fn requires_seekable_output(&self) -> bool {
        matches!(self, Self::M4a | Self::Mp4FromGif | Self::Mp4FromVideo)
    }

    /// The fixed encoder argument template for this format, excluding the
    /// input and output endpoints.
    fn codec_args(&self) -> &'static [&'static str] {
        match self {
            Self::Mp3 => &["-f", "mp3"],
            Self::Wav => &["-f", "wav"],
            Self::Aac => &["-c:a", "aac", "-b:a", "128k", "-f", "adts"],
            Self::Amr => &["-c:a", "libopencore_amrnb", "-b:a", "12.2k", "-f", "amr"],
            Self::M4a => &["-c:a", "aac", "-b:a", "128k", "-f", "ipod"],
            Self::VoiceOpus => &[
                "-c:a",
                "libopus",
                "-b:a",
                "16k",
                "-vbr",
                "on",
                "-compression_level",
                "10",
                "-ac",
                "1",
                "-ar",
                "16000",
                "-f",
                "ogg",
            ],
            Self::Mp4FromGif | Self::Mp4FromVideo => &[
                "-movflags",
                "faststart",
                "-pix_fmt",
                "yuv420p",
                "-vf",
                "scale=trunc(iw/2)*2:trunc(ih/2)*2",
                "-f",
                "mp4",
                "-c:v",
                "libx264",
                "-preset",
                "fast",
                "-crf",
                "23",
            ],
            Self::PngFromImage => &["-f", "image2pipe", "-c:v", "png", "-frames:v", "1"],
        }
    }
}
