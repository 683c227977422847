//! Types for the transcoder module.

use serde::{Deserialize, Serialize};

/// Target format for a conversion, as declared by the caller.
///
/// Audio formats map to the tags accepted on the audio endpoint; the
/// video and image variants are selected by their dedicated endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// MPEG Audio Layer III
    Mp3,
    /// WAVE (uncompressed)
    Wav,
    /// Advanced Audio Coding in an ADTS stream
    Aac,
    /// Adaptive Multi-Rate narrowband
    Amr,
    /// AAC in an MP4 (ipod) container
    M4a,
    /// Compact voice profile: mono 16 kHz Opus in Ogg. The default when the
    /// caller declares no tag or an unrecognized one.
    VoiceOpus,
    /// H.264 MP4 produced from an animated GIF
    Mp4FromGif,
    /// H.264 MP4 produced from arbitrary video input
    Mp4FromVideo,
    /// Single-frame PNG produced from a still image
    PngFromImage,
}

impl OutputFormat {
    /// Resolves an audio output tag declared by the caller.
    ///
    /// Unrecognized tags fall back to the compact voice profile instead of
    /// failing. This is a deliberate permissiveness policy inherited from
    /// the service contract: a typo'd tag yields the default encoding, not
    /// an error.
    pub fn parse_audio(tag: &str) -> Self {
        match tag {
            "mp3" => Self::Mp3,
            "wav" => Self::Wav,
            "aac" => Self::Aac,
            "amr" => Self::Amr,
            "m4a" => Self::M4a,
            _ => Self::VoiceOpus,
        }
    }

    /// Returns the tag reported back to callers for this format.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Aac => "aac",
            Self::Amr => "amr",
            Self::M4a => "m4a",
            Self::VoiceOpus => "ogg",
            Self::Mp4FromGif | Self::Mp4FromVideo => "mp4",
            Self::PngFromImage => "png",
        }
    }

    /// Returns the MIME type of the produced payload.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Aac => "audio/aac",
            Self::Amr => "audio/amr",
            Self::M4a => "audio/mp4",
            Self::VoiceOpus => "audio/ogg",
            Self::Mp4FromGif | Self::Mp4FromVideo => "video/mp4",
            Self::PngFromImage => "image/png",
        }
    }

    /// Whether this format carries an audio payload whose duration is
    /// reported to the caller.
    pub fn is_audio(&self) -> bool {
        matches!(
            self,
            Self::Mp3 | Self::Wav | Self::Aac | Self::Amr | Self::M4a | Self::VoiceOpus
        )
    }
}

/// A single conversion request. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Raw input bytes, already resolved from upload, base64 or URL.
    pub payload: Vec<u8>,
    /// Container tag declared by the caller. Advisory only: the transcoder
    /// probes the actual container from the payload.
    pub input_format: String,
    /// Resolved target format.
    pub output_format: OutputFormat,
}

/// Captured channels of a finished external process invocation.
#[derive(Debug)]
pub struct ProcessOutcome {
    /// Bytes produced on the data channel (stdout in pipe mode, the staged
    /// output artifact in temp-file mode).
    pub stdout: Vec<u8>,
    /// Human-readable progress and error text from the diagnostic stream.
    pub diagnostics: String,
    /// Whether the process exited with status zero.
    pub success: bool,
}

/// Terminal result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// Transcoded bytes. Never empty on success.
    pub bytes: Vec<u8>,
    /// Whole-second duration recovered from the diagnostic stream, audio
    /// conversions only. `None` when no parsable marker was emitted.
    pub duration_secs: Option<u64>,
    /// The format that was produced.
    pub output_format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_audio_known_tags() {
        assert_eq!(OutputFormat::parse_audio("mp3"), OutputFormat::Mp3);
        assert_eq!(OutputFormat::parse_audio("wav"), OutputFormat::Wav);
        assert_eq!(OutputFormat::parse_audio("aac"), OutputFormat::Aac);
        assert_eq!(OutputFormat::parse_audio("amr"), OutputFormat::Amr);
        assert_eq!(OutputFormat::parse_audio("m4a"), OutputFormat::M4a);
    }

    #[test]
    fn test_parse_audio_unknown_tag_falls_back_to_voice() {
        assert_eq!(OutputFormat::parse_audio("ogg"), OutputFormat::VoiceOpus);
        assert_eq!(OutputFormat::parse_audio("flac"), OutputFormat::VoiceOpus);
        assert_eq!(OutputFormat::parse_audio(""), OutputFormat::VoiceOpus);
        assert_eq!(OutputFormat::parse_audio("mp33"), OutputFormat::VoiceOpus);
    }

    #[test]
    fn test_tags() {
        assert_eq!(OutputFormat::Mp3.tag(), "mp3");
        assert_eq!(OutputFormat::VoiceOpus.tag(), "ogg");
        assert_eq!(OutputFormat::Mp4FromGif.tag(), "mp4");
        assert_eq!(OutputFormat::PngFromImage.tag(), "png");
    }

    #[test]
    fn test_content_types() {
        assert_eq!(OutputFormat::Mp3.content_type(), "audio/mpeg");
        assert_eq!(OutputFormat::M4a.content_type(), "audio/mp4");
        assert_eq!(OutputFormat::Mp4FromVideo.content_type(), "video/mp4");
        assert_eq!(OutputFormat::PngFromImage.content_type(), "image/png");
    }

    #[test]
    fn test_is_audio() {
        assert!(OutputFormat::Mp3.is_audio());
        assert!(OutputFormat::VoiceOpus.is_audio());
        assert!(!OutputFormat::Mp4FromGif.is_audio());
        assert!(!OutputFormat::PngFromImage.is_audio());
    }
}
