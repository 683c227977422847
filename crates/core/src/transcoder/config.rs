//! Configuration for the transcoder module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the FFmpeg-based transcoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscoderConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Directory where temp-file conversions stage their artifacts.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Deadline for a single conversion in seconds. The process is killed
    /// when it elapses.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("forgeline")
}

fn default_timeout() -> u64 {
    120
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            temp_dir: default_temp_dir(),
            timeout_secs: default_timeout(),
        }
    }
}

impl TranscoderConfig {
    /// Creates a config with a custom ffmpeg path.
    pub fn with_path(ffmpeg_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ..Default::default()
        }
    }

    /// Sets the staging directory.
    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Sets the per-conversion deadline in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TranscoderConfig::default();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.timeout_secs, 120);
        assert!(config.temp_dir.ends_with("forgeline"));
    }

    #[test]
    fn test_config_builder() {
        let config = TranscoderConfig::with_path(PathBuf::from("/usr/local/bin/ffmpeg"))
            .with_temp_dir(PathBuf::from("/tmp/staging"))
            .with_timeout(30);

        assert_eq!(config.ffmpeg_path, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(config.temp_dir, PathBuf::from("/tmp/staging"));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_serialization() {
        let config = TranscoderConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: TranscoderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.timeout_secs, config.timeout_secs);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed: TranscoderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(parsed.timeout_secs, 120);
    }
}
