pub mod auth;
pub mod config;
pub mod input;
pub mod metrics;
pub mod testing;
pub mod transcoder;

pub use auth::{
    create_authenticator, ApiKeyAuthenticator, AuthError, AuthRequest, Authenticator, Identity,
    NoneAuthenticator,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthMethod, Config, ConfigError,
    SanitizedConfig,
};
pub use input::{Fetcher, FetcherConfig, InputResolver, InputSource, RawInput};
pub use transcoder::{
    ConversionOutput, ConversionRequest, FfmpegTranscoder, OutputFormat, TranscodeError,
    Transcoder, TranscoderConfig,
};
