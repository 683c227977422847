use std::sync::Arc;

use forgeline_core::input::InputResolver;
use forgeline_core::{Authenticator, Config, SanitizedConfig, Transcoder};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    transcoder: Arc<dyn Transcoder>,
    resolver: InputResolver,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        transcoder: Arc<dyn Transcoder>,
        resolver: InputResolver,
    ) -> Self {
        Self {
            config,
            authenticator,
            transcoder,
            resolver,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn transcoder(&self) -> &dyn Transcoder {
        self.transcoder.as_ref()
    }

    pub fn resolver(&self) -> &InputResolver {
        &self.resolver
    }
}
