//! Application state management

use std::sync::Arc;

use crate::{config::Config, service::SentinelService};

/// Application state shared across handlers
///
/// Cloned per request by axum; the config is behind an `Arc` and the
/// sentinel service shares its store and log across clones.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    sentinel: SentinelService,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    /// Create state with a sentinel service built from the configuration
    pub fn new(config: Config) -> Self {
        let sentinel = SentinelService::from_config(&config);
        Self::with_sentinel(config, sentinel)
    }

    /// Create state around an existing sentinel service
    pub fn with_sentinel(config: Config, sentinel: SentinelService) -> Self {
        Self {
            config: Arc::new(config),
            sentinel,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the sentinel service
    pub fn sentinel(&self) -> &SentinelService {
        &self.sentinel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_sentinel() {
        let state = AppState::default();
        let clone = state.clone();
        clone.sentinel().lockdown("user_404", "test");
        assert_eq!(state.sentinel().recent_events().len(), 1);
    }

    #[test]
    fn test_config_accessible() {
        let state = AppState::default();
        assert_eq!(state.config().service.name, "sentinel");
    }
}
