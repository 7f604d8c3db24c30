//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `SENTINEL_`, nested keys separated by `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/sentinel/{service_name}/config.toml
//! 4. System directory: /etc/sentinel/{service_name}/config.toml
//! 5. Default values
//!
//! Example override: `SENTINEL_SERVICE__PORT=9000`.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::account::{AccountStatus, Role};
use crate::error::Result;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SENTINEL_";

/// Upper bound on `policy.event_log_capacity`; `/events` never lists more
pub const MAX_EVENT_LOG_CAPACITY: usize = crate::event_log::DEFAULT_CAPACITY;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Detection and judgment policy
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Accounts loaded into the store at startup
    #[serde(default = "default_seed_accounts")]
    pub seed: Vec<SeedAccount>,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request tracking configuration (request IDs, header propagation)
    #[serde(default)]
    pub request_tracking: RequestTrackingConfig,

    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// CORS mode: `permissive` (any origin) or `restrictive`
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl MiddlewareConfig {
    /// Body limit in bytes, `None` if it does not fit in `usize`
    pub fn body_limit_bytes(&self) -> Option<usize> {
        self.body_limit_mb.checked_mul(1024 * 1024)
    }
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            request_tracking: RequestTrackingConfig::default(),
            body_limit_mb: default_body_limit_mb(),
            cors_mode: default_cors_mode(),
        }
    }
}

/// Request tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestTrackingConfig {
    /// Enable request ID generation
    #[serde(default = "default_true")]
    pub request_id_enabled: bool,

    /// Enable request ID propagation to the response
    #[serde(default = "default_true")]
    pub propagate_headers: bool,

    /// Enable sensitive header masking in logs
    #[serde(default = "default_true")]
    pub mask_sensitive_headers: bool,
}

impl Default for RequestTrackingConfig {
    fn default() -> Self {
        Self {
            request_id_enabled: true,
            propagate_headers: true,
            mask_sensitive_headers: true,
        }
    }
}

/// Risk analysis and judgment policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Locations that always produce a CRITICAL assessment (matched case-insensitively)
    #[serde(default = "default_restricted_countries")]
    pub restricted_countries: Vec<String>,

    /// IP address prefixes that always produce a CRITICAL assessment
    #[serde(default = "default_blocked_ip_prefixes")]
    pub blocked_ip_prefixes: Vec<String>,

    /// Minimum score for a CRITICAL verdict
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: u8,

    /// Minimum score for an ELEVATED verdict
    #[serde(default = "default_elevated_threshold")]
    pub elevated_threshold: u8,

    /// Maximum number of entries retained by the event log, at most 20
    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            restricted_countries: default_restricted_countries(),
            blocked_ip_prefixes: default_blocked_ip_prefixes(),
            critical_threshold: default_critical_threshold(),
            elevated_threshold: default_elevated_threshold(),
            event_log_capacity: default_event_log_capacity(),
        }
    }
}

/// An account seeded at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAccount {
    /// User identifier (normalized on load)
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Account role
    pub role: Role,

    /// Initial status
    #[serde(default = "default_seed_status")]
    pub status: AccountStatus,
}

impl SeedAccount {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role,
            status: AccountStatus::Active,
        }
    }
}

// Default value functions
fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_true() -> bool {
    true
}

fn default_body_limit_mb() -> usize {
    1
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

fn default_restricted_countries() -> Vec<String> {
    vec!["russia".to_string(), "north korea".to_string()]
}

fn default_blocked_ip_prefixes() -> Vec<String> {
    vec!["192.168.66".to_string()]
}

fn default_critical_threshold() -> u8 {
    90
}

fn default_elevated_threshold() -> u8 {
    50
}

fn default_event_log_capacity() -> usize {
    20
}

fn default_seed_status() -> AccountStatus {
    AccountStatus::Active
}

fn default_seed_accounts() -> Vec<SeedAccount> {
    vec![
        SeedAccount::new("user_101", "Alice Admin", Role::Admin),
        SeedAccount::new("user_404", "John Doe", Role::Viewer),
    ]
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name used to locate config files is inferred from the
    /// binary name, falling back to `sentinel`.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "sentinel".to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so later files override earlier ones
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config: Config = figment.merge(Env::prefixed(ENV_PREFIX).split("__")).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the XDG and system directories. Environment variables still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.service.timeout_secs == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "service.timeout_secs must be at least 1".to_string(),
            ));
        }

        match self.middleware.body_limit_bytes() {
            Some(bytes) if bytes > 0 => {}
            _ => {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "middleware.body_limit_mb ({}) must be at least 1 and fit in memory",
                    self.middleware.body_limit_mb
                )))
            }
        }

        let policy = &self.policy;

        if policy.event_log_capacity == 0 || policy.event_log_capacity > MAX_EVENT_LOG_CAPACITY {
            return Err(crate::error::Error::InvalidConfig(format!(
                "policy.event_log_capacity ({}) must be within 1..={}",
                policy.event_log_capacity, MAX_EVENT_LOG_CAPACITY
            )));
        }

        if policy.elevated_threshold > policy.critical_threshold {
            return Err(crate::error::Error::InvalidConfig(format!(
                "policy.elevated_threshold ({}) exceeds policy.critical_threshold ({})",
                policy.elevated_threshold, policy.critical_threshold
            )));
        }

        if policy.critical_threshold > 100 {
            return Err(crate::error::Error::InvalidConfig(
                "policy.critical_threshold must be within 0..=100".to_string(),
            ));
        }

        Ok(())
    }

    /// Find all possible config file paths for a service, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix("sentinel");
        if let Some(path) = xdg_dirs.find_config_file(Path::new(service_name).join("config.toml")) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc/sentinel")
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "sentinel".to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            middleware: MiddlewareConfig::default(),
            policy: PolicyConfig::default(),
            seed: default_seed_accounts(),
        }
    }
}
