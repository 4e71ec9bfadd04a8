use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub poller: PollerConfig,
    pub admin: AdminConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    /// Scheme and authority of the backend; endpoint paths start with `/api`.
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// Idle span after which the session is forcibly ended.
    pub idle_timeout_seconds: u64,
    /// How often the inactivity check runs.
    pub check_interval_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PollerConfig {
    pub interval_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdminConfig {
    /// Pause between a successful save and the list reload, so the success
    /// message stays visible.
    pub reload_delay_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: 30 * 60,
            check_interval_seconds: 30,
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self { interval_seconds: 5 }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { reload_delay_ms: 1000 }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("portal-session.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds.max(1))
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds.max(1))
    }
}

impl AdminConfig {
    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Built-in defaults
    /// 2. Portal.toml (if it exists)
    /// 3. Environment variables prefixed with PORTAL_ (nested keys split on `__`,
    ///    e.g. PORTAL_SESSION__IDLE_TIMEOUT_SECONDS)
    /// 4. PORTAL_API_URL as a shortcut for api.base_url
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(
            Self::figment()
                .merge(Toml::file("Portal.toml"))
                .merge(Env::prefixed("PORTAL_").split("__"))
                .merge(Env::raw().only(&["PORTAL_API_URL"]).map(|_| "api.base_url".into())),
        )
    }

    /// Defaults only; callers layer their own providers on top.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }
}
