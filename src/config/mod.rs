use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Knobs for the content lifecycle manager and homepage prioritizer.
/// Overrides merge shallowly over the defaults, field by field.
#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    #[serde(default = "default_max_news_items")]
    pub max_news_items: usize,
    #[serde(default = "default_max_event_items")]
    pub max_event_items: usize,
    #[serde(default = "default_max_total_items")]
    pub max_total_items: usize,
    #[serde(default = "default_urgent_alert_duration_days")]
    pub urgent_alert_duration_days: i64,
    #[serde(default = "default_news_retention_days")]
    pub news_retention_days: i64,
    #[serde(default = "default_event_retention_days")]
    pub event_retention_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,
    #[serde(default = "default_calendar_description")]
    pub calendar_description: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Domain suffix for VEVENT UIDs. Must stay stable across deployments
    /// so subscribed calendar clients update events instead of duplicating
    /// them.
    #[serde(default = "default_uid_domain")]
    pub uid_domain: String,
}

fn default_max_news_items() -> usize {
    3
}

fn default_max_event_items() -> usize {
    3
}

fn default_max_total_items() -> usize {
    6
}

fn default_urgent_alert_duration_days() -> i64 {
    7
}

fn default_news_retention_days() -> i64 {
    90
}

fn default_event_retention_days() -> i64 {
    30
}

fn default_calendar_name() -> String {
    "Ysgol Bryncelyn".to_string()
}

fn default_calendar_description() -> String {
    "School calendar: term dates, events and trips".to_string()
}

fn default_timezone() -> String {
    "Europe/London".to_string()
}

fn default_uid_domain() -> String {
    "ysgolbryncelyn.cymru".to_string()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_news_items: default_max_news_items(),
            max_event_items: default_max_event_items(),
            max_total_items: default_max_total_items(),
            urgent_alert_duration_days: default_urgent_alert_duration_days(),
            news_retention_days: default_news_retention_days(),
            event_retention_days: default_event_retention_days(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            calendar_name: default_calendar_name(),
            calendar_description: default_calendar_description(),
            timezone: default_timezone(),
            uid_domain: default_uid_domain(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.max_connections", 10)?
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (with YSGOL__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("YSGOL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://ysgol-portal.db".to_string(),
                max_connections: 10,
            },
            content: ContentConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}
