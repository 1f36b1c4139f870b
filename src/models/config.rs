//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ItemFilter;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Inventory API query and HTTP behavior
    #[serde(default)]
    pub source: SourceConfig,

    /// Which listings trigger an alert
    #[serde(default)]
    pub filter: ItemFilter,

    /// Poll cadence
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Dedup store location
    #[serde(default)]
    pub store: StoreConfig,

    /// SMTP delivery settings
    #[serde(default)]
    pub email: EmailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or the defaults if the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(&path) {
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No config at {:?}. Using defaults.", path.as_ref());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.endpoint)?;
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if self.source.count == 0 {
            return Err(AppError::validation("source.count must be > 0"));
        }
        if self.schedule.interval_secs == 0 {
            return Err(AppError::validation("schedule.interval_secs must be > 0"));
        }
        if self.store.dir.trim().is_empty() {
            return Err(AppError::validation("store.dir is empty"));
        }
        if self.email.smtp_host.trim().is_empty() {
            return Err(AppError::validation("email.smtp_host is empty"));
        }
        if self.email.password_env.trim().is_empty() {
            return Err(AppError::validation("email.password_env is empty"));
        }
        self.email.from_mailbox()?;
        self.email.to_mailbox()?;
        Ok(())
    }
}

/// Inventory API query parameters and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Inventory results endpoint
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Vehicle model code
    #[serde(default = "defaults::model")]
    pub model: String,

    /// `new` or `used`
    #[serde(default = "defaults::condition")]
    pub condition: String,

    #[serde(default = "defaults::market")]
    pub market: String,

    #[serde(default = "defaults::language")]
    pub language: String,

    #[serde(default = "defaults::super_region")]
    pub super_region: String,

    #[serde(default = "defaults::region")]
    pub region: String,

    /// Postal code the search is centered on
    #[serde(default = "defaults::zip")]
    pub zip: String,

    #[serde(default = "defaults::lat")]
    pub lat: f64,

    #[serde(default = "defaults::lng")]
    pub lng: f64,

    /// Search radius (0 = no limit)
    #[serde(default)]
    pub range: u32,

    /// Page size per request
    #[serde(default = "defaults::count")]
    pub count: u32,

    /// Include listings outside the searched region
    #[serde(default = "defaults::outside_search")]
    pub outside_search: bool,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            model: defaults::model(),
            condition: defaults::condition(),
            market: defaults::market(),
            language: defaults::language(),
            super_region: defaults::super_region(),
            region: defaults::region(),
            zip: defaults::zip(),
            lat: defaults::lat(),
            lng: defaults::lng(),
            range: 0,
            count: defaults::count(),
            outside_search: defaults::outside_search(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Poll cadence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Pause between the end of one cycle and the start of the next
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
        }
    }
}

/// Dedup store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one marker file per notified listing
    #[serde(default = "defaults::store_dir")]
    pub dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: defaults::store_dir(),
        }
    }
}

/// SMTP delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Sender address
    #[serde(default = "defaults::address")]
    pub from: String,

    /// Recipient address
    #[serde(default = "defaults::address")]
    pub to: String,

    /// SMTP login (defaults to `from`)
    #[serde(default)]
    pub username: Option<String>,

    /// Environment variable holding the SMTP password
    #[serde(default = "defaults::password_env")]
    pub password_env: String,

    /// Subject template, see [`crate::models::Item::format`]
    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// Body template, see [`crate::models::Item::format`]
    #[serde(default = "defaults::body")]
    pub body: String,

    /// SMTP command timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl EmailConfig {
    pub fn from_mailbox(&self) -> Result<Mailbox> {
        self.from
            .parse::<Mailbox>()
            .map_err(|e| AppError::validation(format!("email.from '{}': {e}", self.from)))
    }

    pub fn to_mailbox(&self) -> Result<Mailbox> {
        self.to
            .parse::<Mailbox>()
            .map_err(|e| AppError::validation(format!("email.to '{}': {e}", self.to)))
    }

    /// Login name for the SMTP relay.
    pub fn login(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.from)
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            from: defaults::address(),
            to: defaults::address(),
            username: None,
            password_env: defaults::password_env(),
            subject: defaults::subject(),
            body: defaults::body(),
            timeout_secs: defaults::timeout(),
        }
    }
}

mod defaults {
    // Source defaults
    pub fn endpoint() -> String {
        "https://www.tesla.com/inventory/api/v1/inventory-results".into()
    }
    pub fn model() -> String {
        "m3".into()
    }
    pub fn condition() -> String {
        "new".into()
    }
    pub fn market() -> String {
        "US".into()
    }
    pub fn language() -> String {
        "en".into()
    }
    pub fn super_region() -> String {
        "north america".into()
    }
    pub fn region() -> String {
        "CA".into()
    }
    pub fn zip() -> String {
        "92612".into()
    }
    pub fn lat() -> f64 {
        33.6588951
    }
    pub fn lng() -> f64 {
        -117.8282121
    }
    pub fn count() -> u32 {
        50
    }
    pub fn outside_search() -> bool {
        true
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; stockwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Schedule defaults
    pub fn interval() -> u64 {
        15
    }

    // Store defaults
    pub fn store_dir() -> String {
        "sent".into()
    }

    // Email defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn address() -> String {
        "stockwatch@example.com".into()
    }
    pub fn password_env() -> String {
        "EMAIL_PWD".into()
    }
    pub fn subject() -> String {
        "New Tesla Found In {metro}".into()
    }
    pub fn body() -> String {
        "New Tesla Found!\n\nPaint: {paint}\nOptions: {options}\nListing: {key}\n".into()
    }
}
