use std::{env, time::Duration};

use b2b_common::{parse_boolean_flag, Secret};
use log::*;

const DEFAULT_B2B_HOST: &str = "127.0.0.1";
const DEFAULT_B2B_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/b2b_store.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_EMAIL_FROM: &str = "noreply@localhost";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// Apply the embedded schema migrations at start-up.
    pub run_migrations: bool,
    /// How long to wait for a supplier's price list to download.
    pub feed_timeout: Duration,
    /// Capacity of each event channel. Events published to a full channel are dropped.
    pub event_buffer_size: usize,
    pub email: EmailConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_B2B_HOST.to_string(),
            port: DEFAULT_B2B_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            run_migrations: true,
            feed_timeout: DEFAULT_FEED_TIMEOUT,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            email: EmailConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("B2B_HOST").ok().unwrap_or_else(|| DEFAULT_B2B_HOST.into());
        let port = parse_env("B2B_PORT", DEFAULT_B2B_PORT);
        let database_url = env::var("B2B_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ B2B_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = parse_env("B2B_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        let run_migrations = parse_boolean_flag(env::var("B2B_RUN_MIGRATIONS").ok(), true);
        let feed_timeout = Duration::from_secs(parse_env("B2B_FEED_TIMEOUT_SECS", DEFAULT_FEED_TIMEOUT.as_secs()));
        let event_buffer_size = match parse_env("B2B_EVENT_BUFFER_SIZE", DEFAULT_EVENT_BUFFER_SIZE) {
            0 => {
                warn!("🪛️ B2B_EVENT_BUFFER_SIZE must be at least 1. Using {DEFAULT_EVENT_BUFFER_SIZE} instead.");
                DEFAULT_EVENT_BUFFER_SIZE
            },
            n => n,
        };
        let email = EmailConfig::from_env_or_default();
        Self { host, port, database_url, max_connections, run_migrations, feed_timeout, event_buffer_size, email }
    }
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) => s.parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => default,
    }
}

//-------------------------------------------------  EmailConfig  ------------------------------------------------------
#[derive(Clone, Debug)]
pub struct EmailConfig {
    /// The SMTP relay. When `None`, notifications are written to the log instead of being sent.
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: Secret<String>,
    pub from: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_username: String::default(),
            smtp_password: Secret::default(),
            from: DEFAULT_EMAIL_FROM.to_string(),
        }
    }
}

impl EmailConfig {
    pub fn from_env_or_default() -> Self {
        let smtp_host = env::var("B2B_SMTP_HOST").ok().filter(|s| !s.trim().is_empty());
        if smtp_host.is_none() {
            info!("🪛️ B2B_SMTP_HOST is not set. E-mail notifications will only be logged.");
        }
        let smtp_port = parse_env("B2B_SMTP_PORT", DEFAULT_SMTP_PORT);
        let smtp_username = env::var("B2B_SMTP_USERNAME").unwrap_or_default();
        let smtp_password = Secret::new(env::var("B2B_SMTP_PASSWORD").unwrap_or_default());
        let from = env::var("B2B_EMAIL_FROM").ok().unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string());
        Self { smtp_host, smtp_port, smtp_username, smtp_password, from }
    }
}
