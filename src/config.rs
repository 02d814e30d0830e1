use crate::debounce::DEFAULT_QUIET_INTERVAL;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON archive export to load. May also be given as the first argument.
    pub messages_path: Option<String>,
    pub quiet_interval: Duration,
    pub show_hidden_count: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::build()
    }

    fn build() -> anyhow::Result<Self> {
        Ok(Config {
            messages_path: env::var("MSGVIEW_MESSAGES").ok().filter(|p| !p.is_empty()),
            quiet_interval: match env::var("MSGVIEW_QUIET_INTERVAL") {
                Ok(raw) => humantime::parse_duration(&raw).map_err(|e| {
                    anyhow::anyhow!("MSGVIEW_QUIET_INTERVAL must be a duration like '300ms': {}", e)
                })?,
                Err(_) => DEFAULT_QUIET_INTERVAL,
            },
            show_hidden_count: env::var("MSGVIEW_SHOW_HIDDEN_COUNT")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        })
    }
}
