use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    /// Server reference timezone, minutes east of UTC. Day boundaries,
    /// "yesterday" and Sunday detection all follow this offset.
    pub tz_offset_minutes: i32,

    /// Seconds between stale-session sweeps. Once per 24 hours by default.
    pub closer_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            tz_offset_minutes: env::var("TZ_OFFSET_MINUTES")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .expect("TZ_OFFSET_MINUTES must be an integer"),
            closer_interval_secs: env::var("STALE_CLOSER_INTERVAL_SECS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .expect("STALE_CLOSER_INTERVAL_SECS must be an integer"),
        }
    }
}
