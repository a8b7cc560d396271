use std::env;
use std::time::Duration;

use crate::errors::LensError;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
pub const CLIENT_USER_AGENT: &str = "github-lens/0.1 (profile lookup service)";
pub const CACHE_DURATION_SECS: u64 = 300; // 5 minutes
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const CACHE_KEY_PREFIX: &str = "user_";
pub const TOP_REPOS_LIMIT: usize = 10;
pub const RECENT_EVENTS_LIMIT: usize = 50;
pub const LIST_PAGE_SIZE: u32 = 100;
pub const SEARCH_PAGE_SIZE: u32 = 10;
pub const COMPARE_CONCURRENCY: usize = 4;
pub const MAX_COMPARE_USERS: usize = 10;
pub const SERVER_HOST: &str = "127.0.0.1";
pub const SERVER_PORT: u16 = 3030;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub compare_concurrency: usize,
    pub max_compare_users: usize,
    pub server_host: String,
    pub server_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            cache_ttl: Duration::from_secs(CACHE_DURATION_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            compare_concurrency: COMPARE_CONCURRENCY,
            max_compare_users: MAX_COMPARE_USERS,
            server_host: SERVER_HOST.to_string(),
            server_port: SERVER_PORT,
        }
    }
}

impl Config {
    /// Reads overrides from the process environment (and `.env`, if present).
    /// Unset variables keep their defaults; malformed numbers are rejected.
    pub fn from_env() -> Result<Self, LensError> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        Ok(Self {
            api_base: env::var("GITHUB_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            cache_ttl: Duration::from_secs(parse_var("CACHE_TTL_SECS", CACHE_DURATION_SECS)?),
            request_timeout: Duration::from_secs(parse_var(
                "REQUEST_TIMEOUT_SECS",
                REQUEST_TIMEOUT_SECS,
            )?),
            compare_concurrency: parse_var("COMPARE_CONCURRENCY", COMPARE_CONCURRENCY)?.max(1),
            max_compare_users: parse_var("MAX_COMPARE_USERS", MAX_COMPARE_USERS)?,
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT", SERVER_PORT)?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, LensError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| LensError::Config(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
