use chrono::DateTime;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::cache::ResponseCache;
use crate::client::GitHubClient;
use crate::config::Config;
use crate::errors::LensError;
use crate::models::{ComparisonOutcome, CompositeRecord, GitHubUser, Profile};


const MAX_USERNAME_LEN: usize = 39;
const INVALID_USERNAME: &str = "Invalid username format";
const UNKNOWN_USERNAME: &str = "Unknown";
const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

/// Lookup, comparison and search on top of the GitHub client and the
/// response cache. Shared by every request handler.
pub struct Lens {
    client: GitHubClient,
    cache: ResponseCache,
    config: Config,
}

impl Lens {
    pub fn new(config: Config) -> Result<Self, LensError> {
        Ok(Self {
            client: GitHubClient::new(&config)?,
            cache: ResponseCache::new(config.cache_ttl),
            config,
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Composite record for one user, served from cache while fresh.
    pub async fn lookup(&self, username: &str) -> Result<CompositeRecord, LensError> {
        let username = validate_username(username)?;
        self.build_composite(username).await
    }

    /// Only successful builds are cached; a failed profile fetch leaves any
    /// existing entry for the user untouched.
    pub async fn build_composite(&self, username: &str) -> Result<CompositeRecord, LensError> {
        let key = ResponseCache::key_for(username);
        if let Some(record) = self.cache.get(&key).await {
            debug!("Cache hit for {}", key);
            return Ok(record);
        }
        debug!("Cache miss for {}", key);

        let user = self.client.fetch_profile(username).await?;
        let record = self.complete_record(username, user).await;
        self.cache.set(&key, record.clone()).await;

        info!(
            "Built profile for {} ({} repos, degraded: {})",
            username,
            record.repos.len(),
            record.degraded
        );
        Ok(record)
    }

    async fn complete_record(&self, username: &str, user: GitHubUser) -> CompositeRecord {
        let profile = Profile::from_remote(user, format_timestamp);
        let (repos, stats) = futures::future::join(
            self.client.fetch_repositories(username),
            self.client.fetch_activity_stats(username),
        )
        .await;

        CompositeRecord {
            profile,
            degraded: repos.degraded || stats.degraded,
            repos: repos.value,
            stats: stats.value,
        }
    }

    /// One outcome per requested entry, in request order. Comparisons always
    /// go to the remote; they neither read nor fill the cache.
    pub async fn compare(&self, usernames: &Value) -> Result<Vec<ComparisonOutcome>, LensError> {
        let entries = usernames
            .as_array()
            .ok_or_else(|| LensError::validation("usernames must be a list of strings"))?;

        if entries.len() < 2 {
            return Err(LensError::validation(
                "At least 2 usernames are required for comparison",
            ));
        }
        if entries.len() > self.config.max_compare_users {
            return Err(LensError::validation(format!(
                "At most {} usernames can be compared at once",
                self.config.max_compare_users
            )));
        }

        info!("Comparing {} users", entries.len());
        let outcomes = stream::iter(entries.iter().cloned().map(|entry| self.compare_entry(entry)))
            .buffered(self.config.compare_concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        Ok(outcomes)
    }

    /// Outcomes carry the entry exactly as requested; the remote sees it
    /// trimmed. Only blank and non-string entries are refused up front.
    async fn compare_entry(&self, entry: Value) -> ComparisonOutcome {
        let raw = match &entry {
            Value::String(raw) => raw.as_str(),
            _ => return failed(UNKNOWN_USERNAME, INVALID_USERNAME),
        };
        let username = raw.trim();
        if username.is_empty() {
            return failed(raw, INVALID_USERNAME);
        }

        let fetched = match timeout(
            self.config.request_timeout,
            self.client.fetch_profile(username),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(LensError::Timeout),
        };

        match fetched {
            Ok(user) => ComparisonOutcome::Found {
                username: raw.to_string(),
                record: self.complete_record(username, user).await,
            },
            Err(e) => {
                debug!("Comparison entry {} failed: {}", username, e);
                failed(raw, &e.to_string())
            }
        }
    }

    pub async fn raw_search(&self, query: &str) -> Result<Value, LensError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LensError::validation("Search query is required"));
        }
        self.client.search_users(query).await
    }
}

fn failed(username: &str, error: &str) -> ComparisonOutcome {
    ComparisonOutcome::Failed {
        username: username.to_string(),
        error: error.to_string(),
    }
}

/// Trims the name and checks it against GitHub's login alphabet.
pub fn validate_username(raw: &str) -> Result<&str, LensError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(LensError::validation("Username is required"));
    }
    if username.len() > MAX_USERNAME_LEN
        || !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(LensError::validation(INVALID_USERNAME));
    }
    Ok(username)
}

/// "2011-01-25T18:44:36Z" -> "January 25, 2011". Anything that is not
/// RFC 3339 comes back unchanged.
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| raw.to_string())
}
