use std::cmp::Reverse;
use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{
    Config, CLIENT_USER_AGENT, GITHUB_MEDIA_TYPE, LIST_PAGE_SIZE, RECENT_EVENTS_LIMIT,
    SEARCH_PAGE_SIZE, TOP_REPOS_LIMIT,
};
use crate::errors::LensError;
use crate::models::{ActivityStats, BestEffort, GitHubEvent, GitHubRepo, GitHubUser, RepoSummary};


/// Read-only access to the GitHub REST API.
///
/// Only the profile fetch and the search surface errors; repository and
/// activity fetches absorb failures into degraded results.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base: Url,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self, LensError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LensError::Config(format!("failed to build HTTP client: {}", e)))?;

        let base = Url::parse(&config.api_base)
            .map_err(|e| LensError::Config(format!("invalid API base {}: {}", config.api_base, e)))?;
        if base.cannot_be_a_base() {
            return Err(LensError::Config(format!(
                "API base {} cannot carry a path",
                config.api_base
            )));
        }

        Ok(Self { http, base })
    }

    /// Each segment is percent-encoded, so a username can never step into
    /// another endpoint.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, LensError> {
        let url = self.endpoint(segments);
        debug!("GET {}", url);

        let response = self.http.get(url.clone()).query(query).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LensError::NotFound);
        }
        if !status.is_success() {
            warn!("GitHub returned {} for {}", status, url.path());
            return Err(LensError::Remote(status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn fetch_profile(&self, username: &str) -> Result<GitHubUser, LensError> {
        self.get_json(&["users", username], &[]).await
    }

    /// Top repositories by stars + forks. Never fails; an unreachable or
    /// failing remote yields an empty, degraded list.
    pub async fn fetch_repositories(&self, username: &str) -> BestEffort<Vec<RepoSummary>> {
        let query = [("per_page", LIST_PAGE_SIZE.to_string())];
        match self
            .get_json::<Vec<GitHubRepo>>(&["users", username, "repos"], &query)
            .await
        {
            Ok(repos) => BestEffort::complete(top_repositories(repos)),
            Err(e) => {
                warn!("Repository fetch for {} failed: {}", username, e);
                BestEffort::degraded(Vec::new())
            }
        }
    }

    pub async fn fetch_activity_stats(&self, username: &str) -> BestEffort<ActivityStats> {
        let query = [("per_page", LIST_PAGE_SIZE.to_string())];
        let (starred, events) = futures::future::join(
            self.get_json::<Vec<serde_json::Value>>(&["users", username, "starred"], &query),
            self.get_json::<Vec<GitHubEvent>>(&["users", username, "events"], &query),
        )
        .await;

        let mut stats = ActivityStats::default();
        let mut degraded = false;

        match starred {
            Ok(starred) => stats.starred_repos = starred.len(),
            Err(e) => {
                warn!("Starred fetch for {} failed: {}", username, e);
                degraded = true;
            }
        }

        match events {
            Ok(events) => {
                stats.total_events = events.len();
                stats.recent_activity = tally_events(&events);
            }
            Err(e) => {
                warn!("Events fetch for {} failed: {}", username, e);
                degraded = true;
            }
        }

        BestEffort { value: stats, degraded }
    }

    /// Passes the search payload through untouched.
    pub async fn search_users(&self, query: &str) -> Result<serde_json::Value, LensError> {
        let params = [
            ("q", query.to_string()),
            ("per_page", SEARCH_PAGE_SIZE.to_string()),
        ];
        self.get_json(&["search", "users"], &params)
            .await
            .map_err(|e| match e {
                LensError::NotFound => LensError::Remote(StatusCode::NOT_FOUND.as_u16()),
                other => other,
            })
    }
}

/// Sorts by descending stars + forks and keeps the first ten. The sort is
/// stable, so equal scores keep the order the API returned them in.
pub fn top_repositories(repos: Vec<GitHubRepo>) -> Vec<RepoSummary> {
    let mut summaries: Vec<RepoSummary> = repos.into_iter().map(RepoSummary::from).collect();
    summaries.sort_by_key(|repo| Reverse(repo.score()));
    summaries.truncate(TOP_REPOS_LIMIT);
    summaries
}

pub fn tally_events(events: &[GitHubEvent]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for event in events.iter().take(RECENT_EVENTS_LIMIT) {
        let kind = event.kind.as_deref().unwrap_or("Unknown");
        *counts.entry(kind.to_string()).or_insert(0) += 1;
    }
    counts
}
