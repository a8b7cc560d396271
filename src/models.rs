use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `GET /users/{username}` payload, reduced to the fields we present.
#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub language: Option<String>,
    pub description: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
    /// Display form, e.g. "January 25, 2011".
    pub created_at: String,
    pub updated_at: String,
}

impl Profile {
    /// Builds the presented profile, replacing both machine timestamps with
    /// their display form.
    pub fn from_remote(user: GitHubUser, format_timestamp: impl Fn(&str) -> String) -> Self {
        Self {
            created_at: format_timestamp(&user.created_at),
            updated_at: format_timestamp(&user.updated_at),
            username: user.login,
            name: user.name,
            bio: user.bio,
            avatar_url: user.avatar_url,
            html_url: user.html_url,
            followers: user.followers,
            following: user.following,
            public_repos: user.public_repos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
    pub description: Option<String>,
    pub updated_at: Option<String>,
}

impl RepoSummary {
    pub fn score(&self) -> u64 {
        self.stars + self.forks
    }
}

impl From<GitHubRepo> for RepoSummary {
    fn from(repo: GitHubRepo) -> Self {
        Self {
            name: repo.name,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            language: repo.language,
            description: repo.description,
            updated_at: repo.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub starred_repos: usize,
    /// Event type name -> occurrences among the most recent events.
    pub recent_activity: BTreeMap<String, usize>,
    /// Number of events returned by the remote, before truncation.
    pub total_events: usize,
}

/// A value that may stand in for a swallowed sub-fetch failure.
///
/// `degraded` tells "nothing there" apart from "could not ask".
#[derive(Debug, Clone, PartialEq)]
pub struct BestEffort<T> {
    pub value: T,
    pub degraded: bool,
}

impl<T> BestEffort<T> {
    pub fn complete(value: T) -> Self {
        Self { value, degraded: false }
    }

    pub fn degraded(value: T) -> Self {
        Self { value, degraded: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRecord {
    pub profile: Profile,
    pub repos: Vec<RepoSummary>,
    pub stats: ActivityStats,
    /// True when repositories or statistics were replaced by empty values.
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComparisonOutcome {
    Found {
        username: String,
        #[serde(flatten)]
        record: CompositeRecord,
    },
    Failed {
        username: String,
        error: String,
    },
}

impl ComparisonOutcome {
    pub fn username(&self) -> &str {
        match self {
            Self::Found { username, .. } | Self::Failed { username, .. } => username,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Found { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub usernames: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub results: Vec<ComparisonOutcome>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}
