//! In-process stand-in for the GitHub REST API.
//!
//! Users and their behaviour:
//! - `octocat`: full profile, 12 repos, 3 starred, 60 events
//! - `ghost-user-404`: 404 on every endpoint
//! - `broken`: profile returns 500
//! - `lonely`: profile ok, every sub-resource returns 500
//! - `badtime`: profile with unparsable timestamps, empty lists
//! - `slow`: profile answers after `SLOW_DELAY`
//! - `garbled`: profile answers 200 with a body that is not JSON
//! - any other name: minimal profile with empty lists

use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::config::{Config, GITHUB_MEDIA_TYPE};
use crate::services::Lens;

pub const SLOW_DELAY: Duration = Duration::from_millis(600);

pub struct MockGitHub {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockGitHub {
    pub async fn start() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let routes = warp::get()
            .and(warp::path::full())
            .and(warp::query::<HashMap<String, String>>())
            .and(warp::header::optional::<String>("accept"))
            .and(warp::header::optional::<String>("user-agent"))
            .and_then(
                move |path: warp::path::FullPath,
                      query: HashMap<String, String>,
                      accept: Option<String>,
                      agent: Option<String>| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    respond(path.as_str().to_string(), query, accept, agent)
                },
            );

        let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        Self { addr, hits }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> Config {
        Config {
            api_base: self.base_url(),
            request_timeout: Duration::from_millis(300),
            ..Config::default()
        }
    }

    pub fn lens(&self) -> Lens {
        Lens::new(self.config()).unwrap()
    }
}

/// Base URL of a local port that was free a moment ago and has nothing
/// listening on it now.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn respond(
    path: String,
    query: HashMap<String, String>,
    accept: Option<String>,
    agent: Option<String>,
) -> Result<warp::reply::Response, Rejection> {
    if accept.as_deref() != Some(GITHUB_MEDIA_TYPE) || agent.is_none() {
        return Ok(reply(StatusCode::FORBIDDEN, json!({"message": "missing headers"})));
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let response = match segments.as_slice() {
        ["search", "users"] => search(&query),
        ["users", name] => user(name).await,
        ["users", name, resource] => sub_resource(name, resource),
        _ => reply(StatusCode::NOT_FOUND, json!({"message": "Not Found"})),
    };
    Ok(response)
}

fn reply(status: StatusCode, body: Value) -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

async fn user(name: &str) -> warp::reply::Response {
    match name {
        "ghost-user-404" => reply(StatusCode::NOT_FOUND, json!({"message": "Not Found"})),
        "broken" => reply(StatusCode::INTERNAL_SERVER_ERROR, json!({"message": "boom"})),
        "garbled" => warp::reply::with_status("<html>rate limited</html>", StatusCode::OK)
            .into_response(),
        "badtime" => reply(
            StatusCode::OK,
            json!({
                "login": "badtime",
                "created_at": "yesterday",
                "updated_at": "",
            }),
        ),
        _ => {
            if name == "slow" {
                tokio::time::sleep(SLOW_DELAY).await;
            }
            reply(
                StatusCode::OK,
                json!({
                    "login": name,
                    "name": "The Octocat",
                    "bio": null,
                    "avatar_url": "https://avatars.githubusercontent.com/u/583231",
                    "html_url": format!("https://github.com/{}", name),
                    "followers": 100,
                    "following": 9,
                    "public_repos": 12,
                    "created_at": "2011-01-25T18:44:36Z",
                    "updated_at": "2024-03-08T09:05:00Z",
                }),
            )
        }
    }
}

fn sub_resource(name: &str, resource: &str) -> warp::reply::Response {
    match (name, resource) {
        ("ghost-user-404", _) => reply(StatusCode::NOT_FOUND, json!({"message": "Not Found"})),
        ("lonely", _) => reply(StatusCode::INTERNAL_SERVER_ERROR, json!({"message": "boom"})),
        ("octocat", "repos") => reply(StatusCode::OK, octocat_repos()),
        ("octocat", "starred") => reply(StatusCode::OK, json!([{"id": 1}, {"id": 2}, {"id": 3}])),
        ("octocat", "events") => reply(StatusCode::OK, octocat_events()),
        (_, "repos" | "starred" | "events") => reply(StatusCode::OK, json!([])),
        _ => reply(StatusCode::NOT_FOUND, json!({"message": "Not Found"})),
    }
}

/// Scores (stars + forks) in API order:
/// tie-a 5, big 100, tie-b 5, r3..r11 with 1..9.
pub fn octocat_repos() -> Value {
    let mut repos = vec![
        json!({"name": "tie-a", "stargazers_count": 3, "forks_count": 2, "language": "Rust"}),
        json!({"name": "big", "stargazers_count": 90, "forks_count": 10, "language": "Go",
               "description": "the big one", "updated_at": "2024-01-01T00:00:00Z"}),
        json!({"name": "tie-b", "stargazers_count": 5, "forks_count": 0, "language": null}),
    ];
    for i in 1..=9 {
        repos.push(json!({
            "name": format!("r{}", i + 2),
            "stargazers_count": i,
            "forks_count": 0,
        }));
    }
    Value::Array(repos)
}

/// 60 events: the 50 most recent are 30 pushes and 20 watches, the 10
/// oldest are forks.
pub fn octocat_events() -> Value {
    let mut events = Vec::new();
    for i in 0..60 {
        let kind = match i {
            0..=29 => "PushEvent",
            30..=49 => "WatchEvent",
            _ => "ForkEvent",
        };
        events.push(json!({"id": i.to_string(), "type": kind}));
    }
    Value::Array(events)
}

fn search(query: &HashMap<String, String>) -> warp::reply::Response {
    let q = query.get("q").cloned().unwrap_or_default();
    if q == "fail" {
        return reply(StatusCode::SERVICE_UNAVAILABLE, json!({"message": "unavailable"}));
    }
    reply(
        StatusCode::OK,
        json!({
            "total_count": 1,
            "incomplete_results": false,
            "per_page": query.get("per_page"),
            "items": [{"login": q, "id": 1}],
        }),
    )
}
