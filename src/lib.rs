pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::ResponseCache;
pub use client::GitHubClient;
pub use errors::LensError;
pub use models::{ActivityStats, BestEffort, ComparisonOutcome, CompositeRecord, Profile, RepoSummary};
pub use services::Lens;
