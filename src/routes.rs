use std::convert::Infallible;
use std::sync::Arc;

use warp::{Filter, Reply};

use crate::handlers;
use crate::middleware::{cors_headers, log_request};
use crate::models::SearchQuery;
use crate::services::Lens;

const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Full route tree: health check plus the JSON API, with rejections turned
/// into JSON error replies and CORS headers on everything.
pub fn routes(lens: Arc<Lens>) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let lens_filter = warp::any().map(move || lens.clone());

    let health_check = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| "OK");

    let lookup = warp::path!("api" / "users" / String)
        .and(warp::get())
        .and(lens_filter.clone())
        .and_then(handlers::lookup_user);

    let compare = warp::path!("api" / "compare")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(lens_filter.clone())
        .and_then(handlers::compare_users);

    let search = warp::path!("api" / "search")
        .and(warp::get())
        .and(warp::query::<SearchQuery>())
        .and(lens_filter)
        .and_then(handlers::search_users);

    health_check
        .or(lookup)
        .or(compare)
        .or(search)
        .recover(handlers::handle_rejection)
        .with(warp::reply::with::headers(cors_headers()))
        .with(warp::log::custom(log_request))
}
