use std::convert::Infallible;
use std::sync::Arc;

use hyper::StatusCode;
use serde::Serialize;
use tracing::error;
use warp::{Rejection, Reply};

use crate::errors::LensError;
use crate::models::{CompareRequest, CompareResponse, SearchQuery};
use crate::services::Lens;


#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn lookup_user(username: String, lens: Arc<Lens>) -> Result<impl Reply, Rejection> {
    let record = lens.lookup(&username).await.map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&record))
}

pub async fn compare_users(
    request: CompareRequest,
    lens: Arc<Lens>,
) -> Result<impl Reply, Rejection> {
    let results = lens
        .compare(&request.usernames)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&CompareResponse { results }))
}

pub async fn search_users(query: SearchQuery, lens: Arc<Lens>) -> Result<impl Reply, Rejection> {
    let results = lens.raw_search(&query.q).await.map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&results))
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(e) = err.find::<LensError>() {
        let code = match e {
            LensError::Validation(_) => StatusCode::BAD_REQUEST,
            LensError::NotFound => StatusCode::NOT_FOUND,
            LensError::Remote(_) | LensError::InvalidResponse(_) | LensError::Network(_) => {
                StatusCode::BAD_GATEWAY
            }
            LensError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            LensError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (code, e.to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::UnsupportedMediaType>() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::PayloadTooLarge>() {
        (StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::LengthRequired>() {
        (StatusCode::LENGTH_REQUIRED, e.to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query string".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody { error: message }),
        code,
    ))
}
