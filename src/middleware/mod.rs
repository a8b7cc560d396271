use hyper::{HeaderMap, header::{HeaderName, HeaderValue}};
use tracing::info;


pub fn add_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("Content-Type"),
    );
}

/// Header set attached to every reply, errors included.
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    add_cors_headers(&mut headers);
    headers
}

pub fn log_request(request: warp::log::Info<'_>) {
    info!(
        "{} {} {} {}ms",
        request.method(),
        request.path(),
        request.status().as_u16(),
        request.elapsed().as_millis()
    );
}
