//! The fixed business handler shared by every benchmark variant.
//!
//! # Design Decisions
//! - Pure function: no input, no state, no failure modes
//! - Every variant serves the exact same bytes, so latency differences
//!   between variants are attributable solely to the tracing policy

use axum::http::header;
use axum::response::IntoResponse;

/// Response body served by every variant.
pub const BODY: &str = "hello world";

/// Content type served by every variant.
pub const CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// `GET` handler: constant plain-text success response.
pub async fn hello() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], BODY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn fixed_response() {
        let response = hello().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            CONTENT_TYPE
        );
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        assert_eq!(&body[..], BODY.as_bytes());
    }
}
