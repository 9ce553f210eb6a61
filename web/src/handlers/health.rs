//! Health check endpoint.
//!
//! Used by load balancers and monitoring to verify the service is up.
//! Does not check dependencies.

use axum::http::StatusCode;

/// Simple liveness check; returns 200 OK.
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
