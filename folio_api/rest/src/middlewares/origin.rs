//! Origin allow-list enforcement, applied before any handler runs.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{from_fn, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::{models::ApiFailure, routes::failure};

#[derive(Debug)]
pub struct OriginGateConfig {
    /// Exact-match entries; no wildcard patterns.
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

pub fn add<S: Clone + Send + Sync + 'static>(
    config: Arc<OriginGateConfig>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| {
        router.layer(from_fn(move |request: Request, next: Next| {
            gate(Arc::clone(&config), request, next)
        }))
    }
}

async fn gate(config: Arc<OriginGateConfig>, request: Request, next: Next) -> Response {
    // Requests without an Origin header (health checks, curl) pass; browsers
    // always send one cross-origin.
    let origin = match request.headers().get(header::ORIGIN) {
        None => None,
        Some(value) => {
            let allowed = value
                .to_str()
                .is_ok_and(|origin| config.allowed_origins.iter().any(|entry| entry == origin));
            if !allowed {
                // Generic denial; the allow-list itself is not disclosed.
                return failure(StatusCode::FORBIDDEN, ApiFailure::new("Access denied"));
            }
            Some(value.clone())
        }
    };

    let mut response = if request.method() == Method::GET || request.method() == Method::POST {
        next.run(request).await
    } else if request.method() == Method::OPTIONS {
        // Preflights are answered here; they never reach a handler.
        StatusCode::NO_CONTENT.into_response()
    } else {
        failure(
            StatusCode::METHOD_NOT_ALLOWED,
            ApiFailure::new("Method not allowed"),
        )
    };

    if let Some(origin) = origin {
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Accept"),
        );
        if config.allow_credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use tower::ServiceExt;

    use super::*;
    use crate::routes;

    fn gated_router(allow_credentials: bool) -> Router<()> {
        let config = Arc::new(OriginGateConfig {
            allowed_origins: vec![
                "http://localhost:8080".into(),
                "http://localhost:5173".into(),
            ],
            allow_credentials,
        });
        add(config)(routes::health::router())
    }

    fn probe(origin: Option<&str>, method: &str) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder()
            .method(method)
            .uri("/api/test");
        if let Some(origin) = origin {
            builder = builder.header("Origin", origin);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn no_origin_is_allowed() {
        let response = gated_router(false).oneshot(probe(None, "GET")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn allowed_origin_is_echoed() {
        let response = gated_router(false)
            .oneshot(probe(Some("http://localhost:5173"), "GET"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
    }

    #[tokio::test]
    async fn unlisted_origin_is_rejected_generically() {
        let response = gated_router(false)
            .oneshot(probe(Some("https://evil.example"), "GET"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": "Access denied"})
        );
    }

    #[tokio::test]
    async fn preflight_short_circuits() {
        let response = gated_router(true)
            .oneshot(probe(Some("http://localhost:8080"), "OPTIONS"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:8080"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected() {
        let response = gated_router(false)
            .oneshot(probe(Some("http://localhost:8080"), "DELETE"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
