//! 405 responses for verbs a route does not support.
//!
//! Installed as the method-router fallback, so it answers before any handler logic runs.

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};

/// `Allow` value for `/patients`.
pub const COLLECTION_ALLOW: &str = "GET, POST";

/// `Allow` value for `/patients/{id}`.
pub const RESOURCE_ALLOW: &str = "PUT, DELETE";

#[derive(Debug)]
pub struct MethodNotAllowed {
    method: Method,
    allow: &'static str,
}

impl IntoResponse for MethodNotAllowed {
    fn into_response(self) -> Response {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, self.allow)],
            format!("Method {} Not Allowed", self.method),
        )
            .into_response()
    }
}

pub async fn collection_fallback(method: Method) -> MethodNotAllowed {
    MethodNotAllowed {
        method,
        allow: COLLECTION_ALLOW,
    }
}

pub async fn resource_fallback(method: Method) -> MethodNotAllowed {
    MethodNotAllowed {
        method,
        allow: RESOURCE_ALLOW,
    }
}
