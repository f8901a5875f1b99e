//! Request middleware: origin filtering and the API-key gate.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::domain::AppError;

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Origin allow-list for the origin filter
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

impl CorsConfig {
    /// Parse a comma-separated allow-list; entries are trimmed, empty entries
    /// dropped. An effectively empty list falls back to the defaults.
    #[must_use]
    pub fn from_list(list: &str) -> Self {
        let allowed_origins: Vec<String> = list
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        if allowed_origins.is_empty() {
            Self::default()
        } else {
            Self { allowed_origins }
        }
    }

    /// Exact string match against the allow-list
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }
}

/// Origin filter.
///
/// Echoes an allow-listed `Origin` back in `Access-Control-Allow-Origin` and
/// answers `OPTIONS` requests directly with 200. Requests from non-listed
/// origins still run the downstream handler; only the allow-origin header is
/// withheld. The browser is the enforcement point, not the server.
pub async fn origin_filter(
    State(cors): State<CorsConfig>,
    request: Request,
    next: Next,
) -> Response {
    let echo = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .filter(|origin| cors.is_allowed(origin))
        .map(str::to_owned);

    // Preflight requests never reach a handler
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    if let Some(origin) = echo {
        if let Ok(value) = HeaderValue::from_str(&origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization, X-API-Key"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
    response
}

/// API-key gate for the send endpoint.
///
/// With no key configured the gate is a pass-through. With a key configured,
/// the `X-API-Key` header must match exactly or the request ends with 401.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = &state.api_key {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected.as_str()) {
            return Err(AppError::Authentication(
                "Invalid or missing API key".to_string(),
            ));
        }
    }
    Ok(next.run(request).await)
}
