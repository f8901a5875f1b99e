//! Router assembly.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app::AppState;

use super::handlers::{
    ApiDoc, account_balances_handler, health_check_handler, send_payment_handler,
};
use super::middleware::{CorsConfig, origin_filter, require_api_key};

/// Create the router with the default origin allow-list
pub fn create_router(state: Arc<AppState>) -> Router {
    create_router_with_cors(state, CorsConfig::default())
}

/// Create the router with an explicit origin allow-list.
///
/// The send endpoint sits behind the API-key gate; balances and health are
/// public. The origin filter wraps everything, including unmatched paths, so
/// preflights short-circuit before routing.
pub fn create_router_with_cors(state: Arc<AppState>, cors: CorsConfig) -> Router {
    let protected = Router::new()
        .route("/api/send", post(send_payment_handler))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_api_key,
        ));

    Router::new()
        .merge(protected)
        .route("/api/balances", get(account_balances_handler))
        .route("/api/health", get(health_check_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(cors, origin_filter))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
