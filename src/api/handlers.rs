//! HTTP request handlers with OpenAPI documentation.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::error;
use utoipa::OpenApi;

use crate::app::AppState;
use crate::domain::{
    AccountBalances, AppError, Balance, ErrorDetail, ErrorResponse, HealthResponse,
    PaymentReceipt, SendPaymentRequest, ValidationError,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "StellarPay Gateway API",
        version = "0.1.0",
        description = "Gateway for submitting Stellar payments and reading account balances",
        license(name = "MIT")
    ),
    paths(send_payment_handler, account_balances_handler, health_check_handler),
    components(
        schemas(
            SendPaymentRequest,
            PaymentReceipt,
            AccountBalances,
            Balance,
            HealthResponse,
            ErrorResponse,
            ErrorDetail,
        )
    ),
    tags(
        (name = "payments", description = "Payment submission endpoints"),
        (name = "accounts", description = "Account read endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Send a payment
///
/// Builds a single-operation payment transaction from the gateway's source
/// account, signs it, and submits it to Horizon. The response carries the
/// transaction hash; there is no retry on failure.
#[utoipa::path(
    post,
    path = "/api/send",
    tag = "payments",
    request_body = SendPaymentRequest,
    responses(
        (status = 200, description = "Payment submitted and accepted by Horizon", body = PaymentReceipt),
        (status = 400, description = "Malformed request or missing fields", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 500, description = "Account load, build, sign or submission failure", body = ErrorResponse)
    )
)]
pub async fn send_payment_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendPaymentRequest>,
) -> Result<Json<PaymentReceipt>, AppError> {
    let receipt = state.service.send_payment(&payload).await?;
    Ok(Json(receipt))
}

/// Query parameters for the balances endpoint
#[derive(Debug, Deserialize)]
pub struct BalanceParams {
    pub account_id: Option<String>,
}

/// Get account balances
#[utoipa::path(
    get,
    path = "/api/balances",
    tag = "accounts",
    params(
        ("account_id" = String, Query, description = "Account to inspect (G... address)")
    ),
    responses(
        (status = 200, description = "Balance list for the account", body = AccountBalances),
        (status = 400, description = "Missing account_id parameter", body = ErrorResponse),
        (status = 500, description = "Account load failure", body = ErrorResponse)
    )
)]
pub async fn account_balances_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BalanceParams>,
) -> Result<Json<AccountBalances>, AppError> {
    let account_id = params
        .account_id
        .ok_or_else(|| AppError::Validation(ValidationError::missing("account_id")))?;
    let balances = state.service.account_balances(&account_id).await?;
    Ok(Json(balances))
}

/// Health check
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Gateway status and target network", body = HealthResponse)
    )
)]
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.network))
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_type) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, "authentication_error"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error"),
            AppError::Ledger(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ledger_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        let message = self.to_string();

        if status.is_server_error() {
            error!(error_type = %error_type, message = %message, "Server error");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                r#type: error_type.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}
