//! Application state management.

use std::sync::Arc;

use crate::domain::{LedgerClient, StellarNetwork};

use super::service::PaymentService;

/// Shared application state, read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PaymentService>,
    /// Network reported by the health endpoint
    pub network: StellarNetwork,
    /// API key gating the send endpoint (optional; unset disables the gate)
    pub api_key: Option<String>,
}

impl AppState {
    /// Create a new application state
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerClient>, network: StellarNetwork) -> Self {
        Self {
            service: Arc::new(PaymentService::new(ledger)),
            network,
            api_key: None,
        }
    }

    /// Set the API key for the send endpoint (builder pattern)
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}
