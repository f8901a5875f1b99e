//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::AppError;
use super::types::{AccountRecord, PaymentAsset};

/// Ledger client trait for Horizon interaction.
///
/// The production implementation fetches account state from Horizon and
/// builds, signs and submits payment transactions from the server-held key.
/// Handlers only depend on this trait so tests can swap in a mock.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Load current account state (sequence number and balances)
    async fn account_detail(&self, account_id: &str) -> Result<AccountRecord, AppError>;

    /// Build, sign and submit a single-payment transaction from the gateway's
    /// source account. Returns the transaction hash on success.
    async fn send_payment(
        &self,
        destination: &str,
        amount: &str,
        asset: &PaymentAsset,
    ) -> Result<String, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Balance;

    // Minimal implementation exercising the trait object surface
    struct MinimalLedgerClient;

    #[async_trait]
    impl LedgerClient for MinimalLedgerClient {
        async fn account_detail(&self, account_id: &str) -> Result<AccountRecord, AppError> {
            Ok(AccountRecord {
                account_id: account_id.to_string(),
                sequence: 1,
                balances: vec![Balance {
                    asset_type: "native".to_string(),
                    asset_code: None,
                    asset_issuer: None,
                    balance: "0.0000000".to_string(),
                    limit: None,
                }],
            })
        }

        async fn send_payment(
            &self,
            _destination: &str,
            _amount: &str,
            _asset: &PaymentAsset,
        ) -> Result<String, AppError> {
            Ok("hash_123".to_string())
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let client: std::sync::Arc<dyn LedgerClient> = std::sync::Arc::new(MinimalLedgerClient);
        let account = client.account_detail("GABC").await.unwrap();
        assert_eq!(account.account_id, "GABC");
        let hash = client
            .send_payment("GDEF", "1", &PaymentAsset::Native)
            .await
            .unwrap();
        assert_eq!(hash, "hash_123");
    }
}
