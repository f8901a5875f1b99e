//! Application service layer.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::{
    AccountBalances, AppError, LedgerClient, PaymentReceipt, SendPaymentRequest, ValidationError,
};

/// Payment service containing the request-handling business logic
pub struct PaymentService {
    ledger: Arc<dyn LedgerClient>,
}

impl PaymentService {
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    /// Validate a payment request, resolve its asset and submit it.
    ///
    /// Validation failures never reach the ledger; every ledger failure is
    /// terminal for the request (no retries).
    #[instrument(skip(self, request), fields(recipient = %request.recipient, amount = %request.amount))]
    pub async fn send_payment(
        &self,
        request: &SendPaymentRequest,
    ) -> Result<PaymentReceipt, AppError> {
        request.validate().map_err(|e| {
            warn!(error = %e, "Validation failed");
            AppError::Validation(ValidationError::Multiple(e.to_string()))
        })?;

        let asset = request.asset().map_err(|e| {
            warn!(error = %e, "Asset resolution failed");
            e
        })?;

        info!(asset = %asset.code(), "Submitting payment");
        let hash = self
            .ledger
            .send_payment(&request.recipient, &request.amount, &asset)
            .await?;

        Ok(PaymentReceipt::new(hash, &asset, request))
    }

    /// Load the balance list for an account
    pub async fn account_balances(&self, account_id: &str) -> Result<AccountBalances, AppError> {
        if account_id.trim().is_empty() {
            return Err(ValidationError::missing("account_id").into());
        }

        let account = self.ledger.account_detail(account_id).await?;
        Ok(AccountBalances {
            account_id: account.account_id,
            balances: account.balances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::{AccountRecord, Balance, LedgerError, PaymentAsset};

    #[derive(Default)]
    struct RecordingLedger {
        payments: Mutex<Vec<(String, String, PaymentAsset)>>,
        fail_submission: bool,
    }

    #[async_trait]
    impl LedgerClient for RecordingLedger {
        async fn account_detail(&self, account_id: &str) -> Result<AccountRecord, AppError> {
            Ok(AccountRecord {
                account_id: account_id.to_string(),
                sequence: 100,
                balances: vec![Balance {
                    asset_type: "native".to_string(),
                    asset_code: None,
                    asset_issuer: None,
                    balance: "50.0000000".to_string(),
                    limit: None,
                }],
            })
        }

        async fn send_payment(
            &self,
            destination: &str,
            amount: &str,
            asset: &PaymentAsset,
        ) -> Result<String, AppError> {
            if self.fail_submission {
                return Err(
                    LedgerError::SubmissionRejected("tx_insufficient_balance".to_string()).into(),
                );
            }
            self.payments.lock().unwrap().push((
                destination.to_string(),
                amount.to_string(),
                asset.clone(),
            ));
            Ok("deadbeef".to_string())
        }
    }

    fn request(recipient: &str, amount: &str) -> SendPaymentRequest {
        SendPaymentRequest {
            recipient: recipient.to_string(),
            amount: amount.to_string(),
            asset_code: None,
            asset_issuer: None,
        }
    }

    #[tokio::test]
    async fn test_send_payment_success() {
        let ledger = Arc::new(RecordingLedger::default());
        let service = PaymentService::new(Arc::clone(&ledger) as _);

        let receipt = service.send_payment(&request("GABC", "10")).await.unwrap();
        assert_eq!(receipt.hash, "deadbeef");
        assert_eq!(receipt.amount, "10");
        assert_eq!(receipt.recipient, "GABC");
        assert_eq!(receipt.asset, "XLM");

        let payments = ledger.payments.lock().unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].2, PaymentAsset::Native);
    }

    #[tokio::test]
    async fn test_send_payment_empty_fields_never_reach_ledger() {
        let ledger = Arc::new(RecordingLedger::default());
        let service = PaymentService::new(Arc::clone(&ledger) as _);

        let err = service.send_payment(&request("", "10")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = service.send_payment(&request("GABC", "")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(ledger.payments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_payment_issued_asset_requires_issuer() {
        let ledger = Arc::new(RecordingLedger::default());
        let service = PaymentService::new(Arc::clone(&ledger) as _);

        let mut req = request("GABC", "10");
        req.asset_code = Some("USDC".to_string());
        let err = service.send_payment(&req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(ledger.payments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_payment_ledger_failure_surfaces() {
        let ledger = Arc::new(RecordingLedger {
            fail_submission: true,
            ..Default::default()
        });
        let service = PaymentService::new(ledger as _);

        let err = service.send_payment(&request("GABC", "10")).await.unwrap_err();
        assert!(matches!(err, AppError::Ledger(_)));
        assert!(err.to_string().contains("tx_insufficient_balance"));
    }

    #[tokio::test]
    async fn test_account_balances() {
        let service = PaymentService::new(Arc::new(RecordingLedger::default()) as _);

        let balances = service.account_balances("GABC").await.unwrap();
        assert_eq!(balances.account_id, "GABC");
        assert_eq!(balances.balances.len(), 1);

        let err = service.account_balances("").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
