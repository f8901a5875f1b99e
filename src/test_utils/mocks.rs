//! Mock implementations for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{
    AccountRecord, AppError, Balance, LedgerClient, LedgerError, PaymentAsset,
};

/// Configuration for mock behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub should_fail: bool,
    pub error_message: Option<String>,
}

impl MockConfig {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
        }
    }
}

/// Payment recorded by the mock ledger
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPayment {
    pub destination: String,
    pub amount: String,
    pub asset: PaymentAsset,
}

/// Mock ledger client for testing
pub struct MockLedgerClient {
    accounts: Arc<Mutex<HashMap<String, AccountRecord>>>,
    payments: Arc<Mutex<Vec<RecordedPayment>>>,
    config: MockConfig,
}

impl MockLedgerClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(HashMap::new())),
            payments: Arc::new(Mutex::new(Vec::new())),
            config,
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Seed an account the mock will return from `account_detail`
    pub fn insert_account(&self, record: AccountRecord) {
        self.accounts
            .lock()
            .unwrap()
            .insert(record.account_id.clone(), record);
    }

    /// Seed an account holding only a native balance
    pub fn insert_native_account(&self, account_id: &str, balance: &str) {
        self.insert_account(AccountRecord {
            account_id: account_id.to_string(),
            sequence: 100,
            balances: vec![Balance {
                asset_type: "native".to_string(),
                asset_code: None,
                asset_issuer: None,
                balance: balance.to_string(),
                limit: None,
            }],
        });
    }

    /// Payments submitted so far (for assertions)
    pub fn payments(&self) -> Vec<RecordedPayment> {
        self.payments.lock().unwrap().clone()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.lock().unwrap().len()
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock error".to_string());
            return Err(AppError::Ledger(LedgerError::SubmissionRejected(msg)));
        }
        Ok(())
    }
}

impl Default for MockLedgerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn account_detail(&self, account_id: &str) -> Result<AccountRecord, AppError> {
        self.check_should_fail()?;
        let accounts = self.accounts.lock().unwrap();
        accounts.get(account_id).cloned().ok_or_else(|| {
            AppError::Ledger(LedgerError::AccountLoad {
                account_id: account_id.to_string(),
                message: "Horizon returned 404 Not Found: Resource Missing".to_string(),
            })
        })
    }

    async fn send_payment(
        &self,
        destination: &str,
        amount: &str,
        asset: &PaymentAsset,
    ) -> Result<String, AppError> {
        self.check_should_fail()?;
        let mut payments = self.payments.lock().unwrap();
        payments.push(RecordedPayment {
            destination: destination.to_string(),
            amount: amount.to_string(),
            asset: asset.clone(),
        });
        // Deterministic, non-empty "hash" derived from the submission order
        Ok(format!("{:064x}", payments.len()))
    }
}
