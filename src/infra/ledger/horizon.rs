//! Horizon ledger client.
//!
//! Horizon is Stellar's HTTP API. Only two of its endpoints matter here:
//! `GET /accounts/{id}` for sequence numbers and balances, and
//! `POST /transactions` for submitting a signed envelope.

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{
    AccountRecord, AppError, Balance, LedgerClient, LedgerError, PaymentAsset, StellarNetwork,
};

use super::keys::account_id_from_key;
use super::tx::{self, PaymentSpec};

/// Ledger client backed by a Horizon instance.
///
/// Holds the gateway's signing key; payments are always sourced from the
/// account that key controls.
pub struct HorizonLedgerClient {
    http_client: reqwest::Client,
    base_url: String,
    network: StellarNetwork,
    signing_key: SigningKey,
    source_account_id: String,
}

impl HorizonLedgerClient {
    #[must_use]
    pub fn new(base_url: &str, network: StellarNetwork, signing_key: SigningKey) -> Self {
        let source_account_id = account_id_from_key(&signing_key);
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            network,
            signing_key,
            source_account_id,
        }
    }

    /// The `G...` account payments are sent from
    pub fn source_account_id(&self) -> &str {
        &self.source_account_id
    }

    async fn fetch_account(&self, account_id: &str) -> Result<HorizonAccount, AppError> {
        let url = format!("{}/accounts/{}", self.base_url, account_id);
        debug!(url = %url, "Fetching account from Horizon");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Ledger(LedgerError::Connection(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Ledger(LedgerError::AccountLoad {
                account_id: account_id.to_string(),
                message: format!("Horizon returned {}: {}", status, problem_message(&body)),
            }));
        }

        response
            .json::<HorizonAccount>()
            .await
            .map_err(|e| AppError::Ledger(LedgerError::MalformedResponse(e.to_string())))
    }

    async fn submit_envelope(&self, envelope_xdr: &str) -> Result<SubmitResponse, AppError> {
        let url = format!("{}/transactions", self.base_url);
        debug!(url = %url, "Submitting transaction to Horizon");

        let response = self
            .http_client
            .post(&url)
            .form(&[("tx", envelope_xdr)])
            .send()
            .await
            .map_err(|e| AppError::Ledger(LedgerError::Connection(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Ledger(LedgerError::SubmissionRejected(format!(
                "Horizon returned {}: {}",
                status,
                problem_message(&body)
            ))));
        }

        response
            .json::<SubmitResponse>()
            .await
            .map_err(|e| AppError::Ledger(LedgerError::MalformedResponse(e.to_string())))
    }
}

#[async_trait]
impl LedgerClient for HorizonLedgerClient {
    async fn account_detail(&self, account_id: &str) -> Result<AccountRecord, AppError> {
        let account = self.fetch_account(account_id).await?;
        let sequence = account.sequence.parse::<i64>().map_err(|e| {
            AppError::Ledger(LedgerError::MalformedResponse(format!(
                "bad sequence {:?}: {}",
                account.sequence, e
            )))
        })?;
        Ok(AccountRecord {
            account_id: account.account_id,
            sequence,
            balances: account.balances,
        })
    }

    async fn send_payment(
        &self,
        destination: &str,
        amount: &str,
        asset: &PaymentAsset,
    ) -> Result<String, AppError> {
        // Reject malformed amounts before any Horizon round-trip
        tx::parse_amount(amount)?;

        // Fresh sequence number per submission; the transaction consumes it
        let source = self.account_detail(&self.source_account_id).await?;
        let envelope = tx::build_signed_envelope(
            &self.signing_key,
            &self.source_account_id,
            source.sequence + 1,
            &PaymentSpec {
                destination,
                amount,
                asset,
            },
            self.network.passphrase(),
        )?;

        let submitted = self.submit_envelope(&envelope).await?;
        info!(
            hash = %submitted.hash,
            destination = %destination,
            asset = %asset.code(),
            "Payment submitted"
        );
        Ok(submitted.hash)
    }
}

/// Account shape as returned by `GET /accounts/{id}`
#[derive(Debug, Deserialize)]
struct HorizonAccount {
    account_id: String,
    /// Horizon serializes the i64 sequence as a JSON string
    sequence: String,
    #[serde(default)]
    balances: Vec<Balance>,
}

/// Successful `POST /transactions` response
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    hash: String,
    #[allow(dead_code)]
    ledger: Option<u64>,
}

/// Failure payloads follow RFC 7807 with Stellar result codes in `extras`
#[derive(Debug, Deserialize)]
struct HorizonProblem {
    title: Option<String>,
    detail: Option<String>,
    extras: Option<ProblemExtras>,
}

#[derive(Debug, Deserialize)]
struct ProblemExtras {
    result_codes: Option<ResultCodes>,
}

#[derive(Debug, Deserialize)]
struct ResultCodes {
    transaction: Option<String>,
    #[serde(default)]
    operations: Vec<String>,
}

/// Extract the most specific human-readable message from an error body
fn problem_message(body: &str) -> String {
    if let Ok(problem) = serde_json::from_str::<HorizonProblem>(body) {
        if let Some(codes) = problem.extras.and_then(|e| e.result_codes) {
            let mut message = codes.transaction.unwrap_or_default();
            if !codes.operations.is_empty() {
                if !message.is_empty() {
                    message.push(' ');
                }
                message.push_str(&format!("({})", codes.operations.join(", ")));
            }
            if !message.is_empty() {
                return message;
            }
        }
        if let Some(detail) = problem.detail {
            return detail;
        }
        if let Some(title) = problem.title {
            return title;
        }
    }
    // Unrecognized body, return a truncated raw form
    body.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_message_prefers_result_codes() {
        let body = r#"{
            "title": "Transaction Failed",
            "detail": "The transaction failed when submitted to the stellar network.",
            "extras": {
                "result_codes": {
                    "transaction": "tx_failed",
                    "operations": ["op_underfunded"]
                }
            }
        }"#;
        assert_eq!(problem_message(body), "tx_failed (op_underfunded)");
    }

    #[test]
    fn test_problem_message_falls_back_to_detail_then_title() {
        let body = r#"{"title": "Resource Missing", "detail": "The resource could not be found."}"#;
        assert_eq!(problem_message(body), "The resource could not be found.");

        let body = r#"{"title": "Resource Missing"}"#;
        assert_eq!(problem_message(body), "Resource Missing");
    }

    #[test]
    fn test_problem_message_truncates_raw_bodies() {
        let body = "x".repeat(500);
        assert_eq!(problem_message(&body).len(), 200);
    }
}
