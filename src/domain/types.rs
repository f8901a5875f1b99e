//! Domain types with validation support.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::error::ValidationError;

/// Stellar network the gateway operates against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StellarNetwork {
    /// Test SDF network
    #[default]
    Testnet,
    /// Public Stellar network
    Pubnet,
}

impl StellarNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Testnet => "testnet",
            Self::Pubnet => "pubnet",
        }
    }

    /// Network passphrase used to domain-separate transaction signatures
    pub fn passphrase(&self) -> &'static str {
        match self {
            Self::Testnet => "Test SDF Network ; September 2015",
            Self::Pubnet => "Public Global Stellar Network ; September 2015",
        }
    }

    /// Default Horizon endpoint for this network
    pub fn default_horizon_url(&self) -> &'static str {
        match self {
            Self::Testnet => "https://horizon-testnet.stellar.org",
            Self::Pubnet => "https://horizon.stellar.org",
        }
    }
}

impl std::str::FromStr for StellarNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "testnet" => Ok(Self::Testnet),
            "pubnet" | "public" => Ok(Self::Pubnet),
            _ => Err(format!("Invalid Stellar network: {}", s)),
        }
    }
}

impl std::fmt::Display for StellarNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Asset to move in a payment: the native lumen or an issued token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PaymentAsset {
    /// Native XLM
    Native,
    /// Issued asset, identified by code plus issuing account
    Issued { code: String, issuer: String },
}

impl PaymentAsset {
    /// Resolve the asset from optional request fields.
    ///
    /// An absent or empty code, or the literal `"XLM"`, means native. Anything
    /// else is an issued asset and requires a non-empty issuer.
    pub fn resolve(code: Option<&str>, issuer: Option<&str>) -> Result<Self, ValidationError> {
        match code {
            None | Some("") | Some("XLM") => Ok(Self::Native),
            Some(code) => {
                let issuer = issuer.unwrap_or_default();
                if issuer.is_empty() {
                    return Err(ValidationError::InvalidField {
                        field: "asset_issuer".to_string(),
                        message: "required for non-native assets".to_string(),
                    });
                }
                Ok(Self::Issued {
                    code: code.to_string(),
                    issuer: issuer.to_string(),
                })
            }
        }
    }

    /// Asset code as reported back to the caller
    pub fn code(&self) -> &str {
        match self {
            Self::Native => "XLM",
            Self::Issued { code, .. } => code,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

/// Request to send a payment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SendPaymentRequest {
    /// Destination account (G... address)
    ///
    /// Absent keys deserialize to the empty string so they fail field
    /// validation rather than body deserialization.
    #[serde(default)]
    #[validate(length(min = 1, message = "Recipient is required"))]
    #[schema(example = "GB43KVROR7TFJ6KAPCYRF2FJROTZAH4FHLTJLPWX4DRZCC5NASLGITR6")]
    pub recipient: String,
    /// Amount as a decimal string, e.g. "10" or "0.5"
    #[serde(default)]
    #[validate(length(min = 1, message = "Amount is required"))]
    #[schema(example = "10")]
    pub amount: String,
    /// Asset code; absent or "XLM" means the native asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "USDC")]
    pub asset_code: Option<String>,
    /// Issuing account, required for non-native assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<String>,
}

impl SendPaymentRequest {
    /// Resolve the asset this request refers to
    pub fn asset(&self) -> Result<PaymentAsset, ValidationError> {
        PaymentAsset::resolve(self.asset_code.as_deref(), self.asset_issuer.as_deref())
    }
}

/// Successful payment response, echoing request metadata
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentReceipt {
    /// Human-readable outcome
    #[schema(example = "Transaction successful")]
    pub message: String,
    /// Hex-encoded transaction hash returned by Horizon
    pub hash: String,
    /// Asset code that was moved
    #[schema(example = "XLM")]
    pub asset: String,
    /// Echoed request amount
    pub amount: String,
    /// Echoed request recipient
    pub recipient: String,
}

impl PaymentReceipt {
    #[must_use]
    pub fn new(hash: String, asset: &PaymentAsset, request: &SendPaymentRequest) -> Self {
        Self {
            message: "Transaction successful".to_string(),
            hash,
            asset: asset.code().to_string(),
            amount: request.amount.clone(),
            recipient: request.recipient.clone(),
        }
    }
}

/// Single balance entry on an account, as reported by Horizon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Balance {
    /// "native", "credit_alphanum4" or "credit_alphanum12"
    #[schema(example = "native")]
    pub asset_type: String,
    /// Asset code, absent for the native balance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    /// Issuing account, absent for the native balance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<String>,
    /// Current balance as a decimal string
    #[schema(example = "100.0000000")]
    pub balance: String,
    /// Trustline limit, absent for the native balance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

/// Account state fetched from Horizon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub account_id: String,
    /// Current sequence number; the next transaction uses sequence + 1
    pub sequence: i64,
    pub balances: Vec<Balance>,
}

/// Balances read endpoint response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountBalances {
    pub account_id: String,
    pub balances: Vec<Balance>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok" while the process serves traffic
    #[schema(example = "ok")]
    pub status: String,
    /// Network the gateway submits to
    #[schema(example = "testnet")]
    pub network: String,
}

impl HealthResponse {
    #[must_use]
    pub fn new(network: StellarNetwork) -> Self {
        Self {
            status: "ok".to_string(),
            network: network.to_string(),
        }
    }
}

/// Error response structure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Error type identifier
    #[schema(example = "validation_error")]
    pub r#type: String,
    /// Human-readable error message
    #[schema(example = "Recipient is required")]
    pub message: String,
}
