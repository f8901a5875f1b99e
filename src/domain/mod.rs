//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, LedgerError, ValidationError};
pub use traits::LedgerClient;
pub use types::{
    AccountBalances, AccountRecord, Balance, ErrorDetail, ErrorResponse, HealthResponse,
    PaymentAsset, PaymentReceipt, SendPaymentRequest, StellarNetwork,
};
