//! Ledger client implementation for Stellar's Horizon API.

pub mod horizon;
pub mod keys;
pub mod tx;

pub use horizon::HorizonLedgerClient;
pub use keys::{account_id_from_key, signing_key_from_seed};
pub use tx::{BASE_FEE_STROOPS, PaymentSpec, VALIDITY_WINDOW_SECS, build_signed_envelope};
