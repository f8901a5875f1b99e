//! Infrastructure layer implementations.

pub mod ledger;

pub use ledger::{HorizonLedgerClient, account_id_from_key, signing_key_from_seed};
