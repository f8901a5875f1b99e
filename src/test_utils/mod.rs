//! Test utilities, enabled with the `test-utils` feature.

pub mod mocks;

pub use mocks::{MockConfig, MockLedgerClient, RecordedPayment};
