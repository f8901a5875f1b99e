//! StellarPay Gateway.
//!
//! A small HTTP gateway in front of the Stellar network: it accepts payment
//! requests, builds and signs single-operation payment transactions with a
//! server-held key, submits them to Horizon, and exposes account balances and
//! a health check.
//!
//! Layering follows the usual onion: [`domain`] holds types, traits and
//! errors; [`app`] the business logic and shared state; [`infra`] the Horizon
//! client; [`api`] the axum handlers, middleware and router.

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

#[cfg(feature = "test-utils")]
pub mod test_utils;
