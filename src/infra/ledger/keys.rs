//! Signing key and address handling.
//!
//! Stellar encodes ed25519 key material as "strkeys": seeds start with `S`,
//! account ids with `G`. The gateway holds a single seed, loaded at startup.

use ed25519_dalek::SigningKey;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::{AppError, ConfigError, LedgerError};

/// Parse an `S...` seed into an ed25519 signing key.
///
/// The seed stays wrapped in [`SecretString`] until this point so it never
/// shows up in debug output.
pub fn signing_key_from_seed(seed: &SecretString) -> Result<SigningKey, AppError> {
    let private = stellar_strkey::ed25519::PrivateKey::from_string(seed.expose_secret())
        .map_err(|e| {
            AppError::Config(ConfigError::InvalidSigningSeed(format!(
                "not a valid S... seed: {:?}",
                e
            )))
        })?;
    Ok(SigningKey::from_bytes(&private.0))
}

/// Derive the `G...` account id for a signing key
pub fn account_id_from_key(key: &SigningKey) -> String {
    stellar_strkey::ed25519::PublicKey(key.verifying_key().to_bytes()).to_string()
}

/// Decode a `G...` account id to its raw ed25519 public key bytes
pub fn public_key_bytes(account_id: &str) -> Result<[u8; 32], AppError> {
    let public = stellar_strkey::ed25519::PublicKey::from_string(account_id).map_err(|e| {
        AppError::Ledger(LedgerError::Build(format!(
            "invalid account id {}: {:?}",
            account_id, e
        )))
    })?;
    Ok(public.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Seed encoding the raw bytes 1..=32
    const TEST_SEED: &str = "SAAQEAYEAUDAOCAJBIFQYDIOB4IBCEQTCQKRMFYYDENBWHA5DYPSBF5K";
    const TEST_ACCOUNT_ID: &str = "GB43KVROR7TFJ6KAPCYRF2FJROTZAH4FHLTJLPWX4DRZCC5NASLGITR6";

    #[test]
    fn test_seed_parses_and_derives_account_id() {
        let seed = SecretString::from(TEST_SEED.to_string());
        let key = signing_key_from_seed(&seed).unwrap();
        assert_eq!(account_id_from_key(&key), TEST_ACCOUNT_ID);
    }

    #[test]
    fn test_invalid_seed_is_config_error() {
        let seed = SecretString::from("not-a-seed".to_string());
        let err = signing_key_from_seed(&seed).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_account_id_roundtrip() {
        let bytes = public_key_bytes(TEST_ACCOUNT_ID).unwrap();
        let encoded = stellar_strkey::ed25519::PublicKey(bytes).to_string();
        assert_eq!(encoded, TEST_ACCOUNT_ID);
    }

    #[test]
    fn test_seed_is_not_a_valid_account_id() {
        assert!(public_key_bytes(TEST_SEED).is_err());
    }
}
