//! Payment transaction assembly and signing.
//!
//! Builds the canonical XDR structures from `stellar-xdr`, signs the
//! network-scoped transaction hash with `ed25519-dalek`, and returns the
//! base64 envelope Horizon expects in its submission endpoint.

use std::time::{SystemTime, UNIX_EPOCH};

use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{
    AccountId, AlphaNum4, AlphaNum12, Asset as XdrAsset, AssetCode4, AssetCode12,
    DecoratedSignature, Hash, Limits, Memo, MuxedAccount, Operation, OperationBody, PaymentOp,
    Preconditions, PublicKey as XdrPublicKey, SequenceNumber, Signature, SignatureHint, TimeBounds,
    TimePoint, Transaction, TransactionEnvelope, TransactionExt, TransactionSignaturePayload,
    TransactionSignaturePayloadTaggedTransaction, TransactionV1Envelope, Uint256, WriteXdr,
};

use crate::domain::{AppError, LedgerError, PaymentAsset, ValidationError};

use super::keys::public_key_bytes;

/// Minimum base fee per operation, in stroops
pub const BASE_FEE_STROOPS: u32 = 100;

/// Transaction validity window in seconds
pub const VALIDITY_WINDOW_SECS: u64 = 300;

/// Stroops per whole unit of an asset (7 decimal places)
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

/// Payment to encode into a transaction
#[derive(Debug, Clone)]
pub struct PaymentSpec<'a> {
    pub destination: &'a str,
    /// Decimal-string amount, e.g. "10" or "0.5"
    pub amount: &'a str,
    pub asset: &'a PaymentAsset,
}

fn amount_error(message: &str) -> ValidationError {
    ValidationError::InvalidField {
        field: "amount".to_string(),
        message: message.to_string(),
    }
}

/// Parse a decimal-string amount into stroops.
///
/// Stellar amounts carry at most 7 decimal places and must be positive.
pub fn parse_amount(amount: &str) -> Result<i64, ValidationError> {
    let (whole, frac) = match amount.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (amount, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(amount_error("not a decimal number"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(amount_error("not a decimal number"));
    }
    if frac.len() > 7 {
        return Err(amount_error("at most 7 decimal places are supported"));
    }

    let whole_part: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| amount_error("amount too large"))?
    };

    let mut frac_padded = frac.to_string();
    while frac_padded.len() < 7 {
        frac_padded.push('0');
    }
    let frac_part: i64 = frac_padded
        .parse()
        .map_err(|_| amount_error("not a decimal number"))?;

    let stroops = whole_part
        .checked_mul(STROOPS_PER_UNIT)
        .and_then(|v| v.checked_add(frac_part))
        .ok_or_else(|| amount_error("amount too large"))?;
    if stroops <= 0 {
        return Err(amount_error("must be greater than zero"));
    }
    Ok(stroops)
}

fn xdr_account_id(account_id: &str) -> Result<AccountId, AppError> {
    let bytes = public_key_bytes(account_id)?;
    Ok(AccountId(XdrPublicKey::PublicKeyTypeEd25519(Uint256(bytes))))
}

fn xdr_muxed_account(account_id: &str) -> Result<MuxedAccount, AppError> {
    let bytes = public_key_bytes(account_id)?;
    Ok(MuxedAccount::Ed25519(Uint256(bytes)))
}

/// Convert the domain asset to its XDR representation.
///
/// Codes of 1-4 characters map to `credit_alphanum4`, 5-12 to
/// `credit_alphanum12`; both are zero-padded on the right.
fn xdr_asset(asset: &PaymentAsset) -> Result<XdrAsset, AppError> {
    match asset {
        PaymentAsset::Native => Ok(XdrAsset::Native),
        PaymentAsset::Issued { code, issuer } => {
            if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(AppError::Validation(ValidationError::InvalidField {
                    field: "asset_code".to_string(),
                    message: "must be 1-12 alphanumeric characters".to_string(),
                }));
            }
            let issuer = xdr_account_id(issuer)?;
            match code.len() {
                1..=4 => {
                    let mut bytes = [0u8; 4];
                    bytes[..code.len()].copy_from_slice(code.as_bytes());
                    Ok(XdrAsset::CreditAlphanum4(AlphaNum4 {
                        asset_code: AssetCode4(bytes),
                        issuer,
                    }))
                }
                5..=12 => {
                    let mut bytes = [0u8; 12];
                    bytes[..code.len()].copy_from_slice(code.as_bytes());
                    Ok(XdrAsset::CreditAlphanum12(AlphaNum12 {
                        asset_code: AssetCode12(bytes),
                        issuer,
                    }))
                }
                _ => Err(AppError::Validation(ValidationError::InvalidField {
                    field: "asset_code".to_string(),
                    message: "must be 1-12 alphanumeric characters".to_string(),
                })),
            }
        }
    }
}

/// SHA-256 of the network passphrase, scoping signatures to one network
fn network_id(passphrase: &str) -> Hash {
    Hash(Sha256::digest(passphrase.as_bytes()).into())
}

fn validity_bounds() -> Result<TimeBounds, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::Internal("system clock before Unix epoch".to_string()))?
        .as_secs();
    Ok(TimeBounds {
        min_time: TimePoint(0),
        max_time: TimePoint(now + VALIDITY_WINDOW_SECS),
    })
}

/// Build and sign a single-payment transaction, returning the base64 envelope
/// XDR ready for submission.
///
/// `sequence` must be the source account's current sequence plus one.
pub fn build_signed_envelope(
    signing_key: &SigningKey,
    source_account_id: &str,
    sequence: i64,
    spec: &PaymentSpec<'_>,
    network_passphrase: &str,
) -> Result<String, AppError> {
    let payment = PaymentOp {
        destination: xdr_muxed_account(spec.destination)?,
        asset: xdr_asset(spec.asset)?,
        amount: parse_amount(spec.amount)?,
    };
    let operation = Operation {
        source_account: None,
        body: OperationBody::Payment(payment),
    };
    let operations = vec![operation]
        .try_into()
        .map_err(|_| AppError::Ledger(LedgerError::Build("too many operations".to_string())))?;

    let tx = Transaction {
        source_account: xdr_muxed_account(source_account_id)?,
        fee: BASE_FEE_STROOPS,
        seq_num: SequenceNumber(sequence),
        cond: Preconditions::Time(validity_bounds()?),
        memo: Memo::None,
        operations,
        ext: TransactionExt::V0,
    };

    let payload = TransactionSignaturePayload {
        network_id: network_id(network_passphrase),
        tagged_transaction: TransactionSignaturePayloadTaggedTransaction::Tx(tx.clone()),
    };
    let payload_xdr = payload
        .to_xdr(Limits::none())
        .map_err(|e| AppError::Ledger(LedgerError::Signing(e.to_string())))?;
    let tx_hash: [u8; 32] = Sha256::digest(&payload_xdr).into();

    let signature = signing_key.sign(&tx_hash);
    let public = signing_key.verifying_key().to_bytes();
    // Hint is the last four bytes of the signer's public key
    let hint = SignatureHint([public[28], public[29], public[30], public[31]]);
    let decorated = DecoratedSignature {
        hint,
        signature: Signature(
            signature
                .to_bytes()
                .to_vec()
                .try_into()
                .map_err(|_| AppError::Ledger(LedgerError::Signing("bad signature length".to_string())))?,
        ),
    };
    let signatures = vec![decorated]
        .try_into()
        .map_err(|_| AppError::Ledger(LedgerError::Signing("too many signatures".to_string())))?;

    let envelope = TransactionEnvelope::Tx(TransactionV1Envelope { tx, signatures });
    envelope
        .to_xdr_base64(Limits::none())
        .map_err(|e| AppError::Ledger(LedgerError::Build(e.to_string())))
}
