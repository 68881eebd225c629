//! Plaintext payloads sealed into deep links.
//!
//! The transaction itself is opaque here: whatever built it hands us the
//! serialized bytes and we only base58 them. The canonical form is compact
//! JSON with a fixed field order (`transaction`, then `session`), so equal
//! payloads always produce byte-identical plaintext and ciphertexts differ
//! only through the nonce.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::base58;

/// Errors while turning payloads into bytes or back.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The `signTransaction` request body Phantom decrypts.
///
/// Field order is part of the wire format; do not reorder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// Base58 of the serialized, unsigned transaction.
    transaction: String,
    /// Session token returned by the wallet on connect.
    session: String,
}

impl TransactionPayload {
    pub fn transaction_base58(&self) -> &str {
        &self.transaction
    }

    pub fn session_id(&self) -> &str {
        &self.session
    }

    /// The exact bytes fed to encryption.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, PayloadError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse a payload back out of decrypted bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PayloadError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Pair a serialized transaction with the wallet session it belongs to.
///
/// No validation of the transaction bytes happens here.
pub fn build_transaction_payload(
    serialized_transaction: &[u8],
    session_id: &str,
) -> TransactionPayload {
    TransactionPayload {
        transaction: base58::encode(serialized_transaction),
        session: session_id.to_string(),
    }
}
