//! # Base58 Codec
//!
//! Every binary value that crosses the deep-link boundary (keys, nonces,
//! ciphertexts, transactions) is base58-encoded with the Bitcoin alphabet,
//! which is also what Solana uses for addresses. No padding, no checksum.
//!
//! Leading zero bytes map one-to-one to leading `'1'` characters, so the
//! encoding is lossless even for all-zero inputs. The alphabet leaves out
//! `0`, `O`, `I` and `l`; seeing one of those in a wallet redirect means the
//! value was mangled somewhere along the way.

use thiserror::Error;

/// Errors produced while decoding base58 text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A character outside the 58-symbol alphabet was found.
    #[error("invalid base58 encoding: unexpected character at index {index}")]
    InvalidEncoding {
        /// Byte offset of the offending character.
        index: usize,
    },

    /// Decoding succeeded but produced the wrong number of bytes.
    #[error("invalid decoded length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Length the caller asked for.
        expected: usize,
        /// Length actually decoded.
        actual: usize,
    },
}

impl From<bs58::decode::Error> for CodecError {
    fn from(err: bs58::decode::Error) -> Self {
        let index = match err {
            bs58::decode::Error::InvalidCharacter { index, .. } => index,
            bs58::decode::Error::NonAsciiCharacter { index } => index,
            _ => 0,
        };
        CodecError::InvalidEncoding { index }
    }
}

/// Encode bytes as base58. Empty input encodes to the empty string.
///
/// # Example
///
/// ```
/// use phantom_deeplink::crypto::base58;
///
/// assert_eq!(base58::encode([0u8, 0, 1]), "112");
/// assert_eq!(base58::encode(b"hello world"), "StV1DL6CwTryKyV");
/// ```
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode base58 text back into bytes.
///
/// Exact inverse of [`encode`]. Fails with [`CodecError::InvalidEncoding`]
/// when any character falls outside the alphabet.
pub fn decode(encoded: &str) -> Result<Vec<u8>, CodecError> {
    Ok(bs58::decode(encoded).into_vec()?)
}

/// Decode base58 text into a fixed-size array.
///
/// Used for keys and nonces, where a wrong length is as bad as a wrong
/// character.
pub fn decode_array<const N: usize>(encoded: &str) -> Result<[u8; N], CodecError> {
    let bytes = decode(encoded)?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| CodecError::InvalidLength {
        expected: N,
        actual,
    })
}
