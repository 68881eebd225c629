//! # XSalsa20-Poly1305 Encryption
//!
//! Authenticated encryption for deep-link payloads. This is NaCl's
//! `secretbox`, the second half of `nacl.box`, which is what the wallet runs
//! on its side.
//!
//! ## Nonce management
//!
//! A nonce must never be used twice under the same key. Reuse leaks the XOR
//! of the two plaintexts and lets an attacker forge Poly1305 tags. The
//! strategy here is 24 random bytes per message from the OS CSPRNG: at 192
//! bits the birthday bound is out of reach for any realistic session, which
//! is exactly why XSalsa20 exists. [`Nonce::generate`] is the only way this
//! crate produces nonces, and every [`seal`] call generates a new one.
//!
//! ## Wire format
//!
//! [`encrypt`] returns `tag || ciphertext`: the 16-byte Poly1305 tag followed
//! by a ciphertext of the same length as the plaintext. That is NaCl's box
//! layout and what Phantom expects in the `payload`/`data` parameters. The
//! nonce travels separately in its own URL parameter.

use crypto_secretbox::aead::consts::U24;
use crypto_secretbox::aead::generic_array::GenericArray;
use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::XSalsa20Poly1305;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::config::{NONCE_LENGTH, SHARED_SECRET_LENGTH, TAG_LENGTH};
use crate::crypto::base58::{self, CodecError};
use crate::crypto::key_exchange::SharedSecret;

/// Errors that can occur during encryption/decryption.
///
/// Authentication failures are deliberately indistinguishable: a wrong key,
/// a wrong nonce and a tampered ciphertext all look the same to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("invalid {parameter} length: expected {expected} bytes, got {actual}")]
    InvalidParameterLength {
        /// `"key"` or `"nonce"`.
        parameter: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("encryption failed")]
    EncryptFailed,

    #[error("random source failure: {0}")]
    RandomSource(String),

    #[error("invalid envelope encoding: {0}")]
    InvalidEncoding(#[from] CodecError),
}

// ---------------------------------------------------------------------------
// Nonce
// ---------------------------------------------------------------------------

/// A 24-byte XSalsa20 nonce.
///
/// Not `Copy`: handing the same nonce to two encryptions should at least
/// require an explicit `clone()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LENGTH]);

impl Nonce {
    /// Draw a fresh nonce from the OS CSPRNG.
    ///
    /// RNG failure is returned, never papered over with a weaker source.
    pub fn generate() -> Result<Self, CipherError> {
        let mut bytes = [0u8; NONCE_LENGTH];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CipherError::RandomSource(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Wraps bytes received from a peer (e.g. the `nonce` parameter of a
    /// wallet redirect).
    pub fn from_bytes(bytes: [u8; NONCE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, CipherError> {
        let bytes = slice
            .try_into()
            .map_err(|_| CipherError::InvalidParameterLength {
                parameter: "nonce",
                expected: NONCE_LENGTH,
                actual: slice.len(),
            })?;
        Ok(Self(bytes))
    }

    pub fn from_base58(encoded: &str) -> Result<Self, CipherError> {
        Self::from_slice(&base58::decode(encoded)?)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LENGTH] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        base58::encode(self.0)
    }
}

// ---------------------------------------------------------------------------
// Raw encrypt / decrypt
// ---------------------------------------------------------------------------

fn cipher_for(key: &[u8]) -> Result<XSalsa20Poly1305, CipherError> {
    if key.len() != SHARED_SECRET_LENGTH {
        return Err(CipherError::InvalidParameterLength {
            parameter: "key",
            expected: SHARED_SECRET_LENGTH,
            actual: key.len(),
        });
    }
    XSalsa20Poly1305::new_from_slice(key).map_err(|_| CipherError::InvalidParameterLength {
        parameter: "key",
        expected: SHARED_SECRET_LENGTH,
        actual: key.len(),
    })
}

fn check_nonce(nonce: &[u8]) -> Result<&GenericArray<u8, U24>, CipherError> {
    if nonce.len() != NONCE_LENGTH {
        return Err(CipherError::InvalidParameterLength {
            parameter: "nonce",
            expected: NONCE_LENGTH,
            actual: nonce.len(),
        });
    }
    Ok(GenericArray::from_slice(nonce))
}

/// Encrypt `plaintext` under a 32-byte key and a 24-byte nonce.
///
/// Output is `plaintext.len() + 16` bytes. Deterministic: the same inputs
/// always give the same output, so the caller owns nonce uniqueness. Prefer
/// [`seal`], which generates the nonce for you.
///
/// # Example
///
/// ```
/// use phantom_deeplink::crypto::encryption::{decrypt, encrypt};
///
/// let key = [0x42u8; 32];
/// let nonce = [0x24u8; 24];
///
/// let sealed = encrypt(b"opaque payload", &key, &nonce).unwrap();
/// assert_eq!(sealed.len(), b"opaque payload".len() + 16);
/// assert_eq!(decrypt(&sealed, &key, &nonce).unwrap(), b"opaque payload");
/// ```
pub fn encrypt(plaintext: &[u8], key: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = cipher_for(key)?;
    let nonce = check_nonce(nonce)?;
    cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CipherError::EncryptFailed)
}

/// Decrypt `tag || ciphertext` produced by [`encrypt`].
///
/// The tag is verified before anything is decrypted; on failure no
/// plaintext, partial or otherwise, leaves this function.
///
/// # Errors
///
/// [`CipherError::AuthenticationFailed`] if the key or nonce is wrong, any
/// byte was modified, or the input is shorter than a tag.
pub fn decrypt(ciphertext_with_tag: &[u8], key: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = cipher_for(key)?;
    let nonce = check_nonce(nonce)?;
    if ciphertext_with_tag.len() < TAG_LENGTH {
        return Err(CipherError::AuthenticationFailed);
    }
    cipher
        .decrypt(nonce, ciphertext_with_tag)
        .map_err(|_| CipherError::AuthenticationFailed)
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Ciphertext plus the nonce it was sealed under. Meaningless apart, so
/// they only ever move together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    pub ciphertext_with_tag: Vec<u8>,
    pub nonce: Nonce,
}

impl EncryptedEnvelope {
    /// Base58 `(nonce, payload)` pair, ready for URL parameters.
    pub fn to_base58(&self) -> (String, String) {
        (self.nonce.to_base58(), base58::encode(&self.ciphertext_with_tag))
    }

    /// Parse the base58 `nonce` and payload parameters of a redirect.
    pub fn from_base58(nonce: &str, payload: &str) -> Result<Self, CipherError> {
        Ok(Self {
            nonce: Nonce::from_base58(nonce)?,
            ciphertext_with_tag: base58::decode(payload)?,
        })
    }
}

/// Encrypt under a freshly generated nonce.
pub fn seal(plaintext: &[u8], key: &SharedSecret) -> Result<EncryptedEnvelope, CipherError> {
    let nonce = Nonce::generate()?;
    let ciphertext_with_tag = encrypt(plaintext, key.as_bytes(), nonce.as_bytes())?;
    Ok(EncryptedEnvelope {
        ciphertext_with_tag,
        nonce,
    })
}

/// Decrypt an envelope produced by [`seal`] (ours or the wallet's).
pub fn open(envelope: &EncryptedEnvelope, key: &SharedSecret) -> Result<Vec<u8>, CipherError> {
    decrypt(
        &envelope.ciphertext_with_tag,
        key.as_bytes(),
        envelope.nonce.as_bytes(),
    )
}
