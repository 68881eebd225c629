//! Error types for deep-link construction and wallet response handling.
//!
//! Every operation that builds a link or reads a wallet redirect returns a
//! [`DeepLinkError`]. The lower-level module errors convert into it with
//! `?`, so the variant tells you which step failed and the source carries
//! the detail. Nothing here is retried: a cryptographic failure means the
//! protocol was violated, not that the network hiccuped.

use thiserror::Error;

use crate::crypto::{CipherError, CodecError, KeyExchangeError};
use crate::payload::PayloadError;

/// Errors that can occur while building deep links or parsing responses.
#[derive(Debug, Error)]
pub enum DeepLinkError {
    /// Base58 input outside the alphabet or of the wrong length.
    #[error("encoding error: {0}")]
    Codec(#[from] CodecError),

    /// Malformed key material for the X25519 step.
    #[error("key exchange error: {0}")]
    KeyExchange(#[from] KeyExchangeError),

    /// Encryption, decryption, or nonce generation failed.
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// The payload could not be serialized or parsed.
    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    /// A URL could not be assembled or parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot take path segments.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    /// A wallet redirect lacked a parameter the protocol requires.
    #[error("missing parameter in wallet response: {0}")]
    MissingParameter(&'static str),

    /// Decrypted wallet data was not the JSON shape we expected.
    #[error("unexpected wallet response data: {0}")]
    InvalidResponse(#[source] serde_json::Error),
}

impl DeepLinkError {
    /// True when the failure came from a Poly1305 tag mismatch, i.e. the
    /// data was tampered with or sealed under a different key or nonce.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, DeepLinkError::Cipher(CipherError::AuthenticationFailed))
    }
}

/// Convenience alias used throughout the link and response modules.
pub type Result<T> = std::result::Result<T, DeepLinkError>;
