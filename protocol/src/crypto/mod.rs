//! # Cryptographic Primitives for Phantom Deep Links
//!
//! Everything that touches key material or ciphertext lives here:
//!
//! - **X25519** for key exchange, with NaCl's HSalsa20 precomputation.
//! - **XSalsa20-Poly1305** (NaCl `secretbox`) for authenticated encryption.
//! - **Base58** for getting bytes in and out of URLs.
//!
//! Together the first two are exactly `nacl.box`, which is what Phantom
//! runs on the other side. Nothing here is novel; each function is a thin,
//! type-checked wrapper around an audited implementation.

pub mod base58;
pub mod encryption;
pub mod key_exchange;

pub use base58::CodecError;
pub use encryption::{decrypt, encrypt, open, seal, CipherError, EncryptedEnvelope, Nonce};
pub use key_exchange::{derive_shared_secret, ConnectionKeypair, KeyExchangeError, SharedSecret};
