// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Phantom Deep Links: Core Library
//!
//! Builds and reads the deep links a dapp exchanges with the Phantom wallet
//! when no browser extension is available: a game, a native app, anything
//! that can only open URLs and receive redirects.
//!
//! The protocol is `nacl.box` carried over query strings:
//!
//! 1. The dapp makes an ephemeral X25519 keypair and sends a **connect**
//!    link with its public key.
//! 2. Phantom redirects back with its own public key and a sealed session.
//! 3. Each **signTransaction** link carries the transaction sealed with
//!    XSalsa20-Poly1305 under the shared key and a fresh 24-byte nonce.
//! 4. Phantom redirects back with the signed transaction, sealed the same way.
//!
//! ## Architecture
//!
//! - **crypto**: base58, X25519 key exchange, XSalsa20-Poly1305.
//! - **payload**: the canonical plaintext sealed into sign links.
//! - **deeplink**: connect and signTransaction URL assembly.
//! - **response**: decoding wallet redirects into typed results.
//! - **cluster**: Solana cluster names.
//! - **config**: protocol constants and per-dapp settings.
//!
//! Everything is synchronous and stateless. The only shared resource is the
//! OS random number generator, which is thread-safe, so any function here
//! can be called from any thread.

pub mod cluster;
pub mod config;
pub mod crypto;
pub mod deeplink;
pub mod error;
pub mod payload;
pub mod response;

#[cfg(test)]
mod proptests;

pub use cluster::Cluster;
pub use config::DeepLinkConfig;
pub use crypto::{derive_shared_secret, ConnectionKeypair, SharedSecret};
pub use deeplink::{
    build_login_link, build_sign_transaction_link, open_sign_transaction_link, DeepLinkBuilder,
};
pub use error::DeepLinkError;
pub use payload::{build_transaction_payload, TransactionPayload};
pub use response::{parse_connect_response, parse_sign_response, ConnectResult, SignResult, WalletSession};
