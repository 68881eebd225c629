//! # Wallet Responses
//!
//! Phantom answers every request by opening the dapp's redirect link with
//! query parameters attached:
//!
//! ```text
//!   connect   <scheme>://onPhantomConnected
//!               ?phantom_encryption_public_key=<b58>&nonce=<b58>&data=<b58>
//!
//!   sign      <scheme>://transactionSigned
//!               ?nonce=<b58>&data=<b58>
//!
//!   error     <scheme>://...?errorCode=<code>&errorMessage=<text>
//! ```
//!
//! `data` is sealed with the same `nacl.box` key the dapp uses for its own
//! payloads, so reading a response is [`crate::crypto::encryption::open`]
//! run in the other direction. A tag mismatch here means the redirect was
//! forged or corrupted, and is logged and surfaced, never ignored.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::{
    KEY_LENGTH, PARAM_DATA, PARAM_ERROR_CODE, PARAM_ERROR_MESSAGE, PARAM_NONCE,
    PARAM_PHANTOM_PUBLIC_KEY,
};
use crate::crypto::base58;
use crate::crypto::encryption::{self, EncryptedEnvelope};
use crate::crypto::key_exchange::{ConnectionKeypair, KeyExchangeError, SharedSecret};
use crate::error::{DeepLinkError, Result};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// What the dapp keeps after a successful connect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletSession {
    /// Phantom's X25519 public key for this connection.
    pub phantom_encryption_public_key: [u8; KEY_LENGTH],
    /// The user's wallet address (base58).
    pub public_key: String,
    /// Opaque session token to echo back in every payload.
    pub session: String,
}

impl WalletSession {
    pub fn phantom_encryption_public_key_base58(&self) -> String {
        base58::encode(self.phantom_encryption_public_key)
    }

    /// Shared key for this session, needed to read sign responses.
    pub fn shared_secret(
        &self,
        keypair: &ConnectionKeypair,
    ) -> std::result::Result<SharedSecret, KeyExchangeError> {
        keypair.shared_secret_with(&self.phantom_encryption_public_key)
    }
}

/// Outcome of a connect request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectResult {
    Success(WalletSession),
    Error { code: String, message: String },
}

/// Outcome of a signing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignResult {
    /// The wallet signed and returned the transaction (base58).
    Signed { transaction: String },
    /// The wallet signed and submitted; only the signature comes back.
    Sent { signature: String },
    Error { code: String, message: String },
}

/// Decrypted body of a successful connect redirect.
#[derive(Debug, Deserialize)]
struct ConnectData {
    public_key: String,
    session: String,
}

/// Decrypted body of a successful sign redirect.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignData {
    Signed { transaction: String },
    Sent { signature: String },
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn query_params(redirect_url: &str) -> Result<HashMap<String, String>> {
    let url = Url::parse(redirect_url)?;
    Ok(url.query_pairs().into_owned().collect())
}

fn required<'a>(params: &'a HashMap<String, String>, name: &'static str) -> Result<&'a str> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or(DeepLinkError::MissingParameter(name))
}

/// `(code, message)` if the wallet reported an error.
fn wallet_error(params: &HashMap<String, String>) -> Option<(String, String)> {
    let code = params.get(PARAM_ERROR_CODE)?;
    let message = params.get(PARAM_ERROR_MESSAGE).cloned().unwrap_or_default();
    Some((code.clone(), message))
}

fn open_data(params: &HashMap<String, String>, key: &SharedSecret) -> Result<Vec<u8>> {
    let envelope =
        EncryptedEnvelope::from_base58(required(params, PARAM_NONCE)?, required(params, PARAM_DATA)?)?;
    encryption::open(&envelope, key).map_err(|err| {
        warn!(error = %err, "wallet response failed authentication");
        DeepLinkError::from(err)
    })
}

/// Read the redirect Phantom opens after a connect request.
///
/// On success the returned [`WalletSession`] holds everything needed to
/// build sign links for this connection.
pub fn parse_connect_response(
    redirect_url: &str,
    keypair: &ConnectionKeypair,
) -> Result<ConnectResult> {
    let params = query_params(redirect_url)?;
    if let Some((code, message)) = wallet_error(&params) {
        debug!(%code, "wallet rejected connect request");
        return Ok(ConnectResult::Error { code, message });
    }

    let phantom_key: [u8; KEY_LENGTH] =
        base58::decode_array(required(&params, PARAM_PHANTOM_PUBLIC_KEY)?)?;
    let shared_secret = keypair.shared_secret_with(&phantom_key)?;
    let plaintext = open_data(&params, &shared_secret)?;
    let data: ConnectData =
        serde_json::from_slice(&plaintext).map_err(DeepLinkError::InvalidResponse)?;

    debug!(wallet = %data.public_key, "wallet connected");
    Ok(ConnectResult::Success(WalletSession {
        phantom_encryption_public_key: phantom_key,
        public_key: data.public_key,
        session: data.session,
    }))
}

/// Read the redirect Phantom opens after a signing request.
pub fn parse_sign_response(redirect_url: &str, shared_secret: &SharedSecret) -> Result<SignResult> {
    let params = query_params(redirect_url)?;
    if let Some((code, message)) = wallet_error(&params) {
        debug!(%code, "wallet rejected signing request");
        return Ok(SignResult::Error { code, message });
    }

    let plaintext = open_data(&params, shared_secret)?;
    let data: SignData =
        serde_json::from_slice(&plaintext).map_err(DeepLinkError::InvalidResponse)?;

    Ok(match data {
        SignData::Signed { transaction } => SignResult::Signed { transaction },
        SignData::Sent { signature } => SignResult::Sent { signature },
    })
}
