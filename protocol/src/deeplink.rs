//! # Deep-Link Builder
//!
//! Assembles the two Phantom universal links a dapp sends:
//!
//! ```text
//!   connect          https://phantom.app/ul/{v}/connect
//!                      ?app_url&dapp_encryption_public_key&redirect_link&cluster
//!
//!   signTransaction  https://phantom.app/ul/{v}/signTransaction
//!                      ?dapp_encryption_public_key&redirect_link&nonce&payload&cluster
//! ```
//!
//! The connect link carries nothing secret; the public key in it is the
//! dapp's half of the key exchange. The sign link carries the transaction
//! sealed under the shared key, with a fresh nonce per link.
//!
//! All query values go through the `url` crate's form encoder, so a redirect
//! like `mygame://transactionSigned` arrives as
//! `mygame%3A%2F%2FtransactionSigned` and no caller-supplied value can break
//! out of its parameter.
//!
//! The functions are stateless. A failure anywhere before the URL is
//! assembled returns the originating error and no link at all.

use tracing::debug;
use url::Url;

use crate::cluster::Cluster;
use crate::config::{
    DeepLinkConfig, CONNECTED_REDIRECT_PATH, CONNECT_METHOD, PARAM_APP_URL, PARAM_CLUSTER,
    PARAM_DAPP_PUBLIC_KEY, PARAM_NONCE, PARAM_PAYLOAD, PARAM_REDIRECT_LINK, PHANTOM_BASE_URL,
    SIGNED_REDIRECT_PATH, SIGN_TRANSACTION_METHOD,
};
use crate::crypto::base58;
use crate::crypto::encryption::{self, EncryptedEnvelope, Nonce};
use crate::crypto::key_exchange::{derive_shared_secret, ConnectionKeypair, SharedSecret};
use crate::error::{DeepLinkError, Result};
use crate::payload::{build_transaction_payload, TransactionPayload};
use crate::response::WalletSession;

/// `<scheme>://<path>`, the target Phantom opens when it is done.
fn redirect_target(redirect_scheme: &str, path: &str) -> String {
    format!("{redirect_scheme}://{path}")
}

/// `https://phantom.app/ul/<api_version>/<method>?<params>`
fn universal_link(api_version: &str, method: &str, params: &[(&str, &str)]) -> Result<String> {
    let mut url = Url::parse(PHANTOM_BASE_URL)?;
    url.path_segments_mut()
        .map_err(|_| DeepLinkError::InvalidBaseUrl(PHANTOM_BASE_URL.to_string()))?
        .push(api_version)
        .push(method);
    url.query_pairs_mut().extend_pairs(params.iter().copied());
    Ok(url.into())
}

/// Build the connect (login) link.
///
/// # Example
///
/// ```
/// use phantom_deeplink::{build_login_link, Cluster};
///
/// let link = build_login_link("myapp", "https://example.com", "v1", "Pubkey123", Cluster::DevNet)
///     .unwrap();
/// assert!(link.starts_with("https://phantom.app/ul/v1/connect?"));
/// assert!(link.contains("cluster=devnet"));
/// ```
pub fn build_login_link(
    redirect_scheme: &str,
    metadata_url: &str,
    api_version: &str,
    connection_public_key: &str,
    cluster: Cluster,
) -> Result<String> {
    let redirect = redirect_target(redirect_scheme, CONNECTED_REDIRECT_PATH);

    let link = universal_link(
        api_version,
        CONNECT_METHOD,
        &[
            (PARAM_APP_URL, metadata_url),
            (PARAM_DAPP_PUBLIC_KEY, connection_public_key),
            (PARAM_REDIRECT_LINK, redirect.as_str()),
            (PARAM_CLUSTER, cluster.as_str()),
        ],
    )?;

    debug!(method = CONNECT_METHOD, %cluster, %redirect, "built phantom deep link");
    Ok(link)
}

/// Build the `signTransaction` link with the transaction sealed inside.
///
/// Steps, each aborting the whole call on failure:
///
/// 1. wrap transaction + session into the canonical payload,
/// 2. draw a fresh 24-byte nonce,
/// 3. derive the shared key from our private key and the wallet's
///    encryption public key,
/// 4. encrypt the payload,
/// 5. base58 the ciphertext and nonce,
/// 6. assemble the URL.
///
/// The shared key is dropped (and zeroized) before this returns and never
/// appears in the link.
#[allow(clippy::too_many_arguments)]
pub fn build_sign_transaction_link(
    serialized_transaction: &[u8],
    remote_encryption_public_key: &[u8],
    local_connection_private_key: &[u8],
    session_id: &str,
    redirect_scheme: &str,
    api_version: &str,
    connection_public_key: &str,
    cluster: Cluster,
) -> Result<String> {
    let payload = build_transaction_payload(serialized_transaction, session_id);
    let plaintext = payload.to_canonical_bytes()?;

    let nonce = Nonce::generate()?;
    let shared_secret =
        derive_shared_secret(local_connection_private_key, remote_encryption_public_key)?;
    let ciphertext_with_tag =
        encryption::encrypt(&plaintext, shared_secret.as_bytes(), nonce.as_bytes())?;
    drop(shared_secret);

    let envelope = EncryptedEnvelope {
        ciphertext_with_tag,
        nonce,
    };
    let (nonce_b58, payload_b58) = envelope.to_base58();
    let redirect = redirect_target(redirect_scheme, SIGNED_REDIRECT_PATH);

    let link = universal_link(
        api_version,
        SIGN_TRANSACTION_METHOD,
        &[
            (PARAM_DAPP_PUBLIC_KEY, connection_public_key),
            (PARAM_REDIRECT_LINK, redirect.as_str()),
            (PARAM_NONCE, nonce_b58.as_str()),
            (PARAM_PAYLOAD, payload_b58.as_str()),
            (PARAM_CLUSTER, cluster.as_str()),
        ],
    )?;

    debug!(
        method = SIGN_TRANSACTION_METHOD,
        %cluster,
        %redirect,
        transaction_len = serialized_transaction.len(),
        sealed_len = envelope.ciphertext_with_tag.len(),
        "built phantom deep link"
    );
    Ok(link)
}

/// Recover the payload from a `signTransaction` link.
///
/// This is the wallet's half of the exchange. Dapps use it to check what a
/// link will ask the wallet to sign; tests use it to prove the round trip.
pub fn open_sign_transaction_link(link: &str, key: &SharedSecret) -> Result<TransactionPayload> {
    let url = Url::parse(link)?;
    let mut nonce = None;
    let mut payload = None;
    for (name, value) in url.query_pairs() {
        match &*name {
            PARAM_NONCE => nonce = Some(value.into_owned()),
            PARAM_PAYLOAD => payload = Some(value.into_owned()),
            _ => {}
        }
    }
    let nonce = nonce.ok_or(DeepLinkError::MissingParameter(PARAM_NONCE))?;
    let payload = payload.ok_or(DeepLinkError::MissingParameter(PARAM_PAYLOAD))?;

    let envelope = EncryptedEnvelope::from_base58(&nonce, &payload)?;
    let plaintext = encryption::open(&envelope, key)?;
    Ok(TransactionPayload::from_bytes(&plaintext)?)
}

/// Links for one dapp, with the per-dapp settings bound once.
#[derive(Clone, Debug)]
pub struct DeepLinkBuilder {
    config: DeepLinkConfig,
}

impl DeepLinkBuilder {
    pub fn new(config: DeepLinkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeepLinkConfig {
        &self.config
    }

    /// Connect link advertising `keypair`'s public key.
    pub fn login_link(&self, keypair: &ConnectionKeypair) -> Result<String> {
        build_login_link(
            &self.config.redirect_scheme,
            &self.config.app_url,
            &self.config.api_version,
            &keypair.public_key_base58(),
            self.config.cluster,
        )
    }

    /// Sign link for `serialized_transaction` within an established session.
    pub fn sign_transaction_link(
        &self,
        serialized_transaction: &[u8],
        session: &WalletSession,
        keypair: &ConnectionKeypair,
    ) -> Result<String> {
        let mut secret_bytes = keypair.secret_key_bytes();
        let link = build_sign_transaction_link(
            serialized_transaction,
            &session.phantom_encryption_public_key,
            &secret_bytes,
            &session.session,
            &self.config.redirect_scheme,
            &self.config.api_version,
            &keypair.public_key_base58(),
            self.config.cluster,
        );
        zeroize::Zeroize::zeroize(&mut secret_bytes);
        link
    }
}

/// Convenience for callers holding only the base58 forms Phantom hands out.
pub fn decode_public_key(encoded: &str) -> Result<[u8; 32]> {
    Ok(base58::decode_array(encoded)?)
}
