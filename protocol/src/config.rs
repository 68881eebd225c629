//! # Protocol Configuration & Constants
//!
//! Every magic number the deep-link protocol depends on lives here. The
//! lengths are fixed by NaCl's `box` construction and the URL shapes are
//! fixed by Phantom's universal-link API; changing any of them breaks
//! interoperability with the wallet, not just our tests.

use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;

// ---------------------------------------------------------------------------
// Phantom Universal Links
// ---------------------------------------------------------------------------

/// Base of every Phantom universal link. The API version and method are
/// appended as path segments.
pub const PHANTOM_BASE_URL: &str = "https://phantom.app/ul";

/// API version used when the caller does not pick one.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Method path for the connect (login) request.
pub const CONNECT_METHOD: &str = "connect";

/// Method path for the transaction-signing request.
pub const SIGN_TRANSACTION_METHOD: &str = "signTransaction";

/// Redirect path the wallet opens after a connect request.
pub const CONNECTED_REDIRECT_PATH: &str = "onPhantomConnected";

/// Redirect path the wallet opens after a signing request.
pub const SIGNED_REDIRECT_PATH: &str = "transactionSigned";

// ---------------------------------------------------------------------------
// Query Parameter Names
// ---------------------------------------------------------------------------

pub const PARAM_APP_URL: &str = "app_url";
pub const PARAM_DAPP_PUBLIC_KEY: &str = "dapp_encryption_public_key";
pub const PARAM_REDIRECT_LINK: &str = "redirect_link";
pub const PARAM_CLUSTER: &str = "cluster";
pub const PARAM_NONCE: &str = "nonce";
pub const PARAM_PAYLOAD: &str = "payload";

/// Parameters the wallet sends back on its redirect.
pub const PARAM_PHANTOM_PUBLIC_KEY: &str = "phantom_encryption_public_key";
pub const PARAM_DATA: &str = "data";
pub const PARAM_ERROR_CODE: &str = "errorCode";
pub const PARAM_ERROR_MESSAGE: &str = "errorMessage";

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// X25519 for the Diffie-Hellman step. Montgomery form of Curve25519.
pub const KEY_EXCHANGE_ALGORITHM: &str = "X25519";

/// XSalsa20-Poly1305, i.e. NaCl `secretbox`. This is what `nacl.box`
/// runs after its key precomputation, and what Phantom speaks.
pub const SYMMETRIC_ALGORITHM: &str = "XSalsa20-Poly1305";

/// X25519 scalar and point length in bytes.
pub const KEY_LENGTH: usize = 32;

/// Shared-secret length in bytes (an XSalsa20 key).
pub const SHARED_SECRET_LENGTH: usize = 32;

/// XSalsa20 nonce length. 192 bits is large enough that random nonces
/// never collide in practice, which is the only reason random nonces are
/// acceptable here at all.
pub const NONCE_LENGTH: usize = 24;

/// Poly1305 authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

/// Dapp-level settings that stay fixed across every link a dapp produces.
///
/// Loaded by the CLI from flags/environment; library users can build it
/// directly or deserialize it from whatever config format they already use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepLinkConfig {
    /// URL scheme registered by the app for deep links (e.g. `mygame`).
    pub redirect_scheme: String,
    /// Metadata URL Phantom fetches to render the app's name and icon.
    pub app_url: String,
    /// Phantom universal-link API version.
    pub api_version: String,
    /// Solana cluster the wallet should use.
    pub cluster: Cluster,
}

impl Default for DeepLinkConfig {
    fn default() -> Self {
        Self {
            redirect_scheme: String::new(),
            app_url: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            cluster: Cluster::default(),
        }
    }
}

impl DeepLinkConfig {
    /// Creates a config for the given scheme and metadata URL with the
    /// default API version and mainnet.
    pub fn new(redirect_scheme: impl Into<String>, app_url: impl Into<String>) -> Self {
        Self {
            redirect_scheme: redirect_scheme.into(),
            app_url: app_url.into(),
            ..Self::default()
        }
    }

    /// Builder-style cluster override.
    pub fn with_cluster(mut self, cluster: Cluster) -> Self {
        self.cluster = cluster;
        self
    }

    /// Builder-style API version override.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }
}
