//! # X25519 Key Exchange
//!
//! Derives the symmetric key shared between the dapp and the wallet.
//!
//! The dapp generates an ephemeral X25519 keypair and hands its public half to
//! Phantom in the connect link. Phantom answers with its own encryption public
//! key. From then on both sides can compute the same 32-byte key without it
//! ever crossing the wire.
//!
//! ## Key derivation
//!
//! Phantom uses `nacl.box`, so we follow NaCl's `crypto_box_beforenm`
//! exactly: the raw X25519 output is run through HSalsa20 with an all-zero
//! 16-byte input. The raw DH point is never used as a key. It has algebraic
//! structure, and skipping the HSalsa20 step also produces keys the wallet
//! cannot decrypt with.
//!
//! ## Security considerations
//!
//! - Secret scalars and derived keys are zeroized on drop.
//! - `Debug` output never includes secret bytes.
//! - An all-zero DH result (the remote point had small order) is rejected.

use std::fmt;

use rand::rngs::OsRng;
use salsa20::cipher::consts::U10;
use salsa20::cipher::generic_array::GenericArray;
use subtle::{Choice, ConstantTimeEq};
use thiserror::Error;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{KEY_LENGTH, SHARED_SECRET_LENGTH};
use crate::crypto::base58::{self, CodecError};

/// Errors in the key exchange.
///
/// Messages describe lengths and encodings only; they never echo key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyExchangeError {
    #[error("invalid {role} key length: expected {KEY_LENGTH} bytes, got {actual}")]
    InvalidKeyLength {
        /// Which input was malformed (`"private"` or `"public"`).
        role: &'static str,
        /// Length actually supplied.
        actual: usize,
    },

    #[error("key exchange produced an all-zero secret: remote public key has small order")]
    NonContributory,

    #[error("invalid key encoding: {0}")]
    InvalidEncoding(#[from] CodecError),
}

// ---------------------------------------------------------------------------
// SharedSecret
// ---------------------------------------------------------------------------

/// The symmetric key derived from a completed key exchange.
///
/// Lives only as long as the encrypt/decrypt call that needs it. Not
/// `Serialize`, not `Display`, zeroized on drop. Equality is constant-time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: [u8; SHARED_SECRET_LENGTH],
}

impl SharedSecret {
    /// Wraps raw key bytes, e.g. a key precomputed elsewhere.
    pub fn from_bytes(bytes: [u8; SHARED_SECRET_LENGTH]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_LENGTH] {
        &self.bytes
    }
}

impl ConstantTimeEq for SharedSecret {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.bytes[..].ct_eq(&other.bytes[..])
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SharedSecret {}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Derive the shared key from our private scalar and the peer's public point.
///
/// Both inputs must be exactly 32 bytes. The result is symmetric:
/// `derive_shared_secret(a_priv, b_pub) == derive_shared_secret(b_priv, a_pub)`.
///
/// # Example
///
/// ```
/// use phantom_deeplink::crypto::key_exchange::{derive_shared_secret, ConnectionKeypair};
///
/// let dapp = ConnectionKeypair::generate();
/// let wallet = ConnectionKeypair::generate();
///
/// let ours = derive_shared_secret(&dapp.secret_key_bytes(), &wallet.public_key_bytes()).unwrap();
/// let theirs = derive_shared_secret(&wallet.secret_key_bytes(), &dapp.public_key_bytes()).unwrap();
/// assert_eq!(ours, theirs);
/// ```
pub fn derive_shared_secret(
    local_private_key: &[u8],
    remote_public_key: &[u8],
) -> Result<SharedSecret, KeyExchangeError> {
    let mut secret_bytes: [u8; KEY_LENGTH] =
        local_private_key
            .try_into()
            .map_err(|_| KeyExchangeError::InvalidKeyLength {
                role: "private",
                actual: local_private_key.len(),
            })?;
    let public_bytes: [u8; KEY_LENGTH] =
        remote_public_key
            .try_into()
            .map_err(|_| KeyExchangeError::InvalidKeyLength {
                role: "public",
                actual: remote_public_key.len(),
            })?;

    let secret = StaticSecret::from(secret_bytes);
    secret_bytes.zeroize();

    let dh = secret.diffie_hellman(&PublicKey::from(public_bytes));
    if !dh.was_contributory() {
        return Err(KeyExchangeError::NonContributory);
    }

    Ok(nacl_precompute(dh.as_bytes()))
}

/// NaCl `crypto_box_beforenm` key step: HSalsa20(dh, 0^16).
fn nacl_precompute(dh: &[u8; KEY_LENGTH]) -> SharedSecret {
    let mut key = salsa20::hsalsa::<U10>(salsa20::Key::from_slice(dh), &GenericArray::default());

    let mut bytes = [0u8; SHARED_SECRET_LENGTH];
    bytes.copy_from_slice(&key);
    key.as_mut_slice().zeroize();

    SharedSecret { bytes }
}

// ---------------------------------------------------------------------------
// ConnectionKeypair
// ---------------------------------------------------------------------------

/// The dapp's X25519 keypair for one wallet connection.
///
/// The public half goes into every deep link as
/// `dapp_encryption_public_key`; the secret half never leaves this struct
/// except through the explicit export methods.
#[derive(Clone)]
pub struct ConnectionKeypair {
    secret: StaticSecret,
    public: PublicKey,
}

impl ConnectionKeypair {
    /// Generate a fresh keypair from the OS CSPRNG.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Rebuild a keypair from stored secret bytes. The public key is
    /// re-derived, so the pair is always consistent.
    pub fn from_secret_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        let secret = StaticSecret::from(bytes);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Rebuild a keypair from a base58-encoded secret key.
    pub fn from_base58(encoded: &str) -> Result<Self, KeyExchangeError> {
        let mut bytes = base58::decode(encoded)?;
        let result = match <[u8; KEY_LENGTH]>::try_from(bytes.as_slice()) {
            Ok(arr) => Ok(Self::from_secret_bytes(arr)),
            Err(_) => Err(KeyExchangeError::InvalidKeyLength {
                role: "private",
                actual: bytes.len(),
            }),
        };
        bytes.zeroize();
        result
    }

    pub fn public_key_bytes(&self) -> [u8; KEY_LENGTH] {
        self.public.to_bytes()
    }

    /// The public key as it appears in deep links.
    pub fn public_key_base58(&self) -> String {
        base58::encode(self.public.as_bytes())
    }

    /// Export the raw secret scalar. Handle with care; this is everything
    /// an attacker needs to read the session's payloads.
    pub fn secret_key_bytes(&self) -> [u8; KEY_LENGTH] {
        self.secret.to_bytes()
    }

    /// Export the secret scalar as base58, for storing between app launches.
    pub fn secret_key_base58(&self) -> String {
        let mut bytes = self.secret.to_bytes();
        let encoded = base58::encode(bytes);
        bytes.zeroize();
        encoded
    }

    /// Derive the shared key with a peer's public key.
    pub fn shared_secret_with(
        &self,
        remote_public_key: &[u8],
    ) -> Result<SharedSecret, KeyExchangeError> {
        let mut secret_bytes = self.secret.to_bytes();
        let result = derive_shared_secret(&secret_bytes, remote_public_key);
        secret_bytes.zeroize();
        result
    }
}

impl fmt::Debug for ConnectionKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionKeypair(pub={})", self.public_key_base58())
    }
}

impl PartialEq for ConnectionKeypair {
    /// Compared by public key; secret material is not compared directly.
    fn eq(&self, other: &Self) -> bool {
        self.public.as_bytes() == other.public.as_bytes()
    }
}

impl Eq for ConnectionKeypair {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_secret_is_commutative() {
        for _ in 0..16 {
            let a = ConnectionKeypair::generate();
            let b = ConnectionKeypair::generate();
            let ab = derive_shared_secret(&a.secret_key_bytes(), &b.public_key_bytes()).unwrap();
            let ba = derive_shared_secret(&b.secret_key_bytes(), &a.public_key_bytes()).unwrap();
            assert_eq!(ab, ba);
        }
    }

    #[test]
    fn test_shared_secret_is_deterministic() {
        let a = ConnectionKeypair::from_secret_bytes([1u8; 32]);
        let b = ConnectionKeypair::from_secret_bytes([2u8; 32]);
        let first = a.shared_secret_with(&b.public_key_bytes()).unwrap();
        let second = a.shared_secret_with(&b.public_key_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_peers_give_different_secrets() {
        let a = ConnectionKeypair::generate();
        let b = ConnectionKeypair::generate();
        let c = ConnectionKeypair::generate();
        let ab = a.shared_secret_with(&b.public_key_bytes()).unwrap();
        let ac = a.shared_secret_with(&c.public_key_bytes()).unwrap();
        assert_ne!(ab, ac);
    }

    #[test]
    fn test_shared_secret_is_not_raw_dh_output() {
        // The HSalsa20 step must run; a raw X25519 result would break
        // interoperability with nacl.box.
        let a = ConnectionKeypair::from_secret_bytes([3u8; 32]);
        let b = ConnectionKeypair::from_secret_bytes([4u8; 32]);
        let raw = x25519_dalek::x25519(a.secret_key_bytes(), b.public_key_bytes());
        let derived = a.shared_secret_with(&b.public_key_bytes()).unwrap();
        assert_ne!(derived.as_bytes(), &raw);
    }

    /// Key pair and precomputed key from NaCl's `tests/box.c` / `box7.c`.
    const NACL_ALICE_SECRET: &str =
        "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a";
    const NACL_ALICE_PUBLIC: &str =
        "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a";
    const NACL_BOB_SECRET: &str =
        "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb";
    const NACL_BOB_PUBLIC: &str =
        "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f";
    const NACL_BEFORENM_KEY: &str =
        "1b27556473e985d462cd51197a9a46c76009549eac6474f206c4ee0844f68389";

    #[test]
    fn test_matches_nacl_box_beforenm_vector() {
        let alice_secret = hex::decode(NACL_ALICE_SECRET).unwrap();
        let bob_public = hex::decode(NACL_BOB_PUBLIC).unwrap();
        let key = derive_shared_secret(&alice_secret, &bob_public).unwrap();
        assert_eq!(hex::encode(key.as_bytes()), NACL_BEFORENM_KEY);

        // Same key from Bob's side.
        let bob_secret = hex::decode(NACL_BOB_SECRET).unwrap();
        let alice_public = hex::decode(NACL_ALICE_PUBLIC).unwrap();
        let key = derive_shared_secret(&bob_secret, &alice_public).unwrap();
        assert_eq!(hex::encode(key.as_bytes()), NACL_BEFORENM_KEY);
    }

    #[test]
    fn test_nacl_keypair_public_derivation() {
        let secret: [u8; 32] = hex::decode(NACL_ALICE_SECRET).unwrap().try_into().unwrap();
        let keypair = ConnectionKeypair::from_secret_bytes(secret);
        assert_eq!(hex::encode(keypair.public_key_bytes()), NACL_ALICE_PUBLIC);
    }

    #[test]
    fn test_shared_secret_equality_is_constant_time_eq() {
        let a = SharedSecret::from_bytes([5u8; 32]);
        let b = SharedSecret::from_bytes([5u8; 32]);
        let mut last_byte = [5u8; 32];
        last_byte[31] = 6;
        let c = SharedSecret::from_bytes(last_byte);

        assert!(bool::from(a.ct_eq(&b)));
        assert!(!bool::from(a.ct_eq(&c)));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rejects_wrong_private_key_length() {
        let err = derive_shared_secret(&[0u8; 31], &[9u8; 32]).unwrap_err();
        assert_eq!(
            err,
            KeyExchangeError::InvalidKeyLength {
                role: "private",
                actual: 31
            }
        );
    }

    #[test]
    fn test_rejects_wrong_public_key_length() {
        let err = derive_shared_secret(&[1u8; 32], &[9u8; 33]).unwrap_err();
        assert_eq!(
            err,
            KeyExchangeError::InvalidKeyLength {
                role: "public",
                actual: 33
            }
        );
        assert!(derive_shared_secret(&[1u8; 32], &[]).is_err());
    }

    #[test]
    fn test_rejects_small_order_point() {
        // u = 0 is a small-order point; every scalar maps it to zero.
        let err = derive_shared_secret(&[5u8; 32], &[0u8; 32]).unwrap_err();
        assert_eq!(err, KeyExchangeError::NonContributory);
    }

    #[test]
    fn test_keypair_base58_roundtrip() {
        let kp = ConnectionKeypair::generate();
        let restored = ConnectionKeypair::from_base58(&kp.secret_key_base58()).unwrap();
        assert_eq!(kp, restored);
        assert_eq!(kp.secret_key_bytes(), restored.secret_key_bytes());
    }

    #[test]
    fn test_keypair_from_base58_rejects_bad_input() {
        assert!(matches!(
            ConnectionKeypair::from_base58("l0l"),
            Err(KeyExchangeError::InvalidEncoding(_))
        ));
        assert!(matches!(
            ConnectionKeypair::from_base58(&base58::encode([1u8; 16])),
            Err(KeyExchangeError::InvalidKeyLength { actual: 16, .. })
        ));
    }

    #[test]
    fn test_public_key_base58_length() {
        let kp = ConnectionKeypair::generate();
        let b58 = kp.public_key_base58();
        assert!(b58.len() >= 32 && b58.len() <= 44);
        assert_eq!(base58::decode(&b58).unwrap(), kp.public_key_bytes());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = ConnectionKeypair::generate();
        let debug_str = format!("{:?}", kp);
        assert!(debug_str.starts_with("ConnectionKeypair(pub="));
        assert!(!debug_str.contains(&kp.secret_key_base58()));

        let secret = kp.shared_secret_with(&ConnectionKeypair::generate().public_key_bytes());
        assert_eq!(format!("{:?}", secret.unwrap()), "SharedSecret(<redacted>)");
    }
}
