//! Property-based tests for the codec, key exchange and cipher.
//!
//! These check the invariants the wallet relies on for arbitrary inputs:
//!
//! - base58 decoding inverts encoding, leading zeros included
//! - both sides of a key exchange agree
//! - sealed payloads open to the original bytes and nothing else

use proptest::prelude::*;

use crate::crypto::base58;
use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::key_exchange::{derive_shared_secret, ConnectionKeypair};
use crate::crypto::CipherError;
use crate::payload::build_transaction_payload;

proptest! {
    #[test]
    fn base58_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let encoded = base58::encode(&bytes);
        prop_assert_eq!(base58::decode(&encoded).unwrap(), bytes);
    }

    #[test]
    fn base58_leading_zeros_become_ones(
        zeros in 0usize..16,
        tail in prop::collection::vec(1u8..=255, 0..32),
    ) {
        let mut bytes = vec![0u8; zeros];
        bytes.extend_from_slice(&tail);
        let encoded = base58::encode(&bytes);
        let ones = encoded.chars().take_while(|c| *c == '1').count();
        prop_assert_eq!(ones, zeros);
        prop_assert_eq!(base58::decode(&encoded).unwrap(), bytes);
    }

    #[test]
    fn key_exchange_is_commutative(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let alice = ConnectionKeypair::from_secret_bytes(a);
        let bob = ConnectionKeypair::from_secret_bytes(b);
        let ab = derive_shared_secret(&a, &bob.public_key_bytes()).unwrap();
        let ba = derive_shared_secret(&b, &alice.public_key_bytes()).unwrap();
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn cipher_roundtrip(
        message in prop::collection::vec(any::<u8>(), 0..1024),
        key in any::<[u8; 32]>(),
        nonce in any::<[u8; 24]>(),
    ) {
        let sealed = encrypt(&message, &key, &nonce).unwrap();
        prop_assert_eq!(sealed.len(), message.len() + 16);
        prop_assert_eq!(decrypt(&sealed, &key, &nonce).unwrap(), message);
    }

    #[test]
    fn cipher_detects_any_single_byte_change(
        message in prop::collection::vec(any::<u8>(), 0..128),
        key in any::<[u8; 32]>(),
        nonce in any::<[u8; 24]>(),
        position in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let mut sealed = encrypt(&message, &key, &nonce).unwrap();
        let i = position.index(sealed.len());
        sealed[i] ^= flip;
        prop_assert_eq!(decrypt(&sealed, &key, &nonce), Err(CipherError::AuthenticationFailed));
    }

    #[test]
    fn canonical_payload_is_stable(
        tx in prop::collection::vec(any::<u8>(), 0..512),
        session in "[A-Za-z0-9_-]{0,64}",
    ) {
        let a = build_transaction_payload(&tx, &session).to_canonical_bytes().unwrap();
        let b = build_transaction_payload(&tx, &session).to_canonical_bytes().unwrap();
        prop_assert_eq!(a, b);
    }
}
