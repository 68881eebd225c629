// Deep-link benchmarks.
//
// Covers the X25519 + HSalsa20 key derivation, sealing payloads of various
// sizes, and assembling complete signTransaction links.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use phantom_deeplink::crypto::encryption::{decrypt, encrypt};
use phantom_deeplink::{build_sign_transaction_link, derive_shared_secret, Cluster, ConnectionKeypair};

fn bench_key_exchange(c: &mut Criterion) {
    let dapp = ConnectionKeypair::generate();
    let wallet = ConnectionKeypair::generate();
    let secret = dapp.secret_key_bytes();
    let public = wallet.public_key_bytes();

    c.bench_function("x25519/derive_shared_secret", |b| {
        b.iter(|| derive_shared_secret(&secret, &public).unwrap());
    });
}

fn bench_cipher(c: &mut Criterion) {
    let mut group = c.benchmark_group("xsalsa20poly1305");
    let key = [0x42u8; 32];
    let nonce = [0x24u8; 24];

    for size in [64usize, 1_232, 16 * 1024] {
        let plaintext = vec![0xABu8; size];
        let sealed = encrypt(&plaintext, &key, &nonce).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encrypt", size), &plaintext, |b, p| {
            b.iter(|| encrypt(p, &key, &nonce).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decrypt", size), &sealed, |b, s| {
            b.iter(|| decrypt(s, &key, &nonce).unwrap());
        });
    }
    group.finish();
}

fn bench_sign_link(c: &mut Criterion) {
    let dapp = ConnectionKeypair::generate();
    let wallet = ConnectionKeypair::generate();
    let public_b58 = dapp.public_key_base58();
    // 1232 bytes is the maximum serialized Solana transaction size.
    let transaction = vec![0x5Au8; 1_232];

    c.bench_function("deeplink/sign_transaction_link", |b| {
        b.iter(|| {
            build_sign_transaction_link(
                &transaction,
                &wallet.public_key_bytes(),
                &dapp.secret_key_bytes(),
                "session",
                "mygame",
                "v1",
                &public_b58,
                Cluster::MainNet,
            )
            .unwrap()
        });
    });
}

criterion_group!(benches, bench_key_exchange, bench_cipher, bench_sign_link);
criterion_main!(benches);
