//! Hot-path benchmarks: hashing, signing, the codec, the pool, the VM.
//!
//! Run with `cargo bench -p fc-tests`.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fc_chain::{data_hash, Block, Blockchain, State, Transaction, TxPool, Vm};
use shared_crypto::{Hash, KeyPair};
use shared_types::codec;

fn signed_tx(key: &KeyPair, data: &[u8]) -> Transaction {
    let mut tx = Transaction::new(data.to_vec());
    tx.sign(key);
    tx
}

fn bench_hashing(c: &mut Criterion) {
    let payload = vec![0xABu8; 1024];
    c.bench_function("hash/sha256_1k", |b| {
        b.iter(|| Hash::create(black_box(&payload)))
    });

    let hash = Hash::create(&payload);
    c.bench_function("hash/verify_1k", |b| {
        b.iter(|| hash.verify(black_box(&payload)).unwrap())
    });
}

fn bench_signatures(c: &mut Criterion) {
    let key = KeyPair::generate();
    let payload = b"a transaction payload of modest size".to_vec();

    c.bench_function("sig/sign", |b| b.iter(|| key.sign(black_box(&payload))));

    let signature = key.sign(&payload);
    c.bench_function("sig/verify", |b| {
        b.iter(|| signature.verify(black_box(&payload)).unwrap())
    });
}

fn bench_codec(c: &mut Criterion) {
    let key = KeyPair::generate();
    let transactions: Vec<Transaction> = (0..16)
        .map(|i: u32| signed_tx(&key, &i.to_le_bytes()))
        .collect();
    let chain = Blockchain::new().unwrap();
    let block = chain.create_block(&key, transactions).unwrap();

    c.bench_function("codec/encode_block_16tx", |b| {
        b.iter(|| codec::to_bytes(black_box(&block)).unwrap())
    });

    let bytes = codec::to_bytes(&block).unwrap();
    c.bench_function("codec/decode_block_16tx", |b| {
        b.iter(|| codec::from_bytes::<Block>(black_box(&bytes)).unwrap())
    });

    c.bench_function("codec/data_hash_16tx", |b| {
        b.iter(|| data_hash(black_box(&block.transactions)).unwrap())
    });
}

fn bench_pool(c: &mut Criterion) {
    let key = KeyPair::generate();
    let transactions: Vec<Transaction> = (0..64)
        .map(|i: u32| signed_tx(&key, &i.to_le_bytes()))
        .collect();

    c.bench_function("pool/add_64", |b| {
        b.iter(|| {
            let pool = TxPool::new();
            for tx in &transactions {
                pool.add(tx.clone()).unwrap();
            }
            black_box(pool.size())
        })
    });

    let pool = TxPool::new();
    for tx in &transactions {
        pool.add(tx.clone()).unwrap();
    }
    c.bench_function("pool/contains", |b| {
        b.iter(|| pool.contains(black_box(&transactions[32])).unwrap())
    });
}

fn bench_vm(c: &mut Criterion) {
    // (1 + 2) * 3, repeated
    let mut arithmetic = Vec::new();
    for _ in 0..32 {
        arithmetic.extend_from_slice(&[0x01, 0x0A, 0x02, 0x0A, 0x12, 0x03, 0x0A, 0x10]);
    }
    let state = State::new();

    c.bench_function("vm/arithmetic_32", |b| {
        b.iter(|| {
            let mut vm = Vm::new(black_box(&arithmetic), &state);
            vm.run().unwrap();
            black_box(vm.sp())
        })
    });

    // pack "foo", store 1
    let mut store = vec![0x03, 0x0C];
    for byte in *b"foo" {
        store.push(byte);
        store.push(0x0B);
    }
    store.push(0x0D);
    store.extend_from_slice(&[0x01, 0x0A, 0x0E]);

    c.bench_function("vm/store", |b| {
        b.iter(|| {
            let mut vm = Vm::new(black_box(&store), &state);
            vm.run().unwrap();
            black_box(vm.into_delta())
        })
    });
}

criterion_group!(
    benches,
    bench_hashing,
    bench_signatures,
    bench_codec,
    bench_pool,
    bench_vm
);
criterion_main!(benches);
