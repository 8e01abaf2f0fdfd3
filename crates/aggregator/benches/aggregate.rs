use alloy_primitives::{Address, Bytes, B256, U256};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;

use relay_aggregator::{process_validators, Aggregator, SimpleAggregator};
use relay_bls::test_helpers::{keygen_mul, rng as test_rng, sign_all};
use relay_valset::{
    quorum_threshold, KeyTag, Signature, Status, Validator, ValidatorKey, ValidatorSet,
    VALSET_VERSION,
};

const KEY_TAG: KeyTag = KeyTag(15);

fn simple_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple");
    group.sample_size(10);
    // a full quorum of validators with equal power signing one message hash
    const NUM_VALIDATORS: usize = 100;
    let rng = &mut test_rng();
    let message: [u8; 32] = rng.gen();

    let keys = keygen_mul(rng, NUM_VALIDATORS);
    let validators = keys
        .iter()
        .enumerate()
        .map(|(i, sk)| Validator {
            operator: Address::from_word(B256::from(U256::from(i + 1))),
            voting_power: U256::from(100u64),
            is_active: true,
            keys: vec![ValidatorKey {
                tag: KEY_TAG,
                payload: Bytes::from(sk.to_public().on_chain().to_vec()),
            }],
            vaults: vec![],
        })
        .collect::<Vec<_>>();
    let valset = ValidatorSet {
        version: VALSET_VERSION,
        required_key_tag: KEY_TAG,
        epoch: 1,
        capture_timestamp: 0,
        quorum_threshold: quorum_threshold(U256::from(100 * NUM_VALIDATORS)),
        validators,
        previous_header_hash: B256::ZERO,
        status: Status::HeaderPending,
    };
    let signatures = keys
        .iter()
        .zip(sign_all(&keys, &message))
        .map(|(sk, sig)| Signature {
            message_hash: Bytes::copy_from_slice(&message),
            key_tag: KEY_TAG,
            epoch: 1,
            signature: Bytes::from(sig.to_bytes().to_vec()),
            public_key: Bytes::from(sk.to_public().to_raw()),
        })
        .collect::<Vec<_>>();

    let aggregator = SimpleAggregator::new();
    group.bench_function("process validators", |b| {
        b.iter(|| process_validators(&valset.validators, KEY_TAG).unwrap())
    });

    group.bench_function("aggregate", |b| {
        b.iter(|| {
            aggregator
                .aggregate(&valset, KEY_TAG, &message, &signatures)
                .unwrap()
        })
    });

    let proof = aggregator
        .aggregate(&valset, KEY_TAG, &message, &signatures)
        .unwrap();
    group.bench_function("verify", |b| {
        b.iter(|| aggregator.verify(&valset, KEY_TAG, &proof).unwrap())
    });

    group.bench_function("extra data", |b| {
        b.iter(|| aggregator.generate_extra_data(&valset, &[KEY_TAG]).unwrap())
    });
}

criterion_group!(benches, simple_aggregation);
criterion_main!(benches);
