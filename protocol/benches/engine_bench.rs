// Engine benchmarks: signing, per-block processing throughput, and state
// root computation as the name table grows.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bns_protocol::config::ConsensusParams;
use bns_protocol::crypto::{Address, Keypair};
use bns_protocol::engine::BlockProcessor;
use bns_protocol::operation::{
    name_commitment, namespace_commitment, sign_operation, NamespaceParams, Operation,
    SignedOperation,
};
use bns_protocol::storage::{namespace_price, Block};

fn namespace_params() -> NamespaceParams {
    NamespaceParams {
        lifetime: 52_595,
        coeff: 250,
        base: 4,
        buckets: [6, 5, 4, 3, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        nonalpha_discount: 10,
        no_vowel_discount: 10,
    }
}

/// A processor with namespace `bench` ready at height 1.
fn ready_processor(payer: &Keypair) -> BlockProcessor {
    let processor = BlockProcessor::new(ConsensusParams::default()).unwrap();
    let addr = Address::from_public_key(&payer.public_key());
    let commitment = namespace_commitment("bench", &addr.payment_script(), &addr);
    let ops = vec![
        sign_operation(
            Operation::NamespacePreorder { commitment },
            namespace_price("bench", processor.params()),
            payer,
        ),
        sign_operation(
            Operation::NamespaceReveal {
                namespace_id: "bench".into(),
                reveal_address: addr,
                params: namespace_params(),
            },
            0,
            payer,
        ),
        sign_operation(
            Operation::NamespaceReady {
                namespace_id: "bench".into(),
            },
            0,
            payer,
        ),
    ];
    let tip = processor.snapshot();
    processor
        .process_block(&Block::with_parent(1, tip.last_block_hash(), ops))
        .unwrap();
    processor
}

/// Preorder + register pairs for `n` distinct names.
fn registration_ops(payer: &Keypair, n: usize) -> Vec<SignedOperation> {
    let addr = Address::from_public_key(&payer.public_key());
    let script = addr.payment_script();
    (0..n)
        .flat_map(|i| {
            let name = format!("name{i}.bench");
            let commitment = name_commitment(&name, &script, &addr);
            [
                sign_operation(
                    Operation::NamePreorder {
                        namespace_id: "bench".into(),
                        commitment,
                    },
                    u64::MAX,
                    payer,
                ),
                sign_operation(
                    Operation::NameRegister {
                        name,
                        register_address: addr.clone(),
                    },
                    0,
                    payer,
                ),
            ]
        })
        .collect()
}

fn bench_sign_operation(c: &mut Criterion) {
    let keypair = Keypair::generate();
    c.bench_function("operation/sign", |b| {
        b.iter(|| {
            sign_operation(
                Operation::NameRenew {
                    name: "foo.test".into(),
                },
                6_400_000,
                &keypair,
            )
        });
    });
}

fn bench_process_block(c: &mut Criterion) {
    let payer = Keypair::from_seed(&[9u8; 32]);
    let mut group = c.benchmark_group("processor/registration_block");

    for &names in &[10usize, 100, 500] {
        let ops = registration_ops(&payer, names);
        group.throughput(Throughput::Elements(ops.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(names), &ops, |b, ops| {
            b.iter_batched(
                || {
                    let processor = ready_processor(&payer);
                    let tip = processor.snapshot();
                    let block = Block::with_parent(2, tip.last_block_hash(), ops.clone());
                    (processor, block)
                },
                |(processor, block)| processor.process_block(&block).unwrap(),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_state_root(c: &mut Criterion) {
    let payer = Keypair::from_seed(&[9u8; 32]);
    let mut group = c.benchmark_group("state/root_hash");

    for &names in &[100usize, 1_000] {
        let processor = ready_processor(&payer);
        let tip = processor.snapshot();
        processor
            .process_block(&Block::with_parent(
                2,
                tip.last_block_hash(),
                registration_ops(&payer, names),
            ))
            .unwrap();
        let state = processor.snapshot();

        group.bench_with_input(BenchmarkId::from_parameter(names), &state, |b, state| {
            b.iter(|| state.root_hash());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sign_operation, bench_process_block, bench_state_root);
criterion_main!(benches);
