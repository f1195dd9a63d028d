use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fixed_merkle_tree::{verify_proof, Element, MerkleTree, Sha256Hasher};

const LEVELS: usize = 20;

pub fn generate_random_element() -> Element {
    Element::from(rand::random::<[u8; 32]>())
}

fn setup_tree(num_leaves: usize) -> (MerkleTree<Sha256Hasher>, Vec<Element>) {
    let elements: Vec<Element> = (0..num_leaves).map(|_| generate_random_element()).collect();
    let tree = MerkleTree::new(LEVELS, elements.clone(), Element::from(0u8), Sha256Hasher).unwrap();
    (tree, elements)
}

fn bench_proof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Tree Proof Generation");
    let (tree, elements) = setup_tree(1000);

    group.bench_function("Path By Index", |b| {
        b.iter(|| {
            for index in 0..elements.len() {
                black_box(tree.path(index).unwrap());
            }
        })
    });

    group.bench_function("Proof By Value", |b| {
        b.iter(|| {
            for element in elements.iter().take(100) {
                black_box(tree.proof(element).unwrap());
            }
        })
    });

    group.finish();
}

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Tree Proof Verification");
    let (tree, elements) = setup_tree(1000);
    let proofs: Vec<_> = (0..100).map(|index| tree.path(index).unwrap()).collect();

    group.bench_function("Full Proof", |b| {
        b.iter(|| {
            for (element, proof) in elements.iter().zip(&proofs) {
                verify_proof(&Sha256Hasher, element, proof).unwrap();
            }
        })
    });

    let compressed: Vec<_> = proofs.iter().map(|proof| proof.compress(tree.zeros())).collect();
    group.bench_function("Compressed Proof", |b| {
        b.iter(|| {
            for (element, proof) in elements.iter().zip(&compressed) {
                let proof = proof.decompress(tree.zeros()).unwrap();
                verify_proof(&Sha256Hasher, element, &proof).unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_proof_generation, bench_proof_verification);
criterion_main!(benches);
