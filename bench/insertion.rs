use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use fixed_merkle_tree::{Element, MerkleTree, Sha256Hasher};

const LEVELS: usize = 20;

pub fn generate_random_element() -> Element {
    Element::from(rand::random::<[u8; 32]>())
}

fn empty_tree() -> MerkleTree<Sha256Hasher> {
    MerkleTree::new(LEVELS, vec![], Element::from(0u8), Sha256Hasher).unwrap()
}

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Tree Insertion");
    let elements: Vec<Element> = (0..100).map(|_| generate_random_element()).collect();

    group.bench_function("One By One", |b| {
        b.iter_batched(
            || (empty_tree(), elements.clone()),
            |(mut tree, elements)| {
                for element in elements {
                    tree.insert(element).unwrap();
                }
                tree
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("Bulk", |b| {
        b.iter_batched(
            || (empty_tree(), elements.clone()),
            |(mut tree, elements)| {
                tree.bulk_insert(elements).unwrap();
                tree
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("Constructor", |b| {
        b.iter_batched(
            || elements.clone(),
            |elements| MerkleTree::new(LEVELS, elements, Element::from(0u8), Sha256Hasher).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_insertion);
criterion_main!(benches);
