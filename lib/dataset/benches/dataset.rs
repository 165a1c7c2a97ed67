#![allow(clippy::panic)]

use codspeed_criterion_compat::{criterion_group, criterion_main, Criterion};
use rand::seq::SliceRandom;
use rdf_interop_dataset::{Dataset, MemoryStore};
use rdf_interop_model::{BlankNode, GraphName, NamedNode, Quad, QuadPattern, Subject};
use rdf_interop_stream::{Sink, Source};
use tokio::runtime::Runtime;

fn dataset_insert(c: &mut Criterion) {
    c.bench_function("Dataset::insert", |b| {
        b.iter(|| generate_quads(10_000).collect::<Dataset>());
    });
}

fn dataset_match(c: &mut Criterion) {
    let dataset = generate_quads(10_000).collect::<Dataset>();
    let pattern = QuadPattern::any().with_subject(NamedNode::new_unchecked(
        "http://example.com/subject42",
    ));
    c.bench_function("Dataset::match_pattern", |b| {
        b.iter(|| dataset.match_pattern(&pattern));
    });
}

fn dataset_to_canonical(c: &mut Criterion) {
    let mut quads = generate_blank_chain(24);
    quads.shuffle(&mut rand::rng());
    let dataset = quads.into_iter().collect::<Dataset>();
    c.bench_function("Dataset::to_canonical", |b| {
        b.iter(|| dataset.to_canonical().unwrap());
    });
}

fn memory_store_import(c: &mut Criterion) {
    c.bench_function("MemoryStore::import", |b| {
        b.to_async(Runtime::new().unwrap()).iter(|| async {
            let store = MemoryStore::new();
            store
                .import(generate_quads(10_000).collect())
                .await
                .unwrap();
            let count = store
                .match_quads(&QuadPattern::any())
                .try_collect_to_vec()
                .await
                .unwrap()
                .len();
            if count != 10_000 {
                panic!("Expected 10000 quads, found {count}");
            }
        });
    });
}

criterion_group!(
    dataset,
    dataset_insert,
    dataset_match,
    dataset_to_canonical,
    memory_store_import
);
criterion_main!(dataset);

fn generate_quads(count: u64) -> impl Iterator<Item = Quad> {
    (0..count).map(|i| {
        let subject = format!("http://example.com/subject{i}");
        let predicate = format!("http://example.com/predicate{}", i % 10);
        let object = format!("http://example.com/object{i}");
        Quad::new(
            Subject::NamedNode(NamedNode::new_unchecked(subject)),
            NamedNode::new_unchecked(predicate),
            NamedNode::new_unchecked(object),
            GraphName::DefaultGraph,
        )
    })
}

/// A chain of blank nodes whose only distinguishing feature is the position in the chain.
fn generate_blank_chain(len: usize) -> Vec<Quad> {
    let next = NamedNode::new_unchecked("http://example.com/next");
    (0..len)
        .map(|i| {
            Quad::in_default_graph(
                BlankNode::new_unchecked(format!("n{i}")),
                next.clone(),
                BlankNode::new_unchecked(format!("n{}", i + 1)),
            )
        })
        .collect()
}
