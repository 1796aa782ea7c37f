//! Criterion benchmarks for the patch graph core.
//!
//! Measures mutation overhead at varying graph sizes. Every mutation
//! republishes the full edge set, so the interesting costs are:
//!
//! - **Connect/disconnect** — validation + copy-on-write publication
//! - **Snapshot load** — what the render thread pays per block
//!
//! Run with: `cargo bench -p cableado-core -- graph/`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use cableado_core::{Connection, NodeId, PatchGateway, PatchGraph, PortKind};

const GRAPH_SIZES: &[usize] = &[4, 16, 64];

/// Linear chain of `n` single-in/single-out audio nodes, fully wired.
fn make_chain(n: usize) -> (PatchGateway, Vec<NodeId>) {
    let mut graph = PatchGraph::new();
    let ids: Vec<NodeId> = (0..n)
        .map(|i| {
            let inputs = if i == 0 { vec![] } else { vec![PortKind::Audio] };
            let outputs = if i == n - 1 {
                vec![]
            } else {
                vec![PortKind::Audio]
            };
            graph.add_node(format!("stage-{i}"), inputs, outputs)
        })
        .collect();

    let mut gateway = PatchGateway::new(graph);
    for pair in ids.windows(2) {
        gateway
            .add_connection(Connection::between(pair[0], 0, pair[1], 0))
            .unwrap();
    }
    (gateway, ids)
}

fn bench_connect_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/connect_cycle");
    for &n in GRAPH_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let (mut gateway, ids) = make_chain(n);
            // Re-wire the middle link over and over.
            let mid = n / 2;
            let edge = Connection::between(ids[mid - 1], 0, ids[mid], 0);
            gateway.remove_connection(edge).unwrap();
            b.iter(|| {
                gateway.add_connection(black_box(edge)).unwrap();
                gateway.remove_connection(black_box(edge)).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_snapshot_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/snapshot_load");
    for &n in GRAPH_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let (gateway, _) = make_chain(n);
            let reader = gateway.graph().render_reader();
            b.iter(|| black_box(reader.snapshot()).edges().len());
        });
    }
    group.finish();
}

fn bench_undo_redo(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/undo_redo");
    for &n in GRAPH_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let (mut gateway, _) = make_chain(n);
            b.iter(|| {
                gateway.undo().unwrap();
                gateway.redo().unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_connect_cycle,
    bench_snapshot_load,
    bench_undo_redo
);
criterion_main!(benches);
