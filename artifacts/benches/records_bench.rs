use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use routestore_artifacts::{OriginalEdgeRecord, Record, RecordReader, encode_records};
use std::io::Cursor;

fn generate_edges(n: usize) -> Vec<OriginalEdgeRecord> {
    (0..n)
        .map(|i| OriginalEdgeRecord {
            via_node: i as u32,
            name_id: (i % 4096) as u32,
            turn_instruction: (i % 16) as u8,
        })
        .collect()
}

fn bench_stream_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_original_edges");
    for &n in &[10_000usize, 1_000_000] {
        let bytes = encode_records(&generate_edges(n)).expect("encode");
        group.throughput(Throughput::Bytes((n * OriginalEdgeRecord::SIZE) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &bytes, |b, bytes| {
            b.iter(|| {
                let mut r = RecordReader::new(Cursor::new(bytes.as_slice()), "bench");
                let count = r.read_u32("edge count").expect("count");
                let mut via = vec![0u32; count as usize];
                let mut names = vec![0u32; count as usize];
                let mut turns = vec![0u8; count as usize];
                for (i, rec) in r.records::<OriginalEdgeRecord>(count).enumerate() {
                    let rec = rec.expect("record");
                    via[i] = rec.via_node;
                    names[i] = rec.name_id;
                    turns[i] = rec.turn_instruction;
                }
                (via, names, turns)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stream_edges);
criterion_main!(benches);
