//! Benchmarks for the PHP unserialize decoder.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use php_unserialize_core::decode;

fn simple_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple_types");

    let null_data = b"N;";
    group.throughput(Throughput::Bytes(null_data.len() as u64));
    group.bench_function("null", |b| b.iter(|| decode(black_box(null_data))));

    let bool_data = b"b:1;";
    group.throughput(Throughput::Bytes(bool_data.len() as u64));
    group.bench_function("bool", |b| b.iter(|| decode(black_box(bool_data))));

    let int_data = b"i:1234567890;";
    group.throughput(Throughput::Bytes(int_data.len() as u64));
    group.bench_function("int", |b| b.iter(|| decode(black_box(int_data))));

    let float_data = b"d:3.141592653589793;";
    group.throughput(Throughput::Bytes(float_data.len() as u64));
    group.bench_function("float", |b| b.iter(|| decode(black_box(float_data))));

    group.finish();
}

fn strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");

    let short = b"s:5:\"hello\";";
    group.throughput(Throughput::Bytes(short.len() as u64));
    group.bench_function("short_5b", |b| b.iter(|| decode(black_box(short))));

    let medium = format!("s:100:\"{}\";", "x".repeat(100));
    let medium = medium.as_bytes();
    group.throughput(Throughput::Bytes(medium.len() as u64));
    group.bench_function("medium_100b", |b| b.iter(|| decode(black_box(medium))));

    let large = format!("s:10000:\"{}\";", "x".repeat(10_000));
    let large = large.as_bytes();
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("large_10kb", |b| b.iter(|| decode(black_box(large))));

    group.finish();
}

fn arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("arrays");

    let empty = b"a:0:{}";
    group.throughput(Throughput::Bytes(empty.len() as u64));
    group.bench_function("empty", |b| b.iter(|| decode(black_box(empty))));

    // Sequence-shaped: consecutive integer keys
    let sequence: String = {
        let items: String = (0..1000).map(|i| format!("i:{};i:{};", i, i * 2)).collect();
        format!("a:1000:{{{}}}", items)
    };
    let sequence = sequence.as_bytes();
    group.throughput(Throughput::Bytes(sequence.len() as u64));
    group.bench_function("sequence_1000", |b| b.iter(|| decode(black_box(sequence))));

    // Mapping-shaped: string keys
    let mapping: String = {
        let items: String = (0..100)
            .map(|i| {
                let key = format!("key_{}", i);
                format!("s:{}:\"{}\";i:{};", key.len(), key, i)
            })
            .collect();
        format!("a:100:{{{}}}", items)
    };
    let mapping = mapping.as_bytes();
    group.throughput(Throughput::Bytes(mapping.len() as u64));
    group.bench_function("mapping_100", |b| b.iter(|| decode(black_box(mapping))));

    group.finish();
}

fn nested_structures(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested");

    for depth in [10usize, 50] {
        let nested: String = {
            let mut s = String::from("s:4:\"leaf\";");
            for i in 0..depth {
                let key = format!("k{}", i % 10);
                s = format!("a:1:{{s:{}:\"{}\";{}}}", key.len(), key, s);
            }
            s
        };
        let nested = nested.as_bytes();
        group.throughput(Throughput::Bytes(nested.len() as u64));
        group.bench_function(format!("depth_{}", depth), |b| {
            b.iter(|| decode(black_box(nested)))
        });
    }

    group.finish();
}

fn real_world(c: &mut Criterion) {
    let mut group = c.benchmark_group("real_world");

    // Simulated form data
    let form_data = br#"a:3:{s:6:"fields";a:3:{i:0;a:3:{s:4:"type";s:4:"text";s:5:"label";s:4:"Name";s:8:"required";b:1;}i:1;a:3:{s:4:"type";s:5:"email";s:5:"label";s:5:"Email";s:8:"required";b:1;}i:2;a:3:{s:4:"type";s:8:"textarea";s:5:"label";s:7:"Message";s:8:"required";b:0;}}s:8:"settings";a:2:{s:11:"submit_text";s:6:"Submit";s:15:"success_message";s:10:"Thank you!";}s:11:"permissions";a:3:{i:0;s:4:"read";i:1;s:5:"write";i:2;s:6:"delete";}}"#;
    group.throughput(Throughput::Bytes(form_data.len() as u64));
    group.bench_function("form_data", |b| b.iter(|| decode(black_box(form_data))));

    // Flattened object payload
    let object_data = br#"O:8:"stdClass":3:{s:4:"name";s:5:"Alice";s:3:"age";i:30;s:4:"tags";a:2:{i:0;s:5:"admin";i:1;s:6:"active";}}"#;
    group.throughput(Throughput::Bytes(object_data.len() as u64));
    group.bench_function("object", |b| b.iter(|| decode(black_box(object_data))));

    group.finish();
}

#[cfg(feature = "serde")]
fn json_conversion(c: &mut Criterion) {
    use php_unserialize_core::json::to_json_string;

    let mut group = c.benchmark_group("json");

    let data = br#"a:3:{s:4:"name";s:5:"Alice";s:3:"age";i:30;s:4:"tags";a:2:{i:0;s:5:"admin";i:1;s:6:"active";}}"#;

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("decode_and_convert", |b| {
        b.iter(|| {
            let value = decode(black_box(data)).unwrap().unwrap();
            to_json_string(&value).unwrap()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    simple_types,
    strings,
    arrays,
    nested_structures,
    real_world,
);

#[cfg(feature = "serde")]
criterion_group!(serde_benches, json_conversion);

#[cfg(feature = "serde")]
criterion_main!(benches, serde_benches);

#[cfg(not(feature = "serde"))]
criterion_main!(benches);
