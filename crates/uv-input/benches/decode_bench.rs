use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uv_config::LegacyKeyEncoding;
use uv_input::{Decoder, LegacyTable};

fn plain_text(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}

fn csi_heavy(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        out.extend_from_slice(b"\x1b[1;5A");
    }
    out.truncate(len);
    out
}

fn run_decoder(input: &[u8]) {
    let mut decoder = Decoder::new(LegacyTable::empty(), LegacyKeyEncoding::empty());
    let mut offset = 0;
    while offset < input.len() {
        let (consumed, event) = decoder.decode(&input[offset..], false);
        if consumed == 0 {
            break;
        }
        black_box(event);
        offset += consumed;
    }
}

fn decode_benchmarks(c: &mut Criterion) {
    let plain = plain_text(64 * 1024);
    c.bench_function("decode_plain_text_64k", |b| b.iter(|| run_decoder(black_box(&plain))));

    let csi = csi_heavy(64 * 1024);
    c.bench_function("decode_csi_heavy_64k", |b| b.iter(|| run_decoder(black_box(&csi))));
}

criterion_group!(benches, decode_benchmarks);
criterion_main!(benches);
