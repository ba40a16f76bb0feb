use criterion::{black_box, criterion_group, criterion_main, Criterion};
use radlink_core::crc::{crc16, crc8};
use radlink_core::logging::SignalLogger;
use radlink_core::{ChannelTag, Framer};

const SOF: u8 = 0xA5;

fn encode_frame(cmd_id: u16, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(SOF);
    out.extend_from_slice(&(data.len() as u16).to_le_bytes());
    out.push(0);
    out.push(crc8(&out[0..4]));
    out.extend_from_slice(&cmd_id.to_le_bytes());
    out.extend_from_slice(data);
    let check = crc16(&out);
    out.extend_from_slice(&check.to_le_bytes());
    out
}

fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &b in bytes {
        for shift in (0..8).rev() {
            bits.push((b >> shift) & 1);
        }
    }
    bits
}

fn bench_framer_scan(c: &mut Criterion) {
    let mut stream = Vec::new();
    for i in 0..200u16 {
        stream.extend(encode_frame(0x0A02, &i.to_le_bytes()[..].repeat(6)));
    }
    let bits = bytes_to_bits(&stream);

    c.bench_function("framer_scan_200_frames", |b| {
        b.iter(|| {
            let mut framer = Framer::new(ChannelTag::Broadcast);
            let logger = SignalLogger::silent();
            black_box(framer.push_bits(black_box(&bits), &logger))
        })
    });
}

criterion_group!(benches, bench_framer_scan);
criterion_main!(benches);
