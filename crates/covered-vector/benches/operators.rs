use std::hint::black_box;

use covered_vector::ops::{self, BitwiseOp};
use covered_vector::{CodecOptions, Kind, Vector};
use criterion::{Criterion, criterion_group, criterion_main};

fn operands(width: usize) -> (Vector, Vector) {
    let mut left = Vector::new(width, Kind::Signal);
    let mut right = Vector::new(width, Kind::Signal);
    left.set_u64(0x0123_4567_89ab_cdef);
    right.set_u64(0xfedc_ba98_7654_3210);
    (left, right)
}

fn benchmark_operators(c: &mut Criterion) {
    for width in [32, 256] {
        let (left, right) = operands(width);
        let mut tgt = Vector::new(width, Kind::Signal);

        c.bench_function(&format!("add_{width}"), |b| {
            b.iter(|| ops::add(&mut tgt, black_box(&left), black_box(&right)))
        });
        c.bench_function(&format!("multiply_{width}"), |b| {
            b.iter(|| ops::multiply(&mut tgt, black_box(&left), black_box(&right)))
        });
        c.bench_function(&format!("xor_{width}"), |b| {
            b.iter(|| ops::bitwise(&mut tgt, black_box(&left), black_box(&right), BitwiseOp::Xor))
        });
    }

    // Toggle bookkeeping on a wide signal driven back and forth
    {
        let mut sig = Vector::new(1024, Kind::Signal);
        let zeros = "0".repeat(1024);
        let ones = "1".repeat(1024);
        c.bench_function("vcd_toggle_1024_x100", |b| {
            b.iter(|| {
                for _ in 0..50 {
                    sig.vcd_assign(&zeros, 1023, 0).unwrap();
                    sig.vcd_assign(&ones, 1023, 0).unwrap();
                }
            })
        });
    }

    {
        let (mem, _) = operands(4096);
        let mem = {
            let mut m = Vector::new(4096, Kind::Memory);
            m.set_value(&mem);
            m
        };
        let options = CodecOptions::default();
        let mut out = Vec::with_capacity(64 * 1024);
        c.bench_function("db_write_memory_4096", |b| {
            b.iter(|| {
                out.clear();
                mem.db_write(&mut out, &options).unwrap();
            })
        });
    }
}

criterion_group!(benches, benchmark_operators);
criterion_main!(benches);
