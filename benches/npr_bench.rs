//! NPR primitive benchmarks

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cstds::{NprCn, NprCnr, NprSupport, PackedLcp};

const LCP_LEN: usize = 1 << 18;

fn synthetic_lcp(len: usize) -> Arc<PackedLcp> {
    // LCP-shaped values: mostly small, occasional deep plateaus
    let mut rng = StdRng::seed_from_u64(42);
    let mut values = vec![0usize; len];
    let mut i = 1;
    while i < len {
        let depth = rng.gen_range(0..24);
        let run = rng.gen_range(1..6).min(len - i);
        for v in &mut values[i..i + run] {
            *v = depth;
        }
        i += run;
    }
    Arc::new(PackedLcp::from_values(&values))
}

fn bench_npr(c: &mut Criterion) {
    let lcp = synthetic_lcp(LCP_LEN);
    let cn = NprCn::new(Arc::clone(&lcp), 32).expect("cn build");
    let cnr = NprCnr::new(Arc::clone(&lcp), 32, 8).expect("cnr build");

    let mut rng = StdRng::seed_from_u64(7);
    let queries: Vec<(usize, usize)> = (0..1024)
        .map(|_| {
            let i = rng.gen_range(0..LCP_LEN - 1);
            (i, rng.gen_range(i..LCP_LEN))
        })
        .collect();

    c.bench_function("cn/fwd_nsv", |b| {
        b.iter(|| {
            for &(i, _) in &queries {
                black_box(cn.fwd_nsv(black_box(i), 3));
            }
        });
    });

    c.bench_function("cnr/fwd_nsv", |b| {
        b.iter(|| {
            for &(i, _) in &queries {
                black_box(cnr.fwd_nsv(black_box(i), 3));
            }
        });
    });

    c.bench_function("cn/rmq", |b| {
        b.iter(|| {
            for &(i, j) in &queries {
                black_box(cn.rmq(black_box(i), black_box(j)));
            }
        });
    });

    c.bench_function("cnr/rmq", |b| {
        b.iter(|| {
            for &(i, j) in &queries {
                black_box(cnr.rmq(black_box(i), black_box(j)));
            }
        });
    });
}

criterion_group!(benches, bench_npr);
criterion_main!(benches);
