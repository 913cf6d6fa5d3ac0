// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use edgefirst_classifier::{Quantization, luma_to_signed, rank_scores};

fn pixel_convert(c: &mut Criterion) {
    let src: Vec<u8> = (0..96 * 96).map(|i| (i % 251) as u8).collect();
    let mut dst = vec![0i8; src.len()];

    c.bench_function("luma_to_signed_96x96", |b| {
        b.iter(|| luma_to_signed(black_box(&src), black_box(&mut dst)).unwrap())
    });
}

fn score_ranking(c: &mut Criterion) {
    let scores: Vec<i8> = (0..1000).map(|i| ((i * 31) % 255 - 128) as i8).collect();
    let quant = Quantization::new(0.00390625, -128);

    c.bench_function("rank_scores_1000", |b| {
        b.iter(|| {
            let mut ranked = Vec::with_capacity(5);
            rank_scores(black_box(&scores), quant, &mut ranked);
            ranked
        })
    });
}

criterion_group!(benches, pixel_convert, score_ranking);
criterion_main!(benches);
