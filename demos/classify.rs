// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! End-to-end classification demo against the stub runtime and a synthetic
//! camera. Takes no arguments; set `RUST_LOG` to control verbosity.
//!
//! The camera is deliberately 120x160 so every pass exercises the
//! center-crop and resize fitting path before inference. After a few
//! firmware-style loop passes the demo runs one offline inference over a
//! stored frame, the CLI-style entry point.

use edgefirst_classifier::{
    ClassifierBuilder, Quantization, Result,
    stub::{PatternSource, ReplayRuntime},
};
use log::{error, info};
use std::{thread, time::Duration};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Canned scores standing in for the model graph: "seven" wins with a
    // dequantized confidence of (90 + 128) / 256.
    let scores: Vec<i8> = (0..10).map(|i| if i == 7 { 90 } else { -90 }).collect();
    let runtime = ReplayRuntime::grayscale_classifier(
        96,
        96,
        scores,
        Quantization::new(0.00390625, -128),
    )?;
    let camera = PatternSource::new(120, 160);

    let mut classifier = ClassifierBuilder::new()
        .with_model(b"replay".to_vec())
        .with_config_yaml_str(include_str!("../testdata/classifier.yaml").to_string())
        .build(runtime, camera)?;

    for _ in 0..5 {
        if let Err(e) = classifier.classify() {
            error!("classification pass failed: {}", e);
        }
        thread::sleep(Duration::from_millis(10));
    }

    let pixels = include_bytes!("../testdata/gradient_96x96.bin");
    let result = classifier.run_inference(pixels)?;
    info!(
        "offline frame: {} ({:.3})",
        classifier.labels().get(result.best.index),
        result.best.confidence
    );

    Ok(())
}
