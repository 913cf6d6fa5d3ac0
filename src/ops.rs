// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Operator kernels used by the image classification graph.
///
/// The serde names are the snake_case forms used in configuration files;
/// [`Operator::name`] returns the canonical kernel name as the runtime
/// registers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    AveragePool2d,
    MaxPool2d,
    Reshape,
    FullyConnected,
    Conv2d,
    DepthwiseConv2d,
    Softmax,
    Quantize,
    Dequantize,
}

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Operator::AveragePool2d => "AVERAGE_POOL_2D",
            Operator::MaxPool2d => "MAX_POOL_2D",
            Operator::Reshape => "RESHAPE",
            Operator::FullyConnected => "FULLY_CONNECTED",
            Operator::Conv2d => "CONV_2D",
            Operator::DepthwiseConv2d => "DEPTHWISE_CONV_2D",
            Operator::Softmax => "SOFTMAX",
            Operator::Quantize => "QUANTIZE",
            Operator::Dequantize => "DEQUANTIZE",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Registration list of operator kernels made available to the runtime.
///
/// Registering only the kernels the graph needs keeps the runtime's code
/// footprint small compared to an all-ops resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpRegistry {
    ops: Vec<Operator>,
}

impl OpRegistry {
    pub fn new() -> Self {
        Self {
            ops: Vec::with_capacity(9),
        }
    }

    /// Registry preloaded with the nine kernels the classification graph
    /// uses.
    pub fn classifier() -> Self {
        let mut registry = Self::new();
        registry
            .register(Operator::AveragePool2d)
            .register(Operator::MaxPool2d)
            .register(Operator::Reshape)
            .register(Operator::FullyConnected)
            .register(Operator::Conv2d)
            .register(Operator::DepthwiseConv2d)
            .register(Operator::Softmax)
            .register(Operator::Quantize)
            .register(Operator::Dequantize);
        registry
    }

    /// Adds a kernel to the registry. Re-registering an operator is a no-op.
    pub fn register(&mut self, op: Operator) -> &mut Self {
        if !self.ops.contains(&op) {
            self.ops.push(op);
        }
        self
    }

    pub fn contains(&self, op: Operator) -> bool {
        self.ops.contains(&op)
    }

    /// Operators in `required` with no registered kernel.
    pub fn missing(&self, required: &[Operator]) -> Vec<Operator> {
        required
            .iter()
            .copied()
            .filter(|op| !self.contains(*op))
            .collect()
    }

    pub fn operators(&self) -> &[Operator] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
