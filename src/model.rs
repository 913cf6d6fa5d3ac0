// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{
    error::{Error, Result},
    ops::Operator,
};
use num_traits::AsPrimitive;

/// Model artifact schema generation supported by the runtime contract.
pub const MODEL_SCHEMA_VERSION: u32 = 3;

/// Quantization parameters mapping an integer storage value to the real
/// value it represents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantization {
    pub scale: f32,
    pub zero_point: i32,
}

impl Quantization {
    pub fn new(scale: f32, zero_point: i32) -> Self {
        Self { scale, zero_point }
    }

    /// Real value represented by the stored integer.
    pub fn dequantize<T: AsPrimitive<f32>>(&self, value: T) -> f32 {
        (value.as_() - self.zero_point as f32) * self.scale
    }
}

impl Default for Quantization {
    fn default() -> Self {
        Self {
            scale: 1.0,
            zero_point: 0,
        }
    }
}

impl<S, Z> From<(S, Z)> for Quantization
where
    S: AsPrimitive<f32>,
    Z: AsPrimitive<i32>,
{
    fn from((scale, zp): (S, Z)) -> Quantization {
        Self {
            scale: scale.as_(),
            zero_point: zp.as_(),
        }
    }
}

/// Shape and quantization of a bound input or output tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorDesc {
    pub shape: Vec<usize>,
    pub quantization: Quantization,
}

impl TensorDesc {
    pub fn new(shape: Vec<usize>, quantization: Quantization) -> Result<Self> {
        if shape.is_empty() || shape.iter().product::<usize>() == 0 {
            return Err(Error::InvalidSize(0));
        }

        Ok(Self {
            shape,
            quantization,
        })
    }

    /// Number of elements in the tensor.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the runtime reports about a model artifact after its lightweight
/// parse, before an interpreter is built over it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub version: u32,
    pub operators: Vec<Operator>,
    pub input: TensorDesc,
    pub output: TensorDesc,
}

impl ModelInfo {
    /// Number of classes in the output tensor.
    pub fn classes(&self) -> usize {
        self.output.len()
    }
}
