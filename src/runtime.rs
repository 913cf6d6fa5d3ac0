// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{
    arena::TensorArena,
    error::Result,
    model::{ModelInfo, TensorDesc},
    ops::OpRegistry,
};

/// Contract of the external inference engine.
///
/// The engine itself (operator kernels, graph interpretation, arena
/// planning, quantization math) is not part of this crate; deployments
/// supply a backend binding, and [`crate::stub::ReplayRuntime`] provides a
/// reference implementation for tests and demos.
pub trait Runtime {
    type Interpreter: Interpreter;

    /// Parses the opaque model artifact and reports its schema version,
    /// required operators, and tensor layout. A lightweight operation: no
    /// weights are copied.
    fn model_info(&self, model: &[u8]) -> Result<ModelInfo>;

    /// Builds an interpreter over the model using the registered kernels
    /// and the scratch arena. The interpreter owns the arena for its
    /// lifetime.
    fn interpreter(
        &self,
        model: &[u8],
        ops: &OpRegistry,
        arena: TensorArena,
    ) -> Result<Self::Interpreter>;
}

/// A model graph bound to its scratch memory.
pub trait Interpreter {
    /// Plans and claims storage for every input, output, and intermediate
    /// tensor inside the arena. Must succeed before the first
    /// [`Interpreter::invoke`].
    fn allocate_tensors(&mut self) -> Result<()>;

    fn input_desc(&self) -> &TensorDesc;

    fn output_desc(&self) -> &TensorDesc;

    /// Signed 8-bit view of the input tensor storage.
    fn input_mut(&mut self) -> &mut [i8];

    /// Runs the graph over the current input tensor.
    fn invoke(&mut self) -> Result<()>;

    /// Signed 8-bit view of the output tensor.
    fn output(&self) -> &[i8];

    /// Arena bytes claimed by tensor planning.
    fn arena_used_bytes(&self) -> usize;
}
