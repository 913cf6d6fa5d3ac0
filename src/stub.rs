// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Reference collaborators for demos and tests.
//!
//! [`ReplayRuntime`] honors the full [`Runtime`] contract while replaying
//! canned output scores, and [`PatternSource`] produces deterministic
//! frames without camera hardware. Real deployments replace both with an
//! inference-engine binding and a capture pipeline.

use crate::{
    arena::TensorArena,
    error::{Error, Result},
    image::{Frame, FrameSource},
    model::{MODEL_SCHEMA_VERSION, ModelInfo, Quantization, TensorDesc},
    ops::OpRegistry,
    runtime::{Interpreter, Runtime},
};

/// Inference runtime that replays canned output scores on every invoke.
#[derive(Debug, Clone)]
pub struct ReplayRuntime {
    info: ModelInfo,
    scores: Vec<i8>,
}

impl ReplayRuntime {
    /// The canned `scores` stand in for the model graph's output; their
    /// length must match the output tensor volume.
    pub fn new(info: ModelInfo, scores: Vec<i8>) -> Result<Self> {
        if scores.len() != info.output.len() {
            return Err(Error::InvalidShape(format!(
                "{} canned scores for an output tensor of {}",
                scores.len(),
                info.output.len()
            )));
        }

        Ok(Self { info, scores })
    }

    /// Convenience constructor for a rows x cols grayscale classifier
    /// carrying the standard kernel set.
    pub fn grayscale_classifier(
        rows: usize,
        cols: usize,
        scores: Vec<i8>,
        quant: Quantization,
    ) -> Result<Self> {
        let info = ModelInfo {
            version: MODEL_SCHEMA_VERSION,
            operators: OpRegistry::classifier().operators().to_vec(),
            input: TensorDesc::new(vec![1, rows, cols, 1], Quantization::default())?,
            output: TensorDesc::new(vec![1, scores.len()], quant)?,
        };
        Self::new(info, scores)
    }
}

impl Runtime for ReplayRuntime {
    type Interpreter = ReplayInterpreter;

    fn model_info(&self, model: &[u8]) -> Result<ModelInfo> {
        if model.is_empty() {
            return Err(Error::Config("empty model artifact".to_string()));
        }
        Ok(self.info.clone())
    }

    fn interpreter(
        &self,
        model: &[u8],
        ops: &OpRegistry,
        arena: TensorArena,
    ) -> Result<ReplayInterpreter> {
        if model.is_empty() {
            return Err(Error::Config("empty model artifact".to_string()));
        }
        if let Some(op) = self.info.operators.iter().find(|op| !ops.contains(**op)) {
            return Err(Error::MissingOperator(*op));
        }

        Ok(ReplayInterpreter {
            info: self.info.clone(),
            scores: self.scores.clone(),
            arena,
            input: Vec::new(),
            output: Vec::new(),
        })
    }
}

/// Interpreter built by [`ReplayRuntime`]: copies the canned scores into
/// the output tensor on every invoke.
///
/// Tensor planning is accounted against the arena the way a real engine
/// claims it, though the stub keeps its storage in plain buffers.
#[derive(Debug)]
pub struct ReplayInterpreter {
    info: ModelInfo,
    scores: Vec<i8>,
    arena: TensorArena,
    input: Vec<i8>,
    output: Vec<i8>,
}

impl Interpreter for ReplayInterpreter {
    fn allocate_tensors(&mut self) -> Result<()> {
        let needed = self.info.input.len() + self.info.output.len();
        if needed > self.arena.capacity() {
            return Err(Error::TensorAllocation(format!(
                "arena of {} bytes cannot hold {} tensor bytes",
                self.arena.capacity(),
                needed
            )));
        }

        self.input = vec![0; self.info.input.len()];
        self.output = vec![0; self.info.output.len()];
        Ok(())
    }

    fn input_desc(&self) -> &TensorDesc {
        &self.info.input
    }

    fn output_desc(&self) -> &TensorDesc {
        &self.info.output
    }

    fn input_mut(&mut self) -> &mut [i8] {
        &mut self.input
    }

    fn invoke(&mut self) -> Result<()> {
        if self.output.is_empty() {
            return Err(Error::Invoke(
                "invoke called before tensor allocation".to_string(),
            ));
        }
        self.output.copy_from_slice(&self.scores);
        Ok(())
    }

    fn output(&self) -> &[i8] {
        &self.output
    }

    fn arena_used_bytes(&self) -> usize {
        self.input.len() + self.output.len()
    }
}

/// Synthetic camera producing a rolling diagonal gradient.
///
/// Deterministic per tick, so consecutive frames differ but any test run
/// sees the same sequence.
#[derive(Debug, Clone)]
pub struct PatternSource {
    rows: usize,
    cols: usize,
    started: bool,
    tick: usize,
}

impl PatternSource {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            started: false,
            tick: 0,
        }
    }
}

impl FrameSource for PatternSource {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn start(&mut self) -> Result<()> {
        self.started = true;
        Ok(())
    }

    fn capture(&mut self, frame: &mut Frame) -> Result<()> {
        if !self.started {
            return Err(Error::Capture("pattern source not started".to_string()));
        }
        if frame.rows() != self.rows || frame.cols() != self.cols {
            return Err(Error::InvalidShape(format!(
                "capture frame is {}x{} but the source is {}x{}",
                frame.rows(),
                frame.cols(),
                self.rows,
                self.cols
            )));
        }

        let cols = self.cols;
        let tick = self.tick;
        for (i, pixel) in frame.as_mut_slice().iter_mut().enumerate() {
            let (row, col) = (i / cols, i % cols);
            *pixel = ((row + col + tick) & 0xff) as u8;
        }
        self.tick = self.tick.wrapping_add(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Operator;

    #[test]
    fn test_replay_interpreter_contract() {
        let runtime = ReplayRuntime::grayscale_classifier(
            8,
            8,
            vec![1, 2, 3],
            Quantization::default(),
        )
        .expect("Failed to create runtime");

        let info = runtime.model_info(b"model").expect("Failed to parse model");
        assert_eq!(info.version, MODEL_SCHEMA_VERSION);
        assert_eq!(info.classes(), 3);

        let arena = TensorArena::new(1024).expect("Failed to allocate arena");
        let mut interpreter = runtime
            .interpreter(b"model", &OpRegistry::classifier(), arena)
            .expect("Failed to build interpreter");

        assert!(matches!(interpreter.invoke(), Err(Error::Invoke(_))));

        interpreter
            .allocate_tensors()
            .expect("Failed to allocate tensors");
        assert_eq!(interpreter.input_mut().len(), 64);
        assert_eq!(interpreter.arena_used_bytes(), 64 + 3);

        interpreter.invoke().expect("Failed to invoke");
        assert_eq!(interpreter.output(), &[1, 2, 3]);
    }

    #[test]
    fn test_replay_rejects_score_mismatch() {
        let info = ModelInfo {
            version: MODEL_SCHEMA_VERSION,
            operators: vec![Operator::Softmax],
            input: TensorDesc::new(vec![1, 4, 4, 1], Quantization::default()).unwrap(),
            output: TensorDesc::new(vec![1, 2], Quantization::default()).unwrap(),
        };
        assert!(ReplayRuntime::new(info, vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_replay_reports_missing_operator() {
        let runtime = ReplayRuntime::grayscale_classifier(
            4,
            4,
            vec![0, 0],
            Quantization::default(),
        )
        .expect("Failed to create runtime");

        let arena = TensorArena::new(64).expect("Failed to allocate arena");
        let err = runtime
            .interpreter(b"model", &OpRegistry::new(), arena)
            .unwrap_err();
        assert!(matches!(err, Error::MissingOperator(_)));
    }

    #[test]
    fn test_pattern_source() {
        let mut source = PatternSource::new(4, 4);
        let mut frame = Frame::new(4, 4).expect("Failed to create frame");

        assert!(matches!(
            source.capture(&mut frame),
            Err(Error::Capture(_))
        ));

        source.start().expect("Failed to start source");
        source.capture(&mut frame).expect("Failed to capture");
        assert_eq!(frame.view()[(0, 0)], 0);
        assert_eq!(frame.view()[(2, 3)], 5);

        source.capture(&mut frame).expect("Failed to capture");
        assert_eq!(frame.view()[(0, 0)], 1);

        let mut wrong = Frame::new(2, 2).expect("Failed to create frame");
        assert!(matches!(
            source.capture(&mut wrong),
            Err(Error::InvalidShape(_))
        ));
    }
}
