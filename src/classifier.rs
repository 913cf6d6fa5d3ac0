// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{
    arena::{DEFAULT_ARENA_BYTES, TensorArena},
    classify::{self, ClassScore, Labels},
    error::{Error, Result},
    image::{self, Frame, FrameSource},
    model::{MODEL_SCHEMA_VERSION, Quantization},
    ops::OpRegistry,
    runtime::{Interpreter, Runtime},
};
use log::{debug, error, info, warn};
use std::{thread, time::Duration};

/// Environment override for the tensor arena size in bytes. Takes
/// precedence over the builder and configuration values when set.
pub const ARENA_ENV: &str = "EDGEFIRST_CLASSIFIER_ARENA";

pub mod configs {
    use serde::{Deserialize, Serialize};

    /// Geometry of the model input tensor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Input {
        pub rows: usize,
        pub cols: usize,
        #[serde(default = "default_channels")]
        pub channels: usize,
    }

    fn default_channels() -> usize {
        1
    }

    /// Classifier pipeline configuration.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Classifier {
        pub labels: Vec<String>,
        pub input: Input,
        #[serde(default = "default_arena_bytes")]
        pub arena_bytes: usize,
        #[serde(default = "default_score_threshold")]
        pub score_threshold: f32,
    }

    fn default_arena_bytes() -> usize {
        crate::arena::DEFAULT_ARENA_BYTES
    }

    fn default_score_threshold() -> f32 {
        0.5
    }
}

/// Result of one classification pass over a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub best: ClassScore,
    pub runner_up: Option<ClassScore>,
    /// Whether the winning confidence cleared the configured threshold.
    pub confident: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum ConfigSource {
    Yaml(String),
    Json(String),
    Config(configs::Classifier),
}

/// Builder running the one-time setup sequence for [`ImageClassifier`].
///
/// # Examples
/// ```rust
/// # use edgefirst_classifier::{ClassifierBuilder, Quantization};
/// # use edgefirst_classifier::stub::{PatternSource, ReplayRuntime};
/// # fn main() -> Result<(), edgefirst_classifier::Error> {
/// let runtime = ReplayRuntime::grayscale_classifier(
///     96,
///     96,
///     vec![-104, 72],
///     Quantization::new(0.00390625, -128),
/// )?;
/// let mut classifier = ClassifierBuilder::new()
///     .with_model(b"replay".to_vec())
///     .with_labels(["no person", "person"])
///     .build(runtime, PatternSource::new(96, 96))?;
///
/// let result = classifier.classify()?;
/// assert_eq!(classifier.labels().get(result.best.index), "person");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassifierBuilder {
    model: Vec<u8>,
    labels: Option<Labels>,
    input: Option<configs::Input>,
    arena_bytes: Option<usize>,
    score_threshold: Option<f32>,
    config_src: Option<ConfigSource>,
}

impl ClassifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Model artifact bytes. The artifact stays opaque to this crate; the
    /// runtime parses it.
    pub fn with_model(mut self, model: impl Into<Vec<u8>>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels
            .replace(Labels::new(labels.into_iter().map(Into::into).collect()));
        self
    }

    /// Model input geometry (grayscale). Overrides the configuration value
    /// and the geometry inferred from the model.
    pub fn with_input(mut self, rows: usize, cols: usize) -> Self {
        self.input.replace(configs::Input {
            rows,
            cols,
            channels: 1,
        });
        self
    }

    pub fn with_arena_bytes(mut self, bytes: usize) -> Self {
        self.arena_bytes.replace(bytes);
        self
    }

    /// Confidence below which a classification is reported as uncertain.
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold.replace(threshold);
        self
    }

    /// Loads a pipeline configuration. Use `ClassifierBuilder.build()` to
    /// validate it against the model.
    pub fn with_config(mut self, config: configs::Classifier) -> Self {
        self.config_src.replace(ConfigSource::Config(config));
        self
    }

    /// Loads a pipeline configuration in YAML format. Does not check the
    /// string; `ClassifierBuilder.build()` deserializes and validates it.
    ///
    /// # Examples
    /// ```rust
    /// # use edgefirst_classifier::ClassifierBuilder;
    /// let config_yaml = include_str!("../testdata/classifier.yaml").to_string();
    /// let builder = ClassifierBuilder::new().with_config_yaml_str(config_yaml);
    /// ```
    pub fn with_config_yaml_str(mut self, yaml_str: String) -> Self {
        self.config_src.replace(ConfigSource::Yaml(yaml_str));
        self
    }

    /// Loads a pipeline configuration in JSON format. Does not check the
    /// string; `ClassifierBuilder.build()` deserializes and validates it.
    pub fn with_config_json_str(mut self, json_str: String) -> Self {
        self.config_src.replace(ConfigSource::Json(json_str));
        self
    }

    /// Runs the setup sequence against the injected runtime and camera:
    /// model parse, schema-version check, operator check, arena allocation,
    /// interpreter construction, tensor allocation, input/output binding,
    /// label and geometry validation, camera start. Each stage fails with
    /// its own error so a deployment log names the faulty integration
    /// point.
    pub fn build<R, C>(self, runtime: R, mut camera: C) -> Result<ImageClassifier<R::Interpreter, C>>
    where
        R: Runtime,
        C: FrameSource,
    {
        let config = match self.config_src {
            Some(ConfigSource::Yaml(yaml)) => Some(serde_yaml::from_str::<configs::Classifier>(&yaml)?),
            Some(ConfigSource::Json(json)) => Some(serde_json::from_str::<configs::Classifier>(&json)?),
            Some(ConfigSource::Config(config)) => Some(config),
            None => None,
        };

        if self.model.is_empty() {
            return Err(Error::Config("no model bytes provided".to_string()));
        }

        let info = runtime.model_info(&self.model)?;
        if info.version != MODEL_SCHEMA_VERSION {
            return Err(Error::SchemaVersion {
                found: info.version,
                supported: MODEL_SCHEMA_VERSION,
            });
        }

        let ops = OpRegistry::classifier();
        if let Some(op) = ops.missing(&info.operators).first() {
            return Err(Error::MissingOperator(*op));
        }

        let mut arena_bytes = self
            .arena_bytes
            .or(config.as_ref().map(|c| c.arena_bytes))
            .unwrap_or(DEFAULT_ARENA_BYTES);
        if let Ok(value) = std::env::var(ARENA_ENV) {
            match value.parse::<usize>() {
                Ok(bytes) => {
                    debug!("arena size {} bytes from {}", bytes, ARENA_ENV);
                    arena_bytes = bytes;
                }
                Err(_) => warn!("ignoring invalid {}: {}", ARENA_ENV, value),
            }
        }

        let arena = TensorArena::new(arena_bytes)?;
        let mut interpreter = runtime.interpreter(&self.model, &ops, arena)?;
        interpreter.allocate_tensors()?;

        // Bind the input and output tensor handles.
        let input_desc = interpreter.input_desc().clone();
        let output_desc = interpreter.output_desc().clone();

        let labels = self
            .labels
            .or(config.as_ref().map(|c| Labels::new(c.labels.clone())))
            .ok_or_else(|| Error::Config("no label table provided".to_string()))?;
        let classes = output_desc.len();
        if labels.len() != classes {
            return Err(Error::LabelMismatch {
                labels: labels.len(),
                classes,
            });
        }

        let input = match self.input.or(config.as_ref().map(|c| c.input)) {
            Some(input) => input,
            None => infer_geometry(&input_desc.shape).ok_or_else(|| {
                Error::InvalidShape(format!(
                    "cannot infer input geometry from tensor shape {:?}",
                    input_desc.shape
                ))
            })?,
        };
        if input.channels != 1 {
            return Err(Error::Config(format!(
                "only grayscale input is supported, not {} channels",
                input.channels
            )));
        }
        if input.rows * input.cols * input.channels != input_desc.len() {
            return Err(Error::InvalidShape(format!(
                "input geometry {}x{}x{} does not match tensor shape {:?}",
                input.rows, input.cols, input.channels, input_desc.shape
            )));
        }

        let score_threshold = self
            .score_threshold
            .or(config.as_ref().map(|c| c.score_threshold))
            .unwrap_or(0.5);

        camera.start()?;
        let frame = Frame::new(camera.rows(), camera.cols())?;

        info!(
            "classifier ready: {} classes, {}x{} input, arena {} bytes ({} used)",
            classes,
            input.rows,
            input.cols,
            arena_bytes,
            interpreter.arena_used_bytes()
        );

        Ok(ImageClassifier {
            interpreter,
            camera,
            labels,
            input,
            output_quant: output_desc.quantization,
            score_threshold,
            frame,
        })
    }
}

/// Geometry from an input tensor shape with any leading batch dimension
/// stripped.
fn infer_geometry(shape: &[usize]) -> Option<configs::Input> {
    let dims = match shape {
        [1, rest @ ..] if !rest.is_empty() => rest,
        dims => dims,
    };

    match *dims {
        [rows, cols] => Some(configs::Input {
            rows,
            cols,
            channels: 1,
        }),
        [rows, cols, channels] => Some(configs::Input {
            rows,
            cols,
            channels,
        }),
        _ => None,
    }
}

/// The classification pipeline: camera, interpreter, and label table bound
/// together by [`ClassifierBuilder::build`].
#[derive(Debug)]
pub struct ImageClassifier<I, C>
where
    I: Interpreter,
    C: FrameSource,
{
    interpreter: I,
    camera: C,
    labels: Labels,
    input: configs::Input,
    output_quant: Quantization,
    score_threshold: f32,
    frame: Frame,
}

impl<I, C> ImageClassifier<I, C>
where
    I: Interpreter,
    C: FrameSource,
{
    /// One capture, infer, and report pass. Frames that do not match the
    /// model geometry are center-cropped and resized to fit.
    pub fn classify(&mut self) -> Result<Classification> {
        self.camera.capture(&mut self.frame)?;

        if self.frame.rows() != self.input.rows || self.frame.cols() != self.input.cols {
            debug!(
                "fitting {}x{} frame to {}x{} input",
                self.frame.rows(),
                self.frame.cols(),
                self.input.rows,
                self.input.cols
            );
            let fitted = self
                .frame
                .center_crop()
                .resize(self.input.rows, self.input.cols)?;
            fitted.write_signed(self.interpreter.input_mut())?;
        } else {
            self.frame.write_signed(self.interpreter.input_mut())?;
        }

        self.invoke_and_rank()
    }

    /// One-shot inference over a caller-supplied packed grayscale buffer of
    /// exactly rows x columns bytes.
    pub fn run_inference(&mut self, pixels: &[u8]) -> Result<Classification> {
        image::luma_to_signed(pixels, self.interpreter.input_mut())?;
        self.invoke_and_rank()
    }

    fn invoke_and_rank(&mut self) -> Result<Classification> {
        self.interpreter.invoke()?;

        let mut ranked = Vec::with_capacity(2);
        classify::rank_scores(self.interpreter.output(), self.output_quant, &mut ranked);

        let mut ranked = ranked.into_iter();
        let best = ranked.next().ok_or_else(|| {
            Error::InvalidShape("model produced an empty score tensor".to_string())
        })?;
        let runner_up = ranked.next();
        let confident = best.confidence >= self.score_threshold;

        if confident {
            info!(
                "detected: {} ({:.3})",
                self.labels.get(best.index),
                best.confidence
            );
        } else {
            info!(
                "detected: {} ({:.3}, below threshold {:.2})",
                self.labels.get(best.index),
                best.confidence,
                self.score_threshold
            );
        }
        if let Some(second) = runner_up {
            debug!(
                "runner-up: {} ({:.3})",
                self.labels.get(second.index),
                second.confidence
            );
        }

        Ok(Classification {
            best,
            runner_up,
            confident,
        })
    }

    /// The firmware loop: classify, log failures, wait out the fixed delay,
    /// repeat. A failed iteration is reported and skipped, never fatal.
    pub fn run(&mut self, interval: Duration) -> ! {
        loop {
            if let Err(e) = self.classify() {
                error!("classification pass failed: {}", e);
            }
            thread::sleep(interval);
        }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Model input geometry.
    pub fn input_rows(&self) -> usize {
        self.input.rows
    }

    pub fn input_cols(&self) -> usize {
        self.input.cols
    }

    pub fn score_threshold(&self) -> f32 {
        self.score_threshold
    }
}
