// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

/*!

## EdgeFirst Classifier

The `edgefirst_classifier` crate wires three externally-supplied
components, a pre-trained quantized model, a camera provider, and a
neural-network inference runtime, into a minimal classification pipeline
for embedded image classification demos.

The crate deliberately contains no inference engine and no camera driver.
Both are injected through the [`Runtime`] and [`FrameSource`] traits so the
glue is testable without hardware, and the [`stub`] module carries
reference implementations used by the demos and tests.

The pipeline performs the classic firmware sequence:
- allocate a fixed-size [`TensorArena`] scratch region up front,
- register the operator kernels the model graph needs in an [`OpRegistry`],
- load the model bytes and validate the schema version,
- build an interpreter, allocate tensors, and bind the input and output
  tensor handles,
- per frame: capture, remap unsigned pixels into the signed quantized
  domain (`b ^ 0x80`), invoke, and scan the output scores for the winning
  class label.

## Examples

```rust
# use edgefirst_classifier::{ClassifierBuilder, Quantization};
# use edgefirst_classifier::stub::{PatternSource, ReplayRuntime};
# fn main() -> Result<(), edgefirst_classifier::Error> {
let runtime = ReplayRuntime::grayscale_classifier(
    96,
    96,
    vec![-104, 72],
    Quantization::new(0.00390625, -128),
)?;
let camera = PatternSource::new(96, 96);

let mut classifier = ClassifierBuilder::new()
    .with_model(b"replay".to_vec())
    .with_labels(["no person", "person"])
    .build(runtime, camera)?;

let result = classifier.classify()?;
assert_eq!(classifier.labels().get(result.best.index), "person");
# Ok(())
# }
```

## Environment Variables

- `EDGEFIRST_CLASSIFIER_ARENA`: overrides the tensor arena size in bytes,
  taking precedence over the builder and configuration values.
*/

mod arena;
mod classify;
mod classifier;
mod error;
mod image;
mod model;
mod ops;
mod runtime;
pub mod stub;

pub use arena::{DEFAULT_ARENA_BYTES, TensorArena};
pub use classifier::configs;
pub use classifier::{ARENA_ENV, Classification, ClassifierBuilder, ImageClassifier};
pub use classify::{ClassScore, Labels, arg_max, rank_scores};
pub use error::{Error, Result};
pub use image::{Frame, FrameSource, luma_to_signed, signed_to_luma};
pub use model::{MODEL_SCHEMA_VERSION, ModelInfo, Quantization, TensorDesc};
pub use ops::{OpRegistry, Operator};
pub use runtime::{Interpreter, Runtime};
