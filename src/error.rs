// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::ops::Operator;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    SchemaVersion { found: u32, supported: u32 },
    ArenaAllocation(usize),
    TensorAllocation(String),
    MissingOperator(Operator),
    CameraInit(String),
    Capture(String),
    Invoke(String),
    InvalidSize(usize),
    InvalidShape(String),
    LabelMismatch { labels: usize, classes: usize },
    Config(String),
    JpegDecode(zune_jpeg::errors::DecodeErrors),
    Resize(fast_image_resize::ResizeError),
    ImageBuffer(fast_image_resize::ImageBufferError),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<zune_jpeg::errors::DecodeErrors> for Error {
    fn from(err: zune_jpeg::errors::DecodeErrors) -> Self {
        Error::JpegDecode(err)
    }
}

impl From<fast_image_resize::ResizeError> for Error {
    fn from(err: fast_image_resize::ResizeError) -> Self {
        Error::Resize(err)
    }
}

impl From<fast_image_resize::ImageBufferError> for Error {
    fn from(err: fast_image_resize::ImageBufferError) -> Self {
        Error::ImageBuffer(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::SchemaVersion { found, supported } => write!(
                f,
                "Model schema version {} not equal to supported version {}",
                found, supported
            ),
            Error::ArenaAllocation(bytes) => {
                write!(f, "Couldn't allocate tensor arena of {} bytes", bytes)
            }
            Error::TensorAllocation(msg) => write!(f, "Tensor allocation failed: {}", msg),
            Error::MissingOperator(op) => write!(f, "No kernel registered for operator {}", op),
            Error::CameraInit(msg) => write!(f, "Camera init failed: {}", msg),
            Error::Capture(msg) => write!(f, "Image capture failed: {}", msg),
            Error::Invoke(msg) => write!(f, "Invoke failed: {}", msg),
            Error::InvalidSize(size) => write!(f, "Invalid size: {}", size),
            Error::InvalidShape(msg) => write!(f, "Invalid shape: {}", msg),
            Error::LabelMismatch { labels, classes } => write!(
                f,
                "Label table has {} entries but the model reports {} classes",
                labels, classes
            ),
            Error::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::JpegDecode(e) => write!(f, "{}", e),
            Error::Resize(e) => write!(f, "{}", e),
            Error::ImageBuffer(e) => write!(f, "{}", e),
        }
    }
}
