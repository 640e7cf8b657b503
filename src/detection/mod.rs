#[cfg(feature = "rust-faces")]
pub mod onnx;
#[cfg(feature = "seeta")]
pub mod seeta;

use anyhow::Result;
use image::{DynamicImage, GrayImage, RgbImage};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::CanonicalBox;

#[derive(Debug, Error)]
pub enum DetectorError {
    /// The backend was not compiled in, or its model is not on disk.
    #[error("{detector} is not available: {hint}")]
    MissingBackend { detector: &'static str, hint: String },
}

/// Pixel layout an adapter expects its input in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Rgb,
    Luma,
}

impl ChannelLayout {
    pub fn convert(self, image: &DynamicImage) -> Frame {
        match self {
            ChannelLayout::Rgb => Frame::Rgb(image.to_rgb8()),
            ChannelLayout::Luma => Frame::Luma(image.to_luma8()),
        }
    }
}

/// A decoded image already converted for one adapter
pub enum Frame {
    Rgb(RgbImage),
    Luma(GrayImage),
    /// HWC RGB tensor for the ONNX backends
    #[cfg(feature = "rust-faces")]
    Tensor(ndarray::Array3<u8>),
}

impl Frame {
    pub fn layout(&self) -> ChannelLayout {
        match self {
            Frame::Rgb(_) => ChannelLayout::Rgb,
            Frame::Luma(_) => ChannelLayout::Luma,
            #[cfg(feature = "rust-faces")]
            Frame::Tensor(_) => ChannelLayout::Rgb,
        }
    }
}

/// Box as reported by a detection library, before normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeBox {
    /// Top-left and bottom-right corners
    Corners { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// Top-left corner plus size
    OriginSize { x: f32, y: f32, width: f32, height: f32 },
}

impl NativeBox {
    /// Convert to integer corner coordinates, truncating toward zero.
    pub fn to_canonical(&self) -> CanonicalBox {
        match *self {
            NativeBox::Corners { x1, y1, x2, y2 } => {
                CanonicalBox::new(x1 as i32, y1 as i32, x2 as i32, y2 as i32)
            }
            NativeBox::OriginSize { x, y, width, height } => CanonicalBox::new(
                x as i32,
                y as i32,
                (x + width) as i32,
                (y + height) as i32,
            ),
        }
    }
}

/// Adapter around one face detection library
pub trait FaceDetector {
    /// Display name, used for report columns and output file names
    fn name(&self) -> &str;

    fn layout(&self) -> ChannelLayout;

    /// Turn a decoded image into this adapter's input. Not timed.
    fn prepare(&self, image: &DynamicImage) -> Frame {
        self.layout().convert(image)
    }

    /// Run inference on one frame. Boxes are returned in the library's own format.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<NativeBox>>;
}

/// ONNX execution provider for the `rust-faces` backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExecutionProvider {
    #[default]
    Cpu,
    Cuda,
}

/// Detector backends known to the benchmark, in report column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum DetectorKind {
    Mtcnn,
    #[value(name = "blazeface")]
    BlazeFace,
    Seeta,
}

impl DetectorKind {
    pub const ALL: [DetectorKind; 3] = [DetectorKind::Mtcnn, DetectorKind::BlazeFace, DetectorKind::Seeta];

    pub fn label(&self) -> &'static str {
        match self {
            DetectorKind::Mtcnn => "MTCNN",
            DetectorKind::BlazeFace => "BlazeFace",
            DetectorKind::Seeta => "SeetaFace",
        }
    }

    pub fn cargo_feature(&self) -> &'static str {
        match self {
            DetectorKind::Mtcnn | DetectorKind::BlazeFace => "rust-faces",
            DetectorKind::Seeta => "seeta",
        }
    }

    /// Whether the backend was compiled into this binary
    pub fn is_compiled(&self) -> bool {
        match self {
            DetectorKind::Mtcnn | DetectorKind::BlazeFace => cfg!(feature = "rust-faces"),
            DetectorKind::Seeta => cfg!(feature = "seeta"),
        }
    }

    pub fn compiled() -> Vec<DetectorKind> {
        Self::ALL.into_iter().filter(|k| k.is_compiled()).collect()
    }

    fn missing(&self) -> DetectorError {
        DetectorError::MissingBackend {
            detector: self.label(),
            hint: format!("rebuild with `--features {}`", self.cargo_feature()),
        }
    }
}

/// Settings shared by all backends
#[derive(Debug, Clone)]
pub struct DetectorOptions {
    pub provider: ExecutionProvider,
    pub seeta_model: PathBuf,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            provider: ExecutionProvider::Cpu,
            seeta_model: PathBuf::from("models/seeta_fd_frontal_v1.0.bin"),
        }
    }
}

/// Construct the adapter for `kind`.
///
/// Fails with [`DetectorError::MissingBackend`] when the backend is not usable.
pub fn load_detector(kind: DetectorKind, options: &DetectorOptions) -> Result<Box<dyn FaceDetector>> {
    tracing::debug!(detector = kind.label(), "Loading detector");

    match kind {
        #[cfg(feature = "rust-faces")]
        DetectorKind::Mtcnn => Ok(Box::new(onnx::OnnxDetector::mtcnn(options.provider)?)),
        #[cfg(feature = "rust-faces")]
        DetectorKind::BlazeFace => Ok(Box::new(onnx::OnnxDetector::blazeface(options.provider)?)),
        #[cfg(feature = "seeta")]
        DetectorKind::Seeta => Ok(Box::new(seeta::SeetaDetector::load(&options.seeta_model)?)),
        #[allow(unreachable_patterns)]
        other => {
            let _ = options;
            Err(other.missing().into())
        }
    }
}
