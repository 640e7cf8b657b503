use anyhow::{Context, Result, bail};
use rustface::{Detector, ImageData};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{ChannelLayout, DetectorError, FaceDetector, Frame, NativeBox};

pub const MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model is read once per pass; `rustface` wants a grayscale buffer.
pub struct SeetaDetector {
    detector: Box<dyn Detector>,
}

impl SeetaDetector {
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.is_file() {
            return Err(DetectorError::MissingBackend {
                detector: "SeetaFace",
                hint: format!("download {} to {}", MODEL_URL, model_path.display()),
            }
            .into());
        }

        let file = File::open(model_path)
            .with_context(|| format!("Failed to open SeetaFace model {}", model_path.display()))?;
        let model = rustface::read_model(BufReader::new(file))
            .with_context(|| format!("Failed to parse SeetaFace model {}", model_path.display()))?;

        let mut detector = rustface::create_detector_with_model(model);
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        Ok(Self { detector })
    }
}

impl FaceDetector for SeetaDetector {
    fn name(&self) -> &str {
        "SeetaFace"
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::Luma
    }

    fn detect(&mut self, frame: &Frame) -> Result<Vec<NativeBox>> {
        let Frame::Luma(gray) = frame else {
            bail!("SeetaFace expects a grayscale frame, got {:?}", frame.layout());
        };

        let faces = self
            .detector
            .detect(&ImageData::new(gray.as_raw(), gray.width(), gray.height()));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                NativeBox::OriginSize {
                    x: bbox.x() as f32,
                    y: bbox.y() as f32,
                    width: bbox.width() as f32,
                    height: bbox.height() as f32,
                }
            })
            .collect())
    }
}
