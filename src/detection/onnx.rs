use anyhow::{Result, anyhow, bail};
use image::DynamicImage;
use rust_faces::{
    BlazeFaceParams, FaceDetection, FaceDetectorBuilder, InferParams, MtCnnParams, Provider,
    ToArray3,
};

use super::{ChannelLayout, ExecutionProvider, FaceDetector, Frame, NativeBox};

impl ExecutionProvider {
    fn to_ort(self) -> Provider {
        match self {
            ExecutionProvider::Cpu => Provider::OrtCpu,
            ExecutionProvider::Cuda => Provider::OrtCuda(0),
        }
    }
}

/// BlazeFace and MTCNN through `rust-faces` (ONNX Runtime).
/// Model weights are downloaded into the `rust-faces` cache on first use.
pub struct OnnxDetector {
    name: &'static str,
    inner: Box<dyn rust_faces::FaceDetector>,
}

impl OnnxDetector {
    pub fn blazeface(provider: ExecutionProvider) -> Result<Self> {
        Self::build(
            "BlazeFace",
            FaceDetection::BlazeFace640(BlazeFaceParams::default()),
            provider,
        )
    }

    pub fn mtcnn(provider: ExecutionProvider) -> Result<Self> {
        Self::build("MTCNN", FaceDetection::MtCnn(MtCnnParams::default()), provider)
    }

    fn build(name: &'static str, detection: FaceDetection, provider: ExecutionProvider) -> Result<Self> {
        let inner = FaceDetectorBuilder::new(detection)
            .download()
            .infer_params(InferParams {
                provider: provider.to_ort(),
                ..Default::default()
            })
            .build()
            .map_err(|e| anyhow!("Failed to load {} model: {}", name, e))?;

        Ok(Self { name, inner })
    }
}

impl FaceDetector for OnnxDetector {
    fn name(&self) -> &str {
        self.name
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::Rgb
    }

    fn prepare(&self, image: &DynamicImage) -> Frame {
        Frame::Tensor(image.to_rgb8().into_array3())
    }

    fn detect(&mut self, frame: &Frame) -> Result<Vec<NativeBox>> {
        let Frame::Tensor(array) = frame else {
            bail!("{} expects an RGB tensor, got a {:?} image", self.name, frame.layout());
        };

        let faces = self
            .inner
            .detect(array.view().into_dyn())
            .map_err(|e| anyhow!("{} inference failed: {}", self.name, e))?;

        Ok(faces
            .iter()
            .map(|face| NativeBox::OriginSize {
                x: face.rect.x,
                y: face.rect.y,
                width: face.rect.width,
                height: face.rect.height,
            })
            .collect())
    }
}
