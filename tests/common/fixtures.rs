#![allow(dead_code)]

use anyhow::Result;
use facebench::acquisition::Fetcher;
use facebench::{ChannelLayout, DetectorError, DetectorLoader, FaceDetector, Frame, NativeBox};
use image::{DynamicImage, ImageBuffer, Rgb};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Writes a small gradient JPEG at `dir/name` (parent directories included).
pub fn write_test_jpeg(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create image directory");
    }
    let img = ImageBuffer::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, 128u8]));
    img.save_with_format(&path, image::ImageFormat::Jpeg)
        .expect("Failed to save test image");
    path
}

/// Writes bytes that no decoder accepts, under an image extension.
pub fn write_corrupt_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not an image").expect("Failed to write corrupt image");
    path
}

/// Detector returning the same boxes for every image
pub struct StubDetector {
    pub name: String,
    pub boxes: Vec<NativeBox>,
    pub layout: ChannelLayout,
}

impl StubDetector {
    pub fn one_face(name: &str) -> Self {
        Self {
            name: name.to_string(),
            boxes: vec![NativeBox::OriginSize { x: 4.0, y: 4.0, width: 20.0, height: 16.0 }],
            layout: ChannelLayout::Rgb,
        }
    }
}

impl FaceDetector for StubDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn layout(&self) -> ChannelLayout {
        self.layout
    }

    fn detect(&mut self, frame: &Frame) -> Result<Vec<NativeBox>> {
        assert_eq!(frame.layout(), self.layout, "runner must convert to the adapter layout");
        Ok(self.boxes.clone())
    }
}

/// Detector whose input conversion is slow and whose inference is instant
pub struct SlowPrepareDetector {
    pub delay: Duration,
}

impl FaceDetector for SlowPrepareDetector {
    fn name(&self) -> &str {
        "SlowPrepare"
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::Rgb
    }

    fn prepare(&self, image: &DynamicImage) -> Frame {
        std::thread::sleep(self.delay);
        self.layout().convert(image)
    }

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<NativeBox>> {
        Ok(Vec::new())
    }
}

/// Loader handing out a fresh [`StubDetector`]
pub struct StubLoader {
    pub name: String,
    pub boxes: Vec<NativeBox>,
}

impl StubLoader {
    pub fn one_face(name: &str) -> Box<Self> {
        Box::new(Self {
            name: name.to_string(),
            boxes: StubDetector::one_face(name).boxes,
        })
    }
}

impl DetectorLoader for StubLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Box<dyn FaceDetector>> {
        Ok(Box::new(StubDetector {
            name: self.name.clone(),
            boxes: self.boxes.clone(),
            layout: ChannelLayout::Rgb,
        }))
    }
}

/// Loader whose backend is never available
pub struct MissingLoader;

impl DetectorLoader for MissingLoader {
    fn name(&self) -> &str {
        "Missing"
    }

    fn load(&self) -> Result<Box<dyn FaceDetector>> {
        Err(DetectorError::MissingBackend {
            detector: "Missing",
            hint: "rebuild with `--features missing`".to_string(),
        }
        .into())
    }
}

/// Fetcher serving fixed bytes and counting requests; URLs containing
/// "broken" fail.
#[derive(Default)]
pub struct CountingFetcher {
    pub calls: Cell<usize>,
    pub requested: RefCell<Vec<String>>,
}

impl Fetcher for CountingFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        self.requested.borrow_mut().push(url.to_string());
        if url.contains("broken") {
            anyhow::bail!("HTTP 404 for {}", url);
        }
        Ok(format!("bytes of {}", url).into_bytes())
    }
}
