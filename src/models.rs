use std::path::PathBuf;
use std::time::Duration;

/// Face rectangle in absolute pixel coordinates (top-left and bottom-right corners).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl CanonicalBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Clip the box to an image of the given size.
    /// Returns None when nothing of the box is left inside the image.
    pub fn clipped(&self, width: u32, height: u32) -> Option<CanonicalBox> {
        let max_x = width as i32 - 1;
        let max_y = height as i32 - 1;
        let (left, right) = (self.x1.min(self.x2), self.x1.max(self.x2));
        let (top, bottom) = (self.y1.min(self.y2), self.y1.max(self.y2));

        let clipped = CanonicalBox {
            x1: left.max(0),
            y1: top.max(0),
            x2: right.min(max_x),
            y2: bottom.min(max_y),
        };

        if clipped.width() <= 0 || clipped.height() <= 0 {
            return None;
        }
        Some(clipped)
    }
}

/// A discovered input image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub path: PathBuf,
    /// Path relative to the image directory, `/`-separated. Unique within a run
    /// and used to join results across detectors.
    pub name: String,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// File stem used for annotated output names
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// Outcome of one detector on one image
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    pub image_name: String,
    pub elapsed: Duration,
    pub boxes: Vec<CanonicalBox>,
}

impl DetectionResult {
    pub fn new(image_name: impl Into<String>, elapsed: Duration, boxes: Vec<CanonicalBox>) -> Self {
        Self {
            image_name: image_name.into(),
            elapsed,
            boxes,
        }
    }

    pub fn face_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}
