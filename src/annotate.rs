use ab_glyph::{FontArc, PxScale};
use anyhow::{Context, Result};
use image::{ImageReader, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

use crate::models::{CanonicalBox, ImageRef};

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_SCALE: f32 = 16.0;

/// DejaVu Sans, used unless `--font` names a loadable font
static BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

fn load_font(path: &Path) -> Result<FontArc> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read font {}", path.display()))?;
    FontArc::try_from_vec(bytes)
        .map_err(|e| anyhow::anyhow!("Invalid font {}: {}", path.display(), e))
}

pub fn bundled_font() -> Result<FontArc> {
    FontArc::try_from_slice(BUNDLED_FONT)
        .map_err(|e| anyhow::anyhow!("Invalid bundled font: {}", e))
}

fn find_font(explicit: Option<&Path>) -> Result<FontArc> {
    if let Some(path) = explicit {
        match load_font(path) {
            Ok(font) => return Ok(font),
            Err(e) => tracing::warn!(error = %e, "Falling back to the bundled font"),
        }
    }

    bundled_font()
}

/// Output file for one detector's annotated copy of `image`
pub fn output_path(out_dir: &Path, image: &ImageRef, detector: &str) -> PathBuf {
    out_dir.join(format!("{}_{}.jpg", image.stem(), detector))
}

/// Draw one 2px box, and the label above it when one is given.
pub fn draw_box(img: &mut RgbImage, bbox: &CanonicalBox, label: Option<(&FontArc, &str)>) {
    let (width, height) = img.dimensions();
    let Some(clipped) = bbox.clipped(width, height) else {
        return;
    };

    let outer = Rect::at(clipped.x1, clipped.y1)
        .of_size(clipped.width() as u32 + 1, clipped.height() as u32 + 1);
    draw_hollow_rect_mut(img, outer, BOX_COLOR);

    if clipped.width() > 2 && clipped.height() > 2 {
        let inner = Rect::at(clipped.x1 + 1, clipped.y1 + 1)
            .of_size(clipped.width() as u32 - 1, clipped.height() as u32 - 1);
        draw_hollow_rect_mut(img, inner, BOX_COLOR);
    }

    if let Some((font, text)) = label {
        let y = (bbox.y1 - 5).max(10) - LABEL_SCALE as i32;
        draw_text_mut(img, BOX_COLOR, clipped.x1, y.max(0), PxScale::from(LABEL_SCALE), font, text);
    }
}

/// Writes annotated copies of benchmark images
pub struct Annotator {
    out_dir: PathBuf,
    font: FontArc,
}

impl Annotator {
    pub fn new(out_dir: impl Into<PathBuf>, font: Option<&Path>) -> Result<Self> {
        Ok(Self {
            out_dir: out_dir.into(),
            font: find_font(font)?,
        })
    }

    /// Re-read `image`, draw `boxes` labeled with `detector`, and save it.
    ///
    /// Returns None when the source no longer decodes.
    pub fn annotate(&self, detector: &str, image: &ImageRef, boxes: &[CanonicalBox]) -> Result<Option<PathBuf>> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("Failed to create {}", self.out_dir.display()))?;

        let decoded = match ImageReader::open(&image.path).and_then(|r| r.with_guessed_format()) {
            Ok(reader) => reader.decode(),
            Err(e) => Err(e.into()),
        };
        let mut img = match decoded {
            Ok(img) => img.to_rgb8(),
            Err(e) => {
                tracing::debug!(image = %image.name, error = %e, "Skipping annotation");
                return Ok(None);
            }
        };

        for bbox in boxes {
            draw_box(&mut img, bbox, Some((&self.font, detector)));
        }

        let out_path = output_path(&self.out_dir, image, detector);
        img.save(&out_path)
            .map_err(|e| anyhow::anyhow!("Failed to save annotated image: {}", e))?;

        Ok(Some(out_path))
    }
}
