use anyhow::{Context, Result};
use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::annotate::Annotator;
use crate::detection::{DetectorKind, DetectorOptions, FaceDetector, load_detector};
use crate::discovery::discover_images;
use crate::models::{DetectionResult, ImageRef};
use crate::report::Report;

/// Builds a detector at the start of its pass, so a missing backend fails
/// exactly when that detector is reached.
pub trait DetectorLoader {
    /// Column name in the report
    fn name(&self) -> &str;

    fn load(&self) -> Result<Box<dyn FaceDetector>>;
}

/// Loader for one of the built-in backends
pub struct KindLoader {
    pub kind: DetectorKind,
    pub options: DetectorOptions,
}

impl DetectorLoader for KindLoader {
    fn name(&self) -> &str {
        self.kind.label()
    }

    fn load(&self) -> Result<Box<dyn FaceDetector>> {
        load_detector(self.kind, &self.options)
    }
}

/// Results of one detector over the whole image list
#[derive(Debug, Clone, Default)]
pub struct PassOutcome {
    pub detector: String,
    pub results: Vec<DetectionResult>,
    /// Images that could not be decoded, in discovery order
    pub skipped: Vec<String>,
}

impl PassOutcome {
    /// Outcome for a column whose detector was not run
    pub fn empty(detector: impl Into<String>) -> Self {
        Self {
            detector: detector.into(),
            ..Default::default()
        }
    }
}

fn decode_image(path: &Path) -> Result<DynamicImage> {
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    Ok(img)
}

/// Run one detector over every image.
///
/// Images that fail to decode are skipped and recorded in `skipped`. Only the
/// inference call is timed; decoding and [`FaceDetector::prepare`] happen
/// before the clock starts.
pub fn run_pass(detector: &mut dyn FaceDetector, images: &[ImageRef]) -> Result<PassOutcome> {
    let mut outcome = PassOutcome::empty(detector.name());

    for image in images {
        let decoded = match decode_image(&image.path) {
            Ok(img) => img,
            Err(e) => {
                tracing::debug!(image = %image.name, error = %e, "Skipping unreadable image");
                outcome.skipped.push(image.name.clone());
                continue;
            }
        };

        let frame = detector.prepare(&decoded);

        let start = Instant::now();
        let native = detector
            .detect(&frame)
            .with_context(|| format!("{} failed on {}", detector.name(), image.name))?;
        let elapsed = start.elapsed();

        let boxes = native.iter().map(|b| b.to_canonical()).collect();
        outcome
            .results
            .push(DetectionResult::new(image.name.clone(), elapsed, boxes));
    }

    Ok(outcome)
}

/// What a finished benchmark produced
#[derive(Debug)]
pub struct BenchmarkSummary {
    pub images: Vec<ImageRef>,
    pub passes: Vec<PassOutcome>,
    pub report_path: PathBuf,
    pub annotation_dir: Option<PathBuf>,
}

struct Column {
    name: String,
    loader: Option<Box<dyn DetectorLoader>>,
}

/// Benchmark builder: one report column per added detector, in insertion order.
pub struct Benchmark {
    image_dir: PathBuf,
    report_path: PathBuf,
    annotation_dir: Option<PathBuf>,
    font: Option<PathBuf>,
    columns: Vec<Column>,
    verbose: bool,
}

impl Benchmark {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            report_path: PathBuf::from("BENCHMARK_RESULTS.md"),
            annotation_dir: None,
            font: None,
            columns: Vec::new(),
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    /// Save annotated copies of every processed image into `dir`
    pub fn with_annotations(mut self, dir: impl Into<PathBuf>) -> Self {
        self.annotation_dir = Some(dir.into());
        self
    }

    /// TrueType font for box labels
    pub fn with_font(mut self, font: Option<PathBuf>) -> Self {
        self.font = font;
        self
    }

    /// Add a column that is reported but never run
    pub fn add_column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(Column {
            name: name.into(),
            loader: None,
        });
        self
    }

    pub fn add_detector(mut self, loader: Box<dyn DetectorLoader>) -> Self {
        self.columns.push(Column {
            name: loader.name().to_string(),
            loader: Some(loader),
        });
        self
    }

    /// Discover images, run every detector in column order, annotate, and write the report.
    ///
    /// Returns `Ok(None)` without touching the filesystem when there are no images.
    pub fn run(&self) -> Result<Option<BenchmarkSummary>> {
        let images = discover_images(&self.image_dir)?;
        if images.is_empty() {
            println!(
                "No images found in {}/. Run `facebench download` or add images.",
                self.image_dir.display()
            );
            return Ok(None);
        }

        println!("Found {} images. Running benchmarks...\n", images.len());

        let annotator = self
            .annotation_dir
            .as_ref()
            .map(|dir| Annotator::new(dir, self.font.as_deref()))
            .transpose()?;

        let mut passes = Vec::with_capacity(self.columns.len());

        for column in &self.columns {
            let Some(loader) = &column.loader else {
                println!("[SKIP] {}\n", column.name);
                passes.push(PassOutcome::empty(&column.name));
                continue;
            };

            println!("=== {} ===", column.name);
            let mut detector = loader.load()?;
            let mut outcome = run_pass(detector.as_mut(), &images)?;
            outcome.detector = column.name.clone();

            for result in &outcome.results {
                println!(
                    "{}: {} faces, {:.3}s",
                    result.image_name,
                    result.face_count(),
                    result.elapsed_seconds()
                );
            }
            if self.verbose && !outcome.skipped.is_empty() {
                println!("  Skipped {} unreadable image(s)", outcome.skipped.len());
            }

            if let Some(annotator) = &annotator {
                for result in &outcome.results {
                    let Some(image) = images.iter().find(|i| i.name == result.image_name) else {
                        continue;
                    };
                    let saved = annotator.annotate(&column.name, image, &result.boxes)?;
                    if self.verbose {
                        if let Some(path) = saved {
                            println!("  Saved {}", path.display());
                        }
                    }
                }
            }

            println!();
            passes.push(outcome);
        }

        Report::new(&images, &passes).write(&self.report_path)?;

        println!("[OK] Report saved to {}", absolute(&self.report_path).display());
        if let Some(dir) = &self.annotation_dir {
            println!("[OK] Annotated samples saved to {}", absolute(dir).display());
        }

        Ok(Some(BenchmarkSummary {
            images,
            passes,
            report_path: self.report_path.clone(),
            annotation_dir: self.annotation_dir.clone(),
        }))
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
