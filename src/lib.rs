pub mod acquisition;
pub mod annotate;
pub mod detection;
pub mod discovery;
pub mod models;
pub mod pipeline;
pub mod report;

pub use detection::{
    ChannelLayout, DetectorError, DetectorKind, DetectorOptions, ExecutionProvider, FaceDetector,
    Frame, NativeBox,
};
pub use models::{CanonicalBox, DetectionResult, ImageRef};
pub use pipeline::{Benchmark, BenchmarkSummary, DetectorLoader, KindLoader, PassOutcome, run_pass};
pub use report::Report;
