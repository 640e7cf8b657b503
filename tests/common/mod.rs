mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from facebench for tests
pub use facebench::{
    Benchmark, CanonicalBox, ChannelLayout, DetectionResult, DetectorError, DetectorLoader,
    FaceDetector, Frame, ImageRef, NativeBox, PassOutcome, Report,
};
