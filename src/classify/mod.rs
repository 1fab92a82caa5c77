// Classification subsystem: the pluggable multi-label classifier, the
// keyword heuristics, and the fusion rule that combines them.

pub mod download;
pub mod fusion;
pub mod keywords;
pub mod onnx;
pub mod traits;

pub use fusion::{aggregate_max, fuse, fuse_detailed, Degradation};
pub use traits::TextClassifier;
