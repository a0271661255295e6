//! codectx: lexical context extraction for React Native/TypeScript trees.
//!
//! The pipeline is pattern recognition over raw text, not parsing: a family
//! of regex-driven recognizers produces per-file fact bundles, an append-only
//! project index accumulates them, and a renderer emits one deterministic,
//! size-bounded report in the selected encoding.

pub mod config;
pub mod extractors;
pub mod index;
pub mod render;
pub mod runner;
pub mod scan;

pub use config::ExtractConfig;
pub use index::ProjectIndex;
pub use render::ReportFormat;
pub use runner::{run, CancelToken, RunOutcome, RunStats};
