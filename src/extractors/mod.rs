//! The recognizer family and the per-file aggregator.
//!
//! Every recognizer is a pure function over raw file text: deterministic,
//! side-effect free, and tolerant of malformed input (unmatched text is
//! simply not reported). The aggregator in [`manager`] runs them all over
//! one file and derives the combined facts.

pub mod base;
pub mod call_sites;
pub mod components;
pub mod endpoints;
pub mod heuristics;
pub mod hooks;
pub mod imports;
pub mod manager;
pub mod navigation;
pub mod schema;
pub mod security;
pub mod services;
pub mod state;
pub mod styles;
pub mod types_ts;
