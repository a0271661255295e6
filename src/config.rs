//! Run configuration.
//!
//! Defaults mirror a typical Expo/React Native workspace layout. All checks
//! here fail fast, before any file is opened.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::ReportFormat;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;
pub const DEFAULT_MAX_LINES: usize = 15_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reportable line budget must be positive")]
    ZeroLineBudget,
    #[error("unknown output format: {0} (expected plain, tree, outline or hypertext)")]
    UnknownFormat(String),
    #[error("no file extensions configured")]
    NoExtensions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// File extensions eligible for extraction, with leading dot.
    pub extensions: Vec<String>,
    /// Directory names (or path fragments) that are never descended into.
    pub exclude_dirs: Vec<String>,
    /// Path fragments that exclude an individual file.
    pub exclude_files: Vec<String>,
    /// When non-empty, only paths containing one of these fragments are kept.
    pub include_dirs: Vec<String>,
    pub max_file_size: u64,
    /// Budget for the report's reportable lines; the sole early-stop gate.
    pub max_lines: usize,
    pub format: ReportFormat,
    pub enable_performance_heuristics: bool,
    pub enable_platform_heuristics: bool,
    pub enable_data_flow_tracking: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            extensions: [".tsx", ".ts", ".js", ".jsx", ".json"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_dirs: [
                "node_modules",
                "__tests__",
                "coverage",
                "build",
                "dist",
                "android",
                "ios",
                ".expo",
                ".expo-shared",
                ".git",
                ".github",
                "web-build",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            exclude_files: [
                ".test.",
                ".spec.",
                ".min.js",
                ".map",
                "setup.js",
                ".gitignore",
                "package-lock.json",
                ".env",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            include_dirs: vec!["app".to_string(), "src".to_string()],
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_lines: DEFAULT_MAX_LINES,
            format: ReportFormat::Plain,
            enable_performance_heuristics: false,
            enable_platform_heuristics: false,
            enable_data_flow_tracking: false,
        }
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lines == 0 {
            return Err(ConfigError::ZeroLineBudget);
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        Ok(())
    }

    /// Extra user-supplied paths merged on top of the defaults.
    pub fn with_extra_paths(mut self, exclude: Vec<String>, include: Vec<String>) -> Self {
        self.exclude_dirs.extend(exclude);
        self.include_dirs.extend(include);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ExtractConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_budget_is_rejected() {
        let config = ExtractConfig {
            max_lines: 0,
            ..ExtractConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroLineBudget)
        ));
    }

    #[test]
    fn extra_paths_are_appended() {
        let config = ExtractConfig::default()
            .with_extra_paths(vec!["fixtures".into()], vec!["packages".into()]);
        assert!(config.exclude_dirs.iter().any(|d| d == "fixtures"));
        assert!(config.include_dirs.iter().any(|d| d == "packages"));
    }
}
