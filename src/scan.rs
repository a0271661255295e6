//! Source-tree discovery.
//!
//! Walks the project root and yields the eligible files in a stable order.
//! Exclusion happens here, before any file content is read; the extraction
//! stage never sees a path this module filtered out.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::ExtractConfig;

/// A file selected for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the scanned root, with `/` separators.
    pub rel_path: String,
}

fn rel_path_of(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        parts.push(component.as_os_str().to_str()?.to_string());
    }
    Some(parts.join("/"))
}

fn dir_excluded(name: &str, rel_path: &str, config: &ExtractConfig) -> bool {
    config
        .exclude_dirs
        .iter()
        .any(|d| name == d || rel_path.contains(d.as_str()))
}

fn file_included(rel_path: &str, config: &ExtractConfig) -> bool {
    let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);

    if !config.extensions.iter().any(|ext| file_name.ends_with(ext)) {
        return false;
    }
    if config.exclude_files.iter().any(|f| file_name.contains(f)) {
        return false;
    }
    // Root-level files (package.json and friends) are always eligible; deeper
    // files must sit under one of the include dirs when any are configured.
    if !rel_path.contains('/') || config.include_dirs.is_empty() {
        return true;
    }
    rel_path
        .split('/')
        .any(|part| config.include_dirs.iter().any(|d| part == d))
}

/// Collect every eligible file under `root`, sorted by relative path.
///
/// Unreadable directory entries are logged and skipped; discovery keeps
/// going.
pub fn collect_files(root: &Path, config: &ExtractConfig) -> Result<Vec<SourceFile>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("cannot resolve scan root {}", root.display()))?;

    let walker = WalkDir::new(&root).into_iter().filter_entry(|entry| {
        if !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        let rel = rel_path_of(&root, entry.path()).unwrap_or_default();
        if !rel.is_empty() && dir_excluded(&name, &rel, config) {
            debug!(dir = %rel, "excluded directory");
            return false;
        }
        true
    });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(rel_path) = rel_path_of(&root, entry.path()) else {
            continue;
        };
        if !file_included(&rel_path, config) {
            continue;
        }
        match entry.metadata() {
            Ok(meta) if meta.len() > config.max_file_size => {
                debug!(file = %rel_path, size = meta.len(), "excluded oversized file");
                continue;
            }
            Ok(_) => {}
            Err(err) => {
                warn!(file = %rel_path, error = %err, "skipping unstatable file");
                continue;
            }
        }
        files.push(SourceFile {
            path: entry.path().to_path_buf(),
            rel_path,
        });
    }

    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export const X = 1;").unwrap();
    }

    #[test]
    fn walks_include_dirs_and_skips_excluded_trees() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "src/App.tsx");
        touch(root, "app/index.ts");
        touch(root, "node_modules/lib/index.ts");
        touch(root, "docs/notes.ts");
        touch(root, "package.json");

        let files = collect_files(root, &ExtractConfig::default()).unwrap();
        let rels: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(rels, vec!["app/index.ts", "package.json", "src/App.tsx"]);
    }

    #[test]
    fn exclude_file_fragments_apply_to_names() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "src/App.tsx");
        touch(root, "src/App.test.tsx");
        touch(root, "src/App.spec.ts");

        let files = collect_files(root, &ExtractConfig::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].rel_path, "src/App.tsx");
    }

    #[test]
    fn oversized_files_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "src/small.ts");
        let big = root.join("src/big.ts");
        fs::write(&big, "x".repeat(64)).unwrap();

        let config = ExtractConfig {
            max_file_size: 32,
            ..ExtractConfig::default()
        };
        let files = collect_files(root, &config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].rel_path, "src/small.ts");
    }

    #[test]
    fn ordering_is_stable_by_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for name in ["src/b.ts", "src/a.ts", "app/z.ts"] {
            touch(root, name);
        }
        let files = collect_files(root, &ExtractConfig::default()).unwrap();
        let rels: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(rels, vec!["app/z.ts", "src/a.ts", "src/b.ts"]);
    }
}
