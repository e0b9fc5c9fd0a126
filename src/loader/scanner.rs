use std::path::{Path, PathBuf};

use colored::Colorize;
use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::config::TEST_FILE_PATTERNS;
use crate::loader::package::MANIFEST_FILE_NAME;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// Result of scanning files.
pub struct ScanResult {
    /// Source files in sorted path order.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// What to leave out of a scan.
pub struct ScanOptions<'a> {
    pub ignore_patterns: &'a [String],
    pub include_tests: bool,
    /// File name of the generated artifact, never scanned.
    pub output_file: &'a str,
    pub verbose: bool,
}

/// Collect the source files of the package rooted at `base_dir`.
///
/// Nested directories carrying their own `package.json` are separate
/// packages and are not descended into.
pub fn scan_files(base_dir: &Path, options: &ScanOptions) -> ScanResult {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in options.ignore_patterns {
        match Pattern::new(p) {
            Ok(pattern) => glob_patterns.push(pattern),
            Err(e) => {
                if options.verbose {
                    eprintln!(
                        "{} Invalid ignore pattern '{}': {}",
                        "warning:".bold().yellow(),
                        p,
                        e
                    );
                }
            }
        }
    }

    if !options.include_tests {
        for p in TEST_FILE_PATTERNS {
            if let Ok(pattern) = Pattern::new(p) {
                glob_patterns.push(pattern);
            }
        }
    }

    let walker = WalkDir::new(base_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_pruned_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                if options.verbose {
                    eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if entry.depth() == 1 && entry.file_name() == options.output_file {
            continue;
        }

        // Patterns are relative to the package root.
        let relative = path.strip_prefix(base_dir).unwrap_or(path);
        let path_str = relative.to_string_lossy().replace('\\', "/");
        if glob_patterns.iter().any(|p| p.matches(&path_str)) {
            continue;
        }

        if is_scannable_file(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();

    ScanResult {
        files,
        skipped_count,
    }
}

/// Directories excluded from the walk: dependencies, hidden directories and
/// nested packages. The root itself is never pruned.
fn is_pruned_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.')
        || SKIPPED_DIRS.contains(&name.as_ref())
        || entry.path().join(MANIFEST_FILE_NAME).is_file()
}

pub fn is_scannable_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts" | "tsx" | "mts" | "cts" | "js" | "jsx" | "mjs" | "cjs")
    )
}
