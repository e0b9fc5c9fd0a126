//! Loads a target package: locates it under the source root, scans its
//! source files and parses each one.

pub mod package;
pub mod parser;
pub mod scanner;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use colored::Colorize;
use swc_common::SourceMap;
use swc_ecma_ast::Module;

use crate::error::PrepError;
use crate::loader::scanner::{ScanOptions, scan_files};
use crate::symbols::SymbolTable;

/// One parsed source file of the target.
pub struct SourceFile {
    pub path: PathBuf,
    pub module: Module,
}

/// A loaded target package.
pub struct Program {
    /// Identifier the target was requested by.
    pub target: String,
    /// Declared package name.
    pub name: String,
    /// Directory holding the target's sources.
    pub dir: PathBuf,
    /// Parsed files in sorted path order.
    pub files: Vec<SourceFile>,
    pub symbols: SymbolTable,
}

pub struct LoadOptions<'a> {
    pub source_root: &'a Path,
    pub include_tests: bool,
    pub ignores: &'a [String],
    pub output_file: &'a str,
    pub verbose: bool,
}

/// Locate, scan and parse the target package `target`.
pub fn load(target: &str, options: &LoadOptions) -> Result<Program, PrepError> {
    // The identifier is echoed on a line comment of the generated module.
    if target.chars().any(char::is_control) {
        return Err(PrepError::load(
            target,
            "module identifier contains a control character",
        ));
    }

    let dir = options.source_root.join(target);
    if !dir.is_dir() {
        return Err(PrepError::PathResolution {
            target: target.to_string(),
            path: dir,
        });
    }

    let scan = scan_files(
        &dir,
        &ScanOptions {
            ignore_patterns: options.ignores,
            include_tests: options.include_tests,
            output_file: options.output_file,
            verbose: options.verbose,
        },
    );
    if scan.skipped_count > 0 {
        eprintln!(
            "{} {} path(s) could not be read and were skipped",
            "warning:".bold().yellow(),
            scan.skipped_count
        );
    }
    if scan.files.is_empty() {
        return Err(PrepError::load(
            target,
            format!("no source files found in {}", dir.display()),
        ));
    }

    let source_map = Arc::new(SourceMap::default());
    let mut files = Vec::with_capacity(scan.files.len());
    for path in scan.files {
        let code = fs::read_to_string(&path)
            .map_err(|e| PrepError::load(target, format!("{}: {}", path.display(), e)))?;
        let module = parser::parse_source(code, &path, &source_map)
            .map_err(|e| PrepError::load(target, e.to_string()))?;
        files.push(SourceFile { path, module });
    }

    if options.verbose {
        eprintln!(
            "{} loaded {} source file(s) from {}",
            "note:".bold().cyan(),
            files.len(),
            dir.display()
        );
    }

    let symbols = {
        let refs: Vec<(&Path, &Module)> = files
            .iter()
            .map(|file| (file.path.as_path(), &file.module))
            .collect();
        SymbolTable::build(&refs)
    };

    Ok(Program {
        target: target.to_string(),
        name: package::declared_name(&dir),
        dir,
        files,
        symbols,
    })
}

/// Build a program from in-memory sources, in the given order.
#[cfg(test)]
pub(crate) fn program_from_sources(sources: &[(&str, &str)]) -> Program {
    let source_map = Arc::new(SourceMap::default());
    let files: Vec<SourceFile> = sources
        .iter()
        .map(|(path, code)| {
            let path = PathBuf::from(path);
            let module = parser::parse_source(code.to_string(), &path, &source_map).unwrap();
            SourceFile { path, module }
        })
        .collect();
    let refs: Vec<(&Path, &Module)> = files
        .iter()
        .map(|file| (file.path.as_path(), &file.module))
        .collect();
    let symbols = SymbolTable::build(&refs);
    Program {
        target: "pkg".to_string(),
        name: "pkg".to_string(),
        dir: PathBuf::from("pkg"),
        files,
        symbols,
    }
}
