//! One generation run: config, load, analyze, render, write.

use std::{
    env,
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;

use super::args::Arguments;
use crate::analysis::{Matcher, prepare};
use crate::catalog::{MatchPolicy, OperationCatalog};
use crate::config::{CONFIG_FILE_NAME, load_config};
use crate::emit::render;
use crate::error::PrepError;
use crate::loader::{LoadOptions, load};

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunSummary {
    pub output: PathBuf,
    pub query_count: usize,
}

pub fn run(args: &Arguments, target: &str) -> Result<RunSummary> {
    let cwd = env::current_dir().context("Failed to read the working directory")?;
    run_in(&cwd, args, target)
}

/// Run with `cwd` as the directory the config lookup starts from.
pub fn run_in(cwd: &Path, args: &Arguments, target: &str) -> Result<RunSummary> {
    let config_result = load_config(cwd)?;
    if args.verbose && !config_result.from_file {
        eprintln!(
            "{} no {} found, using default configuration",
            "note:".bold().cyan(),
            CONFIG_FILE_NAME
        );
    }

    let source_root = match &args.source_root {
        Some(root) if root.is_absolute() => root.clone(),
        Some(root) => cwd.join(root),
        None => config_result.source_root(),
    };
    let config = &config_result.config;

    let policy = if args.strict {
        MatchPolicy::Conformant
    } else {
        config.match_policy
    };
    let catalog = OperationCatalog::with_extra(&config.operations);
    let matcher = Matcher::new(&catalog, policy, &config.capability_types);

    let program = load(
        target,
        &LoadOptions {
            source_root: &source_root,
            include_tests: args.tests,
            ignores: &config.ignores,
            output_file: &config.output_file,
            verbose: args.verbose,
        },
    )?;

    let queries = prepare(&program, &matcher);
    if args.verbose {
        eprintln!(
            "{} {} distinct statement(s) across {} file(s) ({:?} matching)",
            "note:".bold().cyan(),
            queries.len(),
            program.files.len(),
            policy
        );
    }

    let rendered = render(&program.target, &program.name, &config.variable, &queries);
    let output = program.dir.join(&config.output_file);
    write_output(&output, &rendered)?;

    Ok(RunSummary {
        output,
        query_count: queries.len(),
    })
}

fn write_output(path: &Path, content: &str) -> Result<(), PrepError> {
    let mut file = File::create(path).map_err(|source| PrepError::CreateOutput {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(content.as_bytes())
        .map_err(|source| PrepError::WriteOutput {
            path: path.to_path_buf(),
            source,
        })
}
