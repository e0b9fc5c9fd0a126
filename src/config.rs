use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::catalog::{MatchPolicy, OperationSpec};

pub const CONFIG_FILE_NAME: &str = ".preprc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.test.mts",
    "**/*.test.cts",
    "**/*.test.mjs",
    "**/*.test.cjs",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/*.spec.mts",
    "**/*.spec.cts",
    "**/*.spec.mjs",
    "**/*.spec.cjs",
    "**/__tests__/**",
];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default = "default_variable")]
    pub variable: String,
    #[serde(default)]
    pub operations: Vec<OperationSpec>,
    #[serde(default)]
    pub match_policy: MatchPolicy,
    #[serde(default)]
    pub capability_types: Vec<String>,
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_output_file() -> String {
    "prepared_statements.ts".to_string()
}

fn default_variable() -> String {
    "prepStatements".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            ignores: Vec::new(),
            output_file: default_output_file(),
            variable: default_variable(),
            operations: Vec::new(),
            match_policy: MatchPolicy::default(),
            capability_types: Vec::new(),
        }
    }
}

/// Whether `name` is usable as a plain JavaScript identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if !is_identifier(&self.variable) {
            bail!("Invalid identifier in 'variable': \"{}\"", self.variable);
        }

        for op in &self.operations {
            if !is_identifier(&op.name) {
                bail!("Invalid operation name in 'operations': \"{}\"", op.name);
            }
        }

        if self.output_file.is_empty()
            || self.output_file.contains(['/', '\\'])
            || self.output_file == "."
            || self.output_file == ".."
        {
            bail!(
                "Invalid file name in 'outputFile': \"{}\" (must be a plain file name)",
                self.output_file
            );
        }

        Ok(())
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory holding the config file; the working directory for defaults.
    pub base_dir: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

impl ConfigLoadResult {
    /// Source root resolved against the config file's directory.
    pub fn source_root(&self) -> PathBuf {
        let p = Path::new(&self.config.source_root);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
            self.base_dir.join(rel)
        }
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                base_dir,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            base_dir: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}
