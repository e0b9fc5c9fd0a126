//! CLI argument definitions using clap.
//!
//! ```text
//! prep -f <TARGET> [-t] [--source-root <DIR>] [--strict] [-v]
//! ```

use std::path::PathBuf;

use clap::{CommandFactory, Parser};

#[derive(Debug, Parser)]
#[command(name = "prep", author, version, long_about = None)]
#[command(about = "Generate the list of statically known SQL statements of a package")]
pub struct Arguments {
    /// Target package, as a directory relative to the source root
    #[arg(short = 'f', long = "from", value_name = "TARGET")]
    pub from: Option<String>,

    /// Also scan test sources
    #[arg(short = 't', long = "tests")]
    pub tests: bool,

    /// Source root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Only match calls whose receiver type declares the operation
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Arguments {
    /// Return the target if one was given, otherwise print help and return None.
    pub fn target_or_help(&self) -> Option<&str> {
        match self.from.as_deref() {
            Some(target) => Some(target),
            None => {
                Self::command().print_help().ok();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_short_flags() {
        let args = Arguments::try_parse_from(["prep", "-f", "services/users", "-t", "-v"]).unwrap();
        assert_eq!(args.from.as_deref(), Some("services/users"));
        assert!(args.tests);
        assert!(args.verbose);
        assert!(!args.strict);
        assert_eq!(args.source_root, None);
    }

    #[test]
    fn test_long_flags() {
        let args = Arguments::try_parse_from([
            "prep",
            "--from",
            "svc",
            "--tests",
            "--strict",
            "--source-root",
            "src",
        ])
        .unwrap();
        assert_eq!(args.from.as_deref(), Some("svc"));
        assert!(args.tests);
        assert!(args.strict);
        assert_eq!(args.source_root, Some(PathBuf::from("src")));
    }

    #[test]
    fn test_target_is_optional() {
        let args = Arguments::try_parse_from(["prep"]).unwrap();
        assert_eq!(args.from, None);
    }

    #[test]
    fn test_verify_cli() {
        Arguments::command().debug_assert();
    }
}
