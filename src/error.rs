//! Fatal error taxonomy.
//!
//! Every variant terminates the run. Calls whose query argument cannot be
//! resolved are not errors and never reach this type.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    /// The target module could not be read or parsed.
    #[error("failed to load module \"{target}\": {reason}")]
    Load { target: String, reason: String },

    /// The target's source directory does not exist.
    #[error("failed to locate source directory of module \"{target}\" ({})", path.display())]
    PathResolution { target: String, path: PathBuf },

    #[error("failed to create file {}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write generated code to the file {}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PrepError {
    pub fn load(target: &str, reason: impl Into<String>) -> Self {
        Self::Load {
            target: target.to_string(),
            reason: reason.into(),
        }
    }
}
