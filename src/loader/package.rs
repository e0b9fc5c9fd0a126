//! Target package metadata from `package.json`.

use std::{fs, path::Path};

use serde::Deserialize;

pub const MANIFEST_FILE_NAME: &str = "package.json";

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    name: Option<String>,
}

/// Declared name of the package rooted at `dir`: the manifest's `name`, or
/// the directory's own name when there is no usable manifest.
///
/// The name ends up inside a block comment of the generated module, so a
/// manifest name that could close the comment or break the line is not used.
pub fn declared_name(dir: &Path) -> String {
    let manifest_name = fs::read_to_string(dir.join(MANIFEST_FILE_NAME))
        .ok()
        .and_then(|content| serde_json::from_str::<PackageManifest>(&content).ok())
        .and_then(|manifest| manifest.name)
        .filter(|name| !name.trim().is_empty() && is_comment_safe(name));

    manifest_name.unwrap_or_else(|| {
        dir.file_name()
            .map(|n| {
                n.to_string_lossy()
                    .chars()
                    .map(|c| if c.is_control() { '_' } else { c })
                    .collect()
            })
            .unwrap_or_default()
    })
}

fn is_comment_safe(text: &str) -> bool {
    !text.contains("*/") && !text.chars().any(char::is_control)
}
