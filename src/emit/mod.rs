//! Rendering of the generated statement list module.

use std::fmt::Write as _;

use crate::analysis::QueryList;

/// Tool name written into the generated header.
pub const GENERATOR: &str = "prep";

const INDENT: &str = "  ";

/// Render the generated module for `target`.
///
/// `declared_name` is the target package's declared name and `variable` the
/// exported list the target reads at start-up. Each entry is written exactly
/// as resolved.
pub fn render(target: &str, declared_name: &str, variable: &str, queries: &QueryList) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "// Code generated by {}. DO NOT EDIT.", GENERATOR);
    let _ = writeln!(out, "//{0}:generate {0} -f {1}", GENERATOR, target);
    out.push('\n');
    let _ = writeln!(out, "/** @module {} */", declared_name);
    out.push('\n');
    let _ = writeln!(out, "export let {}: string[] = [];", variable);
    out.push('\n');
    out.push_str("function init(): void {\n");

    if queries.is_empty() {
        let _ = writeln!(out, "{}{} = [];", INDENT, variable);
    } else {
        let _ = writeln!(out, "{}{} = [", INDENT, variable);
        for query in queries.iter() {
            let _ = writeln!(out, "{0}{0}{1},", INDENT, query);
        }
        let _ = writeln!(out, "{}];", INDENT);
    }

    out.push_str("}\n");
    out.push('\n');
    out.push_str("init();\n");
    out
}
