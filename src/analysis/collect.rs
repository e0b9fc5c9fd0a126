//! The matching pipeline over a loaded program.

use crate::analysis::matcher::Matcher;
use crate::analysis::query_list::QueryList;
use crate::analysis::resolver::resolve_query;
use crate::analysis::walk::{Descend, walk_module};
use crate::loader::Program;

/// Resolved query arguments of every matched call, in traversal order
/// (files in path order, calls in pre-order).
pub fn collect_queries(program: &Program, matcher: &Matcher) -> Vec<String> {
    let mut found = Vec::new();

    for (file, source) in program.files.iter().enumerate() {
        walk_module(&source.module, &program.symbols, file, |view, env| {
            let Some(site) = matcher.match_call(&view, env) else {
                return Descend::Into;
            };
            if let Some(arg) = site.query_argument()
                && let Some(query) = resolve_query(arg, env)
            {
                found.push(query);
            }
            Descend::Skip
        });
    }

    found
}

/// Collect, deduplicate and order the queries of `program`.
pub fn prepare(program: &Program, matcher: &Matcher) -> QueryList {
    collect_queries(program, matcher).into_iter().collect()
}
