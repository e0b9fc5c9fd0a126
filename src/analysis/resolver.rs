//! Static resolution of a query argument to its textual form.

use swc_ecma_ast::{Expr, Lit};

use crate::analysis::walk::SymbolLookup;
use crate::symbols::eval::unwrap_ts_expr;

/// Resolve a query argument expression.
///
/// - a string literal, or a template without substitutions, yields its
///   source text verbatim (quotes and escapes included);
/// - an identifier naming a string constant yields the constant's value as a
///   double-quoted JSON string;
/// - anything else is not statically known.
pub fn resolve_query(arg: &Expr, lookup: &dyn SymbolLookup) -> Option<String> {
    match unwrap_ts_expr(arg) {
        Expr::Lit(Lit::Str(s)) => match &s.raw {
            Some(raw) => Some(raw.to_string()),
            None => s.value.as_str().and_then(canonical),
        },
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => {
            let raw: String = tpl.quasis.iter().map(|q| q.raw.as_str()).collect();
            Some(format!("`{}`", raw))
        }
        Expr::Ident(ident) => lookup.constant(&ident.sym).as_deref().and_then(canonical),
        _ => None,
    }
}

/// Canonical source form of a constant value.
pub fn canonical(value: &str) -> Option<String> {
    serde_json::to_string(value).ok()
}
