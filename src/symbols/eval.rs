//! Compile-time evaluation of string constant initializers.

use swc_ecma_ast::{BinaryOp, Expr, Lit, Tpl};

/// Unwrap TypeScript-specific expression wrappers to get the inner expression.
pub fn unwrap_ts_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::TsAs(ts_as) => unwrap_ts_expr(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_ts_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_ts_expr(&ts_sat.expr),
        Expr::TsNonNull(ts_non_null) => unwrap_ts_expr(&ts_non_null.expr),
        Expr::TsTypeAssertion(ts_assert) => unwrap_ts_expr(&ts_assert.expr),
        Expr::Paren(paren) => unwrap_ts_expr(&paren.expr),
        _ => expr,
    }
}

/// Fold a constant initializer to its string value.
///
/// Handles string literals, templates, `+` concatenation and references to
/// other constants (through `lookup`). Anything else, including numbers and
/// strings with lone surrogates, is not a string constant.
pub fn eval_const_string(
    expr: &Expr,
    lookup: &mut dyn FnMut(&str) -> Option<String>,
) -> Option<String> {
    match unwrap_ts_expr(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
        Expr::Tpl(tpl) => eval_template(tpl, lookup),
        Expr::Bin(bin) if bin.op == BinaryOp::Add => {
            let left = eval_const_string(&bin.left, lookup)?;
            let right = eval_const_string(&bin.right, lookup)?;
            Some(left + right.as_str())
        }
        Expr::Ident(ident) => lookup(ident.sym.as_str()),
        _ => None,
    }
}

fn eval_template(tpl: &Tpl, lookup: &mut dyn FnMut(&str) -> Option<String>) -> Option<String> {
    let mut value = String::new();
    for (i, quasi) in tpl.quasis.iter().enumerate() {
        value.push_str(quasi.cooked.as_ref()?.as_str()?);
        if let Some(expr) = tpl.exprs.get(i) {
            value.push_str(&eval_const_string(expr, lookup)?);
        }
    }
    Some(value)
}
