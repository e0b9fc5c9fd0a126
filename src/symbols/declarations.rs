//! Extraction of value declarations from statements and patterns.
//!
//! Both the module-level symbol table and the nested scopes built during
//! traversal use these helpers, so a name is declared the same way wherever
//! it appears.

use swc_ecma_ast::{
    BindingIdent, Decl, Expr, ForHead, ModuleDecl, ModuleItem, ObjectPatProp, Pat, Stmt,
    TsEntityName, TsType, TsTypeAnn, VarDecl, VarDeclKind, VarDeclOrExpr,
};

use crate::symbols::eval::unwrap_ts_expr;

/// What a declared name is bound to.
#[derive(Debug, Clone, Copy)]
pub enum Declared<'a> {
    /// `const name = <init>`; whether it is a string constant is decided later.
    Const(&'a Expr),
    /// Any other binding: `let`, `var`, parameters, functions, classes.
    Other,
}

#[derive(Debug, Clone)]
pub struct Declaration<'a> {
    pub name: String,
    pub declared: Declared<'a>,
    /// Statically known type name, used for receiver conformance.
    pub type_name: Option<String>,
}

impl<'a> Declaration<'a> {
    pub fn other(name: String, type_name: Option<String>) -> Self {
        Self {
            name,
            declared: Declared::Other,
            type_name,
        }
    }
}

/// Name of a referenced type: `Pool`, `Queryer<Row>`, `pg.Pool` → `Pool`.
pub fn type_ref_name(ts_type: &TsType) -> Option<String> {
    match ts_type {
        TsType::TsTypeRef(type_ref) => Some(entity_name(&type_ref.type_name)),
        TsType::TsParenthesizedType(paren) => type_ref_name(&paren.type_ann),
        _ => None,
    }
}

pub fn entity_name(entity: &TsEntityName) -> String {
    match entity {
        TsEntityName::Ident(ident) => ident.sym.to_string(),
        TsEntityName::TsQualifiedName(qualified) => qualified.right.sym.to_string(),
    }
}

pub fn annotation_name(type_ann: &Option<Box<TsTypeAnn>>) -> Option<String> {
    type_ann.as_ref().and_then(|ann| type_ref_name(&ann.type_ann))
}

/// A plain binding such as a parameter: never a constant, typed by its annotation.
pub fn binding_ident_declaration<'a>(binding: &BindingIdent) -> Declaration<'a> {
    Declaration::other(binding.id.sym.to_string(), annotation_name(&binding.type_ann))
}

/// Type implied by an initializer: `new Pool()`, `x as Pool`, `<Pool>x`.
pub fn init_type_name(init: &Expr) -> Option<String> {
    match init {
        Expr::TsAs(ts_as) => type_ref_name(&ts_as.type_ann),
        Expr::TsTypeAssertion(assert) => type_ref_name(&assert.type_ann),
        Expr::Paren(paren) => init_type_name(&paren.expr),
        Expr::New(new_expr) => match unwrap_ts_expr(&new_expr.callee) {
            Expr::Ident(ident) => Some(ident.sym.to_string()),
            Expr::Member(member) => member.prop.as_ident().map(|p| p.sym.to_string()),
            _ => None,
        },
        _ => None,
    }
}

pub fn collect_var_decl<'a>(node: &'a VarDecl, out: &mut Vec<Declaration<'a>>) {
    for decl in &node.decls {
        let Pat::Ident(binding) = &decl.name else {
            collect_pat(&decl.name, out);
            continue;
        };

        let type_name = annotation_name(&binding.type_ann)
            .or_else(|| decl.init.as_deref().and_then(init_type_name));
        let declared = match (&node.kind, &decl.init) {
            (VarDeclKind::Const, Some(init)) => Declared::Const(init),
            _ => Declared::Other,
        };

        out.push(Declaration {
            name: binding.id.sym.to_string(),
            declared,
            type_name,
        });
    }
}

/// Names bound by a pattern (parameters, destructuring, catch clauses).
pub fn collect_pat<'a>(pat: &'a Pat, out: &mut Vec<Declaration<'a>>) {
    match pat {
        Pat::Ident(binding) => out.push(binding_ident_declaration(binding)),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_pat(elem, out);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_pat(&kv.value, out),
                    ObjectPatProp::Assign(assign) => {
                        out.push(Declaration::other(assign.key.id.sym.to_string(), None))
                    }
                    ObjectPatProp::Rest(rest) => collect_pat(&rest.arg, out),
                }
            }
        }
        Pat::Rest(rest) => collect_pat(&rest.arg, out),
        Pat::Assign(assign) => collect_pat(&assign.left, out),
        Pat::Expr(_) | Pat::Invalid(_) => {}
    }
}

pub fn collect_decl<'a>(decl: &'a Decl, out: &mut Vec<Declaration<'a>>) {
    match decl {
        Decl::Var(var) => collect_var_decl(var, out),
        Decl::Fn(f) => out.push(Declaration::other(f.ident.sym.to_string(), None)),
        Decl::Class(c) => out.push(Declaration::other(c.ident.sym.to_string(), None)),
        Decl::TsEnum(e) => out.push(Declaration::other(e.id.sym.to_string(), None)),
        Decl::Using(using) => {
            for d in &using.decls {
                collect_pat(&d.name, out);
            }
        }
        // Type-only declarations never shadow values.
        _ => {}
    }
}

pub fn collect_stmts<'a>(stmts: &'a [Stmt], out: &mut Vec<Declaration<'a>>) {
    for stmt in stmts {
        if let Stmt::Decl(decl) = stmt {
            collect_decl(decl, out);
        }
    }
}

/// Declarations of a function body: its own statements plus every `var`
/// nested in its blocks, which belongs to the function.
pub fn collect_body_stmts<'a>(stmts: &'a [Stmt], out: &mut Vec<Declaration<'a>>) {
    collect_stmts(stmts, out);
    for stmt in stmts {
        if !matches!(stmt, Stmt::Decl(_)) {
            collect_hoisted_vars(stmt, out);
        }
    }
}

/// Declarations of a module or namespace body, nested `var`s included.
pub fn collect_module_items<'a>(items: &'a [ModuleItem], out: &mut Vec<Declaration<'a>>) {
    for item in items {
        match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => collect_decl(decl, out),
            ModuleItem::Stmt(stmt) => collect_hoisted_vars(stmt, out),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                collect_decl(&export.decl, out)
            }
            ModuleItem::ModuleDecl(_) => {}
        }
    }
}

/// `var` declarations inside `stmt`, without entering nested functions.
pub fn collect_hoisted_vars<'a>(stmt: &'a Stmt, out: &mut Vec<Declaration<'a>>) {
    match stmt {
        Stmt::Decl(Decl::Var(var)) => hoist_var(var, out),
        Stmt::Block(block) => {
            for stmt in &block.stmts {
                collect_hoisted_vars(stmt, out);
            }
        }
        Stmt::If(if_stmt) => {
            collect_hoisted_vars(&if_stmt.cons, out);
            if let Some(alt) = &if_stmt.alt {
                collect_hoisted_vars(alt, out);
            }
        }
        Stmt::For(for_stmt) => {
            if let Some(VarDeclOrExpr::VarDecl(var)) = &for_stmt.init {
                hoist_var(var, out);
            }
            collect_hoisted_vars(&for_stmt.body, out);
        }
        Stmt::ForIn(for_in) => {
            if let ForHead::VarDecl(var) = &for_in.left {
                hoist_var(var, out);
            }
            collect_hoisted_vars(&for_in.body, out);
        }
        Stmt::ForOf(for_of) => {
            if let ForHead::VarDecl(var) = &for_of.left {
                hoist_var(var, out);
            }
            collect_hoisted_vars(&for_of.body, out);
        }
        Stmt::While(while_stmt) => collect_hoisted_vars(&while_stmt.body, out),
        Stmt::DoWhile(do_while) => collect_hoisted_vars(&do_while.body, out),
        Stmt::Labeled(labeled) => collect_hoisted_vars(&labeled.body, out),
        Stmt::With(with) => collect_hoisted_vars(&with.body, out),
        Stmt::Try(try_stmt) => {
            for stmt in &try_stmt.block.stmts {
                collect_hoisted_vars(stmt, out);
            }
            if let Some(handler) = &try_stmt.handler {
                for stmt in &handler.body.stmts {
                    collect_hoisted_vars(stmt, out);
                }
            }
            if let Some(finalizer) = &try_stmt.finalizer {
                for stmt in &finalizer.stmts {
                    collect_hoisted_vars(stmt, out);
                }
            }
        }
        Stmt::Switch(switch) => {
            for stmt in switch.cases.iter().flat_map(|case| &case.cons) {
                collect_hoisted_vars(stmt, out);
            }
        }
        _ => {}
    }
}

/// A hoisted `var` is never folded: its value depends on control flow.
fn hoist_var<'a>(var: &'a VarDecl, out: &mut Vec<Declaration<'a>>) {
    if var.kind != VarDeclKind::Var {
        return;
    }
    for decl in &var.decls {
        collect_pat(&decl.name, out);
    }
}
