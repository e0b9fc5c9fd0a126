//! Depth-first walk over a module that reports every call expression.
//!
//! The walker keeps the lexical scopes of the file up to date so a callback
//! can ask, at the moment a call is reported, what a name denotes there.

use std::collections::HashMap;

use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CallExpr, Callee, CatchClause, Class, ClassExpr,
    ClassMember, Constructor, Expr, ExprOrSpread, FnExpr, ForHead, ForInStmt, ForOfStmt,
    ForStmt, Function, Ident, MemberProp, Module, OptChainBase, OptChainExpr, ParamOrTsParamProp,
    PropName, SwitchStmt, TsModuleBlock, TsParamPropParam, VarDeclOrExpr,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::symbols::SymbolTable;
use crate::symbols::declarations::{
    Declaration, annotation_name, binding_ident_declaration, collect_body_stmts,
    collect_module_items, collect_pat, collect_stmts, collect_var_decl, init_type_name,
    type_ref_name,
};
use crate::symbols::eval::unwrap_ts_expr;
use crate::symbols::scope::ScopeStack;

/// Whether the walk continues into the children of a reported call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    Into,
    Skip,
}

/// A call expression as seen by the callback: `callee(args...)`.
#[derive(Debug, Clone, Copy)]
pub struct CallView<'n> {
    pub callee: &'n Expr,
    pub args: &'n [ExprOrSpread],
}

/// Name lookups available at a call site.
pub trait SymbolLookup {
    /// String value of the constant `name` refers to here.
    fn constant(&self, name: &str) -> Option<String>;

    /// Statically known type name of `expr`.
    fn type_of(&self, expr: &Expr) -> Option<String>;

    /// Whether the named type declares `member`.
    fn declares(&self, type_name: &str, member: &str) -> bool;
}

/// Symbol state at the current position of the walk.
pub struct Env<'s> {
    symbols: &'s SymbolTable,
    file: usize,
    scopes: ScopeStack,
    /// Member types of the enclosing classes, innermost last.
    class_members: Vec<HashMap<String, String>>,
}

impl<'s> Env<'s> {
    fn new(symbols: &'s SymbolTable, file: usize) -> Self {
        Self {
            symbols,
            file,
            scopes: ScopeStack::new(),
            class_members: Vec::new(),
        }
    }

    fn binding_type(&self, name: &str) -> Option<String> {
        match self.scopes.get_binding(name) {
            Some(binding) => binding.type_name.clone(),
            None => self
                .symbols
                .module_binding(self.file, name)
                .and_then(|binding| binding.type_name.clone()),
        }
    }
}

impl SymbolLookup for Env<'_> {
    fn constant(&self, name: &str) -> Option<String> {
        match self.scopes.get_binding(name) {
            Some(binding) => binding.constant.clone(),
            None => self.symbols.constant(self.file, name).map(str::to_string),
        }
    }

    fn type_of(&self, expr: &Expr) -> Option<String> {
        if let Some(type_name) = init_type_name(expr) {
            return Some(type_name);
        }
        match unwrap_ts_expr(expr) {
            Expr::Ident(ident) => self.binding_type(&ident.sym),
            Expr::Member(member) if matches!(&*member.obj, Expr::This(_)) => {
                let MemberProp::Ident(prop) = &member.prop else {
                    return None;
                };
                self.class_members.last()?.get(prop.sym.as_str()).cloned()
            }
            _ => None,
        }
    }

    fn declares(&self, type_name: &str, member: &str) -> bool {
        self.symbols.declares(type_name, member)
    }
}

struct Walker<'s, F> {
    env: Env<'s>,
    on_call: F,
}

impl<'s, F> Walker<'s, F>
where
    F: FnMut(CallView<'_>, &Env<'s>) -> Descend,
{
    fn with_scope(&mut self, declarations: &[Declaration<'_>], body: impl FnOnce(&mut Self)) {
        let symbols = self.env.symbols;
        let file = self.env.file;
        self.env
            .scopes
            .enter_with_declarations(declarations, &|name: &str| {
                symbols.constant(file, name).map(str::to_string)
            });
        body(self);
        self.env.scopes.exit_scope();
    }

    /// Scope holding only the own name of a function or class expression.
    fn with_own_name(&mut self, ident: Option<&Ident>, body: impl FnOnce(&mut Self)) {
        match ident {
            Some(ident) => {
                let own = [Declaration::other(ident.sym.to_string(), None)];
                self.with_scope(&own, body);
            }
            None => body(self),
        }
    }

    fn report(&mut self, view: CallView<'_>) -> Descend {
        (self.on_call)(view, &self.env)
    }
}

/// Member types declared by a class body: typed properties, properties
/// initialized with `new T()` and constructor parameter properties.
fn class_member_types(class: &Class) -> HashMap<String, String> {
    let mut members = HashMap::new();
    for member in &class.body {
        match member {
            ClassMember::ClassProp(prop) => {
                let PropName::Ident(key) = &prop.key else {
                    continue;
                };
                let type_name = annotation_name(&prop.type_ann)
                    .or_else(|| prop.value.as_deref().and_then(init_type_name));
                if let Some(type_name) = type_name {
                    members.insert(key.sym.to_string(), type_name);
                }
            }
            ClassMember::Constructor(ctor) => {
                for param in &ctor.params {
                    let ParamOrTsParamProp::TsParamProp(prop) = param else {
                        continue;
                    };
                    let binding = match &prop.param {
                        TsParamPropParam::Ident(binding) => binding,
                        TsParamPropParam::Assign(assign) => match &*assign.left {
                            swc_ecma_ast::Pat::Ident(binding) => binding,
                            _ => continue,
                        },
                    };
                    if let Some(type_name) = binding
                        .type_ann
                        .as_ref()
                        .and_then(|ann| type_ref_name(&ann.type_ann))
                    {
                        members.insert(binding.id.sym.to_string(), type_name);
                    }
                }
            }
            _ => {}
        }
    }
    members
}

impl<'s, F> Visit for Walker<'s, F>
where
    F: FnMut(CallView<'_>, &Env<'s>) -> Descend,
{
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee {
            let view = CallView {
                callee,
                args: &node.args,
            };
            if self.report(view) == Descend::Skip {
                return;
            }
        }
        node.visit_children_with(self);
    }

    fn visit_opt_chain_expr(&mut self, node: &OptChainExpr) {
        if let OptChainBase::Call(call) = &*node.base {
            let view = CallView {
                callee: &call.callee,
                args: &call.args,
            };
            if self.report(view) == Descend::Skip {
                return;
            }
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, node: &Function) {
        let mut declarations = Vec::new();
        for param in &node.params {
            collect_pat(&param.pat, &mut declarations);
        }
        if let Some(body) = &node.body {
            collect_body_stmts(&body.stmts, &mut declarations);
        }
        self.with_scope(&declarations, |this| {
            node.decorators.visit_with(this);
            node.params.visit_with(this);
            if let Some(body) = &node.body {
                body.stmts.visit_with(this);
            }
        });
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let mut declarations = Vec::new();
        for param in &node.params {
            collect_pat(param, &mut declarations);
        }
        if let BlockStmtOrExpr::BlockStmt(body) = &*node.body {
            collect_body_stmts(&body.stmts, &mut declarations);
        }
        self.with_scope(&declarations, |this| {
            node.params.visit_with(this);
            match &*node.body {
                BlockStmtOrExpr::BlockStmt(body) => body.stmts.visit_with(this),
                BlockStmtOrExpr::Expr(expr) => expr.visit_with(this),
            }
        });
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        let mut declarations = Vec::new();
        for param in &node.params {
            match param {
                ParamOrTsParamProp::Param(param) => collect_pat(&param.pat, &mut declarations),
                ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                    TsParamPropParam::Ident(binding) => {
                        declarations.push(binding_ident_declaration(binding))
                    }
                    TsParamPropParam::Assign(assign) => collect_pat(&assign.left, &mut declarations),
                },
            }
        }
        if let Some(body) = &node.body {
            collect_body_stmts(&body.stmts, &mut declarations);
        }
        self.with_scope(&declarations, |this| {
            node.params.visit_with(this);
            if let Some(body) = &node.body {
                body.stmts.visit_with(this);
            }
        });
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        let mut declarations = Vec::new();
        collect_stmts(&node.stmts, &mut declarations);
        self.with_scope(&declarations, |this| node.stmts.visit_with(this));
    }

    fn visit_switch_stmt(&mut self, node: &SwitchStmt) {
        node.discriminant.visit_with(self);
        let mut declarations = Vec::new();
        for case in &node.cases {
            collect_stmts(&case.cons, &mut declarations);
        }
        self.with_scope(&declarations, |this| node.cases.visit_with(this));
    }

    fn visit_ts_module_block(&mut self, node: &TsModuleBlock) {
        let mut declarations = Vec::new();
        collect_module_items(&node.body, &mut declarations);
        self.with_scope(&declarations, |this| node.body.visit_with(this));
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        self.with_own_name(node.ident.as_ref(), |this| node.function.visit_with(this));
    }

    fn visit_class_expr(&mut self, node: &ClassExpr) {
        self.with_own_name(node.ident.as_ref(), |this| node.class.visit_with(this));
    }

    fn visit_for_stmt(&mut self, node: &ForStmt) {
        let mut declarations = Vec::new();
        if let Some(VarDeclOrExpr::VarDecl(var)) = &node.init {
            collect_var_decl(var, &mut declarations);
        }
        self.with_scope(&declarations, |this| node.visit_children_with(this));
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        let mut declarations = Vec::new();
        if let ForHead::VarDecl(var) = &node.left {
            collect_var_decl(var, &mut declarations);
        }
        self.with_scope(&declarations, |this| node.visit_children_with(this));
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        let mut declarations = Vec::new();
        if let ForHead::VarDecl(var) = &node.left {
            collect_var_decl(var, &mut declarations);
        }
        self.with_scope(&declarations, |this| node.visit_children_with(this));
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        let mut declarations = Vec::new();
        if let Some(param) = &node.param {
            collect_pat(param, &mut declarations);
        }
        self.with_scope(&declarations, |this| node.visit_children_with(this));
    }

    fn visit_class(&mut self, node: &Class) {
        self.env.class_members.push(class_member_types(node));
        node.visit_children_with(self);
        self.env.class_members.pop();
    }
}

/// Walk `module` (file `file` of `symbols`) in source order, reporting every
/// call to `on_call`.
pub fn walk_module<'s, F>(module: &Module, symbols: &'s SymbolTable, file: usize, on_call: F)
where
    F: FnMut(CallView<'_>, &Env<'s>) -> Descend,
{
    let mut walker = Walker {
        env: Env::new(symbols, file),
        on_call,
    };
    module.visit_with(&mut walker);
}
