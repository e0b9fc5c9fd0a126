//! Lexical scopes nested inside a module.
//!
//! Tracks the bindings of functions, blocks and loops while a file is being
//! walked. The module scope itself lives in the [`SymbolTable`]; a name not
//! found in any nested scope falls through to it.
//!
//! [`SymbolTable`]: crate::symbols::SymbolTable

use std::collections::{HashMap, HashSet};

use swc_ecma_ast::Expr;

use crate::symbols::Binding;
use crate::symbols::declarations::{Declaration, Declared};
use crate::symbols::eval::eval_const_string;

/// Stack of nested binding scopes (innermost last).
///
/// # Example
/// ```ignore
/// const Q = "SELECT 1";          // module scope (symbol table)
/// function load() {              // push scope 1
///     const Q = "SELECT 2";      // scope 1: Q -> "SELECT 2"
///     conn.ExecContext(ctx, Q);  // finds Q in scope 1
/// }                              // pop scope 1
/// ```
#[derive(Debug, Default)]
pub struct ScopeStack {
    bindings_stack: Vec<HashMap<String, Binding>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit the current scope.
    pub fn exit_scope(&mut self) {
        self.bindings_stack.pop();
    }

    /// Look up a binding by name, searching from innermost to outermost scope.
    pub fn get_binding(&self, name: &str) -> Option<&Binding> {
        self.bindings_stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
    }

    /// Enter a scope holding `declarations`.
    ///
    /// Every declaration is bound before any constant is evaluated, so a
    /// constant may refer to one declared later in the same scope, and a local
    /// declaration shadows outer ones for the whole scope. Names that are not
    /// declared in any nested scope are resolved through `module`.
    pub fn enter_with_declarations(
        &mut self,
        declarations: &[Declaration<'_>],
        module: &dyn Fn(&str) -> Option<String>,
    ) {
        let mut scope: HashMap<String, Binding> = HashMap::new();
        let mut pending: HashMap<String, &Expr> = HashMap::new();

        for declaration in declarations {
            match declaration.declared {
                Declared::Const(init) => {
                    pending.insert(declaration.name.clone(), init);
                }
                Declared::Other => {
                    pending.remove(&declaration.name);
                }
            }
            scope.insert(
                declaration.name.clone(),
                Binding {
                    constant: None,
                    type_name: declaration.type_name.clone(),
                },
            );
        }

        let values: Vec<(String, Option<String>)> = {
            let mut resolver = ScopeResolver {
                pending: &pending,
                declared: &scope,
                resolved: HashMap::new(),
                visiting: HashSet::new(),
                outer: self,
                module,
            };
            pending
                .keys()
                .map(|name| (name.clone(), resolver.resolve(name)))
                .collect()
        };

        for (name, value) in values {
            if let Some(binding) = scope.get_mut(&name) {
                binding.constant = value;
            }
        }

        self.bindings_stack.push(scope);
    }
}

/// Evaluates the constants of a scope that is about to be entered.
struct ScopeResolver<'p, 'e, 's> {
    pending: &'p HashMap<String, &'e Expr>,
    declared: &'p HashMap<String, Binding>,
    resolved: HashMap<String, Option<String>>,
    visiting: HashSet<String>,
    outer: &'s ScopeStack,
    module: &'s dyn Fn(&str) -> Option<String>,
}

impl ScopeResolver<'_, '_, '_> {
    fn resolve(&mut self, name: &str) -> Option<String> {
        if let Some(value) = self.resolved.get(name) {
            return value.clone();
        }

        let Some(init) = self.pending.get(name).copied() else {
            if self.declared.contains_key(name) {
                return None;
            }
            return match self.outer.get_binding(name) {
                Some(binding) => binding.constant.clone(),
                None => (self.module)(name),
            };
        };

        if !self.visiting.insert(name.to_string()) {
            return None;
        }
        let value = eval_const_string(init, &mut |reference| self.resolve(reference));
        self.visiting.remove(name);
        self.resolved.insert(name.to_string(), value.clone());
        value
    }
}
