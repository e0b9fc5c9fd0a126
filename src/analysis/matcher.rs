//! Call-site matching against the operation catalog.
//!
//! A call matches when its callee is a member selector `receiver.op` (or an
//! optional-chained form) whose `op` is in the catalog. Under the conformant
//! policy the receiver's known type must also declare `op`.

use std::collections::HashSet;

use swc_ecma_ast::{Expr, ExprOrSpread, MemberExpr, OptChainBase};

use crate::analysis::walk::{CallView, SymbolLookup};
use crate::catalog::{MatchPolicy, OperationCatalog, OperationSpec};
use crate::symbols::eval::unwrap_ts_expr;

/// A matched call: the operation and the call's arguments.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'c, 'n> {
    pub operation: &'c OperationSpec,
    pub args: &'n [ExprOrSpread],
}

impl<'n> CallSite<'_, 'n> {
    /// The query argument, when its position is statically known.
    ///
    /// `None` when the call has too few arguments or a spread argument at or
    /// before the query position.
    pub fn query_argument(&self) -> Option<&'n Expr> {
        let index = self.operation.query_argument;
        if self.args.iter().take(index + 1).any(|arg| arg.spread.is_some()) {
            return None;
        }
        self.args.get(index).map(|arg| &*arg.expr)
    }
}

pub struct Matcher<'c> {
    catalog: &'c OperationCatalog,
    policy: MatchPolicy,
    capability_types: HashSet<String>,
}

impl<'c> Matcher<'c> {
    pub fn new(
        catalog: &'c OperationCatalog,
        policy: MatchPolicy,
        capability_types: &[String],
    ) -> Self {
        Self {
            catalog,
            policy,
            capability_types: capability_types.iter().cloned().collect(),
        }
    }

    /// Match one call against the catalog.
    pub fn match_call<'n>(
        &self,
        view: &CallView<'n>,
        lookup: &dyn SymbolLookup,
    ) -> Option<CallSite<'c, 'n>> {
        let (receiver, name) = member_call(view.callee)?;
        let operation = self.catalog.get(name)?;

        if self.policy == MatchPolicy::Conformant && !self.conforms(receiver, name, lookup) {
            return None;
        }

        Some(CallSite {
            operation,
            args: view.args,
        })
    }

    fn conforms(&self, receiver: &Expr, operation: &str, lookup: &dyn SymbolLookup) -> bool {
        let Some(type_name) = lookup.type_of(receiver) else {
            return false;
        };
        self.capability_types.contains(&type_name) || lookup.declares(&type_name, operation)
    }
}

fn member_parts(member: &MemberExpr) -> Option<(&Expr, &str)> {
    let prop = member.prop.as_ident()?;
    Some((&member.obj, prop.sym.as_str()))
}

/// Receiver and selected name of a member-selector callee.
pub fn member_call(callee: &Expr) -> Option<(&Expr, &str)> {
    match unwrap_ts_expr(callee) {
        Expr::Member(member) => member_parts(member),
        Expr::OptChain(chain) => match &*chain.base {
            OptChainBase::Member(member) => member_parts(member),
            OptChainBase::Call(_) => None,
        },
        _ => None,
    }
}
