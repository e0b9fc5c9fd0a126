//! Capability catalog: the parameter shape of every recognized data-access
//! operation, as exposed by the database client bindings the scanned code
//! talks to.
//!
//! Nothing here is ever invoked. The built-in operation catalog is derived
//! from these declarations: the query argument index of an operation is the
//! position of its `query` parameter.

/// Name of the parameter carrying query text.
pub const QUERY_PARAM: &str = "query";

/// Declared signature of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub operation: &'static str,
    /// Parameter names in call order. A trailing `...args` marks a variadic tail.
    pub params: &'static [&'static str],
    pub returns: &'static str,
}

impl Capability {
    /// Position of the query parameter, if the operation takes one.
    pub fn query_index(&self) -> Option<usize> {
        self.params.iter().position(|p| *p == QUERY_PARAM)
    }
}

pub const CAPABILITIES: &[Capability] = &[
    Capability {
        operation: "QueryContext",
        params: &["ctx", "query", "...args"],
        returns: "Promise<Rows>",
    },
    Capability {
        operation: "QueryRowContext",
        params: &["ctx", "query", "...args"],
        returns: "Row",
    },
    Capability {
        operation: "PrepareContext",
        params: &["ctx", "query"],
        returns: "Promise<Stmt>",
    },
    Capability {
        operation: "PrepareNamedContext",
        params: &["ctx", "query"],
        returns: "Promise<NamedStmt>",
    },
    Capability {
        operation: "ExecContext",
        params: &["ctx", "query", "...args"],
        returns: "Promise<Result>",
    },
    Capability {
        operation: "GetContext",
        params: &["ctx", "destination", "query", "...args"],
        returns: "Promise<void>",
    },
    Capability {
        operation: "SelectContext",
        params: &["ctx", "destination", "query", "...args"],
        returns: "Promise<void>",
    },
    Capability {
        operation: "NamedExecContext",
        params: &["ctx", "query", "arg"],
        returns: "Promise<Result>",
    },
    Capability {
        operation: "NamedQueryContext",
        params: &["ctx", "query", "arg"],
        returns: "Promise<Rows>",
    },
];
