use std::{path::PathBuf, sync::Arc};

use pretty_assertions::assert_eq;
use swc_common::SourceMap;

use super::*;
use crate::loader::parser::parse_source;

fn build(files: &[(&str, &str)]) -> SymbolTable {
    let source_map = Arc::new(SourceMap::default());
    let parsed: Vec<(PathBuf, Module)> = files
        .iter()
        .map(|(path, code)| {
            let path = PathBuf::from(path);
            let module = parse_source(code.to_string(), &path, &source_map).unwrap();
            (path, module)
        })
        .collect();
    let refs: Vec<(&Path, &Module)> = parsed.iter().map(|(p, m)| (p.as_path(), m)).collect();
    SymbolTable::build(&refs)
}

#[test]
fn test_local_constants() {
    let table = build(&[(
        "pkg/db.ts",
        r#"
        const TABLE = "users";
        const Q = `SELECT * FROM ${TABLE}`;
        const JOINED = "SELECT " + "1";
        let mutable = "SELECT 2";
        const n = 3;
        "#,
    )]);

    assert_eq!(table.constant(0, "TABLE"), Some("users"));
    assert_eq!(table.constant(0, "Q"), Some("SELECT * FROM users"));
    assert_eq!(table.constant(0, "JOINED"), Some("SELECT 1"));
    assert_eq!(table.constant(0, "mutable"), None);
    assert_eq!(table.constant(0, "n"), None);
    assert!(table.module_binding(0, "mutable").is_some());
    assert!(table.module_binding(0, "missing").is_none());
}

#[test]
fn test_forward_reference_and_cycle() {
    let table = build(&[(
        "pkg/db.ts",
        r#"
        const A = B + "!";
        const B = "hi";
        const X = Y;
        const Y = X;
        "#,
    )]);

    assert_eq!(table.constant(0, "A"), Some("hi!"));
    assert_eq!(table.constant(0, "X"), None);
    assert_eq!(table.constant(0, "Y"), None);
}

#[test]
fn test_imports_between_files() {
    let table = build(&[
        (
            "pkg/queries.ts",
            r#"
            export const DELETE_USER = "DELETE FROM users WHERE id = ?";
            const hidden = "SELECT 1";
            export { hidden as visible };
            export default "SELECT now()";
            "#,
        ),
        (
            "pkg/reexport/index.ts",
            r#"export * from "../queries";"#,
        ),
        (
            "pkg/service.ts",
            r#"
            import { DELETE_USER, visible as V } from "./queries.js";
            import NOW from "./queries";
            import { DELETE_USER as AGAIN } from "./reexport";
            import { unknown } from "pg";
            import * as all from "./queries";
            "#,
        ),
    ]);

    assert_eq!(
        table.constant(2, "DELETE_USER"),
        Some("DELETE FROM users WHERE id = ?")
    );
    assert_eq!(table.constant(2, "V"), Some("SELECT 1"));
    assert_eq!(table.constant(2, "NOW"), Some("SELECT now()"));
    assert_eq!(
        table.constant(2, "AGAIN"),
        Some("DELETE FROM users WHERE id = ?")
    );
    assert_eq!(table.constant(2, "unknown"), None);
    assert_eq!(table.constant(2, "all"), None);
}

#[test]
fn test_imported_type_names() {
    let table = build(&[
        (
            "pkg/conn.ts",
            r#"
            export interface Queryer { ExecContext(ctx: unknown, query: string): void }
            export const shared: Queryer = connect();
            "#,
        ),
        ("pkg/use.ts", r#"import { shared } from "./conn";"#),
    ]);

    assert_eq!(
        table.module_binding(1, "shared").unwrap().type_name.as_deref(),
        Some("Queryer")
    );
}

#[test]
fn test_declared_members_follow_inheritance() {
    let table = build(&[(
        "pkg/types.ts",
        r#"
        interface Execer { ExecContext(ctx: unknown, query: string): unknown }
        interface Queryer extends Execer { QueryContext(ctx: unknown, query: string): unknown }
        class Pool implements Queryer {
            ExecContext() {}
            QueryContext() {}
        }
        class TracedPool extends Pool {}
        type Getter = { GetContext: (ctx: unknown, dest: unknown, query: string) => unknown };
        type Both = Getter & Execer;
        interface Loop extends Loop {}
        "#,
    )]);

    assert!(table.declares("Queryer", "ExecContext"));
    assert!(table.declares("Queryer", "QueryContext"));
    assert!(!table.declares("Execer", "QueryContext"));
    assert!(table.declares("TracedPool", "QueryContext"));
    assert!(table.declares("Getter", "GetContext"));
    assert!(table.declares("Both", "ExecContext"));
    assert!(!table.declares("Loop", "ExecContext"));
    assert!(!table.declares("Unknown", "ExecContext"));
}

#[test]
fn test_normalize_path() {
    assert_eq!(
        normalize_path(Path::new("pkg/./sub/../db.ts")),
        PathBuf::from("pkg/db.ts")
    );
    assert_eq!(normalize_path(Path::new("../x.ts")), PathBuf::from("../x.ts"));
}

#[test]
fn test_resolve_module_candidates() {
    let index: HashMap<PathBuf, usize> = [
        (PathBuf::from("pkg/db.ts"), 0),
        (PathBuf::from("pkg/util/index.ts"), 1),
        (PathBuf::from("pkg/db.config.ts"), 2),
    ]
    .into_iter()
    .collect();
    let current = Path::new("pkg/service.ts");

    assert_eq!(resolve_module(current, "./db", &index), Some(0));
    assert_eq!(resolve_module(current, "./db.js", &index), Some(0));
    assert_eq!(resolve_module(current, "./db.ts", &index), Some(0));
    assert_eq!(resolve_module(current, "./util", &index), Some(1));
    assert_eq!(resolve_module(current, "./db.config", &index), Some(2));
    assert_eq!(resolve_module(current, "pg", &index), None);
    assert_eq!(resolve_module(current, "./missing", &index), None);
}
