use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

const OUTPUT: &str = "services/users/prepared_statements.ts";

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_literal_queries_are_deduplicated_and_sorted() -> Result<()> {
    let test = CliTest::with_file(
        "services/users/repo.ts",
        r#"
export async function deleteUser(Conn: Db, ctx: Context, id: number) {
    await Conn.ExecContext(ctx, "DELETE FROM users WHERE id = ?", id);
    await Conn.QueryContext(ctx, "SELECT 1");
    await Conn.ExecContext(ctx, "DELETE FROM users WHERE id = ?", id);
}
"#,
    )?;

    let output = test.generate_command("services/users").output()?;
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(output.stdout, b"");

    assert_snapshot!(test.read_file(OUTPUT)?, @r#"
// Code generated by prep. DO NOT EDIT.
//prep:generate prep -f services/users

/** @module users */

export let prepStatements: string[] = [];

function init(): void {
  prepStatements = [
    "DELETE FROM users WHERE id = ?",
    "SELECT 1",
  ];
}

init();
"#);

    Ok(())
}

#[test]
fn test_dynamic_query_produces_empty_list() -> Result<()> {
    let test = CliTest::with_file(
        "services/users/repo.ts",
        "export const load = (Conn, ctx, dest, id) => Conn.GetContext(ctx, dest, buildQuery(), id);",
    )?;

    let output = test.generate_command("services/users").output()?;
    assert!(output.status.success(), "{}", stderr(&output));

    let generated = test.read_file(OUTPUT)?;
    assert!(generated.contains("function init(): void {\n  prepStatements = [];\n}\n"));

    Ok(())
}

#[test]
fn test_no_recognized_calls_writes_empty_artifact() -> Result<()> {
    let test = CliTest::with_file(
        "services/users/index.ts",
        "export function greet(name: string) { return `hello ${name}`; }",
    )?;

    let output = test.generate_command("services/users").output()?;
    assert!(output.status.success(), "{}", stderr(&output));

    assert_snapshot!(test.read_file(OUTPUT)?, @r#"
// Code generated by prep. DO NOT EDIT.
//prep:generate prep -f services/users

/** @module users */

export let prepStatements: string[] = [];

function init(): void {
  prepStatements = [];
}

init();
"#);

    Ok(())
}

#[test]
fn test_constants_and_package_name() -> Result<()> {
    let test = CliTest::with_file(
        "services/orders/package.json",
        r#"{ "name": "@shop/orders" }"#,
    )?;
    test.write_file(
        "services/orders/queries.ts",
        r#"
const TABLE = "orders";
export const BY_ID = `SELECT * FROM ${TABLE} WHERE id = $1`;
"#,
    )?;
    test.write_file(
        "services/orders/repo.ts",
        r#"
import { BY_ID } from "./queries";

export class OrderRepo {
    constructor(private readonly db: Queryer) {}

    find(ctx: Context, id: string) {
        return this.db.QueryRowContext(ctx, BY_ID, id);
    }

    list(ctx: Context, dest: Order[]) {
        return this.db.SelectContext(ctx, dest, 'SELECT * FROM orders');
    }
}
"#,
    )?;

    let output = test.generate_command("services/orders").output()?;
    assert!(output.status.success(), "{}", stderr(&output));

    let generated = test.read_file("services/orders/prepared_statements.ts")?;
    assert!(generated.contains("/** @module @shop/orders */\n"));
    assert!(generated.contains(
        "  prepStatements = [\n    \"SELECT * FROM orders WHERE id = $1\",\n    'SELECT * FROM orders',\n  ];\n"
    ));

    Ok(())
}

#[test]
fn test_regeneration_is_byte_identical() -> Result<()> {
    let test = CliTest::with_file(
        "services/users/repo.ts",
        r#"db.ExecContext(ctx, "UPDATE users SET name = ?"); db.QueryContext(ctx, "SELECT 2");"#,
    )?;

    assert!(test.generate_command("services/users").output()?.status.success());
    let first = test.read_file(OUTPUT)?;
    assert!(test.generate_command("services/users").output()?.status.success());
    let second = test.read_file(OUTPUT)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_previous_output_is_not_scanned() -> Result<()> {
    let test = CliTest::with_file(OUTPUT, r#"db.ExecContext(ctx, "SELECT stale");"#)?;
    test.write_file("services/users/repo.ts", r#"db.ExecContext(ctx, "SELECT fresh");"#)?;

    let output = test.generate_command("services/users").output()?;
    assert!(output.status.success(), "{}", stderr(&output));

    let generated = test.read_file(OUTPUT)?;
    assert!(generated.contains("\"SELECT fresh\""));
    assert!(!generated.contains("stale"));
    Ok(())
}

#[test]
fn test_tests_flag_includes_test_sources() -> Result<()> {
    let test = CliTest::with_file(
        "services/users/repo.ts",
        r#"db.ExecContext(ctx, "SELECT 1");"#,
    )?;
    test.write_file(
        "services/users/repo.test.ts",
        r#"db.ExecContext(ctx, "SELECT from_test");"#,
    )?;

    assert!(test.generate_command("services/users").output()?.status.success());
    assert!(!test.read_file(OUTPUT)?.contains("from_test"));

    assert!(
        test.generate_command("services/users")
            .arg("-t")
            .output()?
            .status
            .success()
    );
    assert!(test.read_file(OUTPUT)?.contains("\"SELECT from_test\""));
    Ok(())
}

#[test]
fn test_strict_matching() -> Result<()> {
    let test = CliTest::with_file(
        "services/users/repo.ts",
        r#"
interface Queryer { ExecContext(ctx: unknown, query: string): Promise<void> }
export function run(db: Queryer, cache: Cache) {
    db.ExecContext(ctx, "SELECT typed");
    cache.ExecContext(ctx, "not sql");
}
"#,
    )?;

    assert!(test.generate_command("services/users").output()?.status.success());
    assert!(test.read_file(OUTPUT)?.contains("\"not sql\""));

    let output = test.generate_command("services/users").arg("--strict").output()?;
    assert!(output.status.success(), "{}", stderr(&output));
    let generated = test.read_file(OUTPUT)?;
    assert!(generated.contains("\"SELECT typed\""));
    assert!(!generated.contains("not sql"));
    Ok(())
}

#[test]
fn test_config_file_is_honoured() -> Result<()> {
    let test = CliTest::with_file(
        ".preprc.json",
        r#"{
  "sourceRoot": "./packages",
  "outputFile": "statements.ts",
  "variable": "statements",
  "operations": [{ "name": "query", "queryArgument": 0 }]
}"#,
    )?;
    test.write_file(
        "packages/billing/db.ts",
        r#"pool.query("SELECT total FROM invoices"); pool.ExecContext(ctx, "DELETE FROM invoices");"#,
    )?;

    let output = test.generate_command("billing").output()?;
    assert!(output.status.success(), "{}", stderr(&output));

    let generated = test.read_file("packages/billing/statements.ts")?;
    assert!(generated.contains("export let statements: string[] = [];\n"));
    assert!(generated.contains(
        "  statements = [\n    \"DELETE FROM invoices\",\n    \"SELECT total FROM invoices\",\n  ];\n"
    ));
    Ok(())
}

#[test]
fn test_source_root_flag() -> Result<()> {
    let test = CliTest::with_file("src/svc/db.ts", r#"db.ExecContext(ctx, "SELECT 1");"#)?;

    let output = test
        .generate_command("svc")
        .arg("--source-root")
        .arg("src")
        .output()?;
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(test.root().join("src/svc/prepared_statements.ts").exists());
    Ok(())
}

#[test]
fn test_usage_without_target() -> Result<()> {
    let test = CliTest::with_file("services/users/repo.ts", "export {};")?;

    let output = test.command().output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage: prep"));
    assert!(!test.root().join(OUTPUT).exists());
    Ok(())
}

#[test]
fn test_missing_target_fails() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.generate_command("services/nowhere").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr(&output)
            .starts_with("error: failed to locate source directory of module \"services/nowhere\""),
        "{}",
        stderr(&output)
    );
    Ok(())
}

#[test]
fn test_syntax_error_fails_without_output() -> Result<()> {
    let test = CliTest::with_file("services/users/repo.ts", "export const = ;")?;

    let output = test.generate_command("services/users").output()?;
    assert_eq!(output.status.code(), Some(2));
    let message = stderr(&output);
    assert!(
        message.starts_with("error: failed to load module \"services/users\""),
        "{}",
        message
    );
    assert!(message.contains("repo.ts:1:"), "{}", message);
    assert!(!test.root().join(OUTPUT).exists());
    Ok(())
}

#[test]
fn test_empty_package_fails() -> Result<()> {
    let test = CliTest::with_file("services/users/README.md", "# users")?;

    let output = test.generate_command("services/users").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("no source files found"));
    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
    let test = CliTest::with_file(".preprc.json", r#"{ "variable": "not an identifier" }"#)?;
    test.write_file("services/users/repo.ts", "export {};")?;

    let output = test.generate_command("services/users").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid identifier in 'variable'"));
    Ok(())
}
