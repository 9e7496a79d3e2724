use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn fixture_db(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("shop.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        r#"
CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    customer_id INTEGER REFERENCES customers(id),
    total REAL
);
CREATE TABLE AspNetUsers (Id TEXT PRIMARY KEY, Email TEXT);
CREATE TABLE audit_trail (id INTEGER);
INSERT INTO customers (name) VALUES ('Ada'), ('Grace'), ('Linus');
INSERT INTO orders (customer_id, total) VALUES (1, 9.5), (1, NULL), (2, 3.0);
"#,
    )
    .unwrap();
    path
}

/// Command running in `dir`, with only the variables a test sets.
fn talk2db(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("talk2db").unwrap();
    cmd.current_dir(dir);
    for key in [
        "T2DB_DB_NAME",
        "T2DB_PROVIDER",
        "T2DB_FAKE_REPLY",
        "T2DB_EXCLUDE_TABLES",
        "T2DB_SCHEMA_STYLE",
        "T2DB_SQL_DIALECT",
        "T2DB_INCLUDE_PROCEDURES",
        "T2DB_OAI_API_TOKEN",
        "T2DB_CONFIG",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("T2DB_LOG", "off");
    cmd
}

#[test]
fn version_prints_package_version() {
    let dir = TempDir::new().unwrap();
    talk2db(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn schema_hides_excluded_tables() {
    let dir = TempDir::new().unwrap();
    let db = fixture_db(dir.path());

    talk2db(dir.path())
        .arg("schema")
        .env("T2DB_DB_NAME", &db)
        .env("T2DB_EXCLUDE_TABLES", "audit_trail")
        .assert()
        .success()
        .stdout(contains("customers (id, name)"))
        .stdout(contains("orders (id, customer_id, total)"))
        .stdout(contains("AspNetUsers").not())
        .stdout(contains("audit_trail").not());
}

#[test]
fn schema_ddl_without_out_writes_timestamped_file() {
    let dir = TempDir::new().unwrap();
    let db = fixture_db(dir.path());

    talk2db(dir.path())
        .args(["schema", "--style", "ddl"])
        .env("T2DB_DB_NAME", &db)
        .assert()
        .success()
        .stderr(contains("wrote file: schema_"));

    let written: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.starts_with("schema_") && n.ends_with(".sql"))
        .collect();
    assert_eq!(written.len(), 1);
    let ddl = fs::read_to_string(dir.path().join(&written[0])).unwrap();
    assert!(ddl.contains("CREATE TABLE customers ("));
}

#[test]
fn missing_database_setting_is_a_config_error() {
    let dir = TempDir::new().unwrap();

    talk2db(dir.path())
        .args(["query", "how many customers?"])
        .env("T2DB_PROVIDER", "chat")
        .assert()
        .code(2)
        .stderr(contains("T2DB_DB_NAME"))
        .stderr(contains("T2DB_OAI_API_TOKEN"));
}

#[test]
fn query_json_returns_sql_and_records() {
    let dir = TempDir::new().unwrap();
    let db = fixture_db(dir.path());

    let output = talk2db(dir.path())
        .args(["query", "total per order", "--format", "json"])
        .env("T2DB_DB_NAME", &db)
        .env("T2DB_PROVIDER", "fake")
        .env(
            "T2DB_FAKE_REPLY",
            "```sql\nSELECT id, total FROM orders ORDER BY id\n```",
        )
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["sql_query"], "SELECT id, total FROM orders ORDER BY id");
    assert_eq!(
        body["results"],
        serde_json::json!([
            {"id": 1, "total": 9.5},
            {"id": 2, "total": ""},
            {"id": 3, "total": 3.0}
        ])
    );
}

#[test]
fn query_csv_to_file() {
    let dir = TempDir::new().unwrap();
    let db = fixture_db(dir.path());
    let out = dir.path().join("names.csv");

    talk2db(dir.path())
        .args(["query", "customer names", "--format", "csv", "--out"])
        .arg(&out)
        .env("T2DB_DB_NAME", &db)
        .env("T2DB_PROVIDER", "fake")
        .env("T2DB_FAKE_REPLY", "SELECT name, name FROM customers ORDER BY id")
        .assert()
        .success();

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(csv, "name,name_1\nAda,Ada\nGrace,Grace\nLinus,Linus\n");
}

#[test]
fn failing_query_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let db = fixture_db(dir.path());

    talk2db(dir.path())
        .args(["query", "anything"])
        .env("T2DB_DB_NAME", &db)
        .env("T2DB_PROVIDER", "fake")
        .env("T2DB_FAKE_REPLY", "SELECT * FROM nowhere")
        .assert()
        .code(1)
        .stderr(contains("SELECT * FROM nowhere"));
}

#[test]
fn ask_loop_keeps_going_until_exit() {
    let dir = TempDir::new().unwrap();
    let db = fixture_db(dir.path());

    talk2db(dir.path())
        .args(["ask", "--provider", "fake"])
        .env("T2DB_DB_NAME", &db)
        .env("T2DB_FAKE_REPLY", "SELECT COUNT(*) AS n FROM customers")
        .write_stdin("how many customers?\n\nhow many now?\nexit\nnever asked\n")
        .assert()
        .success()
        .stdout(contains("Question: "))
        .stdout(contains("SQL: SELECT COUNT(*) AS n FROM customers"))
        .stdout(contains("3\n"))
        .stdout(predicate::function(|out: &str| {
            out.matches("(1 row)").count() == 2
        }));
}

#[test]
fn ask_loop_survives_failed_questions() {
    let dir = TempDir::new().unwrap();
    let db = fixture_db(dir.path());

    talk2db(dir.path())
        .args(["ask", "--provider", "fake"])
        .env("T2DB_DB_NAME", &db)
        .env("T2DB_FAKE_REPLY", "SELECT * FROM nowhere")
        .write_stdin("first question\nsecond question\nexit\n")
        .assert()
        .success()
        .stderr(predicate::function(|err: &str| {
            err.matches("Error: ").count() == 2
        }))
        .stdout(predicate::function(|out: &str| {
            out.matches("Question: ").count() == 3
        }));
}

#[test]
fn ask_loop_ends_at_end_of_input() {
    let dir = TempDir::new().unwrap();
    let db = fixture_db(dir.path());

    talk2db(dir.path())
        .args(["ask", "--provider", "fake"])
        .env("T2DB_DB_NAME", &db)
        .env("T2DB_FAKE_REPLY", "SELECT COUNT(*) AS n FROM customers")
        .write_stdin("how many customers?\n")
        .assert()
        .code(0)
        .stdout(contains("(1 row)"));
}

#[test]
fn unwritable_output_is_not_a_config_error() {
    let dir = TempDir::new().unwrap();
    let db = fixture_db(dir.path());

    talk2db(dir.path())
        .args(["query", "customer names", "--out"])
        .arg(dir.path().join("missing").join("out.txt"))
        .env("T2DB_DB_NAME", &db)
        .env("T2DB_PROVIDER", "fake")
        .env("T2DB_FAKE_REPLY", "SELECT name FROM customers")
        .assert()
        .code(1)
        .stderr(contains("fatal:"));
}
