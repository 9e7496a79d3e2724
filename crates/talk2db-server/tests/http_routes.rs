use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use talk2db_core::providers::FakeProvider;
use talk2db_core::{ExclusionPolicy, Pipeline, SqliteSource};
use talk2db_server::server::router;
use tower::ServiceExt;

fn app(reply: FakeProvider) -> Router {
    let source = SqliteSource::memory().unwrap();
    source
        .execute_batch(
            "CREATE TABLE CLIENTI (ID INTEGER PRIMARY KEY, NOME TEXT, CITTA TEXT);
             CREATE TABLE AspNetUsers (Id TEXT);
             INSERT INTO CLIENTI (NOME, CITTA) VALUES ('Bianchi', 'Roma'), ('Verdi', NULL);",
        )
        .unwrap();
    let pipeline = Pipeline::new(
        Arc::new(source),
        ExclusionPolicy::with_defaults(Vec::<String>::new()),
        Arc::new(reply),
    );
    router(Arc::new(pipeline))
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_question(question: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/question")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "question": question }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn question_returns_sql_and_records() {
    let app = app(FakeProvider::new(
        "```sql\nSELECT ID, NOME, CITTA, ID FROM CLIENTI ORDER BY ID\n```",
    ));

    let (status, body) = call(app, post_question("Which customers do we have?")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sql_query"], "SELECT ID, NOME, CITTA, ID FROM CLIENTI ORDER BY ID");
    assert_eq!(
        body["results"],
        json!([
            {"ID": 1, "NOME": "Bianchi", "CITTA": "Roma", "ID_3": 1},
            {"ID": 2, "NOME": "Verdi", "CITTA": "", "ID_3": 2}
        ])
    );
}

#[tokio::test]
async fn records_keep_column_order() {
    let app = app(FakeProvider::new("SELECT CITTA, NOME FROM CLIENTI WHERE ID = 1"));

    let (_, body) = call(app, post_question("city and name of customer 1")).await;
    let keys: Vec<&str> = body["results"][0]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["CITTA", "NOME"]);
}

#[tokio::test]
async fn failure_is_500_with_detail() {
    let app = app(FakeProvider::new("SELECT * FROM MISSING"));

    let (status, body) = call(app, post_question("anything")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error: "));
    assert!(detail.contains("SELECT * FROM MISSING"));
}

#[tokio::test]
async fn provider_failure_is_500() {
    let app = app(FakeProvider::failing("quota exceeded"));

    let (status, body) = call(app, post_question("anything")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("quota exceeded"));
}

#[tokio::test]
async fn schema_hides_excluded_tables() {
    let app = app(FakeProvider::new("SELECT 1"));
    let req = Request::builder().uri("/schema").body(Body::empty()).unwrap();

    let (status, body) = call(app, req).await;
    assert_eq!(status, StatusCode::OK);
    let schema = body["schema"].as_str().unwrap();
    assert!(schema.contains("CLIENTI (ID, NOME, CITTA)"));
    assert!(!schema.contains("AspNetUsers"));
}

#[tokio::test]
async fn health_is_ok() {
    let app = app(FakeProvider::new("SELECT 1"));
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = call(app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_queries_do_not_stall_the_runtime() {
    let app = app(FakeProvider::new(
        "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 10000000) \
         SELECT COUNT(*) AS n FROM c",
    ));

    // one in-flight query per worker thread
    let in_flight: Vec<_> = (0..2)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { call(app, post_question("count to ten million")).await })
        })
        .collect();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let timer = tokio::spawn(async {
        let started = Instant::now();
        tokio::time::sleep(Duration::from_millis(200)).await;
        started.elapsed()
    });
    let health = tokio::spawn(call(
        app.clone(),
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    ));

    let slept = timer.await.unwrap();
    assert!(slept < Duration::from_secs(1), "200ms timer fired after {slept:?}");
    let (status, _) = tokio::time::timeout(Duration::from_secs(1), health)
        .await
        .expect("health answered while queries run")
        .unwrap();
    assert_eq!(status, StatusCode::OK);

    for handle in in_flight {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], json!([{"n": 10_000_000}]));
    }
}
