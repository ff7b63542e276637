use std::time::Duration;

use observer_engine::{ClientSettings, FailureKind, ReqwestWorkerClient, WorkerApi};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestWorkerClient {
    ReqwestWorkerClient::new(ClientSettings {
        server_url: server.uri(),
        worker_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn registry_fetch_parses_sessions_and_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"ExistingSessions":["s1","s2"],"AllUsernames":["alice"]}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let listing = client_for(&server).fetch_registry().await.expect("fetch ok");
    assert_eq!(listing.sessions, vec!["s1", "s2"]);
    assert_eq!(listing.users, vec!["alice"]);
}

#[tokio::test]
async fn registry_fetch_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_registry().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn submit_posts_form_and_returns_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("sessionID=s1"))
        .and(body_string_contains("snippet=print%2842%29"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"JobID":"j1"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let job_id = client_for(&server)
        .submit("s1", "print(42)")
        .await
        .expect("submit ok");
    assert_eq!(job_id, "j1");
}

#[tokio::test]
async fn submit_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).submit("s1", "x").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn submit_rejects_empty_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"JobID":""}"#, "application/json"))
        .mount(&server)
        .await;

    let err = client_for(&server).submit("s1", "x").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn submit_reports_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).submit("s1", "x").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn results_are_fetched_for_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("sessionID", "s1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"Job":{"JobID":"j1","SessionID":"s1","Done":true,"Snippet":"x"},"Output":"42"}]"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let records = client_for(&server).fetch_results("s1").await.expect("ok");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].job.job_id, "j1");
    assert_eq!(records[0].job.session_id, "s1");
    assert!(records[0].job.done);
    assert_eq!(records[0].job.snippet, "x");
    assert_eq!(records[0].output, "42");
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("{}"),
        )
        .mount(&server)
        .await;

    let client = ReqwestWorkerClient::new(ClientSettings {
        server_url: server.uri(),
        worker_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .expect("client");

    let err = client.fetch_registry().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]".repeat(8)))
        .mount(&server)
        .await;

    let client = ReqwestWorkerClient::new(ClientSettings {
        server_url: server.uri(),
        worker_url: server.uri(),
        max_bytes: 4,
        ..ClientSettings::default()
    })
    .expect("client");

    let err = client.fetch_results("s1").await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 4,
            actual: Some(16)
        }
    );
}
