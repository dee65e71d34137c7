//! Catalog scenarios against a local replay of the reqres.in API.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use reqcheck_application::{Executor, HarnessConfig, HarnessError, TransportErrorKind};
use reqcheck_catalog::fixtures::UserData;
use reqcheck_catalog::{Scenario, before_each_with};
use reqcheck_domain::Actual;
use reqcheck_domain::fixture::{Field, Fixture};
use reqcheck_infrastructure::ReqwestHttpClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JSON: &str = "application/json; charset=utf-8";

fn json_body(status: u16, body: &serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.to_string(), JSON)
}

async fn mount(server: &MockServer, http_method: &str, route: &str, response: ResponseTemplate) {
    Mock::given(method(http_method))
        .and(path(route))
        .and(header("accept", "application/json"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Replays the reqres.in responses the catalog expects.
async fn reqres_replay() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .respond_with(json_body(
            200,
            &json!({"page": 2, "per_page": 6, "total": 12, "total_pages": 2, "data": []}),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("delay", "3"))
        .respond_with(
            json_body(200, &json!({"page": 1, "total": 12, "data": []}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    mount(
        &server,
        "GET",
        "/api/users/2",
        json_body(
            200,
            &json!({
                "data": {
                    "id": 2,
                    "email": "janet.weaver@reqres.in",
                    "first_name": "Janet",
                    "last_name": "Weaver",
                    "avatar": "https://reqres.in/img/faces/2-image.jpg"
                },
                "support": {"url": "https://contentcaddy.io"}
            }),
        ),
    )
    .await;

    mount(&server, "GET", "/api/users/23", ResponseTemplate::new(404).set_body_raw("{}", JSON)).await;
    mount(&server, "GET", "/api/unknown/23", ResponseTemplate::new(404).set_body_raw("{}", JSON)).await;

    mount(
        &server,
        "GET",
        "/api/unknown",
        json_body(200, &json!({"page": 1, "per_page": 6, "total": 12, "total_pages": 2, "data": []})),
    )
    .await;

    mount(
        &server,
        "GET",
        "/api/unknown/2",
        json_body(
            200,
            &json!({
                "data": {
                    "id": 2,
                    "name": "fuchsia rose",
                    "year": 2001,
                    "color": "#C74375",
                    "pantone_value": "17-2031"
                }
            }),
        ),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "morpheus", "job": "leader"})))
        .respond_with(json_body(
            201,
            &json!({
                "name": "morpheus",
                "job": "leader",
                "id": "570",
                "createdAt": "2024-05-01T10:00:00.000Z"
            }),
        ))
        .mount(&server)
        .await;

    for verb in ["PUT", "PATCH"] {
        Mock::given(method(verb))
            .and(path("/api/users/2"))
            .and(body_json(json!({"name": "morpheus", "job": "zion resident"})))
            .respond_with(json_body(
                200,
                &json!({
                    "name": "morpheus",
                    "job": "zion resident",
                    "updatedAt": "2024-05-01T10:00:00.000Z"
                }),
            ))
            .mount(&server)
            .await;
    }

    mount(&server, "DELETE", "/api/users/2", ResponseTemplate::new(204)).await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .and(body_json(json!({"email": "eve.holt@reqres.in", "password": "pistol"})))
        .respond_with(json_body(200, &json!({"id": 4, "token": "QpwL5tke4Pnpja7X4"})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .and(body_json(json!({"email": "eve.holt@reqres.in"})))
        .respond_with(json_body(400, &json!({"error": "Missing password"})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"email": "eve.holt@reqres.in", "password": "cityslicka"})))
        .respond_with(json_body(200, &json!({"token": "QpwL5tke4Pnpja7X4"})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"email": "peter@klaven"})))
        .respond_with(json_body(400, &json!({"error": "Missing password"})))
        .mount(&server)
        .await;

    server
}

fn executor_for(server: &MockServer) -> Executor<ReqwestHttpClient> {
    before_each_with(&HarnessConfig::with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn test_every_scenario_passes_against_replay() {
    let server = reqres_replay().await;
    let executor = executor_for(&server);

    for scenario in Scenario::all() {
        let report = scenario
            .run(&executor)
            .await
            .unwrap_or_else(|e| panic!("{scenario}: {e}"));
        assert!(report.all_passed());
    }
}

#[tokio::test]
async fn test_named_scenario_functions() {
    let server = reqres_replay().await;
    let executor = executor_for(&server);

    reqcheck_catalog::list_users(&executor).await.unwrap();
    reqcheck_catalog::single_user(&executor).await.unwrap();
    reqcheck_catalog::single_user_not_found(&executor).await.unwrap();
    reqcheck_catalog::list_resources(&executor).await.unwrap();
    reqcheck_catalog::single_resource(&executor).await.unwrap();
    reqcheck_catalog::single_resource_not_found(&executor).await.unwrap();
    reqcheck_catalog::create_user(&executor).await.unwrap();
    reqcheck_catalog::update_user(&executor).await.unwrap();
    reqcheck_catalog::patch_user(&executor).await.unwrap();
    reqcheck_catalog::delete_user(&executor).await.unwrap();
    reqcheck_catalog::register_successful(&executor).await.unwrap();
    reqcheck_catalog::register_unsuccessful(&executor).await.unwrap();
    reqcheck_catalog::login_successful(&executor).await.unwrap();
    reqcheck_catalog::login_unsuccessful(&executor).await.unwrap();
    reqcheck_catalog::delayed_response(&executor).await.unwrap();
}

#[tokio::test]
async fn test_failure_report_lists_every_mismatch() {
    let server = MockServer::start().await;
    mount(
        &server,
        "GET",
        "/api/users/2",
        json_body(
            200,
            &json!({
                "data": {
                    "id": "2",
                    "email": "janet.weaver@reqres.in",
                    "first_name": "Jane",
                    "last_name": "Weaver"
                }
            }),
        ),
    )
    .await;

    let error = Scenario::SingleUser
        .run(&executor_for(&server))
        .await
        .unwrap_err();

    let failure = error.as_assertion().unwrap();
    assert_eq!(failure.total, 6);
    let checks: Vec<&str> = failure.mismatches.iter().map(|m| m.check.as_str()).collect();
    assert_eq!(
        checks,
        vec![
            r#"data.first_name == "Janet""#,
            r#"data.avatar == "https://reqres.in/img/faces/2-image.jpg""#,
        ]
    );
    assert_eq!(failure.mismatches[0].actual, Actual::Value(r#""Jane""#.to_string()));
    assert_eq!(failure.mismatches[1].actual, Actual::NotFound);
}

#[tokio::test]
async fn test_wrong_status_and_body_are_both_reported() {
    let server = MockServer::start().await;
    mount(&server, "DELETE", "/api/users/2", json_body(200, &json!({"deleted": true}))).await;

    let error = reqcheck_catalog::delete_user(&executor_for(&server))
        .await
        .unwrap_err();

    let failure = error.as_assertion().unwrap();
    assert_eq!(failure.mismatches.len(), 2);
    assert_eq!(failure.mismatches[0].check, "status == 204");
    assert_eq!(failure.mismatches[1].check, r#"body == """#);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(json_body(200, &json!({})).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = HarnessConfig::with_base_url(server.uri()).timeout(Duration::from_millis(100));
    let executor = before_each_with(&config).unwrap();

    let error = reqcheck_catalog::delayed_response(&executor).await.unwrap_err();
    assert_eq!(error.as_transport().unwrap().kind, TransportErrorKind::Timeout);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = HarnessConfig::with_base_url(format!("http://127.0.0.1:{port}/"));
    let executor = before_each_with(&config).unwrap();

    let error = reqcheck_catalog::list_users(&executor).await.unwrap_err();
    assert!(matches!(error, HarnessError::Transport(_)), "{error}");
}

#[tokio::test]
async fn test_default_headers_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/unknown"))
        .and(header("x-api-key", "reqres-free-v1"))
        .respond_with(json_body(200, &json!({"total": 12})))
        .mount(&server)
        .await;

    let config = HarnessConfig::with_base_url(server.uri()).header("x-api-key", "reqres-free-v1");
    let executor = before_each_with(&config).unwrap();

    reqcheck_catalog::list_resources(&executor).await.unwrap();
}

#[tokio::test]
async fn test_undeclared_field_is_never_sent() {
    let server = MockServer::start().await;
    let executor = executor_for(&server);

    let nickname: Field<UserData, String> = Field::named("nickname");
    let payload = Fixture::<UserData>::builder()
        .set(UserData::NAME, "morpheus")
        .set(nickname, "neo")
        .build();

    let error = executor.post("api/users", &payload).await.unwrap_err();
    assert!(matches!(error, HarnessError::Serialization(_)), "{error}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_payload_keys_go_out_in_declaration_order() {
    let server = reqres_replay().await;
    let executor = executor_for(&server);

    Scenario::CreateUser.run(&executor).await.unwrap();
    Scenario::LoginSuccessful.run(&executor).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let bodies: Vec<String> = received
        .iter()
        .map(|request| String::from_utf8_lossy(&request.body).into_owned())
        .collect();
    assert_eq!(
        bodies,
        vec![
            r#"{"name":"morpheus","job":"leader"}"#.to_string(),
            r#"{"email":"eve.holt@reqres.in","password":"cityslicka"}"#.to_string(),
        ]
    );
}
