use api_service::{
    ApiError, ApiService, ClientOptions, InterceptError, LogLevel, MemoryLogger, Params,
    QueryParams, RequestConfig,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn service(server: &MockServer, logger: &MemoryLogger) -> ApiService {
    let options = ClientOptions::new(server.uri()).with_log_level(LogLevel::Trace);
    ApiService::with_logger(options, Arc::new(logger.clone())).expect("failed to build service")
}

fn params(value: Value) -> Params {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn it_adds_a_scheme_to_bare_hosts() {
    let service = ApiService::create(ClientOptions::new("example.com").with_log_level(LogLevel::Debug))
        .expect("failed to build service");

    assert_eq!(service.base_url(), "http://example.com");
}

#[tokio::test]
async fn it_gets_a_resource_by_slug_with_bearer_token() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/42"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;
    let logger = MemoryLogger::new();
    let service = service(&server, &logger);

    // Act
    let user: Value = service
        .get("users", Some("42"), &QueryParams::new().with_token("abc"))
        .await
        .expect("request failed");

    // Assert
    assert_eq!(user, json!({"id": 42}));
    assert!(logger.contains(LogLevel::Info, &format!("[GET] - {}users/42", server.uri())));
    assert!(logger.contains(LogLevel::Debug, r#""Authorization":"Bearer abc""#));
    assert_eq!(logger.at(LogLevel::Trace).len(), 1);
}

#[tokio::test]
async fn it_queries_with_params_and_api_key() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "1"))
        .and(header("x-api-key", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;
    let logger = MemoryLogger::new();
    let service = service(&server, &logger);

    // Act
    let items: Value = service
        .query("items", params(json!({"page": 1})), &QueryParams::new().with_api_key("k"))
        .await
        .expect("request failed");

    // Assert
    assert_eq!(items, json!([{"id": 1}]));
    assert!(logger.contains(LogLevel::Debug, r#"[Request Params] - {"page":1}"#));
}

#[tokio::test]
async fn it_lets_explicit_query_params_win() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let service = service(&server, &MemoryLogger::new());

    let qp = QueryParams::new().with_params(params(json!({"page": 1, "size": 10})));
    let items: Value = service
        .query("items", params(json!({"page": 2})), &qp)
        .await
        .expect("request failed");

    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn it_posts_and_puts_json_bodies() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Created {
        id: u32,
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({"name": "Ada"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/users"))
        .and(body_json(json!({"id": 7, "name": "Grace"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;
    let service = service(&server, &MemoryLogger::new());

    let created: Created = service
        .post("users", &json!({"name": "Ada"}), &QueryParams::new())
        .await
        .expect("post failed");
    let updated: Created = service
        .put("users", &json!({"id": 7, "name": "Grace"}), &QueryParams::new())
        .await
        .expect("put failed");

    assert_eq!(created, Created { id: 7 });
    assert_eq!(updated, Created { id: 7 });
}

#[tokio::test]
async fn it_deletes_with_a_trailing_slash_when_slug_is_missing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let service = service(&server, &MemoryLogger::new());

    let body: Value = service
        .delete("sessions", None, &QueryParams::new())
        .await
        .expect("delete failed");

    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn it_sends_default_headers_and_lets_per_call_headers_override() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/"))
        .and(header("X-Client", "override"))
        .and(header("X-Tenant", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    let options = ClientOptions::new(server.uri())
        .with_header("X-Client", "default")
        .with_header("X-Tenant", "acme");
    let service = ApiService::create(options).expect("failed to build service");

    let body: Value = service
        .get("me", None, &QueryParams::new().with_header("X-Client", "override"))
        .await
        .expect("request failed");

    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn it_returns_plain_text_bodies_as_strings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;
    let service = service(&server, &MemoryLogger::new());

    let body: String = service
        .get("health", None, &QueryParams::new())
        .await
        .expect("request failed");

    assert_eq!(body, "ok");
}

#[tokio::test]
async fn it_wraps_server_errors_and_logs_context() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .mount(&server)
        .await;
    let logger = MemoryLogger::new();
    let service = service(&server, &logger);

    // Act
    let err = service
        .get::<Value>("users", Some("404"), &QueryParams::new().with_token("abc"))
        .await
        .expect_err("expected a server error");

    // Assert
    assert!(matches!(err, ApiError::Service(_)));
    assert_eq!(
        err.to_string(),
        "[RWV] ApiService Error: Request failed with status code 404"
    );
    let errors = logger.at(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Response Error");
    let context = errors[0].context.as_ref().expect("missing context");
    assert_eq!(context["status"], json!(404));
    assert_eq!(context["url"], json!("users/404"));
    assert_eq!(context["method"], json!("GET"));
    assert_eq!(context["headers"]["Authorization"], json!("Bearer abc"));
    assert_eq!(context["response"], json!({"error": "not found"}));
}

#[tokio::test]
async fn it_classifies_unreachable_hosts_as_no_response() {
    // Nothing listens on the discard port
    let logger = MemoryLogger::new();
    let options = ClientOptions::new("127.0.0.1:9").with_timeout(Duration::from_millis(500));
    let service =
        ApiService::with_logger(options, Arc::new(logger.clone())).expect("failed to build service");

    let err = service
        .get::<Value>("users", None, &QueryParams::new())
        .await
        .expect_err("expected a network error");

    assert!(err.to_string().starts_with("[RWV] ApiService Error: "));
    let errors = logger.at(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Request Error");
    let context = errors[0].context.as_ref().expect("missing context");
    assert_eq!(context["request"]["url"], json!("http://127.0.0.1:9/users/"));
}

#[tokio::test]
async fn it_classifies_invalid_per_call_headers_as_setup_errors() {
    let server = MockServer::start().await;
    let logger = MemoryLogger::new();
    let service = service(&server, &logger);

    let err = service
        .get::<Value>("users", None, &QueryParams::new().with_header("bad header", "x"))
        .await
        .expect_err("expected a setup error");

    assert!(matches!(err, ApiError::Service(_)));
    assert_eq!(logger.at(LogLevel::Error)[0].message, "Setup Error");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn it_aborts_when_a_request_interceptor_fails() {
    let server = MockServer::start().await;
    let logger = MemoryLogger::new();
    let service = ApiService::builder(ClientOptions::new(server.uri()))
        .logger(Arc::new(logger.clone()))
        .request_interceptor(|_config: RequestConfig| -> Result<RequestConfig, InterceptError> {
            Err(InterceptError::Unknown)
        })
        .build()
        .expect("failed to build service");

    let err = service
        .get::<Value>("users", None, &QueryParams::new())
        .await
        .expect_err("expected the request to be aborted");

    assert_eq!(
        err.to_string(),
        "[RWV] ApiService Error: Unknown error in request interceptor"
    );
    assert_eq!(logger.at(LogLevel::Error)[0].message, "Setup Error");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn it_runs_custom_request_interceptors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/"))
        .and(header("X-Signed", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let service = ApiService::builder(ClientOptions::new(server.uri()))
        .logger(Arc::new(MemoryLogger::new()))
        .request_interceptor(|mut config: RequestConfig| -> Result<RequestConfig, InterceptError> {
            config.headers.insert("X-Signed".to_string(), "yes".to_string());
            Ok(config)
        })
        .build()
        .expect("failed to build service");

    let users: Value = service
        .get("users", None, &QueryParams::new())
        .await
        .expect("request failed");

    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn it_wraps_deserialization_failures() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct User {
        id: u32,
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "no id"})))
        .mount(&server)
        .await;
    let service = service(&server, &MemoryLogger::new());

    let err = service
        .get::<User>("users", Some("1"), &QueryParams::new())
        .await
        .expect_err("expected a decode error");

    assert!(err.to_string().starts_with("[RWV] ApiService Error: "));
}

#[tokio::test]
async fn it_lets_caller_headers_replace_auth_headers_regardless_of_case() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let options = ClientOptions::new(server.uri()).with_header("X-Tenant", "default");
    let service = ApiService::with_logger(options, Arc::new(MemoryLogger::new()))
        .expect("failed to build service");
    let qp = QueryParams::new()
        .with_token("abc")
        .with_header("authorization", "Basic xyz")
        .with_header("x-tenant", "acme")
        .with_header("X-Request-ID", "fixed-id");

    // Act
    let _: Value = service
        .get("users", None, &qp)
        .await
        .expect("request failed");

    // Assert
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let values = |name: &str| -> Vec<String> {
        requests[0]
            .headers
            .get_all(name)
            .iter()
            .map(|v| v.to_str().unwrap_or_default().to_string())
            .collect()
    };
    assert_eq!(values("authorization"), vec!["Basic xyz".to_string()]);
    assert_eq!(values("x-tenant"), vec!["acme".to_string()]);
    assert_eq!(values("x-request-id"), vec!["fixed-id".to_string()]);
}
