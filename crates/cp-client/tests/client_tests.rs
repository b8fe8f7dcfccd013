//! End-to-end behaviour against a mock Catchpoint server

use chrono::NaiveDateTime;
use cp_client::{CatchpointClient, Error, Params, Resource};
use cp_core::test_utils::{expired_body, mock_config, test_credentials, token_body, TEST_TOKEN};
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TOKEN_PATH: &str = "/ui/api/token";
const API: &str = "/ui/api/v1";

// base64("test-access-token")
const BEARER: &str = "Bearer dGVzdC1hY2Nlc3MtdG9rZW4=";

fn init_tracing() {
  let _ = tracing_subscriber::fmt().with_env_filter("debug").with_test_writer().try_init();
}

async fn client_for(server: &MockServer) -> CatchpointClient {
  init_tracing();
  CatchpointClient::new(mock_config(&server.uri()).unwrap()).unwrap()
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
  Mock::given(method("POST"))
    .and(path(TOKEN_PATH))
    .and(body_string_contains("grant_type=client_credentials"))
    .and(body_string_contains("client_id=test-client-id"))
    .and(body_string_contains("client_secret=test-client-secret"))
    .respond_with(ResponseTemplate::new(200).set_body_json(token_body(TEST_TOKEN)))
    .expect(expected_calls)
    .mount(server)
    .await;
}

async fn requests_to(server: &MockServer, route: &str) -> Vec<Request> {
  server
    .received_requests()
    .await
    .unwrap_or_default()
    .into_iter()
    .filter(|r| r.url.path() == route)
    .collect()
}

fn query_value(request: &Request, key: &str) -> Option<String> {
  request.url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn test_first_call_authenticates_once() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/tests")))
    .and(header("Authorization", BEARER))
    .and(header("Accept", "application/json"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tests": []})))
    .expect(1)
    .mount(&server)
    .await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/divisions")))
    .and(header("Authorization", BEARER))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"divisions": []})))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let creds = test_credentials();
  assert!(!client.is_authenticated().await);

  let tests = client.tests().list(&creds, None).await.unwrap();
  assert_eq!(tests, json!({"tests": []}));
  assert!(client.is_authenticated().await);

  let divisions = client.divisions().list(&creds).await.unwrap();
  assert_eq!(divisions, json!({"divisions": []}));
}

#[tokio::test]
async fn test_expired_token_reauthenticates_on_next_call() {
  let server = MockServer::start().await;
  mount_token(&server, 2).await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/nodes")))
    .respond_with(ResponseTemplate::new(200).set_body_json(expired_body()))
    .up_to_n_times(1)
    .mount(&server)
    .await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/nodes")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nodes": [{"id": 1}]})))
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let creds = test_credentials();

  // The expired body comes back as-is; it is not an error
  let first = client.nodes().list(&creds).await.unwrap();
  assert_eq!(first, expired_body());
  assert!(!client.is_authenticated().await);

  let second = client.nodes().list(&creds).await.unwrap();
  assert_eq!(second, json!({"nodes": [{"id": 1}]}));
  assert!(client.is_authenticated().await);

  assert_eq!(requests_to(&server, &format!("{API}/nodes")).await.len(), 2);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_token_request() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/folders")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
    .expect(2)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let creds = test_credentials();
  let folders = client.folders();

  let (a, b) = tokio::join!(folders.list(&creds, None), folders.list(&creds, None));
  assert!(a.is_ok());
  assert!(b.is_ok());
}

#[tokio::test]
async fn test_non_200_is_http_error_without_retry() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/tests/999/allSections")))
    .respond_with(ResponseTemplate::new(404).set_body_string("Test not found"))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let err = client.tests().get(&test_credentials(), "999").await.unwrap_err();

  match err {
    Error::Http { status, body } => {
      assert_eq!(status, 404);
      assert_eq!(body, "Test not found");
    }
    other => panic!("Expected Http error, got {other:?}"),
  }
}

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/products")))
    .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let err = client.products().list(&test_credentials(), None).await.unwrap_err();

  assert!(
    matches!(err, Error::ResponseParse { ref body, .. } if body == "<html>maintenance</html>"),
    "{err:?}"
  );
  assert!(client.is_authenticated().await);
}

#[tokio::test]
async fn test_token_response_without_access_token() {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path(TOKEN_PATH))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"})))
    .mount(&server)
    .await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/tests")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
    .expect(0)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let err = client.tests().list(&test_credentials(), None).await.unwrap_err();

  assert!(matches!(err, Error::Authentication(_)), "{err:?}");
  assert!(!client.is_authenticated().await);
}

#[tokio::test]
async fn test_rejected_credentials_surface_status() {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path(TOKEN_PATH))
    .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})))
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let err = client.authenticate(&test_credentials()).await.unwrap_err();
  assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
  // Grab a free port and release it so nothing is listening there
  let port = {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
  };
  let base_url = format!("http://127.0.0.1:{port}");

  let client = CatchpointClient::new(mock_config(&base_url).unwrap()).unwrap();
  let err = client.tests().list(&test_credentials(), None).await.unwrap_err();

  match err {
    Error::TransportUnreachable { host, .. } => assert_eq!(host, format!("127.0.0.1:{port}")),
    other => panic!("Expected TransportUnreachable, got {other:?}"),
  }
}

#[tokio::test]
async fn test_create_posts_body_to_zero() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  let new_test = json!({
    "name": "Checkout flow",
    "division_id": 12,
    "test_type": {"id": 0},
    "monitor": {"id": 18}
  });

  Mock::given(method("POST"))
    .and(path(format!("{API}/tests/0")))
    .and(header("Authorization", BEARER))
    .and(header("Content-Type", "application/json"))
    .and(body_json(&new_test))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4242})))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let created = client.tests().create(&test_credentials(), &new_test).await.unwrap();
  assert_eq!(created["id"], 4242);
}

#[tokio::test]
async fn test_detail_fetch_uses_all_sections() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/tests/12345/allSections")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 12345})))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let test = client.tests().get(&test_credentials(), "12345").await.unwrap();
  assert_eq!(test["id"], 12345);
}

#[tokio::test]
async fn test_update_status_sends_ids_as_query() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  Mock::given(method("POST"))
    .and(path(format!("{API}/tests/updateStatus")))
    .and(body_json(json!({"status": {"id": 1}})))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Completed": true})))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  client
    .tests()
    .update_status(&test_credentials(), "101,102", &json!({"status": {"id": 1}}))
    .await
    .unwrap();

  let requests = requests_to(&server, &format!("{API}/tests/updateStatus")).await;
  assert_eq!(query_value(&requests[0], "tests").as_deref(), Some("101,102"));
}

#[tokio::test]
async fn test_folder_schedule_and_instant_run() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  Mock::given(method("POST"))
    .and(path(format!("{API}/folders/77/scheduleSection")))
    .and(body_json(json!({"frequency": {"id": 6}})))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 77})))
    .expect(1)
    .mount(&server)
    .await;

  Mock::given(method("POST"))
    .and(path(format!("{API}/onDemandTest/0")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5150})))
    .expect(1)
    .mount(&server)
    .await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/onDemandTest/5150")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Completed"})))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let creds = test_credentials();

  client.folders().create_schedule(&creds, "77", &json!({"frequency": {"id": 6}})).await.unwrap();

  let run = client.instant_tests().run(&creds, &json!({"test_id": 12345})).await.unwrap();
  let id = run["id"].to_string();
  let result = client.instant_tests().get(&creds, &id).await.unwrap();
  assert_eq!(result["status"], "Completed");
}

#[tokio::test]
async fn test_raw_resolves_relative_window() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/performance/raw/42")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": {}})))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  client.performance().raw(&test_credentials(), "42", "-60", "now", Some("UTC")).await.unwrap();

  let requests = requests_to(&server, &format!("{API}/performance/raw/42")).await;
  let request = &requests[0];
  assert_eq!(query_value(request, "tz"), None);

  let start = query_value(request, "startTime").unwrap();
  let end = query_value(request, "endTime").unwrap();
  let start = NaiveDateTime::parse_from_str(&start, "%Y-%m-%dT%H:%M:%S").unwrap();
  let end = NaiveDateTime::parse_from_str(&end, "%Y-%m-%dT%H:%M:%S").unwrap();
  assert_eq!((end - start).num_minutes(), 60);
}

#[tokio::test]
async fn test_invalid_window_fails_before_any_request() {
  let server = MockServer::start().await;
  mount_token(&server, 0).await;

  let client = client_for(&server).await;
  let creds = test_credentials();

  let err = client.performance().raw(&creds, "42", "5", "now", None).await.unwrap_err();
  assert!(matches!(err, Error::InvalidTimeWindow(_)), "{err:?}");

  let err = client.performance().raw(&creds, "42", "-5", "now", Some("Not/AZone")).await.unwrap_err();
  assert!(matches!(err, Error::UnknownTimezone(_)), "{err:?}");
}

#[tokio::test]
async fn test_favorite_data_sends_tests_without_window() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/performance/favoriteCharts/8/data")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": {}})))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  client
    .performance()
    .favorite_data(&test_credentials(), "8", None, None, None, Some("1,2,3"))
    .await
    .unwrap();

  let requests = requests_to(&server, &format!("{API}/performance/favoriteCharts/8/data")).await;
  assert_eq!(query_value(&requests[0], "tests").as_deref(), Some("1,2,3"));
  assert_eq!(query_value(&requests[0], "startTime"), None);
}

#[tokio::test]
async fn test_list_params_are_forwarded() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/folders")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let mut params = Params::new();
  params.insert("pageNumber".to_string(), "2".to_string());
  client.folders().list(&test_credentials(), Some(&params)).await.unwrap();

  let requests = requests_to(&server, &format!("{API}/folders")).await;
  assert_eq!(query_value(&requests[0], "pageNumber").as_deref(), Some("2"));
}

#[tokio::test]
async fn test_raw_dispatch_through_transport() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;

  Mock::given(method("GET"))
    .and(path(format!("{API}/nodeGroups/3")))
    .and(header("Authorization", BEARER))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server).await;
  let transport = client.transport();
  client.authenticate(&test_credentials()).await.unwrap();

  let url = transport.build_url(&Resource::NodeGroup("3".to_string()), None).unwrap();
  let group = transport.dispatch(url.clone(), Method::GET, None).await.unwrap();
  assert_eq!(group["id"], 3);

  let err = transport.dispatch(url, Method::PUT, None).await.unwrap_err();
  assert!(matches!(err, Error::UnsupportedMethod(ref m) if m == "PUT"));
}
