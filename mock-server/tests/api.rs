use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Account, Envelope, ErrorBody};
use tower::ServiceExt;

const ACCOUNTS: &str = "/v1/organisation/accounts";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn account_json(id: &str) -> String {
    format!(
        r#"{{"data":{{"type":"accounts","id":"{id}","organisation_id":"eb0bd6f5-c3f5-44b2-b677-acd23cdde73c","attributes":{{"country":"GB","name":["Samantha Holder"]}}}}}}"#
    )
}

const ID: &str = "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc";

// --- list ---

#[tokio::test]
async fn list_accounts_empty() {
    let resp = app().oneshot(empty_request("GET", ACCOUNTS)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: Envelope<Vec<Account>> = body_json(resp).await;
    assert!(list.data.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_account_returns_201_with_server_fields() {
    let resp = app()
        .oneshot(json_request("POST", ACCOUNTS, &account_json(ID)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = body_json(resp).await;
    assert_eq!(created["data"]["id"], ID);
    assert_eq!(created["data"]["version"], 0);
    assert_eq!(created["data"]["attributes"]["name"][0], "Samantha Holder");
    assert!(created["data"]["created_on"].is_string());
}

#[tokio::test]
async fn create_account_wrong_type_returns_400() {
    let body = account_json(ID).replace(r#""type":"accounts""#, r#""type":"payments""#);
    let resp = app().oneshot(json_request("POST", ACCOUNTS, &body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = body_json(resp).await;
    assert!(err.error_message.starts_with("validation failure"));
}

#[tokio::test]
async fn create_account_malformed_json_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", ACCOUNTS, r#"{"data":{"type":"accounts"}}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_account_without_attributes_returns_400() {
    let body = format!(
        r#"{{"data":{{"type":"accounts","id":"{ID}","organisation_id":"eb0bd6f5-c3f5-44b2-b677-acd23cdde73c"}}}}"#
    );
    let resp = app().oneshot(json_request("POST", ACCOUNTS, &body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- get ---

#[tokio::test]
async fn get_account_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", &format!("{ACCOUNTS}/{ID}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.error_message, format!("record {ID} does not exist"));
}

#[tokio::test]
async fn get_account_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", &format!("{ACCOUNTS}/not-a-uuid")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_account_not_found_has_empty_body() {
    let resp = app()
        .oneshot(empty_request("DELETE", &format!("{ACCOUNTS}/{ID}?version=0")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn delete_account_without_version_returns_400() {
    let resp = app()
        .oneshot(empty_request("DELETE", &format!("{ACCOUNTS}/{ID}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- echo ---

#[tokio::test]
async fn echo_returns_body_and_content_type() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/echo", r#"{"data":[1,2,3]}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_bytes(resp).await, r#"{"data":[1,2,3]}"#);
}

// --- full lifecycle ---

#[tokio::test]
async fn account_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();
    let item = format!("{ACCOUNTS}/{ID}");

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", ACCOUNTS, &account_json(ID)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // create again — duplicate
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", ACCOUNTS, &account_json(ID)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let err: ErrorBody = body_json(resp).await;
    assert!(err.error_message.contains("duplicate"));

    // second account, listed after the first
    let second = "0b3b5b2e-8a0e-4f9a-9d43-1b2d3a4c5e6f";
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", ACCOUNTS, &account_json(second)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", ACCOUNTS))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: Envelope<Vec<Account>> = body_json(resp).await;
    let ids: Vec<String> = list.data.iter().map(|a| a.id.to_string()).collect();
    assert_eq!(ids, vec![ID.to_string(), second.to_string()]);

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &item))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Envelope<Account> = body_json(resp).await;
    assert_eq!(fetched.data.id.to_string(), ID);
    assert_eq!(fetched.data.version, 0);

    // delete with a stale version — conflict
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("{item}?version=1")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("{item}?version=0")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &item))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
