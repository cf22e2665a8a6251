use bytes::Bytes;
use ecokashlib::{
    http::{route, MAX_BODY_BYTES},
    model::{UserId, UserProfile},
    service::RewardService,
    signature::FixedAttestor,
    store::MemoryStore,
};
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode};
use rust_decimal::Decimal;
use serde_json::Value;

fn service() -> RewardService<MemoryStore, FixedAttestor> {
    let store = MemoryStore::new();
    for (id, balance) in [("a", 10), ("b", 0)] {
        store.insert_profile(UserProfile {
            id: UserId::new(id),
            full_name: format!("User {id}"),
            email: format!("{id}@example.com"),
            phone: None,
            address: None,
            wallet_balance: Decimal::from(balance),
        });
    }
    store.insert_session("tok-a", UserId::new("a"));
    RewardService::new(store, FixedAttestor("5igFixed".into()))
}

fn post(path: &str, token: Option<&str>, body: &str) -> Request<Full<Bytes>> {
    let mut b = Request::builder().method("POST").uri(path);
    if let Some(t) = token {
        b = b.header("authorization", format!("Bearer {t}"));
    }
    b.body(Full::new(Bytes::from(body.to_owned()))).unwrap()
}

async fn json(resp: Response<Full<Bytes>>) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn deposit_ok() {
    let svc = service();
    let body = r#"{"rvmLocation":"PZ Market","recyclableType":"cans","quantity":10,"amount":1.5}"#;
    let (status, v) = json(route(&svc, post("/api/deposits", Some("tok-a"), body)).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["success"], true);
    assert_eq!(v["solanaSignature"], "5igFixed");
    assert_eq!(v["deposit"]["rvmLocation"], "PZ Market");
}

#[tokio::test]
async fn deposit_without_session_is_401() {
    let svc = service();
    let (status, v) = json(route(&svc, post("/api/deposits", None, "{}")).await).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(v["error"], "Unauthorized");
}

#[tokio::test]
async fn transfer_status_codes() {
    let svc = service();

    let missing = r#"{"recipientEmail":"zz@example.com","amount":1}"#;
    let (status, v) = json(route(&svc, post("/api/transfers", Some("tok-a"), missing)).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(v["error"], "Recipient not found");

    let (status, v) = json(route(&svc, post("/api/transfers", Some("tok-a"), r#"{"recipientEmail":"bob","amount":1}"#)).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(v["error"], "Recipient not found");

    let broke = r#"{"recipientEmail":"b@example.com","amount":50}"#;
    let (status, v) = json(route(&svc, post("/api/transfers", Some("tok-a"), broke)).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"], "Insufficient balance");

    let ok = r#"{"recipientEmail":"b@example.com","amount":4,"note":"lunch"}"#;
    let (status, v) = json(route(&svc, post("/api/transfers", Some("tok-a"), ok)).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, serde_json::json!({"success": true, "solanaSignature": "5igFixed"}));
}

#[tokio::test]
async fn malformed_body_is_400() {
    let svc = service();
    let (status, _) = json(route(&svc, post("/api/transfers", Some("tok-a"), "not json")).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_routes() {
    let svc = service();
    let (status, _) = json(route(&svc, post("/api/nope", Some("tok-a"), "{}")).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let get = Request::builder().uri("/api/deposits").body(Full::new(Bytes::new())).unwrap();
    let (status, _) = json(route(&svc, get).await).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn notifications_after_deposit() {
    let svc = service();
    let body = r#"{"rvmLocation":"Aberdeen Beach","recyclableType":"pet","quantity":5,"amount":2}"#;
    route(&svc, post("/api/deposits", Some("tok-a"), body)).await;

    let get = Request::builder()
        .uri("/api/notifications")
        .header("authorization", "Bearer tok-a")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let (status, v) = json(route(&svc, get).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v[0]["title"], "Deposit Successful");
    assert_eq!(v[0]["message"], "You earned $2.00 from depositing 5 pet");
}

#[tokio::test]
async fn oversized_body_is_413() {
    let svc = service();
    let note = "x".repeat(MAX_BODY_BYTES);
    let body = format!(r#"{{"recipientEmail":"b@example.com","amount":1,"note":"{note}"}}"#);
    let (status, v) = json(route(&svc, post("/api/transfers", Some("tok-a"), &body)).await).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(v["error"], "Request body too large");
    assert!(svc.store().transactions().is_empty());
}
