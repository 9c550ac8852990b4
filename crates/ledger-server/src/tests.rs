//! Router tests against an in-memory ledger and a temporary photo directory.

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use ledger_core::reference::SeedData;
use ledger_photos::FsPhotoStore;
use ledger_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt as _;
use uuid::Uuid;

use super::*;

type State = AppState<SqliteStore, FsPhotoStore>;

const BOUNDARY: &str = "ledger-test-boundary";

/// The directory must outlive the state.
async fn make_state() -> (State, TempDir) {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store
    .seed(&SeedData {
      payers:     vec!["mat".into(), "paulka".into()],
      categories: vec!["groceries".into()],
    })
    .await
    .unwrap();

  let dir = tempfile::tempdir().unwrap();
  let photos = FsPhotoStore::open(dir.path()).await.unwrap();
  (AppState::new(store, photos), dir)
}

async fn send(state: &State, req: Request<Body>) -> Response {
  router(state.clone()).oneshot(req).await.unwrap()
}

async fn get(state: &State, uri: &str) -> Response {
  send(state, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(state: &State, uri: &str, body: Value) -> Response {
  let req = Request::post(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap();
  send(state, req).await
}

async fn delete(state: &State, uri: &str) -> Response {
  send(state, Request::delete(uri).body(Body::empty()).unwrap()).await
}

async fn body_bytes(resp: Response) -> Vec<u8> {
  axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(resp: Response) -> Value {
  serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

/// A photo part: `(file name, content type, bytes)`.
type PhotoPart<'a> = (&'a str, &'a str, &'a [u8]);

fn multipart_body(fields: &[(&str, &str)], photo: Option<PhotoPart<'_>>) -> Vec<u8> {
  let mut body = Vec::new();
  for (name, value) in fields {
    body.extend_from_slice(
      format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
      )
      .as_bytes(),
    );
  }
  if let Some((file_name, content_type, bytes)) = photo {
    body.extend_from_slice(
      format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; \
         filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
      )
      .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
  body
}

async fn post_expense(
  state: &State,
  fields: &[(&str, &str)],
  photo: Option<PhotoPart<'_>>,
) -> Response {
  let req = Request::post("/expenses")
    .header(
      header::CONTENT_TYPE,
      format!("multipart/form-data; boundary={BOUNDARY}"),
    )
    .body(Body::from(multipart_body(fields, photo)))
    .unwrap();
  send(state, req).await
}

const LUNCH: &[(&str, &str)] = &[
  ("description", "lunch"),
  ("payer", "mat"),
  ("category", "groceries"),
  ("amount", "10.22"),
  ("currency", "EUR"),
];

// ── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn seeded_payers_are_listed() {
  let (state, _dir) = make_state().await;
  let resp = get(&state, "/payers").await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await, json!(["mat", "paulka"]));
}

#[tokio::test]
async fn create_payer_returns_201_then_409() {
  let (state, _dir) = make_state().await;

  let resp = post_json(&state, "/payers", json!({ "name": "ola" })).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(body_json(resp).await, json!({ "name": "ola" }));

  let resp = post_json(&state, "/payers", json!({ "name": "ola" })).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  assert_eq!(body_json(resp).await, json!({ "error": "payer 'ola' already exists" }));

  let payers = body_json(get(&state, "/payers").await).await;
  assert_eq!(payers, json!(["mat", "paulka", "ola"]));
}

#[tokio::test]
async fn create_category_with_empty_name_is_400() {
  let (state, _dir) = make_state().await;
  let resp = post_json(&state, "/categories", json!({ "name": "" })).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let categories = body_json(get(&state, "/categories").await).await;
  assert_eq!(categories, json!(["groceries"]));
}

#[tokio::test]
async fn create_category_is_listed() {
  let (state, _dir) = make_state().await;
  let resp = post_json(&state, "/categories", json!({ "name": "rent" })).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let categories = body_json(get(&state, "/categories").await).await;
  assert_eq!(categories, json!(["groceries", "rent"]));
}

// ── Expenses ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_on_empty_ledger_is_empty_array() {
  let (state, _dir) = make_state().await;
  let resp = get(&state, "/expenses").await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn create_expense_returns_201_and_is_listed() {
  let (state, _dir) = make_state().await;

  let resp = post_expense(&state, LUNCH, None).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = body_json(resp).await;
  assert_eq!(created["description"], "lunch");
  assert_eq!(created["payer"], "mat");
  assert_eq!(created["amount"], "10.22");
  assert!(Uuid::parse_str(created["id"].as_str().unwrap()).is_ok());

  let listed = body_json(get(&state, "/expenses").await).await;
  assert_eq!(listed.as_array().unwrap().len(), 1);
  assert_eq!(listed[0]["id"], created["id"]);
}

#[tokio::test]
async fn author_is_accepted_as_payer() {
  let (state, _dir) = make_state().await;
  let fields = [
    ("description", "flat"),
    ("author", "paulka"),
    ("category", "groceries"),
    ("amount", "1500"),
    ("currency", "PLN"),
  ];

  let resp = post_expense(&state, &fields, None).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(body_json(resp).await["payer"], "paulka");
}

#[tokio::test]
async fn missing_field_is_400_naming_it() {
  let (state, _dir) = make_state().await;
  let fields: Vec<_> = LUNCH.iter().copied().filter(|(n, _)| *n != "currency").collect();

  let resp = post_expense(&state, &fields, None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(body_json(resp).await, json!({ "error": "currency cannot be empty" }));
}

#[tokio::test]
async fn unknown_payer_is_404_and_nothing_is_stored() {
  let (state, _dir) = make_state().await;
  let fields: Vec<_> = LUNCH
    .iter()
    .map(|&(n, v)| if n == "payer" { (n, "stranger") } else { (n, v) })
    .collect();

  let resp = post_expense(&state, &fields, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(body_json(get(&state, "/expenses").await).await, json!([]));
}

#[tokio::test]
async fn non_multipart_create_is_400() {
  let (state, _dir) = make_state().await;
  let resp = post_json(&state, "/expenses", json!({ "description": "lunch" })).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_removes_then_404() {
  let (state, _dir) = make_state().await;
  let created = body_json(post_expense(&state, LUNCH, None).await).await;
  let uri = format!("/expenses/{}", created["id"].as_str().unwrap());

  assert_eq!(delete(&state, &uri).await.status(), StatusCode::NO_CONTENT);
  assert_eq!(body_json(get(&state, "/expenses").await).await, json!([]));

  let resp = delete(&state, &uri).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_with_malformed_id_is_400() {
  let (state, _dir) = make_state().await;
  let resp = delete(&state, "/expenses/not-a-uuid").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Photos ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn uploaded_photo_is_served_back() {
  let (state, dir) = make_state().await;
  let jpeg: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

  let resp = post_expense(&state, LUNCH, Some(("IMG_0001.JPG", "image/jpeg", jpeg))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let id = body_json(resp).await["id"].as_str().unwrap().to_owned();

  let stored: Vec<String> = std::fs::read_dir(dir.path().join("photos"))
    .unwrap()
    .map(|e| e.unwrap().file_name().into_string().unwrap())
    .collect();
  assert_eq!(stored.len(), 1);
  assert!(stored[0].ends_with(&format!("_{id}.jpeg")), "stored as {stored:?}");

  let resp = get(&state, &format!("/expenses/{id}/photo")).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/jpeg");
  assert_eq!(body_bytes(resp).await, jpeg);
}

#[tokio::test]
async fn photo_extension_falls_back_to_file_name() {
  let (state, _dir) = make_state().await;

  let resp = post_expense(
    &state,
    LUNCH,
    Some(("receipt.PNG", "application/octet-stream", &b"png-ish"[..])),
  )
  .await;
  let id = body_json(resp).await["id"].as_str().unwrap().to_owned();

  let resp = get(&state, &format!("/expenses/{id}/photo")).await;
  assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/png");
  assert_eq!(body_bytes(resp).await, b"png-ish");
}

#[tokio::test]
async fn empty_photo_part_without_file_name_is_ignored() {
  let (state, _dir) = make_state().await;

  let resp = post_expense(&state, LUNCH, Some(("", "application/octet-stream", &b""[..]))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let id = body_json(resp).await["id"].as_str().unwrap().to_owned();

  let resp = get(&state, &format!("/expenses/{id}/photo")).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn photo_of_expense_without_one_is_404() {
  let (state, _dir) = make_state().await;
  let id = body_json(post_expense(&state, LUNCH, None).await).await["id"]
    .as_str()
    .unwrap()
    .to_owned();

  let resp = get(&state, &format!("/expenses/{id}/photo")).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert!(body_json(resp).await["error"].as_str().unwrap().contains(&id));
}

#[tokio::test]
async fn photo_of_unknown_expense_is_404() {
  let (state, _dir) = make_state().await;
  let resp = get(&state, &format!("/expenses/{}/photo", Uuid::new_v4())).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
  let (state, _dir) = make_state().await;
  let big = vec![0u8; MAX_BODY_BYTES + 1];

  let resp = post_expense(&state, LUNCH, Some(("big.jpeg", "image/jpeg", &big[..]))).await;
  assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
  assert_eq!(body_json(get(&state, "/expenses").await).await, json!([]));
}
