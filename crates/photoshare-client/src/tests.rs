//! Tests for `HttpClient` against an in-process axum server.

use std::sync::{Arc, Mutex};

use axum::{
  Json, Router,
  extract::{Multipart, Path, State},
  http::{HeaderMap, StatusCode, header},
  routing::{get, post},
};
use bytes::Bytes;
use photoshare_core::{
  api::PhotoApi,
  photo::{UploadFile, UploadPayload},
  user::UserId,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::{ClientConfig, HttpClient, HttpError};

/// Multipart fields received by the stub, as `(name, file_name, text)`.
type Received = Arc<Mutex<Vec<(String, Option<String>, String)>>>;

async fn serve(router: Router) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, router).await.unwrap();
  });
  format!("http://{addr}")
}

fn client(base_url: String) -> HttpClient {
  HttpClient::new(ClientConfig {
    base_url,
    session_cookie: Some("connect.sid=s%3Aabc".into()),
  })
  .unwrap()
}

async fn get_user(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
  match id.as_str() {
    "u1" => Ok(Json(json!({
      "_id": "u1",
      "first_name": "Ann",
      "last_name": "Lee",
      "location": "Oslo",
      "description": "Likes fjords",
      "occupation": "Cartographer",
      "__v": 0
    }))),
    _ => Err(StatusCode::NOT_FOUND),
  }
}

async fn recent_photo(Path(id): Path<String>) -> Json<Value> {
  match id.as_str() {
    "u1" => Json(json!({
      "_id": "p1",
      "file_name": "fjord.jpg",
      "date_time": "2023-06-01T08:00:00.000Z",
      "user_id": "u1"
    })),
    _ => Json(Value::Null),
  }
}

async fn most_commented(Path(_id): Path<String>) -> Json<Value> {
  Json(json!({
    "_id": "p2",
    "file_name": "boat.jpg",
    "date_time": "2023-06-02T08:00:00.000Z",
    "commentCount": 5
  }))
}

async fn upload(State(received): State<Received>, mut multipart: Multipart) -> StatusCode {
  while let Ok(Some(field)) = multipart.next_field().await {
    let name = field.name().unwrap_or_default().to_string();
    let file_name = field.file_name().map(str::to_string);
    let Ok(text) = field.text().await else {
      return StatusCode::BAD_REQUEST;
    };
    received.lock().unwrap().push((name, file_name, text));
  }
  StatusCode::OK
}

async fn logout(headers: HeaderMap) -> StatusCode {
  match headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
    Some(c) if c.contains("connect.sid") => StatusCode::OK,
    _ => StatusCode::BAD_REQUEST,
  }
}

fn router(received: Received) -> Router {
  Router::new()
    .route(
      "/user/list",
      get(|| async {
        Json(json!([
          { "_id": "u1", "first_name": "Ann", "last_name": "Lee" },
          { "_id": "u2", "first_name": "Bo", "last_name": "Chen" }
        ]))
      }),
    )
    .route("/user/{id}", get(get_user))
    .route("/user/recentPhoto/{id}", get(recent_photo))
    .route("/user/mostCommentedPhoto/{id}", get(most_commented))
    .route("/photos/new", post(upload))
    .route("/admin/logout", post(logout))
    .route("/test/info", get(|| async { Json(json!({ "version": "1.4.2" })) }))
    .with_state(received)
}

async fn setup() -> (HttpClient, Received) {
  let received = Received::default();
  let base = serve(router(received.clone())).await;
  (client(base), received)
}

fn payload(is_private: bool, sharing_list: Option<Vec<UserId>>) -> UploadPayload {
  UploadPayload {
    owner_id: "u1".into(),
    file: UploadFile {
      file_name: "fjord.jpg".into(),
      bytes:     Bytes::from_static(b"jpegdata"),
    },
    is_private,
    sharing_list,
  }
}

// ── Config ──────────────────────────────────────────────────────────────────

#[test]
fn rejects_unparseable_base_url() {
  let err = HttpClient::new(ClientConfig {
    base_url:       "not a url".into(),
    session_cookie: None,
  })
  .unwrap_err();
  assert!(matches!(err, HttpError::InvalidBaseUrl { .. }));
}

// ── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_users_projects_directory_entries() {
  let (client, _) = setup().await;
  let users = client.list_users().await.unwrap();
  assert_eq!(users.len(), 2);
  assert_eq!(users[1].id, UserId::from("u2"));
  assert_eq!(users[1].label(), "Bo");
}

#[tokio::test]
async fn get_user_reads_full_record() {
  let (client, _) = setup().await;
  let user = client.get_user(&"u1".into()).await.unwrap();
  assert_eq!(user.occupation, "Cartographer");
  assert_eq!(user.full_name(), "Ann Lee");
}

#[tokio::test]
async fn missing_user_is_a_status_error() {
  let (client, _) = setup().await;
  let err = client.get_user(&"ghost".into()).await.unwrap_err();
  assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
  assert!(err.to_string().contains("/user/ghost"), "{err}");
}

#[tokio::test]
async fn photo_statistics_decode() {
  let (client, _) = setup().await;
  let recent = client.recent_photo(&"u1".into()).await.unwrap().unwrap();
  assert_eq!(recent.file_name, "fjord.jpg");

  let most = client
    .most_commented_photo(&"u1".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(most.comment_count, 5);
  assert_eq!(most.photo.id.as_str(), "p2");
}

#[tokio::test]
async fn null_recent_photo_is_none() {
  let (client, _) = setup().await;
  assert_eq!(client.recent_photo(&"u2".into()).await.unwrap(), None);
}

#[tokio::test]
async fn app_info_reads_version() {
  let (client, _) = setup().await;
  assert_eq!(client.app_info().await.unwrap().version, "1.4.2");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let client = client(format!("http://{addr}"));
  let err = client.list_users().await.unwrap_err();
  assert!(matches!(err, HttpError::Transport { method: "GET", .. }), "{err}");
}

// ── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_sends_sharing_list_when_present() {
  let (client, received) = setup().await;
  client
    .upload_photo(&payload(false, Some(vec!["u1".into(), "u2".into()])))
    .await
    .unwrap();

  let fields = received.lock().unwrap().clone();
  assert_eq!(fields, vec![
    ("uploadedphoto".to_string(), Some("fjord.jpg".to_string()), "jpegdata".to_string()),
    ("sharingList".to_string(), None, r#"["u1","u2"]"#.to_string()),
    ("isPrivate".to_string(), None, "false".to_string()),
  ]);
}

#[tokio::test]
async fn private_upload_omits_sharing_list() {
  let (client, received) = setup().await;
  client.upload_photo(&payload(true, None)).await.unwrap();

  let fields = received.lock().unwrap().clone();
  let names: Vec<_> = fields.iter().map(|(n, _, _)| n.as_str()).collect();
  assert_eq!(names, vec!["uploadedphoto", "isPrivate"]);
  assert_eq!(fields[1].2, "true");
}

#[tokio::test]
async fn logout_carries_session_cookie() {
  let base = serve(router(Received::default())).await;
  client(base.clone()).logout().await.unwrap();

  let anonymous = HttpClient::new(ClientConfig {
    base_url:       base,
    session_cookie: None,
  })
  .unwrap();
  let err = anonymous.logout().await.unwrap_err();
  assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_REQUEST));
}
