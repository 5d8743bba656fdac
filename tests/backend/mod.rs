//! A minimal stand-in for the hosted auth service, serving the three endpoints the client uses.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::{net::TcpListener, task::JoinHandle};
use url::Url;

use crate::common::{PUBLIC_API_KEY, USER_EMAIL, USER_ID, VALID_REFRESH_TOKEN, tokens};

pub struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub api_key: Option<String>,
    pub bearer: Option<String>,
}

#[derive(Default)]
pub struct ServiceState {
    accepted_access_tokens: Mutex<HashSet<String>>,
    requests: Mutex<Vec<RecordedRequest>>,
    password: Mutex<Option<String>>,
}

impl ServiceState {
    pub fn accept_access_token(&self, token: &str) {
        self.accepted_access_tokens
            .lock()
            .unwrap()
            .insert(token.to_owned());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn password(&self) -> Option<String> {
        self.password.lock().unwrap().clone()
    }

    fn record(&self, method: Method, path: &str, headers: &HeaderMap) -> Option<String> {
        let bearer = headers
            .get(http::header::AUTHORIZATION)
            .and_then(|it| it.to_str().ok())
            .and_then(|it| it.strip_prefix("Bearer "))
            .map(str::to_owned);
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_owned(),
            api_key: headers
                .get("apikey")
                .and_then(|it| it.to_str().ok())
                .map(str::to_owned),
            bearer: bearer.clone(),
        });
        bearer
    }

    fn has_api_key(&self, headers: &HeaderMap) -> bool {
        headers.get("apikey").and_then(|it| it.to_str().ok()) == Some(PUBLIC_API_KEY)
    }

    fn is_accepted(&self, bearer: Option<&str>) -> bool {
        bearer.is_some_and(|it| self.accepted_access_tokens.lock().unwrap().contains(it))
    }
}

pub struct MockAuthService {
    pub url: Url,
    pub state: Arc<ServiceState>,
    _server: AbortOnDrop<()>,
}

pub async fn start_mock_auth_service() -> MockAuthService {
    let state = Arc::new(ServiceState::default());

    let router = Router::new()
        .route("/auth/v1/user", get(get_user).put(put_user))
        .route("/auth/v1/token", post(post_token))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("TcpListener");
    let addr = listener.local_addr().expect("local addr");

    let server_jh = tokio::spawn(async move {
        tracing::info!("Serving mock auth service...");
        axum::serve(listener, router.into_make_service())
            .await
            .expect("Server to start successfully");
    });

    MockAuthService {
        url: Url::parse(&format!("http://{addr}/")).expect("valid url"),
        state,
        _server: AbortOnDrop(server_jh),
    }
}

fn user_json() -> Value {
    json!({
        "id": USER_ID,
        "aud": "authenticated",
        "role": "authenticated",
        "email": USER_EMAIL,
        "invited_at": "2024-05-01T10:00:00Z",
    })
}

fn missing_api_key() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "No API key found in request" })),
    )
        .into_response()
}

fn bad_jwt() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "code": 401,
            "error_code": "bad_jwt",
            "msg": "invalid JWT: unable to parse or verify signature, token has invalid claims: token is expired",
        })),
    )
        .into_response()
}

async fn get_user(State(state): State<Arc<ServiceState>>, headers: HeaderMap) -> Response {
    let bearer = state.record(Method::GET, "/auth/v1/user", &headers);
    if !state.has_api_key(&headers) {
        return missing_api_key();
    }
    if !state.is_accepted(bearer.as_deref()) {
        return bad_jwt();
    }
    (StatusCode::OK, Json(user_json())).into_response()
}

#[derive(Debug, Deserialize)]
struct PasswordUpdate {
    password: String,
}

async fn put_user(
    State(state): State<Arc<ServiceState>>,
    headers: HeaderMap,
    Json(update): Json<PasswordUpdate>,
) -> Response {
    let bearer = state.record(Method::PUT, "/auth/v1/user", &headers);
    if !state.has_api_key(&headers) {
        return missing_api_key();
    }
    if !state.is_accepted(bearer.as_deref()) {
        return bad_jwt();
    }
    if update.password.len() < 6 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "code": 422,
                "error_code": "weak_password",
                "msg": "Password should be at least 6 characters.",
            })),
        )
            .into_response();
    }
    if state.password().as_deref() == Some(update.password.as_str()) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "code": 422,
                "error_code": "same_password",
                "msg": "New password should be different from the old password.",
            })),
        )
            .into_response();
    }
    *state.password.lock().unwrap() = Some(update.password);
    (StatusCode::OK, Json(user_json())).into_response()
}

#[derive(Debug, Deserialize)]
struct GrantType {
    grant_type: String,
}

#[derive(Debug, Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

async fn post_token(
    State(state): State<Arc<ServiceState>>,
    Query(GrantType { grant_type }): Query<GrantType>,
    headers: HeaderMap,
    Json(request): Json<RefreshRequest>,
) -> Response {
    state.record(Method::POST, "/auth/v1/token", &headers);
    if !state.has_api_key(&headers) {
        return missing_api_key();
    }
    if grant_type != "refresh_token" || request.refresh_token != VALID_REFRESH_TOKEN {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid Refresh Token: Refresh Token Not Found",
            })),
        )
            .into_response();
    }

    let access_token = tokens::access_token_valid_for(3600);
    state.accept_access_token(&access_token);
    (
        StatusCode::OK,
        Json(json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r0tated-r3fresh",
            "user": user_json(),
        })),
    )
        .into_response()
}
