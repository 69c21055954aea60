//! Common Test Utilities
//!
//! An in-process mock of the PlaatBook REST API, plus helpers to assemble
//! a client against it. The mock keeps its state behind a mutex so tests
//! can seed users, issue or invalidate tokens, and inspect call counters.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::extract::{Form, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use plaatbook_client::config::{ApiSettings, Settings, StorageSettings};
use plaatbook_client::domain::{AuthToken, TokenList};
use plaatbook_client::infrastructure::storage::MemoryTokenStorage;
use plaatbook_client::startup::App;

pub struct MockUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct MockSession {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub valid: bool,
}

pub struct MockPost {
    pub id: Uuid,
    pub kind: &'static str,
    pub text: String,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub liked_by: HashSet<String>,
    pub disliked_by: HashSet<String>,
}

#[derive(Default)]
pub struct ApiState {
    pub users: Vec<MockUser>,
    pub sessions: Vec<MockSession>,
    pub posts: Vec<MockPost>,
    pub login_calls: usize,
    pub validate_calls: usize,
    pub logout_calls: usize,
    pub revoked_sessions: Vec<Uuid>,
    /// When set, like/dislike endpoints answer 500
    pub failing_interactions: bool,
}

impl ApiState {
    fn session_for(&self, token: &str) -> Option<&MockSession> {
        self.sessions
            .iter()
            .find(|session| session.token == token && session.valid)
    }
}

type SharedState = Arc<Mutex<ApiState>>;

/// Handle on a running mock API server.
pub struct MockApi {
    pub state: SharedState,
    pub base_url: String,
}

impl MockApi {
    /// Start the mock on an ephemeral port.
    pub async fn spawn() -> Self {
        let state: SharedState = Arc::default();
        let router = Router::new()
            .route("/auth/login", post(auth_login))
            .route("/auth/validate", get(auth_validate))
            .route("/auth/logout", put(auth_logout))
            .route("/sessions/{session_id}", delete(session_revoke))
            .route("/users", post(user_register))
            .route("/users/{user_id}", get(user_show).put(user_update))
            .route("/users/{user_id}/change_password", put(change_password))
            .route("/users/{user_id}/sessions", get(user_sessions))
            .route("/users/{user_id}/posts", get(user_posts))
            .route("/posts", get(posts_index).post(posts_create))
            .route(
                "/posts/{post_id}",
                get(posts_show).put(posts_update).delete(posts_delete),
            )
            .route("/posts/{post_id}/replies", get(posts_replies))
            .route("/posts/{post_id}/reply", post(posts_reply))
            .route("/posts/{post_id}/repost", post(posts_repost))
            .route(
                "/posts/{post_id}/like",
                put(interaction_change).delete(interaction_change),
            )
            .route(
                "/posts/{post_id}/dislike",
                put(interaction_change).delete(interaction_change),
            )
            .route("/search", get(search))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { state, base_url }
    }

    /// Register a user directly in the mock's state.
    pub fn seed_user(&self, username: &str, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().users.push(MockUser {
            id,
            username: username.into(),
            email: email.into(),
            password: password.into(),
        });
        id
    }

    /// Create a valid session for a user, as if an earlier run logged in,
    /// and return its bearer token.
    pub fn issue_token(&self, username: &str) -> String {
        let mut state = self.state.lock();
        let user_id = state
            .users
            .iter()
            .find(|user| user.username == username)
            .expect("unknown user")
            .id;
        let token = format!("tok-{}", Uuid::new_v4());
        state.sessions.push(MockSession {
            id: Uuid::new_v4(),
            token: token.clone(),
            user_id,
            valid: true,
        });
        token
    }

    /// Make a token fail validation from now on.
    pub fn invalidate_token(&self, token: &str) {
        let mut state = self.state.lock();
        let session = state
            .sessions
            .iter_mut()
            .find(|session| session.token == token)
            .expect("unknown token");
        session.valid = false;
    }

    pub fn seed_post(&self, username: &str, text: &str) -> Uuid {
        let mut state = self.state.lock();
        let user_id = state
            .users
            .iter()
            .find(|user| user.username == username)
            .expect("unknown user")
            .id;
        let id = Uuid::new_v4();
        state.posts.push(MockPost {
            id,
            kind: "normal",
            text: text.into(),
            user_id,
            parent_id: None,
            liked_by: HashSet::new(),
            disliked_by: HashSet::new(),
        });
        id
    }

    pub fn fail_interactions(&self, failing: bool) {
        self.state.lock().failing_interactions = failing;
    }

    pub fn login_calls(&self) -> usize {
        self.state.lock().login_calls
    }

    pub fn validate_calls(&self) -> usize {
        self.state.lock().validate_calls
    }

    pub fn logout_calls(&self) -> usize {
        self.state.lock().logout_calls
    }

    pub fn revoked_sessions(&self) -> Vec<Uuid> {
        self.state.lock().revoked_sessions.clone()
    }

    pub fn token_is_valid(&self, token: &str) -> bool {
        self.state.lock().session_for(token).is_some()
    }
}

/// Client settings pointing at the mock.
pub fn test_settings(base_url: &str) -> Settings {
    Settings {
        api: ApiSettings {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        },
        storage: StorageSettings::default(),
        environment: "test".to_string(),
    }
}

/// Assemble a client app against the mock with empty in-memory storage.
pub fn test_app(api: &MockApi) -> App {
    test_app_with_tokens(api, &[])
}

/// Assemble a client app with pre-seeded stored tokens.
pub fn test_app_with_tokens(api: &MockApi, tokens: &[&str]) -> App {
    let list = TokenList::from_tokens(tokens.iter().map(|t| AuthToken::from(*t)).collect());
    let storage = Arc::new(MemoryTokenStorage::with_tokens(list));
    App::with_storage(test_settings(&api.base_url), storage).unwrap()
}

// ==========================================================================
// JSON documents
// ==========================================================================

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn user_json(user: &MockUser) -> Value {
    let now = Utc::now();
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "created_at": now,
        "updated_at": now,
    })
}

fn session_json(state: &ApiState, session: &MockSession) -> Value {
    let now = Utc::now();
    let user = state.users.iter().find(|user| user.id == session.user_id);
    json!({
        "id": session.id,
        "user_id": session.user_id,
        "ip_address": "127.0.0.1",
        "client_name": "PlaatBook Tests",
        "expires_at": now + Duration::days(365),
        "created_at": now,
        "updated_at": now,
        "user": user.map(user_json),
    })
}

fn post_json(state: &ApiState, post: &MockPost, viewer: Option<&str>) -> Value {
    let now = Utc::now();
    let user = state.users.iter().find(|user| user.id == post.user_id);
    let parent = post
        .parent_id
        .and_then(|parent_id| state.posts.iter().find(|p| p.id == parent_id))
        .map(|parent| post_json(state, parent, viewer));
    let mut document = json!({
        "id": post.id,
        "type": post.kind,
        "text": post.text,
        "user": user.map(user_json),
        "replies_count": 0,
        "reposts_count": 0,
        "likes_count": post.liked_by.len(),
        "dislikes_count": post.disliked_by.len(),
        "views_count": 0,
        "created_at": now,
        "updated_at": now,
    });
    if let Some(parent) = parent {
        document["parent_post"] = parent;
    }
    if let Some(token) = viewer {
        document["auth_user_liked"] = json!(post.liked_by.contains(token));
        document["auth_user_disliked"] = json!(post.disliked_by.contains(token));
    }
    document
}

// ==========================================================================
// Handlers
// ==========================================================================

#[derive(Deserialize)]
struct LoginBody {
    logon: String,
    password: String,
}

async fn auth_login(State(state): State<SharedState>, Form(body): Form<LoginBody>) -> Response {
    let mut state = state.lock();
    state.login_calls += 1;
    let Some(user_index) = state.users.iter().position(|user| {
        (user.username == body.logon || user.email == body.logon) && user.password == body.password
    }) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let user_id = state.users[user_index].id;
    let token = format!("tok-{}", Uuid::new_v4());
    let session = MockSession {
        id: Uuid::new_v4(),
        token: token.clone(),
        user_id,
        valid: true,
    };
    let document = json!({
        "token": token,
        "session": session_json(&state, &session),
        "user": user_json(&state.users[user_index]),
    });
    state.sessions.push(session);
    Json(document).into_response()
}

async fn auth_validate(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    state.validate_calls += 1;
    let Some(token) = bearer(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let Some(session) = state.session_for(&token) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let user = state
        .users
        .iter()
        .find(|user| user.id == session.user_id)
        .expect("session without user");
    Json(json!({
        "session": session_json(&state, session),
        "user": user_json(user),
    }))
    .into_response()
}

async fn auth_logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    state.logout_calls += 1;
    let Some(token) = bearer(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    match state.sessions.iter_mut().find(|session| session.token == token) {
        Some(session) => {
            session.valid = false;
            StatusCode::OK.into_response()
        }
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn session_revoke(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock();
    if bearer(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.revoked_sessions.push(session_id);
    if let Some(session) = state.sessions.iter_mut().find(|session| session.id == session_id) {
        session.valid = false;
    }
    StatusCode::OK.into_response()
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    email: String,
    #[allow(unused)]
    password: String,
}

async fn user_register(State(state): State<SharedState>, Form(body): Form<RegisterBody>) -> Response {
    let mut state = state.lock();
    if state.users.iter().any(|user| user.username == body.username) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["Username is already taken"]})),
        )
            .into_response();
    }
    let user = MockUser {
        id: Uuid::new_v4(),
        username: body.username,
        email: body.email,
        password: body.password,
    };
    let document = user_json(&user);
    state.users.push(user);
    Json(document).into_response()
}

async fn user_show(State(state): State<SharedState>, Path(user_id): Path<String>) -> Response {
    let state = state.lock();
    let user = state
        .users
        .iter()
        .find(|user| user.id.to_string() == user_id || user.username == user_id);
    match user {
        Some(user) => Json(user_json(user)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn user_update(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock();
    if bearer(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if fields.get("username").is_some_and(|username| username == "taken") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["Username is already taken"]})),
        )
            .into_response();
    }
    let Some(user) = state.users.iter_mut().find(|user| user.id == user_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(username) = fields.get("username") {
        user.username = username.clone();
    }
    if let Some(email) = fields.get("email") {
        user.email = email.clone();
    }
    let document = user_json(user);
    Json(document).into_response()
}

#[derive(Deserialize)]
struct ChangePasswordBody {
    current_password: String,
    password: String,
}

async fn change_password(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
    Form(body): Form<ChangePasswordBody>,
) -> Response {
    let mut state = state.lock();
    if bearer(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Some(user) = state.users.iter_mut().find(|user| user.id == user_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if user.password != body.current_password {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"current_password": ["Current password is incorrect"]})),
        )
            .into_response();
    }
    user.password = body.password;
    Json(json!({})).into_response()
}

async fn user_sessions(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let state = state.lock();
    if bearer(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let sessions: Vec<Value> = state
        .sessions
        .iter()
        .filter(|session| session.user_id == user_id && session.valid)
        .map(|session| session_json(&state, session))
        .collect();
    Json(sessions).into_response()
}

async fn user_posts(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let state = state.lock();
    let viewer = bearer(&headers);
    let Some(author_id) = state
        .users
        .iter()
        .find(|user| user.id.to_string() == user_id || user.username == user_id)
        .map(|user| user.id)
    else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let posts: Vec<Value> = state
        .posts
        .iter()
        .filter(|post| post.user_id == author_id)
        .rev()
        .map(|post| post_json(&state, post, viewer.as_deref()))
        .collect();
    Json(posts).into_response()
}

async fn posts_index(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.lock();
    let viewer = bearer(&headers);
    let posts: Vec<Value> = state
        .posts
        .iter()
        .rev()
        .map(|post| post_json(&state, post, viewer.as_deref()))
        .collect();
    Json(posts).into_response()
}

async fn posts_show(State(state): State<SharedState>, Path(post_id): Path<Uuid>, headers: HeaderMap) -> Response {
    let state = state.lock();
    let viewer = bearer(&headers);
    match state.posts.iter().find(|post| post.id == post_id) {
        Some(post) => Json(post_json(&state, post, viewer.as_deref())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn posts_replies(
    State(state): State<SharedState>,
    Path(post_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let state = state.lock();
    let viewer = bearer(&headers);
    let replies: Vec<Value> = state
        .posts
        .iter()
        .filter(|post| post.kind == "reply" && post.parent_id == Some(post_id))
        .map(|post| post_json(&state, post, viewer.as_deref()))
        .collect();
    Json(replies).into_response()
}

#[derive(Deserialize)]
struct PostBody {
    text: String,
}

fn authed_post(
    state: &mut ApiState,
    headers: &HeaderMap,
    kind: &'static str,
    text: String,
    parent_id: Option<Uuid>,
) -> Response {
    let Some(token) = bearer(headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let Some(session) = state.session_for(&token) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    if text.is_empty() && kind != "repost" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"text": ["Text is required"]})),
        )
            .into_response();
    }
    let post = MockPost {
        id: Uuid::new_v4(),
        kind,
        text,
        user_id: session.user_id,
        parent_id,
        liked_by: HashSet::new(),
        disliked_by: HashSet::new(),
    };
    let document = post_json(state, &post, Some(&token));
    state.posts.push(post);
    Json(document).into_response()
}

async fn posts_create(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(body): Form<PostBody>,
) -> Response {
    let mut state = state.lock();
    authed_post(&mut state, &headers, "normal", body.text, None)
}

async fn posts_reply(
    State(state): State<SharedState>,
    Path(post_id): Path<Uuid>,
    headers: HeaderMap,
    Form(body): Form<PostBody>,
) -> Response {
    let mut state = state.lock();
    if !state.posts.iter().any(|post| post.id == post_id) {
        return StatusCode::NOT_FOUND.into_response();
    }
    authed_post(&mut state, &headers, "reply", body.text, Some(post_id))
}

async fn posts_repost(
    State(state): State<SharedState>,
    Path(post_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock();
    if !state.posts.iter().any(|post| post.id == post_id) {
        return StatusCode::NOT_FOUND.into_response();
    }
    authed_post(&mut state, &headers, "repost", String::new(), Some(post_id))
}

async fn posts_update(
    State(state): State<SharedState>,
    Path(post_id): Path<Uuid>,
    headers: HeaderMap,
    Form(body): Form<PostBody>,
) -> Response {
    let mut state = state.lock();
    if bearer(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Some(index) = state.posts.iter().position(|post| post.id == post_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    state.posts[index].text = body.text;
    let document = post_json(&state, &state.posts[index], None);
    Json(document).into_response()
}

async fn posts_delete(
    State(state): State<SharedState>,
    Path(post_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock();
    if bearer(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let before = state.posts.len();
    state.posts.retain(|post| post.id != post_id);
    if state.posts.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::OK.into_response()
}

async fn interaction_change(
    State(state): State<SharedState>,
    Path(post_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock();
    if state.failing_interactions {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let Some(token) = bearer(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    // Interaction bookkeeping is asserted through the client's own post
    // values; the mock only has to accept the call and remember the viewer.
    match state.posts.iter_mut().find(|post| post.id == post_id) {
        Some(post) => {
            post.liked_by.insert(token);
            StatusCode::OK.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
    #[allow(unused)]
    #[serde(default)]
    page: Option<u32>,
}

async fn search(State(state): State<SharedState>, Query(query): Query<SearchQuery>) -> Response {
    // A "slow" query loses the race against any query issued after it
    if query.q == "slow" {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    }
    let state = state.lock();
    let users: Vec<Value> = state
        .users
        .iter()
        .filter(|user| user.username.contains(&query.q))
        .map(user_json)
        .collect();
    let posts: Vec<Value> = state
        .posts
        .iter()
        .filter(|post| post.text.contains(&query.q))
        .map(|post| post_json(&state, post, None))
        .collect();
    Json(json!({"users": users, "posts": posts})).into_response()
}
