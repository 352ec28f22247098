//! HTTP bridge between the browser editor and the template tree

use crate::files::WorkspaceError;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use templar_diff::DiffStats;
use templar_editor::{AppProfile, EditorError, VersionRef};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// JSON error body with a status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<WorkspaceError> for ApiError {
    fn from(e: WorkspaceError) -> Self {
        match e {
            WorkspaceError::InvalidPath(_) => ApiError::bad_request(e.to_string()),
            WorkspaceError::Editor(inner) => inner.into(),
            WorkspaceError::Io(_) => {
                tracing::error!(error = %e, "Request failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

impl From<EditorError> for ApiError {
    fn from(e: EditorError) -> Self {
        match e {
            EditorError::EmptyName | EditorError::UnknownProfile(_) => {
                ApiError::bad_request(e.to_string())
            }
            EditorError::Storage(_) => {
                tracing::error!(error = %e, "Version store failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// An empty body reads as `{}`
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &body[..]
    };
    serde_json::from_slice(raw).map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))
}

/// Run file and store work on the blocking pool, off the async workers
async fn blocking<T, F>(state: &AppState, work: F) -> ApiResult<T>
where
    F: FnOnce(&AppState) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || work(&state))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Blocking task failed");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        })?
}

fn plain_text(content: String) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        content,
    )
        .into_response()
}

/// Build the bridge router
///
/// With a UI directory, unmatched requests are served from it; otherwise
/// they get a JSON 404.
pub fn router(state: AppState, ui_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/api/templates", get(list_templates))
        .route(
            "/api/templates/*path",
            get(read_template).put(write_template),
        )
        .route("/api/catalog", get(catalog))
        .route("/api/variables/*path", get(template_variables))
        .route(
            "/api/versions/*path",
            get(list_versions)
                .post(create_version)
                .delete(delete_version),
        )
        .route("/api/active/*path", put(set_active))
        .route("/api/content/*path", get(resolve_content))
        .route("/api/diff/*path", get(diff_versions))
        .route("/api/backup", post(mark_backup))
        .with_state(state);

    let app = match ui_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => api.fallback(not_found),
    };

    app.layer(CorsLayer::permissive())
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "baseDir": state.files.base_dir().display().to_string(),
    }))
}

async fn list_templates(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let templates = blocking(&state, |state| Ok(state.files.list())).await?;
    Ok(Json(json!({ "templates": templates })))
}

async fn read_template(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<Response> {
    match blocking(&state, move |state| Ok(state.files.read(&path)?)).await? {
        Some(content) => Ok(plain_text(content)),
        None => Err(ApiError::not_found("Template not found")),
    }
}

#[derive(Debug, Deserialize)]
struct WriteRequest {
    #[serde(default)]
    content: Option<String>,
}

async fn write_template(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let request: WriteRequest = parse_body(&body)?;
    let content = match request.content {
        Some(content) if !content.is_empty() => content,
        _ => return Err(ApiError::bad_request("Missing content")),
    };

    blocking(&state, move |state| Ok(state.files.write(&path, &content)?)).await?;
    Ok(Json(json!({ "success": true })))
}

async fn catalog() -> impl IntoResponse {
    Json(json!({
        "categories": templar_catalog::categories(),
        "variables": templar_catalog::VARIABLES,
        "profiles": AppProfile::ALL,
    }))
}

async fn template_variables(Path(path): Path<String>) -> ApiResult<impl IntoResponse> {
    let category = templar_catalog::category_for_path(&path)
        .ok_or_else(|| ApiError::not_found("No category for template"))?;

    Ok(Json(json!({
        "category": category,
        "groups": templar_catalog::grouped_variables(category),
    })))
}

async fn list_versions(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let (active, versions) = blocking(&state, move |state| {
        Ok((
            state.versions.get_active_version(&path)?,
            state.versions.list_versions(&path)?,
        ))
    })
    .await?;
    Ok(Json(json!({ "active": active, "versions": versions })))
}

#[derive(Debug, Deserialize)]
struct CreateVersionRequest {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    profile: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    description: String,
}

async fn create_version(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let request: CreateVersionRequest = parse_body(&body)?;
    let profile: AppProfile = request.profile.parse()?;

    let version = blocking(&state, move |state| {
        Ok(state.versions.create_version(
            &path,
            &request.name,
            profile,
            &request.content,
            &request.description,
        )?)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(version)))
}

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: String,
}

async fn delete_version(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<IdQuery>,
) -> ApiResult<impl IntoResponse> {
    match VersionRef::parse(&query.id) {
        VersionRef::Original => Err(ApiError::bad_request("The original cannot be deleted")),
        VersionRef::Stored(id) => {
            blocking(&state, move |state| {
                Ok(state.versions.delete_version(&path, &id)?)
            })
            .await?;
            Ok(Json(json!({ "success": true })))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivateRequest {
    version_id: VersionRef,
}

async fn set_active(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let request: ActivateRequest = parse_body(&body)?;
    let active = blocking(&state, move |state| {
        state
            .versions
            .set_active_version(&path, request.version_id)?;
        Ok(state.versions.get_active_version(&path)?)
    })
    .await?;
    Ok(Json(json!({ "success": true, "active": active })))
}

#[derive(Debug, Deserialize)]
struct ContentQuery {
    id: Option<String>,
}

async fn resolve_content(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<ContentQuery>,
) -> ApiResult<Response> {
    let version = query
        .id
        .as_deref()
        .map(VersionRef::parse)
        .unwrap_or_default();

    let content = blocking(&state, move |state| {
        Ok(state.versions.resolve_content(&path, &version)?)
    })
    .await?;

    match content {
        Some(content) => Ok(plain_text(content)),
        None => Err(ApiError::not_found("Content not found")),
    }
}

#[derive(Debug, Deserialize)]
struct DiffQuery {
    from: Option<String>,
    to: Option<String>,
}

/// `from` defaults to the original, `to` to the active version
async fn diff_versions(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<DiffQuery>,
) -> ApiResult<impl IntoResponse> {
    let from = query
        .from
        .as_deref()
        .map(VersionRef::parse)
        .unwrap_or_default();
    let requested_to = query.to.as_deref().map(VersionRef::parse);

    let old_side = from.clone();
    let (to, lines) = blocking(&state, move |state| {
        let to = match requested_to {
            Some(to) => to,
            None => state.versions.get_active_version(&path)?,
        };
        let lines = state.versions.diff_versions(&path, &old_side, &to)?;
        Ok((to, lines))
    })
    .await?;
    let lines = lines.ok_or_else(|| ApiError::not_found("Content not found"))?;

    Ok(Json(json!({
        "from": from,
        "to": to,
        "stats": DiffStats::from_lines(&lines),
        "text": templar_diff::render(&lines),
        "lines": lines,
    })))
}

async fn mark_backup(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let timestamp = blocking(&state, |state| Ok(state.versions.mark_original_backup()?)).await?;
    Ok(Json(json!({ "originalBackupTimestamp": timestamp })))
}
