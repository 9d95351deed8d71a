use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::server::AppState;
use crate::storage::{DbStats, SqliteStore, Storage};
use crate::{
    DeleteProjectOptions, Error, Item, ItemFilter, ItemUpdate, NewItem, NewProject, Project,
    ProjectUpdate,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

fn from_error(e: Error) -> ApiError {
    let status = match &e {
        Error::Validation(_) | Error::InvalidValue(_) => StatusCode::BAD_REQUEST,
        Error::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, e.to_string())
}

fn not_found(what: &str, id: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, format!("{} not found: {}", what, id))
}

/// Run a storage call on the blocking pool
async fn blocking<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Storage) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state.storage))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(from_error)
}

/// Run a repository call against the locked store
async fn run<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut SqliteStore) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    blocking(state, move |storage| storage.with(f)).await
}

fn parse_opt<T: FromStr<Err = Error>>(value: Option<String>) -> Result<Option<T>, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<T>())
        .transpose()
        .map_err(from_error)
}

/// `null` means "must be NULL", any other value is an exact match
fn nullable_param(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| if v == "null" { None } else { Some(v) })
}

// ========== Projects ==========

pub async fn list_projects(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Project>> {
    run(&state, |s| s.get_projects()).await.map(Json)
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = run(&state, move |s| s.create_project(new)).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Project> {
    let lookup = id.clone();
    run(&state, move |s| s.get_project(&lookup))
        .await?
        .map(Json)
        .ok_or_else(|| not_found("project", &id))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<ProjectUpdate>,
) -> ApiResult<Project> {
    let lookup = id.clone();
    run(&state, move |s| {
        s.update_project(&lookup, &update)?;
        s.get_project(&lookup)
    })
    .await?
    .map(Json)
    .ok_or_else(|| not_found("project", &id))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectParams {
    pub delete_items: Option<bool>,
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<DeleteProjectParams>,
) -> Result<StatusCode, ApiError> {
    let options = DeleteProjectOptions {
        delete_items: params.delete_items.unwrap_or(true),
    };
    run(&state, move |s| s.delete_project(&id, options)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== Items ==========

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsParams {
    pub status: Option<String>,
    pub project_id: Option<String>,
}

pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ItemsParams>,
) -> ApiResult<Vec<Item>> {
    let status = parse_opt(params.status)?;
    let project_id = params.project_id.filter(|p| !p.is_empty());
    run(&state, move |s| s.get_items(status, project_id.as_deref()))
        .await
        .map(Json)
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewItem>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let item = blocking(&state, move |storage| storage.create_item(new)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Item> {
    let lookup = id.clone();
    run(&state, move |s| s.get_item(&lookup))
        .await?
        .map(Json)
        .ok_or_else(|| not_found("item", &id))
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<ItemUpdate>,
) -> ApiResult<Item> {
    let lookup = id.clone();
    run(&state, move |s| {
        s.update_item(&lookup, &update)?;
        s.get_item(&lookup)
    })
    .await?
    .map(Json)
    .ok_or_else(|| not_found("item", &id))
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    run(&state, move |s| s.delete_item(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_done(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    run(&state, move |s| s.mark_item_done(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn pin_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    run(&state, move |s| s.pin_item(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub project_id: Option<String>,
}

pub async fn move_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<MoveRequest>,
) -> Result<StatusCode, ApiError> {
    run(&state, move |s| s.move_item_to_project(&id, request.project_id.as_deref())).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== Search ==========

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub status: Option<String>,
    pub energy: Option<String>,
    pub tag: Option<String>,
    pub project_id: Option<String>,
    pub parent_id: Option<String>,
}

impl SearchParams {
    fn into_filter(self) -> Result<ItemFilter, ApiError> {
        Ok(ItemFilter {
            query: self.query,
            item_type: parse_opt(self.item_type)?,
            status: parse_opt(self.status)?,
            energy: parse_opt(self.energy)?,
            tag: self.tag,
            project_id: nullable_param(self.project_id),
            parent_id: nullable_param(self.parent_id),
        })
    }
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<Item>> {
    let filter = params.into_filter()?;
    run(&state, move |s| s.search_items_with_filters(&filter))
        .await
        .map(Json)
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> ApiResult<DbStats> {
    run(&state, |s| s.stats()).await.map(Json)
}
