use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::models::resume::{PublicResumeSummary, Resume};
use crate::resumes::preview::render_resume_markdown;
use crate::resumes::response::ApiResponse;
use crate::resumes::service::{self, CreateResumeRequest, PublicQuery, UpdateResumeRequest};
use crate::state::AppState;

type IdPath = Result<Path<Uuid>, PathRejection>;

fn resume_id(path: IdPath) -> Result<Uuid, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::Validation("Invalid resume id".to_string()))
}

/// GET /api/v1/resumes/public
pub async fn handle_public_resumes(
    State(state): State<AppState>,
    query: Result<Query<PublicQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<PublicResumeSummary>>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let filter = query.into_filter();
    let page = service::public_resumes(state.store.as_ref(), &filter).await?;
    Ok(Json(ApiResponse::paged(
        page.items,
        page.total,
        filter.page,
        filter.limit,
    )))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<CreateResumeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Resume>>), AppError> {
    let Json(req) = payload?;
    let resume = service::create_resume(state.store.as_ref(), caller, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(resume).with_message("Resume created successfully")),
    ))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<Vec<Resume>>>, AppError> {
    let resumes = service::list_resumes(state.store.as_ref(), caller).await?;
    Ok(Json(ApiResponse::list(resumes)))
}

/// GET /api/v1/resumes/default
pub async fn handle_default_resume(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<Resume>>, AppError> {
    let resume = service::get_default_resume(state.store.as_ref(), caller).await?;
    Ok(Json(ApiResponse::ok(resume)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    caller: Caller,
    id: IdPath,
) -> Result<Json<ApiResponse<Resume>>, AppError> {
    let resume = service::get_resume(state.store.as_ref(), caller, resume_id(id)?).await?;
    Ok(Json(ApiResponse::ok(resume)))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    caller: Caller,
    id: IdPath,
    payload: Result<Json<UpdateResumeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Resume>>, AppError> {
    let id = resume_id(id)?;
    let Json(req) = payload?;
    let resume = service::update_resume(state.store.as_ref(), caller, id, req).await?;
    Ok(Json(
        ApiResponse::ok(resume).with_message("Resume updated successfully"),
    ))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    caller: Caller,
    id: IdPath,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    service::delete_resume(state.store.as_ref(), caller, resume_id(id)?).await?;
    Ok(Json(
        ApiResponse::ok(json!({})).with_message("Resume deleted successfully"),
    ))
}

/// PATCH /api/v1/resumes/:id/set-default
pub async fn handle_set_default(
    State(state): State<AppState>,
    caller: Caller,
    id: IdPath,
) -> Result<Json<ApiResponse<Resume>>, AppError> {
    let resume = service::set_default_resume(state.store.as_ref(), caller, resume_id(id)?).await?;
    Ok(Json(ApiResponse::ok(resume).with_message("Resume set as default")))
}

/// POST /api/v1/resumes/:id/duplicate
pub async fn handle_duplicate_resume(
    State(state): State<AppState>,
    caller: Caller,
    id: IdPath,
) -> Result<(StatusCode, Json<ApiResponse<Resume>>), AppError> {
    let resume = service::duplicate_resume(state.store.as_ref(), caller, resume_id(id)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(resume).with_message("Resume duplicated successfully")),
    ))
}

/// GET /api/v1/resumes/:id/preview
pub async fn handle_preview_resume(
    State(state): State<AppState>,
    caller: Caller,
    id: IdPath,
) -> Result<impl IntoResponse, AppError> {
    let resume = service::get_resume(state.store.as_ref(), caller, resume_id(id)?).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        render_resume_markdown(&resume),
    ))
}
