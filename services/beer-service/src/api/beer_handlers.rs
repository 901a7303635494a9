//! 啤酒 REST 处理器

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use taproom_domain_core::Entity;
use taproom_errors::{AppError, AppResult};
use tracing::debug;

use crate::domain::BeerId;

use super::BEER_PATH;
use super::auth::authorize_list_beers;
use super::dto::{BeerListParams, BeerPatchRequest, BeerRequest, BeerResponse, PageResponse};
use super::extract::{ApiJson, ApiPath, ApiQuery, CurrentClaims};
use super::state::AppState;

fn beer_not_found(id: &BeerId) -> AppError {
    AppError::not_found(format!("啤酒 {} 不存在", id))
}

pub async fn list_beers(
    State(state): State<AppState>,
    CurrentClaims(claims): CurrentClaims,
    ApiQuery(params): ApiQuery<BeerListParams>,
) -> AppResult<Json<PageResponse<BeerResponse>>> {
    authorize_list_beers(state.auth.as_ref(), claims.as_ref())?;
    debug!(?params, "List beers");

    let page = state.beers.list_beers(params.into()).await?;
    Ok(Json(PageResponse::from_page(page)))
}

pub async fn get_beer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BeerId>,
) -> AppResult<Json<BeerResponse>> {
    debug!(beer_id = %id, "Get beer");

    let beer = state
        .beers
        .get_beer(&id)
        .await?
        .ok_or_else(|| beer_not_found(&id))?;
    Ok(Json(beer.into()))
}

pub async fn create_beer(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BeerRequest>,
) -> AppResult<impl IntoResponse> {
    let (draft, _) = request.into_draft()?;
    let beer = state.beers.create_beer(draft).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("{}/{}", BEER_PATH, beer.id()))],
    ))
}

pub async fn update_beer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BeerId>,
    ApiJson(request): ApiJson<BeerRequest>,
) -> AppResult<StatusCode> {
    debug!(beer_id = %id, "Replace beer");

    let (draft, expected_version) = request.into_draft()?;
    state
        .beers
        .update_beer(&id, draft, expected_version)
        .await?
        .ok_or_else(|| beer_not_found(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn patch_beer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BeerId>,
    ApiJson(request): ApiJson<BeerPatchRequest>,
) -> AppResult<StatusCode> {
    debug!(beer_id = %id, "Patch beer");

    let patch = request.into_patch()?;
    state
        .beers
        .patch_beer(&id, patch)
        .await?
        .ok_or_else(|| beer_not_found(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_beer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BeerId>,
) -> AppResult<StatusCode> {
    if !state.beers.delete_beer(&id).await? {
        return Err(beer_not_found(&id));
    }
    Ok(StatusCode::NO_CONTENT)
}
