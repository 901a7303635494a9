//! 客户 REST 处理器

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use taproom_domain_core::Entity;
use taproom_errors::{AppError, AppResult};
use tracing::debug;

use crate::domain::CustomerId;

use super::CUSTOMER_PATH;
use super::dto::{
    CustomerListParams, CustomerPatchRequest, CustomerRequest, CustomerResponse, PageResponse,
};
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::state::AppState;

fn customer_not_found(id: &CustomerId) -> AppError {
    AppError::not_found(format!("客户 {} 不存在", id))
}

pub async fn list_customers(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CustomerListParams>,
) -> AppResult<Json<PageResponse<CustomerResponse>>> {
    let page = state.customers.list_customers(params.into()).await?;
    Ok(Json(PageResponse::from_page(page)))
}

pub async fn get_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> AppResult<Json<CustomerResponse>> {
    debug!(customer_id = %id, "Get customer");

    let customer = state
        .customers
        .get_customer(&id)
        .await?
        .ok_or_else(|| customer_not_found(&id))?;
    Ok(Json(customer.into()))
}

pub async fn create_customer(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CustomerRequest>,
) -> AppResult<impl IntoResponse> {
    let (draft, _) = request.into_draft()?;
    let customer = state.customers.create_customer(draft).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("{}/{}", CUSTOMER_PATH, customer.id()))],
    ))
}

pub async fn update_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
    ApiJson(request): ApiJson<CustomerRequest>,
) -> AppResult<StatusCode> {
    let (draft, expected_version) = request.into_draft()?;
    state
        .customers
        .update_customer(&id, draft, expected_version)
        .await?
        .ok_or_else(|| customer_not_found(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn patch_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
    ApiJson(request): ApiJson<CustomerPatchRequest>,
) -> AppResult<StatusCode> {
    let patch = request.into_patch()?;
    state
        .customers
        .patch_customer(&id, patch)
        .await?
        .ok_or_else(|| customer_not_found(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> AppResult<StatusCode> {
    if !state.customers.delete_customer(&id).await? {
        return Err(customer_not_found(&id));
    }
    Ok(StatusCode::NO_CONTENT)
}
