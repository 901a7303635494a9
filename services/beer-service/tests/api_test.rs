//! REST API 集成测试

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use beer_service::api::dto::{BeerResponse, CustomerResponse, PageResponse};
use beer_service::api::{self, AppState, AuthSettings};
use common::*;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use taproom_auth_core::TokenService;
use taproom_errors::ProblemDetails;

async fn create_beer(app: &axum::Router, body: Value) -> String {
    let response = post(app, "/api/v1/beer", body).await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.location()
}

// ========== 创建 / 查询 ==========

#[tokio::test]
async fn test_create_then_get() {
    let app = empty_app().await;

    let location = create_beer(&app, beer_json("Galaxy Cat", "PALE_ALE")).await;
    assert!(location.starts_with("/api/v1/beer/"));

    let response = get(&app, &location).await;
    assert_eq!(response.status, StatusCode::OK);

    let beer: BeerResponse = response.json();
    assert_eq!(beer.beer_name, "Galaxy Cat");
    assert_eq!(beer.upc, "12356");
    assert_eq!(beer.quantity_on_hand, Some(12));
    assert_eq!(beer.price, Decimal::new(1299, 2));
    assert_eq!(beer.version, 0);
    assert_eq!(beer.created_date, beer.update_date);
    assert_eq!(location, format!("/api/v1/beer/{}", beer.id));
}

#[tokio::test]
async fn test_create_ignores_client_id() {
    let app = empty_app().await;
    let client_id = "0190f5d2-7c3a-7cc1-8a41-2f6c3b1d9e77";

    let mut body = beer_json("Crank", "PALE_ALE");
    body["id"] = json!(client_id);
    let location = create_beer(&app, body).await;

    assert!(!location.ends_with(client_id));
}

#[tokio::test]
async fn test_create_invalid_beer_returns_problem_details() {
    let app = empty_app().await;

    let response = post(
        &app,
        "/api/v1/beer",
        json!({ "beerName": "", "upc": "12356", "price": 1 }),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.content_type(), Some("application/problem+json"));

    let problem: ProblemDetails = response.json();
    assert_eq!(problem.status, 400);
    assert!(problem.detail.contains("beerName"));
    assert!(problem.detail.contains("beerStyle"));
}

#[tokio::test]
async fn test_create_rejects_price_outside_column_precision() {
    let app = empty_app().await;

    for price in ["1.999", "100000000", "123456789.00"] {
        let mut body = beer_json("Crank", "PALE_ALE");
        body["price"] = json!(price);
        let response = post(&app, "/api/v1/beer", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "price {}", price);

        let problem: ProblemDetails = response.json();
        assert!(problem.detail.contains("price"));
    }

    let mut body = beer_json("Crank", "PALE_ALE");
    body["price"] = json!("99999999.99");
    create_beer(&app, body).await;
}

#[tokio::test]
async fn test_create_without_json_content_type_is_unsupported() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let app = empty_app().await;
    let request = Request::post("/api/v1/beer")
        .body(Body::from(beer_json("Crank", "PALE_ALE").to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_create_unknown_style_is_bad_request() {
    let app = empty_app().await;

    let response = post(&app, "/api/v1/beer", beer_json("Crank", "LAMBIC")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_beer_is_not_found() {
    let app = empty_app().await;

    let response = get(&app, "/api/v1/beer/0190f5d2-7c3a-7cc1-8a41-2f6c3b1d9e77").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let problem: ProblemDetails = response.json();
    assert_eq!(problem.status, 404);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = empty_app().await;

    let response = get(&app, "/api/v1/beer/not-a-uuid").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ========== 整体替换 ==========

#[tokio::test]
async fn test_replace_beer() {
    let app = empty_app().await;
    let location = create_beer(&app, beer_json("Galaxy Cat", "PALE_ALE")).await;
    let before: BeerResponse = get(&app, &location).await.json();

    let response = put(
        &app,
        &location,
        json!({
            "beerName": "Galaxy Cat Reserve",
            "beerStyle": "IPA",
            "upc": "99999",
            "price": "15.50"
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let after: BeerResponse = get(&app, &location).await.json();
    assert_eq!(after.beer_name, "Galaxy Cat Reserve");
    assert_eq!(after.upc, "99999");
    assert_eq!(after.quantity_on_hand, None);
    assert_eq!(after.version, 1);
    assert_eq!(after.created_date, before.created_date);
    assert!(after.update_date >= before.update_date);
}

#[tokio::test]
async fn test_replace_unknown_beer_is_not_found() {
    let app = empty_app().await;

    let response = put(
        &app,
        "/api/v1/beer/0190f5d2-7c3a-7cc1-8a41-2f6c3b1d9e77",
        beer_json("Crank", "ALE"),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_replace_with_stale_version_conflicts() {
    let app = empty_app().await;
    let location = create_beer(&app, beer_json("Crank", "PALE_ALE")).await;

    let mut body = beer_json("Crank", "PALE_ALE");
    body["version"] = json!(0);
    assert_eq!(put(&app, &location, body.clone()).await.status, StatusCode::NO_CONTENT);

    // 第二次仍然携带版本 0
    let response = put(&app, &location, body).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_replace_requires_valid_body() {
    let app = empty_app().await;
    let location = create_beer(&app, beer_json("Crank", "PALE_ALE")).await;

    let response = put(&app, &location, json!({ "beerName": "Crank" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ========== 部分更新 ==========

#[tokio::test]
async fn test_empty_patch_only_touches() {
    let app = empty_app().await;
    let location = create_beer(&app, beer_json("Galaxy Cat", "PALE_ALE")).await;
    let before: BeerResponse = get(&app, &location).await.json();

    tokio::time::sleep(Duration::from_millis(5)).await;
    let response = patch(&app, &location, json!({})).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let after: BeerResponse = get(&app, &location).await.json();
    assert_eq!(after.beer_name, before.beer_name);
    assert_eq!(after.beer_style, before.beer_style);
    assert_eq!(after.upc, before.upc);
    assert_eq!(after.quantity_on_hand, before.quantity_on_hand);
    assert_eq!(after.price, before.price);
    assert_eq!(after.created_date, before.created_date);
    assert!(after.update_date > before.update_date);
}

#[tokio::test]
async fn test_patch_blank_name_is_ignored() {
    let app = empty_app().await;
    let location = create_beer(&app, beer_json("Galaxy Cat", "PALE_ALE")).await;

    let response = patch(&app, &location, json!({ "beerName": "" })).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let after: BeerResponse = get(&app, &location).await.json();
    assert_eq!(after.beer_name, "Galaxy Cat");
}

#[tokio::test]
async fn test_patch_price_only() {
    let app = empty_app().await;
    let location = create_beer(&app, beer_json("Galaxy Cat", "PALE_ALE")).await;

    let response = patch(&app, &location, json!({ "price": "9.99", "quantityOnHand": null })).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let after: BeerResponse = get(&app, &location).await.json();
    assert_eq!(after.price, Decimal::new(999, 2));
    assert_eq!(after.beer_name, "Galaxy Cat");
    assert_eq!(after.quantity_on_hand, Some(12));
}

#[tokio::test]
async fn test_patch_too_long_name_is_rejected() {
    let app = empty_app().await;
    let location = create_beer(&app, beer_json("Galaxy Cat", "PALE_ALE")).await;

    let response = patch(&app, &location, json!({ "beerName": "x".repeat(31) })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_rejects_sub_cent_price() {
    let app = empty_app().await;
    let location = create_beer(&app, beer_json("Galaxy Cat", "PALE_ALE")).await;

    let response = patch(&app, &location, json!({ "price": "1.999" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let after: BeerResponse = get(&app, &location).await.json();
    assert_eq!(after.price, Decimal::new(1299, 2));
    assert_eq!(after.version, 0);
}

#[tokio::test]
async fn test_patch_unknown_beer_is_not_found() {
    let app = empty_app().await;

    let response = patch(
        &app,
        "/api/v1/beer/0190f5d2-7c3a-7cc1-8a41-2f6c3b1d9e77",
        json!({ "price": "1.00" }),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// ========== 删除 ==========

#[tokio::test]
async fn test_delete_twice() {
    let app = empty_app().await;
    let location = create_beer(&app, beer_json("Crank", "PALE_ALE")).await;

    assert_eq!(delete(&app, &location).await.status, StatusCode::NO_CONTENT);
    assert_eq!(delete(&app, &location).await.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, &location).await.status, StatusCode::NOT_FOUND);
}

// ========== 列表 ==========

#[tokio::test]
async fn test_list_seeded_beers() {
    let app = seeded_app().await;

    let page: PageResponse<BeerResponse> = get(&app, "/api/v1/beer").await.json();
    assert_eq!(page.total, 3);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 25);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.items[0].beer_name, "Galaxy Cat");
}

#[tokio::test]
async fn test_list_filter_and_projection() {
    let app = seeded_app().await;

    let page: PageResponse<BeerResponse> = get(
        &app,
        "/api/v1/beer?beerName=CITY&beerStyle=IPA&showInventory=false",
    )
    .await
    .json();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].beer_name, "Sunshine City");
    assert_eq!(page.items[0].quantity_on_hand, None);

    let page: PageResponse<BeerResponse> =
        get(&app, "/api/v1/beer?beerStyle=PALE_ALE&showInventory=true").await.json();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|b| b.quantity_on_hand.is_some()));
}

#[tokio::test]
async fn test_list_invalid_style_is_bad_request() {
    let app = seeded_app().await;

    let response = get(&app, "/api/v1/beer?beerStyle=LAMBIC").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ========== 客户 ==========

#[tokio::test]
async fn test_customer_crud() {
    let app = empty_app().await;

    let response = post(&app, "/api/v1/customer", json!({ "name": "terry" })).await;
    assert_eq!(response.status, StatusCode::CREATED);
    let location = response.location();
    assert!(location.starts_with("/api/v1/customer/"));

    let customer: CustomerResponse = get(&app, &location).await.json();
    assert_eq!(customer.name, "terry");
    assert_eq!(customer.email, None);

    let response = patch(&app, &location, json!({ "name": " ", "email": "terry@example.com" })).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let customer: CustomerResponse = get(&app, &location).await.json();
    assert_eq!(customer.name, "terry");
    assert_eq!(customer.email.as_deref(), Some("terry@example.com"));

    let response = put(&app, &location, json!({ "name": "terry2" })).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let customer: CustomerResponse = get(&app, &location).await.json();
    assert_eq!(customer.name, "terry2");
    assert_eq!(customer.version, 2);

    assert_eq!(delete(&app, &location).await.status, StatusCode::NO_CONTENT);
    assert_eq!(delete(&app, &location).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_customer_list_by_name() {
    let app = seeded_app().await;

    let page: PageResponse<CustomerResponse> = get(&app, "/api/v1/customer").await.json();
    assert_eq!(page.total, 3);

    let page: PageResponse<CustomerResponse> = get(&app, "/api/v1/customer?name=terry2").await.json();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "terry2");
}

#[tokio::test]
async fn test_customer_requires_name() {
    let app = empty_app().await;

    let response = post(&app, "/api/v1/customer", json!({ "email": "a@example.com" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ========== 认证 ==========

const ROLE: &str = "ROLE_cleverbits-data-management";

async fn secured_app() -> (axum::Router, Arc<TokenService>) {
    let tokens = Arc::new(TokenService::new("test_secret", 3600, "taproom", "taproom-api"));
    let state = AppState::in_memory(true).await.unwrap().with_auth(AuthSettings {
        tokens: tokens.clone(),
        list_beers_role: Some(ROLE.to_string()),
    });
    (api::router(state), tokens)
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (app, _) = secured_app().await;

    let response = get(&app, "/api/v1/customer").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.content_type(), Some("application/problem+json"));

    let response = send(&app, Method::GET, "/api/v1/customer", None, Some("garbage")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_beers_requires_role() {
    let (app, tokens) = secured_app().await;

    let plain = tokens.generate_access_token("brewer", vec![]).unwrap();
    let response = send(&app, Method::GET, "/api/v1/beer", None, Some(&plain)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // 其他路由只要求登录
    let response = send(&app, Method::GET, "/api/v1/customer", None, Some(&plain)).await;
    assert_eq!(response.status, StatusCode::OK);

    let privileged = tokens
        .generate_access_token("manager", vec![ROLE.to_string()])
        .unwrap();
    let response = send(&app, Method::GET, "/api/v1/beer", None, Some(&privileged)).await;
    assert_eq!(response.status, StatusCode::OK);
}
