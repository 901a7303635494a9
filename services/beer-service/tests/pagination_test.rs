//! 列表分页集成测试

mod common;

use axum::http::StatusCode;
use beer_service::api::dto::{BeerResponse, PageResponse};
use common::*;

async fn app_with_beers(count: usize) -> axum::Router {
    let app = empty_app().await;
    for i in 1..=count {
        let response = post(&app, "/api/v1/beer", beer_json(&format!("Beer {:02}", i), "LAGER")).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }
    app
}

fn names(page: &PageResponse<BeerResponse>) -> Vec<String> {
    page.items.iter().map(|b| b.beer_name.clone()).collect()
}

#[tokio::test]
async fn test_second_page_of_ten() {
    let app = app_with_beers(50).await;

    let page: PageResponse<BeerResponse> =
        get(&app, "/api/v1/beer?pageNumber=2&pageSize=10").await.json();

    let expected: Vec<String> = (11..=20).map(|i| format!("Beer {:02}", i)).collect();
    assert_eq!(names(&page), expected);
    assert_eq!(page.total, 50);
    assert_eq!(page.page, 2);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.total_pages, 5);
}

#[tokio::test]
async fn test_default_page_size() {
    let app = app_with_beers(50).await;

    let page: PageResponse<BeerResponse> = get(&app, "/api/v1/beer").await.json();
    assert_eq!(page.items.len(), 25);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 25);
    assert_eq!(page.items[0].beer_name, "Beer 01");
}

#[tokio::test]
async fn test_oversized_page_is_clamped() {
    let app = app_with_beers(3).await;

    let page: PageResponse<BeerResponse> = get(&app, "/api/v1/beer?pageSize=5000").await.json();
    assert_eq!(page.page_size, 1000);
    assert_eq!(page.items.len(), 3);
}

#[tokio::test]
async fn test_non_positive_values_fall_back() {
    let app = app_with_beers(30).await;

    let page: PageResponse<BeerResponse> =
        get(&app, "/api/v1/beer?pageNumber=0&pageSize=0").await.json();
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 25);
    assert_eq!(page.items.len(), 25);

    let page: PageResponse<BeerResponse> =
        get(&app, "/api/v1/beer?pageNumber=-3&pageSize=-1").await.json();
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 25);
}

#[tokio::test]
async fn test_page_past_end_is_empty() {
    let app = app_with_beers(5).await;

    let page: PageResponse<BeerResponse> =
        get(&app, "/api/v1/beer?pageNumber=3&pageSize=10").await.json();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 5);
}

#[tokio::test]
async fn test_filtered_total_counts_matches_only() {
    let app = app_with_beers(12).await;
    for i in 1..=4 {
        post(&app, "/api/v1/beer", beer_json(&format!("Hazy {}", i), "IPA")).await;
    }

    let page: PageResponse<BeerResponse> =
        get(&app, "/api/v1/beer?beerStyle=IPA&pageSize=3").await.json();
    assert_eq!(page.total, 4);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total_pages, 2);

    let page: PageResponse<BeerResponse> = get(&app, "/api/v1/beer?beerName=hazy%204").await.json();
    assert_eq!(page.total, 1);
}
