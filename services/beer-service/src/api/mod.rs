//! REST API

mod auth;
mod beer_handlers;
mod customer_handlers;
pub mod dto;
mod extract;
mod state;

pub use auth::auth_middleware;
pub use state::{AppState, AuthSettings};

use axum::{Router, middleware, routing::get};

pub const BEER_PATH: &str = "/api/v1/beer";
pub const CUSTOMER_PATH: &str = "/api/v1/customer";

/// 构建 `/api/v1` 路由；启用认证时所有路由都要求 Bearer token
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            BEER_PATH,
            get(beer_handlers::list_beers).post(beer_handlers::create_beer),
        )
        .route(
            "/api/v1/beer/{beer_id}",
            get(beer_handlers::get_beer)
                .put(beer_handlers::update_beer)
                .patch(beer_handlers::patch_beer)
                .delete(beer_handlers::delete_beer),
        )
        .route(
            CUSTOMER_PATH,
            get(customer_handlers::list_customers).post(customer_handlers::create_customer),
        )
        .route(
            "/api/v1/customer/{customer_id}",
            get(customer_handlers::get_customer)
                .put(customer_handlers::update_customer)
                .patch(customer_handlers::patch_customer)
                .delete(customer_handlers::delete_customer),
        );

    let api = match &state.auth {
        Some(auth) => api.route_layer(middleware::from_fn_with_state(
            auth.tokens.clone(),
            auth_middleware,
        )),
        None => api,
    };

    api.with_state(state)
}
