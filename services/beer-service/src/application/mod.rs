//! 应用层

mod beer_service;
mod customer_service;
mod queries;

pub use beer_service::BeerService;
pub use customer_service::CustomerService;
pub use queries::*;
