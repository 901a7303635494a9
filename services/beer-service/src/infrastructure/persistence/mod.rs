//! Persistence implementations

mod memory;
mod postgres;
mod rows;

pub use memory::InMemoryRecordStore;
pub use postgres::{PostgresBeerStore, PostgresCustomerStore, run_migrations};
