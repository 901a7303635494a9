//! taproom-adapter-postgres - PostgreSQL 适配器

mod config;
mod connection;
mod error;
mod query;

pub use config::*;
pub use connection::*;
pub use error::*;
pub use query::*;
