//! 领域层

pub mod entities;
pub mod seed;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
