mod beer;
mod customer;

pub use beer::*;
pub use customer::*;
