//! Repository traits for tag operations.

pub mod tags;

pub use tags::{TagRepo, order_by_clause};
