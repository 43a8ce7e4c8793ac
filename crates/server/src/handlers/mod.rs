//! HTTP request handlers.

pub mod health;
pub mod tags;

pub use health::*;
pub use tags::*;
