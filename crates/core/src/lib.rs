//! Core domain types and shared logic for tagrank.
//!
//! This crate defines the data model used across all other crates:
//! - Tag records before and after persistence
//! - Batch normalization (relative-frequency percentages)
//! - Sort keys and page windows for ranked reads
//! - Configuration shared by the server, store and source crates

pub mod config;
pub mod error;
pub mod query;
pub mod tag;

pub use error::{Error, Result};
pub use query::{PageRequest, SortKey};
pub use tag::{NewTag, RawTag, TagRecord, normalize};

/// Default page number for ranked reads.
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
