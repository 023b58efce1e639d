//! Query pipeline over the notice collection.
//!
//! # Responsibility
//! - Evaluate scope, search, category and priority filters in order.
//! - Sort deterministically and window the result for incremental loading.
//!
//! # Invariants
//! - Evaluation never mutates the repository; it is safe at any cadence.
//! - Sorting is stable: equal keys preserve current relative order.

pub mod pipeline;

pub use pipeline::{run, NoticeQuery, QueryOutcome, Scope, SortKey, DEFAULT_PAGE_SIZE};
