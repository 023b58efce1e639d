//! Notice repository: the in-memory working copy of board state.
//!
//! # Responsibility
//! - Own the notice collection and the favorites set between store syncs.
//! - Enforce ownership and validation guards on every mutation.
//!
//! # Invariants
//! - `id`, `created_at` and `user_id` survive every update unchanged.
//! - Deleting a notice removes its id from the favorites set.

pub mod notice_repo;
