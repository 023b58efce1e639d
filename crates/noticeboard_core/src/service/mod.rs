//! Use-case services over the board state.
//!
//! # Responsibility
//! - Compose store, repository and session into the API the presentation
//!   layer calls.
//! - Host the pure presentation-support helpers (relative dates, share
//!   summaries, statistics).

pub mod board_service;
