//! Core domain logic for the community notice board.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod session;
pub mod store;

pub use config::{BoardConfig, ConfigError, Credentials};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::id::{generate_notice_id, NoticeId};
pub use model::notice::{
    is_valid_email, strip_markup, Category, Comment, Notice, NoticeDraft, Priority, UserId,
    ValidationError,
};
pub use query::{NoticeQuery, QueryOutcome, Scope, SortKey, DEFAULT_PAGE_SIZE};
pub use repo::notice_repo::{NoticeRepository, RepoError, RepoResult};
pub use service::board_service::{
    compute_statistics, format_relative, share_summary, BoardError, BoardStats, NoticeBoard, Theme,
};
pub use session::{AuthError, Session};
pub use store::{
    open_store, open_store_in_memory, MemorySlotStore, SlotStore, SqliteSlotStore, StoreError,
    StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
