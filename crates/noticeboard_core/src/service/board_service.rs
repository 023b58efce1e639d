//! Board composition root.
//!
//! # Responsibility
//! - Own store, repository, session and theme as one application state.
//! - Load slots on start; persist the affected slots after every mutation.
//! - Count a view exactly once per open transition.
//! - Provide the pure presentation-support helpers (relative dates, share
//!   summaries, statistics).
//!
//! # Invariants
//! - A mutation's repository change and store write complete before the
//!   method returns; re-queries after the call observe the new state.
//! - Store write failures are logged and swallowed: the in-memory working
//!   copy stays authoritative for the rest of the process.

use crate::config::BoardConfig;
use crate::model::id::NoticeId;
use crate::model::notice::{strip_markup, Comment, Notice, NoticeDraft, Priority, UserId};
use crate::query::{self, NoticeQuery, QueryOutcome};
use crate::repo::notice_repo::{NoticeRepository, RepoError};
use crate::session::{AuthError, Session};
use crate::store::{
    SlotStore, SLOT_FAVORITES, SLOT_LOGGED_IN_USER, SLOT_NOTICES, SLOT_THEME,
};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Persisted display theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Error surface of the board API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    Repo(RepoError),
    Auth(AuthError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Auth(err) => Some(err),
        }
    }
}

impl From<RepoError> for BoardError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<AuthError> for BoardError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

/// Header counters shown above the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardStats {
    pub total: usize,
    pub this_week: usize,
    pub urgent: usize,
}

/// The application state root the presentation layer talks to.
///
/// Generic over the slot store so tests (and the degraded no-disk mode) can
/// run on [`crate::store::MemorySlotStore`].
pub struct NoticeBoard<S: SlotStore> {
    store: S,
    config: BoardConfig,
    repo: NoticeRepository,
    session: Session,
    theme: Theme,
}

impl<S: SlotStore> NoticeBoard<S> {
    /// Loads all slots and builds the working state.
    ///
    /// A missing slot yields its default; an unreadable or corrupt slot is
    /// logged and treated as missing. Stale favorite ids are dropped.
    pub fn open(store: S, config: BoardConfig) -> Self {
        let notices: Vec<Notice> = load_slot(&store, SLOT_NOTICES).unwrap_or_default();
        let favorites: Vec<NoticeId> = load_slot(&store, SLOT_FAVORITES).unwrap_or_default();
        let identity: Option<UserId> = load_slot(&store, SLOT_LOGGED_IN_USER);
        let theme: Theme = load_slot(&store, SLOT_THEME).unwrap_or_default();

        let favorites_loaded = favorites.len();
        let repo = NoticeRepository::from_parts(notices, favorites);
        let dropped = favorites_loaded - repo.favorites().len();
        if dropped > 0 {
            warn!("event=board_open module=board status=repaired dropped_favorites={dropped}");
        }
        info!(
            "event=board_open module=board status=ok notices={} favorites={} logged_in={}",
            repo.notices().len(),
            repo.favorites().len(),
            identity.is_some()
        );

        Self {
            store,
            config,
            repo,
            session: Session::with_identity(identity),
            theme,
        }
    }

    // ── Notices ────────────────────────────────────────────────────────

    /// Publishes a new notice owned by the logged-in identity.
    pub fn create_notice(&mut self, draft: NoticeDraft) -> Result<Notice, BoardError> {
        let owner = self.require_identity()?;
        let created = self.repo.create(draft, &owner)?.clone();
        self.persist_notices();
        info!(
            "event=notice_create module=board status=ok id={} owner={owner}",
            created.id
        );
        Ok(created)
    }

    /// Replaces the editable fields of a notice owned by the requester.
    pub fn update_notice(&mut self, id: &str, draft: NoticeDraft) -> Result<Notice, BoardError> {
        let requester = self.require_identity()?;
        let updated = self.repo.update(id, draft, &requester)?.clone();
        self.persist_notices();
        info!("event=notice_update module=board status=ok id={id}");
        Ok(updated)
    }

    /// Deletes a notice owned by the requester and prunes it from favorites.
    pub fn delete_notice(&mut self, id: &str) -> Result<Notice, BoardError> {
        let requester = self.require_identity()?;
        let removed = self.repo.delete(id, &requester)?;
        if self.session.open_notice().map(String::as_str) == Some(id) {
            self.session.close_notice();
        }
        self.persist_notices();
        self.persist_favorites();
        info!("event=notice_delete module=board status=ok id={id}");
        Ok(removed)
    }

    /// Opens a notice for display, counting a view on a fresh transition.
    ///
    /// Re-opening the already-open notice does not count. The transition
    /// marker is in-memory only, so the first open after a restart counts.
    pub fn open_notice(&mut self, id: &str) -> Result<&Notice, BoardError> {
        if self.repo.get(id).is_none() {
            return Err(RepoError::NotFound(id.to_string()).into());
        }
        if self.session.begin_open(id) {
            let views = self.repo.record_view(id)?;
            self.persist_notices();
            debug!("event=notice_view module=board status=ok id={id} views={views}");
        }
        self.repo
            .get(id)
            .ok_or_else(|| BoardError::from(RepoError::NotFound(id.to_string())))
    }

    /// Clears the open-notice marker (detail view closed).
    pub fn close_notice(&mut self) {
        self.session.close_notice();
    }

    /// Appends a comment by the logged-in identity.
    pub fn add_comment(&mut self, id: &str, text: &str) -> Result<Comment, BoardError> {
        let author = self.session.current_identity().cloned();
        let comment = self.repo.add_comment(id, author.as_deref(), text)?.clone();
        self.persist_notices();
        info!("event=comment_add module=board status=ok id={id}");
        Ok(comment)
    }

    pub fn get_notice(&self, id: &str) -> Option<&Notice> {
        self.repo.get(id)
    }

    pub fn notices(&self) -> &[Notice] {
        self.repo.notices()
    }

    // ── Favorites ──────────────────────────────────────────────────────

    /// Toggles favorite membership; returns the resulting state.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, BoardError> {
        let now_favorite = self.repo.toggle_favorite(id)?;
        self.persist_favorites();
        debug!("event=favorite_toggle module=board status=ok id={id} favorite={now_favorite}");
        Ok(now_favorite)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.repo.is_favorite(id)
    }

    /// Favorited notices in collection order.
    pub fn favorite_notices(&self) -> Vec<&Notice> {
        self.repo.favorite_notices()
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Evaluates a query against the current collection. Pure.
    pub fn query(&self, query: &NoticeQuery) -> QueryOutcome<'_> {
        query::run(self.repo.notices(), query)
    }

    /// A fresh public-board query using the configured page size.
    pub fn default_query(&self) -> NoticeQuery {
        let mut query = NoticeQuery::new();
        query.set_page_size(self.config.notices_per_page);
        query
    }

    /// A fresh "my notices" query for the current identity.
    ///
    /// When logged out the scope carries no identity and matches nothing,
    /// which is the "log in to see your notices" behavior.
    pub fn my_notices_query(&self) -> NoticeQuery {
        let mut query = NoticeQuery::owned_by(self.session.current_identity().cloned());
        query.set_page_size(self.config.notices_per_page);
        query
    }

    // ── Session ────────────────────────────────────────────────────────

    /// Checks the mock credential pair and persists the identity.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), BoardError> {
        let accepted = self.config.credentials.clone();
        match self.session.login(username, password, &accepted) {
            Ok(identity) => {
                let encoded = serde_json::to_string(&identity);
                self.persist_json(SLOT_LOGGED_IN_USER, encoded);
                info!("event=login module=board status=ok user={identity}");
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=login module=board status=denied user={}",
                    username.trim()
                );
                Err(err.into())
            }
        }
    }

    /// Clears the identity, the open-notice marker and the persisted slot.
    pub fn logout(&mut self) {
        self.session.logout();
        if let Err(err) = self.store.clear_slot(SLOT_LOGGED_IN_USER) {
            error!(
                "event=slot_write module=board status=error slot={SLOT_LOGGED_IN_USER} \
                 error_code=store_clear_failed error={err}"
            );
        }
        info!("event=logout module=board status=ok");
    }

    pub fn current_identity(&self) -> Option<&UserId> {
        self.session.current_identity()
    }

    // ── Theme ──────────────────────────────────────────────────────────

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        let encoded = serde_json::to_string(&theme);
        self.persist_json(SLOT_THEME, encoded);
        debug!(
            "event=theme_set module=board status=ok theme={}",
            theme.as_str()
        );
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set_theme(next);
        next
    }

    // ── Statistics ─────────────────────────────────────────────────────

    pub fn statistics(&self) -> BoardStats {
        compute_statistics(self.repo.notices(), Utc::now().timestamp_millis())
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn require_identity(&self) -> Result<UserId, BoardError> {
        self.session
            .current_identity()
            .cloned()
            .ok_or_else(|| RepoError::LoginRequired.into())
    }

    fn persist_notices(&mut self) {
        let encoded = serde_json::to_string(self.repo.notices());
        self.persist_json(SLOT_NOTICES, encoded);
    }

    fn persist_favorites(&mut self) {
        let encoded = serde_json::to_string(self.repo.favorites());
        self.persist_json(SLOT_FAVORITES, encoded);
    }

    fn persist_json(&mut self, slot: &'static str, encoded: serde_json::Result<String>) {
        let encoded = match encoded {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(
                    "event=slot_write module=board status=error slot={slot} \
                     error_code=encode_failed error={err}"
                );
                return;
            }
        };
        if let Err(err) = self.store.write_slot(slot, &encoded) {
            error!(
                "event=slot_write module=board status=error slot={slot} \
                 error_code=store_write_failed error={err}"
            );
        }
    }
}

fn load_slot<S: SlotStore, T: DeserializeOwned>(store: &S, slot: &str) -> Option<T> {
    match store.read_slot(slot) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    "event=slot_load module=board status=error slot={slot} \
                     error_code=decode_failed error={err}"
                );
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            warn!(
                "event=slot_load module=board status=error slot={slot} \
                 error_code=store_read_failed error={err}"
            );
            None
        }
    }
}

/// Computes the header counters for a point in time.
pub fn compute_statistics(notices: &[Notice], now_ms: i64) -> BoardStats {
    let week_start = now_ms - WEEK_MS;
    BoardStats {
        total: notices.len(),
        this_week: notices
            .iter()
            .filter(|notice| notice.created_at >= week_start)
            .count(),
        urgent: notices
            .iter()
            .filter(|notice| notice.priority == Priority::Urgent)
            .count(),
    }
}

/// Formats a creation timestamp relative to `now_ms`.
///
/// Rules (calendar-day difference, UTC):
/// - same day → `Today, HH:MM`
/// - one day → `Yesterday`
/// - two to six days → `N days ago`
/// - otherwise → plain `YYYY-MM-DD`
pub fn format_relative(then_ms: i64, now_ms: i64) -> String {
    let (Some(then), Some(now)) = (
        DateTime::<Utc>::from_timestamp_millis(then_ms),
        DateTime::<Utc>::from_timestamp_millis(now_ms),
    ) else {
        return "unknown".to_string();
    };

    let days = (now.date_naive() - then.date_naive()).num_days();
    match days {
        0 => format!("Today, {}", then.format("%H:%M")),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        _ => then.format("%Y-%m-%d").to_string(),
    }
}

/// Builds the plain-text share blurb for a notice.
pub fn share_summary(notice: &Notice) -> String {
    let mut summary = format!("{}\n\n{}", notice.title, strip_markup(&notice.content));
    if let Some(location) = notice.location.as_deref() {
        summary.push_str("\n\nLocation: ");
        summary.push_str(location);
    }
    summary.push_str("\n\nCheck it out on the Community Notice Board!");
    summary
}

#[cfg(test)]
mod tests {
    use super::{compute_statistics, format_relative, share_summary, Theme, WEEK_MS};
    use crate::model::notice::{Category, Notice, Priority};

    fn fixture(created_at: i64, priority: Priority) -> Notice {
        Notice {
            id: format!("notice_{created_at}_aaaaaaaaaaaa"),
            title: "Garage sale".to_string(),
            category: Category::Classified,
            priority,
            content: "<p>Everything must <b>go</b></p>".to_string(),
            location: Some("12 Elm St".to_string()),
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            image_url: None,
            expiry_date: None,
            created_at,
            updated_at: created_at,
            views: 0,
            comments: Vec::new(),
            user_id: "user".to_string(),
        }
    }

    #[test]
    fn theme_toggles_between_light_and_dark() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn statistics_count_total_week_and_urgent() {
        let now_ms = 1_700_000_000_000;
        let notices = vec![
            fixture(now_ms - 1_000, Priority::Urgent),
            fixture(now_ms - WEEK_MS + 60_000, Priority::Normal),
            fixture(now_ms - WEEK_MS - 60_000, Priority::Urgent),
        ];

        let stats = compute_statistics(&notices, now_ms);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.this_week, 2);
        assert_eq!(stats.urgent, 2);
    }

    #[test]
    fn relative_dates_follow_calendar_day_buckets() {
        // 2023-11-14 22:13:20 UTC
        let now_ms = 1_700_000_000_000;
        let hour = 60 * 60 * 1000;

        assert_eq!(format_relative(now_ms - hour, now_ms), "Today, 21:13");
        assert_eq!(format_relative(now_ms - 23 * hour, now_ms), "Yesterday");
        assert_eq!(format_relative(now_ms - 3 * 24 * hour, now_ms), "3 days ago");
        assert_eq!(format_relative(now_ms - 30 * 24 * hour, now_ms), "2023-10-15");
    }

    #[test]
    fn share_summary_strips_markup_and_appends_location() {
        let summary = share_summary(&fixture(1_700_000_000_000, Priority::Normal));
        assert!(summary.starts_with("Garage sale\n\nEverything must go"));
        assert!(summary.contains("Location: 12 Elm St"));
        assert!(summary.ends_with("Check it out on the Community Notice Board!"));
    }
}
