//! In-memory notice collection with ownership and validation guards.
//!
//! # Responsibility
//! - Apply create/update/delete/comment/view/favorite mutations.
//! - Keep the favorites set referentially consistent with the collection.
//!
//! # Invariants
//! - Newest notices sit at the front of the collection.
//! - `update` preserves `id`, `created_at`, `user_id`, `views`, `comments`.
//! - `views` only ever grows; the caller decides when an open counts.

use crate::model::id::{generate_notice_id, NoticeId};
use crate::model::notice::{Comment, Notice, NoticeDraft, UserId, ValidationError};
use chrono::{Local, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for notice mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Field-level input problem; user-correctable.
    Validation(ValidationError),
    /// Stale reference to a notice that no longer exists.
    NotFound(NoticeId),
    /// Mutation attempted by an identity that does not own the notice.
    Forbidden { id: NoticeId, requester: UserId },
    /// Operation requires a logged-in identity.
    LoginRequired,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "notice not found: {id}"),
            Self::Forbidden { id, requester } => {
                write!(f, "notice `{id}` is not owned by `{requester}`")
            }
            Self::LoginRequired => write!(f, "a logged-in identity is required"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// The in-memory working copy of the notice collection and favorites set.
///
/// Pure with respect to storage: the composition root loads it from the slot
/// store on start and writes the affected slots back after each mutation.
#[derive(Debug, Default)]
pub struct NoticeRepository {
    notices: Vec<Notice>,
    favorites: Vec<NoticeId>,
}

impl NoticeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the working copy from deserialized slot contents.
    ///
    /// Favorite ids that reference no existing notice are dropped, and
    /// duplicates collapse to the first occurrence, so referential integrity
    /// holds even when the persisted blobs disagree.
    pub fn from_parts(notices: Vec<Notice>, favorites: Vec<NoticeId>) -> Self {
        let mut seen: Vec<NoticeId> = Vec::with_capacity(favorites.len());
        for id in favorites {
            if notices.iter().any(|notice| notice.id == id) && !seen.contains(&id) {
                seen.push(id);
            }
        }
        Self {
            notices,
            favorites: seen,
        }
    }

    /// All notices, newest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Favorite notice ids in toggle order.
    pub fn favorites(&self) -> &[NoticeId] {
        &self.favorites
    }

    pub fn get(&self, id: &str) -> Option<&Notice> {
        self.notices.iter().find(|notice| notice.id == id)
    }

    /// Creates a notice owned by `owner` and returns it.
    ///
    /// # Contract
    /// - Fresh unique id; `created_at = updated_at = now`.
    /// - `views = 0`, `comments = []`.
    /// - Fails with [`RepoError::Validation`] on any field rule violation.
    pub fn create(&mut self, draft: NoticeDraft, owner: &str) -> RepoResult<&Notice> {
        draft.validate(Local::now().date_naive())?;
        let category = draft.category.ok_or(ValidationError::MissingCategory)?;
        let now_ms = Utc::now().timestamp_millis();

        let notice = Notice {
            id: generate_notice_id(),
            title: draft.title.trim().to_string(),
            category,
            priority: draft.priority,
            content: draft.content,
            location: normalized(draft.location),
            contact_name: normalized(draft.contact_name),
            contact_email: normalized(draft.contact_email),
            contact_phone: normalized(draft.contact_phone),
            image_url: draft.image_url,
            expiry_date: draft.expiry_date,
            created_at: now_ms,
            updated_at: now_ms,
            views: 0,
            comments: Vec::new(),
            user_id: owner.to_string(),
        };

        self.notices.insert(0, notice);
        Ok(&self.notices[0])
    }

    /// Replaces the user-editable fields of an owned notice.
    ///
    /// `id`, `created_at`, `user_id`, `views` and `comments` are preserved;
    /// `updated_at` is refreshed.
    pub fn update(&mut self, id: &str, draft: NoticeDraft, requester: &str) -> RepoResult<&Notice> {
        let index = self.index_of_owned(id, requester)?;
        draft.validate(Local::now().date_naive())?;
        let category = draft.category.ok_or(ValidationError::MissingCategory)?;

        let notice = &mut self.notices[index];
        notice.title = draft.title.trim().to_string();
        notice.category = category;
        notice.priority = draft.priority;
        notice.content = draft.content;
        notice.location = normalized(draft.location);
        notice.contact_name = normalized(draft.contact_name);
        notice.contact_email = normalized(draft.contact_email);
        notice.contact_phone = normalized(draft.contact_phone);
        notice.image_url = draft.image_url;
        notice.expiry_date = draft.expiry_date;
        notice.updated_at = Utc::now().timestamp_millis();

        Ok(&self.notices[index])
    }

    /// Removes an owned notice and returns the removed record.
    ///
    /// The id also leaves the favorites set, keeping stale references out of
    /// the favorites view.
    pub fn delete(&mut self, id: &str, requester: &str) -> RepoResult<Notice> {
        let index = self.index_of_owned(id, requester)?;
        let removed = self.notices.remove(index);
        self.favorites.retain(|favorite| favorite != &removed.id);
        Ok(removed)
    }

    /// Increments the open counter and returns the new count.
    ///
    /// The caller is responsible for invoking this at most once per open
    /// transition; the repository only guarantees monotonic growth.
    pub fn record_view(&mut self, id: &str) -> RepoResult<u64> {
        let notice = self
            .notices
            .iter_mut()
            .find(|notice| notice.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        notice.views = notice.views.saturating_add(1);
        Ok(notice.views)
    }

    /// Appends a comment by a logged-in identity.
    pub fn add_comment(
        &mut self,
        id: &str,
        author: Option<&str>,
        text: &str,
    ) -> RepoResult<&Comment> {
        let author = author.ok_or(RepoError::LoginRequired)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyComment.into());
        }

        let notice = self
            .notices
            .iter_mut()
            .find(|notice| notice.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        notice.comments.push(Comment {
            author: author.to_string(),
            text: trimmed.to_string(),
            created_at: Utc::now().timestamp_millis(),
        });
        Ok(notice.comments.last().expect("comment was just appended"))
    }

    /// Toggles favorite membership and reports the resulting state.
    ///
    /// Works for any identity including anonymous; only existence is checked.
    pub fn toggle_favorite(&mut self, id: &str) -> RepoResult<bool> {
        if self.get(id).is_none() {
            return Err(RepoError::NotFound(id.to_string()));
        }
        if let Some(position) = self.favorites.iter().position(|favorite| favorite == id) {
            self.favorites.remove(position);
            Ok(false)
        } else {
            self.favorites.push(id.to_string());
            Ok(true)
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|favorite| favorite == id)
    }

    /// Favorited notices in collection order.
    pub fn favorite_notices(&self) -> Vec<&Notice> {
        self.notices
            .iter()
            .filter(|notice| self.is_favorite(&notice.id))
            .collect()
    }

    fn index_of_owned(&self, id: &str, requester: &str) -> RepoResult<usize> {
        let index = self
            .notices
            .iter()
            .position(|notice| notice.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        if self.notices[index].user_id != requester {
            return Err(RepoError::Forbidden {
                id: id.to_string(),
                requester: requester.to_string(),
            });
        }
        Ok(index)
    }
}

fn normalized(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
