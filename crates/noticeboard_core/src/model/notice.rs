//! Notice domain records and field validation.
//!
//! # Responsibility
//! - Define the canonical `Notice` record persisted in the `notices` slot.
//! - Validate user-submitted drafts before any mutation is applied.
//! - Provide the plain-text helpers (tag stripping, email syntax) shared by
//!   validation and search.
//!
//! # Invariants
//! - Serialized field names are camelCase, matching the slot blob format.
//! - `created_at` and `user_id` are set at creation and never change.
//! - `expiry_date` must be strictly after "today" at write time.

use crate::model::id::NoticeId;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mock session identity. Any claimed identity is trusted implicitly.
pub type UserId = String;

/// Largest accepted inline-encoded image, measured in decoded bytes.
pub const MAX_INLINE_IMAGE_BYTES: usize = 2 * 1024 * 1024;

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Posting category shown as a filterable badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Announcement,
    Event,
    Classified,
    Job,
    LostFound,
    Community,
}

impl Category {
    /// Serialized slug, also used by filter inputs.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Announcement => "announcement",
            Self::Event => "event",
            Self::Classified => "classified",
            Self::Job => "job",
            Self::LostFound => "lost-found",
            Self::Community => "community",
        }
    }

    /// Parses a filter slug. Returns `None` for unknown values.
    pub fn from_slug(value: &str) -> Option<Self> {
        match value {
            "announcement" => Some(Self::Announcement),
            "event" => Some(Self::Event),
            "classified" => Some(Self::Classified),
            "job" => Some(Self::Job),
            "lost-found" => Some(Self::LostFound),
            "community" => Some(Self::Community),
            _ => None,
        }
    }
}

/// Notice urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Urgent,
    Normal,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}

impl Priority {
    /// Sort rank: urgent outranks normal outranks low.
    pub fn rank(self) -> u8 {
        match self {
            Self::Urgent => 3,
            Self::Normal => 2,
            Self::Low => 1,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        match value {
            "urgent" => Some(Self::Urgent),
            "normal" => Some(Self::Normal),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Single comment attached to a notice. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Identity of the commenting session.
    pub author: UserId,
    pub text: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// Canonical notice record.
///
/// The optional contact and location fields stay `None` when the submitting
/// form left them blank, and are omitted from the serialized blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Stable opaque id, assigned at creation.
    pub id: NoticeId,
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    /// Rich text stored as markup; search sees the tag-stripped form.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    /// Optional image, possibly a large inline-encoded data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    /// Epoch milliseconds; immutable after creation.
    pub created_at: i64,
    /// Epoch milliseconds; refreshed on every edit.
    pub updated_at: i64,
    /// Open counter. Absent in older blobs, so it defaults to 0.
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Owning identity; never reassigned.
    pub user_id: UserId,
}

impl Notice {
    /// Whether the notice has passed its expiry date as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry < today)
    }
}

/// User-submitted notice fields, before ids and timestamps are assigned.
#[derive(Debug, Clone, Default)]
pub struct NoticeDraft {
    pub title: String,
    pub category: Option<Category>,
    pub priority: Priority,
    pub content: String,
    pub location: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub image_url: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

impl NoticeDraft {
    /// Validates all field-level rules against `today`.
    ///
    /// # Contract
    /// - `title` must be non-empty after trimming.
    /// - `category` must be present.
    /// - `content` must be non-empty after tag stripping.
    /// - `contact_email`, when present, must be syntactically valid.
    /// - `expiry_date`, when present, must be strictly after `today`.
    /// - An inline-encoded image must decode to at most
    ///   [`MAX_INLINE_IMAGE_BYTES`].
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.category.is_none() {
            return Err(ValidationError::MissingCategory);
        }
        if strip_markup(&self.content).is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        if let Some(email) = self.contact_email.as_deref() {
            if !email.is_empty() && !is_valid_email(email) {
                return Err(ValidationError::InvalidEmail(email.to_string()));
            }
        }
        if let Some(expiry) = self.expiry_date {
            if expiry <= today {
                return Err(ValidationError::ExpiryNotInFuture(expiry));
            }
        }
        if let Some(image_url) = self.image_url.as_deref() {
            let bytes = inline_image_bytes(image_url);
            if bytes > MAX_INLINE_IMAGE_BYTES {
                return Err(ValidationError::OversizedImage { bytes });
            }
        }
        Ok(())
    }
}

/// Field-level validation failure. User-correctable, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    MissingCategory,
    EmptyContent,
    InvalidEmail(String),
    ExpiryNotInFuture(NaiveDate),
    OversizedImage { bytes: usize },
    EmptyComment,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::MissingCategory => write!(f, "category is required"),
            Self::EmptyContent => write!(f, "content is required"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::ExpiryNotInFuture(date) => {
                write!(f, "expiry date {date} must be in the future")
            }
            Self::OversizedImage { bytes } => write!(
                f,
                "inline image is {bytes} bytes, limit is {MAX_INLINE_IMAGE_BYTES}"
            ),
            Self::EmptyComment => write!(f, "comment cannot be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Reduces markup to searchable plain text.
///
/// Removes tags, decodes the common entities, collapses whitespace and trims.
pub fn strip_markup(markup: &str) -> String {
    let without_tags = HTML_TAG_RE.replace_all(markup, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

/// Syntactic email check: one `@`, no whitespace, dotted domain.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn inline_image_bytes(image_url: &str) -> usize {
    let Some(rest) = image_url.strip_prefix("data:") else {
        return 0;
    };
    // Base64 payload follows the first comma; decoded size is 3/4 of it.
    match rest.split_once(',') {
        Some((_, payload)) => payload.len() * 3 / 4,
        None => 0,
    }
}
