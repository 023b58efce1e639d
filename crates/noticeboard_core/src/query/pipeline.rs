//! Filter, sort and window evaluation.
//!
//! # Responsibility
//! - Apply the filter chain: scope, free-text search, category, priority.
//! - Order by the selected sort key and return a growing prefix window.
//! - Own the query descriptor whose filter changes reset the window.
//!
//! # Invariants
//! - An absent/empty filter value is a pass-through.
//! - `owned-by` scope with no identity yields an empty result, not an error.
//! - The window is always a prefix of the next-larger window.

use crate::model::notice::{strip_markup, Category, Notice, Priority, UserId};

/// Notices revealed per "load more" increment.
pub const DEFAULT_PAGE_SIZE: u32 = 6;
const PAGE_SIZE_MAX: u32 = 50;

/// Ownership filter applied before every other filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    /// The public board.
    #[default]
    All,
    /// Only notices owned by the given identity. `None` models the
    /// logged-out "my notices" view and matches nothing.
    OwnedBy(Option<UserId>),
}

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first.
    #[default]
    DateDesc,
    /// Oldest first.
    DateAsc,
    /// Urgent before normal before low; ties keep their relative order.
    Priority,
    /// Most viewed first.
    Views,
}

/// Filter/sort/window descriptor.
///
/// Setters reset the window to one page, so a filter change never leaves the
/// caller holding a deep window over a different result sequence. Use
/// [`NoticeQuery::load_more`] to grow the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeQuery {
    scope: Scope,
    search_term: String,
    category: Option<Category>,
    priority: Option<Priority>,
    sort: SortKey,
    page_size: u32,
    page: u32,
}

impl Default for NoticeQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeQuery {
    /// A query over the whole board with no filters and one page windowed.
    pub fn new() -> Self {
        Self {
            scope: Scope::All,
            search_term: String::new(),
            category: None,
            priority: None,
            sort: SortKey::DateDesc,
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }

    /// A query scoped to one identity's notices ("my notices").
    pub fn owned_by(identity: Option<UserId>) -> Self {
        let mut query = Self::new();
        query.scope = Scope::OwnedBy(identity);
        query
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Current window depth in pages, starting at 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Window increment actually applied: 0 falls back to the default and
    /// oversized values clamp to the maximum.
    pub fn effective_page_size(&self) -> u32 {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size.min(PAGE_SIZE_MAX)
        }
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
        self.reset_window();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.reset_window();
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
        self.reset_window();
    }

    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.priority = priority;
        self.reset_window();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.reset_window();
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size;
        self.reset_window();
    }

    /// Drops every filter and the sort override, and resets the window.
    pub fn clear_filters(&mut self) {
        self.search_term.clear();
        self.category = None;
        self.priority = None;
        self.sort = SortKey::DateDesc;
        self.reset_window();
    }

    /// Extends the window by one page-size increment.
    pub fn load_more(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Shrinks the window back to one page.
    pub fn reset_window(&mut self) {
        self.page = 1;
    }
}

/// Windowed evaluation result.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome<'a> {
    /// The visible window: a prefix of the filtered, sorted sequence.
    pub items: Vec<&'a Notice>,
    /// Size of the filtered sequence before windowing.
    pub total_matched: usize,
    /// Whether `load_more` would reveal further notices.
    pub has_more: bool,
}

/// Runs the pipeline over a borrowed notice slice.
pub fn run<'a>(notices: &'a [Notice], query: &NoticeQuery) -> QueryOutcome<'a> {
    let mut matched: Vec<&Notice> = match &query.scope {
        Scope::All => notices.iter().collect(),
        Scope::OwnedBy(None) => Vec::new(),
        Scope::OwnedBy(Some(identity)) => notices
            .iter()
            .filter(|notice| &notice.user_id == identity)
            .collect(),
    };

    let term = query.search_term.trim().to_lowercase();
    if !term.is_empty() {
        matched.retain(|notice| matches_term(notice, &term));
    }
    if let Some(category) = query.category {
        matched.retain(|notice| notice.category == category);
    }
    if let Some(priority) = query.priority {
        matched.retain(|notice| notice.priority == priority);
    }

    // Vec::sort_by is stable, which carries the tie-break guarantee.
    match query.sort {
        SortKey::DateDesc => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::DateAsc => matched.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::Priority => {
            matched.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
        }
        SortKey::Views => matched.sort_by(|a, b| b.views.cmp(&a.views)),
    }

    let total_matched = matched.len();
    let window = query.page.max(1) as usize * query.effective_page_size() as usize;
    matched.truncate(window);

    QueryOutcome {
        has_more: total_matched > window,
        total_matched,
        items: matched,
    }
}

/// Case-insensitive substring match over the searchable fields, OR semantics.
fn matches_term(notice: &Notice, term: &str) -> bool {
    if notice.title.to_lowercase().contains(term) {
        return true;
    }
    if strip_markup(&notice.content).to_lowercase().contains(term) {
        return true;
    }
    let optional_fields = [notice.location.as_deref(), notice.contact_name.as_deref()];
    optional_fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(term))
}
