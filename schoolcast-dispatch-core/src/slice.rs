//! Generic resource slice: a paginated, filterable collection kept in sync
//! with the server through pending/fulfilled/rejected actions.
//!
//! Every backend resource (admins, schools, students, ...) gets one
//! [`ResourceSlice`] in the application state and routes its
//! [`ResourceAction`]s through [`reduce`]. The reducer never performs I/O;
//! it returns [`ResourceEffect`]s that the application turns into HTTP calls.
//!
//! Merge rules after mutations:
//! - create prepends the new record and bumps `pagination.total` by one
//! - update replaces the record in place; an unknown id is a no-op
//! - delete removes the record and lowers `pagination.total` by one, even
//!   when the id was not in the local page
//!
//! List and detail responses are sequenced: only the response to the most
//! recently issued request is committed.

use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionSummary};
use crate::effect::DispatchResult;
use crate::request::{RequestCell, RequestSeq, RequestTracker};

/// Default page size used when the server does not echo one back.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A server record managed by a [`ResourceSlice`].
pub trait Entity: Clone + Debug + Send + 'static {
    /// Identifier used to match records across responses.
    type Id: Clone + PartialEq + Debug + Display + Send + 'static;
    /// Write payload for create/update.
    type Draft: Clone + Debug + PartialEq + Send + 'static;

    /// Human readable singular name, e.g. `"Admin"`.
    const LABEL: &'static str;

    fn id(&self) -> &Self::Id;
}

/// Pagination block returned alongside every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            total: 0,
            total_pages: 0,
        }
    }
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Search and paging parameters driving a list fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub search: String,
    pub page: u32,
    pub limit: u32,
}

impl Default for Filters {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PAGE_SIZE)
    }
}

impl Filters {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            search: String::new(),
            page: 1,
            limit,
        }
    }

    /// Shallow merge: fields absent from `patch` stay as they are.
    ///
    /// Returns whether anything changed.
    pub fn apply(&mut self, patch: FilterPatch) -> bool {
        let before = self.clone();
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(page) = patch.page {
            self.page = page.max(1);
        }
        if let Some(limit) = patch.limit {
            self.limit = limit.max(1);
        }
        *self != before
    }

    /// Query parameters for a list call. `search` is left out entirely when
    /// it is blank.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

/// Partial update for [`Filters`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl FilterPatch {
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Default::default()
        }
    }

    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }
}

/// One page of records as returned by a list endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Which request family an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOp {
    List,
    Detail,
    Create,
    Update,
    Delete,
}

impl ResourceOp {
    fn is_mutation(self) -> bool {
        matches!(self, ResourceOp::Create | ResourceOp::Update | ResourceOp::Delete)
    }
}

impl Display for ResourceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceOp::List => "list",
            ResourceOp::Detail => "detail",
            ResourceOp::Create => "create",
            ResourceOp::Update => "update",
            ResourceOp::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// Actions understood by every resource slice.
///
/// Intents (`Fetch`, `Create`, ...) start the pending phase; the `Did*`
/// variants carry the outcome of the spawned request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceAction<T: Entity> {
    // ===== synchronous =====
    SetFilters(FilterPatch),
    ClearError,
    ClearNotice,
    Reset,

    // ===== intents =====
    /// Fetch the list for the current filters.
    Fetch,
    /// Update the search text, go back to page 1 and fetch after a delay.
    Search(String),
    /// Move to a page and fetch it.
    GoToPage(u32),
    FetchOne(T::Id),
    Create(T::Draft),
    Update(T::Id, T::Draft),
    Delete(T::Id),

    // ===== results =====
    DidLoad { seq: RequestSeq, page: Page<T> },
    DidLoadOne { seq: RequestSeq, item: T },
    DidCreate { seq: RequestSeq, item: T },
    DidUpdate { seq: RequestSeq, item: T },
    DidDelete { seq: RequestSeq, id: T::Id },
    DidFail { op: ResourceOp, seq: RequestSeq, error: String },
}

impl<T: Entity> Action for ResourceAction<T> {
    fn name(&self) -> &'static str {
        match self {
            ResourceAction::SetFilters(_) => "SetFilters",
            ResourceAction::ClearError => "ClearError",
            ResourceAction::ClearNotice => "ClearNotice",
            ResourceAction::Reset => "Reset",
            ResourceAction::Fetch => "Fetch",
            ResourceAction::Search(_) => "Search",
            ResourceAction::GoToPage(_) => "GoToPage",
            ResourceAction::FetchOne(_) => "FetchOne",
            ResourceAction::Create(_) => "Create",
            ResourceAction::Update(_, _) => "Update",
            ResourceAction::Delete(_) => "Delete",
            ResourceAction::DidLoad { .. } => "DidLoad",
            ResourceAction::DidLoadOne { .. } => "DidLoadOne",
            ResourceAction::DidCreate { .. } => "DidCreate",
            ResourceAction::DidUpdate { .. } => "DidUpdate",
            ResourceAction::DidDelete { .. } => "DidDelete",
            ResourceAction::DidFail { .. } => "DidFail",
        }
    }
}

impl<T: Entity> ActionSummary for ResourceAction<T> {
    fn summary(&self) -> String {
        match self {
            ResourceAction::DidLoad { seq, page } => format!(
                "{}::DidLoad {{ seq: {}, items: {}, total: {} }}",
                T::LABEL,
                seq,
                page.items.len(),
                page.pagination.total
            ),
            ResourceAction::DidFail { op, seq, error } => {
                format!("{}::DidFail {{ op: {}, seq: {}, error: {:?} }}", T::LABEL, op, seq, error)
            }
            // Drafts may carry passwords
            ResourceAction::Create(_) => format!("{}::Create", T::LABEL),
            ResourceAction::Update(id, _) => format!("{}::Update({})", T::LABEL, id),
            other => format!("{}::{}", T::LABEL, other.name()),
        }
    }
}

/// Async work requested by the slice reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEffect<T: Entity> {
    List {
        seq: RequestSeq,
        filters: Filters,
        /// Delay the request; a newer list effect replaces a pending one.
        debounce: bool,
    },
    Get {
        seq: RequestSeq,
        id: T::Id,
    },
    Create {
        seq: RequestSeq,
        draft: T::Draft,
    },
    Update {
        seq: RequestSeq,
        id: T::Id,
        draft: T::Draft,
    },
    Delete {
        seq: RequestSeq,
        id: T::Id,
    },
}

/// Client-side snapshot of one backend resource.
#[derive(Debug, Clone)]
pub struct ResourceSlice<T: Entity> {
    /// Current page, in server order (plus locally prepended creations).
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub filters: Filters,
    /// Record loaded through `FetchOne`.
    pub current: RequestCell<T>,
    /// Last error from any request family; cleared by `ClearError`.
    pub error: Option<String>,
    /// Last successful mutation, e.g. "Admin created".
    pub notice: Option<String>,
    list: RequestTracker,
    mutation: RequestTracker,
}

impl<T: Entity> Default for ResourceSlice<T> {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl<T: Entity> ResourceSlice<T> {
    pub fn with_page_size(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination {
                limit,
                ..Pagination::default()
            },
            filters: Filters::with_limit(limit),
            current: RequestCell::new(),
            error: None,
            notice: None,
            list: RequestTracker::new(),
            mutation: RequestTracker::new(),
        }
    }

    /// True while a list request is in flight.
    pub fn is_loading(&self) -> bool {
        self.list.is_loading()
    }

    /// True while a create/update/delete is in flight.
    pub fn is_saving(&self) -> bool {
        self.mutation.is_loading()
    }

    pub fn list_tracker(&self) -> &RequestTracker {
        &self.list
    }

    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn begin_list(&mut self, debounce: bool) -> ResourceEffect<T> {
        self.error = None;
        let seq = self.list.begin();
        ResourceEffect::List {
            seq,
            filters: self.filters.clone(),
            debounce,
        }
    }

    fn begin_mutation(&mut self) -> RequestSeq {
        self.error = None;
        self.notice = None;
        self.mutation.begin()
    }

    fn settle_mutation(&mut self, seq: RequestSeq, verb: &str) {
        // Data from an older mutation is still merged; only the flag waits
        // for the latest one.
        self.mutation.settle(seq);
        self.notice = Some(format!("{} {}", T::LABEL, verb));
    }
}

/// Reducer shared by every resource slice.
pub fn reduce<T: Entity>(
    slice: &mut ResourceSlice<T>,
    action: ResourceAction<T>,
) -> DispatchResult<ResourceEffect<T>> {
    match action {
        // ===== synchronous =====
        ResourceAction::SetFilters(patch) => slice.filters.apply(patch).into(),

        ResourceAction::ClearError => {
            let had_current = slice.current.clear_error();
            (slice.error.take().is_some() || had_current).into()
        }

        ResourceAction::ClearNotice => slice.notice.take().is_some().into(),

        ResourceAction::Reset => {
            slice.items.clear();
            slice.pagination = Pagination {
                limit: slice.filters.limit,
                ..Pagination::default()
            };
            slice.list.reset();
            DispatchResult::changed()
        }

        // ===== intents =====
        ResourceAction::Fetch => DispatchResult::changed_with(slice.begin_list(false)),

        ResourceAction::Search(search) => {
            slice.filters.apply(FilterPatch {
                search: Some(search),
                page: Some(1),
                limit: None,
            });
            DispatchResult::changed_with(slice.begin_list(true))
        }

        ResourceAction::GoToPage(page) => {
            let last = slice.pagination.total_pages.max(1);
            let page = page.clamp(1, last);
            if page == slice.filters.page && !slice.items.is_empty() {
                return DispatchResult::unchanged();
            }
            slice.filters.apply(FilterPatch::page(page));
            DispatchResult::changed_with(slice.begin_list(false))
        }

        ResourceAction::FetchOne(id) => {
            slice.error = None;
            let seq = slice.current.begin();
            DispatchResult::changed_with(ResourceEffect::Get { seq, id })
        }

        ResourceAction::Create(draft) => {
            let seq = slice.begin_mutation();
            DispatchResult::changed_with(ResourceEffect::Create { seq, draft })
        }

        ResourceAction::Update(id, draft) => {
            let seq = slice.begin_mutation();
            DispatchResult::changed_with(ResourceEffect::Update { seq, id, draft })
        }

        ResourceAction::Delete(id) => {
            let seq = slice.begin_mutation();
            DispatchResult::changed_with(ResourceEffect::Delete { seq, id })
        }

        // ===== results =====
        ResourceAction::DidLoad { seq, page } => {
            if !slice.list.settle(seq) {
                return DispatchResult::unchanged();
            }
            slice.items = page.items;
            slice.pagination = page.pagination;
            slice.error = None;
            DispatchResult::changed()
        }

        ResourceAction::DidLoadOne { seq, item } => slice.current.fulfill(seq, item).into(),

        ResourceAction::DidCreate { seq, item } => {
            slice.items.insert(0, item);
            slice.pagination.total += 1;
            slice.settle_mutation(seq, "created");
            DispatchResult::changed()
        }

        ResourceAction::DidUpdate { seq, item } => {
            if let Some(existing) = slice.items.iter_mut().find(|i| i.id() == item.id()) {
                *existing = item.clone();
            }
            if let Some(current) = slice.current.data.as_mut() {
                if current.id() == item.id() {
                    *current = item;
                }
            }
            slice.settle_mutation(seq, "updated");
            DispatchResult::changed()
        }

        ResourceAction::DidDelete { seq, id } => {
            if let Some(pos) = slice.items.iter().position(|i| i.id() == &id) {
                slice.items.remove(pos);
            }
            // Decrements even when the id was not on this page.
            slice.pagination.total = slice.pagination.total.saturating_sub(1);
            if slice.current.data.as_ref().is_some_and(|c| c.id() == &id) {
                slice.current.data = None;
            }
            slice.settle_mutation(seq, "deleted");
            DispatchResult::changed()
        }

        ResourceAction::DidFail { op, seq, error } => {
            let accepted = match op {
                ResourceOp::List => slice.list.settle(seq),
                ResourceOp::Detail => slice.current.reject(seq, error.clone()),
                _ => {
                    debug_assert!(op.is_mutation());
                    slice.mutation.settle(seq);
                    true
                }
            };
            if !accepted {
                return DispatchResult::unchanged();
            }
            tracing::warn!(resource = T::LABEL, %op, %error, "request failed");
            slice.error = Some(error);
            DispatchResult::changed()
        }
    }
}
