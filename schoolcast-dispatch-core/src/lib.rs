//! Core traits and types for schoolcast-dispatch
//!
//! The console keeps all server-derived data in one store and changes it
//! only through actions, following a Redux/Elm-inspired architecture.
//!
//! # Core Concepts
//!
//! - **Action**: describes an intent or the outcome of a request
//! - **EffectStore**: state container whose reducer returns effects
//! - **ResourceSlice**: paginated, filterable collection with request lifecycle
//! - **RequestTracker**: sequence numbers that discard stale responses
//! - **TaskManager**: keyed request tasks with cancellation and debounce
//! - **Schema**: declarative form validation
//! - **Component**: view element rendering from props
//!
//! # Request lifecycle
//!
//! Every backend call is a two-phase action pair:
//!
//! 1. an **intent** (`Fetch`, `Create`, ...) marks the slice pending and
//!    returns an effect carrying a fresh [`RequestSeq`]
//! 2. a **result** (`DidLoad`, `DidFail`, ...) carries the outcome back with
//!    the same sequence number
//!
//! ```ignore
//! use schoolcast_dispatch_core::prelude::*;
//!
//! fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
//!     match action {
//!         Action::Admins(a) => slice::reduce(&mut state.admins, a).map_effects(Effect::Admins),
//!         Action::Quit => DispatchResult::unchanged(),
//!     }
//! }
//!
//! let mut store = EffectStore::new(AppState::default(), reducer);
//! let result = store.dispatch(Action::Admins(ResourceAction::Fetch));
//! assert!(result.has_effects());
//! ```

pub mod action;
pub mod component;
pub mod effect;
pub mod event;
pub mod request;
pub mod runtime;
pub mod slice;
pub mod store;
pub mod tasks;
pub mod testing;
pub mod validation;

pub use action::{Action, ActionCategory, ActionSummary};
pub use component::Component;

pub use event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};

pub use store::{LoggingMiddleware, Middleware, NoopMiddleware};

pub use effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};

pub use request::{RequestCell, RequestSeq, RequestStatus, RequestTracker};

pub use slice::{
    Entity, FilterPatch, Filters, Page, Pagination, ResourceAction, ResourceEffect, ResourceOp,
    ResourceSlice, DEFAULT_PAGE_SIZE,
};

pub use tasks::{TaskKey, TaskManager};

pub use runtime::{EffectContext, EffectRuntime, EffectStoreLike, EventOutcome, PollerConfig};

pub use validation::{Condition, FormValues, Rule, Schema, ValidationErrors};

pub use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    Frame,
};

pub use testing::{
    buffer_to_string_plain, char_key, key, keys, RenderHarness, TestHarness,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionCategory, ActionSummary};
    pub use crate::component::Component;
    pub use crate::effect::{
        DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware,
    };
    pub use crate::event::EventKind;
    pub use crate::request::{RequestCell, RequestSeq, RequestTracker};
    pub use crate::runtime::{EffectContext, EffectRuntime, EventOutcome, PollerConfig};
    pub use crate::slice::{
        self, Entity, FilterPatch, Filters, Page, Pagination, ResourceAction, ResourceEffect,
        ResourceOp, ResourceSlice,
    };
    pub use crate::store::{LoggingMiddleware, Middleware, NoopMiddleware};
    pub use crate::tasks::{TaskKey, TaskManager};
    pub use crate::validation::{Rule, Schema, ValidationErrors};

    pub use ratatui::{
        layout::Rect,
        style::{Color, Modifier, Style},
        text::{Line, Span, Text},
        Frame,
    };
}
