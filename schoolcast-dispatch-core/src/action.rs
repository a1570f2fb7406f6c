//! Action traits for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions describe either an intent (`Fetch`, `Create`) or the outcome of
/// async work (`DidLoad`, `DidFail`). They must be:
/// - Clone: the middleware logs them before the reducer consumes them
/// - Debug: for logging
/// - Send + 'static: results are sent back from spawned request tasks
///
/// Use `#[derive(Action)]` from `schoolcast-dispatch-macros` to implement it.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Grouping of actions by the slice they target
///
/// Generated by `#[action(infer_categories)]`. `AdminsFetch` and
/// `Admins(..)` both land in `"admins"`; bare verbs such as `Quit`
/// are uncategorized.
pub trait ActionCategory: Action {
    /// Category name, or `None` for global actions
    fn category(&self) -> Option<&'static str>;
}

/// Short, log-friendly rendering of an action
///
/// The default falls back to `Debug`. Override it for actions carrying whole
/// pages of records so the log shows counts instead of payloads.
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}
