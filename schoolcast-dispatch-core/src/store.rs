//! Middleware hooks around the store's dispatch

use crate::action::ActionSummary;
use crate::Action;

/// Middleware trait for intercepting actions
///
/// Called around every reducer invocation. Middleware sees the action and
/// whether the state changed; it never sees or alters effects.
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Middleware that traces every dispatched action
///
/// Uses [`ActionSummary`] so list payloads are logged as counts.
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    /// Log the action before it reaches the reducer
    pub log_before: bool,
    /// Log the action together with the state-changed flag
    pub log_after: bool,
    dispatched: u64,
}

impl LoggingMiddleware {
    /// Log after dispatch only
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
            dispatched: 0,
        }
    }

    /// Log both before and after dispatch
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
            dispatched: 0,
        }
    }

    /// Number of actions seen so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

impl<A: ActionSummary> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        self.dispatched += 1;
        if self.log_before {
            tracing::debug!(action = %action.name(), summary = %action.summary(), "dispatching");
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if self.log_after {
            tracing::debug!(
                action = %action.name(),
                state_changed = state_changed,
                "action processed"
            );
        }
    }
}
