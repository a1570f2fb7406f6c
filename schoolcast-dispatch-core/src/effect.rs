//! Effect-based state management
//!
//! Reducers stay synchronous and pure: instead of performing HTTP calls they
//! return effects describing the call. The runtime hands each effect to the
//! application's effect handler, which spawns the request and sends the
//! outcome back as a `Did*` action.
//!
//! ```ignore
//! fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
//!     match action {
//!         Action::Admins(action) => {
//!             slice::reduce(&mut state.admins, action).map_effects(Effect::Admins)
//!         }
//!         Action::Quit => DispatchResult::unchanged(),
//!     }
//! }
//! ```

use std::marker::PhantomData;

use crate::action::Action;
use crate::store::Middleware;

/// Result of dispatching an action to an effect-aware store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified by this action.
    pub changed: bool,
    /// Effects to be processed after dispatch.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change and no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    /// State changed, no effects.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    /// A single effect without a state change.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self {
            changed: false,
            effects: vec![effect],
        }
    }

    /// State changed with a single effect.
    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    /// State changed with several effects.
    #[inline]
    pub fn changed_with_many(effects: Vec<E>) -> Self {
        Self {
            changed: true,
            effects,
        }
    }

    /// Append an effect.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    /// Fold another result into this one.
    pub fn merge(mut self, other: DispatchResult<E>) -> Self {
        self.changed |= other.changed;
        self.effects.extend(other.effects);
        self
    }

    /// Lift slice-level effects into the application's effect type.
    pub fn map_effects<F, T>(self, f: F) -> DispatchResult<T>
    where
        F: FnMut(E) -> T,
    {
        DispatchResult {
            changed: self.changed,
            effects: self.effects.into_iter().map(f).collect(),
        }
    }

    /// Returns true if there are any effects to process.
    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

impl<E> From<bool> for DispatchResult<E> {
    fn from(changed: bool) -> Self {
        Self {
            changed,
            effects: vec![],
        }
    }
}

/// A reducer function that can emit effects.
pub type EffectReducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// Store whose reducer returns [`DispatchResult<E>`].
pub struct EffectStore<S, A, E> {
    state: S,
    reducer: EffectReducer<S, A, E>,
    _marker: PhantomData<(A, E)>,
}

impl<S, A, E> EffectStore<S, A, E>
where
    A: Action,
{
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable access for startup wiring only; everything else dispatches.
    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    #[inline]
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        (self.reducer)(&mut self.state, action)
    }
}

/// An effect store that runs middleware around each dispatch.
pub struct EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    store: EffectStore<S, A, E>,
    middleware: M,
}

impl<S, A, E, M> EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    pub fn new(state: S, reducer: EffectReducer<S, A, E>, middleware: M) -> Self {
        Self {
            store: EffectStore::new(state, reducer),
            middleware,
        }
    }

    #[inline]
    pub fn state(&self) -> &S {
        self.store.state()
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        self.store.state_mut()
    }

    #[inline]
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Dispatch through `before`, the reducer, then `after`.
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        self.middleware.before(&action);
        let result = self.store.dispatch(action.clone());
        self.middleware.after(&action, result.changed);
        result
    }
}
