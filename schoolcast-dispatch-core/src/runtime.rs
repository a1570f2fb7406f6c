//! Event/action/render loop for effect-based stores
//!
//! One loop owns the store. Terminal events are mapped to actions by the
//! view layer, actions are reduced, and the effects a reduction returns are
//! handed to the application's effect handler together with an
//! [`EffectContext`] for spawning requests. Request results come back
//! through the same action channel.

use std::io;
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};
use crate::event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
use crate::store::Middleware;
use crate::tasks::TaskManager;
use crate::Action;

/// Configuration for the event poller.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    /// Timeout passed to each `crossterm::event::poll` call.
    pub poll_timeout: Duration,
    /// Sleep between poll cycles.
    pub loop_sleep: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(10),
            loop_sleep: Duration::from_millis(16),
        }
    }
}

/// Actions produced by one input event, plus a render hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome<A> {
    pub actions: Vec<A>,
    /// Re-render even if no action changes state (cursor moves etc.).
    pub needs_render: bool,
}

impl<A> EventOutcome<A> {
    pub fn ignored() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: false,
        }
    }

    pub fn needs_render() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: true,
        }
    }

    pub fn action(action: A) -> Self {
        Self {
            actions: vec![action],
            needs_render: false,
        }
    }

    /// Collect the output of `Component::handle_event`.
    pub fn from_actions(iter: impl IntoIterator<Item = A>) -> Self {
        Self {
            actions: iter.into_iter().collect(),
            needs_render: false,
        }
    }

    pub fn with_render(mut self) -> Self {
        self.needs_render = true;
        self
    }

    pub fn is_ignored(&self) -> bool {
        self.actions.is_empty() && !self.needs_render
    }
}

impl<A> Default for EventOutcome<A> {
    fn default() -> Self {
        Self::ignored()
    }
}

impl<A> From<A> for EventOutcome<A> {
    fn from(action: A) -> Self {
        Self::action(action)
    }
}

impl<A> From<Vec<A>> for EventOutcome<A> {
    fn from(actions: Vec<A>) -> Self {
        Self::from_actions(actions)
    }
}

impl<A> From<Option<A>> for EventOutcome<A> {
    fn from(action: Option<A>) -> Self {
        match action {
            Some(action) => Self::action(action),
            None => Self::ignored(),
        }
    }
}

/// Store interface used by [`EffectRuntime`].
pub trait EffectStoreLike<S, A: Action, E> {
    fn dispatch(&mut self, action: A) -> DispatchResult<E>;
    fn state(&self) -> &S;
}

impl<S, A: Action, E> EffectStoreLike<S, A, E> for EffectStore<S, A, E> {
    fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        EffectStore::dispatch(self, action)
    }

    fn state(&self) -> &S {
        EffectStore::state(self)
    }
}

impl<S, A: Action, E, M: Middleware<A>> EffectStoreLike<S, A, E>
    for EffectStoreWithMiddleware<S, A, E, M>
{
    fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        EffectStoreWithMiddleware::dispatch(self, action)
    }

    fn state(&self) -> &S {
        EffectStoreWithMiddleware::state(self)
    }
}

/// Handed to the effect handler for each effect.
pub struct EffectContext<'a, A: Action> {
    action_tx: &'a mpsc::UnboundedSender<A>,
    tasks: &'a mut TaskManager<A>,
}

impl<'a, A: Action> EffectContext<'a, A> {
    pub fn new(action_tx: &'a mpsc::UnboundedSender<A>, tasks: &'a mut TaskManager<A>) -> Self {
        Self { action_tx, tasks }
    }

    /// Send an action back into the loop immediately.
    pub fn emit(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    pub fn action_tx(&self) -> &mpsc::UnboundedSender<A> {
        self.action_tx
    }

    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        self.tasks
    }
}

/// Runtime for effect-based stores.
pub struct EffectRuntime<S, A: Action, E, St: EffectStoreLike<S, A, E> = EffectStore<S, A, E>> {
    store: St,
    action_tx: mpsc::UnboundedSender<A>,
    action_rx: mpsc::UnboundedReceiver<A>,
    poller_config: PollerConfig,
    tick: Option<(Duration, fn() -> A)>,
    should_render: bool,
    tasks: TaskManager<A>,
    _state: std::marker::PhantomData<S>,
    _effect: std::marker::PhantomData<E>,
}

impl<S: 'static, A: Action, E> EffectRuntime<S, A, E, EffectStore<S, A, E>> {
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self::from_store(EffectStore::new(state, reducer))
    }
}

impl<S: 'static, A: Action, E, St: EffectStoreLike<S, A, E>> EffectRuntime<S, A, E, St> {
    pub fn from_store(store: St) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let tasks = TaskManager::new(action_tx.clone());

        Self {
            store,
            action_tx,
            action_rx,
            poller_config: PollerConfig::default(),
            tick: None,
            should_render: true,
            tasks,
            _state: std::marker::PhantomData,
            _effect: std::marker::PhantomData,
        }
    }

    pub fn with_event_poller(mut self, config: PollerConfig) -> Self {
        self.poller_config = config;
        self
    }

    /// Dispatch `make()` every `interval`, e.g. for expiring notifications.
    pub fn with_tick(mut self, interval: Duration, make: fn() -> A) -> Self {
        self.tick = Some((interval, make));
        self
    }

    /// Queue an action; it is reduced once the loop runs.
    pub fn enqueue(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    pub fn action_tx(&self) -> mpsc::UnboundedSender<A> {
        self.action_tx.clone()
    }

    pub fn state(&self) -> &S {
        self.store.state()
    }

    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        &mut self.tasks
    }

    /// Reduce one action and run its effects outside the loop.
    ///
    /// Returns whether the state changed.
    pub fn dispatch<FEffect>(&mut self, action: A, handle_effect: &mut FEffect) -> bool
    where
        FEffect: FnMut(E, &mut EffectContext<A>),
    {
        let result = self.store.dispatch(action);
        if result.has_effects() {
            let mut ctx = EffectContext::new(&self.action_tx, &mut self.tasks);
            for effect in result.effects {
                handle_effect(effect, &mut ctx);
            }
        }
        result.changed
    }

    /// Run the loop until `should_quit` accepts an action or all senders close.
    pub async fn run<B, FRender, FEvent, FQuit, FEffect, R>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut render: FRender,
        mut map_event: FEvent,
        mut should_quit: FQuit,
        mut handle_effect: FEffect,
    ) -> io::Result<()>
    where
        B: Backend,
        FRender: FnMut(&mut Frame, Rect, &S),
        FEvent: FnMut(&EventKind, &S) -> R,
        R: Into<EventOutcome<A>>,
        FQuit: FnMut(&A) -> bool,
        FEffect: FnMut(E, &mut EffectContext<A>),
    {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
        let cancel_token = CancellationToken::new();
        let _handle = spawn_event_poller(
            event_tx,
            self.poller_config.poll_timeout,
            self.poller_config.loop_sleep,
            cancel_token.clone(),
        );

        let (tick_period, make_tick) = match self.tick {
            Some((period, make)) => (period, Some(make)),
            None => (Duration::from_secs(3600), None),
        };
        let mut ticker = tokio::time::interval(tick_period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            if self.should_render {
                let state = self.store.state();
                terminal.draw(|frame| render(frame, frame.area(), state))?;
                self.should_render = false;
            }

            tokio::select! {
                Some(raw_event) = event_rx.recv() => {
                    let Some(event) = process_raw_event(raw_event) else {
                        continue;
                    };
                    if matches!(event, EventKind::Resize(_, _)) {
                        self.should_render = true;
                    }

                    let outcome: EventOutcome<A> = map_event(&event, self.store.state()).into();
                    if outcome.needs_render {
                        self.should_render = true;
                    }
                    for action in outcome.actions {
                        let _ = self.action_tx.send(action);
                    }
                }

                Some(action) = self.action_rx.recv() => {
                    if should_quit(&action) {
                        tracing::info!("quit requested");
                        break;
                    }
                    if self.dispatch(action, &mut handle_effect) {
                        self.should_render = true;
                    }
                }

                _ = ticker.tick(), if make_tick.is_some() => {
                    if let Some(make) = make_tick {
                        let _ = self.action_tx.send(make());
                    }
                }

                else => {
                    break;
                }
            }
        }

        cancel_token.cancel();
        self.tasks.cancel_all();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Load,
        Loaded(u32),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Load => "Load",
                TestAction::Loaded(_) => "Loaded",
            }
        }
    }

    #[derive(Debug)]
    enum TestEffect {
        Fetch,
    }

    #[derive(Default)]
    struct TestState {
        value: Option<u32>,
    }

    fn reducer(state: &mut TestState, action: TestAction) -> DispatchResult<TestEffect> {
        match action {
            TestAction::Load => DispatchResult::effect(TestEffect::Fetch),
            TestAction::Loaded(v) => {
                state.value = Some(v);
                DispatchResult::changed()
            }
        }
    }

    #[test]
    fn test_event_outcome_conversions() {
        let outcome: EventOutcome<TestAction> = None.into();
        assert!(outcome.is_ignored());

        let outcome: EventOutcome<TestAction> = Some(TestAction::Load).into();
        assert_eq!(outcome.actions, vec![TestAction::Load]);
        assert!(!outcome.needs_render);

        let outcome = EventOutcome::<TestAction>::ignored().with_render();
        assert!(outcome.needs_render);
    }

    #[tokio::test]
    async fn test_dispatch_runs_effects_through_tasks() {
        let mut runtime = EffectRuntime::new(TestState::default(), reducer);
        let mut handler = |effect: TestEffect, ctx: &mut EffectContext<TestAction>| match effect {
            TestEffect::Fetch => {
                ctx.tasks().spawn("fetch", async { TestAction::Loaded(7) });
            }
        };

        assert!(!runtime.dispatch(TestAction::Load, &mut handler));

        let next = tokio::time::timeout(Duration::from_millis(100), runtime.action_rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");
        assert!(runtime.dispatch(next, &mut handler));
        assert_eq!(runtime.state().value, Some(7));
    }
}
