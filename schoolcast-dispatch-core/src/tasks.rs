//! Keyed lifecycle management for request tasks
//!
//! Each backend call runs as a tokio task that resolves to a result action.
//! Tasks are registered under a [`TaskKey`]; spawning under a key that is
//! still running aborts the older task, so a superseded list request never
//! delivers its response. Search requests use [`TaskManager::debounce`] so
//! typing only hits the server once input settles.
//!
//! ```ignore
//! tasks.spawn(TaskKey::list("admins"), async move {
//!     match admins::list(&client, &filters).await {
//!         Ok(page) => Action::Admins(ResourceAction::DidLoad { seq, page }),
//!         Err(e) => Action::Admins(ResourceAction::DidFail { op, seq, error: e.message }),
//!     }
//! });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::Action;

/// Identifies a task for cancellation and replacement.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Key shared by every list request of one resource.
    pub fn list(resource: &str) -> Self {
        Self(format!("{}.list", resource))
    }

    /// Key shared by every detail request of one resource.
    pub fn detail(resource: &str) -> Self {
        Self(format!("{}.detail", resource))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Registry of running request tasks.
///
/// Completed tasks send their action on `action_tx`; aborted tasks send
/// nothing. Detached tasks have no key but are still aborted by
/// [`TaskManager::cancel_all`].
pub struct TaskManager<A> {
    tasks: HashMap<TaskKey, AbortHandle>,
    detached: Vec<AbortHandle>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A> TaskManager<A>
where
    A: Action,
{
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            tasks: HashMap::new(),
            detached: Vec::new(),
            action_tx,
        }
    }

    /// Spawn a task, aborting any running task with the same key.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.spawn_after(key.into(), None, future)
    }

    /// Spawn a task that waits `delay` first. Calling again with the same
    /// key before the delay elapses restarts the wait with the new future.
    pub fn debounce<F>(&mut self, key: impl Into<TaskKey>, delay: Duration, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.spawn_after(key.into(), Some(delay), future)
    }

    /// Spawn without registering a key; used for mutations, which never
    /// supersede each other.
    pub fn spawn_detached<F>(&mut self, future: F)
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.prune();
        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let _ = tx.send(future.await);
        });
        self.detached.push(handle.abort_handle());
    }

    fn spawn_after<F>(&mut self, key: TaskKey, delay: Option<Duration>, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.prune();
        if self.cancel(&key) {
            tracing::debug!(task = %key, "superseded running task");
        }

        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let action = future.await;
            let _ = tx.send(action);
        });

        self.tasks.insert(key, handle.abort_handle());
        self
    }

    /// Abort a task by key. Returns whether a running task was aborted.
    pub fn cancel(&mut self, key: &TaskKey) -> bool {
        match self.tasks.remove(key) {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Abort all running tasks, detached ones included.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
        for handle in self.detached.drain(..) {
            handle.abort();
        }
    }

    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.tasks.get(key).is_some_and(|h| !h.is_finished())
    }

    /// Number of tasks that have not finished.
    pub fn len(&self) -> usize {
        self.tasks
            .values()
            .chain(&self.detached)
            .filter(|h| !h.is_finished())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
        self.detached.retain(|handle| !handle.is_finished());
    }
}

impl<A> Drop for TaskManager<A> {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
        for handle in self.detached.drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug)]
    enum TestAction {
        Loaded(usize),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            "Loaded"
        }
    }

    #[test]
    fn test_task_keys() {
        assert_eq!(TaskKey::list("admins").name(), "admins.list");
        assert_eq!(TaskKey::detail("admins").to_string(), "admins.detail");
        assert_eq!(TaskKey::from("x"), TaskKey::new("x"));
    }

    #[tokio::test]
    async fn test_spawn_sends_action() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn("admins.list", async { TestAction::Loaded(3) });

        let action = tokio::time::timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");

        assert!(matches!(action, TestAction::Loaded(3)));
    }

    #[tokio::test]
    async fn test_spawn_supersedes_previous() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);
        let completed = Arc::new(AtomicUsize::new(0));

        let c1 = completed.clone();
        tasks.spawn("admins.list", async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            c1.fetch_add(1, Ordering::SeqCst);
            TestAction::Loaded(1)
        });

        let c2 = completed.clone();
        tasks.spawn("admins.list", async move {
            c2.fetch_add(10, Ordering::SeqCst);
            TestAction::Loaded(2)
        });

        let action = tokio::time::timeout(Duration::from_millis(200), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");

        assert!(matches!(action, TestAction::Loaded(2)));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(completed.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_debounce_waits_and_resets() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.debounce("search", Duration::from_millis(50), async {
            TestAction::Loaded(1)
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        tasks.debounce("search", Duration::from_millis(50), async {
            TestAction::Loaded(2)
        });

        let early = tokio::time::timeout(Duration::from_millis(20), rx.recv()).await;
        assert!(early.is_err());

        let action = tokio::time::timeout(Duration::from_millis(150), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");
        assert!(matches!(action, TestAction::Loaded(2)));
    }

    #[tokio::test]
    async fn test_detached_tasks_all_complete() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn_detached(async { TestAction::Loaded(1) });
        tasks.spawn_detached(async { TestAction::Loaded(2) });

        let mut seen = Vec::new();
        for _ in 0..2 {
            let TestAction::Loaded(n) = tokio::time::timeout(Duration::from_millis(100), rx.recv())
                .await
                .expect("timeout")
                .expect("channel closed");
            seen.push(n);
        }
        seen.sort();
        assert_eq!(seen, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_cancel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn("slow", async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            TestAction::Loaded(1)
        });
        assert!(tasks.is_running(&TaskKey::new("slow")));

        assert!(tasks.cancel(&TaskKey::new("slow")));
        assert!(!tasks.is_running(&TaskKey::new("slow")));

        let result = tokio::time::timeout(Duration::from_millis(150), rx.recv()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn("a", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            TestAction::Loaded(1)
        });
        tasks.spawn("b", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            TestAction::Loaded(2)
        });
        assert_eq!(tasks.len(), 2);

        tasks.cancel_all();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_all_aborts_detached() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn_detached(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            TestAction::Loaded(1)
        });
        assert_eq!(tasks.len(), 1);

        tasks.cancel_all();
        assert!(tasks.is_empty());

        let result = tokio::time::timeout(Duration::from_millis(150), rx.recv()).await;
        assert!(result.is_err());
    }
}
