/*
[INPUT]:  Task closures receiving a credential snapshot and returning an Outcome
[OUTPUT]: FIFO execution, outcomes applied to the credential store between tasks
[POS]:    Queue layer - backlog, drain loop and panic containment
[UPDATE]: When scheduling rules or the task contract change
*/

use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

use crate::auth::{Credential, CredentialStore, Outcome};
use crate::http::{Result, VeygoError};
use crate::queue::Submission;

type Task = Box<dyn FnOnce(Credential) -> BoxFuture<'static, Outcome> + Send>;

struct Job {
    seq: u64,
    task: Task,
    done: oneshot::Sender<Outcome>,
}

#[derive(Default)]
struct Backlog {
    pending: VecDeque<Job>,
    draining: bool,
}

struct QueueInner {
    backlog: Mutex<Backlog>,
    store: CredentialStore,
    next_seq: AtomicU64,
}

impl QueueInner {
    fn backlog(&self) -> MutexGuard<'_, Backlog> {
        self.backlog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Oldest job, or `None` after flipping back to idle. Both happen under
    /// the backlog lock so a concurrent submit either lands before the check
    /// or sees `draining == false` and starts a new loop.
    fn next_job(&self) -> Option<Job> {
        let mut backlog = self.backlog();
        let job = backlog.pending.pop_front();
        if job.is_none() {
            backlog.draining = false;
        }
        job
    }
}

/// Whether a drain loop is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Idle,
    Draining,
}

/// Runs credentialed API tasks strictly one at a time.
///
/// Each task gets a snapshot of the credential taken right before it starts
/// and returns an [`Outcome`]. The outcome is applied to the
/// [`CredentialStore`] before the next task starts, so a rotated token is
/// always seen by the following call.
///
/// A task may submit further tasks; they run after it. Awaiting such a nested
/// [`Submission`] from inside the task never resolves, because the nested task
/// cannot start until the current one returns.
///
/// `submit` spawns onto the current tokio runtime and must be called from
/// within one.
#[derive(Clone)]
pub struct SerialTaskQueue {
    inner: Arc<QueueInner>,
}

impl std::fmt::Debug for SerialTaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTaskQueue")
            .field("state", &self.state())
            .field("pending", &self.pending())
            .finish()
    }
}

impl SerialTaskQueue {
    pub fn new(store: CredentialStore) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                backlog: Mutex::new(Backlog::default()),
                store,
                next_seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.inner.store
    }

    pub fn state(&self) -> QueueState {
        if self.inner.backlog().draining {
            QueueState::Draining
        } else {
            QueueState::Idle
        }
    }

    /// Tasks waiting to start (the running one excluded).
    pub fn pending(&self) -> usize {
        self.inner.backlog().pending.len()
    }

    /// Append a task to the backlog.
    ///
    /// Starts the drain loop when the queue was idle. The returned
    /// [`Submission`] resolves after the task's outcome was applied.
    pub fn submit<F, Fut>(&self, task: F) -> Submission
    where
        F: FnOnce(Credential) -> Fut + Send + 'static,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        let (done, rx) = oneshot::channel();
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        let job = Job {
            seq,
            task: Box::new(move |credential| task(credential).boxed()),
            done,
        };

        let start = {
            let mut backlog = self.inner.backlog();
            backlog.pending.push_back(job);
            !std::mem::replace(&mut backlog.draining, true)
        };

        debug!(seq, started_drain = start, "api task submitted");
        if start {
            tokio::spawn(drain(Arc::clone(&self.inner)));
        }
        Submission::new(rx)
    }

    /// Submit a task that also hands data back to the caller.
    ///
    /// Resolves after the task's outcome was applied. A task that panicked
    /// resolves to [`VeygoError::TaskAborted`].
    pub async fn call<T, F, Fut>(&self, task: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Credential) -> Fut + Send + 'static,
        Fut: Future<Output = (Result<T>, Outcome)> + Send + 'static,
    {
        let (data_tx, data_rx) = oneshot::channel();
        let submission = self.submit(move |credential| async move {
            let (result, outcome) = task(credential).await;
            let _ = data_tx.send(result);
            outcome
        });
        submission.await?;
        data_rx.await.map_err(|_| VeygoError::TaskAborted)?
    }
}

async fn drain(inner: Arc<QueueInner>) {
    while let Some(Job { seq, task, done }) = inner.next_job() {
        let credential = inner.store.read();
        debug!(
            seq,
            authenticated = credential.is_authenticated(),
            "api task started"
        );

        // calling the closure happens inside the guarded future too
        let run = AssertUnwindSafe(async move { task(credential).await });
        let outcome = match run.catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                error!(seq, panic = %panic_message(&*panic), "api task panicked");
                Outcome::NoOp
            }
        };

        if let Err(err) = inner.store.apply(&outcome) {
            warn!(seq, error = %err, "credential outcome applied but not persisted");
        }
        debug!(seq, outcome = outcome.kind(), "api task finished");

        // receiver gone means fire-and-forget
        let _ = done.send(outcome);
    }
    debug!("api queue idle");
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryPersistence;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn queue_with(credential: Credential) -> SerialTaskQueue {
        let persistence = MemoryPersistence::with_credential(credential);
        SerialTaskQueue::new(CredentialStore::load(persistence).unwrap())
    }

    fn explode() -> Outcome {
        panic!("task exploded")
    }

    async fn wait_idle(queue: &SerialTaskQueue) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while queue.state() != QueueState::Idle {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("queue never went idle");
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = SerialTaskQueue::new(CredentialStore::in_memory());
        let order = Arc::new(Mutex::new(Vec::new()));

        let submissions: Vec<_> = (0..10)
            .map(|i| {
                let order = Arc::clone(&order);
                queue.submit(move |_| async move {
                    order.lock().unwrap().push(i);
                    Outcome::NoOp
                })
            })
            .collect();

        for submission in submissions {
            assert_eq!(submission.await.unwrap(), Outcome::NoOp);
        }
        assert_eq!(*order.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_snapshot_reflects_previous_outcome() {
        let queue = SerialTaskQueue::new(CredentialStore::in_memory());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let login = {
            let seen = Arc::clone(&seen);
            queue.submit(move |credential| async move {
                seen.lock().unwrap().push(credential);
                Outcome::LoginSuccessful {
                    user_id: 7,
                    token: "abc".to_string(),
                }
            })
        };
        let renew = {
            let seen = Arc::clone(&seen);
            queue.submit(move |credential| async move {
                seen.lock().unwrap().push(credential);
                Outcome::renew("t2")
            })
        };
        let clear = {
            let seen = Arc::clone(&seen);
            queue.submit(move |credential| async move {
                seen.lock().unwrap().push(credential);
                Outcome::ClearCredential
            })
        };
        let last = {
            let seen = Arc::clone(&seen);
            queue.submit(move |credential| async move {
                seen.lock().unwrap().push(credential);
                Outcome::NoOp
            })
        };

        login.await.unwrap();
        renew.await.unwrap();
        clear.await.unwrap();
        last.await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Credential::unauthenticated(),
                Credential::new("abc", 7),
                Credential::new("t2", 7),
                Credential::unauthenticated(),
            ]
        );
    }

    #[tokio::test]
    async fn test_slow_task_applies_before_next_starts() {
        let queue = queue_with(Credential::new("t1", 7));
        let events = Arc::new(Mutex::new(Vec::new()));

        let a = {
            let events = Arc::clone(&events);
            queue.submit(move |credential| async move {
                events.lock().unwrap().push(format!("a-start:{}", credential.token));
                tokio::time::sleep(Duration::from_millis(50)).await;
                events.lock().unwrap().push("a-end".to_string());
                Outcome::renew("t2")
            })
        };
        let b = {
            let events = Arc::clone(&events);
            queue.submit(move |credential| async move {
                events.lock().unwrap().push(format!("b-start:{}", credential.token));
                Outcome::NoOp
            })
        };

        assert_eq!(a.await.unwrap(), Outcome::renew("t2"));
        assert_eq!(b.await.unwrap(), Outcome::NoOp);
        assert_eq!(*events.lock().unwrap(), vec!["a-start:t1", "a-end", "b-start:t2"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_at_most_one_task_running() {
        let queue = SerialTaskQueue::new(CredentialStore::in_memory());
        let running = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));

        let mut producers = Vec::new();
        for _ in 0..4 {
            let queue = queue.clone();
            let running = Arc::clone(&running);
            let overlaps = Arc::clone(&overlaps);
            producers.push(tokio::spawn(async move {
                let mut submissions = Vec::new();
                for _ in 0..25 {
                    let running = Arc::clone(&running);
                    let overlaps = Arc::clone(&overlaps);
                    submissions.push(queue.submit(move |_| async move {
                        if running.fetch_add(1, Ordering::SeqCst) != 0 {
                            overlaps.fetch_add(1, Ordering::SeqCst);
                        }
                        tokio::task::yield_now().await;
                        running.fetch_sub(1, Ordering::SeqCst);
                        Outcome::NoOp
                    }));
                }
                for submission in submissions {
                    submission.await.unwrap();
                }
            }));
        }

        for producer in producers {
            producer.await.unwrap();
        }
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        wait_idle(&queue).await;
        assert_eq!(queue.pending(), 0);
    }

    #[tokio::test]
    async fn test_nested_submit_runs_after_current() {
        let queue = SerialTaskQueue::new(CredentialStore::in_memory());
        let order = Arc::new(Mutex::new(Vec::new()));
        let (nested_tx, nested_rx) = oneshot::channel();

        let outer = {
            let queue_handle = queue.clone();
            let order = Arc::clone(&order);
            queue.submit(move |_| async move {
                order.lock().unwrap().push("outer-start");
                let inner_order = Arc::clone(&order);
                let nested = queue_handle.submit(move |credential| async move {
                    inner_order.lock().unwrap().push("nested");
                    if credential == Credential::new("abc", 7) {
                        Outcome::renew("seen-login")
                    } else {
                        Outcome::NoOp
                    }
                });
                let _ = nested_tx.send(nested);
                tokio::task::yield_now().await;
                order.lock().unwrap().push("outer-end");
                Outcome::LoginSuccessful {
                    user_id: 7,
                    token: "abc".to_string(),
                }
            })
        };

        outer.await.unwrap();
        let nested_outcome = nested_rx.await.unwrap().await.unwrap();
        assert_eq!(nested_outcome, Outcome::renew("seen-login"));
        assert_eq!(
            *order.lock().unwrap(),
            vec!["outer-start", "outer-end", "nested"]
        );
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let queue = queue_with(Credential::new("abc", 7));

        for _ in 0..2 {
            let outcome = queue
                .submit(|_| async { Outcome::ClearCredential })
                .await
                .unwrap();
            assert!(outcome.is_clear());
            assert_eq!(queue.store().read(), Credential::unauthenticated());
        }
    }

    #[tokio::test]
    async fn test_empty_renew_keeps_token() {
        let queue = queue_with(Credential::new("abc", 7));
        queue.submit(|_| async { Outcome::renew("") }).await.unwrap();
        assert_eq!(queue.store().read(), Credential::new("abc", 7));
    }

    #[tokio::test]
    async fn test_login_is_persisted() {
        let persistence = MemoryPersistence::new();
        let queue = SerialTaskQueue::new(CredentialStore::load(persistence.clone()).unwrap());

        queue
            .submit(|_| async {
                Outcome::LoginSuccessful {
                    user_id: 7,
                    token: "abc".to_string(),
                }
            })
            .await
            .unwrap();

        assert_eq!(queue.store().read(), Credential::new("abc", 7));
        assert_eq!(persistence.stored(), Credential::new("abc", 7));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let queue = queue_with(Credential::new("abc", 7));

        let boom = queue.submit(|_| async { explode() });
        let after = queue.submit(|credential| async move { Outcome::renew(credential.token + "-next") });

        assert_eq!(boom.await.unwrap(), Outcome::NoOp);
        assert_eq!(after.await.unwrap(), Outcome::renew("abc-next"));
        assert_eq!(queue.store().read(), Credential::new("abc-next", 7));
    }

    #[tokio::test]
    async fn test_call_returns_data_after_outcome() {
        let queue = queue_with(Credential::new("abc", 7));

        let value = queue
            .call(|credential| async move { (Ok(credential.user_id * 6), Outcome::renew("t2")) })
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(queue.store().read(), Credential::new("t2", 7));
    }

    #[tokio::test]
    async fn test_call_error_still_applies_outcome() {
        let queue = queue_with(Credential::new("abc", 7));

        let result: Result<()> = queue
            .call(|_| async { (Err(VeygoError::Unauthorized), Outcome::ClearCredential) })
            .await;

        assert!(matches!(result, Err(VeygoError::Unauthorized)));
        assert_eq!(queue.store().read(), Credential::unauthenticated());
    }

    #[tokio::test]
    async fn test_call_panic_aborts() {
        let queue = SerialTaskQueue::new(CredentialStore::in_memory());
        let result: Result<u8> = queue
            .call(|_| async {
                let outcome = explode();
                (Ok(1), outcome)
            })
            .await;
        assert!(matches!(result, Err(VeygoError::TaskAborted)));
    }

    #[tokio::test]
    async fn test_state_and_pending() {
        let queue = SerialTaskQueue::new(CredentialStore::in_memory());
        assert_eq!(queue.state(), QueueState::Idle);

        let (started_tx, started_rx) = oneshot::channel();
        let (gate_tx, gate_rx) = oneshot::channel::<()>();
        let first = queue.submit(move |_| async move {
            let _ = started_tx.send(());
            let _ = gate_rx.await;
            Outcome::NoOp
        });
        started_rx.await.unwrap();

        let second = queue.submit(|_| async { Outcome::NoOp });
        let third = queue.submit(|_| async { Outcome::NoOp });
        assert_eq!(queue.state(), QueueState::Draining);
        assert_eq!(queue.pending(), 2);

        gate_tx.send(()).unwrap();
        first.await.unwrap();
        second.await.unwrap();
        third.await.unwrap();
        wait_idle(&queue).await;
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&"boom".to_string()), "boom");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_draining() {
        use crate::auth::persistence::FailingPersistence;

        let queue = SerialTaskQueue::new(CredentialStore::load(FailingPersistence).unwrap());
        let seen = Arc::new(Mutex::new(None));

        let login = queue.submit(|_| async {
            Outcome::LoginSuccessful {
                user_id: 7,
                token: "abc".to_string(),
            }
        });
        let next = {
            let seen = Arc::clone(&seen);
            queue.submit(move |credential| async move {
                *seen.lock().unwrap() = Some(credential);
                Outcome::NoOp
            })
        };

        assert_eq!(
            login.await.unwrap(),
            Outcome::LoginSuccessful {
                user_id: 7,
                token: "abc".to_string(),
            }
        );
        assert_eq!(next.await.unwrap(), Outcome::NoOp);
        assert_eq!(*seen.lock().unwrap(), Some(Credential::new("abc", 7)));
        assert_eq!(queue.store().read(), Credential::new("abc", 7));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_debug_logs_never_contain_tokens() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let queue = SerialTaskQueue::new(CredentialStore::in_memory());
        queue
            .submit(|_| async {
                Outcome::LoginSuccessful {
                    user_id: 7,
                    token: "SECRET-TOKEN".to_string(),
                }
            })
            .await
            .unwrap();
        queue
            .submit(|_| async { Outcome::renew("SECRET-ROTATED") })
            .await
            .unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("api task finished"));
        assert!(output.contains("login_successful"));
        assert!(!output.contains("SECRET"));
    }
}
