use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{FutureExt, Shared};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use super::BoxFuture;
use crate::errors::{Result, SymresError};

/// A memoized asynchronous computation.
///
/// The computation is started at most once, on the first call to
/// [`get`](Self::get) or [`start`](Self::start). Every caller awaits the same
/// outcome, and the outcome (success or failure) is cached for the life of
/// the value.
///
/// Inside a Tokio runtime the computation is also spawned as its own task, so
/// it makes progress even when nobody is awaiting it and dropping a caller's
/// future does not cancel it. That task is aborted only when the last handle
/// to the value is dropped before it finishes. Outside a runtime the awaiting
/// callers drive the computation themselves, under any executor.
pub struct DeferredValue<T> {
    inner: Arc<Inner<T>>,
}

type Outcome<T> = Shared<BoxFuture<'static, Result<T>>>;

struct Inner<T> {
    state: Mutex<State<T>>,
}

enum State<T> {
    Pending(BoxFuture<'static, Result<T>>),
    Started {
        outcome: Outcome<T>,
        task: Option<AbortHandle>,
    },
    Settled(Result<T>),
}

impl<T> DeferredValue<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Wraps `computation` without polling it.
    pub fn new<F>(computation: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self::with_state(State::Pending(Box::pin(computation)))
    }

    /// An already-computed value.
    pub fn ready(value: T) -> Self {
        Self::with_state(State::Settled(Ok(value)))
    }

    /// An already-failed computation.
    pub fn failed(error: SymresError) -> Self {
        Self::with_state(State::Settled(Err(error)))
    }

    fn with_state(state: State<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
            }),
        }
    }

    /// Starts the computation if nobody has yet. Does not wait for it.
    pub fn start(&self) {
        start_locked(&mut *self.inner.lock_state());
    }

    /// Awaits the shared outcome, starting the computation if needed.
    pub async fn get(&self) -> Result<T> {
        let outcome = {
            let mut state = self.inner.lock_state();
            start_locked(&mut *state);
            match &*state {
                State::Started { outcome, .. } => outcome.clone(),
                State::Settled(result) => return result.clone(),
                State::Pending(_) => {
                    return Err(SymresError::computation("deferred computation did not start"))
                }
            }
        };
        outcome.await
    }

    /// The cached outcome, if the computation has finished.
    pub fn peek(&self) -> Option<Result<T>> {
        match &*self.inner.lock_state() {
            State::Pending(_) => None,
            State::Started { outcome, .. } => outcome.peek().cloned(),
            State::Settled(result) => Some(result.clone()),
        }
    }

    /// Whether the computation has been started (or was never needed).
    pub fn is_started(&self) -> bool {
        !matches!(*self.inner.lock_state(), State::Pending(_))
    }

    pub fn is_settled(&self) -> bool {
        self.inner.lock_state().is_settled()
    }

    /// A new deferred value applying `f` to this one's result. Neither
    /// computation starts until the mapped value is requested.
    pub fn map<U, F>(&self, f: F) -> DeferredValue<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let upstream = self.clone();
        DeferredValue::new(async move { upstream.get().await.map(f) })
    }

    /// Like [`map`](Self::map) for a fallible, asynchronous continuation.
    pub fn and_then<U, F, Fut>(&self, f: F) -> DeferredValue<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<U>> + Send + 'static,
    {
        let upstream = self.clone();
        DeferredValue::new(async move {
            let value = upstream.get().await?;
            f(value).await
        })
    }
}

/// Moves a pending computation to the started state. A panic inside the
/// computation settles it as [`SymresError::Cancelled`].
fn start_locked<T>(state: &mut State<T>)
where
    T: Clone + Send + Sync + 'static,
{
    let computation = match state {
        State::Pending(computation) => {
            let placeholder: BoxFuture<'static, Result<T>> = Box::pin(std::future::pending());
            std::mem::replace(computation, placeholder)
        }
        _ => return,
    };

    let outcome = AssertUnwindSafe(computation)
        .catch_unwind()
        .map(|caught| {
            caught.unwrap_or_else(|_| {
                Err(SymresError::Cancelled {
                    message: "deferred computation panicked".to_string(),
                })
            })
        })
        .boxed()
        .shared();

    let task = Handle::try_current().ok().map(|runtime| {
        tracing::trace!("spawning deferred computation");
        runtime.spawn(outcome.clone().map(drop)).abort_handle()
    });
    *state = State::Started { outcome, task };
}

impl<T> State<T>
where
    T: Clone,
{
    fn is_settled(&self) -> bool {
        match self {
            State::Pending(_) => false,
            State::Started { outcome, .. } => outcome.peek().is_some(),
            State::Settled(_) => true,
        }
    }
}

impl<T> Inner<T> {
    fn lock_state(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let State::Started {
            task: Some(task), ..
        } = state
        {
            task.abort();
        }
    }
}

impl<T> Clone for DeferredValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> fmt::Debug for DeferredValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock_state();
        let label = match &*state {
            State::Pending(_) => "pending",
            s if s.is_settled() => "settled",
            _ => "running",
        };
        f.debug_struct("DeferredValue").field("state", &label).finish()
    }
}
