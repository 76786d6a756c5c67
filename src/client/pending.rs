//! Deferred results of non-blocking calls
//!
//! A [`PendingResponse`] pairs the in-flight call with the function that
//! decodes its raw body. Callers either await it, block on it with
//! [`PendingResponse::wait`], or share it through a [`Deferred`] so that
//! several readers observe a single resolution.

use crate::utils::error::{ODataError, Result};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::Value;
use std::any::Any;
use std::future::IntoFuture;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{self, Handle, RuntimeFlavor};
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

/// Turns a raw response body into the caller-facing result
pub type DecodeFn<T> = fn(&str) -> Result<T>;

/// Handle to an in-flight call plus its decoder
#[must_use = "a pending response does nothing unless resolved, waited on or cancelled"]
pub struct PendingResponse<T> {
    task: JoinHandle<Result<String>>,
    decode: DecodeFn<T>,
    runtime: Handle,
}

impl<T> PendingResponse<T> {
    pub(crate) fn new(task: JoinHandle<Result<String>>, decode: DecodeFn<T>, runtime: Handle) -> Self {
        Self {
            task,
            decode,
            runtime,
        }
    }

    /// Split into the raw call handle and the decoder to apply to its body
    pub fn into_parts(self) -> (JoinHandle<Result<String>>, DecodeFn<T>) {
        (self.task, self.decode)
    }

    pub fn decoder(&self) -> DecodeFn<T> {
        self.decode
    }

    /// Whether the underlying call has completed
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Abort the call; resolving afterwards yields a task error
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Await the call and decode its body
    pub async fn resolve(self) -> Result<T> {
        let raw = self.task.await??;
        (self.decode)(&raw)
    }

    /// Await with an upper bound; the call is aborted when the bound elapses
    pub async fn resolve_timeout(self, timeout: Duration) -> Result<T> {
        let abort = self.task.abort_handle();
        match tokio::time::timeout(timeout, self.resolve()).await {
            Ok(result) => result,
            Err(_) => {
                abort.abort();
                Err(ODataError::Timeout(timeout))
            }
        }
    }

    /// Block the current thread until the result is available
    ///
    /// Meant for synchronous callers. Inside async code use `.await` instead.
    pub fn wait(self) -> Result<T> {
        futures::executor::block_on(self.resolve())
    }

    /// Blocking variant of [`PendingResponse::resolve_timeout`]
    pub fn wait_timeout(self, timeout: Duration) -> Result<T> {
        let runtime = self.runtime.clone();
        let _guard = runtime.enter();
        futures::executor::block_on(self.resolve_timeout(timeout))
    }

    /// Share the eventual result between readers
    pub fn deferred(self) -> Deferred<T> {
        Deferred::new(self)
    }
}

impl PendingResponse<Value> {
    /// Lazily project one field of the eventual JSON result
    pub fn field(self, name: impl Into<String>) -> LazyField {
        self.deferred().field(name)
    }
}

impl<T: Send + 'static> IntoFuture for PendingResponse<T> {
    type Output = Result<T>;
    type IntoFuture = BoxFuture<'static, Result<T>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.resolve())
    }
}

/// A pending response resolved at most once and shared by every reader
pub struct Deferred<T> {
    inner: Arc<DeferredInner<T>>,
}

struct DeferredInner<T> {
    pending: Mutex<Option<PendingResponse<T>>>,
    runtime: runtime::Id,
    outcome: OnceCell<std::result::Result<T, Arc<ODataError>>>,
}

impl<T> Deferred<T> {
    pub fn new(pending: PendingResponse<T>) -> Self {
        Self {
            inner: Arc::new(DeferredInner {
                runtime: pending.runtime.id(),
                pending: Mutex::new(Some(pending)),
                outcome: OnceCell::new(),
            }),
        }
    }

    /// Await resolution, then borrow the result
    ///
    /// The first reader drives the call; later readers reuse its outcome.
    /// Failures are reported as [`ODataError::Shared`].
    pub async fn resolve(&self) -> Result<&T> {
        let outcome = self.inner.outcome.get_or_init(|| self.inner.settle()).await;
        share(outcome)
    }

    /// Block until resolved, then borrow the result
    ///
    /// Must not run on the current-thread runtime that drives the call; such
    /// a read is refused with [`ODataError::Task`]. Use [`Deferred::resolve`]
    /// there.
    pub fn get(&self) -> Result<&T> {
        if let Some(outcome) = self.inner.outcome.get() {
            return share(outcome);
        }
        let Ok(current) = Handle::try_current() else {
            return futures::executor::block_on(self.resolve());
        };
        match current.runtime_flavor() {
            RuntimeFlavor::CurrentThread if current.id() == self.inner.runtime => Err(ODataError::Task(
                "blocking read on the runtime driving the call; await resolve() instead".to_string(),
            )),
            RuntimeFlavor::CurrentThread => futures::executor::block_on(self.resolve()),
            _ => tokio::task::block_in_place(|| futures::executor::block_on(self.resolve())),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.outcome.get().is_some()
    }
}

fn share<T>(outcome: &std::result::Result<T, Arc<ODataError>>) -> Result<&T> {
    outcome
        .as_ref()
        .map_err(|e| ODataError::Shared(Arc::clone(e)))
}

impl<T> DeferredInner<T> {
    async fn settle(&self) -> std::result::Result<T, Arc<ODataError>> {
        let Some(checkout) = Checkout::take(&self.pending) else {
            return Err(Arc::new(ODataError::Task(
                "deferred response was already consumed".to_string(),
            )));
        };
        let (raw, decode) = checkout.join().await.map_err(Arc::new)?;
        match panic::catch_unwind(AssertUnwindSafe(|| decode(&raw))) {
            Ok(decoded) => decoded.map_err(Arc::new),
            Err(payload) => Err(Arc::new(ODataError::Task(format!(
                "decoder panicked: {}",
                panic_message(&*payload)
            )))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// A pending response borrowed out of its slot
///
/// Puts the response back when dropped before the call completes, so an
/// interrupted reader leaves the call for the next one.
struct Checkout<'a, T> {
    slot: &'a Mutex<Option<PendingResponse<T>>>,
    pending: Option<PendingResponse<T>>,
}

impl<'a, T> Checkout<'a, T> {
    fn take(slot: &'a Mutex<Option<PendingResponse<T>>>) -> Option<Self> {
        let pending = slot.lock().take()?;
        Some(Self {
            slot,
            pending: Some(pending),
        })
    }

    async fn join(mut self) -> Result<(String, DecodeFn<T>)> {
        let Some(pending) = self.pending.as_mut() else {
            return Err(ODataError::Task("deferred response was already consumed".to_string()));
        };
        let joined = (&mut pending.task).await;
        let decode = pending.decode;
        // A completed join handle cannot be polled again
        self.pending = None;
        Ok((joined??, decode))
    }
}

impl<T> Drop for Checkout<'_, T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            *self.slot.lock() = Some(pending);
        }
    }
}

impl Deferred<Value> {
    /// Project one named field of the resolved JSON value
    pub fn field(&self, name: impl Into<String>) -> LazyField {
        LazyField {
            source: self.clone(),
            name: name.into(),
        }
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// One named field of a deferred JSON result
///
/// Every read re-reads the field from the shared result; the network call
/// behind it resolves only once.
#[derive(Clone)]
pub struct LazyField {
    source: Deferred<Value>,
    name: String,
}

impl LazyField {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's value, or `None` when the result has no such field
    pub async fn resolve(&self) -> Result<Option<Value>> {
        Ok(self.source.resolve().await?.get(&self.name).cloned())
    }

    /// Blocking variant of [`LazyField::resolve`], with the limits of [`Deferred::get`]
    pub fn get(&self) -> Result<Option<Value>> {
        Ok(self.source.get()?.get(&self.name).cloned())
    }
}
