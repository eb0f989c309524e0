//! Asynchronous producers: a computation already in flight, or a factory
//! that starts one on demand.

use std::future::Future;

use descriptor::Raised;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::guard;

/// The boxed future every producer is reduced to.
pub type Produced<T> = BoxFuture<'static, Result<T, Raised>>;

type Factory<T> = Box<dyn FnOnce() -> Result<Produced<T>, Raised> + Send>;

/// Something that eventually yields a `T` or a raised failure.
pub enum Producer<T> {
    /// A computation that already exists.
    Ready(Produced<T>),
    /// A factory invoked only when the producer is resolved. The factory
    /// itself may fail before any future exists.
    Deferred(Factory<T>),
}

impl<T: Send + 'static> Producer<T> {
    /// Wraps an existing future.
    pub fn ready<F, E>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<Raised>,
    {
        Producer::Ready(future.map(|r| r.map_err(Into::into)).boxed())
    }

    /// A producer that resolves immediately to `value`.
    pub fn value(value: T) -> Self { Producer::Ready(futures::future::ready(Ok(value)).boxed()) }

    /// A producer that rejects immediately with `raised`.
    pub fn failed(raised: impl Into<Raised>) -> Self {
        Producer::Ready(futures::future::ready(Err(raised.into())).boxed())
    }

    /// Delays starting the work until resolution.
    pub fn deferred<Fac, F, E>(factory: Fac) -> Self
    where
        Fac: FnOnce() -> F + Send + 'static,
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<Raised>,
    {
        Producer::Deferred(Box::new(move || Ok(factory().map(|r| r.map_err(Into::into)).boxed())))
    }

    /// Like [`Producer::deferred`], for factories that can fail while
    /// setting the work up.
    pub fn try_deferred<Fac, F, E1, E2>(factory: Fac) -> Self
    where
        Fac: FnOnce() -> Result<F, E1> + Send + 'static,
        F: Future<Output = Result<T, E2>> + Send + 'static,
        E1: Into<Raised>,
        E2: Into<Raised>,
    {
        Producer::Deferred(Box::new(move || {
            factory().map(|f| f.map(|r| r.map_err(Into::into)).boxed()).map_err(Into::into)
        }))
    }

    /// Starts (if deferred) and awaits the producer.
    ///
    /// Panics inside the factory or the future are caught and reported as
    /// [`descriptor::Panicked`] failures.
    pub async fn resolve(self) -> Result<T, Raised> {
        let future = match self {
            Producer::Ready(future) => future,
            Producer::Deferred(factory) => guard::call(factory)?,
        };
        guard::await_caught(future).await
    }
}

impl<T> std::fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Producer::Ready(_) => f.write_str("Producer::Ready(..)"),
            Producer::Deferred(_) => f.write_str("Producer::Deferred(..)"),
        }
    }
}
