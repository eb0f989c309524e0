//! Panic capture around user-supplied code.
//!
//! A producer, post-processor or step function that panics is treated like
//! one that failed: the panic becomes a [`Raised`] failure instead of
//! unwinding through the caller.

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

use descriptor::Raised;
use futures::FutureExt;

/// Calls `f`, turning a panic into a failure.
pub fn call<R, E, F>(f: F) -> Result<R, Raised>
where
    F: FnOnce() -> Result<R, E>,
    E: Into<Raised>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result.map_err(Into::into),
        Err(panic) => Err(Raised::from_panic(panic)),
    }
}

/// Awaits `future`, turning a panic into a failure.
pub async fn await_caught<R, E, F>(future: F) -> Result<R, Raised>
where
    F: Future<Output = Result<R, E>>,
    E: Into<Raised>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result.map_err(Into::into),
        Err(panic) => Err(Raised::from_panic(panic)),
    }
}

/// Calls an async `f` and awaits its future; panics in either half become
/// failures.
pub async fn call_async<R, E, F, Fut>(f: F) -> Result<R, Raised>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: Into<Raised>,
{
    let future = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(future) => future,
        Err(panic) => return Err(Raised::from_panic(panic)),
    };
    await_caught(future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_passes_results_through() {
        assert_eq!(call(|| Ok::<_, Raised>(4)).expect("ok"), 4);
        let err = call(|| Err::<i32, _>(std::fmt::Error)).expect_err("err");
        assert!(err.as_error().is_some());
    }

    #[test]
    fn call_catches_panics() {
        let err = call(|| -> Result<i32, Raised> { panic!("sync boom") }).expect_err("panic");
        assert_eq!(err.to_string(), "sync boom");
    }

    #[tokio::test]
    async fn call_async_catches_both_halves() {
        let early = call_async(|| -> futures::future::Ready<Result<i32, Raised>> {
            panic!("before the future")
        })
        .await
        .expect_err("panic");
        assert_eq!(early.to_string(), "before the future");

        let late = call_async(|| async {
            if true {
                panic!("inside the future");
            }
            Ok::<i32, Raised>(1)
        })
        .await
        .expect_err("panic");
        assert_eq!(late.to_string(), "inside the future");
    }
}
