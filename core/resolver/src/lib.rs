#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `resolute-resolver` — Single-Step Resolution
//!
//! Resolves one asynchronous [`Producer`] into a [`ResultPair`]:
//!
//! 1. start the producer (if deferred) and await it;
//! 2. run the value's domain-failure hook ([`Payload::domain_failure`]);
//! 3. apply the optional post-processor;
//! 4. return the value, or the normalized failure of whichever stage broke.
//!
//! Nothing here raises: failures, including panics inside user code, come
//! back on the error side of the pair. Call sites that want `?` use
//! [`resolve_one_or_raise`], which wraps the descriptor in a
//! [`PromiseForError`].
//!
//! ## Example
//! ```
//! use descriptor::Raised;
//! use resolver::{resolve_one, Producer, ResolveOptions};
//!
//! # futures::executor::block_on(async {
//! let doubled = resolve_one(
//!     Producer::deferred(|| async { Ok::<_, Raised>(5) }),
//!     ResolveOptions::new().with_post_processor(|v: i32| Ok::<_, Raised>(v * 2)),
//! )
//! .await;
//! assert_eq!(doubled, Ok(10));
//! # });
//! ```

use config::Defaults;
use descriptor::{normalize, Payload, PromiseForError, Raised, ResultPair};

pub mod guard;
mod options;
mod producer;

pub use options::ResolveOptions;
pub use producer::{Produced, Producer};

use options::PostProcess;

/// Resolves `producer` with the built-in [`Defaults`].
pub async fn resolve_one<T, U>(producer: Producer<T>, options: ResolveOptions<T, U>) -> ResultPair<U>
where
    T: Payload + Send + 'static,
    U: Send + 'static,
{
    resolve_one_with_defaults(producer, options, &Defaults::default()).await
}

/// Legacy positional convention: `(producer, post_processor, context)`.
pub async fn resolve_one_positional<T, U, F, E>(
    producer: Producer<T>,
    post_processor: F,
    context: Option<&str>,
) -> ResultPair<U>
where
    T: Payload + Send + 'static,
    U: Send + 'static,
    F: FnOnce(T) -> Result<U, E> + Send + 'static,
    E: Into<Raised>,
{
    resolve_one(producer, ResolveOptions::positional(post_processor, context)).await
}

/// Legacy positional convention without a post-processor:
/// `(producer, context)`.
pub async fn resolve_one_positional_context<T>(producer: Producer<T>, context: Option<&str>) -> ResultPair<T>
where
    T: Payload + Send + 'static,
{
    resolve_one(producer, ResolveOptions::positional_context(context)).await
}

/// Resolves `producer`, taking unset contexts from `defaults`.
///
/// Producer and domain failures are normalized under the options' context
/// (or `defaults.resolve_context`); post-processing failures under
/// `defaults.post_process_context`. No step provenance is attached.
pub async fn resolve_one_with_defaults<T, U>(
    producer: Producer<T>,
    options: ResolveOptions<T, U>,
    defaults: &Defaults,
) -> ResultPair<U>
where
    T: Payload + Send + 'static,
    U: Send + 'static,
{
    let ResolveOptions { post_process, context } = options;
    let context = context.unwrap_or_else(|| defaults.resolve_context.clone());

    let value = match producer.resolve().await {
        Ok(value) => value,
        Err(raised) => return Err(capture(&raised, &context)),
    };

    if let Some(raised) = value.domain_failure() {
        return Err(capture(&raised, &context));
    }

    match post_process {
        PostProcess::Passthrough(identity) => Ok(identity(value)),
        PostProcess::Apply(apply) => {
            apply(value).await.map_err(|raised| capture(&raised, &defaults.post_process_context))
        }
    }
}

/// Like [`resolve_one`], but a failure comes back as a raise-able
/// [`PromiseForError`] (status falling back to `defaults.default_status`).
pub async fn resolve_one_or_raise<T, U>(
    producer: Producer<T>,
    options: ResolveOptions<T, U>,
    defaults: &Defaults,
) -> Result<U, PromiseForError>
where
    T: Payload + Send + 'static,
    U: Send + 'static,
{
    resolve_one_with_defaults(producer, options, defaults)
        .await
        .map_err(|d| PromiseForError::with_default_status(d, defaults.default_status))
}

fn capture(raised: &Raised, context: &str) -> descriptor::ErrorDescriptor {
    let descriptor = normalize(raised, context, None);
    tracing::debug!(
        context = %descriptor.context,
        name = %descriptor.name,
        "resolution failed: {}",
        descriptor.message
    );
    descriptor
}
