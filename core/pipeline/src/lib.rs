#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `resolute-pipeline` — Chained Pipelines
//!
//! A pipeline starts from one asynchronous [`Producer`] and grows by
//! chaining steps onto immutable [`Stage`]s:
//!
//! - `transform` maps the value (sync or async);
//! - `pipe` starts a new asynchronous sub-operation from it;
//! - `execute` awaits the accumulated [`ResultPair`](descriptor::ResultPair).
//!
//! Every failure is normalized once, where it happens, tagged with the
//! failing step's [`descriptor::StepInfo`], and then carried to the end of
//! the chain untouched. Later step functions are never invoked once a
//! predecessor failed.
//!
//! ## Absent values
//!
//! | Where                  | Absent value is                              |
//! |------------------------|----------------------------------------------|
//! | initial producer       | an error (`initial value resolved to empty`) |
//! | `transform` input      | an error (`transformation input was empty`)  |
//! | `transform` output     | an error (`transformation resulted in empty`)|
//! | `pipe` input           | an error (`pipe input was empty`)            |
//! | `pipe` output          | a success                                    |
//!
//! ## Example
//! ```
//! use descriptor::Raised;
//! use pipeline::pipeline;
//! use resolver::Producer;
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let result = pipeline(Producer::value(json!({"id": 1})))
//!     .transform(|d| Ok::<_, Raised>(d["id"].as_u64().unwrap_or_default()))
//!     .pipe(|id| async move { Ok::<_, Raised>(format!("user-{id}")) })
//!     .execute()
//!     .await;
//!
//! assert_eq!(result, Ok("user-1".to_string()));
//! # });
//! ```

use config::Defaults;
use descriptor::Payload;
use resolver::Producer;

mod stage;
mod step;

pub use stage::{SharedPair, Stage};
pub use step::StepRecord;

/// Starts a pipeline whose initialization context is
/// `"Pipeline initialization"`.
pub fn pipeline<T>(producer: Producer<T>) -> Stage<T>
where
    T: Payload + Clone + Send + Sync + 'static,
{
    Stage::new(producer)
}

/// Starts a pipeline with a named initialization context.
pub fn pipeline_with_context<T>(producer: Producer<T>, context: impl Into<String>) -> Stage<T>
where
    T: Payload + Clone + Send + Sync + 'static,
{
    Stage::with_context(producer, context)
}

/// Starts a pipeline using configured [`Defaults`].
pub fn pipeline_with_defaults<T>(producer: Producer<T>, defaults: &Defaults) -> Stage<T>
where
    T: Payload + Clone + Send + Sync + 'static,
{
    Stage::with_defaults(producer, defaults)
}
