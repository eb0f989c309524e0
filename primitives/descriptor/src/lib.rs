#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `resolute-descriptor` — Canonical Failures
//!
//! Every failure that crosses a Resolute boundary is turned into one
//! [`ErrorDescriptor`] at the moment it is detected, and never rewritten
//! afterwards. This crate owns that shape and the function that produces
//! it.
//!
//! - [`Raised`]: whatever a producer or step function handed back on its
//!   error path: an error value, or an arbitrary JSON value.
//! - [`normalize`]: the Error Normalizer. Converts a [`Raised`] into an
//!   [`ErrorDescriptor`], probing the error's `source()` chain for
//!   transport details.
//! - [`Payload`]: implemented by every value type that flows through the
//!   engine; decides what counts as an absent value and hosts the
//!   domain-failure hook.
//! - [`PipelineError`] / [`PromiseForError`]: raise-able wrappers for call
//!   sites that prefer `?` over inspecting a result pair.
//!
//! ## Example
//! ```
//! use descriptor::{normalize, PairExt, Raised, ResultPair};
//!
//! let raised = Raised::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
//! let pair: ResultPair<u32> = Err(normalize(&raised, "saving report", None));
//!
//! let (value, error) = pair.into_pair();
//! assert!(value.is_none());
//! assert_eq!(error.expect("failed").message, "disk full");
//! ```

mod descriptor;
mod normalize;
mod payload;
mod raised;
mod throwable;

pub use descriptor::{ErrorDescriptor, StepInfo, StepType};
pub use normalize::{normalize, EMPTY_VALUE_ERROR_NAME, UNKNOWN_ERROR_NAME};
pub use payload::Payload;
pub use raised::{BoxError, Failure, Panicked, Raised};
pub use throwable::{PipelineError, PromiseForError};

/// The `(value, error)` result of every Resolute operation.
///
/// Exactly one side is populated; the type makes the check exhaustive.
pub type ResultPair<T> = Result<T, ErrorDescriptor>;

/// Tuple-style access to a [`ResultPair`].
pub trait PairExt<T> {
    /// Splits the pair into `(value, error)`, exactly one of which is `Some`.
    fn into_pair(self) -> (Option<T>, Option<ErrorDescriptor>);

    /// The success side, if populated.
    fn value(&self) -> Option<&T>;

    /// The error side, if populated.
    fn error(&self) -> Option<&ErrorDescriptor>;
}

impl<T> PairExt<T> for ResultPair<T> {
    fn into_pair(self) -> (Option<T>, Option<ErrorDescriptor>) {
        match self {
            Ok(value) => (Some(value), None),
            Err(error) => (None, Some(error)),
        }
    }

    fn value(&self) -> Option<&T> { self.as_ref().ok() }

    fn error(&self) -> Option<&ErrorDescriptor> { self.as_ref().err() }
}
