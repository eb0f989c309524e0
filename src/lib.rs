// SPDX-License-Identifier: CC0-1.0

//! Resolute umbrella crate.
//!
//! Uniform `(value, error)` results for asynchronous operations, and
//! chained pipelines that stop at the first failing step and report which
//! step it was.
//!
//! The functional code lives in the workspace member crates; this crate
//! re-exports them under one roof.
//!
//! ```
//! use resolute::prelude::*;
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let (value, error) = pipeline(Producer::value(5))
//!     .transform_as(
//!         |v: i32| if v > 3 { Err(Raised::value("too large")) } else { Ok(v) },
//!         "validate",
//!     )
//!     .execute()
//!     .await
//!     .into_pair();
//!
//! assert!(value.is_none());
//! let error = error.expect("validation failed");
//! assert_eq!(error.context, "validate");
//! assert_eq!(error.step_index(), Some(0));
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![doc(test(attr(warn(unused))))]

pub use config;
pub use descriptor;
pub use logging;
pub use pipeline;
#[cfg(feature = "http")]
pub use resolute_http as http;
pub use resolver;
pub use transport;

/// The names most call sites need.
pub mod prelude {
    pub use config::{Config, Defaults};
    pub use descriptor::{
        ErrorDescriptor, PairExt, Payload, PipelineError, PromiseForError, Raised, ResultPair,
        StepInfo, StepType,
    };
    pub use pipeline::{pipeline, pipeline_with_context, pipeline_with_defaults, Stage};
    pub use resolver::{
        resolve_one, resolve_one_or_raise, resolve_one_positional, resolve_one_positional_context,
        resolve_one_with_defaults, Producer, ResolveOptions,
    };
    pub use transport::{HttpRequest, HttpResponse, Transport, TransportError};
}

/// Miscellaneous metadata about the Resolute workspace.
pub mod resolute_meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Loads the configuration (`$RESOLUTE_CONFIG`, then the default path, then
/// built-in defaults) and installs the configured `tracing` subscriber.
///
/// # Errors
/// [`InitError`] if the file cannot be parsed or a subscriber is already installed.
pub fn init() -> Result<config::Config, InitError> {
    let config = config::Config::load()?;
    logging::init(&config.logging)?;
    Ok(config)
}

/// Failure of [`init`].
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// The subscriber could not be installed.
    #[error(transparent)]
    Logging(#[from] logging::LoggingError),
}
