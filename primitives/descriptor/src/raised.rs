//! What a producer or step function hands back on its error path.

use std::any::Any;
use std::error::Error;
use std::fmt;

use serde_json::Value;

/// Boxed, thread-safe error object.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A raised failure, before normalization.
///
/// Any `std::error::Error + Send + Sync + 'static` converts into
/// `Raised::Error` through `?`. Values that are not errors at all (a bare
/// string, a number, a JSON object) are carried as `Raised::Value`.
#[derive(Debug)]
pub enum Raised {
    /// An error-like object.
    Error(BoxError),
    /// An arbitrary non-error value.
    Value(Value),
}

impl Raised {
    /// Wraps an already boxed error.
    pub fn boxed(err: BoxError) -> Self { Raised::Error(err) }

    /// Raises an arbitrary value.
    pub fn value(value: impl Into<Value>) -> Self { Raised::Value(value.into()) }

    /// Converts a caught panic payload into a [`Panicked`] error.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with a non-string payload".to_string()
        };
        Raised::Error(Box::new(Panicked { message }))
    }

    /// The error object, when this is `Raised::Error`.
    pub fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Raised::Error(err) => {
                let err: &(dyn Error + 'static) = err.as_ref();
                Some(err)
            }
            Raised::Value(_) => None,
        }
    }
}

impl<E> From<E> for Raised
where
    E: Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self { Raised::Error(Box::new(err)) }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Raised::Error(err) => fmt::Display::fmt(err, f),
            Raised::Value(Value::String(s)) => f.write_str(s),
            Raised::Value(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// A generic failure with a caller-chosen classification name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Failure {
    /// Classification label copied into the descriptor's `name`.
    pub name: String,
    /// Human-readable message.
    pub message: String,
    /// Optional classification token.
    pub code: Option<String>,
    /// Optional status code.
    pub status: Option<u16>,
}

impl Failure {
    /// A failure with the given name and message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), message: message.into(), code: None, status: None }
    }

    /// Sets the classification token.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// A panic caught inside a producer or step function.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Panicked {
    /// The panic message.
    pub message: String,
}
