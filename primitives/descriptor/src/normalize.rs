//! The Error Normalizer.

use std::error::Error;

use serde_json::Value;
use transport::{HttpFailure, TransportError};

use crate::{ErrorDescriptor, Failure, Panicked, PipelineError, PromiseForError, Raised, StepInfo};

/// Name given to failures raised as plain values.
pub const UNKNOWN_ERROR_NAME: &str = "UnknownError";

/// Name given to failures synthesized for absent values.
pub const EMPTY_VALUE_ERROR_NAME: &str = "EmptyValueError";

const GENERIC_ERROR_NAME: &str = "Error";

/// Converts a raised failure into an [`ErrorDescriptor`].
///
/// Error objects keep their `Display` text as the message and are
/// classified by concrete type. The whole `source()` chain is searched for
/// transport details (status, url, method, code, response data); the
/// outermost error that knows a field wins. Plain values become an
/// `UnknownError` whose message is the value's string form.
///
/// `context` and `step_info` are attached verbatim.
pub fn normalize(raised: &Raised, context: &str, step_info: Option<StepInfo>) -> ErrorDescriptor {
    let descriptor = match raised {
        Raised::Error(err) => from_error(err.as_ref(), context),
        Raised::Value(value) => ErrorDescriptor::new(coerce(value), UNKNOWN_ERROR_NAME, context),
    };
    descriptor.with_step_info(step_info)
}

fn from_error(err: &(dyn Error + 'static), context: &str) -> ErrorDescriptor {
    let name = error_name(err);
    let mut descriptor = ErrorDescriptor::new(err.to_string(), name.clone(), context);
    descriptor.stack = wrapped(err).and_then(|d| d.stack.clone()).or_else(|| render_chain(&name, err));

    let mut current = Some(err);
    while let Some(e) = current {
        collect_fields(e, &mut descriptor);
        current = e.source();
    }
    descriptor
}

fn error_name(err: &(dyn Error + 'static)) -> String {
    if err.is::<HttpFailure>() {
        "HTTPError".to_string()
    } else if err.is::<TransportError>() {
        "TransportError".to_string()
    } else if let Some(failure) = err.downcast_ref::<Failure>() {
        failure.name.clone()
    } else if err.is::<Panicked>() {
        "Panic".to_string()
    } else if err.is::<PipelineError>() {
        PipelineError::NAME.to_string()
    } else if err.is::<PromiseForError>() {
        PromiseForError::NAME.to_string()
    } else {
        GENERIC_ERROR_NAME.to_string()
    }
}

/// Descriptor carried by a re-raised adapter, if `err` is one.
fn wrapped<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a ErrorDescriptor> {
    err.downcast_ref::<PipelineError>()
        .map(PipelineError::descriptor)
        .or_else(|| err.downcast_ref::<PromiseForError>().map(PromiseForError::descriptor))
}

/// Fills fields still absent on `descriptor` from what `err` knows.
fn collect_fields(err: &(dyn Error + 'static), descriptor: &mut ErrorDescriptor) {
    if let Some(failure) = err.downcast_ref::<HttpFailure>() {
        fill(&mut descriptor.status, Some(failure.status));
        fill(&mut descriptor.url, failure.url.clone());
        fill(&mut descriptor.method, failure.method.clone());
        fill(&mut descriptor.response_data, failure.response_data.clone());
    } else if let Some(transport) = err.downcast_ref::<TransportError>() {
        fill(&mut descriptor.status, transport.status());
        fill(&mut descriptor.url, transport.url().map(str::to_string));
        fill(&mut descriptor.method, transport.method().map(str::to_string));
        fill(&mut descriptor.code, transport.code().map(str::to_string));
    } else if let Some(failure) = err.downcast_ref::<Failure>() {
        fill(&mut descriptor.status, failure.status);
        fill(&mut descriptor.code, failure.code.clone());
    } else if let Some(io) = err.downcast_ref::<std::io::Error>() {
        fill(&mut descriptor.code, Some(format!("{:?}", io.kind())));
    } else if let Some(pipeline) = err.downcast_ref::<PipelineError>() {
        fill(&mut descriptor.status, Some(pipeline.status()));
        copy_transport_fields(pipeline.descriptor(), descriptor);
    } else if let Some(promise) = err.downcast_ref::<PromiseForError>() {
        fill(&mut descriptor.status, Some(promise.status()));
        copy_transport_fields(promise.descriptor(), descriptor);
    }
}

fn copy_transport_fields(from: &ErrorDescriptor, into: &mut ErrorDescriptor) {
    fill(&mut into.url, from.url.clone());
    fill(&mut into.method, from.method.clone());
    fill(&mut into.code, from.code.clone());
    fill(&mut into.response_data, from.response_data.clone());
}

fn fill<T>(slot: &mut Option<T>, found: Option<T>) {
    if slot.is_none() {
        *slot = found;
    }
}

/// `"{name}: {message}"` followed by one `caused by:` line per source.
fn render_chain(name: &str, err: &(dyn Error + 'static)) -> Option<String> {
    let mut source = err.source()?;
    let mut rendered = format!("{}: {}", name, err);
    loop {
        rendered.push_str("\n    caused by: ");
        rendered.push_str(&source.to_string());
        match source.source() {
            Some(next) => source = next,
            None => break,
        }
    }
    Some(rendered)
}

fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
