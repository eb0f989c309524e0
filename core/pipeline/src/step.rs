//! Step bookkeeping: records, default contexts, empty-value failures.

use descriptor::{ErrorDescriptor, StepInfo, StepType, EMPTY_VALUE_ERROR_NAME};

pub(crate) const INITIAL_EMPTY: &str = "initial value resolved to empty";
pub(crate) const TRANSFORM_INPUT_EMPTY: &str = "transformation input was empty";
pub(crate) const TRANSFORM_OUTPUT_EMPTY: &str = "transformation resulted in empty";
pub(crate) const PIPE_INPUT_EMPTY: &str = "pipe input was empty";

/// One chained step, as recorded in a stage's lineage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Zero-based position in the lineage.
    pub index: usize,
    /// `Transform` or `Pipe`.
    pub step_type: StepType,
    /// The step's context (explicit or defaulted).
    pub context: String,
}

/// `"Transform step {index}"` / `"Pipe step {index}"`.
pub(crate) fn default_context(step_type: StepType, index: usize) -> String {
    match step_type {
        StepType::Pipe => format!("Pipe step {index}"),
        _ => format!("Transform step {index}"),
    }
}

pub(crate) fn input_empty_message(step_type: StepType) -> &'static str {
    match step_type {
        StepType::Pipe => PIPE_INPUT_EMPTY,
        _ => TRANSFORM_INPUT_EMPTY,
    }
}

pub(crate) fn empty_value(message: &str, context: &str, step_info: StepInfo) -> ErrorDescriptor {
    let descriptor = ErrorDescriptor::new(message, EMPTY_VALUE_ERROR_NAME, context)
        .with_step_info(Some(step_info));
    tracing::debug!(context = %context, "pipeline step failed: {}", message);
    descriptor
}
