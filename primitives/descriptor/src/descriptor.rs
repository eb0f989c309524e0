//! The canonical error descriptor and its step provenance.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of step a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// Resolution of a pipeline's initial producer.
    Initialization,
    /// A `transform` step.
    Transform,
    /// A `pipe` step.
    Pipe,
}

impl StepType {
    /// Lower-case label, as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Initialization => "initialization",
            StepType::Transform => "transform",
            StepType::Pipe => "pipe",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Where in a pipeline a failure was captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInfo {
    /// Zero-based position within the lineage; `-1` for initialization.
    pub index: i64,
    /// Kind of step.
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Context of the stage the step was chained onto.
    pub pipeline_context: String,
}

impl StepInfo {
    /// Provenance for a pipeline's initialization step.
    pub fn initialization(pipeline_context: impl Into<String>) -> Self {
        Self {
            index: -1,
            step_type: StepType::Initialization,
            pipeline_context: pipeline_context.into(),
        }
    }

    /// Provenance for a chained step.
    pub fn step(index: usize, step_type: StepType, pipeline_context: impl Into<String>) -> Self {
        Self {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            step_type,
            pipeline_context: pipeline_context.into(),
        }
    }
}

/// Canonical structured failure record.
///
/// Created once, where a failure is detected, and passed through every
/// later stage untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    /// Human-readable message.
    pub message: String,
    /// Classification label (`"Error"`, `"HTTPError"`, `"UnknownError"`, ...).
    pub name: String,
    /// Rendered cause chain, when the failure had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Transport status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Transport url.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Transport method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Short classification token (`"ECONNREFUSED"`, `"NotFound"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// What was being attempted when the failure happened.
    pub context: String,
    /// Pipeline provenance, absent for single-step resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_info: Option<StepInfo>,
    /// Parsed (or raw) payload of a domain failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_data: Option<Value>,
}

impl ErrorDescriptor {
    /// A descriptor with only the required fields set.
    pub fn new(
        message: impl Into<String>,
        name: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            name: name.into(),
            stack: None,
            status: None,
            url: None,
            method: None,
            code: None,
            context: context.into(),
            step_info: None,
            response_data: None,
        }
    }

    /// Attaches step provenance.
    pub fn with_step_info(mut self, step_info: Option<StepInfo>) -> Self {
        self.step_info = step_info;
        self
    }

    /// Zero-based index of the failing step, if this came from a pipeline.
    pub fn step_index(&self) -> Option<i64> { self.step_info.as_ref().map(|s| s.index) }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.message)?;
        if let Some(step) = &self.step_info {
            write!(f, " ({} step {} in '{}')", step.step_type, step.index, step.pipeline_context)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_wire_names() {
        let descriptor = ErrorDescriptor::new("bad", "Error", "validate")
            .with_step_info(Some(StepInfo::step(0, StepType::Transform, "Pipeline initialization")));

        let value = serde_json::to_value(&descriptor).expect("serialize");
        assert_eq!(
            value,
            json!({
                "message": "bad",
                "name": "Error",
                "context": "validate",
                "stepInfo": {
                    "index": 0,
                    "type": "transform",
                    "pipelineContext": "Pipeline initialization"
                }
            })
        );

        let back: ErrorDescriptor = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, descriptor);
    }

    #[test]
    fn display_mentions_provenance() {
        let plain = ErrorDescriptor::new("boom", "Error", "fetch");
        assert_eq!(plain.to_string(), "fetch: boom");

        let stepped = plain.with_step_info(Some(StepInfo::initialization("load user")));
        assert_eq!(stepped.to_string(), "fetch: boom (initialization step -1 in 'load user')");
        assert_eq!(stepped.step_index(), Some(-1));
    }
}
