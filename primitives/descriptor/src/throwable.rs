//! Raise-able wrappers around an [`ErrorDescriptor`].
//!
//! The engine never builds these itself. A caller holding the error side of
//! a result pair constructs one when it wants `?` semantics at a boundary.

use config::DEFAULT_STATUS;

use crate::ErrorDescriptor;

macro_rules! throwable {
    ($(#[$meta:meta])* $ty:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(thiserror::Error, Debug, Clone, PartialEq)]
        #[error("{}", .descriptor.message)]
        pub struct $ty {
            descriptor: ErrorDescriptor,
            status: u16,
        }

        impl $ty {
            /// Classification label reported by [`Self::name`].
            pub const NAME: &'static str = $label;

            /// Wraps `descriptor`; status falls back to 500.
            pub fn new(descriptor: ErrorDescriptor) -> Self {
                Self::with_default_status(descriptor, DEFAULT_STATUS)
            }

            /// Wraps `descriptor` with a caller-chosen fallback status.
            pub fn with_default_status(descriptor: ErrorDescriptor, default_status: u16) -> Self {
                let status = descriptor.status.unwrap_or(default_status);
                Self { descriptor, status }
            }

            /// Always [`Self::NAME`].
            pub fn name(&self) -> &'static str { Self::NAME }

            /// The wrapped descriptor's message.
            pub fn message(&self) -> &str { &self.descriptor.message }

            /// The wrapped descriptor's stack, if any.
            pub fn stack(&self) -> Option<&str> { self.descriptor.stack.as_deref() }

            /// Descriptor status, or the fallback.
            pub fn status(&self) -> u16 { self.status }

            /// The wrapped descriptor, verbatim.
            pub fn descriptor(&self) -> &ErrorDescriptor { &self.descriptor }

            /// Unwraps the descriptor.
            pub fn into_descriptor(self) -> ErrorDescriptor { self.descriptor }
        }

        impl From<ErrorDescriptor> for $ty {
            fn from(descriptor: ErrorDescriptor) -> Self { Self::new(descriptor) }
        }
    };
}

throwable!(
    /// Raise-able form of a failure that came out of a pipeline.
    PipelineError,
    "PipelineError"
);

throwable!(
    /// Raise-able form of a failure that came out of single-step resolution.
    PromiseForError,
    "PromiseForError"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StepInfo, StepType};

    fn descriptor(status: Option<u16>) -> ErrorDescriptor {
        let mut d = ErrorDescriptor::new("invalid credentials", "HTTPError", "login")
            .with_step_info(Some(StepInfo::step(1, StepType::Pipe, "auth")));
        d.status = status;
        d.stack = Some("HTTPError: invalid credentials".to_string());
        d
    }

    #[test]
    fn carries_descriptor_verbatim() {
        let d = descriptor(Some(401));
        let err = PipelineError::new(d.clone());

        assert_eq!(err.name(), "PipelineError");
        assert_eq!(err.message(), "invalid credentials");
        assert_eq!(err.to_string(), "invalid credentials");
        assert_eq!(err.stack(), Some("HTTPError: invalid credentials"));
        assert_eq!(err.status(), 401);
        assert_eq!(err.descriptor(), &d);
        assert_eq!(err.into_descriptor(), d);
    }

    #[test]
    fn status_defaults_to_500() {
        let err = PromiseForError::from(descriptor(None));
        assert_eq!(err.name(), "PromiseForError");
        assert_eq!(err.status(), 500);

        let custom = PromiseForError::with_default_status(descriptor(None), 503);
        assert_eq!(custom.status(), 503);
        let kept = PromiseForError::with_default_status(descriptor(Some(404)), 503);
        assert_eq!(kept.status(), 404);
    }

    #[test]
    fn usable_with_question_mark() {
        use std::error::Error;

        fn boundary() -> Result<(), Box<dyn Error>> {
            Err(PipelineError::new(descriptor(None)))?;
            Ok(())
        }

        let err = boundary().expect_err("raised");
        assert_eq!(err.to_string(), "invalid credentials");
        assert!(err.source().is_none());
        let pipeline_err = err.downcast_ref::<PipelineError>().expect("PipelineError");
        assert_eq!(pipeline_err.status(), 500);
    }
}
