use std::fmt;

/// States of one invocation, published in order as it progresses.
///
/// `Emitted` and `ErrorReported` are terminal; exactly one of them closes
/// every invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationEvent {
    Received(i64),
    Resolving,
    Dispatching(String),
    AwaitingResponse,
    Normalizing,
    Emitted(i64),
    ErrorReported(ErrorReason),
}

impl InvocationEvent {
    pub fn str(&self) -> &str {
        match self {
            InvocationEvent::Received(_) => "Received",
            InvocationEvent::Resolving => "Resolving",
            InvocationEvent::Dispatching(_) => "Dispatching",
            InvocationEvent::AwaitingResponse => "AwaitingResponse",
            InvocationEvent::Normalizing => "Normalizing",
            InvocationEvent::Emitted(_) => "Emitted",
            InvocationEvent::ErrorReported(_) => "ErrorReported",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InvocationEvent::Emitted(_) | InvocationEvent::ErrorReported(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorReason {
    /// Failed before any network call (missing parameter, malformed JSON).
    Rejected(String),
    /// The REST client reported a failure.
    Failed(String),
}

impl fmt::Display for ErrorReason {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ErrorReason::Rejected(msg) => write!(f, "Rejected: {}", msg),
            ErrorReason::Failed(msg) => write!(f, "Failed: {}", msg),
        }
    }
}
