//! Turns a REST client result into the single outbound shape.

use serde_json::Value;

use crate::{IgcError, Result, client::RawResponse, flow::OutboundMessage};

/// Status a raw URL request must answer with.
pub const SUCCESS_STATUS: u16 = 200;

/// Body of a raw response, or a transport error carrying status and headers.
pub fn from_response(res: RawResponse) -> Result<Value> {
    res.expect_status(SUCCESS_STATUS)
}

/// Result of one invocation: the message to emit and, on failure, the error
/// to report next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub message: OutboundMessage,
    pub error: Option<IgcError>,
}

/// Success carries the result untouched; failure carries a null payload.
pub fn outcome(result: Result<Value>) -> Outcome {
    match result {
        Ok(payload) => Outcome {
            message: OutboundMessage::new(payload),
            error: None,
        },
        Err(e) => Outcome {
            message: OutboundMessage::null(),
            error: Some(e),
        },
    }
}
