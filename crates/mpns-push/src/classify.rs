//! Response classification.
//!
//! | Status        | Result                                              |
//! |---------------|-----------------------------------------------------|
//! | 2xx           | success                                             |
//! | 412           | [`FailureKind::DeviceInactive`], retry after 61 min |
//! | 400, 401, 404 | [`FailureKind::InvalidSubscription`], delete channel|
//! | 405           | [`FailureKind::MethodNotAllowed`]                   |
//! | 406           | [`FailureKind::Throttled`]                          |
//! | 503           | [`FailureKind::ServiceUnavailable`], retry after 5  |
//! | other         | [`FailureKind::UnexpectedStatus`]                   |
//!
//! A transport error (no response) is [`FailureKind::Transport`] with a
//! 5 minute delay.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use crate::types::{DeliveryError, DeliveryOutcome, FailureKind};

/// Minimum wait after a 412. Must be at least an hour.
pub const DEVICE_INACTIVE_DELAY_MINUTES: u32 = 61;

/// Suggested wait after a 503 or a transport error.
pub const ERROR_DELAY_MINUTES: u32 = 5;

/// Inner error for 406.
pub const THROTTLED_MESSAGE: &str = "Per-day throttling limit reached.";

/// Inner error for 503.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The Push Notification Service is unable to process the request.";

/// Response header with the device's connection state.
pub const DEVICE_CONNECTION_STATUS: &str = "x-deviceconnectionstatus";
/// Response header with the notification's acceptance state.
pub const NOTIFICATION_STATUS: &str = "x-notificationstatus";
/// Response header with the channel's subscription state.
pub const SUBSCRIPTION_STATUS: &str = "x-subscriptionstatus";

/// Classify a status code. `None` means success.
pub fn classify_status(status: StatusCode) -> Option<FailureKind> {
    match status.as_u16() {
        412 => Some(FailureKind::DeviceInactive),
        400 | 401 | 404 => Some(FailureKind::InvalidSubscription),
        405 => Some(FailureKind::MethodNotAllowed),
        406 => Some(FailureKind::Throttled),
        503 => Some(FailureKind::ServiceUnavailable),
        _ if status.is_success() => None,
        other => Some(FailureKind::UnexpectedStatus(other)),
    }
}

/// Fill `outcome` from a received response and classify it.
///
/// The informational headers are copied whenever present; they never change
/// the classification.
pub fn classify_response(
    status: StatusCode,
    headers: &HeaderMap,
    mut outcome: DeliveryOutcome,
) -> Result<DeliveryOutcome, DeliveryError> {
    outcome.status_code = Some(status.as_u16());
    outcome.device_connection_status = header(headers, DEVICE_CONNECTION_STATUS);
    outcome.notification_status = header(headers, NOTIFICATION_STATUS);
    outcome.subscription_status = header(headers, SUBSCRIPTION_STATUS);

    let Some(kind) = classify_status(status) else {
        return Ok(outcome);
    };

    match kind {
        FailureKind::DeviceInactive => {
            outcome.minutes_to_delay = Some(DEVICE_INACTIVE_DELAY_MINUTES);
        }
        FailureKind::InvalidSubscription => outcome.should_delete_channel = true,
        FailureKind::Throttled => outcome.inner_error = Some(THROTTLED_MESSAGE.to_string()),
        FailureKind::ServiceUnavailable => {
            outcome.minutes_to_delay = Some(ERROR_DELAY_MINUTES);
            outcome.inner_error = Some(SERVICE_UNAVAILABLE_MESSAGE.to_string());
        }
        FailureKind::UnexpectedStatus(code) => {
            outcome.inner_error = Some(format!("Unexpected HTTP status {code}."));
        }
        FailureKind::MethodNotAllowed | FailureKind::Transport => {}
    }

    Err(DeliveryError {
        kind,
        outcome,
        source: None,
    })
}

/// Fold a transport-level failure into the common outcome shape.
pub fn classify_transport_error(error: reqwest::Error, mut outcome: DeliveryOutcome) -> DeliveryError {
    outcome.minutes_to_delay = Some(ERROR_DELAY_MINUTES);
    outcome.inner_error = Some(error_chain(&error));
    DeliveryError {
        kind: FailureKind::Transport,
        outcome,
        source: Some(error),
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Render an error with its sources, e.g.
/// "error sending request: tcp connect error: Connection refused".
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
