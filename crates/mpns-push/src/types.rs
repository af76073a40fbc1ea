//! Delivery result types.

use std::fmt;

use mpns_core::Kind;
use serde::{Deserialize, Serialize};

/// Result of one delivery attempt.
///
/// Constructed fresh per attempt. On failure the same shape is carried
/// inside [`DeliveryError`] with the retry hints filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    /// HTTP status from the push service; `None` if no response arrived.
    pub status_code: Option<u16>,
    /// `X-DeviceConnectionStatus` response header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_connection_status: Option<String>,
    /// `X-NotificationStatus` response header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_status: Option<String>,
    /// `X-SubscriptionStatus` response header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<String>,
    /// Kind of the notification that was sent.
    pub kind: Kind,
    /// Fields that were set on the request, echoed for logging.
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
    /// Recommended minutes to wait before retrying this channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_to_delay: Option<u32>,
    /// The channel is permanently invalid and should be removed.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub should_delete_channel: bool,
    /// Human-readable failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_error: Option<String>,
}

impl DeliveryOutcome {
    /// Empty outcome for a request of `kind` with the given echoed fields.
    pub fn new(kind: Kind, fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            status_code: None,
            device_connection_status: None,
            notification_status: None,
            subscription_status: None,
            kind,
            fields,
            minutes_to_delay: None,
            should_delete_channel: false,
            inner_error: None,
        }
    }
}

/// Why a delivery attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// 412: the device is inactive; retry no sooner than the delay.
    DeviceInactive,
    /// 400, 401, 404: the channel is invalid and should be deleted.
    InvalidSubscription,
    /// 405: the push service rejected the method (a client bug).
    MethodNotAllowed,
    /// 406: the channel's per-day quota is exhausted.
    Throttled,
    /// 503: the push service is unavailable; retry after the delay.
    ServiceUnavailable,
    /// Any other non-2xx status.
    UnexpectedStatus(u16),
    /// No response: DNS, connect, TLS or IO failure.
    Transport,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceInactive => f.write_str("device inactive"),
            Self::InvalidSubscription => f.write_str("invalid subscription"),
            Self::MethodNotAllowed => f.write_str("method not allowed"),
            Self::Throttled => f.write_str("daily throttle exceeded"),
            Self::ServiceUnavailable => f.write_str("push service unavailable"),
            Self::UnexpectedStatus(status) => write!(f, "unexpected HTTP status {status}"),
            Self::Transport => f.write_str("transport error"),
        }
    }
}

/// A failed delivery attempt.
///
/// `outcome` carries the status, response headers, echoed fields and the
/// retry hints. `source` is set for transport failures.
#[derive(Debug, thiserror::Error)]
#[error("MPNS delivery failed: {kind}")]
pub struct DeliveryError {
    /// Classification.
    pub kind: FailureKind,
    /// Outcome with hints populated.
    pub outcome: DeliveryOutcome,
    /// Underlying transport error, if no response was received.
    #[source]
    pub source: Option<reqwest::Error>,
}

impl DeliveryError {
    /// Recommended minutes to wait before retrying, if any.
    pub fn minutes_to_delay(&self) -> Option<u32> {
        self.outcome.minutes_to_delay
    }

    /// Whether the channel should be removed.
    pub fn should_delete_channel(&self) -> bool {
        self.outcome.should_delete_channel
    }
}
