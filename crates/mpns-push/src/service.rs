//! MPNS client: synchronous validation, single-shot asynchronous delivery.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use mpns_core::text::truncate_str;
use mpns_core::{Kind, Notification, TransportOptions, ValidationError, encode};
use tracing::{info, warn};

use crate::classify::{classify_response, classify_transport_error};
use crate::tls::client_config;
use crate::transport::{RequestPlan, build_client, execute, parse_endpoint, parse_proxy};
use crate::types::{DeliveryError, DeliveryOutcome};

/// Bytes of the channel URI included in log lines.
const LOGGED_URI_BYTES: usize = 48;

/// Client for sending notifications to MPNS channels.
///
/// Holds only the default [`TransportOptions`] applied to sends that do not
/// supply their own. Each send builds its own request and HTTP client, so
/// concurrent sends share nothing.
#[derive(Debug, Clone, Default)]
pub struct MpnsClient {
    options: TransportOptions,
}

impl MpnsClient {
    /// Create a client with default transport options.
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    /// Default transport options.
    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Send with the client's default transport options.
    pub fn send(
        &self,
        endpoint: &str,
        notification: &Notification,
    ) -> Result<Delivery, ValidationError> {
        self.send_with(endpoint, notification, &self.options)
    }

    /// Validate and encode now; deliver when the returned future is polled.
    ///
    /// Validation failures are returned immediately and no request is made.
    pub fn send_with(
        &self,
        endpoint: &str,
        notification: &Notification,
        options: &TransportOptions,
    ) -> Result<Delivery, ValidationError> {
        let prepared = self.prepare(endpoint, notification, options)?;
        Ok(Delivery::new(prepared.dispatch()))
    }

    /// Validate, encode and plan a send without performing it.
    ///
    /// For `https` channels the TLS configuration is built here too, so bad
    /// TLS material is reported as [`ValidationError::InvalidTlsMaterial`]
    /// rather than as a delivery failure.
    #[allow(clippy::unused_self)]
    pub fn prepare(
        &self,
        endpoint: &str,
        notification: &Notification,
        options: &TransportOptions,
    ) -> Result<PreparedSend, ValidationError> {
        let endpoint = parse_endpoint(endpoint)?;
        let proxy = options.proxy.as_deref().map(parse_proxy).transpose()?;
        let body = encode(notification)?;
        let kind = notification.kind();
        let plan = RequestPlan::new(&endpoint, kind, body.len(), proxy.as_ref());
        let tls = if plan.secure {
            let config = client_config(&options.tls).map_err(|e| {
                ValidationError::InvalidTlsMaterial {
                    reason: e.to_string(),
                }
            })?;
            Some(config)
        } else {
            None
        };

        Ok(PreparedSend {
            plan,
            body,
            kind,
            fields: notification.echo_fields(),
            tls,
        })
    }
}

/// A validated, encoded request ready to be sent once.
#[derive(Debug, Clone)]
pub struct PreparedSend {
    /// Wire plan.
    pub plan: RequestPlan,
    /// Encoded body.
    pub body: Bytes,
    kind: Kind,
    fields: serde_json::Map<String, serde_json::Value>,
    tls: Option<rustls::ClientConfig>,
}

impl PreparedSend {
    /// Perform the attempt: exactly one response or transport error.
    pub async fn dispatch(self) -> Result<DeliveryOutcome, DeliveryError> {
        let Self {
            plan,
            body,
            kind,
            fields,
            tls,
        } = self;
        let outcome = DeliveryOutcome::new(kind, fields);
        let channel = truncate_str(plan.endpoint.as_str(), LOGGED_URI_BYTES);

        info!(
            channel = %channel,
            kind = %kind,
            notification_class = kind.notification_class(),
            secure = plan.secure,
            proxied = plan.route.proxy().is_some(),
            bytes = body.len(),
            "MPNS request"
        );

        let client = match build_client(&plan, tls) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, channel = %channel, "MPNS client setup FAILED");
                return Err(classify_transport_error(e, outcome));
            }
        };

        let response = match execute(&client, &plan, body).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    error = %e,
                    error_debug = ?e,
                    channel = %channel,
                    "MPNS HTTP request FAILED (transport error)"
                );
                return Err(classify_transport_error(e, outcome));
            }
        };

        let status = response.status();
        match classify_response(status, response.headers(), outcome) {
            Ok(outcome) => {
                info!(
                    status = status.as_u16(),
                    channel = %channel,
                    notification_status = ?outcome.notification_status,
                    device_connection_status = ?outcome.device_connection_status,
                    "MPNS send OK"
                );
                Ok(outcome)
            }
            Err(err) => {
                warn!(
                    status = status.as_u16(),
                    failure = %err.kind,
                    channel = %channel,
                    minutes_to_delay = ?err.outcome.minutes_to_delay,
                    should_delete_channel = err.outcome.should_delete_channel,
                    subscription_status = ?err.outcome.subscription_status,
                    "MPNS send FAILED"
                );
                Err(err)
            }
        }
    }
}

/// Pending delivery attempt.
///
/// Resolves exactly once. Dropping it cancels the attempt; the client
/// imposes no deadline, so wrap it in `tokio::time::timeout` if latency
/// must be bounded.
#[must_use = "a Delivery does nothing unless awaited"]
pub struct Delivery {
    inner: BoxFuture<'static, Result<DeliveryOutcome, DeliveryError>>,
}

impl Delivery {
    fn new(fut: impl Future<Output = Result<DeliveryOutcome, DeliveryError>> + Send + 'static) -> Self {
        Self { inner: fut.boxed() }
    }
}

impl std::fmt::Debug for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delivery").finish_non_exhaustive()
    }
}

impl Future for Delivery {
    type Output = Result<DeliveryOutcome, DeliveryError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}
