//! # mpns-push
//!
//! Delivery of MPNS notifications over HTTP/HTTPS.
//!
//! - [`transport`]: request planning (headers, forwarded or tunnelled
//!   proxy routes) and the per-attempt `reqwest` client
//! - [`tls`]: `rustls` client configuration from the per-call TLS options
//! - [`classify`]: maps the push service's status codes and headers to a
//!   [`DeliveryOutcome`] or a [`DeliveryError`]
//! - [`service`]: [`MpnsClient`], validating synchronously and returning a
//!   [`Delivery`] future that resolves exactly once
//! - [`facade`]: per-kind entry points taking a field object or positional
//!   arguments
//!
//! The client never retries and never persists channel state. Failures carry
//! the recommended delay or channel-deletion hint; acting on them is the
//! caller's job.

#![deny(unsafe_code)]

pub mod classify;
pub mod facade;
pub mod service;
pub mod tls;
pub mod transport;
pub mod types;

pub use facade::NotificationArgs;
pub use service::{Delivery, MpnsClient, PreparedSend};
pub use types::{DeliveryError, DeliveryOutcome, FailureKind};
