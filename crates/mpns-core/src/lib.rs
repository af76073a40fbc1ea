//! # mpns-core
//!
//! Notification model, XML payload encoding, and shared utilities for
//! Microsoft Push Notification Service (MPNS) delivery.
//!
//! - **Escaping**: [`xml::escape`] applies the wire format's character map
//! - **Notifications**: [`notification::Notification`] over the closed set of
//!   [`notification::Kind`]s (toast, tile, flip tile, raw) with tri-state fields
//! - **Encoding**: [`payload::encode`] produces the exact bytes sent on the wire
//! - **Options**: [`options::TransportOptions`] carries proxy and mutual-TLS material per call
//! - **Errors**: [`errors::ValidationError`] for requests rejected before any I/O
//! - **Logging**: [`logging::init_subscriber`] for the stderr `tracing` subscriber
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `mpns-settings`, `mpns-push` and the CLI.

#![deny(unsafe_code)]

pub mod errors;
pub mod logging;
pub mod notification;
pub mod options;
pub mod payload;
pub mod text;
pub mod xml;

pub use errors::ValidationError;
pub use notification::{FieldName, FieldValue, FlipTile, Kind, Notification, Raw, Tile, Toast};
pub use options::{SSL_PROPERTIES, TlsOptions, TransportOptions};
pub use payload::encode;
