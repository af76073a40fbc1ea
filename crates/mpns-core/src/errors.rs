//! Validation errors raised before any network activity.

use thiserror::Error;

use crate::notification::{FieldName, Kind};

/// A malformed notification request.
///
/// These are programmer errors: the request can never succeed as written,
/// so they are never retryable and are returned synchronously.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The notification kind tag is not one of toast, tile, flipTile, raw.
    #[error("unknown notification kind '{0}'")]
    UnknownKind(String),

    /// A field required by the kind was not provided.
    #[error("{kind} notification requires '{field}'")]
    MissingField {
        /// Notification kind.
        kind: Kind,
        /// Required field.
        field: FieldName,
    },

    /// A field was provided with a value of the wrong shape.
    #[error("'{field}' must be {expected}")]
    InvalidFieldType {
        /// Offending field.
        field: FieldName,
        /// Expected shape, e.g. "a string".
        expected: &'static str,
    },

    /// A tile notification with nothing to update.
    #[error("{0} notification requires at least one field")]
    EmptyFieldSet(Kind),

    /// A field that is not part of the kind's schema.
    #[error("'{field}' is not a {kind} field")]
    IllegalField {
        /// Notification kind.
        kind: Kind,
        /// Offending field.
        field: FieldName,
    },

    /// Facade arguments that cannot be mapped onto a notification.
    #[error("invalid notification arguments: {0}")]
    InvalidArguments(String),

    /// The channel URI could not be parsed or is not http/https.
    #[error("invalid endpoint URI '{uri}': {reason}")]
    InvalidEndpoint {
        /// URI as supplied.
        uri: String,
        /// Parse failure.
        reason: String,
    },

    /// The proxy URL could not be parsed.
    #[error("invalid proxy URL '{url}': {reason}")]
    InvalidProxy {
        /// URL as supplied.
        url: String,
        /// Parse failure.
        reason: String,
    },

    /// Client TLS material (identity, passphrase, CA bundle or cipher list)
    /// cannot produce a TLS configuration.
    #[error("invalid TLS material: {reason}")]
    InvalidTlsMaterial {
        /// What was wrong with it.
        reason: String,
    },
}
