//! Per-kind send entry points over loosely shaped arguments.
//!
//! A caller either passes one field object (`{"text1": "Hi.", "proxy": ...}`)
//! or a list of positional scalars mapped in schema order onto the kind's
//! fields. Arguments are validated before any network activity.

use mpns_core::{
    FieldName, FieldValue, Kind, Notification, SSL_PROPERTIES, TransportOptions, ValidationError,
};
use serde_json::Value;
use tracing::debug;

use crate::service::{Delivery, MpnsClient};

/// Arguments accepted by the facade entry points.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationArgs {
    /// A single JSON object. Keys outside the kind's schema are ignored,
    /// except transport option keys, which override the client's defaults.
    Object(Value),
    /// Positional values mapped onto the kind's fields in order. Strings,
    /// numbers and `null` (clear) are scalars; mapping stops at the first
    /// value that is not.
    Positional(Vec<Value>),
}

impl From<Value> for NotificationArgs {
    fn from(value: Value) -> Self {
        Self::Object(value)
    }
}

impl NotificationArgs {
    /// Build a validated notification and the transport options for it.
    ///
    /// Transport option keys given alongside the fields in an object are
    /// layered over `defaults`; every other option keeps its default.
    pub fn into_request(
        self,
        kind: Kind,
        defaults: &TransportOptions,
    ) -> Result<(Notification, TransportOptions), ValidationError> {
        match self {
            Self::Object(Value::Object(map)) => {
                let mut fields = Vec::new();
                for &name in kind.legal_fields() {
                    if let Some(value) = map.get(name.key()) {
                        fields.push((name, FieldValue::try_from(value)?));
                    }
                }
                let notification = Notification::from_fields(kind, fields)?;
                let options = transport_options(&map, defaults)?;
                Ok((notification, options))
            }
            Self::Object(other) => Err(ValidationError::InvalidArguments(format!(
                "expected a field object, got {other}"
            ))),
            Self::Positional(values) => {
                let fields = positional_fields(kind, &values)?;
                Ok((Notification::from_fields(kind, fields)?, defaults.clone()))
            }
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Null)
}

fn positional_fields(
    kind: Kind,
    values: &[Value],
) -> Result<Vec<(FieldName, FieldValue)>, ValidationError> {
    let scalars = values.iter().take_while(|v| is_scalar(v)).count();
    if scalars < values.len() {
        debug!(
            kind = %kind,
            used = scalars,
            given = values.len(),
            "positional arguments stop at first non-scalar"
        );
    }

    let schema = kind.legal_fields();
    if scalars > schema.len() {
        return Err(ValidationError::InvalidArguments(format!(
            "{kind} takes at most {} positional values, got {scalars}",
            schema.len()
        )));
    }

    schema
        .iter()
        .zip(&values[..scalars])
        .map(|(&name, value)| Ok((name, FieldValue::try_from(value)?)))
        .collect()
}

/// `defaults` with the transport option keys named in a field object
/// replacing their counterparts.
fn transport_options(
    map: &serde_json::Map<String, Value>,
    defaults: &TransportOptions,
) -> Result<TransportOptions, ValidationError> {
    let invalid = |e: serde_json::Error| {
        ValidationError::InvalidArguments(format!("transport options: {e}"))
    };
    let mut overrides = map
        .iter()
        .filter(|(key, _)| key.as_str() == "proxy" || SSL_PROPERTIES.contains(&key.as_str()))
        .peekable();
    if overrides.peek().is_none() {
        return Ok(defaults.clone());
    }

    let Value::Object(mut merged) = serde_json::to_value(defaults).map_err(invalid)? else {
        return Ok(defaults.clone());
    };
    for (key, value) in overrides {
        let _ = merged.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(merged)).map_err(invalid)
}

impl MpnsClient {
    /// Send a notification of `kind` built from facade arguments.
    ///
    /// Transport options in a field object override the matching client
    /// defaults for this send only.
    pub fn send_args(
        &self,
        kind: Kind,
        endpoint: &str,
        args: impl Into<NotificationArgs>,
    ) -> Result<Delivery, ValidationError> {
        let (notification, options) = args.into().into_request(kind, self.options())?;
        self.send_with(endpoint, &notification, &options)
    }

    /// Send a toast (`text1`, `text2`, `param`).
    pub fn send_toast(
        &self,
        endpoint: &str,
        args: impl Into<NotificationArgs>,
    ) -> Result<Delivery, ValidationError> {
        self.send_args(Kind::Toast, endpoint, args)
    }

    /// Send a tile update.
    pub fn send_tile(
        &self,
        endpoint: &str,
        args: impl Into<NotificationArgs>,
    ) -> Result<Delivery, ValidationError> {
        self.send_args(Kind::Tile, endpoint, args)
    }

    /// Send a flip tile update.
    pub fn send_flip_tile(
        &self,
        endpoint: &str,
        args: impl Into<NotificationArgs>,
    ) -> Result<Delivery, ValidationError> {
        self.send_args(Kind::FlipTile, endpoint, args)
    }

    /// Send a raw payload.
    pub fn send_raw(
        &self,
        endpoint: &str,
        args: impl Into<NotificationArgs>,
    ) -> Result<Delivery, ValidationError> {
        self.send_args(Kind::Raw, endpoint, args)
    }
}
