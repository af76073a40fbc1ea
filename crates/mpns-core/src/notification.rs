//! Notification model: the closed set of MPNS notification kinds.
//!
//! Each kind owns a fixed, ordered field schema ([`Kind::legal_fields`]).
//! Fields are tri-state: `None` leaves the field unspecified and emits
//! nothing, [`FieldValue::Clear`] tells the device to remove a previously
//! set value, and [`FieldValue::Text`]/[`FieldValue::Number`] carry content.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::errors::ValidationError;

// ─────────────────────────────────────────────────────────────────────────────
// Kind
// ─────────────────────────────────────────────────────────────────────────────

/// Notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    /// Transient on-screen notification.
    Toast,
    /// Home-screen tile update.
    Tile,
    /// Flip tile update (tile plus small/wide variants).
    FlipTile,
    /// Opaque application payload.
    Raw,
}

const TOAST_FIELDS: &[FieldName] = &[FieldName::Text1, FieldName::Text2, FieldName::Param];

const TILE_FIELDS: &[FieldName] = &[
    FieldName::BackgroundImage,
    FieldName::Count,
    FieldName::Title,
    FieldName::BackBackgroundImage,
    FieldName::BackTitle,
    FieldName::BackContent,
    FieldName::Id,
];

const FLIP_TILE_FIELDS: &[FieldName] = &[
    FieldName::BackgroundImage,
    FieldName::Count,
    FieldName::Title,
    FieldName::BackBackgroundImage,
    FieldName::BackTitle,
    FieldName::BackContent,
    FieldName::Id,
    FieldName::SmallBackgroundImage,
    FieldName::WideBackgroundImage,
    FieldName::WideBackContent,
    FieldName::WideBackBackgroundImage,
];

const RAW_FIELDS: &[FieldName] = &[FieldName::Payload];

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 4] = [Kind::Toast, Kind::Tile, Kind::FlipTile, Kind::Raw];

    /// Tag used in JSON and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Toast => "toast",
            Self::Tile => "tile",
            Self::FlipTile => "flipTile",
            Self::Raw => "raw",
        }
    }

    /// Value of the `X-NotificationClass` header (immediate delivery).
    pub const fn notification_class(self) -> &'static str {
        match self {
            Self::Toast => "2",
            Self::Tile | Self::FlipTile => "1",
            Self::Raw => "3",
        }
    }

    /// Value of the `X-WindowsPhone-Target` header. Raw has none.
    pub const fn target_name(self) -> Option<&'static str> {
        match self {
            Self::Toast => Some("toast"),
            Self::Tile | Self::FlipTile => Some("token"),
            Self::Raw => None,
        }
    }

    /// Ordered field schema. Encoding and positional argument mapping both
    /// follow this order.
    pub const fn legal_fields(self) -> &'static [FieldName] {
        match self {
            Self::Toast => TOAST_FIELDS,
            Self::Tile => TILE_FIELDS,
            Self::FlipTile => FLIP_TILE_FIELDS,
            Self::Raw => RAW_FIELDS,
        }
    }

    /// `Template` attribute of the tile element, if the kind has one.
    pub const fn tile_template(self) -> Option<&'static str> {
        match self {
            Self::FlipTile => Some("FlipTile"),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownKind(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FieldName
// ─────────────────────────────────────────────────────────────────────────────

/// Every field name known to any kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    /// Toast title line.
    Text1,
    /// Toast body line.
    Text2,
    /// Toast launch parameter.
    Param,
    /// Tile front image.
    BackgroundImage,
    /// Tile badge count.
    Count,
    /// Tile front title.
    Title,
    /// Tile back image.
    BackBackgroundImage,
    /// Tile back title.
    BackTitle,
    /// Tile back text.
    BackContent,
    /// Secondary tile identifier (attribute, not element).
    Id,
    /// Flip tile small image.
    SmallBackgroundImage,
    /// Flip tile wide front image.
    WideBackgroundImage,
    /// Flip tile wide back text.
    WideBackContent,
    /// Flip tile wide back image.
    WideBackBackgroundImage,
    /// Raw notification body.
    Payload,
}

impl FieldName {
    /// Key used in field objects and echoed outcomes.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Text1 => "text1",
            Self::Text2 => "text2",
            Self::Param => "param",
            Self::BackgroundImage => "backgroundImage",
            Self::Count => "count",
            Self::Title => "title",
            Self::BackBackgroundImage => "backBackgroundImage",
            Self::BackTitle => "backTitle",
            Self::BackContent => "backContent",
            Self::Id => "id",
            Self::SmallBackgroundImage => "smallBackgroundImage",
            Self::WideBackgroundImage => "wideBackgroundImage",
            Self::WideBackContent => "wideBackContent",
            Self::WideBackBackgroundImage => "wideBackBackgroundImage",
            Self::Payload => "payload",
        }
    }

    /// Child element name in the XML payload. `None` for fields that are not
    /// encoded as elements (`id` is an attribute, `payload` is sent verbatim).
    pub const fn element(self) -> Option<&'static str> {
        match self {
            Self::Text1 => Some("Text1"),
            Self::Text2 => Some("Text2"),
            Self::Param => Some("Param"),
            Self::BackgroundImage => Some("BackgroundImage"),
            Self::Count => Some("Count"),
            Self::Title => Some("Title"),
            Self::BackBackgroundImage => Some("BackBackgroundImage"),
            Self::BackTitle => Some("BackTitle"),
            Self::BackContent => Some("BackContent"),
            Self::SmallBackgroundImage => Some("SmallBackgroundImage"),
            Self::WideBackgroundImage => Some("WideBackgroundImage"),
            Self::WideBackContent => Some("WideBackContent"),
            Self::WideBackBackgroundImage => Some("WideBackBackgroundImage"),
            Self::Id | Self::Payload => None,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FieldValue
// ─────────────────────────────────────────────────────────────────────────────

/// A field that was explicitly provided.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Remove a previously set value on the device.
    Clear,
    /// Text content.
    Text(String),
    /// Numeric content (e.g. tile count).
    Number(serde_json::Number),
}

impl FieldValue {
    /// Content as text, `None` for [`FieldValue::Clear`].
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Clear => None,
            Self::Text(s) => Some(Cow::Borrowed(s)),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
        }
    }

    /// Whether this is a text value.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        Self::Number(n.into())
    }
}

impl TryFrom<&Value> for FieldValue {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Clear),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Number(n) => Ok(Self::Number(n.clone())),
            other => Err(ValidationError::InvalidArguments(format!(
                "field values must be a string, number or null, got {other}"
            ))),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Clear => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) => n.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(&value).map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Variants
// ─────────────────────────────────────────────────────────────────────────────

/// Toast notification fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toast {
    /// Bold title line. Required, and must be text.
    pub text1: Option<FieldValue>,
    /// Body line.
    pub text2: Option<FieldValue>,
    /// Page URI and query string to launch when tapped.
    pub param: Option<FieldValue>,
}

impl Toast {
    /// Toast with a title line.
    pub fn new(text1: impl Into<String>) -> Self {
        Self {
            text1: Some(FieldValue::Text(text1.into())),
            ..Self::default()
        }
    }

    /// Set the body line.
    #[must_use]
    pub fn with_text2(mut self, text2: impl Into<FieldValue>) -> Self {
        self.text2 = Some(text2.into());
        self
    }

    /// Set the launch parameter.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<FieldValue>) -> Self {
        self.param = Some(param.into());
        self
    }

    fn slots(&self) -> Vec<(FieldName, &Option<FieldValue>)> {
        vec![
            (FieldName::Text1, &self.text1),
            (FieldName::Text2, &self.text2),
            (FieldName::Param, &self.param),
        ]
    }

    fn slot_mut(&mut self, name: FieldName) -> Option<&mut Option<FieldValue>> {
        match name {
            FieldName::Text1 => Some(&mut self.text1),
            FieldName::Text2 => Some(&mut self.text2),
            FieldName::Param => Some(&mut self.param),
            _ => None,
        }
    }
}

/// Tile notification fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tile {
    /// Front background image URI.
    pub background_image: Option<FieldValue>,
    /// Badge count.
    pub count: Option<FieldValue>,
    /// Front title.
    pub title: Option<FieldValue>,
    /// Back background image URI.
    pub back_background_image: Option<FieldValue>,
    /// Back title.
    pub back_title: Option<FieldValue>,
    /// Back text.
    pub back_content: Option<FieldValue>,
    /// Secondary tile navigation URI, emitted as the `Id` attribute.
    pub id: Option<FieldValue>,
}

impl Tile {
    fn slots(&self) -> Vec<(FieldName, &Option<FieldValue>)> {
        vec![
            (FieldName::BackgroundImage, &self.background_image),
            (FieldName::Count, &self.count),
            (FieldName::Title, &self.title),
            (FieldName::BackBackgroundImage, &self.back_background_image),
            (FieldName::BackTitle, &self.back_title),
            (FieldName::BackContent, &self.back_content),
            (FieldName::Id, &self.id),
        ]
    }

    fn slot_mut(&mut self, name: FieldName) -> Option<&mut Option<FieldValue>> {
        match name {
            FieldName::BackgroundImage => Some(&mut self.background_image),
            FieldName::Count => Some(&mut self.count),
            FieldName::Title => Some(&mut self.title),
            FieldName::BackBackgroundImage => Some(&mut self.back_background_image),
            FieldName::BackTitle => Some(&mut self.back_title),
            FieldName::BackContent => Some(&mut self.back_content),
            FieldName::Id => Some(&mut self.id),
            _ => None,
        }
    }
}

/// Flip tile notification fields: every tile field plus the small and wide
/// variants. Always encoded with `Template="FlipTile"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlipTile {
    /// Fields shared with [`Tile`].
    pub tile: Tile,
    /// Small tile image URI.
    pub small_background_image: Option<FieldValue>,
    /// Wide tile front image URI.
    pub wide_background_image: Option<FieldValue>,
    /// Wide tile back text.
    pub wide_back_content: Option<FieldValue>,
    /// Wide tile back image URI.
    pub wide_back_background_image: Option<FieldValue>,
}

impl FlipTile {
    fn slots(&self) -> Vec<(FieldName, &Option<FieldValue>)> {
        let mut slots = self.tile.slots();
        slots.extend([
            (FieldName::SmallBackgroundImage, &self.small_background_image),
            (FieldName::WideBackgroundImage, &self.wide_background_image),
            (FieldName::WideBackContent, &self.wide_back_content),
            (FieldName::WideBackBackgroundImage, &self.wide_back_background_image),
        ]);
        slots
    }

    fn slot_mut(&mut self, name: FieldName) -> Option<&mut Option<FieldValue>> {
        match name {
            FieldName::SmallBackgroundImage => Some(&mut self.small_background_image),
            FieldName::WideBackgroundImage => Some(&mut self.wide_background_image),
            FieldName::WideBackContent => Some(&mut self.wide_back_content),
            FieldName::WideBackBackgroundImage => Some(&mut self.wide_back_background_image),
            other => self.tile.slot_mut(other),
        }
    }
}

/// Raw notification: an opaque body sent without XML wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw {
    /// Body bytes, sent verbatim.
    pub payload: Bytes,
}

impl Raw {
    /// Raw notification with the given body.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notification
// ─────────────────────────────────────────────────────────────────────────────

/// A notification of one of the four kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Toast.
    Toast(Toast),
    /// Tile.
    Tile(Tile),
    /// Flip tile.
    FlipTile(FlipTile),
    /// Raw payload.
    Raw(Raw),
}

impl Notification {
    /// Build and validate a notification from named field values.
    ///
    /// Every name must belong to `kind`'s schema. For [`Kind::Raw`] the only
    /// legal field is `payload`, which must be text or a number.
    pub fn from_fields(
        kind: Kind,
        fields: impl IntoIterator<Item = (FieldName, FieldValue)>,
    ) -> Result<Self, ValidationError> {
        let mut notification = match kind {
            Kind::Toast => Self::Toast(Toast::default()),
            Kind::Tile => Self::Tile(Tile::default()),
            Kind::FlipTile => Self::FlipTile(FlipTile::default()),
            Kind::Raw => {
                let mut payload = None;
                for (name, value) in fields {
                    if name != FieldName::Payload {
                        return Err(ValidationError::IllegalField { kind, field: name });
                    }
                    let text = value.as_text().ok_or(ValidationError::InvalidFieldType {
                        field: FieldName::Payload,
                        expected: "a string or bytes",
                    })?;
                    payload = Some(Bytes::from(text.into_owned()));
                }
                let payload = payload.ok_or(ValidationError::MissingField {
                    kind,
                    field: FieldName::Payload,
                })?;
                return Ok(Self::Raw(Raw { payload }));
            }
        };

        for (name, value) in fields {
            notification.set(name, value)?;
        }
        notification.validate()?;
        Ok(notification)
    }

    /// The notification's kind.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Toast(_) => Kind::Toast,
            Self::Tile(_) => Kind::Tile,
            Self::FlipTile(_) => Kind::FlipTile,
            Self::Raw(_) => Kind::Raw,
        }
    }

    /// Set one field. Fails if `name` is not in this kind's schema.
    pub fn set(&mut self, name: FieldName, value: FieldValue) -> Result<(), ValidationError> {
        let kind = self.kind();
        let slot = match self {
            Self::Toast(t) => t.slot_mut(name),
            Self::Tile(t) => t.slot_mut(name),
            Self::FlipTile(t) => t.slot_mut(name),
            Self::Raw(raw) if name == FieldName::Payload => {
                let text = value.as_text().ok_or(ValidationError::InvalidFieldType {
                    field: name,
                    expected: "a string or bytes",
                })?;
                raw.payload = Bytes::from(text.into_owned());
                return Ok(());
            }
            Self::Raw(_) => None,
        };
        let slot = slot.ok_or(ValidationError::IllegalField { kind, field: name })?;
        *slot = Some(value);
        Ok(())
    }

    /// Fields that were explicitly provided, in schema order. Raw
    /// notifications report none; their body is not a field value.
    pub fn fields(&self) -> Vec<(FieldName, &FieldValue)> {
        let slots = match self {
            Self::Toast(t) => t.slots(),
            Self::Tile(t) => t.slots(),
            Self::FlipTile(t) => t.slots(),
            Self::Raw(_) => Vec::new(),
        };
        slots
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name, v)))
            .collect()
    }

    /// Check the kind's validation rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let kind = self.kind();
        match self {
            Self::Toast(toast) => match &toast.text1 {
                Some(FieldValue::Text(_)) => Ok(()),
                Some(_) => Err(ValidationError::InvalidFieldType {
                    field: FieldName::Text1,
                    expected: "a string",
                }),
                None => Err(ValidationError::MissingField {
                    kind,
                    field: FieldName::Text1,
                }),
            },
            Self::Tile(Tile { id, .. })
            | Self::FlipTile(FlipTile {
                tile: Tile { id, .. },
                ..
            }) => {
                if matches!(id, Some(FieldValue::Clear)) {
                    return Err(ValidationError::InvalidFieldType {
                        field: FieldName::Id,
                        expected: "a string or number",
                    });
                }
                if self.fields().is_empty() {
                    return Err(ValidationError::EmptyFieldSet(kind));
                }
                Ok(())
            }
            Self::Raw(_) => Ok(()),
        }
    }

    /// Set fields as a JSON object, for logging and correlation. Raw bodies
    /// are echoed as (lossy) UTF-8 text under `payload`.
    pub fn echo_fields(&self) -> serde_json::Map<String, Value> {
        if let Self::Raw(raw) = self {
            let mut map = serde_json::Map::new();
            let _ = map.insert(
                FieldName::Payload.key().to_string(),
                Value::String(String::from_utf8_lossy(&raw.payload).into_owned()),
            );
            return map;
        }
        self.fields()
            .into_iter()
            .map(|(name, value)| {
                let json = match value {
                    FieldValue::Clear => Value::Null,
                    FieldValue::Text(s) => Value::String(s.clone()),
                    FieldValue::Number(n) => Value::Number(n.clone()),
                };
                (name.key().to_string(), json)
            })
            .collect()
    }
}

impl From<Toast> for Notification {
    fn from(t: Toast) -> Self {
        Self::Toast(t)
    }
}

impl From<Tile> for Notification {
    fn from(t: Tile) -> Self {
        Self::Tile(t)
    }
}

impl From<FlipTile> for Notification {
    fn from(t: FlipTile) -> Self {
        Self::FlipTile(t)
    }
}

impl From<Raw> for Notification {
    fn from(r: Raw) -> Self {
        Self::Raw(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn protocol_metadata_per_kind() {
        assert_eq!(Kind::Toast.notification_class(), "2");
        assert_eq!(Kind::Tile.notification_class(), "1");
        assert_eq!(Kind::FlipTile.notification_class(), "1");
        assert_eq!(Kind::Raw.notification_class(), "3");
        assert_eq!(Kind::Toast.target_name(), Some("toast"));
        assert_eq!(Kind::Tile.target_name(), Some("token"));
        assert_eq!(Kind::FlipTile.target_name(), Some("token"));
        assert_eq!(Kind::Raw.target_name(), None);
    }

    #[test]
    fn flip_tile_schema_extends_tile() {
        let tile = Kind::Tile.legal_fields();
        let flip = Kind::FlipTile.legal_fields();
        assert_eq!(&flip[..tile.len()], tile);
        assert_eq!(flip.len(), tile.len() + 4);
        assert_eq!(Kind::Raw.legal_fields(), &[FieldName::Payload]);
    }

    #[test]
    fn kind_parses_from_tag() {
        assert_eq!("flipTile".parse::<Kind>().unwrap(), Kind::FlipTile);
        assert_matches!(
            "cycleTile".parse::<Kind>(),
            Err(ValidationError::UnknownKind(k)) if k == "cycleTile"
        );
    }

    #[test]
    fn kind_serde_tag() {
        assert_eq!(serde_json::to_value(Kind::FlipTile).unwrap(), "flipTile");
    }

    #[test]
    fn toast_with_text1_only_is_valid() {
        let n = Notification::from(Toast::new("Hi."));
        assert!(n.validate().is_ok());
    }

    #[test]
    fn toast_without_text1_is_rejected() {
        let n = Notification::from(Toast {
            text2: Some("body".into()),
            ..Toast::default()
        });
        assert_matches!(
            n.validate(),
            Err(ValidationError::MissingField {
                kind: Kind::Toast,
                field: FieldName::Text1
            })
        );
    }

    #[test]
    fn toast_with_numeric_text1_is_rejected() {
        let n = Notification::from(Toast {
            text1: Some(7_i64.into()),
            ..Toast::default()
        });
        assert_matches!(
            n.validate(),
            Err(ValidationError::InvalidFieldType {
                field: FieldName::Text1,
                ..
            })
        );
    }

    #[test]
    fn toast_with_cleared_text1_is_rejected() {
        let n = Notification::from(Toast {
            text1: Some(FieldValue::Clear),
            ..Toast::default()
        });
        assert!(n.validate().is_err());
    }

    #[test]
    fn empty_tile_is_rejected() {
        assert_matches!(
            Notification::from(Tile::default()).validate(),
            Err(ValidationError::EmptyFieldSet(Kind::Tile))
        );
        assert_matches!(
            Notification::from(FlipTile::default()).validate(),
            Err(ValidationError::EmptyFieldSet(Kind::FlipTile))
        );
    }

    #[test]
    fn tile_with_count_only_is_valid() {
        let tile = Notification::from(Tile {
            count: Some(3_i64.into()),
            ..Tile::default()
        });
        assert!(tile.validate().is_ok());

        let flip = Notification::from_fields(
            Kind::FlipTile,
            [(FieldName::Count, FieldValue::from(3_i64))],
        );
        assert!(flip.is_ok());
    }

    #[test]
    fn tile_with_only_cleared_field_is_valid() {
        let tile = Notification::from(Tile {
            back_title: Some(FieldValue::Clear),
            ..Tile::default()
        });
        assert!(tile.validate().is_ok());
    }

    #[test]
    fn tile_id_cannot_be_cleared() {
        let tile = Notification::from(Tile {
            id: Some(FieldValue::Clear),
            count: Some(1_i64.into()),
            ..Tile::default()
        });
        assert_matches!(
            tile.validate(),
            Err(ValidationError::InvalidFieldType {
                field: FieldName::Id,
                ..
            })
        );
    }

    #[test]
    fn from_fields_rejects_field_of_other_kind() {
        let result =
            Notification::from_fields(Kind::Tile, [(FieldName::Text1, FieldValue::from("x"))]);
        assert_matches!(
            result,
            Err(ValidationError::IllegalField {
                kind: Kind::Tile,
                field: FieldName::Text1
            })
        );
    }

    #[test]
    fn from_fields_flip_tile_routes_shared_fields() {
        let n = Notification::from_fields(
            Kind::FlipTile,
            [
                (FieldName::Title, FieldValue::from("front")),
                (FieldName::WideBackContent, FieldValue::from("wide")),
            ],
        )
        .unwrap();
        assert_matches!(&n, Notification::FlipTile(f) if f.tile.title == Some("front".into()));
        let names: Vec<_> = n.fields().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![FieldName::Title, FieldName::WideBackContent]);
    }

    #[test]
    fn raw_requires_payload() {
        assert_matches!(
            Notification::from_fields(Kind::Raw, std::iter::empty()),
            Err(ValidationError::MissingField {
                kind: Kind::Raw,
                field: FieldName::Payload
            })
        );
    }

    #[test]
    fn raw_rejects_other_fields() {
        assert_matches!(
            Notification::from_fields(Kind::Raw, [(FieldName::Title, FieldValue::from("x"))]),
            Err(ValidationError::IllegalField { kind: Kind::Raw, .. })
        );
    }

    #[test]
    fn raw_rejects_cleared_payload() {
        assert_matches!(
            Notification::from_fields(Kind::Raw, [(FieldName::Payload, FieldValue::Clear)]),
            Err(ValidationError::InvalidFieldType { .. })
        );
    }

    #[test]
    fn fields_distinguish_clear_from_unset() {
        let n = Notification::from(Tile {
            count: Some(FieldValue::Clear),
            title: Some("t".into()),
            ..Tile::default()
        });
        let fields = n.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], (FieldName::Count, &FieldValue::Clear));
        assert_eq!(fields[1], (FieldName::Title, &FieldValue::from("t")));
    }

    #[test]
    fn echo_fields_maps_clear_to_null() {
        let n = Notification::from(Toast::new("Hi.").with_param(FieldValue::Clear));
        let echo = n.echo_fields();
        assert_eq!(echo["text1"], "Hi.");
        assert!(echo["param"].is_null());
        assert!(!echo.contains_key("text2"));
    }

    #[test]
    fn echo_fields_raw_payload() {
        let n = Notification::from(Raw::new("<data/>"));
        assert_eq!(n.echo_fields()["payload"], "<data/>");
    }

    #[test]
    fn field_value_from_json() {
        assert_eq!(
            FieldValue::try_from(&Value::Null).unwrap(),
            FieldValue::Clear
        );
        assert_eq!(
            FieldValue::try_from(&serde_json::json!(5)).unwrap(),
            FieldValue::from(5_i64)
        );
        assert_matches!(
            FieldValue::try_from(&serde_json::json!(true)),
            Err(ValidationError::InvalidArguments(_))
        );
    }

    #[test]
    fn field_value_serde() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"[null, "a", 2]"#).unwrap();
        assert_eq!(
            values,
            vec![FieldValue::Clear, FieldValue::from("a"), FieldValue::from(2_i64)]
        );
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[null,"a",2]"#
        );
    }
}
