//! Wire payload encoding.
//!
//! Toast and tile kinds are wrapped in the `WPNotification` XML envelope:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?><wp:Notification xmlns:wp="WPNotification">
//!   <wp:Tile Id="..." Template="FlipTile"><wp:Count>3</wp:Count>...</wp:Tile>
//! </wp:Notification>
//! ```
//!
//! (shown wrapped; the encoded document has no whitespace between elements).
//! Raw payloads are returned verbatim.

use std::fmt::Write as _;

use bytes::Bytes;

use crate::errors::ValidationError;
use crate::notification::{FieldName, FieldValue, Notification};
use crate::xml::escape;

/// XML declaration that opens every toast/tile document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Namespace URI bound to the `wp` prefix.
pub const NAMESPACE: &str = "WPNotification";

/// Validate `notification` and produce the request body.
pub fn encode(notification: &Notification) -> Result<Bytes, ValidationError> {
    notification.validate()?;

    let kind = notification.kind();
    let (type_element, id) = match notification {
        Notification::Raw(raw) => return Ok(raw.payload.clone()),
        Notification::Toast(_) => ("Toast", None),
        Notification::Tile(tile) => ("Tile", tile.id.as_ref()),
        Notification::FlipTile(flip) => ("Tile", flip.tile.id.as_ref()),
    };

    let mut xml = String::with_capacity(256);
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<wp:Notification xmlns:wp="{NAMESPACE}">"#);

    let _ = write!(xml, "<wp:{type_element}");
    if let Some(id) = id.and_then(FieldValue::as_text) {
        let _ = write!(xml, r#" Id="{}""#, escape(&id));
    }
    if let Some(template) = kind.tile_template() {
        let _ = write!(xml, r#" Template="{}""#, escape(template));
    }
    xml.push('>');

    for (name, value) in notification.fields() {
        write_field(&mut xml, name, value);
    }

    let _ = write!(xml, "</wp:{type_element}></wp:Notification>");
    Ok(Bytes::from(xml))
}

fn write_field(xml: &mut String, name: FieldName, value: &FieldValue) {
    let Some(element) = name.element() else {
        return;
    };
    match value.as_text() {
        Some(text) => {
            let _ = write!(xml, "<wp:{element}>{}</wp:{element}>", escape(&text));
        }
        None => {
            let _ = write!(xml, r#"<wp:{element} Action="Clear"></wp:{element}>"#);
        }
    }
}
