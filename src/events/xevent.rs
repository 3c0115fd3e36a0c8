//! Typed events decoded from raw event frames
//!
//! A frame is one whitespace-normalized block of event text. The first
//! segment announces the event name; every following segment is a field
//! token coerced through a fixed ordered rule set, first match wins.

use std::collections::HashMap;
use std::fmt;

/// One decoded field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    IntList(Vec<i64>),
    Point { x: i64, y: i64 },
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// Apply the value rules for keyed fields: decimal, delimited decimal
    /// list, hex, unsigned point, YES/NO, raw text.
    fn parse(raw: &str) -> FieldValue {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = raw.parse() {
                return FieldValue::Int(value);
            }
        }
        if let Some(values) = parse_int_list(raw) {
            return FieldValue::IntList(values);
        }
        if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))
            && !hex.is_empty()
            && hex.bytes().all(|b| b.is_ascii_hexdigit())
            && let Ok(value) = i64::from_str_radix(hex, 16)
        {
            return FieldValue::Int(value);
        }
        if let Some((x, y)) = parse_point(raw, false) {
            return FieldValue::Point { x, y };
        }
        match raw {
            "YES" => FieldValue::Bool(true),
            "NO" => FieldValue::Bool(false),
            _ => FieldValue::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    /// Re-render the value in its source token shape.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::IntList(values) => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            FieldValue::Point { x, y } => write!(f, "({x},{y})"),
            FieldValue::Bool(true) => write!(f, "YES"),
            FieldValue::Bool(false) => write!(f, "NO"),
            FieldValue::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Repeated decimal runs joined by one consistent whitespace delimiter.
/// Empty runs between doubled delimiters decode as zero.
fn parse_int_list(raw: &str) -> Option<Vec<i64>> {
    let mut chars = raw.chars();
    let first = chars.next()?;
    if !first.is_ascii_digit() {
        return None;
    }
    let delimiter = raw.chars().find(|c| c.is_whitespace())?;
    if !raw
        .chars()
        .all(|c| c.is_ascii_digit() || c == delimiter)
    {
        return None;
    }
    Some(
        raw.split(delimiter)
            .map(|run| run.parse().unwrap_or(0))
            .collect(),
    )
}

/// `(<x>,<y>)`; `signed` additionally admits a leading minus on each part.
fn parse_point(raw: &str, signed: bool) -> Option<(i64, i64)> {
    let inner = raw.strip_prefix('(')?.strip_suffix(')')?;
    let (x, y) = inner.split_once(',')?;
    let valid = |part: &str| {
        let digits = if signed {
            part.strip_prefix('-').unwrap_or(part)
        } else {
            part
        };
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    };
    if !valid(x) || !valid(y) {
        return None;
    }
    Some((x.parse().ok()?, y.parse().ok()?))
}

/// `key: value` / `key value` split; None when the token has no keyed form.
fn split_keyed(token: &str) -> Option<(&str, &str)> {
    let key_len = token
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if key_len == 0 || key_len == token.len() {
        return None;
    }
    let rest = &token[key_len..];
    let separator_len = rest
        .bytes()
        .take_while(|b| *b == b':' || b.is_ascii_whitespace())
        .count();
    if separator_len == 0 {
        return None;
    }
    let value = &rest[separator_len..];
    if value.is_empty() {
        return None;
    }
    Some((&token[..key_len], value))
}

/// One typed event from the raw stream
#[derive(Debug, Clone, PartialEq)]
pub struct XEvent {
    pub name: String,
    fields: HashMap<String, FieldValue>,
}

impl XEvent {
    /// Decode one normalized frame. Returns None when the first segment does
    /// not announce an event; such frames are dropped without error.
    pub fn decode(frame: &str) -> Option<XEvent> {
        let mut segments = frame.split(", ");
        let name = event_name(segments.next()?)?.to_string();

        let mut fields = HashMap::new();
        for (index, token) in segments.enumerate() {
            if let Some((key, value)) = split_keyed(token) {
                fields.insert(key.to_string(), FieldValue::parse(value));
            } else if let Some((x, y)) = parse_point(token, true) {
                fields.insert(format!("Param{index}"), FieldValue::Point { x, y });
            } else {
                fields.insert(
                    format!("Param{index}"),
                    FieldValue::Text(token.to_string()),
                );
            }
        }
        Some(XEvent { name, fields })
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        match self.fields.get(field)? {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn ints(&self, field: &str) -> Option<&[i64]> {
        match self.fields.get(field)? {
            FieldValue::IntList(values) => Some(values),
            _ => None,
        }
    }

    pub fn point(&self, field: &str) -> Option<(i64, i64)> {
        match self.fields.get(field)? {
            FieldValue::Point { x, y } => Some((*x, *y)),
            _ => None,
        }
    }

    pub fn flag(&self, field: &str) -> Option<bool> {
        match self.fields.get(field)? {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        match self.fields.get(field)? {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Name from a `<name> event ...` header segment; the last ` event`
/// occurrence bounds the name.
fn event_name(header: &str) -> Option<&str> {
    let index = header.rfind(" event")?;
    if index == 0 {
        return None;
    }
    Some(&header[..index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_keyed_values() {
        let event = XEvent::decode(
            "EnterNotify event, serial 34, synthetic NO, window 0x2c00001, \
             mode NotifyGrab, state: 0x1, root:(400,300), keys: 4 0 0 2",
        )
        .unwrap();

        assert_eq!(event.name, "EnterNotify");
        assert_eq!(event.int("serial"), Some(34));
        assert_eq!(event.flag("synthetic"), Some(false));
        assert_eq!(event.int("window"), Some(0x2c00001));
        assert_eq!(event.text("mode"), Some("NotifyGrab"));
        assert_eq!(event.int("state"), Some(1));
        assert_eq!(event.point("root"), Some((400, 300)));
        assert_eq!(event.ints("keys"), Some(&[4, 0, 0, 2][..]));
    }

    #[test]
    fn test_decode_positional_fields() {
        let event = XEvent::decode(
            "ConfigureNotify event, serial 2, synthetic NO, window 123, \
             event 123, window 123, (400,300), width 50, height 50",
        )
        .unwrap();

        assert_eq!(event.point("Param5"), Some((400, 300)));
        assert_eq!(event.int("width"), Some(50));
        assert_eq!(event.int("height"), Some(50));
    }

    #[test]
    fn test_positional_point_accepts_signed_coordinates() {
        let event = XEvent::decode("MotionNotify event, (-3,-7), stray-token").unwrap();
        assert_eq!(event.point("Param0"), Some((-3, -7)));
        assert_eq!(event.text("Param1"), Some("stray-token"));
    }

    #[test]
    fn test_header_without_event_marker_is_rejected() {
        assert!(XEvent::decode("KeymapNotify, keys: 1 2").is_none());
        assert!(XEvent::decode(" event, window 1").is_none());
        assert!(XEvent::decode("").is_none());
    }

    #[test]
    fn test_typed_accessors_reject_other_variants() {
        let event = XEvent::decode("FocusOut event, mode NotifyUngrab, serial 9").unwrap();
        assert_eq!(event.int("mode"), None);
        assert_eq!(event.text("serial"), None);
        assert_eq!(event.point("missing"), None);
    }

    #[test]
    fn test_field_values_render_back_to_their_token_shape() {
        let tokens = [
            ("34", FieldValue::Int(34)),
            ("4 0 2", FieldValue::IntList(vec![4, 0, 2])),
            ("(400,300)", FieldValue::Point { x: 400, y: 300 }),
            ("YES", FieldValue::Bool(true)),
            ("NO", FieldValue::Bool(false)),
            ("NotifyGrab", FieldValue::Text("NotifyGrab".to_string())),
        ];
        for (token, expected) in tokens {
            let value = FieldValue::parse(token);
            assert_eq!(value, expected);
            assert_eq!(value.to_string(), token);
        }
    }

    #[test]
    fn test_hex_values_decode_to_int() {
        assert_eq!(FieldValue::parse("0x1"), FieldValue::Int(1));
        assert_eq!(FieldValue::parse("0xFF"), FieldValue::Int(255));
        assert_eq!(FieldValue::parse("0Xg"), FieldValue::Text("0Xg".to_string()));
    }

    #[test]
    fn test_doubled_list_delimiter_decodes_as_zero() {
        assert_eq!(
            FieldValue::parse("1  2"),
            FieldValue::IntList(vec![1, 0, 2])
        );
    }
}
