//! Callback line grammar for the toolkit bridge
//!
//! The interpreter reports widget activity as single `Event ...` lines on its
//! stdout. The same grammar is used in both directions: bindings registered
//! by the engine embed an encoded line the interpreter echoes back verbatim.

use std::collections::HashMap;

const PARAM_DELIMITER: char = '|';
const PARAM_VALUE_DELIMITER: char = '=';

/// One decoded toolkit callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TkCallback {
    pub widget_id: String,
    pub name: String,
    pub params: HashMap<String, String>,
}

impl TkCallback {
    /// Decode `Event <widget> <name>[ <params>]`; None when the line does
    /// not match the grammar (such lines are dropped by the pump).
    pub fn decode(line: &str) -> Option<TkCallback> {
        let rest = line.strip_prefix("Event ")?;

        let id_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'.')
            .count();
        if id_len == 0 {
            return None;
        }
        let widget_id = &rest[..id_len];

        let rest = rest[id_len..].strip_prefix(' ')?;
        let name_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        if name_len == 0 {
            return None;
        }
        let name = &rest[..name_len];

        let tail = &rest[name_len..];
        let raw_params = tail.strip_prefix(' ').unwrap_or(tail);
        let mut params = HashMap::new();
        if !raw_params.is_empty() {
            for pair in raw_params.split(PARAM_DELIMITER) {
                let parts: Vec<&str> = pair.split(PARAM_VALUE_DELIMITER).collect();
                if parts.len() == 2 {
                    params.insert(parts[0].to_string(), parts[1].to_string());
                }
            }
        }

        Some(TkCallback {
            widget_id: widget_id.to_string(),
            name: name.to_string(),
            params,
        })
    }

    /// Render a callback line for embedding in a binding command. Quotes are
    /// stripped and newlines flattened so the result always round-trips as
    /// one line.
    pub fn encode(widget_id: &str, name: &str, params: &[(&str, &str)]) -> String {
        let mut line = format!("Event {widget_id} {name}");
        for (index, (key, value)) in params.iter().enumerate() {
            line.push(if index == 0 { ' ' } else { PARAM_DELIMITER });
            line.push_str(key);
            line.push(PARAM_VALUE_DELIMITER);
            line.push_str(value);
        }
        line.replace('"', "").replace('\n', "\\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_params() {
        let callback = TkCallback::decode("Event .1.2 OnClick x=10|y=20").unwrap();
        assert_eq!(callback.widget_id, ".1.2");
        assert_eq!(callback.name, "OnClick");
        assert_eq!(callback.params.get("x"), Some(&"10".to_string()));
        assert_eq!(callback.params.get("y"), Some(&"20".to_string()));
    }

    #[test]
    fn test_decode_without_params() {
        let callback = TkCallback::decode("Event .3 OnDestroy").unwrap();
        assert_eq!(callback.widget_id, ".3");
        assert_eq!(callback.name, "OnDestroy");
        assert!(callback.params.is_empty());
    }

    #[test]
    fn test_decode_rejects_malformed_lines() {
        assert!(TkCallback::decode("Event ").is_none());
        assert!(TkCallback::decode("Event .1").is_none());
        assert!(TkCallback::decode("Eventual nonsense").is_none());
        assert!(TkCallback::decode("wish8.6: no such command").is_none());
    }

    #[test]
    fn test_decode_skips_pairs_without_one_separator() {
        let callback = TkCallback::decode("Event .1 OnClick x=10|broken|a=b=c").unwrap();
        assert_eq!(callback.params.len(), 1);
        assert_eq!(callback.params.get("x"), Some(&"10".to_string()));
    }

    #[test]
    fn test_encode_round_trip() {
        let line = TkCallback::encode(".1.2", "OnClick", &[("x", "10"), ("y", "20")]);
        assert_eq!(line, "Event .1.2 OnClick x=10|y=20");

        let callback = TkCallback::decode(&line).unwrap();
        assert_eq!(callback.widget_id, ".1.2");
        assert_eq!(callback.params.len(), 2);
    }

    #[test]
    fn test_encode_strips_quotes_and_newlines() {
        let line = TkCallback::encode(".4", "OnClick", &[("label", "say \"hi\"\nthere")]);
        assert_eq!(line, "Event .4 OnClick label=say hi\\nthere");
    }
}
