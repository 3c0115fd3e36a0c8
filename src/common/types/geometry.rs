//! Screen-space rectangle shared by zones, overlays and the window manager
//!
//! One type carries both serialization forms used at the process boundaries:
//! the toolkit's geometry string and the window-manager move argument.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in root-window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Rect {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the point lies inside the rectangle (right/bottom edges
    /// exclusive)
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Geometry string in the toolkit's `<w>x<h>+<x>+<y>` form
    pub fn as_geometry(&self) -> String {
        format!("{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }

    /// `<gravity>,<x>,<y>,<w>,<h>` as consumed by the window-manager move
    /// command
    pub fn as_move_arg(&self) -> String {
        format!("0,{},{},{},{}", self.x, self.y, self.width, self.height)
    }

    /// Parse the first `<w>x<h>+<x>+<y>` occurrence in `input`.
    ///
    /// Geometry replies are expected to be well-formed whenever the toolkit
    /// process is healthy, so an unparseable reply is an error rather than a
    /// silently dropped line.
    pub fn parse_geometry(input: &str) -> Result<Self> {
        let bytes = input.as_bytes();
        for start in 0..bytes.len() {
            if bytes[start].is_ascii_digit() && (start == 0 || !bytes[start - 1].is_ascii_digit()) {
                if let Some(rect) = parse_geometry_at(&input[start..]) {
                    return Ok(rect);
                }
            }
        }
        bail!("invalid geometry data {input:?}");
    }
}

/// Try to read `<w>x<h>+<x>+<y>` starting at the beginning of `input`.
fn parse_geometry_at(input: &str) -> Option<Rect> {
    let (width, rest) = read_number(input)?;
    let rest = rest.strip_prefix('x')?;
    let (height, rest) = read_number(rest)?;
    let rest = rest.strip_prefix('+')?;
    let (x, rest) = read_number(rest)?;
    let rest = rest.strip_prefix('+')?;
    let (y, _) = read_number(rest)?;
    Some(Rect::new(x, y, width, height))
}

fn read_number(input: &str) -> Option<(i32, &str)> {
    let len = input.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let value = input[..len].parse().ok()?;
    Some((value, &input[len..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point() {
        let rect = Rect::new(10, 20, 30, 40);
        assert!(rect.contains(10, 20));
        assert!(rect.contains(39, 59));
        assert!(!rect.contains(40, 20));
        assert!(!rect.contains(10, 60));
        assert!(!rect.contains(9, 20));
    }

    #[test]
    fn test_geometry_string_round_trip() {
        let rect = Rect::new(10, 20, 300, 200);
        assert_eq!(rect.as_geometry(), "300x200+10+20");

        let parsed = Rect::parse_geometry("300x200+10+20").unwrap();
        assert_eq!(parsed, rect);
    }

    #[test]
    fn test_parse_geometry_embedded() {
        // Interpreter replies carry a trailing newline
        let rect = Rect::parse_geometry("640x480+5+7\n").unwrap();
        assert_eq!(rect, Rect::new(5, 7, 640, 480));
    }

    #[test]
    fn test_parse_geometry_rejects_garbage() {
        assert!(Rect::parse_geometry("").is_err());
        assert!(Rect::parse_geometry("not a geometry").is_err());
        assert!(Rect::parse_geometry("300x200").is_err());
    }

    #[test]
    fn test_move_arg() {
        let rect = Rect::new(0, 0, 500, 500);
        assert_eq!(rect.as_move_arg(), "0,0,0,500,500");
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let rect: Rect = serde_json::from_str(r#"{"width": 80}"#).unwrap();
        assert_eq!(rect, Rect::new(0, 0, 80, 0));
    }
}
