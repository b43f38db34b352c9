use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `rrggbb`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid colour {s:?}, expected #rrggbb"))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// Twelve-hue paired categorical palette.
pub const PAIRED: [Color; 12] = [
    Color::rgb(0xa6, 0xce, 0xe3),
    Color::rgb(0x1f, 0x78, 0xb4),
    Color::rgb(0xb2, 0xdf, 0x8a),
    Color::rgb(0x33, 0xa0, 0x2c),
    Color::rgb(0xfb, 0x9a, 0x99),
    Color::rgb(0xe3, 0x1a, 0x1c),
    Color::rgb(0xfd, 0xbf, 0x6f),
    Color::rgb(0xff, 0x7f, 0x00),
    Color::rgb(0xca, 0xb2, 0xd6),
    Color::rgb(0x6a, 0x3d, 0x9a),
    Color::rgb(0xff, 0xff, 0x99),
    Color::rgb(0xb1, 0x59, 0x28),
];

#[derive(Debug, Default)]
struct Assignments {
    slots: HashMap<String, usize>,
    order: Vec<String>,
}

/// Memoized category → colour mapping for one render session.
///
/// The first lookup of a name claims the next palette slot, wrapping around
/// once the palette is exhausted. Shared by the tile and legend passes.
#[derive(Debug)]
pub struct ColorAssigner {
    palette: Vec<Color>,
    assigned: Mutex<Assignments>,
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self {
            palette: PAIRED.to_vec(),
            assigned: Mutex::new(Assignments::default()),
        }
    }

    pub fn with_palette(palette: Vec<Color>) -> Result<Self, Error> {
        if palette.is_empty() {
            return Err(Error::Config("palette must contain at least one colour".into()));
        }
        Ok(Self {
            palette,
            assigned: Mutex::new(Assignments::default()),
        })
    }

    pub fn color_for(&self, name: &str) -> Color {
        let mut assigned = self.assigned.lock();
        if let Some(&slot) = assigned.slots.get(name) {
            return self.palette[slot % self.palette.len()];
        }
        let slot = assigned.order.len();
        assigned.slots.insert(name.to_string(), slot);
        assigned.order.push(name.to_string());
        self.palette[slot % self.palette.len()]
    }

    /// Names seen so far with their colours, in first-lookup order.
    pub fn assigned(&self) -> Vec<(String, Color)> {
        let assigned = self.assigned.lock();
        assigned
            .order
            .iter()
            .enumerate()
            .map(|(slot, name)| (name.clone(), self.palette[slot % self.palette.len()]))
            .collect()
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hex_round_trip() {
        let c = Color::from_hex("#1f78b4").unwrap();
        assert_eq!(c, Color::rgb(0x1f, 0x78, 0xb4));
        assert_eq!(c.to_hex(), "#1f78b4");
        assert_eq!(Color::from_hex("1F78B4"), Some(c));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_same_name_same_color() {
        let colors = ColorAssigner::new();
        let a = colors.color_for("Games");
        colors.color_for("Film");
        assert_eq!(colors.color_for("Games"), a);
    }

    #[test]
    fn test_first_names_take_palette_in_order() {
        let colors = ColorAssigner::new();
        assert_eq!(colors.color_for("Product Design"), PAIRED[0]);
        assert_eq!(colors.color_for("Tabletop Games"), PAIRED[1]);
        assert_eq!(colors.color_for("Product Design"), PAIRED[0]);
        assert_eq!(colors.color_for("Gaming Hardware"), PAIRED[2]);
    }

    #[test]
    fn test_twelve_names_distinct_then_wrap() {
        let colors = ColorAssigner::new();
        let seen: HashSet<Color> = (0..12).map(|i| colors.color_for(&format!("c{i}"))).collect();
        assert_eq!(seen.len(), 12);
        assert_eq!(colors.color_for("c12"), colors.color_for("c0"));
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(ColorAssigner::with_palette(vec![]).is_err());
    }

    #[test]
    fn test_assigned_reports_lookup_order() {
        let colors = ColorAssigner::with_palette(vec![Color::rgb(1, 2, 3), Color::rgb(4, 5, 6)]).unwrap();
        colors.color_for("b");
        colors.color_for("a");
        colors.color_for("c");
        let names: Vec<String> = colors.assigned().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(colors.color_for("c"), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_color_serde_as_hex() {
        let json = serde_json::to_string(&PAIRED[1]).unwrap();
        assert_eq!(json, "\"#1f78b4\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PAIRED[1]);
        assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
    }
}
