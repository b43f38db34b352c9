use serde::Serialize;

use crate::config::TileConfig;

/// Splits a tile name into display lines.
///
/// A new fragment starts before every ASCII uppercase letter that is followed
/// by a character other than an ASCII uppercase letter, except at the very
/// start. Runs of capitals stay together until their last letter, so
/// `"JSONParser"` becomes `["JSON", "Parser"]`. Whitespace and punctuation stay
/// attached to the preceding fragment.
pub fn split_label(name: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = name.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let Some(&(_, next)) = chars.peek() else {
            break;
        };
        if i > start && c.is_ascii_uppercase() && !next.is_ascii_uppercase() {
            out.push(&name[start..i]);
            start = i;
        }
    }
    out.push(&name[start..]);
    out
}

/// One positioned line of a tile label, relative to the tile origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

pub fn label_lines(name: &str, config: &TileConfig) -> Vec<LabelLine> {
    split_label(name)
        .into_iter()
        .enumerate()
        .map(|(i, text)| LabelLine {
            text: text.to_string(),
            x: config.label_inset,
            y: config.first_baseline + i as f64 * config.line_height,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_split() {
        assert_eq!(split_label("TechnologyGadgets"), vec!["Technology", "Gadgets"]);
    }

    #[test]
    fn test_single_word() {
        assert_eq!(split_label("Film"), vec!["Film"]);
        assert_eq!(split_label("lowercase words only"), vec!["lowercase words only"]);
        assert_eq!(split_label(""), vec![""]);
    }

    #[test]
    fn test_spaces_stay_with_previous_fragment() {
        assert_eq!(
            split_label("Pebble Time - Awesome Smartwatch, No Compromises"),
            vec!["Pebble ", "Time - ", "Awesome ", "Smartwatch, ", "No ", "Compromises"]
        );
    }

    #[test]
    fn test_acronyms() {
        assert_eq!(split_label("JSON"), vec!["JSON"]);
        assert_eq!(split_label("JSONParser"), vec!["JSON", "Parser"]);
        // A lone trailing capital has no following character, so no split.
        assert_eq!(split_label("Model A"), vec!["Model A"]);
        // A capital followed by a space still starts a fragment.
        assert_eq!(split_label("The 3D Printer"), vec!["The 3", "D ", "Printer"]);
    }

    #[test]
    fn test_non_ascii_neighbours() {
        assert_eq!(split_label("CaféOlé"), vec!["Café", "Olé"]);
        assert_eq!(split_label("ÉtéA"), vec!["ÉtéA"]);
    }

    #[test]
    fn test_label_lines_positions() {
        let lines = label_lines("TechnologyGadgetsFilm", &TileConfig::default());
        let ys: Vec<f64> = lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![13.0, 23.0, 33.0]);
        assert!(lines.iter().all(|l| l.x == 4.0));
        assert_eq!(lines[2].text, "Film");
    }
}
