//! Color utilities for request ID visualization.

use owo_colors::{AnsiColors, DynColors, OwoColorize, Style};

/// Palette for request IDs; readable on both light and dark terminals.
const COLORS: [AnsiColors; 12] = [
    AnsiColors::Red,
    AnsiColors::Green,
    AnsiColors::Yellow,
    AnsiColors::Blue,
    AnsiColors::Magenta,
    AnsiColors::Cyan,
    AnsiColors::BrightRed,
    AnsiColors::BrightGreen,
    AnsiColors::BrightYellow,
    AnsiColors::BrightBlue,
    AnsiColors::BrightMagenta,
    AnsiColors::BrightCyan,
];

/// Stable mapping from a request ID to a palette entry.
pub fn color_for_id(id: &str) -> AnsiColors {
    let hash = id
        .bytes()
        .fold(0x811c_9dc5u32, |acc, b| (acc ^ u32::from(b)).wrapping_mul(0x0100_0193));
    COLORS[hash as usize % COLORS.len()]
}

/// `[id]` wrapped in the ID's color.
pub fn colored_id(id: &str) -> String {
    let style = Style::new().color(DynColors::Ansi(color_for_id(id)));
    format!("[{}]", id).style(style).to_string()
}

/// Route tag colored by outcome class: green for 2xx, yellow for 4xx, red otherwise.
pub fn colored_tag(tag: &str, status: u16) -> String {
    match status {
        200..=299 => tag.green().to_string(),
        400..=499 => tag.yellow().to_string(),
        _ => tag.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_determinism() {
        let a = color_for_id("abc12");
        let b = color_for_id("abc12");
        assert!(std::mem::discriminant(&a) == std::mem::discriminant(&b));
    }

    #[test]
    fn test_colored_id_format() {
        let result = colored_id("test");
        assert!(result.contains("[test]"));
    }

    #[test]
    fn test_colored_tag_keeps_text() {
        assert!(colored_tag("COUNT", 200).contains("COUNT"));
        assert!(colored_tag("COUNT", 500).contains("COUNT"));
    }
}
