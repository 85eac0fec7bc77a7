//! Text measurement and word wrapping

use super::geometry::{FontFace, PT_TO_MM};

/// Measures rendered text width
pub trait TextMetrics {
    /// Width of `text` in millimetres when set in `face` at `size` points
    fn width(&self, text: &str, face: FontFace, size: f32) -> f32;
}

/// Helvetica advance widths (1/1000 em) for ASCII 0x20..=0x7E
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Width used for characters outside the table
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica-Bold runs roughly this much wider than the regular face
const BOLD_FACTOR: f32 = 1.07;

/// Metrics for the base-14 Helvetica family the PDF writer references
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl HelveticaMetrics {
    fn advance(c: char) -> u16 {
        let code = c as u32;
        if (0x20..=0x7E).contains(&code) {
            HELVETICA_WIDTHS[(code - 0x20) as usize]
        } else if c == '\u{2022}' {
            350
        } else {
            FALLBACK_WIDTH
        }
    }
}

impl TextMetrics for HelveticaMetrics {
    fn width(&self, text: &str, face: FontFace, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| Self::advance(c) as u32).sum();
        let factor = match face {
            FontFace::Bold => BOLD_FACTOR,
            FontFace::Regular | FontFace::Italic => 1.0,
        };
        units as f32 / 1000.0 * size * PT_TO_MM * factor
    }
}

/// Break `text` into lines no wider than `max_width`.
///
/// Newlines in the input always start a new line (blank lines are kept).
/// Words are packed greedily; a word that alone exceeds the width is split
/// between characters.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    face: FontFace,
    size: f32,
    metrics: &impl TextMetrics,
) -> Vec<String> {
    let fits = |s: &str| metrics.width(s, face, size) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if fits(word) {
                current = word.to_string();
            } else {
                for c in word.chars() {
                    current.push(c);
                    if !fits(&current) && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    }
                }
            }
        }

        lines.push(current);
    }

    lines
}

/// Shorten `text` with a trailing "..." so it fits `max_width`
pub fn truncate_to_width(
    text: &str,
    max_width: f32,
    face: FontFace,
    size: f32,
    metrics: &impl TextMetrics,
) -> String {
    if metrics.width(text, face, size) <= max_width {
        return text.to_string();
    }

    let mut kept: String = text.to_string();
    while !kept.is_empty() {
        kept.pop();
        let candidate = format!("{}...", kept.trim_end());
        if metrics.width(&candidate, face, size) <= max_width {
            return candidate;
        }
    }
    "...".to_string()
}
