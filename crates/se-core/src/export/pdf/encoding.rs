//! WinAnsi text encoding for the base-14 fonts
//!
//! The built-in Helvetica faces are written with WinAnsiEncoding, which covers
//! Latin-1 plus a handful of typographic characters. Anything else would be
//! dropped from the content stream, so it is replaced with a visible `?`
//! before the text is measured.

/// Characters WinAnsi places in 0x80..=0x9F
const CP1252_EXTRAS: [char; 27] = [
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
    '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
];

/// Replacement for characters the fonts cannot show
pub const REPLACEMENT: char = '?';

/// Whether `c` has a WinAnsi code point
pub fn is_win_ansi(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF) || CP1252_EXTRAS.contains(&c)
}

/// Maps text onto WinAnsi, counting the characters it had to replace
#[derive(Debug, Default)]
pub struct WinAnsiText {
    replaced: usize,
}

impl WinAnsiText {
    /// Encode text for a single line; line breaks and tabs become spaces
    pub fn line(&mut self, text: &str) -> String {
        self.map(text, false)
    }

    /// Encode text that will be wrapped, keeping its line breaks
    pub fn paragraphs(&mut self, text: &str) -> String {
        self.map(text, true)
    }

    /// Characters replaced so far
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    fn map(&mut self, text: &str, keep_newlines: bool) -> String {
        text.chars()
            .map(|c| match c {
                '\n' if keep_newlines => c,
                '\n' | '\r' | '\t' => ' ',
                c if is_win_ansi(c) => c,
                _ => {
                    self.replaced += 1;
                    REPLACEMENT
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_text_unchanged() {
        let mut text = WinAnsiText::default();
        assert_eq!(text.line("Café \u{2014} 5 \u{20AC}"), "Café \u{2014} 5 \u{20AC}");
        assert_eq!(text.line("\u{2022} Größe: 10"), "\u{2022} Größe: 10");
        assert_eq!(text.replaced(), 0);
    }

    #[test]
    fn test_non_latin_replaced() {
        let mut text = WinAnsiText::default();
        assert_eq!(text.line("Привет мир 東京"), "?????? ??? ??");
        assert_eq!(text.line("ok \u{1F600}"), "ok ?");
        assert_eq!(text.replaced(), 12);
    }

    #[test]
    fn test_line_breaks() {
        let mut text = WinAnsiText::default();
        assert_eq!(text.line("a\nb\tc"), "a b c");
        assert_eq!(text.paragraphs("a\nb\tc"), "a\nb c");
        assert_eq!(text.replaced(), 0);
    }
}
