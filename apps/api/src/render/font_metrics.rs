//! Static glyph-width tables for the PDF standard Type1 fonts used in export.
//!
//! Widths are in thousandths of an em, taken from the Adobe core-font AFM
//! files. Tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.
//!
//! Width array slot layout:
//! ```text
//! [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
//! [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
//! [16..25]=0-9
//! [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
//! [33..58]=A-Z
//! [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
//! [65..90]=a-z
//! [91]={  [92]=|  [93]=}  [94]=~
//! ```

/// Typeface family chosen by the resume template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Professional and Creative templates.
    Helvetica,
    /// Academic template.
    Times,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontFamily {
    /// PostScript name for the `BaseFont` entry.
    pub fn base_font(self, weight: FontWeight) -> &'static str {
        match (self, weight) {
            (FontFamily::Helvetica, FontWeight::Regular) => "Helvetica",
            (FontFamily::Helvetica, FontWeight::Bold) => "Helvetica-Bold",
            (FontFamily::Times, FontWeight::Regular) => "Times-Roman",
            (FontFamily::Times, FontWeight::Bold) => "Times-Bold",
        }
    }

    pub fn metrics(self, weight: FontWeight) -> &'static FontMetricTable {
        match (self, weight) {
            (FontFamily::Helvetica, FontWeight::Regular) => &HELVETICA,
            (FontFamily::Helvetica, FontWeight::Bold) => &HELVETICA_BOLD,
            (FontFamily::Times, FontWeight::Regular) => &TIMES_ROMAN,
            (FontFamily::Times, FontWeight::Bold) => &TIMES_BOLD,
        }
    }
}

/// Static character-width table for one font.
pub struct FontMetricTable {
    widths: [u16; 95],
    /// Width of the bullet glyph (WinAnsi 0x95).
    bullet_width: u16,
    /// Fallback for other non-ASCII characters.
    average_char_width: u16,
}

impl FontMetricTable {
    /// Width of one character in thousandths of an em.
    pub fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else if c == '•' {
            self.bullet_width
        } else {
            self.average_char_width
        }
    }

    /// Rendered width of `s` in points at `size_pt`.
    pub fn measure_str(&self, s: &str, size_pt: f32) -> f32 {
        let units: u32 = s.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * size_pt / 1000.0
    }

    /// Greedy word wrap to `max_width_pt`. A single word wider than the line
    /// is broken by characters.
    pub fn wrap(&self, text: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        let space = self.measure_str(" ", size_pt);
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            let word_width = self.measure_str(word, size_pt);

            if word_width > max_width_pt {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut pieces = self.break_word(word, size_pt, max_width_pt);
                let last = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
                current_width = self.measure_str(&last, size_pt);
                current = last;
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width > max_width_pt {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                current_width = word_width;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn break_word(&self, word: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut piece = String::new();
        let mut width = 0.0_f32;
        for c in word.chars() {
            let w = f32::from(self.char_width(c)) * size_pt / 1000.0;
            if !piece.is_empty() && width + w > max_width_pt {
                pieces.push(std::mem::take(&mut piece));
                width = 0.0;
            }
            piece.push(c);
            width += w;
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }
}

pub static HELVETICA: FontMetricTable = FontMetricTable {
    widths: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // sp–/
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0–9
        278, 278, 584, 584, 584, 556, 1015, // :–@
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A–M
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N–Z
        278, 278, 278, 469, 556, 333, // [–`
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a–m
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n–z
        334, 260, 334, 584, // {–~
    ],
    bullet_width: 350,
    average_char_width: 556,
};

pub static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // sp–/
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0–9
        333, 333, 584, 584, 584, 611, 975, // :–@
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A–M
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N–Z
        333, 278, 333, 584, 556, 333, // [–`
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a–m
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n–z
        389, 280, 389, 584, // {–~
    ],
    bullet_width: 350,
    average_char_width: 611,
};

pub static TIMES_ROMAN: FontMetricTable = FontMetricTable {
    widths: [
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // sp–/
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // 0–9
        278, 278, 564, 564, 564, 444, 921, // :–@
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, // A–M
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, // N–Z
        333, 278, 333, 469, 500, 333, // [–`
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, // a–m
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, // n–z
        480, 200, 480, 541, // {–~
    ],
    bullet_width: 350,
    average_char_width: 500,
};

pub static TIMES_BOLD: FontMetricTable = FontMetricTable {
    widths: [
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278, // sp–/
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // 0–9
        333, 333, 570, 570, 570, 500, 930, // :–@
        722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, // A–M
        722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, // N–Z
        333, 278, 333, 581, 500, 333, // [–`
        500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, // a–m
        556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, // n–z
        394, 220, 394, 520, // {–~
    ],
    bullet_width: 350,
    average_char_width: 556,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookups() {
        assert_eq!(HELVETICA.char_width(' '), 278);
        assert_eq!(HELVETICA.char_width('W'), 944);
        assert_eq!(HELVETICA.char_width('i'), 222);
        assert_eq!(HELVETICA.char_width('~'), 584);
        assert_eq!(TIMES_BOLD.char_width('%'), 1000);
        assert_eq!(TIMES_ROMAN.char_width('•'), 350);
        assert_eq!(HELVETICA.char_width('é'), 556);
    }

    #[test]
    fn test_measure_scales_with_size() {
        // "ab" in Helvetica = 556 + 556 units.
        assert!((HELVETICA.measure_str("ab", 10.0) - 11.12).abs() < 1e-3);
        assert!((HELVETICA.measure_str("ab", 20.0) - 22.24).abs() < 1e-3);
    }

    #[test]
    fn test_bold_is_never_narrower_for_lowercase() {
        for c in 'a'..='z' {
            assert!(HELVETICA_BOLD.char_width(c) >= HELVETICA.char_width(c), "{c}");
        }
    }

    #[test]
    fn test_wrap_respects_width() {
        let text =
            "Designed and shipped a billing platform processing millions of invoices every month";
        let lines = HELVETICA.wrap(text, 10.0, 150.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(HELVETICA.measure_str(line, 10.0) <= 150.0 + 1e-3, "{line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_breaks_overlong_word() {
        let word = "x".repeat(100);
        let lines = HELVETICA.wrap(&word, 10.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(HELVETICA.measure_str(line, 10.0) <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn test_wrap_empty_text() {
        assert!(TIMES_ROMAN.wrap("   ", 11.0, 200.0).is_empty());
    }
}
