//! Font metrics for accurate text measurement.
//!
//! Width tables for the standard PDF fonts the invoice templates draw with.
//! Widths are in 1/1000 of the font's em square (standard PDF units), taken
//! from the Adobe Font Metrics files of the base-14 fonts.

use std::collections::HashMap;
use std::sync::OnceLock;

/// A built-in font face. Every face is one of the PDF base-14 fonts, so
/// nothing has to be embedded beyond a font reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
    TimesItalic,
}

impl FontFace {
    pub const ALL: [FontFace; 5] = [
        FontFace::Helvetica,
        FontFace::HelveticaBold,
        FontFace::TimesRoman,
        FontFace::TimesBold,
        FontFace::TimesItalic,
    ];

    /// Width metrics for this face (cached for the life of the process).
    pub fn metrics(self) -> &'static FontMetrics {
        match self {
            FontFace::Helvetica => HELVETICA.get_or_init(|| {
                FontMetrics::from_table(&HELVETICA_ASCII, HELVETICA_EXTRAS, 556, 718, -207)
            }),
            FontFace::HelveticaBold => HELVETICA_BOLD.get_or_init(|| {
                FontMetrics::from_table(&HELVETICA_BOLD_ASCII, HELVETICA_BOLD_EXTRAS, 556, 718, -207)
            }),
            FontFace::TimesRoman => TIMES_ROMAN.get_or_init(|| {
                FontMetrics::from_table(&TIMES_ROMAN_ASCII, TIMES_EXTRAS, 500, 683, -217)
            }),
            FontFace::TimesBold => TIMES_BOLD.get_or_init(|| {
                FontMetrics::from_table(&TIMES_BOLD_ASCII, TIMES_BOLD_EXTRAS, 500, 676, -205)
            }),
            FontFace::TimesItalic => TIMES_ITALIC.get_or_init(|| {
                FontMetrics::from_table(&TIMES_ITALIC_ASCII, TIMES_ITALIC_EXTRAS, 500, 683, -205)
            }),
        }
    }
}

/// Font metrics for a specific font face
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Character widths in 1/1000 em units
    widths: HashMap<char, u16>,
    /// Width used for characters missing from the table
    default_width: u16,
    pub units_per_em: u16,
    pub ascender: i16,
    /// Descender depth in em units (negative)
    pub descender: i16,
}

impl FontMetrics {
    fn from_table(
        ascii: &[u16; ASCII_LEN],
        extras: &[(char, u16)],
        default_width: u16,
        ascender: i16,
        descender: i16,
    ) -> Self {
        let mut widths: HashMap<char, u16> = ascii
            .iter()
            .enumerate()
            .filter_map(|(i, w)| char::from_u32(ASCII_FIRST + i as u32).map(|c| (c, *w)))
            .collect();
        widths.extend(extras.iter().copied());

        FontMetrics {
            widths,
            default_width,
            units_per_em: 1000,
            ascender,
            descender,
        }
    }

    /// Get the width of a character in em units (1/1000)
    pub fn char_width(&self, c: char) -> u16 {
        *self.widths.get(&c).unwrap_or(&self.default_width)
    }

    /// Get the width of a string in points
    pub fn string_width(&self, text: &str, font_size: f32) -> f32 {
        let total_units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        (total_units as f32 / self.units_per_em as f32) * font_size
    }

    /// Get the width of a single character in points
    pub fn char_width_pt(&self, c: char, font_size: f32) -> f32 {
        (self.char_width(c) as f32 / self.units_per_em as f32) * font_size
    }
}

// ============================================================================
// WIDTH TABLES
// ============================================================================

// Printable ASCII, ' ' (0x20) through '~' (0x7E), sixteen glyphs per row.
const ASCII_FIRST: u32 = 0x20;
const ASCII_LEN: usize = 95;

static HELVETICA_ASCII: [u16; ASCII_LEN] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

static HELVETICA_BOLD_ASCII: [u16; ASCII_LEN] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

static TIMES_ROMAN_ASCII: [u16; ASCII_LEN] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

static TIMES_BOLD_ASCII: [u16; ASCII_LEN] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

static TIMES_ITALIC_ASCII: [u16; ASCII_LEN] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

// Latin-1 and typographic punctuation that shows up in names and addresses
static HELVETICA_EXTRAS: &[(char, u16)] = &[
    ('\u{2013}', 556),  // en-dash
    ('\u{2014}', 1000), // em-dash
    ('\u{2018}', 222),
    ('\u{2019}', 222),
    ('\u{201C}', 333),
    ('\u{201D}', 333),
    ('\u{2026}', 1000), // ellipsis
    ('€', 556),
    ('£', 556),
    ('¥', 556),
    ('©', 737),
    ('®', 737),
    ('°', 400),
    ('×', 584),
];

static HELVETICA_BOLD_EXTRAS: &[(char, u16)] = &[
    ('\u{2013}', 556),
    ('\u{2014}', 1000),
    ('\u{2018}', 278),
    ('\u{2019}', 278),
    ('\u{201C}', 500),
    ('\u{201D}', 500),
    ('\u{2026}', 1000),
    ('€', 556),
    ('£', 556),
    ('¥', 556),
    ('©', 737),
    ('®', 737),
    ('°', 400),
    ('×', 584),
];

static TIMES_EXTRAS: &[(char, u16)] = &[
    ('\u{2013}', 500),
    ('\u{2014}', 1000),
    ('\u{2018}', 333),
    ('\u{2019}', 333),
    ('\u{201C}', 444),
    ('\u{201D}', 444),
    ('\u{2026}', 1000),
    ('€', 500),
    ('£', 500),
    ('¥', 500),
    ('©', 760),
    ('®', 760),
    ('°', 400),
    ('×', 564),
];

static TIMES_BOLD_EXTRAS: &[(char, u16)] = &[
    ('\u{2013}', 500),
    ('\u{2014}', 1000),
    ('\u{2018}', 333),
    ('\u{2019}', 333),
    ('\u{201C}', 500),
    ('\u{201D}', 500),
    ('\u{2026}', 1000),
    ('€', 500),
    ('£', 500),
    ('¥', 500),
    ('©', 747),
    ('®', 747),
    ('°', 400),
    ('×', 570),
];

static TIMES_ITALIC_EXTRAS: &[(char, u16)] = &[
    ('\u{2013}', 500),
    ('\u{2014}', 889),
    ('\u{2018}', 333),
    ('\u{2019}', 333),
    ('\u{201C}', 556),
    ('\u{201D}', 556),
    ('\u{2026}', 889),
    ('€', 500),
    ('£', 500),
    ('¥', 500),
    ('©', 760),
    ('®', 760),
    ('°', 400),
    ('×', 675),
];

// ============================================================================
// GLOBAL METRICS CACHE
// ============================================================================

static HELVETICA: OnceLock<FontMetrics> = OnceLock::new();
static HELVETICA_BOLD: OnceLock<FontMetrics> = OnceLock::new();
static TIMES_ROMAN: OnceLock<FontMetrics> = OnceLock::new();
static TIMES_BOLD: OnceLock<FontMetrics> = OnceLock::new();
static TIMES_ITALIC: OnceLock<FontMetrics> = OnceLock::new();
