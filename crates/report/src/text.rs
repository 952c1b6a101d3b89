//! Text measurement and encoding for the standard Helvetica fonts.
//!
//! Reports only use the two base-14 fonts `Helvetica` and `Helvetica-Bold`
//! with `WinAnsiEncoding`, so no font program is embedded. Portuguese text
//! fits entirely in the Latin-1 half of WinAnsi.

/// Millimetres per PostScript point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Points per millimetre.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Resource name inside the sheet's font dictionary.
    pub fn resource_name(&self) -> &'static [u8] {
        match self {
            Self::Regular => b"F1",
            Self::Bold => b"F2",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }
}

/// Helvetica advance widths (1/1000 em) for WinAnsi codes 32..=126.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Bold glyphs are slightly wider; measuring them with the regular table
/// scaled by this factor keeps wrapped lines inside the margin.
const BOLD_WIDTH_FACTOR: f64 = 1.06;

fn advance(code: u8) -> u16 {
    match code {
        32..=126 => HELVETICA_ASCII[(code - 32) as usize],
        // Accented capitals follow their base letter.
        0xC0..=0xC5 => 667,
        0xC6 => 1000,
        0xC7 => 722,
        0xC8..=0xCB => 667,
        0xCC..=0xCF => 278,
        0xD1 => 722,
        0xD2..=0xD6 | 0xD8 => 778,
        0xD9..=0xDC => 722,
        // Accented lowercase.
        0xE0..=0xE5 => 556,
        0xE7 => 500,
        0xE8..=0xEB => 556,
        0xEC..=0xEF => 278,
        0xF1..=0xF6 | 0xF8..=0xFC => 556,
        0xBA | 0xAA => 365,
        0x95 => 350,
        0x96 => 556,
        0x97 => 1000,
        _ => 556,
    }
}

/// Encode `text` as WinAnsi bytes. Characters outside the code page become `?`.
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{0020}'..='\u{007E}' => ch as u8,
            '\u{00A0}'..='\u{00FF}' => ch as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' | '\n' | '\r' => b' ',
            _ => b'?',
        })
        .collect()
}

/// Width of `text` set in `font` at `size_pt`, in millimetres.
pub fn text_width_mm(text: &str, font: Font, size_pt: f64) -> f64 {
    let units: u32 = encode_winansi(text)
        .into_iter()
        .map(|b| u32::from(advance(b)))
        .sum();
    let factor = match font {
        Font::Regular => 1.0,
        Font::Bold => BOLD_WIDTH_FACTOR,
    };
    f64::from(units) / 1000.0 * size_pt * MM_PER_PT * factor
}

/// Greedy word wrap of `text` into lines no wider than `max_width_mm`.
///
/// Explicit line breaks are kept. A single word wider than the line is split
/// between characters. Blank input yields no lines.
pub fn wrap(text: &str, font: Font, size_pt: f64, max_width_mm: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width_mm(&candidate, font, size_pt) <= max_width_mm {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width_mm(word, font, size_pt) <= max_width_mm {
                current = word.to_string();
                continue;
            }
            for ch in word.chars() {
                current.push(ch);
                if text_width_mm(&current, font, size_pt) > max_width_mm && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}
