use pdf_writer::{Name, Pdf, Ref};

/// Courier advance width in 1000-units; every glyph is the same.
pub(crate) const COURIER_ADVANCE_1000: f32 = 600.0;

pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
}

/// Register the standard-14 Courier face used for the text layer. It needs no
/// embedding, and its fixed advance keeps box-width fitting a single division.
pub(crate) fn register_text_layer_font(pdf: &mut Pdf, font_ref: Ref) -> FontEntry {
    pdf.type1_font(font_ref)
        .base_font(Name(b"Courier"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    FontEntry {
        pdf_name: "F1".to_string(),
        font_ref,
    }
}

fn char_to_winansi(c: char) -> Option<u8> {
    match c as u32 {
        0x0020..=0x007E => Some(c as u8),
        0x00A0..=0x00FF => Some(c as u8), // Latin-1 supplement maps directly
        0x20AC => Some(0x80),
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85),
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // bullet
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Returns the bytes and how many characters had no WinAnsi code and were dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> (Vec<u8>, usize) {
    let mut dropped = 0;
    let bytes = s
        .chars()
        .filter_map(|c| {
            let b = char_to_winansi(c);
            if b.is_none() {
                dropped += 1;
            }
            b
        })
        .collect();
    (bytes, dropped)
}

/// Number of characters of `s` that survive WinAnsi encoding.
pub(crate) fn winansi_glyph_count(s: &str) -> usize {
    s.chars().filter(|&c| char_to_winansi(c).is_some()).count()
}
