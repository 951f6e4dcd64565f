//! One-page PDF renderer for plain summaries.
//!
//! US Letter, one-inch margins, Times-Roman 12 pt with 14.4 pt leading.
//! Lines are wrapped greedily on spaces using the Times-Roman glyph widths.
//! A word wider than the usable width on its own is split across lines.
//!
//! Everything is drawn on a single page. Text that needs more than
//! [`LINES_PER_PAGE`] lines keeps going below the bottom margin and off the
//! page; callers that care can check [`layout_lines`] first.

use crate::error::SummarizeError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

pub const PAGE_WIDTH: f64 = 612.0;
pub const PAGE_HEIGHT: f64 = 792.0;
pub const MARGIN: f64 = 72.0;
pub const FONT_SIZE: f64 = 12.0;
pub const LEADING: f64 = 14.4;

/// Width available to a line of text.
pub const USABLE_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

/// Baselines that fit between the top and bottom margins.
pub const LINES_PER_PAGE: usize = 46;

const FONT_NAME: &str = "Times-Roman";

/// Times-Roman advance widths (1/1000 em) for printable ASCII, 0x20..=0x7E.
const ASCII_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // 0x20
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444, // 0x30
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, // 0x40
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500, // 0x50
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, // 0x60
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541, // 0x70
];

/// Times-Roman advance widths for the WinAnsi upper half, 0x80..=0xFF.
/// The five unassigned codes are never emitted by [`encode_win_ansi`].
const HIGH_WIDTHS: [u16; 128] = [
    500, 350, 333, 500, 444, 1000, 500, 500, 333, 1000, 556, 333, 889, 350, 611, 350, // 0x80
    350, 333, 333, 444, 444, 350, 500, 1000, 333, 980, 389, 333, 722, 350, 444, 722, // 0x90
    250, 333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333, // 0xA0
    400, 564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444, // 0xB0
    722, 722, 722, 722, 722, 722, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333, // 0xC0
    722, 722, 722, 722, 722, 722, 722, 564, 722, 722, 722, 722, 722, 722, 556, 500, // 0xD0
    444, 444, 444, 444, 444, 444, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278, // 0xE0
    500, 500, 500, 500, 500, 500, 500, 564, 500, 500, 500, 500, 500, 500, 500, 500, // 0xF0
];

/// Advance width of an encoded WinAnsi byte in 1/1000 em.
fn byte_width(b: u8) -> u16 {
    match b {
        0x20..=0x7E => ASCII_WIDTHS[(b - 0x20) as usize],
        0x80..=0xFF => HIGH_WIDTHS[(b - 0x80) as usize],
        _ => 0,
    }
}

/// Advance width of `c` as drawn, so unmappable characters measure as `?`.
fn glyph_width(c: char) -> u16 {
    byte_width(encode_char(c))
}

/// Rendered width of `text` in points at the body font size.
pub fn text_width(text: &str) -> f64 {
    let units: u32 = text.chars().map(|c| glyph_width(c) as u32).sum();
    units as f64 * FONT_SIZE / 1000.0
}

/// Wrap `text` into output lines. Blank input lines stay blank.
pub fn layout_lines(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            out.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in line.split(' ') {
            let candidate = format!("{} {}", current, word);
            let candidate = candidate.trim();
            if text_width(candidate) <= USABLE_WIDTH {
                current = candidate.to_string();
                continue;
            }
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            current = break_long_word(word.trim(), &mut out);
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

/// Push full-width pieces of `word` onto `out` and return the remainder.
fn break_long_word(word: &str, out: &mut Vec<String>) -> String {
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if text_width(&piece) > USABLE_WIDTH && piece.chars().count() > 1 {
            piece.pop();
            out.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    piece
}

/// Encode `text` for a WinAnsiEncoding font. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

fn encode_char(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\t' => b' ',
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => b'?',
    }
}

/// Render plain text as a one-page PDF.
pub fn render_pdf(text: &str) -> Result<Vec<u8>, SummarizeError> {
    let lines = layout_lines(text);
    if lines.len() > LINES_PER_PAGE {
        debug!(
            "Summary needs {} lines; only {} fit on the page",
            lines.len(),
            LINES_PER_PAGE
        );
    }

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => FONT_NAME,
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), real(FONT_SIZE)]),
        Operation::new("TL", vec![real(LEADING)]),
        Operation::new("Td", vec![real(MARGIN), real(PAGE_HEIGHT - MARGIN)]),
    ];
    for line in &lines {
        if !line.is_empty() {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_win_ansi(line))],
            ));
        }
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| SummarizeError::RenderFailed(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| SummarizeError::RenderFailed(e.to_string()))?;
    debug!("Rendered {} lines into {} PDF bytes", lines.len(), bytes.len());
    Ok(bytes)
}

fn real(value: f64) -> Object {
    Object::Real((value as f32).into())
}
