//! Assemble a paginated A4 PDF from a [`Sheet`].
//!
//! The whole sheet is written once as a Form XObject. Every page draws that
//! form shifted by the offset computed by [`paginate`], and the page's
//! MediaBox crops it to one A4 window. Text stays vector text.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use vistoria_core::report::{paginate, PageSlice, A4_HEIGHT_MM};

use crate::error::ExportError;
use crate::sheet::{Mark, Rgb, Sheet};
use crate::text::{encode_winansi, Font, PT_PER_MM};

const SHEET_RESOURCE: &str = "Sheet";

fn pt(mm: f64) -> Object {
    Object::Real((mm * PT_PER_MM) as f32)
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

fn color_operands(color: Rgb) -> Vec<Object> {
    vec![real(color.0), real(color.1), real(color.2)]
}

/// Drawing operations of the sheet in form space (points, origin bottom-left).
fn sheet_operations(sheet: &Sheet, height_mm: f64) -> Vec<Operation> {
    let flip = |y: f64| height_mm - y;
    let mut ops = Vec::new();

    for mark in sheet.marks() {
        match mark {
            Mark::Text {
                x,
                y,
                size,
                font,
                color,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("rg", color_operands(*color)));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(font.resource_name().to_vec()), real(*size)],
                ));
                ops.push(Operation::new("Td", vec![pt(*x), pt(flip(*y))]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_winansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            Mark::Rule {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("RG", color_operands(*color)));
                ops.push(Operation::new("w", vec![pt(*width)]));
                ops.push(Operation::new("m", vec![pt(*x1), pt(flip(*y1))]));
                ops.push(Operation::new("l", vec![pt(*x2), pt(flip(*y2))]));
                ops.push(Operation::new("S", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            Mark::Rect { x, y, w, h, fill } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("rg", color_operands(*fill)));
                ops.push(Operation::new(
                    "re",
                    vec![pt(*x), pt(flip(*y + *h)), pt(*w), pt(*h)],
                ));
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }
    ops
}

/// Vertical translation placing the sheet on `slice`'s page, in points.
///
/// `slice.offset` is the position of the sheet's top edge measured down from
/// the page's top edge, so the sheet's bottom edge sits at
/// `page_height - offset - sheet_height` in PDF space.
fn page_translation(slice: &PageSlice, sheet_height_mm: f64) -> f64 {
    (A4_HEIGHT_MM - slice.offset - sheet_height_mm) * PT_PER_MM
}

/// Render `sheet` into PDF bytes titled `title`.
///
/// Fails with [`ExportError::RegionMissing`] when the sheet is empty. Any
/// failure yields no bytes at all.
pub fn render_sheet(sheet: &Sheet, title: &str) -> Result<Vec<u8>, ExportError> {
    if sheet.is_empty() {
        return Err(ExportError::RegionMissing(format!(
            "nothing was laid out for '{title}'"
        )));
    }

    let height_mm = sheet.height();
    let slices = paginate(height_mm, A4_HEIGHT_MM)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for font in [Font::Regular, Font::Bold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name().to_vec(), Object::Reference(font_id));
    }

    let form_content = Content {
        operations: sheet_operations(sheet, height_mm),
    }
    .encode()?;
    let form_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => 1,
            "BBox" => vec![0.into(), 0.into(), pt(sheet.width()), pt(height_mm)],
            "Resources" => dictionary! { "Font" => fonts },
        },
        form_content,
    ));

    let mut kids: Vec<Object> = Vec::with_capacity(slices.len());
    for slice in &slices {
        let page_content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        1.into(),
                        0.into(),
                        0.into(),
                        1.into(),
                        0.into(),
                        real(page_translation(slice, height_mm)),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(SHEET_RESOURCE.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        }
        .encode()?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { SHEET_RESOURCE => form_id },
            },
            "MediaBox" => vec![0.into(), 0.into(), pt(sheet.width()), pt(A4_HEIGHT_MM)],
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => slices.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_winansi(title), StringFormat::Literal),
        "Producer" => Object::string_literal("vistoria-report"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    tracing::debug!(
        title,
        pages = slices.len(),
        sheet_height_mm = height_mm,
        bytes = bytes.len(),
        "PDF rendered"
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sheet_with_paragraphs(n: usize) -> Sheet {
        let mut sheet = Sheet::new();
        sheet.title("Relatório de Vistoria");
        for i in 0..n {
            sheet.paragraph(&format!("Linha {i} do relatório."));
        }
        sheet
    }

    #[test]
    fn empty_sheet_is_region_missing() {
        let result = render_sheet(&Sheet::new(), "vazio");
        assert_matches!(result, Err(ExportError::RegionMissing(_)));
    }

    #[test]
    fn short_sheet_renders_one_a4_page() {
        let bytes = render_sheet(&sheet_with_paragraphs(3), "curto").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page = doc.get_object(pages[&1]).and_then(Object::as_dict).unwrap();
        let media_box = page.get(b"MediaBox").and_then(Object::as_array).unwrap();
        let height = media_box[3].as_float().unwrap();
        assert!((f64::from(height) - A4_HEIGHT_MM * PT_PER_MM).abs() < 0.01);
    }

    #[test]
    fn tall_sheet_spans_paginated_page_count() {
        let sheet = sheet_with_paragraphs(120);
        let expected = paginate(sheet.height(), A4_HEIGHT_MM).unwrap().len();
        assert!(expected > 1);

        let bytes = render_sheet(&sheet, "longo").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), expected);
    }

    #[test]
    fn every_page_draws_the_same_form() {
        let bytes = render_sheet(&sheet_with_paragraphs(120), "longo").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        for (_, page_id) in doc.get_pages() {
            let content = doc.get_page_content(page_id).unwrap();
            let text = String::from_utf8_lossy(&content);
            assert!(text.contains("/Sheet Do"), "{text}");
        }
    }

    #[test]
    fn translation_moves_sheet_up_one_page_per_slice() {
        let height = 700.0;
        let first = page_translation(&PageSlice { index: 0, offset: 0.0 }, height);
        let second = page_translation(
            &PageSlice {
                index: 1,
                offset: -A4_HEIGHT_MM,
            },
            height,
        );
        assert!((second - first - A4_HEIGHT_MM * PT_PER_MM).abs() < 1e-6);
        // First page shows the top of the sheet: its top edge is at the page top.
        assert!((first + height * PT_PER_MM - A4_HEIGHT_MM * PT_PER_MM).abs() < 1e-6);
    }
}
