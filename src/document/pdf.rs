// 🖨️ PDF writer - laid-out pages → PDF bytes (lopdf)
//
// Standard Type1 Helvetica faces (WinAnsi), one shared resource dictionary,
// the overlay image embedded once and drawn first on every page.

use super::layout::{DrawOp, PageLayout, Rect};
use super::style::{Color, FontFace, PageGeometry};
use crate::error::{CommitteeError, CommitteeResult};
use crate::overlay::{Overlay, OverlayImage, OVERLAY_GSTATE, OVERLAY_XOBJECT};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

const PRODUCER: &str = concat!("committee-attendance ", env!("CARGO_PKG_VERSION"));

pub fn render_pdf(
    pages: &[PageLayout],
    geometry: &PageGeometry,
    overlay: Option<&Overlay>,
    title: &str,
) -> CommitteeResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for face in [FontFace::Regular, FontFace::Bold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }

    let mut xobjects = Dictionary::new();
    let mut gstates = Dictionary::new();
    if let Some(overlay) = overlay {
        let image_id = add_image(&mut doc, &overlay.image);
        xobjects.set(OVERLAY_XOBJECT, image_id);
        gstates.set(
            OVERLAY_GSTATE,
            dictionary! {
                "Type" => "ExtGState",
                "ca" => Object::Real(overlay.opacity),
                "CA" => Object::Real(overlay.opacity),
            },
        );
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
        "XObject" => xobjects,
        "ExtGState" => gstates,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page, geometry, overlay),
        };
        let encoded = content
            .encode()
            .map_err(|e| CommitteeError::render(format!("encode page content: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), Object::Real(geometry.width), Object::Real(geometry.height)],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| CommitteeError::render(format!("serialize pdf: {}", e)))?;
    Ok(bytes)
}

/// Content of one page: overlay first (if any), then the laid-out primitives
pub fn page_operations(page: &PageLayout, geometry: &PageGeometry, overlay: Option<&Overlay>) -> Vec<Operation> {
    let mut ops = Vec::new();

    if let Some(overlay) = overlay {
        ops.extend(overlay.page_operations(geometry));
    }

    for op in &page.ops {
        match op {
            DrawOp::FillRect { rect, color } => {
                ops.push(color_op("rg", *color));
                ops.push(rect_op(rect));
                ops.push(Operation::new("f", vec![]));
            }
            DrawOp::StrokeRect {
                rect,
                color,
                line_width,
            } => {
                ops.push(color_op("RG", *color));
                ops.push(Operation::new("w", vec![Object::Real(*line_width)]));
                ops.push(rect_op(rect));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Text {
                x,
                y,
                text,
                face,
                size,
                color,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("Tf", vec![name(face.resource_name()), Object::Real(*size)]));
                ops.push(color_op("rg", *color));
                ops.push(Operation::new("Td", vec![Object::Real(*x), Object::Real(*y)]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Hexadecimal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }

    ops
}

fn add_image(doc: &mut Document, image: &OverlayImage) -> ObjectId {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width as i64,
        "Height" => image.height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8i64,
    };

    if let Some(alpha) = &image.alpha {
        let smask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8i64,
            },
            alpha.clone(),
        ));
        dict.set("SMask", smask_id);
    }

    doc.add_object(Stream::new(dict, image.rgb.clone()))
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn color_op(operator: &str, color: Color) -> Operation {
    Operation::new(
        operator,
        vec![Object::Real(color.r), Object::Real(color.g), Object::Real(color.b)],
    )
}

fn rect_op(rect: &Rect) -> Operation {
    Operation::new(
        "re",
        vec![
            Object::Real(rect.x),
            Object::Real(rect.y),
            Object::Real(rect.width),
            Object::Real(rect.height),
        ],
    )
}

/// Latin-1 subset of WinAnsi; anything else becomes '?'
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ 0x20..=0x7e | code @ 0xa0..=0xff => code as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::layout::{Block, Paginator, TextBlock};
    use crate::document::style::TextStyle;

    fn overlay() -> Overlay {
        Overlay::new(
            OverlayImage {
                width: 2,
                height: 2,
                rgb: vec![200; 12],
                alpha: Some(vec![255; 4]),
            },
            0.1,
        )
    }

    fn long_pages() -> Vec<PageLayout> {
        let lines: Vec<String> = (0..100).map(|i| format!("Line {}", i)).collect();
        Paginator::layout(
            PageGeometry::letter(),
            &[Block::Text(TextBlock::with_breaks(lines, TextStyle::body()))],
        )
    }

    #[test]
    fn test_overlay_drawn_once_per_page_before_content() {
        let pages = long_pages();
        assert!(pages.len() > 1);

        for page in &pages {
            let ops = page_operations(page, &PageGeometry::letter(), Some(&overlay()));
            let draws = ops.iter().filter(|op| op.operator == "Do").count();
            assert_eq!(draws, 1);

            let first_text = ops.iter().position(|op| op.operator == "BT").unwrap();
            let image = ops.iter().position(|op| op.operator == "Do").unwrap();
            assert!(image < first_text);
        }
    }

    #[test]
    fn test_no_overlay_ops_without_overlay() {
        let pages = long_pages();
        let ops = page_operations(&pages[0], &PageGeometry::letter(), None);
        assert!(ops.iter().all(|op| op.operator != "Do" && op.operator != "gs"));
    }

    #[test]
    fn test_render_produces_loadable_pdf() {
        let pages = long_pages();
        let bytes = render_pdf(&pages, &PageGeometry::letter(), Some(&overlay()), "Test").unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), pages.len());
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Café (1)"), b"Caf\xe9 (1)".to_vec());
        assert_eq!(encode_win_ansi("✓ done"), b"? done".to_vec());
    }
}
