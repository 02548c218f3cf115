//! Positioned-text extraction from lopdf pages. The detection pipeline only
//! needs `{text, x, y}` fragments per page; glyph-level horizontal advance is
//! not modeled, which the row-binning step tolerates.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use crate::ingest::pdf::TextFragment;

pub fn page_fragments(document: &Document, page_id: ObjectId) -> Vec<TextFragment> {
    let Ok(content_bytes) = document.get_page_content(page_id) else {
        return Vec::new();
    };
    let Ok(content) = Content::decode(&content_bytes) else {
        return Vec::new();
    };
    let fonts = document.get_page_fonts(page_id);

    let mut fragments = Vec::new();
    let mut encoding: Option<&str> = None;
    let mut cursor = (0.0f64, 0.0f64);
    let mut line_start = (0.0f64, 0.0f64);
    let mut leading = 0.0f64;

    for operation in &content.operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" => {
                cursor = (0.0, 0.0);
                line_start = (0.0, 0.0);
                leading = 0.0;
            }
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    encoding = fonts
                        .get(name.as_slice())
                        .map(|font| font.get_font_encoding());
                }
            }
            "Tm" => {
                if operands.len() >= 6 {
                    if let (Some(x), Some(y)) = (number(&operands[4]), number(&operands[5])) {
                        cursor = (x, y);
                        line_start = cursor;
                    }
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    if let (Some(tx), Some(ty)) = (number(&operands[0]), number(&operands[1])) {
                        line_start = (line_start.0 + tx, line_start.1 + ty);
                        cursor = line_start;
                        if operation.operator == "TD" {
                            leading = -ty;
                        }
                    }
                }
            }
            "TL" => {
                if let Some(value) = operands.first().and_then(number) {
                    leading = value;
                }
            }
            "T*" => {
                line_start = (line_start.0, line_start.1 - leading);
                cursor = line_start;
            }
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    emit(&mut fragments, encoding, bytes, cursor);
                }
            }
            "'" => {
                line_start = (line_start.0, line_start.1 - leading);
                cursor = line_start;
                if let Some(Object::String(bytes, _)) = operands.first() {
                    emit(&mut fragments, encoding, bytes, cursor);
                }
            }
            "\"" => {
                line_start = (line_start.0, line_start.1 - leading);
                cursor = line_start;
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    emit(&mut fragments, encoding, bytes, cursor);
                }
            }
            "TJ" => {
                if let Some(Object::Array(elements)) = operands.first() {
                    let mut text = String::new();
                    for element in elements {
                        if let Object::String(bytes, _) = element {
                            text.push_str(&Document::decode_text(encoding, bytes));
                        }
                    }
                    push_fragment(&mut fragments, text, cursor);
                }
            }
            _ => {}
        }
    }

    fragments
}

fn emit(fragments: &mut Vec<TextFragment>, encoding: Option<&str>, bytes: &[u8], cursor: (f64, f64)) {
    let text = Document::decode_text(encoding, bytes);
    push_fragment(fragments, text, cursor);
}

fn push_fragment(fragments: &mut Vec<TextFragment>, text: String, cursor: (f64, f64)) {
    if text.trim().is_empty() {
        return;
    }
    fragments.push(TextFragment {
        text,
        x: cursor.0,
        y: cursor.1,
    });
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}
