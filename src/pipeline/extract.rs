//! Attachment text extraction.
//!
//! Only raw text is recovered; layout and structure are discarded.

use tracing::{debug, info_span, warn};

use crate::error::ExtractError;
use crate::pipeline::types::Attachment;

pub const PDF_MIME: &str = "application/pdf";
pub const TEXT_MIME: &str = "text/plain";

/// Supported attachment formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Pdf,
    PlainText,
}

impl AttachmentKind {
    /// Resolve the format from the declared MIME type, or from the filename
    /// extension when no type was declared.
    pub fn detect(attachment: &Attachment) -> Result<Self, ExtractError> {
        match attachment.content_type.as_deref().map(essence) {
            Some(mime) if !mime.is_empty() => match mime.as_str() {
                PDF_MIME => Ok(Self::Pdf),
                TEXT_MIME => Ok(Self::PlainText),
                _ => Err(ExtractError::UnsupportedType {
                    content_type: mime.clone(),
                }),
            },
            _ => {
                let name = attachment.filename.as_deref().unwrap_or("").to_lowercase();
                if name.ends_with(".pdf") {
                    Ok(Self::Pdf)
                } else if name.ends_with(".txt") {
                    Ok(Self::PlainText)
                } else {
                    Err(ExtractError::UnsupportedType {
                        content_type: "unknown".to_string(),
                    })
                }
            }
        }
    }
}

/// Lowercased MIME type without parameters (`text/plain; charset=utf-8` → `text/plain`).
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Extract the text of an uploaded attachment.
pub fn extract_attachment(attachment: &Attachment) -> Result<String, ExtractError> {
    match AttachmentKind::detect(attachment)? {
        AttachmentKind::Pdf => extract_pdf_text(&attachment.bytes),
        AttachmentKind::PlainText => extract_plain_text(&attachment.bytes),
    }
}

/// Text of every page, in page order, skipping pages that yield nothing.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let _span = info_span!("extract.pdf", size = bytes.len()).entered();

    if bytes.is_empty() {
        return Ok(String::new());
    }

    let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::UnreadablePdf {
        reason: e.to_string(),
    })?;

    let mut pages = Vec::new();
    for (page_num, _) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(text) if !text.trim().is_empty() => pages.push(text.trim_end().to_string()),
            Ok(_) => debug!(page = page_num, "PDF page has no text"),
            Err(e) => warn!(page = page_num, error = %e, "Failed to extract PDF page text"),
        }
    }

    debug!(pages = pages.len(), "Extracted PDF text");
    Ok(pages.join("\n"))
}

/// Decode a plain-text attachment.
pub fn extract_plain_text(bytes: &[u8]) -> Result<String, ExtractError> {
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Run extraction on the blocking pool; lopdf parsing is CPU-bound.
pub async fn extract_attachment_blocking(attachment: Attachment) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_attachment(&attachment))
        .await
        .map_err(|e| ExtractError::Worker(e.to_string()))?
}

#[cfg(test)]
pub(crate) mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    use super::*;

    /// Build a PDF with one page per entry; `None` pages carry no text.
    pub(crate) fn make_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let mut operations = Vec::new();
            if let Some(text) = text {
                operations = vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ];
            }
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn attachment(content_type: Option<&str>, filename: Option<&str>, bytes: &[u8]) -> Attachment {
        Attachment {
            filename: filename.map(String::from),
            content_type: content_type.map(String::from),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn empty_pdf_bytes_yield_empty_text() {
        assert_eq!(extract_pdf_text(&[]).unwrap(), "");
    }

    #[test]
    fn garbage_under_pdf_type_is_unreadable() {
        let err = extract_pdf_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::UnreadablePdf { .. }));
    }

    #[test]
    fn pdf_pages_are_concatenated_in_order() {
        let pdf = make_pdf(&[Some("First page"), None, Some("Third page")]);
        let text = extract_pdf_text(&pdf).unwrap();
        let first = text.find("First page").expect("first page text");
        let third = text.find("Third page").expect("third page text");
        assert!(first < third);
    }

    #[test]
    fn textless_pdf_yields_blank_text() {
        let pdf = make_pdf(&[None, None]);
        assert!(extract_pdf_text(&pdf).unwrap().trim().is_empty());
    }

    #[test]
    fn plain_text_is_decoded() {
        assert_eq!(extract_plain_text("Olá, tudo bem?".as_bytes()).unwrap(), "Olá, tudo bem?");
        assert!(matches!(
            extract_plain_text(&[0xff, 0xfe, 0xfd]),
            Err(ExtractError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn detect_uses_mime_essence() {
        let a = attachment(Some("Text/Plain; charset=utf-8"), None, b"hi");
        assert_eq!(AttachmentKind::detect(&a).unwrap(), AttachmentKind::PlainText);
        let a = attachment(Some("application/pdf"), Some("x.txt"), b"");
        assert_eq!(AttachmentKind::detect(&a).unwrap(), AttachmentKind::Pdf);
    }

    #[test]
    fn detect_rejects_other_types_regardless_of_name() {
        let a = attachment(Some("image/png"), Some("scan.pdf"), b"\x89PNG");
        assert!(matches!(
            AttachmentKind::detect(&a),
            Err(ExtractError::UnsupportedType { ref content_type }) if content_type == "image/png"
        ));
    }

    #[test]
    fn detect_falls_back_to_extension() {
        let a = attachment(None, Some("EMAIL.TXT"), b"hi");
        assert_eq!(AttachmentKind::detect(&a).unwrap(), AttachmentKind::PlainText);
        let a = attachment(None, Some("notes.docx"), b"hi");
        assert!(AttachmentKind::detect(&a).is_err());
    }

    #[tokio::test]
    async fn blocking_extraction_round_trips_text_file() {
        let a = attachment(Some("text/plain"), Some("email.txt"), b"Pedido #1234");
        assert_eq!(extract_attachment_blocking(a).await.unwrap(), "Pedido #1234");
    }
}
