//! Plain-text extraction from uploaded résumé files.
//!
//! - PDF: `pdf_extract` over the in-memory bytes.
//! - DOCX: `word/document.xml` read out of the zip container; one line per
//!   `<w:p>`, `<w:tab/>` as a tab, `<w:br/>` as a line break.
//! - TXT: UTF-8 as-is.
//!
//! Every result is trimmed. Callers run this on the blocking pool.

use std::io::{Cursor, Read};

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::validation::FileKind;
use super::IngestError;

pub fn extract_text(bytes: &[u8], kind: FileKind) -> Result<String, IngestError> {
    let text = match kind {
        FileKind::Pdf => extract_pdf_text(bytes)?,
        FileKind::Docx => extract_docx_text(bytes)?,
        FileKind::PlainText => {
            std::str::from_utf8(bytes).map_err(|_| IngestError::InvalidText)?.to_string()
        }
    };
    Ok(text.trim().to_string())
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, IngestError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        let message = e.to_string();
        let lower = message.to_lowercase();
        if lower.contains("encrypt") || lower.contains("password") {
            IngestError::EncryptedPdf
        } else {
            IngestError::InvalidPdf(message)
        }
    })?;

    if text.trim().is_empty() {
        return Err(IngestError::EmptyPdf);
    }
    Ok(text)
}

fn extract_docx_text(bytes: &[u8]) -> Result<String, IngestError> {
    let docx_err = |e: &dyn std::fmt::Display| IngestError::Docx(e.to_string());

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| docx_err(&e))?;
    let mut document_file = archive
        .by_name("word/document.xml")
        .map_err(|e| docx_err(&e))?;
    let mut xml = String::new();
    document_file
        .read_to_string(&mut xml)
        .map_err(|e| docx_err(&e))?;

    document_xml_text(&xml)
}

/// Walks WordprocessingML and collects run text, one line per paragraph.
fn document_xml_text(xml: &str) -> Result<String, IngestError> {
    let mut reader = Reader::from_str(xml);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                // <w:p/> is an empty paragraph: keep it as a blank line.
                b"w:p" => lines.push(String::new()),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => lines.push(std::mem::take(&mut current)),
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let value = e.xml_content().map_err(|e| IngestError::Docx(e.to_string()))?;
                current.push_str(&value);
            }
            Ok(Event::GeneralRef(e)) if in_text => {
                if let Some(ch) = e
                    .resolve_char_ref()
                    .map_err(|e| IngestError::Docx(e.to_string()))?
                {
                    current.push(ch);
                } else {
                    let name = e.decode().map_err(|e| IngestError::Docx(e.to_string()))?;
                    if let Some(value) = resolve_predefined_entity(&name) {
                        current.push_str(value);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(IngestError::Docx(err.to_string())),
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn docx(body: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document(body).as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        let text = extract_text(b"  Jane Doe\nEngineer\n\n", FileKind::PlainText).unwrap();
        assert_eq!(text, "Jane Doe\nEngineer");
    }

    #[test]
    fn test_invalid_utf8_text() {
        let err = extract_text(&[0xff, 0xfe, 0x00], FileKind::PlainText).unwrap_err();
        assert!(matches!(err, IngestError::InvalidText));
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let bytes = docx(
            "<w:p><w:r><w:t>JANE DOE</w:t></w:r></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">Rust </w:t></w:r><w:r><w:t>engineer</w:t></w:r></w:p>",
        );
        assert_eq!(extract_text(&bytes, FileKind::Docx).unwrap(), "JANE DOE\nRust engineer");
    }

    #[test]
    fn test_docx_tabs_breaks_and_entities() {
        let bytes = docx(
            "<w:p><w:r><w:t>R&amp;D</w:t><w:tab/><w:t>2021</w:t><w:br/><w:t>Q&amp;A</w:t></w:r></w:p>",
        );
        assert_eq!(extract_text(&bytes, FileKind::Docx).unwrap(), "R&D\t2021\nQ&A");
    }

    #[test]
    fn test_docx_empty_paragraph_is_blank_line() {
        let bytes = docx(
            "<w:p><w:r><w:t>SUMMARY</w:t></w:r></w:p><w:p/>\
             <w:p><w:r><w:t>EXPERIENCE</w:t></w:r></w:p>",
        );
        assert_eq!(
            extract_text(&bytes, FileKind::Docx).unwrap(),
            "SUMMARY\n\nEXPERIENCE"
        );
    }

    #[test]
    fn test_docx_ignores_non_text_elements() {
        let bytes = docx(
            "<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Skills</w:t></w:r></w:p>",
        );
        assert_eq!(extract_text(&bytes, FileKind::Docx).unwrap(), "Skills");
    }

    #[test]
    fn test_not_a_zip_is_docx_error() {
        let err = extract_text(b"plain bytes", FileKind::Docx).unwrap_err();
        assert!(matches!(err, IngestError::Docx(_)));
    }

    #[test]
    fn test_zip_without_document_is_docx_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("readme.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_text(&bytes, FileKind::Docx).unwrap_err();
        assert!(matches!(err, IngestError::Docx(_)));
    }

    #[test]
    fn test_garbage_pdf_is_rejected() {
        let err = extract_text(b"%PDF-1.4 definitely not a pdf", FileKind::Pdf).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidPdf(_) | IngestError::EmptyPdf | IngestError::EncryptedPdf
        ));
    }
}
