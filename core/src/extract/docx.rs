use std::io::{Cursor, Read};

use quick_xml::{events::Event, Reader};
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";
const HEADER_PREFIX: &str = "word/header";
const FOOTER_PREFIX: &str = "word/footer";

/// Extracts every text run of the document: header parts first, then the main
/// document part, then footer parts.
///
/// Paragraphs end with a newline, `w:tab` becomes a tab and `w:br`/`w:cr` a newline.
pub(super) fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Parse(format!("Not a DOCX archive: {e}")))?;

    let headers = part_names(&archive, HEADER_PREFIX);
    let footers = part_names(&archive, FOOTER_PREFIX);
    let body = read_part(&mut archive, DOCUMENT_PART)?;

    let mut text = String::new();
    for name in &headers {
        text.push_str(&text_from_document_xml(&read_part(&mut archive, name)?)?);
    }
    text.push_str(&text_from_document_xml(&body)?);
    for name in &footers {
        text.push_str(&text_from_document_xml(&read_part(&mut archive, name)?)?);
    }
    Ok(text)
}

// `word/header1.xml`, `word/header2.xml`, ... in name order
fn part_names(archive: &ZipArchive<Cursor<&[u8]>>, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with(prefix) && name.ends_with(".xml"))
        .map(String::from)
        .collect();
    names.sort();
    names
}

fn read_part(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<String, ExtractError> {
    let mut part = archive
        .by_name(name)
        .map_err(|e| ExtractError::Parse(format!("Missing {name}: {e}")))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractError::Parse(format!("Failed to read {name}: {e}")))?;
    Ok(xml)
}

fn text_from_document_xml(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(ExtractError::Parse(format!(
                    "Malformed document XML at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => (),
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                b"w:p" => text.push('\n'),
                _ => (),
            },
            // tab stops in paragraph properties share the name, only run content counts
            Ok(Event::Empty(e)) if in_run => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => (),
            },
            Ok(Event::Text(e)) if in_text => {
                let run = e
                    .unescape()
                    .map_err(|e| ExtractError::Parse(format!("Invalid text run: {e}")))?;
                text.push_str(&run);
            }
            _ => (),
        }
    }

    Ok(text)
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use std::io::Write;
    use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

    const WORDPROCESSING_NS: &str =
        "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    /// Builds a DOCX archive holding the given `(part name, xml)` entries.
    pub(in crate::extract) fn docx_archive(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, xml) in parts {
            writer.start_file(*name, options).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// Builds a minimal DOCX archive whose document part wraps `body`.
    pub(in crate::extract) fn docx_fixture(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{WORDPROCESSING_NS}">{body}</w:document>"#
        );
        docx_archive(&[(DOCUMENT_PART, xml.as_str())])
    }

    fn header_xml(root: &str, text: &str) -> String {
        format!(
            r#"<w:{root} xmlns:w="{WORDPROCESSING_NS}"><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:{root}>"#
        )
    }

    #[test]
    fn test_paragraphs_and_runs() {
        let bytes = docx_fixture(concat!(
            r#"<w:body>"#,
            r#"<w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t xml:space="preserve">Second &amp; last</w:t></w:r></w:p>"#,
            r#"</w:body>"#
        ));
        assert_eq!(
            extract_docx(&bytes).unwrap(),
            "Hello world\nSecond & last\n"
        );
    }

    #[test]
    fn test_tabs_and_breaks() {
        let bytes = docx_fixture(concat!(
            r#"<w:body><w:p>"#,
            r#"<w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>"#,
            r#"<w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r>"#,
            r#"</w:p></w:body>"#
        ));
        assert_eq!(extract_docx(&bytes).unwrap(), "a\tb\nc\n");
    }

    #[test]
    fn test_not_a_zip() {
        let result = extract_docx(b"plain bytes");
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[test]
    fn test_archive_without_document_part() {
        let bytes = docx_archive(&[("word/styles.xml", "<w:styles/>")]);

        match extract_docx(&bytes) {
            Err(ExtractError::Parse(msg)) => assert!(msg.contains(DOCUMENT_PART)),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_headers_and_footers_surround_body() {
        let document = format!(
            r#"<w:document xmlns:w="{WORDPROCESSING_NS}"><w:body><w:p><w:r><w:t>Body</w:t></w:r></w:p></w:body></w:document>"#
        );
        let bytes = docx_archive(&[
            ("word/footer1.xml", header_xml("ftr", "Page footer").as_str()),
            (DOCUMENT_PART, document.as_str()),
            ("word/header2.xml", header_xml("hdr", "Second header").as_str()),
            ("word/header1.xml", header_xml("hdr", "Confidential header").as_str()),
            ("word/_rels/header1.xml.rels", "<Relationships/>"),
        ]);

        assert_eq!(
            extract_docx(&bytes).unwrap(),
            "Confidential header\nSecond header\nBody\nPage footer\n"
        );
    }
}
