//! Turns uploaded files into a single text string.
//!
//! Supported uploads are plain text (`.txt`), PDF (`.pdf`, behind the `pdf` feature)
//! and Office Open XML documents (`.docx`, behind the `docx` feature). Legacy Word
//! documents (`.doc`) are rejected with a hint to convert them.

#[cfg(feature = "docx")]
mod docx;
#[cfg(feature = "pdf")]
mod pdf;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    UnsupportedFormat(String),
    #[error("Failed to parse document: {0}")]
    Parse(String),
}

/// A file received from a caller, named so its type can be derived from the extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: Some(filename.into()),
            bytes,
        }
    }

    /// An upload that arrived without a filename, always rejected by [`extract`].
    pub fn unnamed(bytes: Vec<u8>) -> Self {
        Self {
            filename: None,
            bytes,
        }
    }
}

/// The kinds of file the extractor knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    PlainText,
    Pdf,
    Docx,
    LegacyDoc,
    Unknown(String),
}

impl FileKind {
    /// Resolves a kind from a declared extension, case-insensitively.
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_lowercase().as_str() {
            "txt" => Self::PlainText,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::LegacyDoc,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Resolves a kind from everything after the last `.` of a filename.
    /// A filename without a dot is treated as an extension in its own right.
    pub fn from_filename(filename: &str) -> Self {
        let extension = filename.rsplit('.').next().unwrap_or(filename);
        Self::from_extension(extension)
    }
}

/// Extracts the text of an uploaded file, dispatching on its filename's extension.
///
/// # Errors
/// - [`ExtractError::InvalidArgument`] if the upload has no (or an empty) filename
/// - [`ExtractError::UnsupportedFormat`] for `.doc` and any unknown extension
/// - [`ExtractError::Parse`] if the PDF or DOCX parser rejects the content
pub async fn extract(file: &UploadedFile) -> Result<String, ExtractError> {
    let filename = file
        .filename
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ExtractError::InvalidArgument("File name is required".to_string()))?;

    let kind = FileKind::from_filename(filename);
    debug!(filename, ?kind, size = file.bytes.len(), "Extracting uploaded file");
    extract_kind(&kind, &file.bytes).await
}

/// Extracts the text of `bytes` according to an already resolved [`FileKind`].
pub async fn extract_kind(kind: &FileKind, bytes: &[u8]) -> Result<String, ExtractError> {
    match kind {
        FileKind::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
        FileKind::Pdf => extract_pdf(bytes).await,
        FileKind::Docx => extract_docx(bytes).await,
        FileKind::LegacyDoc => Err(ExtractError::UnsupportedFormat(
            "Legacy .doc format not supported. Please use .docx format.".to_string(),
        )),
        FileKind::Unknown(extension) => Err(ExtractError::UnsupportedFormat(format!(
            "Unsupported file type: {extension}"
        ))),
    }
}

#[cfg(feature = "pdf")]
async fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    run_parser(bytes.to_vec(), pdf::extract_pdf).await
}

#[cfg(not(feature = "pdf"))]
async fn extract_pdf(_bytes: &[u8]) -> Result<String, ExtractError> {
    Err(ExtractError::UnsupportedFormat(
        "PDF support requires the `pdf` feature".to_string(),
    ))
}

#[cfg(feature = "docx")]
async fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    run_parser(bytes.to_vec(), docx::extract_docx).await
}

#[cfg(not(feature = "docx"))]
async fn extract_docx(_bytes: &[u8]) -> Result<String, ExtractError> {
    Err(ExtractError::UnsupportedFormat(
        "DOCX support requires the `docx` feature".to_string(),
    ))
}

// parsers are blocking and may panic on hostile input, both are contained by the blocking pool
#[cfg(any(feature = "pdf", feature = "docx"))]
async fn run_parser(
    bytes: Vec<u8>,
    parser: fn(&[u8]) -> Result<String, ExtractError>,
) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || parser(&bytes))
        .await
        .map_err(|e| ExtractError::Parse(format!("Parser task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(FileKind::from_filename("notes.txt"), FileKind::PlainText);
        assert_eq!(FileKind::from_filename("Report.PDF"), FileKind::Pdf);
        assert_eq!(FileKind::from_filename("a.b.docx"), FileKind::Docx);
        assert_eq!(FileKind::from_filename("old.doc"), FileKind::LegacyDoc);
        assert_eq!(
            FileKind::from_filename("image.png"),
            FileKind::Unknown("png".to_string())
        );
        assert_eq!(
            FileKind::from_filename("README"),
            FileKind::Unknown("readme".to_string())
        );
    }

    #[tokio::test]
    async fn test_plain_text_is_verbatim() {
        let content = "line one\n  line two with spaces  \n";
        let file = UploadedFile::new("notes.txt", content.as_bytes().to_vec());
        assert_eq!(extract(&file).await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_missing_filename() {
        let result = extract(&UploadedFile::unnamed(b"data".to_vec())).await;
        assert!(matches!(result, Err(ExtractError::InvalidArgument(_))));

        let result = extract(&UploadedFile::new("", b"data".to_vec())).await;
        assert!(matches!(result, Err(ExtractError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_legacy_doc_rejected() {
        let result = extract(&UploadedFile::new("old.doc", vec![0xd0, 0xcf])).await;
        match result {
            Err(ExtractError::UnsupportedFormat(msg)) => assert!(msg.contains(".docx")),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_extension_rejected() {
        let result = extract(&UploadedFile::new("slides.pptx", vec![1, 2, 3])).await;
        assert_eq!(
            result,
            Err(ExtractError::UnsupportedFormat(
                "Unsupported file type: pptx".to_string()
            ))
        );
    }

    #[cfg(feature = "pdf")]
    #[tokio::test]
    async fn test_malformed_pdf_is_a_parse_error() {
        let result = extract(&UploadedFile::new("broken.pdf", b"not a pdf".to_vec())).await;
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[cfg(feature = "pdf")]
    #[tokio::test]
    async fn test_pdf_upload() {
        let bytes = pdf::tests::pdf_fixture(&["Hello page one", "Second page"]);
        let text = extract(&UploadedFile::new("pages.pdf", bytes)).await.unwrap();

        assert!(text.starts_with("Hello page one"), "got {text:?}");
        assert!(text.ends_with("Second page"), "got {text:?}");
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        assert_eq!(lines, vec!["Hello page one", "Second page"]);
    }

    #[cfg(feature = "docx")]
    #[tokio::test]
    async fn test_docx_upload() {
        let bytes = docx::tests::docx_fixture(
            r#"<w:body><w:p><w:r><w:t>The sky is blue.</w:t></w:r></w:p></w:body>"#,
        );
        let text = extract(&UploadedFile::new("sky.DOCX", bytes)).await.unwrap();
        assert_eq!(text, "The sky is blue.\n");
    }
}
