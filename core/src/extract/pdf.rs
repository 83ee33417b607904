use super::ExtractError;

/// Extracts the text of every page, one page per line block, trimmed at both ends.
pub(super) fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractError::Parse(format!("Failed to parse PDF: {e}")))?;
    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text.trim().to_string()
}
