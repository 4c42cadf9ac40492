use super::ExtractionError;

/// Loads a PDF from memory and returns the text tokens of every page, in page
/// order, joined by single spaces.
pub(super) fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    Ok(join_page_tokens(&pages))
}

fn join_page_tokens(pages: &[String]) -> String {
    pages
        .iter()
        .flat_map(|page| page.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_keeps_page_order() {
        let pages = vec![
            "Jane Doe\nStaff Engineer".to_string(),
            "Experience:\tAcme  Corp".to_string(),
            "Skills: Rust".to_string(),
        ];
        assert_eq!(
            join_page_tokens(&pages),
            "Jane Doe Staff Engineer Experience: Acme Corp Skills: Rust"
        );
    }

    #[test]
    fn test_join_skips_blank_pages() {
        let pages = vec!["first".to_string(), "  \n ".to_string(), "last".to_string()];
        assert_eq!(join_page_tokens(&pages), "first last");
    }

    #[test]
    fn test_join_no_pages_is_empty() {
        assert_eq!(join_page_tokens(&[]), "");
    }

    #[test]
    fn test_extract_joins_pages_in_order() {
        let bytes = crate::test_support::pdf_bytes(&["Jane Doe Engineer", "Skills Rust Go"]);
        assert_eq!(extract(&bytes).unwrap(), "Jane Doe Engineer Skills Rust Go");
    }

    #[test]
    fn test_extract_rejects_non_pdf_bytes() {
        let err = extract(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }
}
