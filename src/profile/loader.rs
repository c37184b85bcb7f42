//! Document loading for persona profiles

use std::path::Path;

use tracing::{debug, warn};

use crate::error::Error;
use crate::Result;

/// Load a document as text. PDFs have their text extracted; anything else
/// is read as UTF-8.
///
/// Returns `None` for missing, unreadable or blank documents.
pub fn load_document(path: &Path) -> Option<String> {
    if !path.exists() {
        debug!(path = %path.display(), "document not found");
        return None;
    }

    match read_document(path) {
        Ok(text) if text.trim().is_empty() => {
            warn!(path = %path.display(), "document has no text");
            None
        }
        Ok(text) => Some(text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load document");
            None
        }
    }
}

fn read_document(path: &Path) -> Result<String> {
    if is_pdf(path) {
        pdf_extract::extract_text(path)
            .map_err(|e| Error::Document(format!("{}: {e}", path.display())))
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_text_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");
        std::fs::write(&path, "Builder of pipelines.").unwrap();

        assert_eq!(load_document(&path).as_deref(), Some("Builder of pipelines."));
    }

    #[test]
    fn test_missing_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_document(&dir.path().join("absent.txt")).is_none());
    }

    #[test]
    fn test_blank_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");
        std::fs::write(&path, "  \n\t").unwrap();

        assert!(load_document(&path).is_none());
    }

    #[test]
    fn test_pdf_detection_ignores_case() {
        assert!(is_pdf(Path::new("me/linkedin.PDF")));
        assert!(is_pdf(Path::new("profile.pdf")));
        assert!(!is_pdf(Path::new("profile.md")));
        assert!(!is_pdf(Path::new("pdf")));
    }
}
