//! Input checks: make sure the PDF path is usable before anything is touched.
//!
//! These run before the output file is opened, so a bad input path never
//! truncates an existing output. The `%PDF` header check catches the common
//! "wrong file" mistake with a clear message instead of a pdfium error code.

use crate::error::ScribeError;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// How far into the file the `%PDF` marker may appear. Some producers emit a
/// few bytes of junk before the header and readers tolerate it.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Verify `path` names a readable regular file that looks like a PDF.
///
/// # Errors
/// * [`ScribeError::InputNotFound`] — path missing or not a regular file
/// * [`ScribeError::PermissionDenied`] — file exists but cannot be read
/// * [`ScribeError::DocumentOpen`] — no `%PDF` header near the start
pub fn check_input(path: &Path) -> Result<(), ScribeError> {
    if !path.is_file() {
        return Err(ScribeError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ScribeError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ScribeError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    file.by_ref()
        .take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)
        .map_err(|e| ScribeError::DocumentOpen {
            path: path.to_path_buf(),
            detail: format!("cannot read file header: {e}"),
        })?;

    if !has_pdf_header(&head) {
        let mut magic = [0u8; 4];
        let n = head.len().min(4);
        magic[..n].copy_from_slice(&head[..n]);
        return Err(ScribeError::DocumentOpen {
            path: path.to_path_buf(),
            detail: format!("not a PDF file (first bytes: {magic:?})"),
        });
    }

    debug!("Input PDF ok: {}", path.display());
    Ok(())
}

fn has_pdf_header(head: &[u8]) -> bool {
    head.windows(4).any(|w| w == b"%PDF")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_input(&dir.path().join("absent.pdf")).unwrap_err();
        assert!(matches!(err, ScribeError::InputNotFound { .. }));
    }

    #[test]
    fn directory_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_input(dir.path()).unwrap_err();
        assert!(matches!(err, ScribeError::InputNotFound { .. }));
    }

    #[test]
    fn pdf_header_accepted() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n").unwrap();
        check_input(f.path()).unwrap();
    }

    #[test]
    fn header_after_leading_junk_accepted() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"\r\n\r\n%PDF-1.4\n").unwrap();
        check_input(f.path()).unwrap();
    }

    #[test]
    fn non_pdf_is_document_open_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"PK\x03\x04 definitely a zip").unwrap();
        let err = check_input(f.path()).unwrap_err();
        assert!(matches!(err, ScribeError::DocumentOpen { .. }), "got {err:?}");
    }

    #[test]
    fn empty_file_is_document_open_error() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let err = check_input(f.path()).unwrap_err();
        assert!(matches!(err, ScribeError::DocumentOpen { .. }));
    }
}
