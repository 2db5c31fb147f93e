//! Upload Gate: validates an incoming CV before anything touches disk.
//!
//! Only the declared metadata is checked (extension, MIME type, size).
//! The actual bytes are never sniffed, so a spoofed extension or MIME
//! type passes; that matches the documented contract of the system.

use crate::errors::AppError;

/// Hard size cap for uploaded CVs: 5 MiB.
pub const MAX_CV_BYTES: u64 = 5 * 1024 * 1024;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The two accepted CV formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvFormat {
    Pdf,
    Docx,
}

impl CvFormat {
    /// Determine the format from a filename's extension, case-insensitively.
    pub fn from_extension(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(CvFormat::Pdf),
            "docx" => Some(CvFormat::Docx),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            CvFormat::Pdf => PDF_MIME,
            CvFormat::Docx => DOCX_MIME,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            CvFormat::Pdf => "pdf",
            CvFormat::Docx => "docx",
        }
    }
}

/// Validate a CV upload. Accepts only if the extension is `.pdf`/`.docx`,
/// the declared MIME type is one of the two allowed document types, and
/// the size is at most [`MAX_CV_BYTES`]. Rejection is terminal: the caller
/// must resubmit a corrected file.
pub fn validate(original_name: &str, mime_type: &str, size_bytes: u64) -> Result<CvFormat, AppError> {
    let format = CvFormat::from_extension(original_name).ok_or_else(|| {
        AppError::Validation(format!(
            "unsupported file type '{original_name}': only .pdf and .docx CVs are accepted"
        ))
    })?;

    if mime_type != PDF_MIME && mime_type != DOCX_MIME {
        return Err(AppError::Validation(format!(
            "unsupported content type '{mime_type}': only PDF and DOCX CVs are accepted"
        )));
    }

    if size_bytes > MAX_CV_BYTES {
        return Err(AppError::Validation(format!(
            "file is too large ({size_bytes} bytes): the limit is {MAX_CV_BYTES} bytes"
        )));
    }

    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_pdf() {
        let format = validate("resume.pdf", PDF_MIME, 2 * 1024 * 1024).unwrap();
        assert_eq!(format, CvFormat::Pdf);
    }

    #[test]
    fn test_accepts_docx() {
        let format = validate("resume.docx", DOCX_MIME, 1024).unwrap();
        assert_eq!(format, CvFormat::Docx);
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let format = validate("Resume.PDF", PDF_MIME, 1024).unwrap();
        assert_eq!(format, CvFormat::Pdf);
    }

    #[test]
    fn test_rejects_txt() {
        let err = validate("notes.txt", "text/plain", 10).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("file type")));
    }

    #[test]
    fn test_rejects_missing_extension() {
        assert!(validate("resume", PDF_MIME, 10).is_err());
    }

    #[test]
    fn test_rejects_disallowed_mime() {
        let err = validate("resume.pdf", "application/zip", 10).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("content type")));
    }

    #[test]
    fn test_accepts_exactly_five_mib() {
        assert!(validate("resume.pdf", PDF_MIME, MAX_CV_BYTES).is_ok());
    }

    #[test]
    fn test_rejects_oversize_regardless_of_type() {
        let err = validate("resume.pdf", PDF_MIME, MAX_CV_BYTES + 1).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("too large")));
    }
}
