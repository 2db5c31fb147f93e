//! Storage Namer: collision-resistant stored filenames.
//!
//! The stored name keeps nothing from the original except the extension,
//! which blocks path traversal through attacker-chosen names and makes
//! stored URLs unguessable. Collisions across 16 random bytes are treated
//! as negligible and not checked.

use rand::RngCore;

/// Bytes of randomness in a stored name (32 hex characters).
const TOKEN_BYTES: usize = 16;

/// Produce the name a file is stored under: a random hex token plus the
/// original extension, lowercased. `stored_name("Resume.PDF")` yields
/// something like `3f9a...c1.pdf`.
pub fn stored_name(original_name: &str) -> String {
    let mut token = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut token);
    let token = hex::encode(token);

    match original_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{token}.{}", ext.to_ascii_lowercase()),
        _ => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_equals_original() {
        assert_ne!(stored_name("cv.pdf"), "cv.pdf");
    }

    #[test]
    fn test_preserves_extension_lowercased() {
        assert!(stored_name("Resume.PDF").ends_with(".pdf"));
        assert!(stored_name("resume.docx").ends_with(".docx"));
    }

    #[test]
    fn test_token_length() {
        let name = stored_name("cv.pdf");
        let (token, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert_eq!(ext, "pdf");
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_successive_calls_differ() {
        assert_ne!(stored_name("cv.pdf"), stored_name("cv.pdf"));
    }

    #[test]
    fn test_no_extension_yields_bare_token() {
        let name = stored_name("resume");
        assert!(!name.contains('.'));
        assert_eq!(name.len(), TOKEN_BYTES * 2);
    }
}
