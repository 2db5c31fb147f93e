use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::cipher::FieldCipher;
use crate::errors::AppError;

/// A candidate record as stored. `email`, `phone` and `address` hold
/// Field Cipher output (`ivHex:ciphertextHex`), never plaintext.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub cv_original_name: String,
    pub cv_stored_name: String,
    pub cv_url: String,
    pub cv_mime_type: String,
    pub cv_size_bytes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The API shape of a candidate, with PII decrypted. The stored name is
/// not exposed separately; it is visible only through `cv_url`.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub cv_original_name: String,
    pub cv_url: String,
    pub cv_mime_type: String,
    pub cv_size_bytes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateRow {
    /// Decrypt the masked columns and produce the API representation.
    pub fn into_api(self, cipher: &FieldCipher) -> Result<Candidate, AppError> {
        let address = self
            .address
            .as_deref()
            .map(|a| cipher.decrypt(a))
            .transpose()?;

        Ok(Candidate {
            id: self.id,
            full_name: self.full_name,
            email: cipher.decrypt(&self.email)?,
            phone: cipher.decrypt(&self.phone)?,
            address,
            cv_original_name: self.cv_original_name,
            cv_url: self.cv_url,
            cv_mime_type: self.cv_mime_type,
            cv_size_bytes: self.cv_size_bytes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_api_decrypts_pii() {
        let cipher = FieldCipher::new("unit-test-secret");
        let now = Utc::now();
        let row = CandidateRow {
            id: Uuid::new_v4(),
            full_name: "Jane Doe".to_string(),
            email: cipher.encrypt("jane@example.com").to_string(),
            phone: cipher.encrypt("+34600000000").to_string(),
            address: Some(cipher.encrypt("1 Main St").to_string()),
            cv_original_name: "cv.pdf".to_string(),
            cv_stored_name: "abc.pdf".to_string(),
            cv_url: "/uploads/abc.pdf".to_string(),
            cv_mime_type: "application/pdf".to_string(),
            cv_size_bytes: 1024,
            created_at: now,
            updated_at: now,
        };

        let api = row.into_api(&cipher).unwrap();
        assert_eq!(api.email, "jane@example.com");
        assert_eq!(api.phone, "+34600000000");
        assert_eq!(api.address.as_deref(), Some("1 Main St"));
    }

    #[test]
    fn test_into_api_fails_on_garbage_column() {
        let cipher = FieldCipher::new("unit-test-secret");
        let now = Utc::now();
        let row = CandidateRow {
            id: Uuid::new_v4(),
            full_name: "Jane Doe".to_string(),
            email: "not-an-encrypted-value".to_string(),
            phone: cipher.encrypt("+34600000000").to_string(),
            address: None,
            cv_original_name: "cv.pdf".to_string(),
            cv_stored_name: "abc.pdf".to_string(),
            cv_url: "/uploads/abc.pdf".to_string(),
            cv_mime_type: "application/pdf".to_string(),
            cv_size_bytes: 1024,
            created_at: now,
            updated_at: now,
        };

        assert!(matches!(row.into_api(&cipher), Err(AppError::Cipher(_))));
    }
}
