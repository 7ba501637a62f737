//! Uploaded documents and the rules they must satisfy.

use super::validation::Violation;

/// Largest accepted attachment, in bytes (2 MiB).
pub const MAX_ATTACHMENT_SIZE_BYTES: usize = 2_097_152;

pub const APPLICATION_PDF: &str = "application/pdf";
pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_PNG: &str = "image/png";

/// Media types accepted for any attachment.
pub const ALLOWED_MEDIA_TYPES: [&str; 3] = [APPLICATION_PDF, IMAGE_JPEG, IMAGE_PNG];

/// Label of the identity document attachment.
pub const ID_PROOF: &str = "idProof";
/// Label of the portrait photo attachment.
pub const PHOTO: &str = "photo";

/// A document uploaded alongside an onboarding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Original file name as supplied by the client.
    pub name: String,
    /// Declared media type, if the client sent one.
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, media_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Checks presence, size and media type of one attachment.
///
/// Unlike `FieldValidator` this stops at the first failing check.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttachmentValidator;

impl AttachmentValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        attachment: Option<&Attachment>,
        label: &'static str,
    ) -> Result<(), Violation> {
        let attachment = match attachment {
            Some(a) if !a.is_empty() => a,
            _ => {
                return Err(Violation {
                    field: label,
                    message: format!("{} missing or empty", label),
                });
            }
        };

        if attachment.len() > MAX_ATTACHMENT_SIZE_BYTES {
            return Err(Violation {
                field: label,
                message: format!(
                    "{} is oversized (max size {})",
                    label, MAX_ATTACHMENT_SIZE_BYTES
                ),
            });
        }

        match attachment.media_type.as_deref() {
            Some(media_type) if ALLOWED_MEDIA_TYPES.contains(&media_type) => Ok(()),
            declared => Err(Violation {
                field: label,
                message: format!(
                    "{} has invalid content type '{}'. Allowed: {}",
                    label,
                    declared.unwrap_or("none"),
                    ALLOWED_MEDIA_TYPES.join(", ")
                ),
            }),
        }
    }
}
