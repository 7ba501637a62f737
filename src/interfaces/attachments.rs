use crate::domain::attachment::{APPLICATION_PDF, Attachment, IMAGE_JPEG, IMAGE_PNG};
use crate::error::InputError;
use std::path::Path;

const OCTET_STREAM: &str = "application/octet-stream";

/// Guesses a media type from the file extension, the way a browser labels an upload.
pub fn media_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => APPLICATION_PDF,
        Some("jpg") | Some("jpeg") => IMAGE_JPEG,
        Some("png") => IMAGE_PNG,
        _ => OCTET_STREAM,
    }
}

/// Loads a document from disk.
///
/// Returns `Ok(None)` when no path was given, so the validator reports the
/// attachment as missing. A declared media type wins over the guessed one.
pub async fn load(
    path: Option<&Path>,
    declared_type: Option<&str>,
) -> Result<Option<Attachment>, InputError> {
    let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(None);
    };

    let bytes = tokio::fs::read(path).await?;
    let media_type = declared_type
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| media_type_for(path))
        .to_string();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Some(Attachment::new(name, Some(media_type), bytes)))
}
