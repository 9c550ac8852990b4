//! Choosing the file extension a photo is saved under.
//!
//! The extension is the only metadata kept for a photo, so it is resolved once
//! at upload time from what the client sent: the MIME type first, then the
//! uploaded filename.

/// Known MIME types and their canonical extension. JPEG is always `jpeg`.
const MEDIA_TYPES: &[(&str, &str)] = &[
  ("image/jpeg", "jpeg"),
  ("image/pjpeg", "jpeg"),
  ("image/png", "png"),
  ("image/gif", "gif"),
  ("image/webp", "webp"),
  ("image/avif", "avif"),
  ("image/heic", "heic"),
  ("image/heif", "heif"),
  ("image/bmp", "bmp"),
  ("image/tiff", "tiff"),
  ("image/svg+xml", "svg"),
  ("application/pdf", "pdf"),
];

/// Alternate spellings that map onto a canonical extension.
const ALIASES: &[(&str, &str)] = &[("jpg", "jpeg"), ("jpe", "jpeg"), ("tif", "tiff")];

/// Pick the extension for an upload.
///
/// Prefers the extension derived from `content_type`, falls back to the
/// extension of `file_name`, and yields an empty string when neither helps.
/// The result carries no leading dot.
pub fn resolve_extension(content_type: Option<&str>, file_name: Option<&str>) -> String {
  content_type
    .and_then(extension_for_media_type)
    .map(str::to_owned)
    .or_else(|| file_name.and_then(extension_from_file_name))
    .unwrap_or_default()
}

/// The canonical extension for a MIME type, ignoring parameters and case.
pub fn extension_for_media_type(content_type: &str) -> Option<&'static str> {
  let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
  MEDIA_TYPES
    .iter()
    .find(|(media_type, _)| *media_type == essence)
    .map(|(_, ext)| *ext)
}

/// The MIME type to serve a stored photo with.
pub fn media_type_for_extension(extension: &str) -> &'static str {
  let lowered = extension.to_ascii_lowercase();
  let wanted = canonical(&lowered);
  MEDIA_TYPES
    .iter()
    .find(|(_, ext)| *ext == wanted)
    .map(|(media_type, _)| *media_type)
    .unwrap_or("application/octet-stream")
}

/// Normalise a caller-supplied extension: strip one leading dot, lowercase,
/// and require ASCII alphanumerics only. `None` means the value is unusable
/// as part of a filename.
pub fn normalize_extension(extension: &str) -> Option<String> {
  let trimmed = extension.strip_prefix('.').unwrap_or(extension);
  if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
    return None;
  }
  Some(trimmed.to_ascii_lowercase())
}

fn extension_from_file_name(file_name: &str) -> Option<String> {
  let (stem, ext) = file_name.rsplit_once('.')?;
  if stem.is_empty() || ext.is_empty() {
    return None;
  }
  let ext = normalize_extension(ext)?;
  Some(canonical(&ext).to_owned())
}

fn canonical(ext: &str) -> &str {
  ALIASES
    .iter()
    .find(|(alias, _)| *alias == ext)
    .map_or(ext, |(_, to)| *to)
}
