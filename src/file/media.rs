//! Media type handling: preview dispatch, listing category, size display.

use serde::Serialize;
use utoipa::ToSchema;

/// Media type used when nothing better is known.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// How a file can be shown inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Image,
    Video,
    Audio,
    Pdf,
    /// No inline preview; download only.
    Other,
}

impl PreviewKind {
    /// Pick the preview for a media type.
    pub fn for_media_type(media_type: &str) -> Self {
        let media_type = media_type.to_ascii_lowercase();

        if media_type.starts_with("image/") {
            Self::Image
        } else if media_type.starts_with("video/") {
            Self::Video
        } else if media_type.starts_with("audio/") {
            Self::Audio
        } else if media_type == "application/pdf" {
            Self::Pdf
        } else {
            Self::Other
        }
    }

    /// Whether the content can be rendered inline by a browser.
    pub fn is_inline(self) -> bool {
        self != Self::Other
    }
}

/// Coarse category of a file, used to pick an icon in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Other,
}

impl FileCategory {
    /// Categorize a media type.
    pub fn for_media_type(media_type: &str) -> Self {
        let media_type = media_type.to_ascii_lowercase();

        if media_type.starts_with("image/") {
            Self::Image
        } else if media_type.starts_with("video/") {
            Self::Video
        } else if media_type.starts_with("audio/") {
            Self::Audio
        } else if media_type == "application/pdf" || media_type.starts_with("text/") {
            Self::Document
        } else if ["zip", "rar", "7z"].iter().any(|m| media_type.contains(m)) {
            Self::Archive
        } else {
            Self::Other
        }
    }
}

/// Media type to record for an upload.
///
/// A non-empty supplied type is kept verbatim. Otherwise the type is guessed
/// from the file name, falling back to [`DEFAULT_MEDIA_TYPE`].
pub fn resolve_media_type(supplied: Option<&str>, file_name: &str) -> String {
    match supplied.map(str::trim) {
        Some(media_type) if !media_type.is_empty() => media_type.to_string(),
        _ => mime_guess::from_path(file_name)
            .first_raw()
            .unwrap_or(DEFAULT_MEDIA_TYPE)
            .to_string(),
    }
}

/// Human-readable size with one decimal, in 1024 steps up to TB.
pub fn format_file_size(bytes: Option<u64>) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let Some(bytes) = bytes else {
        return "Unknown size".to_string();
    };

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{size:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_kind() {
        assert_eq!(PreviewKind::for_media_type("image/png"), PreviewKind::Image);
        assert_eq!(PreviewKind::for_media_type("video/mp4"), PreviewKind::Video);
        assert_eq!(PreviewKind::for_media_type("audio/mpeg"), PreviewKind::Audio);
        assert_eq!(PreviewKind::for_media_type("application/pdf"), PreviewKind::Pdf);
        assert_eq!(PreviewKind::for_media_type("Image/JPEG"), PreviewKind::Image);
        assert_eq!(PreviewKind::for_media_type("text/plain"), PreviewKind::Other);
        assert_eq!(PreviewKind::for_media_type(""), PreviewKind::Other);

        assert!(PreviewKind::Pdf.is_inline());
        assert!(!PreviewKind::Other.is_inline());
    }

    #[test]
    fn test_file_category() {
        assert_eq!(FileCategory::for_media_type("image/gif"), FileCategory::Image);
        assert_eq!(FileCategory::for_media_type("text/plain"), FileCategory::Document);
        assert_eq!(FileCategory::for_media_type("application/pdf"), FileCategory::Document);
        assert_eq!(FileCategory::for_media_type("application/zip"), FileCategory::Archive);
        assert_eq!(
            FileCategory::for_media_type("application/x-rar-compressed"),
            FileCategory::Archive
        );
        assert_eq!(
            FileCategory::for_media_type("application/x-7z-compressed"),
            FileCategory::Archive
        );
        assert_eq!(FileCategory::for_media_type("application/json"), FileCategory::Other);
    }

    #[test]
    fn test_resolve_media_type_keeps_supplied() {
        assert_eq!(resolve_media_type(Some("text/plain"), "data.pdf"), "text/plain");
        assert_eq!(
            resolve_media_type(Some("application/x-custom"), "a.bin"),
            "application/x-custom"
        );
    }

    #[test]
    fn test_resolve_media_type_guesses() {
        assert_eq!(resolve_media_type(None, "photo.png"), "image/png");
        assert_eq!(resolve_media_type(Some(""), "report.pdf"), "application/pdf");
        assert_eq!(resolve_media_type(None, "no_extension"), DEFAULT_MEDIA_TYPE);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(None), "Unknown size");
        assert_eq!(format_file_size(Some(0)), "0.0 B");
        assert_eq!(format_file_size(Some(512)), "512.0 B");
        assert_eq!(format_file_size(Some(1024)), "1.0 KB");
        assert_eq!(format_file_size(Some(1536)), "1.5 KB");
        assert_eq!(format_file_size(Some(5 * 1024 * 1024)), "5.0 MB");
        assert_eq!(format_file_size(Some(3 * 1024 * 1024 * 1024)), "3.0 GB");
        assert_eq!(format_file_size(Some(2048 * 1024u64.pow(4))), "2048.0 TB");
    }
}
