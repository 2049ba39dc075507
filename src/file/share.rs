//! Share links.

/// Public download link for a file id: `{public_base}/download/{id}`.
///
/// Anyone holding the link can fetch the file; it never expires.
pub fn share_url(public_base: &str, id: &str) -> String {
    format!(
        "{}/download/{}",
        public_base.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}
