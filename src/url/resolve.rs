//! Resolution of raw `href` values against the page they appear on

use url::Url;

/// Resolves an href to an absolute URL string
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links (same page anchors)
/// - hrefs that do not resolve against `base_url`
///
/// Other schemes (ftp, ...) are returned as-is; keeping them out of the
/// frontier is the admission filter's job.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    base_url.join(href).ok().map(|url| url.to_string())
}
