//! Admission filter for discovered URLs

use std::collections::HashSet;
use url::Url;

/// Extensions of opaque binary or media resources that are never crawled
pub const DEFAULT_BLOCKED_EXTENSIONS: &[&str] = &[
    // images
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "ico", "tif", "tiff",
    // archives
    "zip", "gz", "tgz", "tar", "rar", "7z", "bz2", "xz",
    // executables and disk images
    "exe", "msi", "dmg", "iso", "bin",
    // audio and video
    "mp3", "mp4", "avi", "mov", "wav", "mkv", "webm",
];

/// Why a URL was kept out of the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterReason {
    /// The string is not an absolute URL
    Unparseable,

    /// Scheme other than http or https
    Scheme(String),

    /// Path ends in a blocked extension
    Extension(String),
}

/// Scheme and extension checks applied before a URL may enter the frontier
#[derive(Debug, Clone)]
pub struct AdmissionFilter {
    blocked_extensions: HashSet<String>,
}

impl Default for AdmissionFilter {
    fn default() -> Self {
        Self::with_blocked_extensions(DEFAULT_BLOCKED_EXTENSIONS.iter().copied())
    }
}

impl AdmissionFilter {
    /// Creates a filter blocking exactly the given extensions (case-insensitive, without dot)
    pub fn with_blocked_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            blocked_extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Checks a URL string
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The URL may be enqueued
    /// * `Err(FilterReason)` - The URL must be skipped
    pub fn check(&self, url: &str) -> Result<(), FilterReason> {
        let parsed = Url::parse(url).map_err(|_| FilterReason::Unparseable)?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(FilterReason::Scheme(other.to_string())),
        }

        if let Some(ext) = path_extension(parsed.path()) {
            if self.blocked_extensions.contains(&ext) {
                return Err(FilterReason::Extension(ext));
            }
        }

        Ok(())
    }

    pub fn allows(&self, url: &str) -> bool {
        self.check(url).is_ok()
    }

    pub fn blocked_extensions(&self) -> impl Iterator<Item = &str> {
        self.blocked_extensions.iter().map(String::as_str)
    }
}

/// Lowercased extension of the last path segment, if it has one
fn path_extension(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
