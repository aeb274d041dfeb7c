//! Path utilities for storage paths and URLs.
//!
//! Storage paths produced by filevault are always forward-slash separated,
//! regardless of the platform they were computed on, so that they can be used
//! verbatim as object-store keys and URL paths.

use std::path::Path;

/// List of supported image file extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// Replace every backslash with a forward slash and nothing else.
///
/// Used for externally supplied paths and URLs, which must otherwise be kept
/// verbatim (a `https://` scheme keeps its double slash).
///
/// # Examples
///
/// ```
/// use filevault_common::paths::to_forward_slashes;
///
/// assert_eq!(to_forward_slashes("img\\ab\\1.jpg"), "img/ab/1.jpg");
/// assert_eq!(to_forward_slashes("https://cdn.example.com/a"), "https://cdn.example.com/a");
/// ```
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalize a relative storage path.
///
/// Backslashes become forward slashes, runs of slashes collapse to one and
/// leading/trailing slashes are removed.
///
/// # Examples
///
/// ```
/// use filevault_common::paths::normalize_path;
///
/// assert_eq!(normalize_path("Avatar\\ab\\\\cd/42/"), "Avatar/ab/cd/42");
/// assert_eq!(normalize_path("/a//b"), "a/b");
/// ```
pub fn normalize_path(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a URL prefix and a relative path with exactly one slash between them.
///
/// # Examples
///
/// ```
/// use filevault_common::paths::join_url;
///
/// assert_eq!(join_url("/", "a/b.jpg"), "/a/b.jpg");
/// assert_eq!(join_url("https://cdn.example.com/files/", "/a/b.jpg"), "https://cdn.example.com/files/a/b.jpg");
/// assert_eq!(join_url("", "a/b.jpg"), "a/b.jpg");
/// ```
pub fn join_url(prefix: &str, path: &str) -> String {
    let path = to_forward_slashes(path);
    let path = path.trim_start_matches('/');
    if prefix.is_empty() {
        return path.to_string();
    }
    format!("{}/{}", prefix.trim_end_matches('/'), path)
}

/// Check if a path has an image file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use filevault_common::paths::is_image_file;
///
/// assert!(is_image_file(Path::new("avatar.JPG")));
/// assert!(!is_image_file(Path::new("report.pdf")));
/// ```
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
