//! Test utilities for template testing
//!
//! Helpers for writing template fixtures to disk and comparing rendered
//! output without caring about layout whitespace.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Collapse every run of whitespace to a single space and trim the ends
///
/// # Examples
///
/// ```rust,ignore
/// assert_eq!(collapse_whitespace("<ul>\n  <li>a</li>\n</ul>\n"), "<ul> <li>a</li> </ul>");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Write `contents` to `name` below `dir`, creating parent directories
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, contents).expect("Failed to write fixture");
    path
}

/// Temporary template directory populated with `files`
pub fn fixture_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (name, contents) in files {
        write_fixture(dir.path(), name, contents);
    }
    dir
}

/// Assert that two rendered strings are equal up to whitespace layout
#[macro_export]
macro_rules! assert_text_eq {
    ($left:expr, $right:expr) => {{
        let left = $crate::test_utils::collapse_whitespace(&$left);
        let right = $crate::test_utils::collapse_whitespace(&$right);
        if left != right {
            panic!(
                "Text assertion failed\n\nLeft (collapsed):\n{}\n\nRight (collapsed):\n{}",
                left, right
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_write_fixture_creates_directories() {
        let dir = fixture_dir(&[("nested/deep/page.tpl", "x")]);
        let path = dir.path().join("nested/deep/page.tpl");
        assert_eq!(fs::read_to_string(path).unwrap(), "x");
    }

    #[test]
    fn test_assert_text_eq() {
        assert_text_eq!("<p>\n  hi\n</p>", "<p> hi </p>");
    }
}
