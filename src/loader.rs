//! Template file lookup, loading and include expansion
//!
//! Files are looked up in the active template directory first and in the
//! fallback directory second. A template may pull in other files with
//! `{INCLUDE:relative/path}`; includes resolve against the directory of the
//! including template and are expanded once, before segmentation.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{Error, Result};

static INCLUDE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\{INCLUDE:(.+?)\}").expect("Invalid include regex"));

/// Source of template files
///
/// The default implementation is [`FileSystemLoader`]. Implement this trait to
/// serve templates from somewhere else, e.g. files embedded in the binary.
pub trait TemplateLoader: Send {
    /// Resolve a file name relative to the template directories
    fn locate(&self, file: &str) -> Result<PathBuf>;

    /// Whether `path` names an existing template file
    fn exists(&self, path: &Path) -> bool;

    /// Read the contents of a resolved template file
    fn load(&self, path: &Path) -> Result<String>;
}

/// Loads templates from an active directory with a fallback directory
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
    template_dir: PathBuf,
    fallback_dir: PathBuf,
}

impl FileSystemLoader {
    /// Without a fallback directory the template directory is its own fallback
    pub fn new(template_dir: impl Into<PathBuf>, fallback_dir: Option<PathBuf>) -> Self {
        let template_dir = template_dir.into();
        let fallback_dir = fallback_dir.unwrap_or_else(|| template_dir.clone());
        Self {
            template_dir,
            fallback_dir,
        }
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    pub fn fallback_dir(&self) -> &Path {
        &self.fallback_dir
    }
}

impl TemplateLoader for FileSystemLoader {
    fn locate(&self, file: &str) -> Result<PathBuf> {
        let relative = file.trim_start_matches('/');

        [&self.template_dir, &self.fallback_dir]
            .into_iter()
            .map(|dir| dir.join(relative))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                Error::not_found_owned(format!(
                    "Could not find \"{}\" in active or fallback template.",
                    file
                ))
            })
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn load(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::not_found_owned(format!(
                "Template file \"{}\" could not be found.",
                path.display()
            )),
            _ => Error::unreadable_owned(format!("{} could not be read: {}", path.display(), err)),
        })
    }
}

/// In-memory templates keyed by path
///
/// Useful for templates compiled into the binary and for tests. Relative
/// lookups resolve against the root `/`.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; relative paths are stored under `/`
    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files
            .insert(Path::new("/").join(path.as_ref()), contents.into());
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl TemplateLoader for MemoryLoader {
    fn locate(&self, file: &str) -> Result<PathBuf> {
        let path = Path::new("/").join(file.trim_start_matches('/'));
        if self.files.contains_key(&path) {
            Ok(path)
        } else {
            Err(Error::not_found_owned(format!(
                "Could not find \"{}\" in active or fallback template.",
                file
            )))
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn load(&self, path: &Path) -> Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            Error::not_found_owned(format!(
                "Template file \"{}\" could not be found.",
                path.display()
            ))
        })
    }
}

/// Replace every `{INCLUDE:file}` marker in `raw` with that file's contents
///
/// References are resolved against the directory of `template_path` after
/// every `../` and `./` has been stripped, so an include cannot leave that
/// directory. A missing or unreadable include becomes the empty string.
/// Included text is inserted verbatim; markers inside it are not expanded.
pub fn expand_includes(loader: &dyn TemplateLoader, template_path: &Path, raw: &str) -> String {
    if !INCLUDE_REGEX.is_match(raw) {
        return raw.to_string();
    }

    let base = template_path.parent().unwrap_or_else(|| Path::new(""));

    INCLUDE_REGEX
        .replace_all(raw, |caps: &Captures| {
            let reference = caps[1].replace("../", "").replace("./", "");
            let path = base.join(reference.trim_start_matches('/'));

            if !loader.exists(&path) {
                log::debug!("include {} not found, skipping", path.display());
                return String::new();
            }
            match loader.load(&path) {
                Ok(contents) => contents,
                Err(err) => {
                    log::debug!("include {} skipped: {}", path.display(), err);
                    String::new()
                }
            }
        })
        .into_owned()
}
