//! Builder pattern API for constructing HtmlTemplate sessions
//!
//! This module provides a fluent API for creating sessions with a template
//! source, cache configuration and pre-assigned template files.

use std::path::PathBuf;

use crate::cache::EvictionStrategy;
use crate::error::{Error, Result};
use crate::loader::{FileSystemLoader, TemplateLoader};
use crate::types::*;

/// Builder for constructing HtmlTemplate sessions
///
/// A session needs a template source: either a template directory or a custom
/// [`TemplateLoader`]. Everything else has defaults.
///
/// # Examples
///
/// ```rust,ignore
/// use section_template::{HtmlTemplateBuilder, CacheMode};
///
/// let mut tpl = HtmlTemplateBuilder::new()
///     .with_template_dir("themes/custom")
///     .with_fallback_dir("themes/default")
///     .with_caching(CacheMode::Normal)
///     .with_files([("index", "index.tpl"), ("footer", "footer.tpl")])
///     .build()?;
/// ```
pub struct HtmlTemplateBuilder {
    template_dir: Option<PathBuf>,
    fallback_dir: Option<PathBuf>,
    loader: Option<Box<dyn TemplateLoader>>,
    config: TemplateConfig,
    files: Vec<(String, String)>,
}

impl HtmlTemplateBuilder {
    /// Create a new session builder
    pub fn new() -> Self {
        Self {
            template_dir: None,
            fallback_dir: None,
            loader: None,
            config: TemplateConfig::default(),
            files: Vec::new(),
        }
    }

    /// Directory searched first for template files
    pub fn with_template_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    /// Directory searched when a file is missing from the template directory
    pub fn with_fallback_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.fallback_dir = Some(dir.into());
        self
    }

    /// Use a custom loader instead of the file system
    ///
    /// A custom loader takes precedence over the template directories.
    pub fn with_loader<L: TemplateLoader + 'static>(mut self, loader: L) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Set the cache mode
    pub fn with_caching(mut self, mode: CacheMode) -> Self {
        self.config = self.config.with_cache_mode(mode);
        self
    }

    pub fn with_eviction_strategy(mut self, strategy: EvictionStrategy) -> Self {
        self.config = self.config.with_eviction_strategy(strategy);
        self
    }

    /// Use a custom session configuration
    pub fn with_config(mut self, config: TemplateConfig) -> Self {
        self.config = config;
        self
    }

    /// Template files to assign once the session is built
    pub fn with_files<I, A, F>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = (A, F)>,
        A: Into<String>,
        F: Into<String>,
    {
        self.files
            .extend(files.into_iter().map(|(alias, file)| (alias.into(), file.into())));
        self
    }

    /// Build the session
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigError`] if neither a template directory nor a loader
    ///   was set
    /// - [`Error::NotFound`] if a file given to [`with_files`](Self::with_files)
    ///   cannot be found
    pub fn build(self) -> Result<HtmlTemplate> {
        let loader: Box<dyn TemplateLoader> = match (self.loader, self.template_dir) {
            (Some(loader), _) => loader,
            (None, Some(dir)) => Box::new(FileSystemLoader::new(dir, self.fallback_dir)),
            (None, None) => {
                return Err(Error::config_static(
                    "No template directory or loader provided",
                ))
            }
        };

        let mut template = HtmlTemplate::from_loader(loader, self.config);
        template.assign_files(self.files)?;
        Ok(template)
    }
}

impl Default for HtmlTemplateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
