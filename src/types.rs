//! Core template types and configurations
//!
//! This module contains the template session and its configuration.
//!
//! # Key Types
//!
//! - [`HtmlTemplate`] - A template session: assigned files, variables,
//!   section occurrences, switches and caches
//! - [`TemplateConfig`] - Configuration options for session behavior
//! - [`CacheMode`] - Whether rendered output is cached
//!
//! # Usage
//!
//! ```rust,ignore
//! use section_template::{HtmlTemplate, TemplateConfig, CacheMode};
//! use serde_json::json;
//!
//! let config = TemplateConfig::default().with_render_cache_size(16);
//! let mut tpl = HtmlTemplate::with_config("templates", None, config);
//!
//! tpl.assign_files([("index", "index.tpl")])?;
//! tpl.assign_vars(&json!({"title": "Products"}), None)?;
//! tpl.assign_section("product", &json!({"name": "Nut"}))?;
//! let html = tpl.render("index")?;
//! ```

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::cache::{Cache, EvictionStrategy, SessionCacheStats};
use crate::error::{Error, Result};
use crate::loader::{expand_includes, FileSystemLoader, TemplateLoader};
use crate::occurrence::OccurrenceTracker;
use crate::parser::Segmenter;
use crate::renderer::Renderer;
use crate::switches::SwitchRegistry;
use crate::value::{filter_scalars, scalar_pairs, variable_map, TemplateValue};
use crate::variables::{VariableStore, DEFAULT_NAMESPACE_SEPARATOR};

/// A template session
///
/// `HtmlTemplate` holds everything a host assigns before rendering: template
/// files by alias, root variables, section occurrences with their variables
/// and enabled switches. Rendering an alias walks the template file against
/// that state and returns the output as a string.
///
/// # Sections
///
/// A section is a repeatable block of the template:
///
/// ```text
/// <!-- BEGIN product -->
///   <li>{product.name}</li>
/// <!-- END product -->
/// ```
///
/// Every call to [`assign_section`](Self::assign_section) adds one occurrence
/// of the section, carrying its own variables. Sections nest; the path of a
/// nested section names its ancestors (`product.option`), and each assignment
/// goes to the most recent occurrence of every ancestor:
///
/// ```rust,ignore
/// tpl.assign_section("product", &json!({"name": "Nut"}))?;
/// tpl.assign_section("product.option", &json!({"size": "M4"}))?;
/// tpl.assign_section("product.option", &json!({"size": "M5"}))?;
/// tpl.assign_section("product", &json!({"name": "Bolt"}))?;
/// ```
///
/// A section that was never assigned renders as nothing.
///
/// # Switches
///
/// `<!-- SWITCH name -->...<!-- END name -->` renders once when the switch is
/// enabled with [`enable_switch`](Self::enable_switch) and never otherwise.
///
/// # Caching
///
/// The rendered output of each alias is cached until the next change to the
/// session's variables, sections or switches. Caching is controlled by
/// [`TemplateConfig`].
///
/// # Thread Safety
///
/// A session is `Send` but not shared: every mutating method takes
/// `&mut self`. Independent requests should build independent sessions.
pub struct HtmlTemplate {
    pub(crate) config: TemplateConfig,
    pub(crate) loader: Box<dyn TemplateLoader>,
    pub(crate) files: IndexMap<String, PathBuf>,
    pub(crate) occurrences: OccurrenceTracker,
    pub(crate) variables: VariableStore,
    pub(crate) switches: SwitchRegistry,
    pub(crate) segmenter: Segmenter,
    pub(crate) rendered: Cache<String, String>,
}

impl fmt::Debug for HtmlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlTemplate")
            .field("config", &self.config)
            .field("files", &self.files)
            .field("occurrences", &self.occurrences)
            .field("variables", &self.variables)
            .field("switches", &self.switches)
            .field("rendered", &self.rendered.len())
            .finish()
    }
}

impl HtmlTemplate {
    /// Create a session reading templates from `template_dir`
    ///
    /// Files missing from `template_dir` are looked up in `fallback_dir`.
    /// Without a fallback directory the template directory is used for both.
    pub fn new(template_dir: impl Into<PathBuf>, fallback_dir: Option<PathBuf>) -> Self {
        Self::with_config(template_dir, fallback_dir, TemplateConfig::default())
    }

    /// Create a session with custom configuration
    pub fn with_config(
        template_dir: impl Into<PathBuf>,
        fallback_dir: Option<PathBuf>,
        config: TemplateConfig,
    ) -> Self {
        let loader = FileSystemLoader::new(template_dir, fallback_dir);
        Self::from_loader(Box::new(loader), config)
    }

    /// Create a session on top of any [`TemplateLoader`]
    pub fn from_loader(loader: Box<dyn TemplateLoader>, config: TemplateConfig) -> Self {
        let render_cache_size = match config.cache_mode {
            CacheMode::None => 0,
            CacheMode::Normal => config.render_cache_size,
        };

        Self {
            rendered: Cache::new(render_cache_size, config.eviction_strategy),
            segmenter: Segmenter::new(config.segment_cache_size, config.eviction_strategy),
            variables: VariableStore::with_separator(config.namespace_separator.clone()),
            occurrences: OccurrenceTracker::new(),
            switches: SwitchRegistry::new(),
            files: IndexMap::new(),
            loader,
            config,
        }
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Map aliases to template files
    ///
    /// Absolute paths (starting with `/`) must exist as given. Relative paths
    /// are looked up in the template directory, then in the fallback
    /// directory. The first file that cannot be found aborts with
    /// [`Error::NotFound`]; aliases assigned before it stay assigned.
    pub fn assign_files<I, A, F>(&mut self, files: I) -> Result<()>
    where
        I: IntoIterator<Item = (A, F)>,
        A: Into<String>,
        F: AsRef<str>,
    {
        for (alias, file) in files {
            let alias = alias.into();
            let file = file.as_ref();

            let path = if file.starts_with('/') {
                let path = PathBuf::from(file);
                if !self.loader.exists(&path) {
                    return Err(Error::not_found_owned(format!(
                        "Could not find template file \"{}\".",
                        file
                    )));
                }
                path
            } else {
                self.loader.locate(file)?
            };

            log::debug!("assigned template {} -> {}", alias, path.display());
            self.rendered.remove(alias.as_str());
            self.files.insert(alias, path);
        }
        Ok(())
    }

    /// Resolved path of an assigned alias
    pub fn assigned_file(&self, alias: &str) -> Option<&Path> {
        self.files.get(alias).map(PathBuf::as_path)
    }

    /// Assign root variables
    ///
    /// `vars` must serialize to a map; entries that are not scalars are
    /// dropped. With a namespace each placeholder becomes `{namespace:key}`.
    /// Returns `false` for an empty map.
    ///
    /// ```rust,ignore
    /// tpl.assign_vars(&json!({"title": "Home"}), None)?;            // {title}
    /// tpl.assign_vars(&json!({"name": "Ada"}), Some("user"))?;      // {user:name}
    /// ```
    pub fn assign_vars<T: Serialize + ?Sized>(
        &mut self,
        vars: &T,
        namespace: Option<&str>,
    ) -> Result<bool> {
        let map = variable_map(vars)?;
        if map.is_empty() {
            return Ok(false);
        }
        self.variables.set_root_vars(filter_scalars(map), namespace);
        self.invalidate();
        Ok(true)
    }

    /// Assign a single root variable; returns `false` for non-scalar values
    pub fn assign_var<V: TemplateValue + ?Sized>(&mut self, key: &str, value: &V) -> bool {
        let Some(text) = value.to_template_string() else {
            return false;
        };
        self.variables.set_root_var(key, text.into_owned());
        self.invalidate();
        true
    }

    /// Add an occurrence of the section at `path` with its variables
    ///
    /// Ancestors that have no occurrence yet are opened once. Returns the
    /// qualified occurrence path, e.g. `.product{2}.option{1}`.
    pub fn assign_section<T: Serialize + ?Sized>(&mut self, path: &str, vars: &T) -> Result<String> {
        let pairs = scalar_pairs(vars)?;
        let qualified = self.occurrences.open_leaf(path);
        self.variables.set_section_vars(&qualified, path, pairs);
        self.invalidate();
        Ok(qualified)
    }

    /// Add an occurrence of the section at `path` without variables
    pub fn open_section(&mut self, path: &str) -> String {
        let qualified = self.occurrences.open_leaf(path);
        self.invalidate();
        qualified
    }

    /// Enable a switch; switches stay enabled until [`reset_all`](Self::reset_all)
    pub fn enable_switch(&mut self, name: &str) {
        if self.switches.enable(name) {
            self.invalidate();
        }
    }

    pub fn is_switch_enabled(&self, name: &str) -> bool {
        self.switches.is_enabled(name)
    }

    /// Whether the section at `path` has at least one occurrence in any
    /// occurrence of its ancestors
    pub fn is_section_assigned(&self, path: &str) -> bool {
        self.occurrences.is_assigned(path)
    }

    /// Forget root variables, sections and switches
    pub fn reset_all(&mut self) {
        self.variables.clear_root();
        self.variables.clear_sections();
        self.occurrences.clear();
        self.switches.clear();
        self.rendered.clear();
        self.segmenter.clear();
        log::debug!("template session reset");
    }

    pub fn reset_root_vars(&mut self) {
        self.variables.clear_root();
        self.invalidate();
    }

    /// Forget section occurrences and their variables
    ///
    /// `None` or an empty path forgets every section. `Some(path)` forgets
    /// that section, all of its occurrences and everything nested in them;
    /// sibling sections are kept.
    pub fn reset_section_vars(&mut self, path: Option<&str>) {
        let path = path.filter(|path| !path.trim_start_matches('.').is_empty());
        match path {
            None => {
                self.occurrences.clear();
                self.variables.clear_sections();
                log::debug!("reset all sections");
            }
            Some(path) => {
                let counts = self.occurrences.remove_section(path);
                let scopes = self.variables.remove_section(path);
                log::debug!(
                    "reset section {}: {} counts, {} variable scopes",
                    path,
                    counts,
                    scopes
                );
            }
        }
        self.rendered.clear();
        self.segmenter.clear();
    }

    /// Drop the cached output of one alias, or of every alias
    pub fn clear_rendered_cache(&mut self, alias: Option<&str>) {
        match alias {
            Some(alias) => {
                self.rendered.remove(alias);
            }
            None => {
                self.rendered.clear();
                self.segmenter.clear();
            }
        }
        log::debug!("cleared rendered cache for {}", alias.unwrap_or("all templates"));
    }

    /// Render an assigned template
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `alias` was never assigned or its file is gone
    /// - [`Error::Unreadable`] if the file exists but cannot be read
    pub fn render(&mut self, alias: &str) -> Result<String> {
        let caching = self.config.cache_mode != CacheMode::None;
        if caching {
            if let Some(output) = self.rendered.get(alias) {
                log::trace!("render cache hit for {}", alias);
                return Ok(output);
            }
        }

        let path = self.files.get(alias).cloned().ok_or_else(|| {
            Error::not_found_owned(format!("Template file \"{}\" could not be found.", alias))
        })?;

        let raw = self.loader.load(&path)?;
        let body = expand_includes(&*self.loader, &path, &raw);
        let output = self.render_str(&body);

        if caching {
            self.rendered.insert(alias.to_string(), output.clone());
        }
        Ok(output)
    }

    /// Render an assigned template into `writer`
    pub fn display<W: Write + ?Sized>(&mut self, alias: &str, writer: &mut W) -> Result<()> {
        let output = self.render(alias)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }

    /// Render a template body held in memory
    ///
    /// Includes are not expanded and the result is not cached.
    pub fn render_str(&mut self, body: &str) -> String {
        Renderer::new(
            &mut self.segmenter,
            &self.occurrences,
            &self.variables,
            &self.switches,
        )
        .render(body)
    }

    pub fn cache_stats(&self) -> SessionCacheStats {
        SessionCacheStats {
            rendered: self.rendered.stats(),
            segments: self.segmenter.stats(),
        }
    }

    fn invalidate(&mut self) {
        if !self.rendered.is_empty() {
            log::trace!("invalidating {} rendered templates", self.rendered.len());
            self.rendered.clear();
        }
    }
}

/// Configuration for a template session
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    pub(crate) cache_mode: CacheMode,
    pub(crate) render_cache_size: usize,
    pub(crate) segment_cache_size: usize,
    pub(crate) eviction_strategy: EvictionStrategy,
    pub(crate) namespace_separator: String,
}

impl TemplateConfig {
    /// Create a new template configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache mode
    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Maximum number of rendered templates kept
    pub fn with_render_cache_size(mut self, size: usize) -> Self {
        self.render_cache_size = size;
        self
    }

    /// Maximum number of segmented template bodies kept
    pub fn with_segment_cache_size(mut self, size: usize) -> Self {
        self.segment_cache_size = size;
        self
    }

    pub fn with_eviction_strategy(mut self, strategy: EvictionStrategy) -> Self {
        self.eviction_strategy = strategy;
        self
    }

    /// Separator between namespace and key in root placeholders
    pub fn with_namespace_separator(mut self, separator: impl Into<String>) -> Self {
        self.namespace_separator = separator.into();
        self
    }

    /// Create configuration with no caching
    pub fn no_caching() -> Self {
        Self {
            cache_mode: CacheMode::None,
            render_cache_size: 0,
            segment_cache_size: 0,
            ..Self::default()
        }
    }

    // Accessors
    pub fn cache_mode(&self) -> CacheMode {
        self.cache_mode
    }
    pub fn render_cache_size(&self) -> usize {
        self.render_cache_size
    }
    pub fn segment_cache_size(&self) -> usize {
        self.segment_cache_size
    }
    pub fn eviction_strategy(&self) -> EvictionStrategy {
        self.eviction_strategy
    }
    pub fn namespace_separator(&self) -> &str {
        &self.namespace_separator
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            cache_mode: CacheMode::Normal,
            render_cache_size: 64,
            segment_cache_size: 512,
            eviction_strategy: EvictionStrategy::LRU,
            namespace_separator: DEFAULT_NAMESPACE_SEPARATOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    None,
    Normal,
}
