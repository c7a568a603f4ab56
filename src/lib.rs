//! Text templating with nested repeatable sections
//!
//! This crate renders text templates built from literal text, repeatable
//! sections, switches and `{placeholder}` variables. A host fills a template
//! session with variables and section occurrences, then renders a template
//! file into a string.
//!
//! ```text
//! <h1>{title}</h1>
//! <ul>
//! <!-- BEGIN product -->
//!   <li>{product.name}<!-- BEGIN option --> [{product.option.size}]<!-- END option --></li>
//! <!-- END product -->
//! </ul>
//! <!-- SWITCH admin --><a href="/admin">Admin</a><!-- END admin -->
//! {INCLUDE:footer.tpl}
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use section_template::HtmlTemplate;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tpl = HtmlTemplate::new("templates", None);
//! tpl.assign_files([("index", "index.tpl")])?;
//!
//! tpl.assign_vars(&json!({"title": "Products"}), None)?;
//! tpl.assign_section("product", &json!({"name": "Nut"}))?;
//! tpl.assign_section("product.option", &json!({"size": "M4"}))?;
//! tpl.assign_section("product", &json!({"name": "Bolt"}))?;
//! tpl.enable_switch("admin");
//!
//! let rendered = tpl.render("index")?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cache;
pub mod error;
pub mod loader;
pub mod occurrence;
pub mod parser;
pub mod renderer;
pub mod switches;
pub mod types;
pub mod utils;
pub mod value;
pub mod variables;

#[cfg(test)]
pub(crate) mod test_utils;


// Re-export commonly used types
pub use builder::HtmlTemplateBuilder;
pub use cache::{CacheStats, EvictionStrategy, SessionCacheStats};
pub use error::{Error, Result};
pub use loader::{FileSystemLoader, MemoryLoader, TemplateLoader};
pub use types::{CacheMode, HtmlTemplate, TemplateConfig};
pub use value::TemplateValue;
