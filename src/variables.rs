//! Root and section-scoped template variables
//!
//! Variable keys are stored exactly as they appear in the template, braces
//! included, so substitution is a plain search-and-replace:
//!
//! - root variables: `{title}` or `{namespace:title}`
//! - section variables: `{one.two.title}`, stored under the qualified
//!   occurrence path they were assigned to (`.one{2}.two{1}`)

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::occurrence::section_matcher;

/// Placeholder to value, in assignment order
pub type VarMap = IndexMap<String, String>;

pub const DEFAULT_NAMESPACE_SEPARATOR: &str = ":";

#[derive(Debug, Clone)]
pub struct VariableStore {
    root: VarMap,
    sections: HashMap<String, VarMap>,
    namespace_separator: String,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_NAMESPACE_SEPARATOR)
    }

    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            root: VarMap::new(),
            sections: HashMap::new(),
            namespace_separator: separator.into(),
        }
    }

    /// Merge root variables, overwriting keys that already exist
    ///
    /// With a non-empty namespace each key becomes `{namespace:key}`.
    pub fn set_root_vars<I>(&mut self, vars: I, namespace: Option<&str>)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = match namespace {
            Some(ns) if !ns.is_empty() => format!("{}{}", ns, self.namespace_separator),
            _ => String::new(),
        };

        for (key, value) in vars {
            self.root.insert(format!("{{{}{}}}", prefix, key), value);
        }
    }

    pub fn set_root_var(&mut self, key: &str, value: String) {
        self.root.insert(format!("{{{}}}", key), value);
    }

    /// Store variables for one section occurrence
    ///
    /// `section_path` is the dotted path as the host wrote it; each key is
    /// stored as `{section_path.key}` under `qualified`.
    pub fn set_section_vars<I>(&mut self, qualified: &str, section_path: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut vars = vars.into_iter().peekable();
        if vars.peek().is_none() {
            return;
        }

        let section_path = section_path.trim_start_matches('.');
        let scope = self.sections.entry(qualified.to_string()).or_default();
        for (key, value) in vars {
            scope.insert(format!("{{{}.{}}}", section_path, key), value);
        }
    }

    pub fn section_scope(&self, qualified: &str) -> Option<&VarMap> {
        self.sections.get(qualified)
    }

    pub fn root(&self) -> &VarMap {
        &self.root
    }

    /// Drop the variables of `path` and every occurrence below it
    pub fn remove_section(&mut self, path: &str) -> usize {
        let Some(matcher) = section_matcher(path) else {
            return 0;
        };
        let before = self.sections.len();
        self.sections.retain(|key, _| !matcher.is_match(key));
        before - self.sections.len()
    }

    pub fn clear_root(&mut self) {
        self.root.clear();
    }

    pub fn clear_sections(&mut self) {
        self.sections.clear();
    }

    pub fn section_scope_count(&self) -> usize {
        self.sections.len()
    }
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new()
    }
}
