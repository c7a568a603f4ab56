//! Switches: named blocks rendered once when enabled
//!
//! Switches carry no occurrence count and no variables of their own. Once
//! enabled a switch stays enabled until the whole session is reset.

use indexmap::IndexSet;

#[derive(Debug, Clone, Default)]
pub struct SwitchRegistry {
    enabled: IndexSet<String>,
}

impl SwitchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable `name`; returns false if it was already enabled
    pub fn enable(&mut self, name: &str) -> bool {
        if self.enabled.contains(name) {
            return false;
        }
        self.enabled.insert(name.to_string())
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    pub fn clear(&mut self) {
        self.enabled.clear();
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}
