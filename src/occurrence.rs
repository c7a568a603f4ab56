//! Occurrence tracking for nested sections
//!
//! Every assignment of a section creates a new occurrence of its leaf. The
//! tracker stores how many occurrences each section path has, keyed by the
//! path with every ancestor qualified by its current loop index:
//!
//! ```text
//! .one            -> 2
//! .one{1}.two     -> 1
//! .one{2}.two     -> 3
//! ```
//!
//! Assigning `one.two` before `one` was ever assigned opens `one` once. An
//! ancestor is only incremented by its own assignment.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static LOOP_SUFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[0-9]+\}").expect("Invalid loop suffix regex"));

/// Occurrence counts per qualified section path
#[derive(Debug, Clone, Default)]
pub struct OccurrenceTracker {
    counts: IndexMap<String, usize>,
}

impl OccurrenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new occurrence of the leaf of `path`
    ///
    /// Ancestors without an occurrence are opened with one. Returns the fully
    /// qualified occurrence path of the new leaf, e.g. `.one{1}.two{3}`, which
    /// is the key for the variables of this occurrence.
    pub fn open_leaf(&mut self, path: &str) -> String {
        let mut qualified = String::with_capacity(path.len() + 8);
        let mut segments = path.trim_start_matches('.').split('.').peekable();

        while let Some(segment) = segments.next() {
            qualified.push('.');
            qualified.push_str(segment);

            let count = if segments.peek().is_none() {
                let count = self.counts.entry(qualified.clone()).or_insert(0);
                *count += 1;
                *count
            } else {
                *self.counts.entry(qualified.clone()).or_insert(1)
            };

            qualified.push_str(&format!("{{{}}}", count));
        }

        qualified
    }

    /// Number of occurrences recorded for a rooted path like `.one{1}.two`
    pub fn count(&self, path: &str) -> Option<usize> {
        self.counts.get(path).copied()
    }

    /// Whether some tracked path is `path` with any loop indexes between
    /// segments
    ///
    /// `is_assigned("one.two")` is true once `.one{1}.two` or `.one{4}.two` is
    /// tracked.
    pub fn is_assigned(&self, path: &str) -> bool {
        let wanted = format!(".{}", path.trim_start_matches('.'));
        self.counts
            .keys()
            .any(|key| LOOP_SUFFIX_REGEX.replace_all(key, "") == wanted)
    }

    /// Forget `path` and every occurrence below it; returns how many entries
    /// were removed
    pub fn remove_section(&mut self, path: &str) -> usize {
        let Some(matcher) = section_matcher(path) else {
            return 0;
        };
        let before = self.counts.len();
        self.counts.retain(|key, _| !matcher.is_match(key));
        before - self.counts.len()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Matcher for a section path, its loop-indexed occurrences and everything
/// below them
///
/// Loop indexes of intermediate segments are wildcards, so `one.two` matches
/// `.one{3}.two`, `.one{3}.two{1}` and `.one{3}.two{1}.three`, but not
/// `.one{3}.twofold`.
pub(crate) fn section_matcher(path: &str) -> Option<Regex> {
    let path = path.trim_start_matches('.');
    if path.is_empty() {
        return None;
    }

    let body = path
        .split('.')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"(?:\{[0-9]+\})?\.");
    let pattern = format!(r"^\.{}(?:\{{.*)?$", body);

    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            log::debug!("invalid section path '{}': {}", path, err);
            None
        }
    }
}
