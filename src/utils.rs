//! String and regex helpers shared by the segmenter and renderer

use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use regex::Regex;

/// Cache for compiled regular expressions
#[derive(Debug)]
pub struct RegexCache {
    cache: HashMap<String, Regex>,
    max_size: usize,
}

impl RegexCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::new(),
            max_size: max_size.max(1),
        }
    }

    /// Get or compile a regex pattern
    pub fn get_or_compile(&mut self, pattern: &str) -> Result<&Regex, regex::Error> {
        if self.cache.len() >= self.max_size && !self.cache.contains_key(pattern) {
            // Simple eviction: clear half the cache
            let keys_to_remove: Vec<_> = self
                .cache
                .keys()
                .take(self.cache.len().div_ceil(2))
                .cloned()
                .collect();
            for key in keys_to_remove {
                self.cache.remove(&key);
            }
        }

        match self.cache.entry(pattern.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(Regex::new(pattern)?)),
        }
    }
}

/// Replace every occurrence of each key with its value, one key after another
///
/// Keys are applied in iteration order against the output of the previous
/// replacement. Returns the input borrowed when nothing matched.
pub fn replace_multiple_cow<'a, I, K, V>(text: &'a str, replacements: I) -> Cow<'a, str>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut result = Cow::Borrowed(text);
    for (search, replace) in replacements {
        let search = search.as_ref();
        if search.is_empty() || !result.contains(search) {
            continue;
        }
        result = Cow::Owned(result.replace(search, replace.as_ref()));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_multiple_cow() {
        let text = "Hello {name} and {other}, {name}";
        let replacements = vec![("{name}", "World"), ("{other}", "Universe")];

        let result = replace_multiple_cow(text, replacements.iter().copied());
        assert_eq!(result, "Hello World and Universe, World");

        let text = "No variables here";
        let result = replace_multiple_cow(text, replacements.iter().copied());
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_replace_is_sequential() {
        // A value that contains a later key is replaced again.
        let replacements = vec![("{a}", "{b}"), ("{b}", "B")];
        assert_eq!(replace_multiple_cow("{a}", replacements), "B");

        let replacements = vec![("{b}", "B"), ("{a}", "{b}")];
        assert_eq!(replace_multiple_cow("{a}", replacements), "{b}");
    }

    #[test]
    fn test_replace_ignores_empty_keys() {
        let replacements = vec![("", "x")];
        assert_eq!(replace_multiple_cow("abc", replacements), "abc");
    }

    #[test]
    fn test_regex_cache() {
        let mut cache = RegexCache::new(2);

        assert!(cache.get_or_compile(r"\d+").unwrap().is_match("42"));
        assert_eq!(cache.cache.len(), 1);

        assert!(cache.get_or_compile(r"[a-z]+").unwrap().is_match("abc"));
        assert_eq!(cache.cache.len(), 2);

        // Reusing a pattern does not grow the cache
        assert!(!cache.get_or_compile(r"\d+").unwrap().is_match("abc"));
        assert_eq!(cache.cache.len(), 2);

        // Third pattern triggers eviction
        assert!(cache.get_or_compile(r"[A-Z]+").unwrap().is_match("ABC"));
        assert!(cache.cache.len() <= 2);

        assert!(cache.get_or_compile("(").is_err());
    }
}
