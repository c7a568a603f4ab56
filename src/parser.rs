//! Template segmentation
//!
//! A template body is split into literal runs and delimited blocks:
//!
//! ```text
//! <!-- BEGIN name -->body<!-- END name -->
//! <!-- SWITCH name -->body<!-- END name -->
//! ```
//!
//! A block ends at the first end marker carrying the same name, so one pass
//! only sees the outermost blocks. Blocks nested inside a body are found when
//! the renderer segments that body in turn. Keywords match in any case, names
//! match exactly.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cache::{Cache, CacheStats, EvictionStrategy};
use crate::utils::RegexCache;

static BLOCK_START_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<!-- (BEGIN|SWITCH) (.+?) -->").expect("Invalid block start regex")
});

const END_MARKER_CACHE_SIZE: usize = 256;

/// Kind of a delimited block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Repeatable, rendered once per assigned occurrence
    Section,
    /// Rendered once when enabled, never otherwise
    Switch,
}

/// One token of a segmented template body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Block {
        kind: BlockKind,
        name: String,
        body: String,
    },
}

/// Splits template bodies into segments, caching by body text
///
/// Sibling iterations of a loop share byte-identical bodies, so each distinct
/// body is only split once per session.
#[derive(Debug)]
pub struct Segmenter {
    cache: Cache<String, Arc<[Segment]>>,
    end_markers: RegexCache,
}

impl Segmenter {
    pub fn new(cache_size: usize, eviction_strategy: EvictionStrategy) -> Self {
        Self {
            cache: Cache::new(cache_size, eviction_strategy),
            end_markers: RegexCache::new(END_MARKER_CACHE_SIZE),
        }
    }

    /// Segments of `body`, from the cache when this exact text was seen before
    pub fn segment(&mut self, body: &str) -> Arc<[Segment]> {
        if let Some(segments) = self.cache.get(body) {
            log::trace!("segment cache hit ({} bytes)", body.len());
            return segments;
        }

        let segments: Arc<[Segment]> = self.split(body).into();
        self.cache.insert(body.to_string(), Arc::clone(&segments));
        segments
    }

    /// Split `body` into segments without consulting the cache
    pub fn split(&mut self, body: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut search_from = 0;

        while let Some(caps) = BLOCK_START_REGEX.captures_at(body, search_from) {
            let (Some(start), Some(keyword), Some(name)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                break;
            };

            let Some((end_start, end_end)) = self.find_end_marker(body, start.end(), name.as_str())
            else {
                // No closing marker: the start marker stays literal text
                search_from = start.end();
                continue;
            };

            if start.start() > literal_start {
                segments.push(Segment::Literal(body[literal_start..start.start()].to_string()));
            }

            let kind = if keyword.as_str().eq_ignore_ascii_case("SWITCH") {
                BlockKind::Switch
            } else {
                BlockKind::Section
            };
            segments.push(Segment::Block {
                kind,
                name: name.as_str().to_string(),
                body: body[start.end()..end_start].to_string(),
            });

            literal_start = end_end;
            search_from = end_end;
        }

        if literal_start < body.len() {
            segments.push(Segment::Literal(body[literal_start..].to_string()));
        }

        segments
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn find_end_marker(&mut self, body: &str, from: usize, name: &str) -> Option<(usize, usize)> {
        let pattern = format!("(?i:<!-- END ){} -->", regex::escape(name));
        let regex = match self.end_markers.get_or_compile(&pattern) {
            Ok(regex) => regex,
            Err(err) => {
                log::debug!("cannot build end marker for block '{}': {}", name, err);
                return None;
            }
        };
        regex.find_at(body, from).map(|m| (m.start(), m.end()))
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(512, EvictionStrategy::LRU)
    }
}
