//! Offline translation of category and title text into identifier tokens.
//!
//! Documentation titles are frequently written in Chinese. Without network
//! access the only source of English words is a [`Glossary`]; anything it
//! cannot cover collapses to `item`.

use std::num::NonZeroUsize;
use std::sync::LazyLock;

use lru::LruCache;
use regex::Regex;

/// Characters outside `[\w-]`.
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-]").expect("Invalid non-word regex"));

/// Token used when nothing usable survives translation.
pub const FALLBACK_TOKEN: &str = "item";

/// Default translation cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 512;

/// Phrase table mapping CJK phrases to ASCII words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glossary {
    /// Entries sorted longest phrase first.
    entries: Vec<(String, String)>,
}

impl Default for Glossary {
    fn default() -> Self {
        Self::from_pairs([
            ("新接口", "newapi"),
            ("应用", "app"),
            ("接口", "api"),
            ("根目录", "root"),
            ("默认", "default"),
        ])
    }
}

impl Glossary {
    /// Glossary with no entries.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut glossary = Self::empty();
        glossary.extend(pairs);
        glossary
    }

    /// Add or replace phrases.
    pub fn extend<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (phrase, word) in pairs {
            let phrase = phrase.into();
            let word = word.into();
            if phrase.is_empty() {
                continue;
            }
            match self.entries.iter_mut().find(|(p, _)| *p == phrase) {
                Some(entry) => entry.1 = word,
                None => self.entries.push((phrase, word)),
            }
        }
        self.entries
            .sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    }

    /// Exact phrase lookup.
    pub fn lookup(&self, phrase: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == phrase)
            .map(|(_, w)| w.as_str())
    }

    /// Replace every known phrase occurring in `text`, longest first.
    pub fn substitute(&self, text: &str) -> String {
        self.entries
            .iter()
            .fold(text.to_string(), |acc, (phrase, word)| acc.replace(phrase.as_str(), word))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Bounded memo of translation results.
///
/// Owned by a single resolver; there is no process-wide cache.
pub struct NameCache {
    entries: LruCache<String, String>,
}

impl NameCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.put(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for NameCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameCache")
            .field("len", &self.entries.len())
            .field("cap", &self.entries.cap())
            .finish()
    }
}

/// Glossary-backed translator with a memo cache.
#[derive(Debug)]
pub struct Translator {
    glossary: Glossary,
    cache: NameCache,
}

impl Translator {
    pub fn new(glossary: Glossary, cache_capacity: usize) -> Self {
        Self {
            glossary,
            cache: NameCache::new(cache_capacity),
        }
    }

    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    pub fn cache(&self) -> &NameCache {
        &self.cache
    }

    /// Translate `text` into an identifier-safe token.
    ///
    /// Empty input yields an empty string. Text without CJK characters is
    /// only stripped of non-word characters.
    pub fn translate(&mut self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        if let Some(hit) = self.cache.get(text) {
            return hit;
        }

        let result = self.translate_uncached(text);
        tracing::trace!(input = %text, output = %result, "translated");
        self.cache.put(text, result.clone());
        result
    }

    fn translate_uncached(&self, text: &str) -> String {
        if !contains_cjk(text) {
            let stripped = NON_WORD_RE.replace_all(text, "").into_owned();
            return if stripped.is_empty() {
                FALLBACK_TOKEN.to_string()
            } else {
                stripped
            };
        }

        if let Some(word) = self.glossary.lookup(text) {
            return word.to_lowercase();
        }

        let substituted = self.glossary.substitute(text);
        let stripped = NON_WORD_RE.replace_all(&substituted, "");
        if stripped.is_empty() || !stripped.is_ascii() {
            FALLBACK_TOKEN.to_string()
        } else {
            stripped.to_lowercase()
        }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Glossary::default(), DEFAULT_CACHE_CAPACITY)
    }
}

/// Whether `text` contains CJK unified ideographs.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}
