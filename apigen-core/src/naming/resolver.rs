//! Type name assignment and collision resolution.

use std::collections::{HashMap, HashSet};

use super::sanitize::{self, url_class_name, with_suffix, without_suffix};
use super::translate::Translator;
use crate::endpoint::{EndpointDescriptor, EndpointKey};
use crate::ir::Direction;

/// Title fragments that never contribute to a class name.
const TITLE_NOISE: [&str; 5] = ["-克隆", "-副本", "-复制", "API", "接口"];

/// Deepest URL suffix tried while disambiguating.
pub const MAX_URL_DEPTH: usize = 5;

/// A candidate name plus the URL used to disambiguate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCandidate {
    pub url: String,
    pub name: String,
}

impl NameCandidate {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// Resolved names for one direction of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameAssignment {
    entries: Vec<(EndpointKey, String)>,
    index: HashMap<EndpointKey, usize>,
}

impl NameAssignment {
    fn push(&mut self, key: EndpointKey, name: String) {
        if let Some(&pos) = self.index.get(&key) {
            self.entries[pos].1 = name;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, name));
        }
    }

    pub fn get(&self, key: &EndpointKey) -> Option<&str> {
        self.index.get(key).map(|&pos| self.entries[pos].1.as_str())
    }

    /// Assignments in endpoint order.
    pub fn iter(&self) -> impl Iterator<Item = (&EndpointKey, &str)> {
        self.entries.iter().map(|(k, n)| (k, n.as_str()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, n)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Assigns class names for a target language.
///
/// Holds the target's type suffix and reserved words, plus the translator
/// and its cache. One resolver serves one run.
#[derive(Debug)]
pub struct NameResolver {
    suffix: String,
    keywords: &'static [&'static str],
    translator: Translator,
}

impl NameResolver {
    pub fn new(
        suffix: impl Into<String>,
        keywords: &'static [&'static str],
        translator: Translator,
    ) -> Self {
        Self {
            suffix: suffix.into(),
            keywords,
            translator,
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Sanitize free text into a class name (no suffix).
    pub fn sanitize_class_name(&mut self, text: &str) -> String {
        sanitize::sanitize_class_name(text, &mut self.translator, self.keywords)
    }

    /// Folder name for a category.
    pub fn category_folder(&mut self, category: &str) -> String {
        sanitize::category_folder(category, &mut self.translator)
    }

    /// Name for an object nested under `base`, seeded by its field name.
    pub fn nested_name(&mut self, field: Option<&str>, base: &str) -> String {
        match field.filter(|f| !f.is_empty()) {
            Some(field) => {
                let name = self.sanitize_class_name(field);
                with_suffix(&name, &self.suffix)
            }
            None => format!("{}Item{}", without_suffix(base, &self.suffix), self.suffix),
        }
    }

    /// First-pass name for one endpoint.
    pub fn candidate(&mut self, url: &str, title: &str, direction: Direction) -> String {
        let name = url_class_name(url, 1)
            .or_else(|| self.title_name(title, direction))
            .unwrap_or_else(|| default_name(direction).to_string());
        with_suffix(&name, &self.suffix)
    }

    fn title_name(&mut self, title: &str, direction: Direction) -> Option<String> {
        let cleaned = TITLE_NOISE
            .iter()
            .fold(title.to_string(), |acc, noise| acc.replace(noise, ""));
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return None;
        }

        let mut name = self.sanitize_class_name(cleaned);
        match direction {
            Direction::Response => {
                if let Some(stripped) = name.strip_suffix("Response") {
                    name = stripped.to_string();
                }
            }
            Direction::Request => {
                if !name.ends_with("Request") {
                    name.push_str("Request");
                }
            }
        }

        (!name.is_empty()).then_some(name)
    }

    /// Resolve collisions between candidates, returning one name per input
    /// in the same order.
    ///
    /// Members of a colliding group try URL depths `2..=MAX_URL_DEPTH` and
    /// take the first name that no other URL-bearing member shares at that
    /// depth and that no other candidate already holds. Members without a
    /// URL, or with no usable depth, fall back to `<base><n>` where `n`
    /// starts at their position in the group and increases until free.
    pub fn resolve(&self, candidates: &[NameCandidate]) -> Vec<String> {
        let mut resolved: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();

        let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
        for (idx, candidate) in candidates.iter().enumerate() {
            match groups.iter_mut().find(|(name, _)| *name == candidate.name) {
                Some((_, members)) => members.push(idx),
                None => groups.push((candidate.name.as_str(), vec![idx])),
            }
        }

        let mut taken: HashSet<String> = groups
            .iter()
            .filter(|(_, members)| members.len() == 1)
            .map(|(name, _)| name.to_string())
            .collect();

        for (group_name, members) in groups.iter().filter(|(_, m)| m.len() > 1) {
            tracing::debug!(name = %group_name, members = members.len(), "resolving name collision");
            let base = without_suffix(group_name, &self.suffix);

            for (position, &idx) in members.iter().enumerate() {
                let url = candidates[idx].url.trim();
                let by_depth = if url.is_empty() {
                    None
                } else {
                    self.unique_depth_name(candidates, members, idx, &taken)
                };

                let name = by_depth.unwrap_or_else(|| {
                    if !url.is_empty() {
                        tracing::debug!(name = %group_name, url = %url, "collision depths exhausted");
                    }
                    (position + 1..)
                        .map(|n| format!("{}{}{}", base, n, self.suffix))
                        .find(|name| !taken.contains(name))
                        .unwrap_or_default()
                });
                taken.insert(name.clone());
                resolved[idx] = name;
            }
        }

        resolved
    }

    fn unique_depth_name(
        &self,
        candidates: &[NameCandidate],
        members: &[usize],
        idx: usize,
        taken: &HashSet<String>,
    ) -> Option<String> {
        let depth_name = |url: &str, depth: usize| {
            let url = url.trim();
            if url.is_empty() {
                return None;
            }
            url_class_name(url, depth).map(|n| with_suffix(&n, &self.suffix))
        };

        (2..=MAX_URL_DEPTH).find_map(|depth| {
            let name = depth_name(candidates[idx].url.as_str(), depth)?;
            if taken.contains(&name) {
                return None;
            }
            let shared = members
                .iter()
                .filter(|&&other| other != idx)
                .any(|&other| {
                    depth_name(candidates[other].url.as_str(), depth).as_deref() == Some(name.as_str())
                });
            (!shared).then_some(name)
        })
    }

    /// Name every endpoint for one direction: candidate pass then
    /// collision pass.
    pub fn assign(&mut self, direction: Direction, endpoints: &[&EndpointDescriptor]) -> NameAssignment {
        let candidates: Vec<NameCandidate> = endpoints
            .iter()
            .map(|e| NameCandidate::new(e.url.clone(), self.candidate(&e.url, &e.title, direction)))
            .collect();

        let mut assignment = NameAssignment::default();
        for (endpoint, name) in endpoints.iter().zip(self.resolve(&candidates)) {
            assignment.push(endpoint.key(), name);
        }
        assignment
    }
}

fn default_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Response => "Data",
        Direction::Request => "Request",
    }
}
