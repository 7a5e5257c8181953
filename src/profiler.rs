// src/profiler.rs

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::extractor::{PageSource, PageText};
use crate::normalizer::Normalizer;

pub const DEFAULT_DELIMITER: char = ' ';

/// A word and how many times it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Most frequent words of a corpus, by descending count. Ties keep the order
/// in which the words were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyProfile {
    entries: Vec<WordCount>,
}

impl FrequencyProfile {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[WordCount] {
        &self.entries
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.word.as_str())
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for FrequencyProfile {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut entries: Vec<WordCount> = iter
            .into_iter()
            .map(|(word, count)| WordCount { word: word.into(), count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Self { entries }
    }
}

/// An arbitrarily nested sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T> {
    Item(T),
    List(Vec<Nested<T>>),
}

/// Flattens nested sequences depth-first, keeping element order. Uses an
/// explicit stack, so nesting depth is bounded only by memory.
pub fn flatten<T>(items: Vec<Nested<T>>) -> Vec<T> {
    let mut flat = Vec::new();
    let mut stack = vec![items.into_iter()];
    while let Some(top) = stack.last_mut() {
        match top.next() {
            Some(Nested::Item(item)) => flat.push(item),
            Some(Nested::List(list)) => stack.push(list.into_iter()),
            None => {
                stack.pop();
            }
        }
    }
    flat
}

/// Counts every `delimiter`-separated token across `docs` and keeps the
/// `limit` most frequent. Empty tokens are not words and are not counted.
pub fn profile<S: AsRef<str>>(docs: &[S], limit: usize, delimiter: char) -> FrequencyProfile {
    let nested: Vec<Nested<&str>> = docs
        .iter()
        .map(|doc| Nested::List(doc.as_ref().split(delimiter).map(Nested::Item).collect()))
        .collect();

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<WordCount> = Vec::new();
    for token in flatten(nested) {
        if token.is_empty() {
            continue;
        }
        match positions.get(token) {
            Some(&index) => entries[index].count += 1,
            None => {
                positions.insert(token, entries.len());
                entries.push(WordCount { word: token.to_string(), count: 1 });
            }
        }
    }

    // Stable, so equal counts stay in first-seen order.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(limit);
    FrequencyProfile { entries }
}

/// Runs one page through extraction, normalization and profiling.
pub struct PageProfiler<'a, P> {
    source: &'a P,
    normalizer: Normalizer,
    limit: usize,
}

impl<'a, P: PageSource + Sync> PageProfiler<'a, P> {
    pub fn new(source: &'a P, limit: usize) -> Self {
        Self { source, normalizer: Normalizer::new(), limit }
    }

    pub fn source(&self) -> &'a P {
        self.source
    }

    /// Fetches `url` and profiles it as a single-document corpus. An empty
    /// extraction is an error here.
    pub async fn profile_url(&self, url: &str) -> Result<FrequencyProfile> {
        let page = self.source.extract(url).await.into_page()?;
        Ok(self.profile_page(&page))
    }

    pub fn profile_page(&self, page: &PageText) -> FrequencyProfile {
        let normalized = self.normalizer.normalize(&[page.as_str()]);
        let profile = profile(&normalized, self.limit, DEFAULT_DELIMITER);
        debug!("Profiled page into {} distinct words", profile.len());
        profile
    }
}
