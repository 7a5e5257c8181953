// src/normalizer/mod.rs

use unicode_segmentation::UnicodeSegmentation;

pub mod lemmatizer;
pub mod stopwords;

use lemmatizer::{Lemmatizer, NounLemmatizer};
use stopwords::is_stopword;

/// Tokenizes, lemmatizes and strips stopwords from text documents.
#[derive(Debug, Clone, Default)]
pub struct Normalizer<L = NounLemmatizer> {
    lemmatizer: L,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: Lemmatizer> Normalizer<L> {
    /// Normalizes each document independently; output order follows input order.
    pub fn normalize<S: AsRef<str>>(&self, docs: &[S]) -> Vec<String> {
        docs.iter().map(|doc| self.normalize_document(doc.as_ref())).collect()
    }

    /// Surviving tokens in their original order, joined by single spaces.
    /// A document with no surviving tokens yields an empty string.
    pub fn normalize_document(&self, text: &str) -> String {
        let tokens: Vec<String> = text
            .unicode_words()
            .filter_map(|token| {
                if is_stopword(&token.to_lowercase()) {
                    return None;
                }
                let lemma = self.lemmatizer.lemmatize(token);
                if is_stopword(&lemma.to_lowercase()) {
                    return None;
                }
                Some(lemma.into_owned())
            })
            .collect();
        tokens.join(" ")
    }
}
