// src/normalizer/lemmatizer.rs

use std::borrow::Cow;

/// Maps a word to its dictionary base form.
pub trait Lemmatizer {
    fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str>;
}

/// Plurals that suffix rules get wrong.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("buses", "bus"),
    ("gases", "gas"),
    ("crises", "crisis"),
    ("analyses", "analysis"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("bookies", "bookie"),
    ("freebies", "freebie"),
    ("rookies", "rookie"),
    ("selfies", "selfie"),
    ("ties", "tie"),
    ("lies", "lie"),
    ("pies", "pie"),
    ("heroes", "hero"),
    ("potatoes", "potato"),
];

/// Words ending in `s` that are already a base form.
const BASE_FORMS: &[&str] = &[
    "news", "odds", "series", "species", "means", "always", "perhaps", "sometimes", "towards",
    "afterwards", "besides", "thanks", "whereas", "christmas", "canvas", "lens", "chaos",
];

/// Rule-based English noun lemmatizer: an exception table followed by the
/// usual plural suffix rules (`-ies`, `-ches`, `-shes`, `-sses`, `-xes`,
/// `-zzes`, `-uses`, `-s`). Apart from listed exceptions, tokens of three
/// characters or fewer and tokens containing digits are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NounLemmatizer;

impl Lemmatizer for NounLemmatizer {
    fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if let Some((_, lemma)) = IRREGULAR_NOUNS.iter().find(|(plural, _)| *plural == word) {
            return Cow::Borrowed(*lemma);
        }
        if word.chars().count() <= 3 || word.chars().any(|c| c.is_numeric()) {
            return Cow::Borrowed(word);
        }
        if BASE_FORMS.contains(&word) {
            return Cow::Borrowed(word);
        }
        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return Cow::Borrowed(word);
        }

        if let Some(stem) = word.strip_suffix("ies") {
            if stem.chars().count() > 1 {
                return Cow::Owned(format!("{}y", stem));
            }
        }
        for suffix in ["ches", "shes", "sses", "xes", "zzes"] {
            if word.ends_with(suffix) {
                return Cow::Borrowed(&word[..word.len() - 2]);
            }
        }
        if let Some(stem) = word.strip_suffix("es") {
            // bonuses -> bonus, but houses -> house
            if stem.ends_with("us") && stem.chars().count() >= 5 {
                return Cow::Borrowed(stem);
            }
        }
        match word.strip_suffix('s') {
            Some(stem) => Cow::Borrowed(stem),
            None => Cow::Borrowed(word),
        }
    }
}
