// src/test_support.rs

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::FetchError;
use crate::extractor::{EmptyReason, Extraction, PageSource, PageText};

/// Words every fake gambling page is built from.
pub const GAMBLING_WORDS: [&str; 25] = [
    "casino", "bet", "jackpot", "slot", "poker", "roulette", "bonus", "spin", "wager", "odds",
    "blackjack", "deposit", "payout", "bookmaker", "lottery", "baccarat", "stake", "prize",
    "cashback", "freespin", "sportsbook", "tournament", "withdrawal", "gamble", "reel",
];

/// Words unrelated to gambling.
pub const NEUTRAL_WORDS: [&str; 25] = [
    "garden", "recipe", "history", "river", "mountain", "library", "painting", "violin",
    "science", "weather", "bicycle", "kitchen", "forest", "museum", "planet", "baker",
    "harbor", "castle", "pencil", "blanket", "window", "orchard", "meadow", "lantern", "canyon",
];

/// A page text made of the first `gambling` gambling words and the first
/// `neutral` neutral words.
pub fn page_text(gambling: usize, neutral: usize) -> String {
    GAMBLING_WORDS[..gambling]
        .iter()
        .chain(NEUTRAL_WORDS[..neutral].iter())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Serves canned page texts; unknown URLs behave like a 404.
#[derive(Default)]
pub struct StaticPages {
    pages: HashMap<String, String>,
}

impl StaticPages {
    pub fn with(mut self, url: &str, text: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), text.into());
        self
    }
}

#[async_trait]
impl PageSource for StaticPages {
    async fn extract(&self, url: &str) -> Extraction {
        match self.pages.get(url) {
            Some(text) => match PageText::new(text.clone()) {
                Some(page) => Extraction::Text(page),
                None => Extraction::Empty(EmptyReason::NoVisibleText),
            },
            None => Extraction::Empty(EmptyReason::Fetch(FetchError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            })),
        }
    }
}
