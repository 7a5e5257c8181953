// src/classifier/mod.rs

use std::fmt;

use tracing::{debug, warn};
use whatlang::Lang;

pub mod calibrator;

use crate::config::ClassifierConfig;
use crate::error::{ClassifyError, Result};
use crate::extractor::{PageSource, PageText};
use crate::fingerprint::ReferenceFingerprint;
use crate::profiler::{FrequencyProfile, PageProfiler};

/// Share of a profile's words that also appear in the fingerprint, kept as
/// the exact fraction it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapRatio {
    matched: usize,
    total: usize,
}

impl OverlapRatio {
    pub fn new(matched: usize, total: usize) -> Result<Self> {
        if total == 0 {
            return Err(ClassifyError::EmptyProfile);
        }
        Ok(Self { matched: matched.min(total), total })
    }

    pub fn value(&self) -> f64 {
        self.matched as f64 / self.total as f64
    }
}

impl fmt::Display for OverlapRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} ({}/{})", self.value(), self.matched, self.total)
    }
}

/// Fraction of `profile` words found in `fingerprint`. Fails on an empty profile.
pub fn score(
    profile: &FrequencyProfile,
    fingerprint: &ReferenceFingerprint,
) -> Result<OverlapRatio> {
    let matched = profile.words().filter(|word| fingerprint.contains(word)).count();
    OverlapRatio::new(matched, profile.len())
}

/// Minimum overlap ratio a page must exceed to count as a gambling site.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// Returned when calibration could not run. Never a real decision boundary.
    pub const NEUTRAL: Threshold = Threshold(0.0);

    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ClassifyError::InvalidConfig(format!(
                "threshold must be within [0, 1], got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_neutral(&self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Gambling,
    NonGambling,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Gambling => f.write_str("Gambling site"),
            Label::NonGambling => f.write_str("Non-Gambling site"),
        }
    }
}

/// Strictly greater than the threshold means gambling.
pub fn decide(ratio: OverlapRatio, threshold: Threshold) -> Label {
    if ratio.value() > threshold.value() {
        Label::Gambling
    } else {
        Label::NonGambling
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Label,
    pub ratio: OverlapRatio,
    pub threshold: Threshold,
}

/// Labels pages by comparing their frequency profile to the reference fingerprint.
pub struct Classifier<'a, P> {
    profiler: PageProfiler<'a, P>,
    fingerprint: &'a ReferenceFingerprint,
    config: &'a ClassifierConfig,
}

impl<'a, P: PageSource + Sync> Classifier<'a, P> {
    pub fn new(
        source: &'a P,
        fingerprint: &'a ReferenceFingerprint,
        config: &'a ClassifierConfig,
    ) -> Self {
        Self {
            profiler: PageProfiler::new(source, config.profile_limit),
            fingerprint,
            config,
        }
    }

    pub fn profiler(&self) -> &PageProfiler<'a, P> {
        &self.profiler
    }

    pub fn fingerprint(&self) -> &ReferenceFingerprint {
        self.fingerprint
    }

    /// Profiles with fewer than `min_profile_len` words are rejected rather
    /// than scored.
    pub fn check_signal(&self, profile: &FrequencyProfile) -> Result<()> {
        if profile.is_empty() {
            return Err(ClassifyError::EmptyProfile);
        }
        if profile.len() < self.config.min_profile_len {
            return Err(ClassifyError::InsufficientSignal {
                len: profile.len(),
                min: self.config.min_profile_len,
            });
        }
        Ok(())
    }

    /// Fetches and labels one page. Performs a single network request.
    pub async fn classify(&self, url: &str, threshold: Threshold) -> Result<Classification> {
        let page = self.profiler.source().extract(url).await.into_page()?;
        self.classify_page(&page, threshold)
    }

    pub fn classify_page(&self, page: &PageText, threshold: Threshold) -> Result<Classification> {
        if let Some(lang) = page.language() {
            if lang != Lang::Eng {
                warn!(
                    "Page language looks like {}, English word lists may not fit",
                    lang.eng_name()
                );
            }
        }

        let profile = self.profiler.profile_page(page);
        self.check_signal(&profile)?;
        let ratio = score(&profile, self.fingerprint)?;
        let label = decide(ratio, threshold);
        debug!("Overlap {} against threshold {} -> {}", ratio, threshold, label);

        Ok(Classification { label, ratio, threshold })
    }
}
