// src/fingerprint/builder.rs

use tracing::{info, warn};

use crate::extractor::{Extraction, PageSource};
use crate::normalizer::Normalizer;
use crate::profiler::{profile, FrequencyProfile, DEFAULT_DELIMITER};
use crate::training::TrainingSet;

/// Profiles a whole corpus of known gambling sites as one document set.
/// The result is what gets persisted as the fingerprint table.
pub async fn build_reference_profile<P: PageSource + Sync>(
    source: &P,
    normalizer: &Normalizer,
    corpus: &TrainingSet,
    limit: usize,
) -> FrequencyProfile {
    let mut texts = Vec::with_capacity(corpus.len());
    for url in corpus.urls() {
        info!("Fetching: {}", url);
        match source.extract(url).await {
            Extraction::Text(page) => texts.push(page.into_string()),
            Extraction::Empty(reason) => warn!("  > [SKIP] {}: {}", url, reason),
        }
    }

    info!("Collected text from {} of {} pages", texts.len(), corpus.len());
    let normalized = normalizer.normalize(&texts);
    profile(&normalized, limit, DEFAULT_DELIMITER)
}
