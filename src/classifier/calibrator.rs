// src/classifier/calibrator.rs

use std::path::Path;

use tracing::{error, info, warn};

use super::{score, Classifier, Threshold};
use crate::error::Result;
use crate::extractor::PageSource;
use crate::training::TrainingSet;

/// Result of replaying the scorer over a training set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub threshold: Threshold,
    /// URLs whose overlap ratio went into the average.
    pub scored: usize,
    /// URLs excluded because their profile was empty or too small.
    pub skipped: usize,
}

/// Average overlap ratio of the known gambling sites in `training`.
///
/// Each URL is fetched and profiled on its own, one after another. URLs whose
/// profile is shorter than `min_profile_len` are counted as skipped and left
/// out of the average.
pub async fn calibrate<P: PageSource + Sync>(
    classifier: &Classifier<'_, P>,
    training: &TrainingSet,
) -> Calibration {
    let mut total = 0.0;
    let mut scored = 0;
    let mut skipped = 0;

    for url in training.urls() {
        let ratio = match classifier.profiler().profile_url(url).await {
            Ok(profile) => classifier
                .check_signal(&profile)
                .and_then(|_| score(&profile, classifier.fingerprint())),
            Err(e) => Err(e),
        };

        match ratio {
            Ok(ratio) => {
                info!("  > {} shares {} of its top words", url, ratio);
                total += ratio.value();
                scored += 1;
            }
            Err(e) => {
                warn!("  > [SKIP] {}: {}", url, e);
                skipped += 1;
            }
        }
    }

    let threshold = Threshold(total / scored.max(1) as f64);
    info!(
        "Calibrated threshold {} from {} sites ({} skipped)",
        threshold, scored, skipped
    );
    Calibration { threshold, scored, skipped }
}

/// Reads the training set at `path` and calibrates against it.
pub async fn calibrate_file<P: PageSource + Sync>(
    classifier: &Classifier<'_, P>,
    path: &Path,
) -> Result<Calibration> {
    let training = TrainingSet::from_file(path)?;
    if training.is_empty() {
        warn!("{} lists no training URLs", path.display());
    }
    info!("Calibrating against {} training URLs from {}", training.len(), path.display());
    Ok(calibrate(classifier, &training).await)
}

/// The calibrated threshold, or `Threshold::NEUTRAL` when calibration failed.
pub fn threshold_or_neutral(result: &Result<Calibration>) -> Threshold {
    match result {
        Ok(calibration) => calibration.threshold,
        Err(_) => Threshold::NEUTRAL,
    }
}

/// Threshold to classify with after a calibration attempt. A neutral result
/// means calibration did not run, so `configured` is used instead.
pub fn effective_threshold(result: &Result<Calibration>, configured: Threshold) -> Threshold {
    if let Err(e) = result {
        error!("{}", e);
    }
    let calibrated = threshold_or_neutral(result);
    if calibrated.is_neutral() {
        warn!("Calibration did not run, using the configured threshold {}", configured);
        configured
    } else {
        calibrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::fingerprint::ReferenceFingerprint;
    use crate::test_support::{page_text, StaticPages, GAMBLING_WORDS};

    fn fingerprint() -> ReferenceFingerprint {
        GAMBLING_WORDS.iter().copied().collect()
    }

    #[tokio::test]
    async fn low_signal_pages_are_left_out_of_the_average() {
        // Four usable pages with 20/25, 15/25, 10/25 and 5/25 fingerprint words,
        // and one page that profiles to only 8 words.
        let pages = StaticPages::default()
            .with("https://a.example", page_text(20, 5))
            .with("https://b.example", page_text(15, 10))
            .with("https://c.example", page_text(10, 15))
            .with("https://d.example", page_text(5, 20))
            .with("https://e.example", page_text(4, 4));
        let training = TrainingSet::parse(
            "https://a.example\nhttps://b.example\nhttps://c.example\nhttps://d.example\nhttps://e.example\n",
        );
        let config = ClassifierConfig::default();
        let fingerprint = fingerprint();
        let classifier = Classifier::new(&pages, &fingerprint, &config);

        let calibration = calibrate(&classifier, &training).await;

        assert_eq!(calibration.scored, 4);
        assert_eq!(calibration.skipped, 1);
        let expected = (0.8 + 0.6 + 0.4 + 0.2) / 4.0;
        assert!((calibration.threshold.value() - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn unreachable_pages_are_skipped() {
        let pages = StaticPages::default().with("https://a.example", page_text(20, 5));
        let training = TrainingSet::parse("https://a.example\nhttps://missing.example\n");
        let config = ClassifierConfig::default();
        let fingerprint = fingerprint();
        let classifier = Classifier::new(&pages, &fingerprint, &config);

        let calibration = calibrate(&classifier, &training).await;

        assert_eq!((calibration.scored, calibration.skipped), (1, 1));
        assert!((calibration.threshold.value() - 0.8).abs() < 1e-12);
    }

    #[tokio::test]
    async fn all_failures_give_zero_without_dividing_by_zero() {
        let pages = StaticPages::default();
        let training = TrainingSet::parse("https://x.example\nhttps://y.example\n");
        let config = ClassifierConfig::default();
        let fingerprint = fingerprint();
        let classifier = Classifier::new(&pages, &fingerprint, &config);

        let calibration = calibrate(&classifier, &training).await;

        assert_eq!((calibration.scored, calibration.skipped), (0, 2));
        assert_eq!(calibration.threshold.value(), 0.0);
    }

    #[tokio::test]
    async fn unreadable_training_set_yields_neutral_threshold() {
        let pages = StaticPages::default();
        let config = ClassifierConfig::default();
        let fingerprint = fingerprint();
        let classifier = Classifier::new(&pages, &fingerprint, &config);
        let dir = tempfile::tempdir().unwrap();

        let result = calibrate_file(&classifier, &dir.path().join("gambling_sites.txt")).await;

        assert!(matches!(result, Err(crate::error::ClassifyError::Io { .. })));
        assert!(threshold_or_neutral(&result).is_neutral());
    }

    #[tokio::test]
    async fn training_file_is_read_line_by_line() {
        let pages = StaticPages::default()
            .with("https://a.example", page_text(20, 5))
            .with("https://b.example", page_text(10, 15));
        let config = ClassifierConfig::default();
        let fingerprint = fingerprint();
        let classifier = Classifier::new(&pages, &fingerprint, &config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gambling_sites.txt");
        std::fs::write(&path, "https://a.example\n\nhttps://b.example\n").unwrap();

        let result = calibrate_file(&classifier, &path).await;
        let threshold = threshold_or_neutral(&result);

        assert!((threshold.value() - 0.6).abs() < 1e-12);
        assert_eq!(result.unwrap().scored, 2);
    }

    fn configured() -> Threshold {
        Threshold::new(0.2682).unwrap()
    }

    #[tokio::test]
    async fn missing_training_set_falls_back_to_configured_threshold() {
        let pages = StaticPages::default();
        let config = ClassifierConfig::default();
        let fingerprint = fingerprint();
        let classifier = Classifier::new(&pages, &fingerprint, &config);
        let dir = tempfile::tempdir().unwrap();

        let result = calibrate_file(&classifier, &dir.path().join("absent.txt")).await;

        assert_eq!(effective_threshold(&result, configured()), configured());
    }

    #[tokio::test]
    async fn all_failed_calibration_falls_back_to_configured_threshold() {
        let pages = StaticPages::default().with("https://short.example", page_text(3, 3));
        let config = ClassifierConfig::default();
        let fingerprint = fingerprint();
        let classifier = Classifier::new(&pages, &fingerprint, &config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gambling_sites.txt");
        std::fs::write(&path, "https://short.example
https://gone.example
").unwrap();

        let result = calibrate_file(&classifier, &path).await;

        assert_eq!(result.as_ref().unwrap().scored, 0);
        assert_eq!(effective_threshold(&result, configured()), configured());
    }

    #[tokio::test]
    async fn successful_calibration_replaces_configured_threshold() {
        let pages = StaticPages::default()
            .with("https://a.example", page_text(20, 5))
            .with("https://b.example", page_text(5, 20));
        let config = ClassifierConfig::default();
        let fingerprint = fingerprint();
        let classifier = Classifier::new(&pages, &fingerprint, &config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gambling_sites.txt");
        std::fs::write(&path, "https://a.example
https://b.example
").unwrap();

        let result = calibrate_file(&classifier, &path).await;
        let threshold = effective_threshold(&result, configured());

        assert!((threshold.value() - 0.5).abs() < 1e-12);
    }
}
