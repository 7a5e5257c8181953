// src/main.rs

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod classifier;
mod config;
mod error;
mod extractor;
mod fingerprint;
mod normalizer;
mod profiler;
mod training;
#[cfg(test)]
mod test_support;

use classifier::calibrator::{calibrate_file, effective_threshold};
use classifier::{Classifier, Threshold};
use config::ClassifierConfig;
use extractor::Extractor;
use fingerprint::builder::build_reference_profile;
use fingerprint::{write_table, ReferenceFingerprint};
use normalizer::Normalizer;
use profiler::PageProfiler;
use training::TrainingSet;

#[derive(Parser)]
#[command(name = "site_classifier")]
#[command(about = "Classifies web pages as gambling or non-gambling sites by their most frequent words")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Fingerprint table (word,count CSV), overrides the configured path
    #[arg(short, long, global = true)]
    fingerprint: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the page at URL
    Classify {
        url: String,

        /// File of known gambling site URLs, one per line, to recalibrate the threshold first
        training_set: Option<PathBuf>,
    },

    /// Compute a threshold from a file of known gambling site URLs
    Calibrate { training_set: PathBuf },

    /// Build the fingerprint table from a file of known gambling site URLs
    Build {
        url_list: PathBuf,

        /// Where to write the table, defaults to the configured fingerprint path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the frequency profile of the page at URL
    Profile {
        url: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    run(cli).await
}

/// Without a subcommand, prints usage and succeeds.
async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let mut config = match &cli.config {
        Some(path) => ClassifierConfig::from_file(path)?,
        None => ClassifierConfig::default(),
    };
    if let Some(path) = cli.fingerprint {
        config.fingerprint_path = path;
    }
    config.validate()?;

    match command {
        Commands::Classify { url, training_set } => {
            run_classify(&config, &url, training_set.as_deref()).await
        }
        Commands::Calibrate { training_set } => run_calibrate(&config, &training_set).await,
        Commands::Build { url_list, output } => {
            let output = output.unwrap_or_else(|| config.fingerprint_path.clone());
            run_build(&config, &url_list, &output).await
        }
        Commands::Profile { url, json } => run_profile(&config, &url, json).await,
    }
}

fn load_fingerprint(config: &ClassifierConfig) -> Result<ReferenceFingerprint> {
    ReferenceFingerprint::load(&config.fingerprint_path).with_context(|| {
        format!(
            "Could not load the fingerprint table. Build it first with: `site_classifier build <URL_LIST> --output {}`",
            config.fingerprint_path.display()
        )
    })
}

/// Prints the label, or nothing when the page could not be classified.
async fn run_classify(
    config: &ClassifierConfig,
    url: &str,
    training_set: Option<&Path>,
) -> Result<()> {
    let fingerprint = load_fingerprint(config)?;
    let extractor = Extractor::new(&config.fetch)?;
    let classifier = Classifier::new(&extractor, &fingerprint, config);

    let configured = Threshold::new(config.threshold)?;
    let threshold = match training_set {
        Some(path) => effective_threshold(&calibrate_file(&classifier, path).await, configured),
        None => configured,
    };

    match classifier.classify(url, threshold).await {
        Ok(classification) => {
            info!(
                "Overlap {} against threshold {}",
                classification.ratio, classification.threshold
            );
            println!("{}", classification.label);
        }
        Err(e) => error!("Could not classify {}: {}", url, e),
    }
    Ok(())
}

async fn run_calibrate(config: &ClassifierConfig, training_set: &Path) -> Result<()> {
    let fingerprint = load_fingerprint(config)?;
    let extractor = Extractor::new(&config.fetch)?;
    let classifier = Classifier::new(&extractor, &fingerprint, config);

    let calibration = calibrate_file(&classifier, training_set).await?;
    if calibration.scored == 0 {
        warn!("No training URL produced a usable profile");
    }
    println!(
        "{} (from {} sites, {} skipped)",
        calibration.threshold, calibration.scored, calibration.skipped
    );
    Ok(())
}

async fn run_build(config: &ClassifierConfig, url_list: &Path, output: &Path) -> Result<()> {
    let corpus = TrainingSet::from_file(url_list)?;
    if corpus.is_empty() {
        bail!("{} lists no URLs", url_list.display());
    }
    let extractor = Extractor::new(&config.fetch)?;
    let normalizer = Normalizer::new();

    let profile =
        build_reference_profile(&extractor, &normalizer, &corpus, config.profile_limit).await;
    if profile.is_empty() {
        bail!(
            "None of the {} URLs in {} produced any words",
            corpus.len(),
            url_list.display()
        );
    }

    write_table(output, &profile)?;
    info!("Saved {} words to {}", profile.len(), output.display());
    Ok(())
}

async fn run_profile(config: &ClassifierConfig, url: &str, json: bool) -> Result<()> {
    let extractor = Extractor::new(&config.fetch)?;
    let profiler = PageProfiler::new(&extractor, config.profile_limit);

    let profile = match profiler.profile_url(url).await {
        Ok(profile) => profile,
        Err(e) => {
            error!("Could not profile {}: {}", url, e);
            return Ok(());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        for entry in profile.entries() {
            println!("{:<20}{}", entry.word, entry.count);
        }
    }
    Ok(())
}
