// src/fingerprint/mod.rs

use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod builder;

use crate::error::{ClassifyError, Result};
use crate::profiler::FrequencyProfile;

/// One row of the persisted `word,count` table. Other columns are ignored.
#[derive(Debug, Deserialize)]
struct FingerprintRow {
    word: String,
}

#[derive(Debug, Serialize)]
struct TableRow<'a> {
    word: &'a str,
    count: usize,
}

/// The words most characteristic of known gambling sites. Loaded once at
/// startup and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceFingerprint {
    words: HashSet<String>,
}

impl ReferenceFingerprint {
    /// Loads the word column of a `word,count` table.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ClassifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fingerprint = Self::from_reader(file).map_err(|source| ClassifyError::Table {
            path: path.to_path_buf(),
            source,
        })?;

        if fingerprint.is_empty() {
            warn!("Fingerprint table {} has no words", path.display());
        } else {
            debug!("Loaded {} fingerprint words from {}", fingerprint.len(), path.display());
        }
        Ok(fingerprint)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> std::result::Result<Self, csv::Error> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut words = HashSet::new();
        for row in reader.deserialize() {
            let row: FingerprintRow = row?;
            let word = row.word.trim();
            if !word.is_empty() {
                words.insert(word.to_string());
            }
        }
        Ok(Self { words })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceFingerprint {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { words: iter.into_iter().map(Into::into).collect() }
    }
}

/// Persists a profile as a `word,count` table, in profile order.
pub fn write_table(path: &Path, profile: &FrequencyProfile) -> Result<()> {
    let file = File::create(path).map_err(|source| ClassifyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_table_to(file, profile).map_err(|source| ClassifyError::Table {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_table_to<W: io::Write>(
    writer: W,
    profile: &FrequencyProfile,
) -> std::result::Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for entry in profile.entries() {
        writer.serialize(TableRow { word: &entry.word, count: entry.count })?;
    }
    writer.flush()?;
    Ok(())
}
