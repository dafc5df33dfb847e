use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use aci_core::aci::AciResult;
use aci_core::config::AnalysisConfig;
use aci_core::recording::RecordingInfo;
use aci_core::spectrogram::Spectrogram;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Persisted ACI of one recording, with everything needed to reproduce it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AciRecord {
    /// Source file the signal was read from.
    pub source: PathBuf,
    /// Metadata parsed from the filename, if it follows the naming layout.
    pub recording: Option<RecordingInfo>,
    /// Parameters the spectrogram and the index were computed with.
    pub config: AnalysisConfig,
    /// Sample rate of the source.
    pub sample_rate: u32,
    /// Source length in seconds.
    pub duration_secs: f64,
    /// The index itself; carries the block size.
    pub aci: AciResult,
}

/// `<dir>/<stem>_spectrogram.bin`.
#[must_use]
pub fn spectrogram_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}_spectrogram.bin"))
}

/// `<dir>/<stem>_aci.json`.
#[must_use]
pub fn aci_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}_aci.json"))
}

/// `<dir>/<stem>_spectrogram.png`.
#[must_use]
pub fn image_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}_spectrogram.png"))
}

/// Write a spectrogram (matrix and both axes) as bincode.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_spectrogram(path: &Path, spectrogram: &Spectrogram) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Impossible de créer {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, spectrogram)
        .with_context(|| format!("Échec d'écriture du spectrogramme {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Read back a spectrogram written by [`write_spectrogram`].
///
/// # Errors
/// Returns an error if the file cannot be read, decoded, or holds an
/// inconsistent matrix.
pub fn read_spectrogram(path: &Path) -> Result<Spectrogram> {
    let file =
        File::open(path).with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
    let spectrogram: Spectrogram = bincode::deserialize_from(BufReader::new(file))
        .with_context(|| format!("Spectrogramme illisible : {}", path.display()))?;
    spectrogram.check_shape()?;
    Ok(spectrogram)
}

/// Write an ACI record as pretty-printed JSON.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_aci(path: &Path, record: &AciRecord) -> Result<()> {
    write_json(path, record)
}

/// Read back a record written by [`write_aci`].
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_aci(path: &Path) -> Result<AciRecord> {
    let file =
        File::open(path).with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("JSON ACI invalide : {}", path.display()))
}

/// Serialize any value as pretty JSON to `path`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Impossible de créer {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Échec d'écriture JSON {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
