use std::fs;
use std::path::{Path, PathBuf};

use aci_audio::batch_analyzer::{Analysis, BatchAnalyzer};
use aci_audio::decode::is_wav;
use aci_core::config::AnalysisConfig;
use aci_core::error::CoreResult;
use aci_core::recording::{RecordingInfo, parse_filename};
use aci_export::archive::{
    AciRecord, aci_path, image_path, spectrogram_path, write_aci, write_json, write_spectrogram,
};
use aci_export::render::write_spectrogram_png;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

/// Name of the batch report written at the output root.
pub const SUMMARY_FILE: &str = "summary.json";

/// One recording to analyze and where its outputs go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    /// WAV file to read.
    pub source: PathBuf,
    /// Directory for its outputs, `None` when nothing is written.
    pub out_dir: Option<PathBuf>,
}

/// What to write for each recording.
#[derive(Clone, Debug, Default)]
pub struct BatchOptions {
    /// Output root. Without it results are only reported.
    pub out: Option<PathBuf>,
    /// Write `<stem>_spectrogram.bin`.
    pub write_spectrogram: bool,
    /// Write `<stem>_spectrogram.png`.
    pub png: bool,
    /// Worker threads, `None` for one per core.
    pub jobs: Option<usize>,
}

/// Per-file summary of a successful analysis.
#[derive(Clone, Debug, Serialize)]
pub struct FileSummary {
    /// Metadata parsed from the filename, if it follows the naming layout.
    pub recording: Option<RecordingInfo>,
    /// Native sample rate of the file.
    pub sample_rate: u32,
    /// Length of the decoded signal in seconds.
    pub duration_secs: f64,
    /// Spectrogram rows.
    pub bins: usize,
    /// Spectrogram columns.
    pub frames: usize,
    /// Sum of the per-block ACI values.
    pub global_aci: f64,
    /// Number of scored blocks.
    pub block_count: usize,
    /// Columns per block.
    pub block_size: usize,
}

/// Result of one file: a summary or the reason it failed.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Analyzed and written.
    Ok(FileSummary),
    /// Decoding, analysis or writing failed.
    Failed {
        /// Error chain, outermost context first.
        error: String,
    },
}

/// Outcome of one file of the batch.
#[derive(Clone, Debug, Serialize)]
pub struct FileOutcome {
    /// File the job read.
    pub source: PathBuf,
    /// Summary or error, flattened next to `source` in `summary.json`.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl FileOutcome {
    /// `true` if this file could not be analyzed or written.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

/// Everything a batch produced, in input order.
#[derive(Clone, Debug, Serialize)]
pub struct BatchReport {
    /// Configuration every file was analyzed with.
    pub config: AnalysisConfig,
    /// One entry per job, in job order.
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    /// Number of files that failed.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.files.iter().filter(|f| f.is_failure()).count()
    }
}

/// Expand the command-line inputs into jobs.
///
/// Directories are scanned recursively for WAV files; each one gets an
/// output directory under `out/<directory name>/` that mirrors its
/// sub-directory. Plain files are written directly under `out`. Jobs come
/// back sorted by source path within each input.
///
/// # Errors
/// Returns an error if an input does not exist or a directory cannot be read.
pub fn collect_jobs(inputs: &[PathBuf], out: Option<&Path>) -> Result<Vec<Job>> {
    let mut jobs = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut files = Vec::new();
            scan_dir(input, &mut files)
                .with_context(|| format!("Impossible de parcourir {}", input.display()))?;
            files.sort();
            if files.is_empty() {
                log::warn!("Aucun fichier WAV dans {}", input.display());
            }
            let base = input.file_name().map(PathBuf::from).unwrap_or_default();
            for source in files {
                let out_dir = out.map(|root| {
                    let relative = source
                        .parent()
                        .and_then(|p| p.strip_prefix(input).ok())
                        .unwrap_or_else(|| Path::new(""));
                    root.join(&base).join(relative)
                });
                jobs.push(Job { source, out_dir });
            }
        } else if input.is_file() {
            if !is_wav(input) {
                log::warn!("Extension inattendue, tentative de décodage : {}", input.display());
            }
            jobs.push(Job {
                source: input.clone(),
                out_dir: out.map(Path::to_path_buf),
            });
        } else {
            anyhow::bail!("Entrée introuvable : {}", input.display());
        }
    }
    Ok(jobs)
}

fn scan_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            scan_dir(&path, files)?;
        } else if is_wav(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Analyze every job on a rayon pool and write the requested outputs.
///
/// A failing file is logged and reported but never aborts the batch. When an
/// output root is set, the report is also written there as `summary.json`.
///
/// # Errors
/// Returns an error if the configuration is invalid, the thread pool cannot
/// be built, or the summary cannot be written.
pub fn run_batch(jobs: &[Job], config: AnalysisConfig, options: &BatchOptions) -> Result<BatchReport> {
    config.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs.unwrap_or(0))
        .build()
        .context("Impossible de créer le pool de threads")?;

    log::info!(
        "Analyse de {} fichier(s) sur {} thread(s)",
        jobs.len(),
        pool.current_num_threads()
    );

    let files: Vec<FileOutcome> = pool.install(|| {
        jobs.par_iter()
            .map_init(
                || BatchAnalyzer::new(config),
                |analyzer: &mut CoreResult<BatchAnalyzer>, job| {
                    let outcome = match analyzer {
                        Ok(analyzer) => match process_job(analyzer, job, options) {
                            Ok(summary) => {
                                log::info!(
                                    "{} : ACI {:.4} ({} bloc(s))",
                                    job.source.display(),
                                    summary.global_aci,
                                    summary.block_count
                                );
                                Outcome::Ok(summary)
                            }
                            Err(e) => {
                                log::warn!("Échec sur {} : {e:#}", job.source.display());
                                Outcome::Failed { error: format!("{e:#}") }
                            }
                        },
                        Err(e) => Outcome::Failed { error: e.to_string() },
                    };
                    FileOutcome {
                        source: job.source.clone(),
                        outcome,
                    }
                },
            )
            .collect()
    });

    let report = BatchReport { config, files };
    if let Some(ref root) = options.out {
        fs::create_dir_all(root)
            .with_context(|| format!("Impossible de créer {}", root.display()))?;
        write_json(&root.join(SUMMARY_FILE), &report)?;
    }
    Ok(report)
}

fn process_job(analyzer: &mut BatchAnalyzer, job: &Job, options: &BatchOptions) -> Result<FileSummary> {
    let analysis = analyzer.analyze_file(&job.source)?;
    let recording = job
        .source
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(parse_filename);

    if let Some(ref dir) = job.out_dir {
        write_outputs(dir, job, &analysis, recording.clone(), *analyzer.config(), options)?;
    }

    let (bins, frames) = analysis.spectrogram.shape();
    Ok(FileSummary {
        recording,
        sample_rate: analysis.sample_rate,
        duration_secs: analysis.duration_secs,
        bins,
        frames,
        global_aci: analysis.aci.global(),
        block_count: analysis.aci.block_count(),
        block_size: analysis.aci.block_size(),
    })
}

fn write_outputs(
    dir: &Path,
    job: &Job,
    analysis: &Analysis,
    recording: Option<RecordingInfo>,
    config: AnalysisConfig,
    options: &BatchOptions,
) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Impossible de créer {}", dir.display()))?;
    let stem = job
        .source
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Nom de fichier non UTF-8")?;

    if options.write_spectrogram {
        write_spectrogram(&spectrogram_path(dir, stem), &analysis.spectrogram)?;
    }
    if options.png {
        if analysis.spectrogram.is_empty() {
            log::warn!("Spectrogramme vide, pas d'image pour {}", job.source.display());
        } else {
            write_spectrogram_png(&image_path(dir, stem), &analysis.spectrogram)?;
        }
    }

    let record = AciRecord {
        source: job.source.clone(),
        recording,
        config,
        sample_rate: analysis.sample_rate,
        duration_secs: analysis.duration_secs,
        aci: analysis.aci.clone(),
    };
    write_aci(&aci_path(dir, stem), &record)
}
