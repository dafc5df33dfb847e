use anyhow::Result;
use clap::Parser;

use aci_core::config::AnalysisConfig;

pub mod batch;
pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config)?;
    log::debug!("Configuration : {config:?}");

    // 4. Lister les fichiers
    let jobs = batch::collect_jobs(&cli.inputs, cli.out.as_deref())?;
    if jobs.is_empty() {
        anyhow::bail!("Aucun fichier WAV à analyser.");
    }

    // 5. Analyse parallèle
    let options = batch::BatchOptions {
        out: cli.out.clone(),
        write_spectrogram: !cli.no_spectrogram,
        png: cli.png,
        jobs: cli.jobs,
    };
    let report = batch::run_batch(&jobs, config, &options)?;

    // 6. Rapport
    for file in &report.files {
        match &file.outcome {
            batch::Outcome::Ok(summary) => println!(
                "{}\t{:.6}\t{} bloc(s)",
                file.source.display(),
                summary.global_aci,
                summary.block_count
            ),
            batch::Outcome::Failed { error } => {
                eprintln!("{}\tÉCHEC\t{error}", file.source.display());
            }
        }
    }

    let failures = report.failures();
    if failures > 0 {
        anyhow::bail!("{failures}/{} fichier(s) en échec", report.files.len());
    }
    Ok(())
}

/// Load `--config` if it exists, otherwise fall back to the defaults.
fn resolve_config(cli: &cli::Cli) -> Result<AnalysisConfig> {
    if cli.config.exists() {
        aci_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(AnalysisConfig::default())
    }
}
