use std::path::PathBuf;

use aci_core::config::{AnalysisConfig, BinRetention};
use clap::Parser;

/// acindex : spectrogrammes et Acoustic Complexity Index pour enregistrements WAV.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichiers WAV ou dossiers à analyser (parcourus récursivement).
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Dossier de sortie. Sans lui, les résultats sont seulement affichés.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Longueur de fenêtre (et de FFT) en échantillons.
    #[arg(long)]
    pub window_length: Option<usize>,

    /// Pas entre deux fenêtres en échantillons.
    #[arg(long)]
    pub hop: Option<usize>,

    /// Famille de fenêtre : hann, hamming, blackman, rectangular.
    #[arg(long)]
    pub window: Option<String>,

    /// Ancrer chaque trame sur son centre.
    #[arg(long, default_value_t = false)]
    pub centered: bool,

    /// Colonnes de spectrogramme par bloc ACI.
    #[arg(short, long)]
    pub block_size: Option<usize>,

    /// Ne pas normaliser l'amplitude du signal avant la FFT.
    ///
    /// Les échantillons WAV entiers sont déjà ramenés dans [-1, 1) au décodage :
    /// sans normalisation, les valeurs du spectrogramme sont celles de ce signal
    /// flottant, pas des entiers bruts.
    #[arg(long, default_value_t = false)]
    pub no_scale: bool,

    /// Spectrogramme d'amplitude au lieu de puissance.
    #[arg(long, default_value_t = false)]
    pub amplitude: bool,

    /// Diviser le spectrogramme par son maximum.
    #[arg(long, default_value_t = false)]
    pub normalized: bool,

    /// Conserver le bin de Nyquist.
    #[arg(long, default_value_t = false)]
    pub keep_nyquist: bool,

    /// Ne pas écrire les archives de spectrogramme (seulement l'ACI).
    #[arg(long, default_value_t = false)]
    pub no_spectrogram: bool,

    /// Écrire aussi une image PNG de chaque spectrogramme.
    #[arg(long, default_value_t = false)]
    pub png: bool,

    /// Nombre de threads de traitement. Défaut : un par cœur.
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply the command-line overrides on top of a loaded configuration.
    ///
    /// # Errors
    /// Returns an error for an unknown window name or if the resulting
    /// configuration is invalid.
    pub fn apply_overrides(&self, config: &mut AnalysisConfig) -> anyhow::Result<()> {
        if let Some(v) = self.window_length {
            config.window.length = v;
        }
        if let Some(v) = self.hop {
            config.window.hop = v;
        }
        if let Some(ref name) = self.window {
            config.window.kind = name.parse()?;
        }
        if self.centered {
            config.window.centered = true;
        }
        if let Some(v) = self.block_size {
            config.aci.block_size = v;
        }
        if self.no_scale {
            config.spectrogram.scale_audio = false;
        }
        if self.amplitude {
            config.spectrogram.square = false;
        }
        if self.normalized {
            config.spectrogram.normalized = true;
        }
        if self.keep_nyquist {
            config.spectrogram.bins = BinRetention::KeepNyquist;
        }
        config.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aci_core::config::WindowType;

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::parse_from([
            "acindex",
            "recordings",
            "--window-length",
            "1024",
            "--window",
            "Hamming",
            "-b",
            "25",
            "--amplitude",
            "--keep-nyquist",
        ]);
        let mut config = AnalysisConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.window.length, 1024);
        assert_eq!(config.window.hop, 256);
        assert_eq!(config.window.kind, WindowType::Hamming);
        assert_eq!(config.aci.block_size, 25);
        assert!(!config.spectrogram.square);
        assert_eq!(config.spectrogram.bins, BinRetention::KeepNyquist);
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let mut config = AnalysisConfig::default();
        let cli = Cli::parse_from(["acindex", "x.wav", "--block-size", "0"]);
        assert!(cli.apply_overrides(&mut config).is_err());

        let mut config = AnalysisConfig::default();
        let cli = Cli::parse_from(["acindex", "x.wav", "--window", "kaiser"]);
        assert!(cli.apply_overrides(&mut config).is_err());
    }

    #[test]
    fn inputs_are_required() {
        assert!(Cli::try_parse_from(["acindex"]).is_err());
    }
}
