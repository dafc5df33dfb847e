use std::path::Path;

use aci_core::aci::AciResult;
use aci_core::config::AnalysisConfig;
use aci_core::error::CoreResult;
use aci_core::signal::AudioSignal;
use aci_core::spectrogram::Spectrogram;

use crate::aci::compute_aci;
use crate::fft::SpectrogramTransform;

/// Everything derived from one recording.
#[derive(Clone, Debug)]
pub struct Analysis {
    /// Sample rate of the analyzed signal.
    pub sample_rate: u32,
    /// Signal length in seconds.
    pub duration_secs: f64,
    /// Spectrogram of the signal.
    pub spectrogram: Spectrogram,
    /// ACI of the spectrogram, with the block size used.
    pub aci: AciResult,
}

/// Analyseur offline : spectrogramme puis ACI, avec une configuration fixe.
///
/// The FFT plan is built once and reused for every signal, so one analyzer
/// per worker thread is the intended usage.
///
/// # Example
/// ```
/// use aci_audio::batch_analyzer::BatchAnalyzer;
/// use aci_core::{AnalysisConfig, AudioSignal};
/// let mut analyzer = BatchAnalyzer::new(AnalysisConfig::default()).unwrap();
/// let silence = AudioSignal::new(vec![0.0; 22050], 22050).unwrap();
/// let analysis = analyzer.analyze(&silence).unwrap();
/// assert_eq!(analysis.aci.global(), 0.0);
/// ```
pub struct BatchAnalyzer {
    config: AnalysisConfig,
    transform: SpectrogramTransform,
}

impl BatchAnalyzer {
    /// Crée un nouvel analyseur batch.
    ///
    /// # Errors
    /// [`aci_core::CoreError`] if the configuration is invalid.
    pub fn new(config: AnalysisConfig) -> CoreResult<Self> {
        config.validate()?;
        let transform = SpectrogramTransform::new(config.window, config.spectrogram)?;
        Ok(Self { config, transform })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Spectrogram and ACI of an in-memory signal.
    ///
    /// # Errors
    /// [`aci_core::CoreError::Fft`] if the FFT fails.
    pub fn analyze(&mut self, signal: &AudioSignal) -> CoreResult<Analysis> {
        let spectrogram = self.transform.compute(signal)?;
        let aci = compute_aci(&spectrogram, self.config.aci.block_size)?;
        Ok(Analysis {
            sample_rate: signal.sample_rate(),
            duration_secs: signal.duration_secs(),
            spectrogram,
            aci,
        })
    }

    /// Décode un fichier WAV et analyse l'intégralité de ses échantillons.
    ///
    /// # Errors
    /// Retourne une erreur si le fichier ne peut être décodé.
    pub fn analyze_file(&mut self, path: &Path) -> anyhow::Result<Analysis> {
        let signal = crate::decode::decode_file(path)?;
        let analysis = self.analyze(&signal)?;
        log::debug!(
            "{}: {}×{} spectrogram, ACI {:.4} over {} block(s)",
            path.display(),
            analysis.spectrogram.bins(),
            analysis.spectrogram.frames(),
            analysis.aci.global(),
            analysis.aci.block_count()
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aci_core::config::AciConfig;

    #[test]
    fn invalid_config_is_rejected() {
        let config = AnalysisConfig {
            aci: AciConfig { block_size: 0 },
            ..AnalysisConfig::default()
        };
        assert!(BatchAnalyzer::new(config).is_err());
    }

    #[test]
    fn short_signal_yields_empty_analysis() {
        let mut analyzer = BatchAnalyzer::new(AnalysisConfig::default()).unwrap();
        let signal = AudioSignal::new(vec![0.3, -0.2, 0.1], 22050).unwrap();
        let analysis = analyzer.analyze(&signal).unwrap();
        assert_eq!(analysis.spectrogram.frames(), 0);
        assert!(analysis.aci.is_empty());
        assert_eq!(analysis.aci.global(), 0.0);
        assert_eq!(analysis.aci.block_size(), 10);
    }

    #[test]
    fn noise_has_positive_aci() {
        // xorshift noise, deterministic
        let mut state: u32 = 0x1234_5678;
        let samples: Vec<f64> = (0..44100)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                f64::from(state) / f64::from(u32::MAX) - 0.5
            })
            .collect();
        let mut analyzer = BatchAnalyzer::new(AnalysisConfig::default()).unwrap();
        let analysis = analyzer
            .analyze(&AudioSignal::new(samples, 44100).unwrap())
            .unwrap();
        // (44100 - 512) / 256 + 1 = 171 frames, blocks start at 0, 10, ..., 160
        assert_eq!(analysis.spectrogram.frames(), 171);
        assert_eq!(analysis.aci.block_count(), 17);
        assert!(analysis.aci.global() > 0.0);
        assert!(analysis.aci.per_block().iter().all(|v| v.is_finite()));
    }
}
