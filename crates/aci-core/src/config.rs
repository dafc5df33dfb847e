use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Window family applied to each frame before the FFT.
///
/// # Example
/// ```
/// use aci_core::config::WindowType;
/// let w: WindowType = "hanning".parse().unwrap();
/// assert_eq!(w, WindowType::Hann);
/// assert!("kaiser".parse::<WindowType>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum WindowType {
    /// Raised cosine, zero at both ends.
    #[default]
    #[serde(alias = "hann", alias = "hanning")]
    Hann,
    /// Raised cosine on a 0.08 pedestal.
    #[serde(alias = "hamming")]
    Hamming,
    /// Three-term Blackman.
    #[serde(alias = "blackman")]
    Blackman,
    /// All ones.
    #[serde(alias = "rectangular", alias = "boxcar")]
    Rectangular,
}

impl WindowType {
    /// Every supported family, in declaration order.
    pub const ALL: [Self; 4] = [Self::Hann, Self::Hamming, Self::Blackman, Self::Rectangular];

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hann => "hann",
            Self::Hamming => "hamming",
            Self::Blackman => "blackman",
            Self::Rectangular => "rectangular",
        }
    }
}

impl FromStr for WindowType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Ok(Self::Hann),
            "hamming" => Ok(Self::Hamming),
            "blackman" => Ok(Self::Blackman),
            "rectangular" | "boxcar" | "rect" => Ok(Self::Rectangular),
            _ => Err(CoreError::UnknownWindow { name: s.to_string() }),
        }
    }
}

impl std::fmt::Display for WindowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which real-FFT bins become spectrogram rows.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum BinRetention {
    /// Keep `floor(L/2)` bins: everything below Nyquist.
    #[default]
    DropNyquist,
    /// Keep all `floor(L/2) + 1` bins.
    KeepNyquist,
}

impl BinRetention {
    /// Number of spectrogram rows for a window of `window_length` samples.
    ///
    /// # Example
    /// ```
    /// use aci_core::config::BinRetention;
    /// assert_eq!(BinRetention::DropNyquist.bin_count(512), 256);
    /// assert_eq!(BinRetention::KeepNyquist.bin_count(512), 257);
    /// ```
    #[must_use]
    pub fn bin_count(self, window_length: usize) -> usize {
        match self {
            Self::DropNyquist => window_length / 2,
            Self::KeepNyquist => window_length / 2 + 1,
        }
    }
}

/// Frame geometry: window length, hop and family.
///
/// # Example
/// ```
/// use aci_core::config::WindowSpec;
/// let spec = WindowSpec::default();
/// assert_eq!((spec.length, spec.hop), (512, 256));
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct WindowSpec {
    /// Window (and FFT) length in samples.
    pub length: usize,
    /// Offset between consecutive frames in samples.
    pub hop: usize,
    /// Window family.
    #[serde(rename = "type")]
    pub kind: WindowType,
    /// Anchor frames on their center instead of their first sample.
    pub centered: bool,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            length: 512,
            hop: 256,
            kind: WindowType::Hann,
            centered: false,
        }
    }
}

impl WindowSpec {
    /// Build a non-centered spec.
    #[must_use]
    pub fn new(length: usize, hop: usize, kind: WindowType) -> Self {
        Self {
            length,
            hop,
            kind,
            centered: false,
        }
    }

    /// `floor(length / 2)`.
    #[must_use]
    pub fn half_length(&self) -> usize {
        self.length / 2
    }

    /// Check length and hop.
    ///
    /// # Errors
    /// [`CoreError::NonPositive`] if either is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.length == 0 {
            return Err(CoreError::NonPositive {
                name: "window length",
            });
        }
        if self.hop == 0 {
            return Err(CoreError::NonPositive { name: "window hop" });
        }
        Ok(())
    }
}

/// Post-processing switches of the spectrogram transform.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SpectrogramFlags {
    /// Divide samples by their peak absolute value first.
    pub scale_audio: bool,
    /// Power (squared magnitude) instead of amplitude.
    pub square: bool,
    /// Divide the whole matrix by its maximum.
    pub normalized: bool,
    /// Nyquist bin convention.
    pub bins: BinRetention,
}

impl Default for SpectrogramFlags {
    fn default() -> Self {
        Self {
            scale_audio: true,
            square: true,
            normalized: false,
            bins: BinRetention::DropNyquist,
        }
    }
}

/// ACI parameters.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AciConfig {
    /// Spectrogram columns per block (`j_bin`).
    pub block_size: usize,
}

impl Default for AciConfig {
    fn default() -> Self {
        Self { block_size: 10 }
    }
}

/// Complete analysis configuration.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use aci_core::config::AnalysisConfig;
/// let config = AnalysisConfig::default();
/// assert_eq!(config.aci.block_size, 10);
/// assert!(config.spectrogram.square);
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Frame geometry.
    pub window: WindowSpec,
    /// Spectrogram switches.
    pub spectrogram: SpectrogramFlags,
    /// ACI parameters.
    pub aci: AciConfig,
}

impl AnalysisConfig {
    /// Check every numeric field.
    ///
    /// # Errors
    /// [`CoreError::NonPositive`] for a zero length, hop or block size.
    pub fn validate(&self) -> CoreResult<()> {
        self.window.validate()?;
        if self.aci.block_size == 0 {
            return Err(CoreError::NonPositive { name: "block size" });
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    window: Option<WindowSection>,
    spectrogram: Option<SpectrogramSection>,
    aci: Option<AciSection>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WindowSection {
    length: Option<usize>,
    hop: Option<usize>,
    #[serde(rename = "type")]
    kind: Option<String>,
    centered: Option<bool>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SpectrogramSection {
    scale_audio: Option<bool>,
    square: Option<bool>,
    normalized: Option<bool>,
    bins: Option<BinRetention>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AciSection {
    block_size: Option<usize>,
}

/// Parse a TOML document and merge it over the defaults.
///
/// # Errors
/// Returns an error on malformed TOML, unknown keys, an unknown window name,
/// or a zero length/hop/block size.
///
/// # Example
/// ```
/// use aci_core::config::{parse_config, WindowType};
/// let config = parse_config("[window]\nlength = 1024\ntype = \"hamming\"\n").unwrap();
/// assert_eq!(config.window.length, 1024);
/// assert_eq!(config.window.hop, 256);
/// assert_eq!(config.window.kind, WindowType::Hamming);
/// ```
pub fn parse_config(content: &str) -> Result<AnalysisConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = AnalysisConfig::default();

    if let Some(w) = file.window {
        if let Some(v) = w.length {
            config.window.length = v;
        }
        if let Some(v) = w.hop {
            config.window.hop = v;
        }
        if let Some(v) = w.kind {
            config.window.kind = v.parse()?;
        }
        if let Some(v) = w.centered {
            config.window.centered = v;
        }
    }

    if let Some(s) = file.spectrogram {
        if let Some(v) = s.scale_audio {
            config.spectrogram.scale_audio = v;
        }
        if let Some(v) = s.square {
            config.spectrogram.square = v;
        }
        if let Some(v) = s.normalized {
            config.spectrogram.normalized = v;
        }
        if let Some(v) = s.bins {
            config.spectrogram.bins = v;
        }
    }

    if let Some(a) = file.aci {
        if let Some(v) = a.block_size {
            config.aci.block_size = v;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
/// ```no_run
/// use aci_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}
