use thiserror::Error;

/// Errors originating from the core module.
///
/// Every variant is a configuration problem raised before any sample is
/// processed. Degenerate inputs (silence, signals shorter than the window,
/// spectrograms too short for a block) are not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Window family name not in the supported set.
    #[error("Fenêtre inconnue : {name}")]
    UnknownWindow {
        /// The name that failed to parse.
        name: String,
    },

    /// A length, hop, block size or sample rate that must be strictly positive.
    #[error("{name} doit être strictement positif")]
    NonPositive {
        /// Parameter name.
        name: &'static str,
    },

    /// The FFT plan rejected its buffers.
    #[error("Erreur FFT : {0}")]
    Fft(String),
}

/// Shorthand for results carrying a [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
