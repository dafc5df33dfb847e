/// Configuration, types, and shared structures for acindex.
///
/// This crate contains the data model shared by the DSP, export and
/// application crates: signals, spectrograms, ACI results, recording
/// metadata, and the analysis configuration.

pub mod aci;
pub mod config;
pub mod error;
pub mod recording;
pub mod signal;
pub mod spectrogram;

pub use aci::AciResult;
pub use config::{AnalysisConfig, BinRetention, SpectrogramFlags, WindowSpec, WindowType};
pub use error::{CoreError, CoreResult};
pub use recording::RecordingInfo;
pub use signal::AudioSignal;
pub use spectrogram::Spectrogram;
