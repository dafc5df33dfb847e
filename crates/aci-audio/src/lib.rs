// Spectrogram, Acoustic Complexity Index, and WAV loading for acindex.

pub mod aci;
pub mod batch_analyzer;
pub mod decode;
pub mod fft;
pub mod frames;
pub mod window;

pub use aci::compute_aci;
pub use batch_analyzer::{Analysis, BatchAnalyzer};
pub use fft::{SpectrogramTransform, compute_spectrogram};
pub use window::compute_window;
