// Persistence and rendering of spectrograms and ACI results for acindex.

pub mod archive;
pub mod render;

pub use archive::{AciRecord, read_aci, read_spectrogram, write_aci, write_spectrogram};
pub use render::write_spectrogram_png;
