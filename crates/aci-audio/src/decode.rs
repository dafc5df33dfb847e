use std::fs::File;
use std::path::Path;

use aci_core::signal::AudioSignal;
use anyhow::{Context, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Extensions recognized as PCM WAV recordings.
pub const WAV_EXTS: &[&str] = &["wav", "wave"];

/// `true` if `path` carries a WAV extension (case-insensitive).
///
/// # Example
/// ```
/// use aci_audio::decode::is_wav;
/// assert!(is_wav("dawn/SMM11284.WAV"));
/// assert!(!is_wav("dawn/notes.txt"));
/// ```
pub fn is_wav(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| WAV_EXTS.iter().any(|w| e.eq_ignore_ascii_case(w)))
}

/// Decode a WAV file into a mono signal at its native sample rate.
///
/// Multi-channel files are downmixed by averaging the channels.
///
/// Integer PCM is converted to floating point in `[-1, 1)`: a 16-bit sample
/// of 16384 comes back as 0.5, not as the raw integer. With amplitude scaling
/// on, this is invisible; with it off, magnitudes from a 16-bit file are
/// `2^15` times smaller than on the raw integers (`2^30` for power). The ACI
/// is scale-invariant and unaffected.
///
/// # Errors
/// Returns an error if the file cannot be opened, probed or decoded, or if
/// it declares no sample rate.
///
/// # Example
/// ```no_run
/// use aci_audio::decode::decode_file;
/// let signal = decode_file("SMM08571-M1_20231214_074000_2-8_heavy_morning.wav").unwrap();
/// println!("{} samples @ {} Hz", signal.len(), signal.sample_rate());
/// ```
pub fn decode_file(path: impl AsRef<Path>) -> Result<AudioSignal> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Cannot open audio file: {}", path.display()))?;
    let mss = MediaSourceStream::new(
        Box::new(file),
        symphonia::core::io::MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Failed to probe audio format")?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .context("No default audio track found")?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Audio track declares no sample rate")?;
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count)
        .max(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let track_id = track.id;
    let mut all_samples: Vec<f64> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut max_sample_frames: usize = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Audio decode packet error in {}: {e}", path.display());
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Audio decode frame error in {}: {e}", path.display());
                continue;
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.capacity();
        // Reuse SampleBuffer: only reallocate if this packet is bigger than current capacity
        if sample_buf.is_none() || num_frames > max_sample_frames {
            sample_buf = Some(SampleBuffer::<f32>::new(num_frames as u64, spec));
            max_sample_frames = num_frames;
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);

        // Downmix to mono
        for chunk in buf.samples().chunks(channels) {
            let sum: f64 = chunk.iter().map(|&s| f64::from(s)).sum();
            all_samples.push(sum / channels as f64);
        }
    }

    log::debug!(
        "Decoded {} samples @ {}Hz ({} channel(s)) from {}",
        all_samples.len(),
        sample_rate,
        channels,
        path.display()
    );

    AudioSignal::new(all_samples, sample_rate)
        .with_context(|| format!("Invalid signal in {}", path.display()))
}
