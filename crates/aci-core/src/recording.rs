use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Metadata encoded in a field recording's filename.
///
/// Expected layout:
/// `<recorder>_<YYYYMMDD>_<HHMMSS>_<low>-<high>_<rain class>_<period>.wav`,
/// e.g. `SMM08571-M1_20231214_074000_2-8_heavy_morning.wav`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingInfo {
    /// Recorder / site identifier.
    pub recorder: String,
    /// Start of the recording (local recorder time).
    pub timestamp: NaiveDateTime,
    /// Accumulated rain range `(low, high)` for the recording.
    pub total_rain: (u32, u32),
    /// Rain class label, e.g. `heavy` or `no-rain`.
    pub rain_class: String,
    /// Period of day label, e.g. `morning`.
    pub period: String,
}

/// Parse a recording filename. Returns `None` for names that do not follow
/// the layout; that is not an error.
///
/// # Example
/// ```
/// use aci_core::recording::parse_filename;
/// let info = parse_filename("SMM08571-M1_20231214_074000_2-8_heavy_morning.wav").unwrap();
/// assert_eq!(info.recorder, "SMM08571-M1");
/// assert_eq!(info.total_rain, (2, 8));
/// assert_eq!(info.period, "morning");
/// assert!(parse_filename("notes.txt").is_none());
/// ```
#[must_use]
pub fn parse_filename(file_name: &str) -> Option<RecordingInfo> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if !ext.eq_ignore_ascii_case("wav") {
        return None;
    }

    let parts: Vec<&str> = stem.split('_').collect();
    let n = parts.len();
    if n < 6 {
        return None;
    }

    let recorder = parts[..n - 5].join("_");
    let (date, time) = (parts[n - 5], parts[n - 4]);
    let (rain, rain_class, period) = (parts[n - 3], parts[n - 2], parts[n - 1]);

    if !is_label(&recorder) || !is_label(rain_class) || !is_label(period) {
        return None;
    }
    if !is_digits(date, 8) || !is_digits(time, 6) {
        return None;
    }
    let timestamp = NaiveDateTime::parse_from_str(&format!("{date}_{time}"), "%Y%m%d_%H%M%S").ok()?;

    let (low, high) = rain.split_once('-')?;
    let total_rain = (low.parse().ok()?, high.parse().ok()?);

    Some(RecordingInfo {
        recorder,
        timestamp,
        total_rain,
        rain_class: rain_class.to_string(),
        period: period.to_string(),
    })
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_label(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
