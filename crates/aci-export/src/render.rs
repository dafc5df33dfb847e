use std::path::Path;

use aci_core::spectrogram::Spectrogram;
use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};

/// Offset added before the log so silent cells stay finite.
const DB_FLOOR: f64 = 1e-10;

/// Perceptually ordered ramp, dark to bright (viridis key colors).
const RAMP: [[f64; 3]; 5] = [
    [68.0, 1.0, 84.0],
    [59.0, 82.0, 139.0],
    [33.0, 145.0, 140.0],
    [94.0, 201.0, 98.0],
    [253.0, 231.0, 37.0],
];

/// Map `t` in `[0, 1]` onto the ramp.
fn ramp_color(t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0) * (RAMP.len() - 1) as f64;
    let i = (t.floor() as usize).min(RAMP.len() - 2);
    let f = t - i as f64;
    let (a, b) = (RAMP[i], RAMP[i + 1]);
    Rgb([0, 1, 2].map(|c| (a[c] + (b[c] - a[c]) * f).round() as u8))
}

/// Render a spectrogram in decibels, `10·log10(v + 1e-10)`, one pixel per
/// cell, lowest frequency on the bottom row.
///
/// # Errors
/// Returns an error for a spectrogram without rows or columns, or one too
/// large for an image.
///
/// # Example
/// ```
/// use aci_core::spectrogram::Spectrogram;
/// use aci_export::render::spectrogram_image;
/// let spec = Spectrogram::from_rows(&[vec![1.0, 0.0], vec![0.5, 0.25], vec![0.0, 1.0]]).unwrap();
/// let img = spectrogram_image(&spec).unwrap();
/// assert_eq!(img.dimensions(), (2, 3));
/// ```
pub fn spectrogram_image(spectrogram: &Spectrogram) -> Result<RgbImage> {
    let (bins, frames) = spectrogram.shape();
    if bins == 0 || frames == 0 {
        anyhow::bail!("Spectrogramme vide ({bins}×{frames}) : rien à dessiner");
    }
    let width = u32::try_from(frames).context("Trop de colonnes pour une image")?;
    let height = u32::try_from(bins).context("Trop de lignes pour une image")?;

    let to_db = |v: f64| 10.0 * (v + DB_FLOOR).log10();
    let lo = to_db(spectrogram.min_value());
    let hi = to_db(spectrogram.max_value());
    let range = hi - lo;

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let bin = bins - 1 - y as usize;
        let db = to_db(spectrogram.value(bin, x as usize));
        let t = if range > 0.0 { (db - lo) / range } else { 0.0 };
        ramp_color(t)
    }))
}

/// Render and save as PNG.
///
/// # Errors
/// Returns an error if the spectrogram is empty or the file cannot be written.
pub fn write_spectrogram_png(path: &Path, spectrogram: &Spectrogram) -> Result<()> {
    let img = spectrogram_image(spectrogram)?;
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Échec d'écriture PNG {}", path.display()))?;
    log::debug!("Spectrogramme sauvegardé : {}", path.display());
    Ok(())
}
