use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use sg_core::frame::{RasterFrame, SpectrumKind, SpectrumSet};
use sg_core::traits::Encoder;
use sg_core::SpectrumError;

/// Encode une séquence grayscale en GIF animé, boucle infinie.
///
/// Le fichier est assemblé en mémoire puis écrit d'un bloc, ce qui fait
/// remonter les erreurs d'écriture au lieu de les perdre au `drop`.
///
/// # Example
/// ```no_run
/// use sg_core::RasterFrame;
/// use sg_core::traits::Encoder;
/// use sg_export::encoder::GifEncoderSink;
/// use std::path::Path;
/// let frames = vec![RasterFrame::filled(8, 8, 0).unwrap()];
/// GifEncoderSink.encode(&frames, Path::new("out.gif"), 100).unwrap();
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct GifEncoderSink;

impl Encoder for GifEncoderSink {
    fn encode(&mut self, frames: &[RasterFrame], path: &Path, frame_duration_ms: u32) -> Result<()> {
        if frames.is_empty() {
            return Err(SpectrumError::NoFrames.into());
        }

        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            encoder.set_repeat(Repeat::Infinite)?;
            let delay = Delay::from_numer_denom_ms(frame_duration_ms, 1);
            for (index, frame) in frames.iter().enumerate() {
                encoder
                    .encode_frame(Frame::from_parts(to_rgba(frame)?, 0, 0, delay))
                    .with_context(|| format!("Encodage de la frame {index} échoué"))?;
            }
        }

        std::fs::write(path, &bytes)
            .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
        log::info!(
            "GIF écrit : {} ({} frame(s), {frame_duration_ms} ms)",
            path.display(),
            frames.len()
        );
        Ok(())
    }
}

/// Gris → RGBA opaque `(v, v, v, 255)`.
fn to_rgba(frame: &RasterFrame) -> Result<RgbaImage> {
    let data = frame.data().iter().flat_map(|&v| [v, v, v, 255]).collect();
    RgbaImage::from_raw(frame.width(), frame.height(), data).context("Buffer RGBA invalide")
}

/// Chemin de sortie d'un spectre : `out.gif` → `out_magnitude.gif`.
///
/// Sans extension, ou avec une extension autre que GIF, le fichier reçoit
/// `.gif` après le suffixe.
///
/// # Example
/// ```
/// use sg_core::SpectrumKind;
/// use sg_export::encoder::suffixed_path;
/// use std::path::{Path, PathBuf};
/// assert_eq!(
///     suffixed_path(Path::new("renders/anim.gif"), SpectrumKind::Phase),
///     PathBuf::from("renders/anim_phase.gif")
/// );
/// ```
#[must_use]
pub fn suffixed_path(base: &Path, kind: SpectrumKind) -> PathBuf {
    let ext = base
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.eq_ignore_ascii_case("gif"))
        .unwrap_or("gif");
    let stem = base
        .file_stem()
        .map_or_else(|| "spectrum".into(), |s| s.to_string_lossy());
    base.with_file_name(format!("{stem}_{}.{ext}", kind.suffix()))
}

/// Écrit magnitude, phase et power (dans cet ordre) à côté de `base`.
///
/// # Errors
/// Returns the first encoder error, with the target path as context.
pub fn export_spectra<E: Encoder + ?Sized>(
    encoder: &mut E,
    set: &SpectrumSet,
    base: &Path,
    frame_duration_ms: u32,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(SpectrumKind::SPECTRA.len());
    for kind in SpectrumKind::SPECTRA {
        let path = suffixed_path(base, kind);
        encoder
            .encode(set.sequence(kind).frames(), &path, frame_duration_ms)
            .with_context(|| format!("Export {kind} vers {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
