use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageDecoder, ImageFormat};
use sg_core::SpectrumError;
use sg_core::frame::RasterFrame;
use sg_core::traits::FrameSource;

/// GIF animé décodé en frames grayscale 8 bits.
///
/// Chaque frame est composée sur le canevas complet par le décodeur puis
/// convertie en luminance ITU-R 601 (alpha ignoré).
///
/// # Example
/// ```no_run
/// use sg_source::gif::GifSource;
/// use std::path::Path;
/// let source = GifSource::open(Path::new("anim.gif")).unwrap();
/// ```
pub struct GifSource {
    frames: Vec<RasterFrame>,
    delays_ms: Vec<u32>,
    width: u32,
    height: u32,
}

impl GifSource {
    /// Charge et décode un GIF depuis le disque.
    ///
    /// # Errors
    /// - [`SpectrumError::FileNotFound`] if `path` does not exist;
    /// - [`SpectrumError::UnsupportedFormat`] if the content is not a GIF;
    /// - [`SpectrumError::NoFrames`] if no frame could be decoded;
    /// - [`SpectrumError::DimensionMismatch`] if a frame differs from the canvas;
    /// - I/O or codec errors, with the path as context.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SpectrumError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let bytes = std::fs::read(path)
            .with_context(|| format!("Impossible de lire {}", path.display()))?;
        let source = Self::from_bytes(&bytes)
            .with_context(|| format!("Impossible de décoder {}", path.display()))?;
        log::info!(
            "{} : {} frame(s) {}×{}",
            path.display(),
            source.frames.len(),
            source.width,
            source.height
        );
        Ok(source)
    }

    /// Décode un GIF en mémoire. Le format est détecté sur le contenu, pas
    /// sur l'extension.
    ///
    /// # Errors
    /// Same as [`GifSource::open`], minus the file errors.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes).map_err(|_| SpectrumError::UnsupportedFormat {
            format: "inconnu".to_string(),
        })?;
        if format != ImageFormat::Gif {
            return Err(SpectrumError::UnsupportedFormat {
                format: format!("{format:?}"),
            }
            .into());
        }

        let decoder = GifDecoder::new(Cursor::new(bytes)).context("En-tête GIF invalide")?;
        let (width, height) = decoder.dimensions();

        let mut frames = Vec::new();
        let mut delays_ms = Vec::new();
        for (index, frame) in decoder.into_frames().enumerate() {
            let frame = frame.with_context(|| format!("Frame {index} illisible"))?;
            let (numer, denom) = frame.delay().numer_denom_ms();
            delays_ms.push(numer.checked_div(denom).unwrap_or(0));

            let buffer = frame.into_buffer();
            let found = buffer.dimensions();
            if found != (width, height) {
                return Err(SpectrumError::DimensionMismatch {
                    index,
                    expected: (width, height),
                    found,
                }
                .into());
            }
            frames.push(RasterFrame::from_rgba(width, height, buffer.as_raw())?);
        }

        if frames.is_empty() {
            return Err(SpectrumError::NoFrames.into());
        }
        log::debug!("Délais source (ms) : {delays_ms:?}");

        Ok(Self {
            frames,
            delays_ms,
            width,
            height,
        })
    }

    /// Délai d'affichage d'origine de chaque frame, en millisecondes.
    #[must_use]
    pub fn delays_ms(&self) -> &[u32] {
        &self.delays_ms
    }

    /// Consomme la source et rend les frames.
    #[must_use]
    pub fn into_frames(self) -> Vec<RasterFrame> {
        self.frames
    }
}

impl FrameSource for GifSource {
    fn frames(&self) -> &[RasterFrame] {
        &self.frames
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::{GifEncoder, Repeat};
    use image::{Delay, Frame, Rgba, RgbaImage};

    fn encode_gif(width: u32, height: u32, frames: &[([u8; 3], u32)]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut out);
            encoder.set_repeat(Repeat::Infinite).unwrap();
            for &([r, g, b], ms) in frames {
                let img = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));
                encoder
                    .encode_frame(Frame::from_parts(
                        img,
                        0,
                        0,
                        Delay::from_numer_denom_ms(ms, 1),
                    ))
                    .unwrap();
            }
        }
        out
    }

    #[test]
    fn decodes_every_frame_as_luminance() {
        let bytes = encode_gif(
            6,
            4,
            &[([0, 0, 0], 100), ([255, 0, 0], 70), ([128, 128, 128], 40)],
        );
        let source = GifSource::from_bytes(&bytes).unwrap();
        assert_eq!(source.dimensions(), (6, 4));
        assert_eq!(source.frames().len(), 3);
        assert_eq!(source.delays_ms(), &[100, 70, 40]);

        let expected = [0u8, 76, 128];
        for (frame, &value) in source.frames().iter().zip(&expected) {
            assert_eq!(frame.dimensions(), (6, 4));
            assert!(frame.data().iter().all(|&v| v == value), "{value}");
        }
    }

    #[test]
    fn rejects_other_formats() {
        let mut png = Vec::new();
        image::GrayImage::from_pixel(2, 2, image::Luma([7]))
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let err = GifSource::from_bytes(&png).err().unwrap();
        assert_eq!(
            err.downcast_ref::<SpectrumError>(),
            Some(&SpectrumError::UnsupportedFormat {
                format: "Png".to_string()
            })
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = GifSource::from_bytes(b"definitely not an image").err().unwrap();
        assert!(matches!(
            err.downcast_ref::<SpectrumError>(),
            Some(SpectrumError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = GifSource::open(&dir.path().join("absent.gif")).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<SpectrumError>(),
            Some(SpectrumError::FileNotFound { .. })
        ));
    }

    #[test]
    fn open_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        std::fs::write(&path, encode_gif(3, 3, &[([10, 10, 10], 100); 2])).unwrap();
        let frames = GifSource::open(&path).unwrap().into_frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].sample(2, 2), 10);
    }
}
