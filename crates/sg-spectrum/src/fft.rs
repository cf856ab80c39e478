use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};
use sg_core::{Complex64, ComplexField, RasterFrame, SpectrumError};

/// FFT 2D d'une frame grayscale, composante continue recentrée.
///
/// Les plans sont construits une fois pour les dimensions du run puis
/// partagés en lecture seule entre les workers ; les buffers sont locaux à
/// chaque appel.
///
/// Lignes : FFT réelle (`realfft`), la moitié négative du spectre est
/// reconstruite par symétrie hermitienne. Colonnes : FFT complexe (`rustfft`).
///
/// # Example
/// ```
/// use sg_spectrum::fft::FrameTransformer;
/// use sg_core::RasterFrame;
/// let fft = FrameTransformer::new(4, 4).unwrap();
/// let field = fft.transform(&RasterFrame::filled(4, 4, 1).unwrap()).unwrap();
/// assert!((field.get(2, 2).re - 16.0).abs() < 1e-9);
/// ```
pub struct FrameTransformer {
    width: usize,
    height: usize,
    row_plan: Arc<dyn RealToComplex<f64>>,
    col_plan: Arc<dyn Fft<f64>>,
}

impl FrameTransformer {
    /// Plans the row and column transforms for `width × height` frames.
    ///
    /// # Errors
    /// Returns [`SpectrumError::InvalidDimensions`] if a dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, SpectrumError> {
        if width == 0 || height == 0 {
            return Err(SpectrumError::InvalidDimensions { width, height });
        }
        let (w, h) = (width as usize, height as usize);
        let row_plan = RealFftPlanner::<f64>::new().plan_fft_forward(w);
        let col_plan = FftPlanner::<f64>::new().plan_fft_forward(h);
        log::debug!("FFT planifiée : {w}×{h}");
        Ok(Self {
            width: w,
            height: h,
            row_plan,
            col_plan,
        })
    }

    /// `(width, height)` this transformer was planned for.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    /// Spectre 2D recentré de `frame`.
    ///
    /// # Errors
    /// Returns [`SpectrumError::DimensionMismatch`] (index 0, see
    /// [`SpectrumError::at_frame`]) if `frame` does not match the planned
    /// dimensions, or [`SpectrumError::Transform`] if the FFT backend rejects
    /// a buffer.
    pub fn transform(&self, frame: &RasterFrame) -> Result<ComplexField, SpectrumError> {
        if frame.dimensions() != self.dimensions() {
            return Err(SpectrumError::DimensionMismatch {
                index: 0,
                expected: self.dimensions(),
                found: frame.dimensions(),
            });
        }
        let (w, h) = (self.width, self.height);
        let mut spectrum = vec![Complex64::default(); w * h];

        // Lignes
        let mut row_in = self.row_plan.make_input_vec();
        let mut row_out = self.row_plan.make_output_vec();
        let mut row_scratch = self.row_plan.make_scratch_vec();
        let half = row_out.len();
        for (src, dst) in frame
            .data()
            .chunks_exact(w)
            .zip(spectrum.chunks_exact_mut(w))
        {
            for (slot, &v) in row_in.iter_mut().zip(src) {
                *slot = f64::from(v);
            }
            self.row_plan
                .process_with_scratch(&mut row_in, &mut row_out, &mut row_scratch)
                .map_err(|e| SpectrumError::Transform(e.to_string()))?;
            dst[..half].copy_from_slice(&row_out);
            for k in half..w {
                dst[k] = row_out[w - k].conj();
            }
        }

        // Colonnes
        let mut column = vec![Complex64::default(); h];
        let mut col_scratch = vec![Complex64::default(); self.col_plan.get_inplace_scratch_len()];
        for x in 0..w {
            for (y, slot) in column.iter_mut().enumerate() {
                *slot = spectrum[y * w + x];
            }
            self.col_plan.process_with_scratch(&mut column, &mut col_scratch);
            for (y, v) in column.iter().enumerate() {
                spectrum[y * w + x] = *v;
            }
        }

        ComplexField::new(w as u32, h as u32, fftshift(&spectrum, w, h))
    }
}

/// Décalage circulaire 2D : l'élément `(y, x)` part en
/// `((y + h/2) mod h, (x + w/2) mod w)`. Le bin `(0, 0)` arrive au centre
/// `(h/2, w/2)`.
///
/// # Example
/// ```
/// use sg_spectrum::fft::fftshift;
/// assert_eq!(fftshift(&[0, 1, 2, 3, 4], 5, 1), vec![3, 4, 0, 1, 2]);
/// ```
#[must_use]
pub fn fftshift<T: Copy>(data: &[T], width: usize, height: usize) -> Vec<T> {
    debug_assert_eq!(data.len(), width * height);
    let (cx, cy) = (width / 2, height / 2);
    let mut out = data.to_vec();
    for (y, row) in data.chunks_exact(width).enumerate() {
        let dy = (y + cy) % height;
        for (x, &v) in row.iter().enumerate() {
            out[dy * width + (x + cx) % width] = v;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn pattern(width: u32, height: u32) -> RasterFrame {
        let data = (0..width * height)
            .map(|i| ((i * 37 + (i / width) * 11) % 251) as u8)
            .collect();
        RasterFrame::new(width, height, data).unwrap()
    }

    /// DFT 2D directe O((WH)²), puis recentrage.
    fn naive_dft(frame: &RasterFrame) -> Vec<Complex64> {
        let (w, h) = (frame.width() as usize, frame.height() as usize);
        let mut out = vec![Complex64::default(); w * h];
        for v in 0..h {
            for u in 0..w {
                let mut acc = Complex64::default();
                for y in 0..h {
                    for x in 0..w {
                        let angle = -2.0
                            * PI
                            * ((u * x) as f64 / w as f64 + (v * y) as f64 / h as f64);
                        let sample = f64::from(frame.sample(x as u32, y as u32));
                        acc += Complex64::from_polar(sample, angle);
                    }
                }
                out[v * w + u] = acc;
            }
        }
        fftshift(&out, w, h)
    }

    #[test]
    fn matches_direct_dft_for_even_and_odd_shapes() {
        for &(w, h) in &[(4, 4), (5, 3), (6, 5), (1, 7), (8, 1)] {
            let frame = pattern(w, h);
            let fft = FrameTransformer::new(w, h).unwrap();
            let field = fft.transform(&frame).unwrap();
            let expected = naive_dft(&frame);
            for (got, want) in field.data().iter().zip(&expected) {
                assert!(
                    (got - want).norm() < 1e-6,
                    "{w}×{h}: {got} != {want}"
                );
            }
        }
    }

    #[test]
    fn preserves_shape() {
        let fft = FrameTransformer::new(7, 3).unwrap();
        let field = fft.transform(&pattern(7, 3)).unwrap();
        assert_eq!(field.dimensions(), (7, 3));
    }

    #[test]
    fn constant_frame_concentrates_energy_at_center() {
        for &(w, h) in &[(4, 4), (5, 6), (9, 3)] {
            let fft = FrameTransformer::new(w, h).unwrap();
            let field = fft.transform(&RasterFrame::filled(w, h, 200).unwrap()).unwrap();
            let dc = f64::from(w * h) * 200.0;
            let (cx, cy) = (w / 2, h / 2);
            for y in 0..h {
                for x in 0..w {
                    let z = field.get(x, y);
                    if (x, y) == (cx, cy) {
                        assert!((z.re - dc).abs() < 1e-6 && z.im.abs() < 1e-6);
                    } else {
                        assert!(z.norm() < 1e-9 * dc, "{w}×{h} bin ({x}, {y}) = {z}");
                    }
                }
            }
        }
    }

    #[test]
    fn rejects_mismatched_frame() {
        let fft = FrameTransformer::new(4, 4).unwrap();
        let err = fft.transform(&pattern(4, 5)).unwrap_err();
        assert_eq!(
            err,
            SpectrumError::DimensionMismatch {
                index: 0,
                expected: (4, 4),
                found: (4, 5)
            }
        );
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(FrameTransformer::new(0, 3).is_err());
    }

    #[test]
    fn fftshift_even_and_2d() {
        assert_eq!(fftshift(&[0, 1, 2, 3], 4, 1), vec![2, 3, 0, 1]);
        // 2×3 : la ligne 0 descend en ligne 1 (h/2 = 1), colonnes décalées de 1.
        let grid = [0, 1, 2, 3, 4, 5];
        assert_eq!(fftshift(&grid, 3, 2), vec![5, 3, 4, 2, 0, 1]);
    }
}
