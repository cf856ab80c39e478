use sg_core::{RasterFrame, ScalarField, SpectrumError};

/// Normalise un champ par son propre maximum vers `[0, 255]`.
///
/// Chaque échantillon vaut `255 · (v / max)`, tronqué puis borné. Un champ de
/// maximum nul (ou non fini) donne une frame noire. La normalisation est
/// par frame : la luminosité peut varier d'une frame à l'autre.
///
/// # Errors
/// Propagates [`SpectrumError::InvalidDimensions`] from frame construction;
/// a well-formed field never triggers it.
///
/// # Example
/// ```
/// use sg_core::ScalarField;
/// use sg_spectrum::render::render;
/// let field = ScalarField::new(3, 1, vec![0.0, 1.0, 2.0]).unwrap();
/// assert_eq!(render(&field).unwrap().data(), &[0, 127, 255]);
/// ```
pub fn render(field: &ScalarField) -> Result<RasterFrame, SpectrumError> {
    let (width, height) = field.dimensions();
    let max = field.data().iter().copied().fold(f64::NEG_INFINITY, f64::max);

    #[allow(clippy::float_cmp)]
    let degenerate = max == 0.0;
    if degenerate || !max.is_finite() {
        if !degenerate {
            log::warn!("Champ de maximum non fini ({max}), frame noire");
        }
        return RasterFrame::filled(width, height, 0);
    }

    let data = field
        .data()
        .iter()
        .map(|&v| (255.0 * (v / max)).clamp(0.0, 255.0) as u8)
        .collect();
    RasterFrame::new(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(values: Vec<f64>) -> ScalarField {
        let w = values.len() as u32;
        ScalarField::new(w, 1, values).unwrap()
    }

    #[test]
    fn max_maps_to_255_and_truncates() {
        let frame = render(&scalar(vec![0.0, 0.5, 1.5, 3.0])).unwrap();
        // 255·(0.5/3) ≈ 42.5 → 42, 255·(1.5/3) = 127.5 → 127
        assert_eq!(frame.data(), &[0, 42, 127, 255]);
    }

    #[test]
    fn all_zero_field_is_black() {
        let frame = render(&scalar(vec![0.0; 8])).unwrap();
        assert!(frame.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        let frame = render(&scalar(vec![-3.0, -1.0, 0.0, 2.0])).unwrap();
        assert_eq!(frame.data(), &[0, 0, 0, 255]);
    }

    #[test]
    fn all_negative_field_saturates_at_its_maximum() {
        // max < 0 : v/max ≥ 1 partout, tout sature.
        let frame = render(&scalar(vec![-3.0, -1.0])).unwrap();
        assert_eq!(frame.data(), &[255, 255]);
    }

    #[test]
    fn non_finite_max_is_black() {
        let frame = render(&scalar(vec![1.0, f64::INFINITY])).unwrap();
        assert!(frame.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn output_range_and_peak() {
        let values: Vec<f64> = (0..100).map(|i| (f64::from(i) * 0.37).sin() * 4.0).collect();
        let frame = render(&ScalarField::new(10, 10, values).unwrap()).unwrap();
        assert_eq!(frame.dimensions(), (10, 10));
        assert!(frame.data().contains(&255));
    }
}
