use std::f64::consts::{PI, TAU};

use sg_core::{ComplexField, ScalarField};

/// Les trois champs dérivés d'un spectre complexe.
#[derive(Clone, Debug)]
pub struct SpectrumFields {
    /// `ln(|z| + 1)`.
    pub magnitude: ScalarField,
    /// `atan2(im, re)` dans `(−π, π]`.
    pub phase: ScalarField,
    /// `magnitude²`. Carré de la log-magnitude, pas la densité spectrale
    /// `|z|²` : c'est ce que les GIF "power" ont toujours montré.
    pub power: ScalarField,
}

/// Magnitude, phase et power d'un champ complexe. Fonction pure.
///
/// # Example
/// ```
/// use sg_core::{Complex64, ComplexField};
/// use sg_spectrum::extract::extract;
/// let field = ComplexField::new(1, 1, vec![Complex64::new(0.0, 0.0)]).unwrap();
/// let fields = extract(&field);
/// assert_eq!(*fields.magnitude.get(0, 0), 0.0);
/// ```
#[must_use]
pub fn extract(field: &ComplexField) -> SpectrumFields {
    let magnitude = field.map(|z| (z.norm() + 1.0).ln());
    let phase = field.map(|z| {
        // Angle indéfini pour un bin nul, y compris ±0.
        if z.re == 0.0 && z.im == 0.0 {
            0.0
        } else {
            fold_phase(z.arg())
        }
    });
    let power = magnitude.map(|m| m * m);
    SpectrumFields {
        magnitude,
        phase,
        power,
    }
}

/// Replie un angle `atan2` de `[−π, π]` vers `(−π, π]`.
#[inline]
#[must_use]
pub fn fold_phase(angle: f64) -> f64 {
    if angle <= -PI { angle + TAU } else { angle }
}
