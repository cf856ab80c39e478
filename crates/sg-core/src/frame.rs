use crate::Complex64;
use crate::error::SpectrumError;

/// Frame grayscale 8 bits, row-major. Immuable une fois construite.
///
/// # Example
/// ```
/// use sg_core::frame::RasterFrame;
/// let frame = RasterFrame::filled(4, 3, 128).unwrap();
/// assert_eq!(frame.dimensions(), (4, 3));
/// assert_eq!(frame.data().len(), 12);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl RasterFrame {
    /// Wraps row-major samples.
    ///
    /// # Errors
    /// Returns [`SpectrumError::InvalidDimensions`] if a dimension is zero or
    /// `data.len() != width * height`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, SpectrumError> {
        check_len(width, height, data.len())?;
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Frame uniforme.
    ///
    /// # Errors
    /// Returns [`SpectrumError::InvalidDimensions`] if a dimension is zero.
    pub fn filled(width: u32, height: u32, value: u8) -> Result<Self, SpectrumError> {
        let len = width as usize * height as usize;
        Self::new(width, height, vec![value; len])
    }

    /// Convertit des pixels RGBA en luminance ITU-R 601 (alpha ignoré).
    ///
    /// # Errors
    /// Returns [`SpectrumError::InvalidDimensions`] if `rgba` does not hold
    /// exactly `width * height` pixels.
    ///
    /// # Example
    /// ```
    /// use sg_core::frame::RasterFrame;
    /// let frame = RasterFrame::from_rgba(1, 1, &[255, 255, 255, 0]).unwrap();
    /// assert_eq!(frame.sample(0, 0), 255);
    /// ```
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, SpectrumError> {
        if rgba.len() % 4 != 0 {
            return Err(SpectrumError::InvalidDimensions { width, height });
        }
        let data = rgba
            .chunks_exact(4)
            .map(|px| luma_601(px[0], px[1], px[2]))
            .collect();
        Self::new(width, height, data)
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row-major samples.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consomme la frame et rend le buffer brut.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Sample at `(x, y)`.
    #[inline(always)]
    #[must_use]
    pub fn sample(&self, x: u32, y: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height, "sample out of bounds");
        self.data[y as usize * self.width as usize + x as usize]
    }
}

/// Luminance entière ITU-R 601, arrondie (même pondération que les
/// conversions "L" usuelles).
#[inline(always)]
#[must_use]
pub fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16) as u8
}

fn check_len(width: u32, height: u32, len: usize) -> Result<(), SpectrumError> {
    if width == 0 || height == 0 || len != width as usize * height as usize {
        return Err(SpectrumError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Grille 2D row-major de même forme qu'une [`RasterFrame`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field<T> {
    data: Vec<T>,
    width: u32,
    height: u32,
}

/// Sortie du transformeur : un coefficient complexe par bin de fréquence.
pub type ComplexField = Field<Complex64>;

/// Champ réel non normalisé (magnitude, phase ou power).
pub type ScalarField = Field<f64>;

impl<T> Field<T> {
    /// Wraps row-major values.
    ///
    /// # Errors
    /// Returns [`SpectrumError::InvalidDimensions`] if a dimension is zero or
    /// `data.len() != width * height`.
    pub fn new(width: u32, height: u32, data: Vec<T>) -> Result<Self, SpectrumError> {
        check_len(width, height, data.len())?;
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// `(width, height)`.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row-major values.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Value at `(x, y)`.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &T {
        &self.data[y as usize * self.width as usize + x as usize]
    }

    /// Applique `f` à chaque valeur, même forme en sortie.
    #[must_use]
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Field<U> {
        Field {
            data: self.data.iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Les quatre séquences produites par un run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpectrumKind {
    /// Source convertie en niveaux de gris, passée telle quelle.
    Source,
    /// `ln(|z| + 1)`.
    Magnitude,
    /// Angle de `z`, radians.
    Phase,
    /// Carré de la log-magnitude (et non `|z|²`).
    Power,
}

impl SpectrumKind {
    /// All four kinds, in presentation order.
    pub const ALL: [Self; 4] = [Self::Source, Self::Magnitude, Self::Phase, Self::Power];

    /// The three derived spectra, in export order.
    pub const SPECTRA: [Self; 3] = [Self::Magnitude, Self::Phase, Self::Power];

    /// Suffixe de fichier (`anim.gif` → `anim_magnitude.gif`).
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Source => "grayscale",
            Self::Magnitude => "magnitude",
            Self::Phase => "phase",
            Self::Power => "power",
        }
    }

    /// Nom du groupe de calques côté présentation.
    #[must_use]
    pub fn group_name(self) -> &'static str {
        match self {
            Self::Source => "Original grayscale",
            Self::Magnitude => "Magnitude",
            Self::Phase => "Phase",
            Self::Power => "Power",
        }
    }
}

impl std::fmt::Display for SpectrumKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Séquence ordonnée de frames d'un même type, une par frame source.
#[derive(Clone, Debug)]
pub struct SpectrumSequence {
    kind: SpectrumKind,
    frames: Vec<RasterFrame>,
}

impl SpectrumSequence {
    fn with_capacity(kind: SpectrumKind, capacity: usize) -> Self {
        Self {
            kind,
            frames: Vec::with_capacity(capacity),
        }
    }

    /// Which spectrum this sequence holds.
    #[must_use]
    pub fn kind(&self) -> SpectrumKind {
        self.kind
    }

    /// Frames in source order.
    #[must_use]
    pub fn frames(&self) -> &[RasterFrame] {
        &self.frames
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when no frame is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Les quatre séquences alignées d'un run (source, magnitude, phase, power).
///
/// L'ajout se fait exclusivement par ligne complète via [`SpectrumSet::push`],
/// ce qui garantit des longueurs égales et l'alignement par index.
///
/// # Example
/// ```
/// use sg_core::frame::{RasterFrame, SpectrumKind, SpectrumSet};
/// let mut set = SpectrumSet::with_capacity(2, 2, 1);
/// let f = RasterFrame::filled(2, 2, 0).unwrap();
/// set.push(f.clone(), [f.clone(), f.clone(), f]).unwrap();
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.sequence(SpectrumKind::Power).len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct SpectrumSet {
    width: u32,
    height: u32,
    source: SpectrumSequence,
    magnitude: SpectrumSequence,
    phase: SpectrumSequence,
    power: SpectrumSequence,
}

impl SpectrumSet {
    /// Empty set for frames of `width × height`, reserving `frames` rows.
    #[must_use]
    pub fn with_capacity(width: u32, height: u32, frames: usize) -> Self {
        Self {
            width,
            height,
            source: SpectrumSequence::with_capacity(SpectrumKind::Source, frames),
            magnitude: SpectrumSequence::with_capacity(SpectrumKind::Magnitude, frames),
            phase: SpectrumSequence::with_capacity(SpectrumKind::Phase, frames),
            power: SpectrumSequence::with_capacity(SpectrumKind::Power, frames),
        }
    }

    /// Appends one aligned row: the source frame and its three spectra
    /// (magnitude, phase, power).
    ///
    /// # Errors
    /// Returns [`SpectrumError::DimensionMismatch`] if any frame differs from
    /// the set's dimensions; nothing is appended in that case.
    pub fn push(
        &mut self,
        source: RasterFrame,
        spectra: [RasterFrame; 3],
    ) -> Result<(), SpectrumError> {
        let index = self.len();
        let expected = (self.width, self.height);
        for frame in std::iter::once(&source).chain(spectra.iter()) {
            if frame.dimensions() != expected {
                return Err(SpectrumError::DimensionMismatch {
                    index,
                    expected,
                    found: frame.dimensions(),
                });
            }
        }
        let [magnitude, phase, power] = spectra;
        self.source.frames.push(source);
        self.magnitude.frames.push(magnitude);
        self.phase.frames.push(phase);
        self.power.frames.push(power);
        Ok(())
    }

    /// Sequence for `kind`.
    #[must_use]
    pub fn sequence(&self, kind: SpectrumKind) -> &SpectrumSequence {
        match kind {
            SpectrumKind::Source => &self.source,
            SpectrumKind::Magnitude => &self.magnitude,
            SpectrumKind::Phase => &self.phase,
            SpectrumKind::Power => &self.power,
        }
    }

    /// The four sequences in [`SpectrumKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &SpectrumSequence> {
        SpectrumKind::ALL.into_iter().map(|kind| self.sequence(kind))
    }

    /// Shared `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of aligned rows (identical for the four sequences).
    #[must_use]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// `true` when no row is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Vide les quatre séquences (fin de run, succès ou échec).
    pub fn clear(&mut self) {
        self.source.frames.clear();
        self.magnitude.frames.clear();
        self.phase.frames.clear();
        self.power.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_rejects_zero_and_short_buffers() {
        assert_eq!(
            RasterFrame::new(0, 4, vec![]),
            Err(SpectrumError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
        assert!(RasterFrame::new(2, 2, vec![0; 3]).is_err());
    }

    #[test]
    fn luma_matches_601_weights() {
        assert_eq!(luma_601(0, 0, 0), 0);
        assert_eq!(luma_601(255, 255, 255), 255);
        assert_eq!(luma_601(255, 0, 0), 76);
        assert_eq!(luma_601(0, 255, 0), 150);
        assert_eq!(luma_601(0, 0, 255), 29);
    }

    #[test]
    fn from_rgba_ignores_alpha() {
        let frame = RasterFrame::from_rgba(2, 1, &[10, 10, 10, 0, 200, 200, 200, 255]).unwrap();
        assert_eq!(frame.data(), &[10, 200]);
    }

    #[test]
    fn field_map_keeps_shape() {
        let field = Field::new(3, 2, vec![1.0f64; 6]).unwrap();
        let doubled = field.map(|v| v * 2.0);
        assert_eq!(doubled.dimensions(), (3, 2));
        assert!(doubled.data().iter().all(|&v| (v - 2.0).abs() < f64::EPSILON));
    }

    #[test]
    fn set_push_keeps_sequences_aligned() {
        let mut set = SpectrumSet::with_capacity(2, 2, 3);
        for v in 0..3u8 {
            let f = RasterFrame::filled(2, 2, v).unwrap();
            set.push(f.clone(), [f.clone(), f.clone(), f]).unwrap();
        }
        assert_eq!(set.len(), 3);
        for seq in set.iter() {
            assert_eq!(seq.len(), 3);
            for (k, frame) in seq.frames().iter().enumerate() {
                assert_eq!(frame.sample(0, 0), k as u8);
            }
        }
    }

    #[test]
    fn set_push_rejects_mismatch_without_partial_row() {
        let mut set = SpectrumSet::with_capacity(2, 2, 1);
        let ok = RasterFrame::filled(2, 2, 0).unwrap();
        let bad = RasterFrame::filled(3, 2, 0).unwrap();
        let err = set.push(ok.clone(), [ok.clone(), bad, ok]).unwrap_err();
        assert_eq!(
            err,
            SpectrumError::DimensionMismatch {
                index: 0,
                expected: (2, 2),
                found: (3, 2)
            }
        );
        assert!(set.iter().all(SpectrumSequence::is_empty));
    }

    #[test]
    fn clear_empties_every_sequence() {
        let mut set = SpectrumSet::with_capacity(1, 1, 1);
        let f = RasterFrame::filled(1, 1, 9).unwrap();
        set.push(f.clone(), [f.clone(), f.clone(), f]).unwrap();
        set.clear();
        assert!(set.is_empty());
        assert!(set.iter().all(SpectrumSequence::is_empty));
    }
}
