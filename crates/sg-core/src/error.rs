use thiserror::Error;

/// Errors raised by the spectral pipeline and its collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpectrumError {
    /// No frame to process: empty decode, empty selection or missing source.
    #[error("Aucune frame à traiter")]
    NoFrames,

    /// A frame disagrees with the dimensions established for the run.
    #[error("Dimensions incohérentes pour la frame {index} : attendu {expected:?}, reçu {found:?}")]
    DimensionMismatch {
        /// Index of the offending frame in source order.
        index: usize,
        /// Run dimensions `(width, height)`.
        expected: (u32, u32),
        /// Frame dimensions `(width, height)`.
        found: (u32, u32),
    },

    /// Invalid width/height dimensions (zero, or buffer length disagreeing).
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Referenced file does not exist.
    #[error("Fichier introuvable : {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// Input is not an animated GIF.
    #[error("Format non supporté : {format}")]
    UnsupportedFormat {
        /// The detected format.
        format: String,
    },

    /// The FFT backend rejected a buffer.
    #[error("Erreur de transformée : {0}")]
    Transform(String),

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}

impl SpectrumError {
    /// Rattache une [`SpectrumError::DimensionMismatch`] à la frame `index`.
    /// Les autres variantes sont rendues telles quelles.
    #[must_use]
    pub fn at_frame(self, index: usize) -> Self {
        match self {
            Self::DimensionMismatch {
                expected, found, ..
            } => Self::DimensionMismatch {
                index,
                expected,
                found,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_names_both_shapes() {
        let err = SpectrumError::DimensionMismatch {
            index: 3,
            expected: (4, 4),
            found: (5, 4),
        };
        let msg = err.to_string();
        assert!(msg.contains("frame 3"));
        assert!(msg.contains("(4, 4)"));
        assert!(msg.contains("(5, 4)"));
    }

    #[test]
    fn at_frame_rewrites_only_mismatch() {
        let err = SpectrumError::DimensionMismatch {
            index: 0,
            expected: (2, 2),
            found: (3, 3),
        }
        .at_frame(7);
        assert!(matches!(err, SpectrumError::DimensionMismatch { index: 7, .. }));
        assert_eq!(SpectrumError::NoFrames.at_frame(7), SpectrumError::NoFrames);
    }
}
