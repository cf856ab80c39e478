//! Types, traits, and configuration shared across the spectragif workspace.
//!
//! Frames, spectral fields and sequences live here so that the decoder,
//! the spectral pipeline and the exporters agree on one data model without
//! depending on each other.

pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use config::SpectrumConfig;
pub use error::SpectrumError;
pub use frame::{ComplexField, RasterFrame, ScalarField, SpectrumKind, SpectrumSequence, SpectrumSet};

/// Complex sample type used by every spectral field.
pub type Complex64 = realfft::num_complex::Complex<f64>;
