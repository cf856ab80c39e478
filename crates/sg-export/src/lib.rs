//! Sorties de spectragif : GIF animés par spectre et groupes de calques PNG.

pub mod encoder;
pub mod layers;

pub use encoder::{GifEncoderSink, export_spectra, suffixed_path};
pub use layers::{LayerPresenter, present_all};
