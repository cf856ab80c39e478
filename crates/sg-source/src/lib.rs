//! Décodage de la source animée pour spectragif.

pub mod gif;

pub use gif::GifSource;
