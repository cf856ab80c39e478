//! Spectral pipeline: 2D FFT per frame, magnitude/phase/power extraction,
//! max-normalization to 8 bits, and the per-run orchestration.

pub mod extract;
pub mod fft;
pub mod pipeline;
pub mod render;

pub use extract::{SpectrumFields, extract};
pub use fft::FrameTransformer;
pub use pipeline::{PipelineOptions, PipelineState, SpectrumPipeline};
pub use render::render;
