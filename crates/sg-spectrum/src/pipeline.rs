use rayon::prelude::*;
use sg_core::{RasterFrame, SpectrumConfig, SpectrumError, SpectrumSet};

use crate::extract::extract;
use crate::fft::FrameTransformer;
use crate::render::render;

/// Spectres rendus d'une frame : `[magnitude, phase, power]`.
type FrameSpectra = [RasterFrame; 3];

/// État de l'orchestrateur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// Aucune séquence chargée.
    Idle,
    /// Source validée, frames en cours de traitement.
    Processing,
    /// Quatre séquences alignées livrées à l'appelant.
    Done,
    /// Le traitement a échoué ; aucune sortie partielle n'a été exposée.
    Failed,
}

/// Ordonnancement des frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Une tâche rayon par frame. `false` = boucle séquentielle.
    pub parallel: bool,
    /// Taille d'un pool dédié. 0 = pool global.
    pub threads: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: 0,
        }
    }
}

impl From<&SpectrumConfig> for PipelineOptions {
    fn from(config: &SpectrumConfig) -> Self {
        Self {
            parallel: config.parallel,
            threads: config.threads,
        }
    }
}

/// Orchestrateur d'un run : source → (FFT → extraction → rendu ×3) par frame.
///
/// Chaque run repart de `Idle`. Une source vide ou incohérente est rejetée
/// avant `Processing`. Un run livre les quatre séquences alignées ou rien.
///
/// # Example
/// ```
/// use sg_core::RasterFrame;
/// use sg_spectrum::pipeline::{PipelineOptions, PipelineState, SpectrumPipeline};
///
/// let mut pipeline = SpectrumPipeline::new(PipelineOptions::default());
/// let frames = vec![RasterFrame::filled(4, 4, 128).unwrap(); 2];
/// let set = pipeline.run(&frames).unwrap();
/// assert_eq!(set.len(), 2);
/// assert_eq!(pipeline.state(), PipelineState::Done);
/// ```
pub struct SpectrumPipeline {
    options: PipelineOptions,
    state: PipelineState,
}

impl SpectrumPipeline {
    /// Create an idle pipeline.
    #[must_use]
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            state: PipelineState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Traite toutes les frames de `source`.
    ///
    /// # Errors
    /// - [`SpectrumError::NoFrames`] if `source` is empty (state stays `Idle`);
    /// - [`SpectrumError::DimensionMismatch`] if a frame differs from the
    ///   first one (state stays `Idle`);
    /// - any error raised while processing a frame (state becomes `Failed`).
    pub fn run(&mut self, source: &[RasterFrame]) -> Result<SpectrumSet, SpectrumError> {
        self.state = PipelineState::Idle;
        let dims = validate(source)?;

        self.state = PipelineState::Processing;
        log::info!(
            "Traitement de {} frame(s) {}×{} ({})",
            source.len(),
            dims.0,
            dims.1,
            if self.options.parallel { "parallèle" } else { "séquentiel" }
        );

        match self.process(source, dims) {
            Ok(set) => {
                self.state = PipelineState::Done;
                log::info!("Run terminé : {} frame(s) par séquence", set.len());
                Ok(set)
            }
            Err(e) => {
                self.state = PipelineState::Failed;
                log::error!("Run échoué : {e}");
                Err(e)
            }
        }
    }

    fn process(
        &self,
        source: &[RasterFrame],
        (width, height): (u32, u32),
    ) -> Result<SpectrumSet, SpectrumError> {
        let transformer = FrameTransformer::new(width, height)?;

        // Placement indexé : l'ordre d'achèvement des workers est sans effet.
        let mut slots: Vec<Option<FrameSpectra>> = vec![None; source.len()];

        if self.options.parallel {
            let mut work = || {
                slots
                    .par_iter_mut()
                    .zip(source.par_iter())
                    .enumerate()
                    .try_for_each(|(k, (slot, frame))| fill_slot(&transformer, k, slot, frame))
            };
            if self.options.threads > 0 {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(self.options.threads)
                    .build()
                    .map_err(|e| SpectrumError::Config(e.to_string()))?;
                pool.install(work)?;
            } else {
                work()?;
            }
        } else {
            slots
                .iter_mut()
                .zip(source)
                .enumerate()
                .try_for_each(|(k, (slot, frame))| fill_slot(&transformer, k, slot, frame))?;
        }

        let mut set = SpectrumSet::with_capacity(width, height, source.len());
        for (k, (frame, slot)) in source.iter().zip(slots).enumerate() {
            let spectra = slot.ok_or_else(|| {
                SpectrumError::Transform(format!("frame {k} non traitée"))
            })?;
            set.push(frame.clone(), spectra).map_err(|e| e.at_frame(k))?;
        }
        Ok(set)
    }
}

/// Spectres rendus `[magnitude, phase, power]` d'une frame.
///
/// # Errors
/// Propagates transform errors (dimension mismatch, FFT backend).
pub fn frame_spectra(
    transformer: &FrameTransformer,
    frame: &RasterFrame,
) -> Result<[RasterFrame; 3], SpectrumError> {
    let fields = extract(&transformer.transform(frame)?);
    Ok([
        render(&fields.magnitude)?,
        render(&fields.phase)?,
        render(&fields.power)?,
    ])
}

fn fill_slot(
    transformer: &FrameTransformer,
    index: usize,
    slot: &mut Option<FrameSpectra>,
    frame: &RasterFrame,
) -> Result<(), SpectrumError> {
    *slot = Some(frame_spectra(transformer, frame).map_err(|e| e.at_frame(index))?);
    Ok(())
}

/// Dimensions communes de la source, établies par la première frame.
fn validate(source: &[RasterFrame]) -> Result<(u32, u32), SpectrumError> {
    let first = source.first().ok_or(SpectrumError::NoFrames)?;
    let expected = first.dimensions();
    for (index, frame) in source.iter().enumerate().skip(1) {
        if frame.dimensions() != expected {
            return Err(SpectrumError::DimensionMismatch {
                index,
                expected,
                found: frame.dimensions(),
            });
        }
    }
    Ok(expected)
}
