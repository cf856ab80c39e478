use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sg_core::config::SpectrumConfig;
use sg_core::frame::{RasterFrame, SpectrumSet};
use sg_core::traits::{Encoder, Presenter};
use sg_export::encoder::{GifEncoderSink, export_spectra};
use sg_export::layers::{LayerPresenter, present_all};
use sg_source::gif::GifSource;
use sg_spectrum::pipeline::{PipelineOptions, SpectrumPipeline};

/// Bilan d'un run réussi.
#[derive(Debug)]
pub struct ExportReport {
    /// Frames par séquence.
    pub frames: usize,
    /// Dimensions partagées `(width, height)`.
    pub dimensions: (u32, u32),
    /// GIF écrits (magnitude, phase, power), vide si la sauvegarde est coupée.
    pub written: Vec<PathBuf>,
    /// Dossier des calques, si présentés.
    pub layers_dir: Option<PathBuf>,
}

/// Point d'entrée d'un run complet depuis un fichier GIF.
///
/// # Errors
/// Retourne une erreur si le décodage, le traitement, la présentation ou
/// l'encodage échoue. Aucune sortie partielle n'est rapportée.
pub fn run_export(input: &Path, output_base: &Path, config: &SpectrumConfig) -> Result<ExportReport> {
    log::info!("Étape 1/3 : décodage de {}", input.display());
    let frames = GifSource::open(input)?.into_frames();

    let mut layers = config.layers_dir.as_ref().map(LayerPresenter::new);
    let mut encoder = config.save.then_some(GifEncoderSink);

    let mut report = process_frames(
        &frames,
        output_base,
        config,
        layers.as_mut().map(|p| p as &mut dyn Presenter),
        encoder.as_mut().map(|e| e as &mut dyn Encoder),
    )?;
    report.layers_dir = layers.map(|p| p.root().to_path_buf());
    Ok(report)
}

/// Transforme `frames` puis livre les séquences aux collaborateurs fournis.
///
/// Les quatre séquences sont vidées en fin de run, succès ou échec.
///
/// # Errors
/// Pipeline errors (empty or inconsistent source) and collaborator errors.
pub fn process_frames(
    frames: &[RasterFrame],
    output_base: &Path,
    config: &SpectrumConfig,
    presenter: Option<&mut dyn Presenter>,
    encoder: Option<&mut dyn Encoder>,
) -> Result<ExportReport> {
    log::info!("Étape 2/3 : transformée de {} frame(s)", frames.len());
    let mut pipeline = SpectrumPipeline::new(PipelineOptions::from(config));
    let mut set = pipeline.run(frames)?;

    let outcome = deliver(&set, output_base, config, presenter, encoder);
    set.clear();
    if let Err(ref e) = outcome {
        log::error!("Livraison échouée, séquences abandonnées : {e:#}");
    }
    outcome
}

fn deliver(
    set: &SpectrumSet,
    output_base: &Path,
    config: &SpectrumConfig,
    presenter: Option<&mut dyn Presenter>,
    encoder: Option<&mut dyn Encoder>,
) -> Result<ExportReport> {
    log::info!("Étape 3/3 : présentation et export");
    if let Some(presenter) = presenter {
        present_all(presenter, set).context("Présentation des séquences échouée")?;
    }
    let written = match encoder {
        Some(encoder) => export_spectra(encoder, set, output_base, config.frame_duration_ms)?,
        None => Vec::new(),
    };
    Ok(ExportReport {
        frames: set.len(),
        dimensions: set.dimensions(),
        written,
        layers_dir: None,
    })
}
