use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{GrayImage, ImageFormat};
use rayon::prelude::*;
use sg_core::frame::{RasterFrame, SpectrumSet};
use sg_core::traits::Presenter;

/// Présente chaque séquence comme un groupe de calques : un dossier par
/// séquence, un PNG grayscale par frame (`Frame 1.png`, `Frame 2.png`, …).
///
/// Les PNG d'un groupe sont écrits en parallèle ; les noms dépendent de
/// l'index, pas de l'ordre d'écriture.
pub struct LayerPresenter {
    root: PathBuf,
    layers_written: usize,
}

impl LayerPresenter {
    /// Presenter writing groups under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layers_written: 0,
        }
    }

    /// Dossier racine des groupes.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Total de calques écrits depuis la création.
    #[must_use]
    pub fn layers_written(&self) -> usize {
        self.layers_written
    }

    /// Chemin du calque `index` (base 0) dans le groupe `group`.
    #[must_use]
    pub fn layer_path(&self, group: &str, index: usize) -> PathBuf {
        self.root.join(group).join(format!("Frame {}.png", index + 1))
    }
}

impl Presenter for LayerPresenter {
    fn present(&mut self, sequence_name: &str, frames: &[RasterFrame]) -> Result<()> {
        let dir = self.root.join(sequence_name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Impossible de créer {}", dir.display()))?;

        frames
            .par_iter()
            .enumerate()
            .try_for_each(|(index, frame)| -> Result<()> {
                let path = self.layer_path(sequence_name, index);
                let img = GrayImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
                    .context("Buffer grayscale invalide")?;
                img.save_with_format(&path, ImageFormat::Png)
                    .with_context(|| format!("Impossible d'écrire {}", path.display()))
            })?;

        self.layers_written += frames.len();
        log::info!(
            "Groupe « {sequence_name} » : {} calque(s) dans {}",
            frames.len(),
            dir.display()
        );
        Ok(())
    }
}

/// Présente les quatre séquences (source grayscale, magnitude, phase, power),
/// dans cet ordre.
///
/// # Errors
/// Returns the first presenter error.
pub fn present_all<P: Presenter + ?Sized>(presenter: &mut P, set: &SpectrumSet) -> Result<()> {
    for sequence in set.iter() {
        presenter.present(sequence.kind().group_name(), sequence.frames())?;
    }
    Ok(())
}
