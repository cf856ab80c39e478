use std::path::Path;

use anyhow::Result;

use crate::frame::RasterFrame;

/// Fournit la séquence source décodée au pipeline.
///
/// Implémenté par : `GifSource`.
///
/// # Example
/// ```
/// use sg_core::traits::FrameSource;
/// use sg_core::frame::RasterFrame;
///
/// struct Still(Vec<RasterFrame>);
/// impl FrameSource for Still {
///     fn frames(&self) -> &[RasterFrame] { &self.0 }
///     fn dimensions(&self) -> (u32, u32) { (1, 1) }
/// }
/// ```
pub trait FrameSource {
    /// Frames grayscale, dans l'ordre de la source.
    fn frames(&self) -> &[RasterFrame];

    /// Dimensions partagées `(width, height)` annoncées par le conteneur.
    fn dimensions(&self) -> (u32, u32);
}

/// Affiche une séquence nommée (groupe de calques, fenêtre, etc.).
///
/// Appelé une fois par séquence après un run réussi, frames dans l'ordre.
///
/// # Example
/// ```
/// use sg_core::traits::Presenter;
/// use sg_core::frame::RasterFrame;
///
/// struct Count(usize);
/// impl Presenter for Count {
///     fn present(&mut self, _name: &str, frames: &[RasterFrame]) -> anyhow::Result<()> {
///         self.0 += frames.len();
///         Ok(())
///     }
/// }
/// ```
pub trait Presenter {
    /// Présente `frames` sous le nom `sequence_name`.
    ///
    /// # Errors
    /// Implementation-defined (I/O of the host).
    fn present(&mut self, sequence_name: &str, frames: &[RasterFrame]) -> Result<()>;
}

/// Sérialise une séquence en image animée.
pub trait Encoder {
    /// Écrit `frames` dans `path`, chaque frame affichée `frame_duration_ms`,
    /// en boucle infinie.
    ///
    /// # Errors
    /// Implementation-defined (I/O or codec failure, empty sequence).
    fn encode(&mut self, frames: &[RasterFrame], path: &Path, frame_duration_ms: u32) -> Result<()>;
}
