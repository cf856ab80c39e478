use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Durée par frame par défaut des GIF exportés (ms).
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// Bornes de la durée par frame. Les délais GIF sont en centièmes de seconde
/// sur 16 bits.
pub const FRAME_DURATION_RANGE_MS: (u32, u32) = (10, 65_530);

/// Configuration complète d'un run.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use sg_core::config::SpectrumConfig;
/// let config = SpectrumConfig::default();
/// assert_eq!(config.frame_duration_ms, 100);
/// assert!(config.parallel);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SpectrumConfig {
    // === Pipeline ===
    /// Traite les frames en parallèle (rayon).
    pub parallel: bool,
    /// Taille du pool dédié. 0 = pool global rayon.
    pub threads: usize,

    // === Export ===
    /// Durée d'affichage de chaque frame des GIF exportés.
    pub frame_duration_ms: u32,
    /// Écrire les trois GIF de spectre.
    pub save: bool,
    /// Dossier des groupes de calques PNG. `None` = pas de présentation.
    pub layers_dir: Option<PathBuf>,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: 0,
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            save: true,
            layers_dir: None,
        }
    }
}

impl SpectrumConfig {
    /// Ramène chaque champ dans sa plage valide.
    pub fn clamp_all(&mut self) {
        let (lo, hi) = FRAME_DURATION_RANGE_MS;
        if !(lo..=hi).contains(&self.frame_duration_ms) {
            log::warn!(
                "frame_duration_ms={} hors plage [{lo}, {hi}], ajusté",
                self.frame_duration_ms
            );
            self.frame_duration_ms = self.frame_duration_ms.clamp(lo, hi);
        }
        if self.layers_dir.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            self.layers_dir = None;
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    pipeline: Option<PipelineSection>,
    export: Option<ExportSection>,
}

#[derive(Deserialize)]
struct PipelineSection {
    parallel: Option<bool>,
    threads: Option<usize>,
}

#[derive(Deserialize)]
struct ExportSection {
    frame_duration_ms: Option<u32>,
    save: Option<bool>,
    layers_dir: Option<PathBuf>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use sg_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<SpectrumConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Parse le contenu TOML et le fusionne avec les défauts.
///
/// # Errors
/// Returns an error if the content is not valid TOML for this schema.
pub fn parse_config(content: &str) -> Result<SpectrumConfig> {
    let file: ConfigFile = toml::from_str(content)?;

    let mut config = SpectrumConfig::default();

    if let Some(p) = file.pipeline {
        if let Some(v) = p.parallel {
            config.parallel = v;
        }
        if let Some(v) = p.threads {
            config.threads = v;
        }
    }

    if let Some(e) = file.export {
        if let Some(v) = e.frame_duration_ms {
            config.frame_duration_ms = v;
        }
        if let Some(v) = e.save {
            config.save = v;
        }
        if let Some(v) = e.layers_dir {
            config.layers_dir = Some(v);
        }
    }

    config.clamp_all();
    Ok(config)
}
