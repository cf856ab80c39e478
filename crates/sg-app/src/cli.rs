use std::path::PathBuf;

use clap::Parser;
use sg_core::config::SpectrumConfig;

/// spectragif : spectres de magnitude, phase et power d'un GIF animé.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// GIF animé à analyser.
    pub input: PathBuf,

    /// Base des fichiers de sortie (`out.gif` → `out_magnitude.gif`, …).
    /// Défaut : le chemin d'entrée.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Durée d'affichage par frame des GIF exportés (ms).
    #[arg(long)]
    pub frame_duration: Option<u32>,

    /// Traiter les frames une par une (pas de rayon).
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Taille du pool de workers (0 = un par cœur).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Ne pas écrire les GIF de spectre.
    #[arg(long, default_value_t = false)]
    pub no_save: bool,

    /// Écrire les quatre séquences en groupes de calques PNG dans ce dossier.
    #[arg(long)]
    pub layers: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Applique les overrides CLI par-dessus la config chargée.
    pub fn apply_overrides(&self, config: &mut SpectrumConfig) {
        if let Some(ms) = self.frame_duration {
            config.frame_duration_ms = ms;
        }
        if self.sequential {
            config.parallel = false;
        }
        if let Some(n) = self.threads {
            config.threads = n;
        }
        if self.no_save {
            config.save = false;
        }
        if let Some(ref dir) = self.layers {
            config.layers_dir = Some(dir.clone());
        }
        config.clamp_all();
    }

    /// Base des chemins de sortie.
    #[must_use]
    pub fn output_base(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.input.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_config_untouched() {
        let cli = Cli::try_parse_from(["spectragif", "anim.gif"]).unwrap();
        let mut config = SpectrumConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config, SpectrumConfig::default());
        assert_eq!(cli.output_base(), PathBuf::from("anim.gif"));
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "spectragif",
            "anim.gif",
            "-o",
            "out/result.gif",
            "--frame-duration",
            "5",
            "--sequential",
            "--threads",
            "2",
            "--no-save",
            "--layers",
            "layers",
        ])
        .unwrap();
        let mut config = SpectrumConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.frame_duration_ms, 10);
        assert!(!config.parallel);
        assert_eq!(config.threads, 2);
        assert!(!config.save);
        assert_eq!(config.layers_dir, Some(PathBuf::from("layers")));
        assert_eq!(cli.output_base(), PathBuf::from("out/result.gif"));
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["spectragif"]).is_err());
    }
}
