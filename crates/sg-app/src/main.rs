use anyhow::Result;
use clap::Parser;
use sg_core::config::SpectrumConfig;

pub mod cli;
pub mod export;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);

    // 4. Décoder, transformer, présenter, exporter
    let report = export::run_export(&cli.input, &cli.output_base(), &config)?;

    println!(
        "{} frame(s) {}×{} traitées",
        report.frames, report.dimensions.0, report.dimensions.1
    );
    for path in &report.written {
        println!("  {}", path.display());
    }
    if let Some(ref dir) = report.layers_dir {
        println!("  calques : {}", dir.display());
    }
    Ok(())
}

/// Config depuis --config, défauts si le fichier est absent.
fn resolve_config(cli: &cli::Cli) -> Result<SpectrumConfig> {
    if cli.config.exists() {
        sg_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(SpectrumConfig::default())
    }
}
