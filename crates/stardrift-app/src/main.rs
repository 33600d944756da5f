//! The binary entry point for Stardrift.

use clap::Parser;
use stardrift_app::platform::PlatformDirs;
use stardrift_app::{AppError, run};
use stardrift_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = try_main(&args) {
        eprintln!("stardrift: {e}");
        std::process::exit(1);
    }
}

fn try_main(args: &CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(root) => PlatformDirs::with_root(root),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_all()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);
    config.validate()?;

    stardrift_log::init_logging(
        Some(&dirs.log_dir),
        config.debug.log_to_file,
        Some(&config),
    );
    tracing::info!(config = %dirs.config_dir.display(), "starting stardrift");

    let summary = run(&config, &dirs)?;
    println!(
        "presented {} frames ({} drawn, {} idle), {} stars, {} comets",
        summary.frames, summary.drawn, summary.idle, summary.stars, summary.comets
    );
    if let Some(path) = summary.snapshot {
        println!("snapshot: {}", path.display());
    }
    Ok(())
}
