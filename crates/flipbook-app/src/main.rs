//! Headless Flipbook driver entry point.

use std::process::ExitCode;

use clap::Parser;
use flipbook_app::{AppError, Cli, Runner, Script};
use flipbook_core::{EditorConfig, FileStorage};

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Flipbook");

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("flipbook: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let script = Script::load(&cli.script)?;

    std::fs::create_dir_all(&cli.out)?;
    let storage = if cli.persist {
        FileStorage::default_location()?
    } else {
        FileStorage::new(cli.out.join("frames"))?
    };
    log::info!("Frames stored in {}", storage.base_path().display());

    let mut runner = Runner::new(config, storage, &cli.out)?;
    let summary = runner.run(&script)?;
    log::info!(
        "Ran {} steps: {} frames, {} playback images in {}",
        summary.steps,
        summary.frames,
        summary.playback_images,
        cli.out.display()
    );
    Ok(())
}
