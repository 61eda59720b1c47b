//! The `grove` binary: generate a scene from config and print a summary.

use clap::Parser;
use grove_app::platform::PlatformDirs;
use grove_app::{AppError, config_dir, load_config, run};
use grove_config::CliArgs;

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = try_main(&args) {
        eprintln!("grove: {e}");
        std::process::exit(1);
    }
}

fn try_main(args: &CliArgs) -> Result<(), AppError> {
    let dirs = PlatformDirs::resolve()?;
    dirs.create_dirs()?;

    let config = load_config(&config_dir(args, &dirs), args)?;
    grove_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    let summary = run(&config)?;
    tracing::info!(objects = summary.objects(), "done");
    println!("{summary}");
    Ok(())
}
