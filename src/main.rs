use anyhow::Context;
use clap::Parser;
use photo_compress::cli::Args;
use photo_compress::{error, info, logger, run, success};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    match compress(&args) {
        Ok(true) => {
            success!("Compression finished!");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            error!("Compression failed!");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn compress(args: &Args) -> anyhow::Result<bool> {
    if let Some(preset) = args.preset() {
        info!("{}", preset.banner());
    }

    let request = args.to_request().context("invalid options")?;

    info!("🚀 Photo Compress starting");
    info!("📁 Input path: {}", request.input.display());

    Ok(run(&request))
}
