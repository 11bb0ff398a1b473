use clap::Parser;
use log::LevelFilter;
use tagbin::cli::{Args, Commands};
use tagbin::commands::barcodes::{self, BarcodeOptions};
use tagbin::commands::flycodes::{self, FlycodeOptions};
use tagbin::config::Config;

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    let mut config = match &args.config {
        Some(path) => match Config::from_path(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        },
        None => Config::load(),
    };

    let result = match args.command {
        Commands::Barcodes {
            sample_id,
            reference_seq,
            barcodes,
            barcode_regex,
            output_dir,
            clustering,
        } => {
            clustering.apply(&mut config);
            barcodes::run(
                BarcodeOptions {
                    sample_id,
                    reference_seq,
                    barcodes,
                    barcode_regex,
                    output_dir,
                },
                &config,
            )
        }
        Commands::Flycodes {
            flycodes,
            sequences,
            output_dir,
            clustering,
        } => {
            clustering.apply(&mut config);
            flycodes::run(
                FlycodeOptions {
                    flycodes,
                    sequences,
                    output_dir,
                },
                &config,
            )
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
