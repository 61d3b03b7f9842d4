// src/main.rs

use clap::error::ErrorKind;

use ocr_reduce::cli::{self, CliArgs, USAGE};
use ocr_reduce::config::{self, RunConfig};
use ocr_reduce::errors::{ARGUMENT_EXIT_CODE, ReduceError};
use ocr_reduce::{logging, report};

fn main() {
    let args = match cli::parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            println!("ERROR: {}", e.kind());
            println!("{USAGE}");
            std::process::exit(ARGUMENT_EXIT_CODE);
        }
    };

    if let Err(err) = run_main(&args) {
        if let ReduceError::Argument(_) = err {
            println!("{err}");
            println!("{USAGE}");
        } else {
            eprintln!("ocr-reduce error: {err}");
        }
        std::process::exit(err.exit_code());
    }
}

fn run_main(args: &CliArgs) -> Result<(), ReduceError> {
    // Positionals first: a bad command line must not touch the config file.
    args.reduce_params()?;

    let file = args.config.as_ref().map(config::load_and_validate).transpose()?;
    let cfg = RunConfig::resolve(args, file.as_ref())?;
    logging::init_logging(args.log_level, cfg.log_level)?;

    report::print_lines(&report::banner_lines(&cfg.params));

    if cfg.dry_run {
        let summary = ocr_reduce::dry_run(&cfg)?;
        report::print_lines(&summary.lines());
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .max_blocking_threads(cfg.workers)
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(ocr_reduce::run(&cfg))?;
    report::print_lines(&outcome.lines());
    Ok(())
}
