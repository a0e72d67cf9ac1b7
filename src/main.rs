// modal: syntax checker for Modal source files

mod args;

use std::fs;
use std::process::ExitCode;

use clap::Parser as _;
use eyre::WrapErr;
use tracing::level_filters::LevelFilter;
use tracing::{debug, trace};

use args::Args;
use modal::parser::parse_source_with;

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.log_level_filter())?;
    trace!("starting modal with args: {args:?}");
    debug!("modal version: {}", env!("CARGO_PKG_VERSION"));

    let source = fs::read_to_string(&args.file)
        .wrap_err_with(|| format!("could not read '{}'", args.file.display()))?;

    let file_name = args.file.display().to_string();
    let outcome = parse_source_with(&file_name, &source, args.parser_config());

    if args.dump_ast {
        println!("{}", outcome.root);
    }

    if outcome.had_error {
        eprintln!(
            "{file_name}: {} error(s), {} statement(s) recovered",
            outcome.diagnostics.len(),
            outcome.statements().len()
        );
        return Ok(ExitCode::FAILURE);
    }

    println!(
        "{file_name}: ok, {} top-level statement(s)",
        outcome.statements().len()
    );
    Ok(ExitCode::SUCCESS)
}

fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| eyre::eyre!(err))
}
