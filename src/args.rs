//! Command-line arguments for the `modal` binary

use clap::{value_parser, ArgAction};
use modal::config::{ParserConfig, DEFAULT_MAX_NESTING_DEPTH};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Checks Modal source files for syntax errors")]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    /// Modal source file to parse
    #[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,
    /// Reject test names that are not string literals
    #[clap(long)]
    pub strict_test_names: bool,
    /// Deepest nesting of blocks and parentheses to accept
    #[clap(long = "max-depth", value_name = "N", default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    pub max_depth: usize,
    /// Print the parsed tree to stdout
    #[clap(long)]
    pub dump_ast: bool,
}

impl Args {
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig::default()
            .with_quoted_test_names(self.strict_test_names)
            .with_max_nesting_depth(self.max_depth)
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        self.logging.log_level_filter()
    }
}

/// `-v[vv]` / `-q[q]` logging verbosity
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct LoggingArgs {
    #[clap(short = 'v', value_parser = value_parser!(u8).range(0..=3), action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    #[clap(short = 'q', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl LoggingArgs {
    /// Warnings by default; each `-v` raises the level and each `-q` lowers it.
    pub fn log_level_filter(&self) -> LevelFilter {
        match self.verbose as i8 - self.quiet as i8 {
            i8::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
