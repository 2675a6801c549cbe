#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use commands::SourceArgs;
use docmap_core::{effective_log_level, Config};
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docmap")]
#[command(author, version, about = "Map package exports to documentation entry points", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve entry points and module names without writing anything
    Resolve {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Write the documentation generator's options file
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Options file to write (list configs get a .N suffix)
        #[arg(short, long, value_name = "FILE")]
        out_file: Option<PathBuf>,

        /// Run `<BIN> --options <FILE>` for every written file
        #[arg(long, value_name = "BIN")]
        exec: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    let source = match &cli.command {
        Some(Commands::Resolve { source } | Commands::Generate { source, .. }) => source,
        Some(Commands::Version) | None => {
            logging::init(effective_log_level(config.verbosity, &[]), config.json_logs);
            return commands::version::run(cli.json);
        }
    };

    // Options carry their own logLevel, so they load before logging starts
    let options = match commands::load_options(&config.cwd, source) {
        Ok(options) => options,
        Err(err) => return commands::fail(err, cli.json),
    };

    logging::init(
        effective_log_level(config.verbosity, &options),
        config.json_logs,
    );

    match &cli.command {
        Some(Commands::Resolve { .. }) => {
            let _span = tracing::info_span!("resolve", cmd = "resolve", cwd = %cwd.display())
                .entered();
            commands::resolve::run(&config.cwd, &options, cli.json)
        }
        Some(Commands::Generate { out_file, exec, .. }) => {
            let _span = tracing::info_span!("generate", cmd = "generate", cwd = %cwd.display())
                .entered();
            commands::generate::run(
                &config.cwd,
                &options,
                out_file.as_deref(),
                exec.as_deref(),
                cli.json,
            )
        }
        Some(Commands::Version) | None => commands::version::run(cli.json),
    }
}
