//! jstream CLI: typed stream tools for shell pipelines.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{normalize_args, Cli, Commands};
use jstream_core::config::ToolConfig;
use jstream_exec::{ExecError, PrintOptions, Runtime};
use jstream_operators::{Filter, LineParser, ParseOptions, Select, Slice, Sort};

fn init_tracing(cli: &Cli, cfg: &ToolConfig) {
    // stdout carries data, so logs only ever go to stderr.
    //   --quiet   → off
    //   --verbose → JSTREAM_LOG, then RUST_LOG, else "debug"
    //   default   → ToolConfig::log_filter ("warn" unless JSTREAM_LOG is set)
    let filter = if cli.quiet {
        EnvFilter::new("off")
    } else if cli.verbose {
        EnvFilter::try_from_env("JSTREAM_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    let cfg = ToolConfig::from_env();
    init_tracing(&cli, &cfg);

    if let Err(e) = run(cli.command, cfg) {
        if e.is_broken_pipe() {
            tracing::debug!("downstream closed the pipe");
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(e.exit_code());
    }
}

fn run(command: Commands, cfg: ToolConfig) -> Result<(), ExecError> {
    let runtime = Runtime::new(cfg);

    match command {
        Commands::Filter { unique, expr } => {
            let filter = Filter { expr, unique };
            runtime.run_operator_stdio(&filter)?;
        }
        Commands::Select { columns } => {
            runtime.run_operator_stdio(&Select { columns })?;
        }
        Commands::Sort { column, reverse } => {
            runtime.run_operator_stdio(&Sort { column, reverse })?;
        }
        Commands::Slice { offset, num, step } => {
            let slice = Slice::new(offset, num, step)?;
            runtime.run_operator_stdio(&slice)?;
        }
        Commands::Print {
            sponge,
            col_width,
            json,
        } => {
            let opts = PrintOptions {
                sponge,
                col_width,
                json,
            };
            runtime.print_stdio(&opts)?;
        }
        Commands::Parse {
            row_delimiter,
            regex,
            csv,
            trim,
            columns,
        } => {
            let parser = LineParser::from_options(&ParseOptions {
                columns,
                csv,
                regex,
                trim,
                row_delimiter,
            })?;
            runtime.run_parser_stdio(&parser)?;
        }
    }
    Ok(())
}
