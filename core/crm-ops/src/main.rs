//! crm-ops: inspect Pacemaker resource history from the CIB.
//!
//! ## Subcommands
//!
//! - `table`: Print every node, resource and operation (default)
//! - `dump`: Print the decoded model as JSON
//! - `check`: Probe one resource, exit status reflects its health
//! - `cgi`: Answer a CGI health probe (default when `GATEWAY_INTERFACE` is set)

mod cgi;
mod logging;
mod table;

use cib_core::probe::{self, ProbeRequest, BAD_REQUEST, INTERNAL_ERROR};
use cib_core::{decode_strict, load_config, CibError, CibModel, CibSource, Config};
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "crm-ops")]
#[command(about = "Pacemaker resource status inspector")]
#[command(version)]
struct Cli {
    /// Read the CIB from a file instead of running cibadmin
    #[arg(long, global = true, value_name = "PATH")]
    cib_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resource history table
    Table,

    /// Print the decoded resource history as JSON
    Dump,

    /// Check whether a resource is running on a node
    Check {
        /// Node name (defaults to this host's name)
        #[arg(long)]
        node: Option<String>,

        /// Resource id
        #[arg(long)]
        resource: Option<String>,
    },

    /// Answer a CGI health probe (reads QUERY_STRING)
    Cgi,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Cib(#[from] CibError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let logging_guard = logging::init();
    let under_cgi = std::env::var_os("GATEWAY_INTERFACE").is_some();
    let cli = parse_cli_from(std::env::args_os(), under_cgi);

    let config = load_config();
    let source = select_source(&cli, &config);
    let color = config.color && !cli.no_color && io::stdout().is_terminal();

    let command = cli.command.unwrap_or(if under_cgi {
        Commands::Cgi
    } else {
        Commands::Table
    });

    let exit_code = match command {
        Commands::Table => report(run_table(&source, color), "table", &source),
        Commands::Dump => report(run_dump(&source), "dump", &source),
        Commands::Check { node, resource } => run_check(&source, node, resource),
        Commands::Cgi => {
            // The web server only sees stdout; a failed write is all we can report.
            if let Err(e) = cgi::run(&source) {
                tracing::error!(error = %e, "crm-ops cgi failed");
            }
            0
        }
    };

    // Flush file logging before exiting.
    drop(logging_guard);
    std::process::exit(exit_code);
}

/// Parses the command line. Under CGI a web server may pass an ISINDEX
/// query as arguments; anything clap rejects there still runs the CGI handler
/// so the client always gets a `Status:` response.
fn parse_cli_from<I, T>(args: I, under_cgi: bool) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    if !under_cgi {
        return Cli::parse_from(args);
    }

    Cli::try_parse_from(args).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Ignoring CGI arguments");
        Cli {
            cib_file: None,
            no_color: false,
            command: Some(Commands::Cgi),
        }
    })
}

fn report(result: Result<(), CliError>, command: &str, source: &CibSource) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, source = %source.describe(), "crm-ops {} failed", command);
            1
        }
    }
}

fn select_source(cli: &Cli, config: &Config) -> CibSource {
    match &cli.cib_file {
        Some(path) => CibSource::File(path.clone()),
        None => config.source(),
    }
}

fn load_model(source: &CibSource) -> Result<CibModel, CliError> {
    let document = source.load()?;
    Ok(decode_strict(&document)?)
}

fn run_table(source: &CibSource, color: bool) -> Result<(), CliError> {
    let model = load_model(source)?;
    let mut stdout = io::stdout().lock();
    table::write_table(&mut stdout, &model, table::Palette::new(color))?;
    stdout.flush()?;
    Ok(())
}

fn run_dump(source: &CibSource) -> Result<(), CliError> {
    let model = load_model(source)?;
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &model)?;
    writeln!(stdout)?;
    Ok(())
}

/// Returns the process exit code: 0 healthy, 1 not running or not found,
/// 2 bad request or CIB unavailable.
fn run_check(source: &CibSource, node: Option<String>, resource: Option<String>) -> i32 {
    let request = ProbeRequest::new(node, resource);
    let response = probe::probe(&request, probe::local_hostname(), || source.load());
    println!("{}", response.message);

    if response.is_healthy() {
        return 0;
    }
    match response.code {
        BAD_REQUEST | INTERNAL_ERROR => 2,
        _ => 1,
    }
}
