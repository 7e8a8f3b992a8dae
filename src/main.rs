use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use sru_cql::Settings;
use sru_cql::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "cql")]
#[command(about = "Parse SRU/CQL queries and compile them into backend search queries")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and compile a CQL query
    Check {
        /// The CQL query (reads from stdin if not provided)
        query: Option<String>,

        /// JSON settings file with parser switches and field mappings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only validate syntax, don't compile
        #[arg(long)]
        syntax_only: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Print diagnostics as an SRU XML response
        #[arg(long)]
        xml: bool,
    },

    /// List the diagnostics queries can be rejected with
    Diagnostics,

    /// Show documentation, optionally for one topic
    Docs {
        /// Topic name (use 'cql docs' to list topics)
        topic: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            query,
            config,
            syntax_only,
            format,
            xml,
        } => run_check(query, config, syntax_only, format, xml),
        Commands::Diagnostics => {
            print!("{}", cli::diagnostics_table());
            Ok(())
        }
        Commands::Docs { topic: None } => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Docs { topic: Some(topic) } => cli::get_doc_topic(&topic).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run_check(
    query: Option<String>,
    config: Option<PathBuf>,
    syntax_only: bool,
    format: OutputFormat,
    xml: bool,
) -> Result<(), CliError> {
    let query = match query {
        Some(q) => q,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer.trim_end_matches(['\r', '\n']).to_string()
        }
        None => return Err(CliError::NoQuery),
    };

    let settings = match config {
        Some(path) => Settings::from_path(path)?,
        None => Settings::default(),
    };

    let options = CheckOptions {
        query,
        settings,
        syntax_only,
    };

    let result = match cli::execute_check(&options) {
        Ok(result) => result,
        Err(CliError::Diagnostic(diagnostic)) if xml => {
            io::stdout().write_all(&diagnostic.render_xml())?;
            return Err(CliError::Diagnostic(diagnostic));
        }
        Err(e) => return Err(e),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result.to_json())?),
        OutputFormat::Text => match result {
            CheckResult::SyntaxValid(query) => println!("{}", query.to_cql()),
            CheckResult::Compiled {
                es, result_set_id, ..
            } => {
                println!("{}", es);
                if let Some(id) = result_set_id {
                    println!("resultSetId: {}", id);
                }
            }
        },
    }
    Ok(())
}
