//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use explorer_lib::view::Direction;

#[derive(Debug, Parser)]
#[command(
    name = "explorer",
    version,
    about = "Filter, sort and inspect a JSON record collection",
    long_about = "Loads a data file of the form {\"fields\": [...], \"records\": [...]},\n\
                  applies toolbar edits given on the command line and prints the\n\
                  rendered rows, facet counts and the detail panel."
)]
pub struct Cli {
    /// Data file holding field declarations and records.
    #[arg(value_name = "DATA_FILE")]
    pub data: PathBuf,

    /// Explorer configuration (JSON).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Free-text search over visible columns.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Toggle a facet option, as KEY=VALUE. Repeatable.
    #[arg(long = "facet", value_name = "KEY=VALUE", value_parser = parse_facet)]
    pub facets: Vec<(String, String)>,

    /// Sort by a field, as KEY or KEY:asc|desc.
    #[arg(long, value_name = "KEY[:DIR]", value_parser = parse_sort)]
    pub sort: Option<(String, Direction)>,

    /// Hide a column. Repeatable.
    #[arg(long = "hide", value_name = "KEY")]
    pub hide: Vec<String>,

    /// Show a column hidden by default. Repeatable.
    #[arg(long = "show", value_name = "KEY")]
    pub show: Vec<String>,

    /// Enabled features for gated facets. Repeatable.
    #[arg(long = "feature", value_name = "NAME")]
    pub features: Vec<String>,

    /// Open the detail panel on a record.
    #[arg(long, value_name = "ID")]
    pub select: Option<String>,

    /// Run a row action over the rendered rows, then reload the data file.
    #[arg(long, value_name = "NAME")]
    pub action: Option<String>,

    /// Print per-option counts for every facet.
    #[arg(long)]
    pub counts: bool,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_facet(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => {
            Ok((key.to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

fn parse_sort(s: &str) -> Result<(String, Direction), String> {
    match s.split_once(':') {
        Some((key, dir)) => Ok((key.to_string(), dir.parse()?)),
        None => Ok((s.to_string(), Direction::Asc)),
    }
}
