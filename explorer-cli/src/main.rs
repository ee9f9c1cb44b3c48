mod cli;
mod client;
mod data;
mod render;

use std::fs::File;
use std::io;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use explorer_lib::Explorer;
use explorer_lib::action::LogRowsAction;
use explorer_lib::action::RowActionDispatcher;
use explorer_lib::config::ExplorerConfig;
use explorer_lib::model::Record;
use explorer_lib::toolbar::FeatureSet;
use explorer_lib::toolbar::ToolbarEvent;
use explorer_lib::toolbar::ToolbarOutcome;
use log::info;
use log::warn;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::cli::Cli;
use crate::client::EchoClient;
use crate::data::JsonFileSource;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: failed to initialize logger: {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) -> CliResult<()> {
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    match &cli.log_file {
        Some(path) => WriteLogger::init(level, Config::default(), File::create(path)?)?,
        None => TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )?,
    }
    Ok(())
}

fn load_config(cli: &Cli) -> CliResult<ExplorerConfig> {
    match &cli.config {
        Some(path) => Ok(ExplorerConfig::from_json(&std::fs::read_to_string(path)?)?),
        None => Ok(ExplorerConfig::default()),
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = load_config(&cli)?;
    let source = JsonFileSource::new(&cli.data);
    let file = source.load().await?;
    let registry = file.registry()?;
    info!(
        "loaded {} fields and {} records from {}",
        registry.len(),
        file.records.len(),
        cli.data.display()
    );

    let mut actions = RowActionDispatcher::new().with_client(Arc::new(EchoClient));
    actions.register_action("log-rows", LogRowsAction);

    let mut explorer = Explorer::mount(registry, file.records, config).with_actions(actions);
    if !cli.features.is_empty() {
        explorer = explorer.with_entitlements(FeatureSet::new(cli.features.iter().cloned()));
    }

    apply_edits(&mut explorer, &cli);

    if let Some(id) = &cli.select
        && !explorer.click_row(id)
    {
        warn!("no record with id '{}'", id);
    }

    if let Some(name) = &cli.action {
        let run = explorer.run_action(name, &source).await?;
        info!("action '{}' ran over {} rows", run.report.action, run.report.rows);
        if let Some(Err(e)) = &run.refresh {
            eprintln!("Warning: action '{}' ran but reloading failed: {}", name, e);
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render::write_rows(&mut out, &explorer)?;
    if cli.counts {
        writeln!(out)?;
        render::write_counts(&mut out, &explorer)?;
    }
    if explorer.selection().panel_open() {
        writeln!(out)?;
        render::write_panel(&mut out, &explorer)?;
    }

    explorer.unmount();
    Ok(())
}

/// Feeds the command-line edits through the toolbar, as a user would.
fn apply_edits<R: Record>(explorer: &mut Explorer<R>, cli: &Cli) {
    let now = Instant::now();
    let mut events = Vec::new();

    for key in &cli.show {
        events.push(ToolbarEvent::set_column_visible(key.clone(), true));
    }
    for key in &cli.hide {
        events.push(ToolbarEvent::set_column_visible(key.clone(), false));
    }
    for (key, value) in &cli.facets {
        events.push(ToolbarEvent::toggle_facet(key.clone(), value.clone()));
    }
    if let Some((key, direction)) = &cli.sort {
        events.push(ToolbarEvent::sort_by(key.clone(), Some(*direction)));
    }
    if let Some(query) = &cli.query {
        events.push(ToolbarEvent::TextInput(query.clone()));
    }

    for event in events {
        if let ToolbarOutcome::Rejected(err) = explorer.toolbar(event, now) {
            eprintln!("Warning: {}", err);
        }
    }
    explorer.flush();
}
