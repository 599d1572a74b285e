//! `waypoint runs list|reload|show|suggest`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use waypoint_core::{config, RunId, RunRegistry, SuggestionsBuilder};

/// Load and inspect recorded run timelines.
#[derive(Subcommand, Debug)]
pub enum RunsCommand {
    /// List every run that loads successfully.
    List(DirArgs),

    /// Reload the run directory and report files that failed to load.
    Reload(DirArgs),

    /// Print one run's position timeline as JSON.
    Show(ShowArgs),

    /// Print run ids completing a partial id.
    Suggest(SuggestArgs),
}

#[derive(Args, Debug)]
pub struct DirArgs {
    /// Run directory. Defaults to the directory selected by ~/.waypoint/config.yaml.
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Run id (file name without `.json`).
    pub id: String,

    #[command(flatten)]
    pub dir: DirArgs,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Partial run id to complete.
    #[arg(default_value = "")]
    pub partial: String,

    #[command(flatten)]
    pub dir: DirArgs,
}

#[derive(Tabled)]
struct RunTableRow {
    #[tabled(rename = "run")]
    run: String,
    #[tabled(rename = "samples")]
    samples: usize,
    #[tabled(rename = "duration (ticks)")]
    duration: u64,
}

pub fn run(cmd: RunsCommand) -> Result<()> {
    match cmd {
        RunsCommand::List(args) => list(args),
        RunsCommand::Reload(args) => reload(args),
        RunsCommand::Show(args) => show(args),
        RunsCommand::Suggest(args) => suggest(args),
    }
}

fn open_registry(args: &DirArgs) -> Result<RunRegistry> {
    if let Some(dir) = &args.dir {
        return Ok(RunRegistry::new(dir));
    }
    let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
    let cfg = config::load_at(&home).context("failed to load waypoint config")?;
    Ok(RunRegistry::for_config(&home, &cfg))
}

fn list(args: DirArgs) -> Result<()> {
    let registry = open_registry(&args)?;
    registry.reload().log_failures();

    if registry.is_empty() {
        println!("No runs loaded from {}.", registry.dir().display());
        return Ok(());
    }

    let rows: Vec<RunTableRow> = registry
        .ids()
        .into_iter()
        .filter_map(|id| {
            let timeline = registry.get(&id)?;
            Some(RunTableRow {
                run: id.to_string(),
                samples: timeline.positions.len(),
                duration: timeline.duration_ticks(),
            })
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn reload(args: DirArgs) -> Result<()> {
    let registry = open_registry(&args)?;
    let report = registry.reload();

    let failed = report.failures().count();
    let marker = if failed == 0 {
        "✓".green().bold()
    } else {
        "!".yellow().bold()
    };
    println!(
        "{marker} Loaded {} run(s) from {} at {}",
        report.loaded(),
        registry.dir().display(),
        report.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if failed > 0 {
        println!("  {failed} file(s) could not be loaded:");
        for err in report.failures() {
            println!("  {} {err}", "✗".red());
        }
    }
    Ok(())
}

fn show(args: ShowArgs) -> Result<()> {
    let id = RunId::parse(&args.id).with_context(|| format!("'{}' is not a run id", args.id))?;
    let registry = open_registry(&args.dir)?;
    registry.reload().log_failures();

    let Some(timeline) = registry.get(&id) else {
        bail!("run '{id}' not found in {}", registry.dir().display());
    };
    println!("{}", serde_json::to_string_pretty(&*timeline)?);
    Ok(())
}

fn suggest(args: SuggestArgs) -> Result<()> {
    let registry = open_registry(&args.dir)?;
    registry.reload().log_failures();

    let suggestions = registry
        .suggest_runs(SuggestionsBuilder::new(args.partial))
        .into_inner();
    for candidate in suggestions.matching() {
        println!("{candidate}");
    }
    Ok(())
}
