use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{ClientError, RaceDataSource, ResultsClient};
use shared::{
    domain::{Round, Year},
    protocol::{RaceInfo, RaceSummary, ResultRow},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Query the F1 results server from the terminal")]
struct Cli {
    #[arg(long, env = "F1_RESULTS_API_URL", default_value = client_core::DEFAULT_API_URL)]
    api_url: String,
    /// Print the raw JSON payload instead of a table.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the races of a season.
    Races {
        #[arg(long)]
        year: Year,
    },
    /// Show the classification of one race.
    Results {
        #[arg(long)]
        year: Year,
        #[arg(long)]
        round: Round,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let cli = Cli::parse();
    let client = ResultsClient::new(&cli.api_url)?;
    debug!(base_url = %client.base_url(), command = ?cli.command, "querying results server");

    match cli.command {
        Command::Races { year } => {
            let races = client
                .list_races(year)
                .await
                .map_err(into_report)
                .with_context(|| format!("listing races for {year}"))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&races)?);
            } else {
                print!("{}", render_races(&races));
            }
        }
        Command::Results { year, round } => {
            let rows = client
                .fetch_results(year, round)
                .await
                .map_err(into_report)
                .with_context(|| format!("fetching results for {year} round {round}"))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render_results(&rows));
            }
        }
    }

    Ok(())
}

/// Prefers the server's own error over the bare HTTP status.
fn into_report(err: ClientError) -> anyhow::Error {
    match err.api_exception() {
        Some(exception) => exception.into(),
        None => err.into(),
    }
}

fn render_races(races: &[RaceSummary]) -> String {
    if races.is_empty() {
        return "No races found\n".to_string();
    }
    races
        .iter()
        .map(|race| format!("{:>3}  {}\n", race.round, race.name))
        .collect()
}

fn render_results(rows: &[ResultRow]) -> String {
    let Some(info) = RaceInfo::from_results(rows) else {
        return "No results found\n".to_string();
    };

    let mut out = format!("{}\n{}\n\n", info.race_name, info.subtitle());
    out.push_str(&format!(
        "{:>5}  {:<26} {:<22} {:>4} {:>8}  {:<18} {:>6}\n",
        "Place", "Driver", "Constructor", "Grid", "Position", "Status", "Points"
    ));
    for (index, row) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{:>5}  {:<26} {:<22} {:>4} {:>8}  {:<18} {:>6}\n",
            index + 1,
            row.driver.full_name(),
            row.constructor.name,
            row.grid,
            row.position_label(),
            row.status,
            row.points_label(),
        ));
    }
    out
}
