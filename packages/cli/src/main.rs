#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for earthquake bulletins.
//!
//! Extracts records from a PHIVOLCS or JMA bulletin URL and prints them,
//! their statistics, or both as JSON on stdout. Logs and progress bars go
//! to stderr through [`quake_bulletin_cli_utils::init_logger`], so stdout
//! can be piped straight into other tools.

mod fetcher;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use quake_bulletin_analytics::summarize;
use quake_bulletin_analytics_models::EarthquakeStatsSummary;
use quake_bulletin_cli_utils::{IndicatifProgress, MultiProgress};
use quake_bulletin_quake_models::EarthquakeRecord;
use quake_bulletin_source::classify::classify_url;
use quake_bulletin_source::progress::ProgressCallback;
use quake_bulletin_source::registry;
use quake_bulletin_source_models::Agency;
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "quake_bulletin",
    about = "Earthquake bulletin extraction and statistics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the extracted records as a JSON array
    Records(ExtractArgs),
    /// Print summary statistics for the extracted records
    Stats(ExtractArgs),
    /// Print both the records and their statistics
    Bulletin(ExtractArgs),
    /// List the supported bulletin sources
    Sources,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Bulletin URL. Defaults to the PHIVOLCS latest-earthquakes page.
    #[arg(long)]
    url: Option<String>,
    /// Only keep entries observed at or after this moment
    /// (e.g. "2024-01-10T23:35:00+08:00" or "10 January 2024 - 11:35 PM")
    #[arg(long)]
    cutoff: Option<String>,
    /// PEM bundle used to verify sources that need a pinned CA chain.
    /// Falls back to `QUAKE_BULLETIN_PHIVOLCS_CA_CERT`.
    #[arg(long)]
    ca_cert: Option<PathBuf>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
    /// Do not draw progress bars
    #[arg(long)]
    no_progress: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Bulletin<'a> {
    records: &'a [EarthquakeRecord],
    stats: EarthquakeStatsSummary,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = quake_bulletin_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sources => print_sources(),
        Commands::Records(args) => {
            let records = extract(&multi, &args).await?;
            print_json(&records, args.pretty)?;
        }
        Commands::Stats(args) => {
            let records = extract(&multi, &args).await?;
            print_json(&summarize(&records), args.pretty)?;
        }
        Commands::Bulletin(args) => {
            let records = extract(&multi, &args).await?;
            let bulletin = Bulletin {
                stats: summarize(&records),
                records: &records,
            };
            print_json(&bulletin, args.pretty)?;
        }
    }

    Ok(())
}

async fn extract(
    multi: &MultiProgress,
    args: &ExtractArgs,
) -> Result<Vec<EarthquakeRecord>, Box<dyn std::error::Error>> {
    let url = match &args.url {
        Some(url) => url.clone(),
        None => registry::definition(Agency::Phivolcs)?.home_url.clone(),
    };

    let definition = registry::definition(classify_url(&url)?)?;
    let ca_cert = fetcher::resolve_ca_cert(
        args.ca_cert.clone(),
        std::env::var_os(fetcher::CA_CERT_ENV).map(PathBuf::from),
    );
    let http = fetcher::for_source(definition, ca_cert.as_deref())?;

    let progress: Arc<dyn ProgressCallback> = if args.no_progress {
        IndicatifProgress::hidden()
    } else {
        IndicatifProgress::records_bar(multi, &format!("Fetching {url}"))
    };

    let records =
        quake_bulletin_source::extract(&http, &url, args.cutoff.as_deref(), &progress).await?;

    log::info!("Extracted {} records from {url}", records.len());
    Ok(records)
}

fn print_sources() {
    println!("{:<10} {:<10} {:<52} HOME", "ID", "AGENCY", "NAME");
    println!("{}", "-".repeat(100));
    for source in registry::all_sources() {
        println!(
            "{:<10} {:<10} {:<52} {}",
            source.id,
            source.agency.as_ref(),
            source.name,
            source.home_url
        );
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), serde_json::Error> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_extract_flags() {
        let cli = Cli::try_parse_from([
            "quake_bulletin",
            "stats",
            "--url",
            "https://www.jma.go.jp/bosai/quake/data/list.json",
            "--cutoff",
            "2024-01-01T00:00:00+09:00",
            "--pretty",
        ])
        .unwrap();

        let Commands::Stats(args) = cli.command else {
            panic!("expected stats command");
        };
        assert_eq!(
            args.url.as_deref(),
            Some("https://www.jma.go.jp/bosai/quake/data/list.json")
        );
        assert_eq!(args.cutoff.as_deref(), Some("2024-01-01T00:00:00+09:00"));
        assert!(args.pretty);
        assert!(!args.no_progress);
        assert!(args.ca_cert.is_none());
    }

    #[test]
    fn url_is_optional() {
        let cli = Cli::try_parse_from(["quake_bulletin", "records"]).unwrap();
        let Commands::Records(args) = cli.command else {
            panic!("expected records command");
        };
        assert!(args.url.is_none());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["quake_bulletin"]).is_err());
    }

    #[test]
    fn bulletin_serializes_records_and_stats() {
        let records: Vec<EarthquakeRecord> = Vec::new();
        let bulletin = Bulletin {
            stats: summarize(&records),
            records: &records,
        };
        let json = serde_json::to_value(&bulletin).unwrap();
        assert!(json["records"].as_array().unwrap().is_empty());
        assert_eq!(json["stats"]["counts"]["total"], 0);
    }
}
