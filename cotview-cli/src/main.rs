//! cotview CLI — COT report inspection from the terminal.
//!
//! Commands:
//! - `types` — list the four CFTC report types and their trader groups
//! - `markets` — fetch one report year and print the ranked market list
//! - `net` — per-group net positions for one market, one date or the whole year
//! - `import` — run the same pipeline over a local CSV export

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cotview_core::data::{load_report, CftcSocrata, CsvFile, LoadedReport};
use cotview_core::domain::{groups_for, ReportType};
use cotview_core::positions::{net_positions, net_series};

#[derive(Parser)]
#[command(name = "cotview", about = "cotview CLI — CFTC Commitment of Traders positions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the four report types, their datasets, and trader groups.
    Types,
    /// Fetch one report year from the CFTC and print the market list.
    Markets {
        /// Report type: legacy_fut, legacy_combined, disaggregated_fut, tff_fut.
        #[arg(long)]
        report_type: ReportType,

        /// Report year. Defaults to the current year.
        #[arg(long)]
        year: Option<i32>,

        /// Case-insensitive fragment to filter and rank the list.
        #[arg(long)]
        search: Option<String>,
    },
    /// Fetch one report year and print net positions for one market.
    Net {
        /// Report type: legacy_fut, legacy_combined, disaggregated_fut, tff_fut.
        #[arg(long)]
        report_type: ReportType,

        /// Report year. Defaults to the current year.
        #[arg(long)]
        year: Option<i32>,

        /// Market name as listed by `markets` (case-insensitive).
        #[arg(long)]
        market: String,

        /// Report date (YYYY-MM-DD). Without it the whole dated series prints.
        #[arg(long)]
        date: Option<String>,
    },
    /// Load a local CSV export instead of fetching from the CFTC.
    Import {
        /// Path to a COT CSV export.
        #[arg(long)]
        path: PathBuf,

        /// Report type the file claims to be.
        #[arg(long)]
        report_type: ReportType,

        /// Year label for the imported table. Defaults to the current year.
        #[arg(long)]
        year: Option<i32>,

        /// Case-insensitive fragment to filter and rank the list.
        #[arg(long)]
        search: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Types => run_types(),
        Commands::Markets { report_type, year, search } => {
            run_markets(report_type, year, search.as_deref())
        }
        Commands::Net { report_type, year, market, date } => {
            run_net(report_type, year, &market, date.as_deref())
        }
        Commands::Import { path, report_type, year, search } => {
            run_import(path, report_type, year, search.as_deref())
        }
    }
}

fn run_types() -> Result<()> {
    for report_type in ReportType::ALL {
        println!("{} — {}", report_type.tag(), report_type.label());
        println!(
            "  dataset: {}   since: {}",
            report_type.dataset_id(),
            report_type.first_year()
        );
        for group in groups_for(report_type) {
            let members: Vec<&str> =
                group.members(report_type).iter().map(|c| c.label()).collect();
            println!("  {:<18} {}", group.label(), members.join(" + "));
        }
        println!();
    }
    Ok(())
}

fn run_markets(report_type: ReportType, year: Option<i32>, search: Option<&str>) -> Result<()> {
    let year = resolve_year(report_type, year)?;
    let source = CftcSocrata::new();
    let loaded = load_report(&source, report_type, year)?;

    print_summary(&loaded);
    print_market_list(&loaded, search);
    Ok(())
}

fn run_import(
    path: PathBuf,
    report_type: ReportType,
    year: Option<i32>,
    search: Option<&str>,
) -> Result<()> {
    let year = resolve_year(report_type, year)?;
    let source = CsvFile::new(path);
    let loaded = load_report(&source, report_type, year)?;

    print_summary(&loaded);
    print_market_list(&loaded, search);
    Ok(())
}

fn run_net(
    report_type: ReportType,
    year: Option<i32>,
    market: &str,
    date: Option<&str>,
) -> Result<()> {
    let year = resolve_year(report_type, year)?;
    let source = CftcSocrata::new();
    let loaded = load_report(&source, report_type, year)?;

    let Some(canonical) = loaded.index.find_exact(market) else {
        let suggestions = loaded.index.search(market);
        if suggestions.is_empty() {
            bail!("no market matching {market:?} in {} {year}", report_type.label());
        }
        let listed: Vec<&str> = suggestions.into_iter().take(5).collect();
        bail!(
            "no market named {market:?} in {} {year}; closest matches:\n  {}",
            report_type.label(),
            listed.join("\n  ")
        );
    };

    match date {
        Some(date) => {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
            let positions = net_positions(&loaded.table, canonical, date)?;

            println!("{canonical} on {date} ({} {year})", report_type.tag());
            println!();
            println!("{:<20} {:>12} {:>12} {:>12}", "Group", "Long", "Short", "Net");
            for (group, position) in &positions {
                println!(
                    "{:<20} {:>12} {:>12} {:>12}",
                    group.label(),
                    format_count(position.long),
                    format_count(position.short),
                    format_net(position.net)
                );
            }
        }
        None => {
            let series = net_series(&loaded.table, canonical)?;
            let groups = groups_for(report_type);

            println!("{canonical} ({} {year})", report_type.tag());
            println!();
            print!("{:<12}", "Date");
            for group in &groups {
                print!(" {:>18}", group.label());
            }
            println!();
            for (date, positions) in &series {
                print!("{:<12}", date.to_string());
                for group in &groups {
                    let net = positions.get(group).map(|p| p.net).unwrap_or(0);
                    print!(" {:>18}", format_net(net));
                }
                println!();
            }
            println!();
            println!("{} report dates.", series.len());
        }
    }

    Ok(())
}

/// Default to the current year and reject years the dataset cannot cover.
fn resolve_year(report_type: ReportType, year: Option<i32>) -> Result<i32> {
    let current = chrono::Local::now().year();
    let year = year.unwrap_or(current);
    if year < report_type.first_year() {
        bail!("{} data starts in {}", report_type.label(), report_type.first_year());
    }
    if year > current {
        bail!("{year} is in the future");
    }
    Ok(year)
}

fn print_summary(loaded: &LoadedReport) {
    println!(
        "{} {} via {}: {} markets, {} rows ({} skipped, {} duplicate)",
        loaded.report_type.label(),
        loaded.year,
        loaded.source,
        loaded.index.len(),
        format_count(loaded.table.len() as u64),
        loaded.skipped_rows,
        loaded.duplicate_rows,
    );
}

fn print_market_list(loaded: &LoadedReport, search: Option<&str>) {
    println!();
    match search {
        Some(query) => {
            let hits = loaded.index.search(query);
            if hits.is_empty() {
                println!("No markets match {query:?}.");
                return;
            }
            for name in hits {
                println!("{name}");
            }
        }
        None => {
            for name in loaded.index.names() {
                println!("{name}");
            }
        }
    }
}

fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_net(value: i64) -> String {
    if value < 0 {
        format!("-{}", format_count(value.unsigned_abs()))
    } else {
        format_count(value as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_group_in_threes() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn nets_keep_their_sign() {
        assert_eq!(format_net(-28_000), "-28,000");
        assert_eq!(format_net(24_000), "24,000");
        assert_eq!(format_net(0), "0");
    }
}
