mod cli;
mod config;
mod data;
mod error;
mod export;
mod query;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use cli::{Cli, Command, ExportFormat, GraphSelection, OutputArgs};
use config::DashboardConfig;
use data::dates::parse_iso_date;
use data::loader::load_file;
use export::{file_name, CsvWriter, TabularWriter, XlsxWriter, GRAPH_FILE_STEM, NEWS_FILE_STEM};
use query::{GraphData, NewsQueries};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };

    let dataset = load_file(&cli.data, &config)
        .with_context(|| format!("loading dataset from {}", cli.data.display()))?;
    if dataset.is_empty() {
        log::warn!("No records matched the configured countries and topics");
    }

    let queries = NewsQueries::new(&dataset, &config.all_label);
    run(&cli.command, &queries)
}

fn run(command: &Command, queries: &NewsQueries<'_>) -> Result<()> {
    match command {
        Command::Info => print_info(queries),
        Command::Latest => match queries.latest_date() {
            Some(date) => println!("{date}"),
            None => println!("no data"),
        },
        Command::Graph { selection, json } => {
            let (start, end) = resolve_offsets(selection, queries)?;
            let graph = queries.graph_data(start, end, country(selection, queries));
            if *json {
                println!("{}", serde_json::to_string_pretty(&graph)?);
            } else {
                print_graph(&graph);
            }
        }
        Command::Summary { date, json } => {
            let date = day_or_latest(date.as_deref(), queries)?;
            let groups = queries.daily_summary(&date)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                println!("Article summaries for {date}");
                if groups.is_empty() {
                    println!("  no entries");
                }
                for group in &groups {
                    println!("\n## {}", group.topic);
                    for entry in &group.entries {
                        println!("\n  {}", entry.headline);
                        println!("  {}", entry.snippet);
                        println!("  Read more: {}", entry.link);
                    }
                }
            }
        }
        Command::ExportGraph { selection, output } => {
            let (start, end) = resolve_offsets(selection, queries)?;
            let writer = writer_for(output.format);
            let bytes = queries.export_graph(start, end, country(selection, queries), writer)?;
            save(output, GRAPH_FILE_STEM, writer, &bytes)?;
        }
        Command::ExportDaily { date, output } => {
            let date = day_or_latest(date.as_deref(), queries)?;
            let writer = writer_for(output.format);
            let bytes = queries.export_daily(&date, writer)?;
            save(output, NEWS_FILE_STEM, writer, &bytes)?;
        }
    }
    Ok(())
}

fn print_info(queries: &NewsQueries<'_>) {
    match queries.range_index() {
        Some(index) => {
            println!("dates:     {}", index.full_range());
            println!("span:      {} days", index.span_days);
        }
        None => println!("dates:     none"),
    }
    println!("countries: {}", queries.countries().join(", "));
    println!("topics:    {}", queries.topics().join(", "));
    println!("records:   {}", queries.record_count());
}

fn print_graph(graph: &GraphData) {
    println!("{}", graph.title);
    if graph.counts.is_empty() {
        println!("  no mentions");
    }
    for row in &graph.counts {
        println!("  {}  {:<12} {:>5}", row.date, row.topic, row.count);
    }
}

/// Slider offsets from `--start/--end` or `--from/--to`, defaulting to the
/// whole dataset.
fn resolve_offsets(selection: &GraphSelection, queries: &NewsQueries<'_>) -> Result<(i64, i64)> {
    let Some(index) = queries.range_index() else {
        return Ok((0, 0));
    };
    let offset_of = |s: &str| {
        parse_iso_date(s)
            .map(|d| index.date_to_offset(d))
            .ok_or_else(|| anyhow!("'{s}' is not an ISO-8601 date"))
    };

    let start = match (&selection.from, selection.start) {
        (Some(from), _) => offset_of(from.as_str())?,
        (None, start) => start.unwrap_or(0),
    };
    let end = match (&selection.to, selection.end) {
        (Some(to), _) => offset_of(to.as_str())?,
        (None, end) => end.unwrap_or(index.span_days),
    };
    Ok((start, end))
}

fn country<'s>(selection: &'s GraphSelection, queries: &NewsQueries<'s>) -> &'s str {
    selection.country.as_deref().unwrap_or(queries.all_label())
}

/// The requested day, or the latest loaded date ("reset to latest").
fn day_or_latest(date: Option<&str>, queries: &NewsQueries<'_>) -> Result<String> {
    match date {
        Some(d) => Ok(d.to_string()),
        None => queries
            .latest_date()
            .map(|d| d.to_string())
            .context("dataset is empty and no --date was given"),
    }
}

fn writer_for(format: ExportFormat) -> &'static dyn TabularWriter {
    match format {
        ExportFormat::Xlsx => &XlsxWriter,
        ExportFormat::Csv => &CsvWriter,
    }
}

fn save(output: &OutputArgs, stem: &str, writer: &dyn TabularWriter, bytes: &[u8]) -> Result<()> {
    let path = output
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(file_name(stem, writer)));
    std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
