use analytics::TimeSeriesTransformer;
use anyhow::Context;
use api_client::{FredClient, SeriesProvider, SeriesRepository};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::{Config, LogLevel, init_tracing, load_config};
use core_types::{DateTable, Frequency};
use indicatif::{ProgressBar, ProgressStyle};
use presenter::{
    ChartRenderer, ChartSpec, DateRange, JsonRenderer, TerminalRenderer, annualized_change_chart,
    indexed_performance_chart, table_chart, two_range_comparison,
};
use std::path::PathBuf;
use std::time::Duration;

/// The main entry point for the Macroscope toolkit.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables (e.g. FRED_API_KEY) from a .env file, if present.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    let _log_guard = init_tracing(&config.logging)?;
    tracing::debug!(
        path = %cli.config.display(),
        indicators = config.indicators.len(),
        "Configuration loaded"
    );

    let repository = SeriesRepository::new(FredClient::new(&config.fred)?);
    let table = fetch_indicators(&repository, &config).await?;

    // Execute the appropriate command
    let chart = run_command(cli.command, &table, &config)?;

    let renderer: Box<dyn ChartRenderer> = if cli.json {
        Box::new(JsonRenderer)
    } else {
        Box::new(TerminalRenderer {
            max_rows: cli.max_rows,
        })
    };
    println!("{}", renderer.render(&chart)?);
    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Fetch macroeconomic series and study their rates of change and their behaviour
/// around key dates.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Print the chart specification as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// Only print the last N rows of each table.
    #[arg(long, global = true)]
    max_rows: Option<usize>,

    /// Override the configured log level.
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the joined indicator table.
    Fetch(DateFilterArgs),
    /// Annualized % change over one or more lookback periods.
    Annualized(AnnualizedArgs),
    /// Each indicator indexed to 100 at every anchor date.
    Indexed(EventArgs),
    /// Indexed performance averaged across anchor dates.
    Averaged(EventArgs),
    /// Overlay two date ranges of every indicator.
    Compare(CompareArgs),
}

#[derive(Parser)]
struct DateFilterArgs {
    /// Keep rows on or after this date (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Keep rows on or before this date (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Parser)]
struct AnnualizedArgs {
    /// Lookback periods, in rows of the fetched table (e.g. 1 3 12).
    #[arg(long, num_args = 1.., required = true)]
    periods: Vec<u32>,

    /// Frequency code of the table (d, w, m, q, y). Defaults to the fetch frequency.
    #[arg(long)]
    frequency: Option<Frequency>,

    #[command(flatten)]
    filter: DateFilterArgs,
}

#[derive(Parser)]
struct EventArgs {
    /// Periods before and after each anchor. Defaults to `[events] window_months`.
    #[arg(long)]
    window: Option<u32>,

    /// Anchor dates (format: YYYY-MM-DD). Defaults to `[events] anchors`.
    #[arg(long = "anchor")]
    anchors: Vec<NaiveDate>,
}

#[derive(Parser)]
struct CompareArgs {
    /// First range: START END (format: YYYY-MM-DD).
    #[arg(long, num_args = 2, value_names = ["START", "END"], required = true)]
    range1: Vec<NaiveDate>,

    /// Second range: START END (format: YYYY-MM-DD).
    #[arg(long, num_args = 2, value_names = ["START", "END"], required = true)]
    range2: Vec<NaiveDate>,

    /// Rebase each range to 100 at its first row.
    #[arg(long)]
    index: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Downloads every configured indicator into one table, with a spinner while it runs.
async fn fetch_indicators<P: SeriesProvider>(
    repository: &SeriesRepository<P>,
    config: &Config,
) -> anyhow::Result<DateTable> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!(
        "Fetching {} indicator(s) at frequency '{}'...",
        config.indicators.len(),
        config.fetch.frequency
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = repository
        .fetch(
            &config.indicators,
            config.fetch.frequency,
            config.fetch.aggregation,
        )
        .await;
    spinner.finish_and_clear();

    let table = result.context("Failed to fetch indicators")?;
    if config.fetch.drop_incomplete_rows {
        return Ok(TimeSeriesTransformer::new().drop_incomplete_rows(&table));
    }
    Ok(table)
}

/// Applies the requested transform and lays the result out as a chart.
fn run_command(command: Commands, table: &DateTable, config: &Config) -> anyhow::Result<ChartSpec> {
    let transformer = TimeSeriesTransformer::new();

    let chart = match command {
        Commands::Fetch(filter) => {
            let filtered = apply_filter(&transformer, table, &filter);
            table_chart(&filtered, "Indicators", "date")
        }
        Commands::Annualized(args) => {
            let frequency = args.frequency.unwrap_or(config.fetch.frequency);
            let changes = transformer.annualized_change(table, frequency, &args.periods)?;
            annualized_change_chart(&apply_filter(&transformer, &changes, &args.filter))
        }
        Commands::Indexed(args) => {
            let (anchors, window) = event_params(args, config);
            let indexed = transformer.indexed_performance_around_dates(table, &anchors, window)?;
            indexed_performance_chart(&indexed, "Indexed performance around anchor dates")
        }
        Commands::Averaged(args) => {
            let (anchors, window) = event_params(args, config);
            let averaged = transformer.averaged_indexed_performance(table, &anchors, window)?;
            indexed_performance_chart(&averaged, "Average indexed performance around anchor dates")
        }
        Commands::Compare(args) => {
            let first = DateRange::new(args.range1[0], args.range1[1]);
            let second = DateRange::new(args.range2[0], args.range2[1]);
            two_range_comparison(table, first, second, args.index, config.fetch.frequency)
        }
    };

    tracing::info!(title = %chart.title, panels = chart.panels.len(), "Prepared chart");
    Ok(chart)
}

fn apply_filter(
    transformer: &TimeSeriesTransformer,
    table: &DateTable,
    filter: &DateFilterArgs,
) -> DateTable {
    transformer.filter_by_date(
        table,
        filter.from.unwrap_or(NaiveDate::MIN),
        filter.to.unwrap_or(NaiveDate::MAX),
    )
}

/// Anchors and window from the command line, falling back to the `[events]` config.
fn event_params(args: EventArgs, config: &Config) -> (Vec<NaiveDate>, u32) {
    let anchors = if args.anchors.is_empty() {
        config.events.anchors.clone()
    } else {
        args.anchors
    };
    let window = args.window.unwrap_or(config.events.window_months);
    (anchors, window)
}
