//! `spc`: run or XmR chart analysis of a CSV file
//!
//! Reads delimited text (a file, or `-` for stdin), fills in column
//! choices the user did not make, and prints the textual summary or the
//! full analysis as JSON.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use spc_charts::spc_parse::{infer_columns, load_csv};
use spc_charts::{analyze, Advisory, AnalysisRequest, AxisType, ChartKind, Direction, RuleSettings, SpcConfig};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file to analyse, or `-` for stdin
    file: PathBuf,

    /// Chart type
    #[arg(long, value_enum, default_value_t = ChartArg::Run)]
    chart: ChartArg,

    /// Date (or label) column; inferred when omitted
    #[arg(long)]
    date_column: Option<String>,

    /// Value column; inferred when omitted
    #[arg(long)]
    value_column: Option<String>,

    /// X axis; date when a date column is found, otherwise sequence
    #[arg(long, value_enum)]
    axis: Option<AxisArg>,

    /// Number of leading points used to compute the centre line and limits
    #[arg(long)]
    baseline: Option<usize>,

    /// Start a new period after this zero-based point index (repeatable)
    #[arg(long = "split")]
    splits: Vec<usize>,

    /// Points on one side of the centre line that make a shift
    #[arg(long)]
    shift_length: Option<usize>,

    /// Consecutive rising or falling points that make a trend
    #[arg(long)]
    trend_length: Option<usize>,

    /// Clamp a negative lower control limit to zero
    #[arg(long)]
    clamp_lcl: bool,

    /// Target value for capability
    #[arg(long, allow_negative_numbers = true)]
    target: Option<f64>,

    /// Which side of the target is better
    #[arg(long, value_enum, default_value_t = DirectionArg::Above)]
    direction: DirectionArg,

    /// Annotate a date on the chart, as DATE=LABEL (repeatable)
    #[arg(long = "annotate", value_parser = parse_annotation)]
    annotations: Vec<(String, String)>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full analysis as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChartArg {
    Run,
    Xmr,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Run => ChartKind::Run,
            ChartArg::Xmr => ChartKind::Xmr,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AxisArg {
    Date,
    Sequence,
}

impl From<AxisArg> for AxisType {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::Date => AxisType::Date,
            AxisArg::Sequence => AxisType::Sequence,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Above,
    Below,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Above => Direction::Above,
            DirectionArg::Below => Direction::Below,
        }
    }
}

fn parse_annotation(s: &str) -> std::result::Result<(String, String), String> {
    let (date, label) = s
        .split_once('=')
        .ok_or_else(|| format!("expected DATE=LABEL, got '{s}'"))?;
    let (date, label) = (date.trim(), label.trim());
    if date.is_empty() || label.is_empty() {
        return Err(format!("expected DATE=LABEL, got '{s}'"));
    }
    Ok((date.to_string(), label.to_string()))
}

fn init_tracing(json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = if json {
        tracing_subscriber::fmt::layer().with_writer(io::stderr).json().boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(io::stderr).boxed()
    };
    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_config(path: Option<&PathBuf>) -> Result<SpcConfig> {
    let Some(path) = path else {
        return Ok(SpcConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    SpcConfig::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = load_config(args.config.as_ref())?;
    let text = read_input(&args.file)?;
    let loaded = load_csv(&text).context("failed to load table")?;
    info!(
        rows = loaded.table.len(),
        columns = loaded.table.columns().len(),
        had_header = loaded.had_header,
        "table loaded"
    );

    let guess = infer_columns(&loaded.table);
    let mut advisories = guess.advisories();
    let mut builder = AnalysisRequest::from_guess(&guess)
        .or_else(|| args.value_column.clone().map(AnalysisRequest::builder))
        .context("no columns found in the input")?;

    if let Some(column) = &args.value_column {
        builder = builder.value_column(column.as_str());
        advisories.retain(|a| *a != Advisory::NoValueColumn);
    }
    if let Some(column) = &args.date_column {
        builder = builder.date_column(column.as_str()).axis(AxisType::Date);
    }
    if let Some(axis) = args.axis {
        builder = builder.axis(axis.into());
    }
    if args.date_column.is_some() || args.axis.is_some() {
        advisories.retain(|a| *a != Advisory::NoDateColumn);
    }
    for advisory in &advisories {
        eprintln!("note: {advisory}");
    }

    let rules = RuleSettings::new(
        args.shift_length.unwrap_or(config.rules.shift_length),
        args.trend_length.unwrap_or(config.rules.trend_length),
    );
    builder = builder
        .chart(args.chart.into())
        .splits(args.splits.iter().copied())
        .rules(rules)
        .clamp_lcl(args.clamp_lcl)
        .direction(args.direction.into())
        .advisories(advisories);
    if let Some(count) = args.baseline {
        builder = builder.baseline(count);
    }
    if let Some(target) = args.target {
        builder = builder.target(target);
    }
    for (date, label) in &args.annotations {
        builder = builder.annotate(date.as_str(), label.as_str());
    }

    let request = builder.build();
    debug!(
        date_column = ?request.date_column,
        value_column = %request.value_column,
        axis = %request.axis,
        "columns chosen"
    );
    let result = analyze(&loaded.table, &request, &config);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{result}");
    }

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
