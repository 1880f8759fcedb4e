//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{self, validate_psar_config, SECTION};
use crate::domain::error::PsarStopError;
use crate::domain::trail::{self, PeriodRow};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "psarstop", about = "Parabolic SAR trailing stop calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the trailing stop for a position
    Stop {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        exchange: Option<String>,
        /// Entry date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Price offset applied to the entry and clamped stops
        #[arg(long)]
        offset: Option<f64>,
        /// Write the computed periods as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List available symbols on an exchange
    ListSymbols {
        #[arg(long)]
        exchange: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show data range for a symbol
    Info {
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        exchange: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Command line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct StopOverrides {
    pub code: Option<String>,
    pub exchange: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub offset: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopConfig {
    pub code: String,
    pub exchange: String,
    pub start_date: NaiveDate,
    pub pip_offset: f64,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub csv_dir: PathBuf,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Stop {
            config,
            code,
            exchange,
            start_date,
            offset,
            output,
        } => {
            let overrides = StopOverrides {
                code,
                exchange,
                start_date,
                offset,
            };
            run_stop(&config, &overrides, output.as_ref())
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { exchange, config } => run_list_symbols(&exchange, config.as_ref()),
        Command::Info {
            code,
            exchange,
            config,
        } => run_info(code.as_deref(), exchange.as_deref(), config.as_ref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = PsarStopError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn csv_dir(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("data", "csv_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn build_stop_config(
    config: &dyn ConfigPort,
    overrides: &StopOverrides,
) -> Result<StopConfig, PsarStopError> {
    let code = required(overrides.code.clone(), config, "code")?.to_uppercase();
    let exchange = required(overrides.exchange.clone(), config, "exchange")?;

    let start_date = match overrides.start_date {
        Some(d) => d,
        None => config_validation::parse_date(config, "start_date")?.ok_or_else(|| {
            PsarStopError::ConfigMissing {
                section: SECTION.into(),
                key: "start_date".into(),
            }
        })?,
    };

    let invalid_offset = || PsarStopError::ConfigInvalid {
        section: SECTION.into(),
        key: "pip_offset".into(),
        reason: "pip_offset must be a non-negative number".into(),
    };
    let pip_offset = match overrides.offset {
        Some(v) => v,
        None => match config.get_string(SECTION, "pip_offset") {
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| invalid_offset())?,
            None => 0.0,
        },
    };
    if !pip_offset.is_finite() || pip_offset < 0.0 {
        return Err(invalid_offset());
    }

    let from_date = config_validation::parse_date(config, "from_date")?;
    let to_date = config_validation::parse_date(config, "to_date")?;
    if let (Some(from), Some(to)) = (from_date, to_date) {
        if to < from {
            return Err(PsarStopError::ConfigInvalid {
                section: SECTION.into(),
                key: "to_date".into(),
                reason: "to_date must not be before from_date".into(),
            });
        }
    }

    Ok(StopConfig {
        code,
        exchange,
        start_date,
        pip_offset,
        from_date,
        to_date,
        csv_dir: csv_dir(config),
    })
}

fn required(
    flag: Option<String>,
    config: &dyn ConfigPort,
    key: &str,
) -> Result<String, PsarStopError> {
    flag.or_else(|| config.get_string(SECTION, key))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PsarStopError::ConfigMissing {
            section: SECTION.into(),
            key: key.into(),
        })
}

fn run_stop(
    config_path: &PathBuf,
    overrides: &StopOverrides,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Resolve settings, flags first
    let stop_config = match build_stop_config(&adapter, overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stages 3-5: Data port dependent pipeline
    let data_port = CsvAdapter::new(stop_config.csv_dir.clone());
    run_stop_pipeline(&data_port, &stop_config, output_path)
}

pub fn run_stop_pipeline(
    data_port: &dyn DataPort,
    config: &StopConfig,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 3: Fetch bars
    let from = config.from_date.unwrap_or(NaiveDate::MIN);
    let to = config.to_date.unwrap_or(NaiveDate::MAX);
    let bars = match data_port.fetch_ohlcv(&config.code, &config.exchange, from, to) {
        Ok(bars) if bars.is_empty() => {
            let err = PsarStopError::NoData {
                code: config.code.clone(),
                exchange: config.exchange.clone(),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Computing stop for {}.{}: {} bars, entry {}, offset {}",
        config.code,
        config.exchange,
        bars.len(),
        config.start_date,
        config.pip_offset,
    );

    // Stage 4: Run the engine
    let result = trail::trail(&bars, config.start_date, config.pip_offset);
    if result.entry_index.is_none() {
        eprintln!(
            "warning: no bar dated {}; every bar is treated as pre-entry",
            config.start_date
        );
    }

    println!("{}", format_header());
    for row in &result.rows {
        println!("{}", format_row(row));
    }

    eprintln!("\n=== Summary ===");
    if let Some(last) = result.rows.last() {
        eprintln!("Current stop:     {:.4} ({})", last.sar, last.date);
    }
    if let Some(next) = &result.next {
        println!("next session after {}: sar {:.4}", next.after, next.sar);
    }
    match &result.stop_hit {
        Some(hit) => eprintln!(
            "Stopped out:      {} (low {:.4} <= stop {:.4})",
            hit.date, hit.low, hit.sar
        ),
        None => eprintln!("Stopped out:      no"),
    }

    // Stage 5: Write report
    if let Some(output) = output_path {
        let path = output.display().to_string();
        if let Err(e) = CsvReportAdapter::new().write(&result, &path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("\nReport written to: {}", path);
    }

    ExitCode::SUCCESS
}

pub fn format_header() -> String {
    format!(
        "{:<10} {:>10} {:>10} {:>10} {:>5} {:>10}",
        "date", "high", "low", "ep", "af", "sar"
    )
}

pub fn format_row(row: &PeriodRow) -> String {
    format!(
        "{:<10} {:>10.4} {:>10.4} {:>10.4} {:>5.2} {:>10.4}",
        row.date, row.high, row.low, row.ep, row.af, row.sar
    )
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_psar_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let stop_config = match build_stop_config(&adapter, &StopOverrides::default()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nPosition:");
    eprintln!("  code:       {}", stop_config.code);
    eprintln!("  exchange:   {}", stop_config.exchange);
    eprintln!("  entry:      {}", stop_config.start_date);
    eprintln!("  pip offset: {}", stop_config.pip_offset);
    eprintln!("  data:       {}", stop_config.csv_dir.display());

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(exchange: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let config_path = match config_path {
        Some(p) => p,
        None => {
            eprintln!("error: --config is required for list-symbols");
            return ExitCode::from(1);
        }
    };

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let adapter = CsvAdapter::new(csv_dir(&config));
    let symbols = match adapter.list_symbols(exchange) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found for exchange {}", exchange);
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(code: Option<&str>, exchange: Option<&str>, config_path: Option<&PathBuf>) -> ExitCode {
    let config_path = match config_path {
        Some(p) => p,
        None => {
            eprintln!("error: --config is required for info");
            return ExitCode::from(1);
        }
    };

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let code = match required(code.map(str::to_string), &config, "code") {
        Ok(c) => c.to_uppercase(),
        Err(_) => {
            eprintln!("error: code is required (use --code or set in config)");
            return ExitCode::from(1);
        }
    };
    let exchange = match required(exchange.map(str::to_string), &config, "exchange") {
        Ok(e) => e,
        Err(_) => {
            eprintln!("error: exchange is required (use --exchange or set in config)");
            return ExitCode::from(1);
        }
    };

    let adapter = CsvAdapter::new(csv_dir(&config));
    match adapter.get_data_range(&code, &exchange) {
        Ok(Some((min_date, max_date, count))) => {
            println!(
                "{}.{}: {} bars, {} to {}",
                code, exchange, count, min_date, max_date
            );
        }
        Ok(None) => {
            eprintln!("{}.{}: no data found", code, exchange);
        }
        Err(e) => {
            eprintln!("error querying {}.{}: {}", code, exchange, e);
            return (&e).into();
        }
    }
    ExitCode::SUCCESS
}
