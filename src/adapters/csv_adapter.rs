//! CSV file bar source.
//!
//! One file per instrument, `<CODE>_<EXCHANGE>.csv`, with a header row and the
//! columns `date,open,high,low,close,volume`.

use crate::domain::error::PsarStopError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str, exchange: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", code, exchange))
    }

    fn read_bars(&self, code: &str, exchange: &str) -> Result<Vec<OhlcvBar>, PsarStopError> {
        let path = self.csv_path(code, exchange);
        if !path.exists() {
            return Err(PsarStopError::NoData {
                code: code.to_string(),
                exchange: exchange.to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| PsarStopError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| PsarStopError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = field(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                PsarStopError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            bars.push(OhlcvBar {
                code: code.to_string(),
                exchange: exchange.to_string(),
                date,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'r str, PsarStopError> {
    record.get(index).ok_or_else(|| PsarStopError::Data {
        reason: format!("missing {} column", name),
    })
}

fn parse_field<T>(record: &csv::StringRecord, index: usize, name: &str) -> Result<T, PsarStopError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    field(record, index, name)?
        .trim()
        .parse()
        .map_err(|e| PsarStopError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, PsarStopError> {
        let mut bars = self.read_bars(code, exchange)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, PsarStopError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| PsarStopError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let suffix = format!("_{}.csv", exchange);
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| PsarStopError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(code) = name_str.strip_suffix(&suffix) {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
        exchange: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PsarStopError> {
        let bars = match self.read_bars(code, exchange) {
            Ok(bars) => bars,
            Err(PsarStopError::NoData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
