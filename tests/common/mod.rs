#![allow(dead_code)]

use chrono::NaiveDate;
use psarstop::domain::error::PsarStopError;
pub use psarstop::domain::ohlcv::OhlcvBar;
use psarstop::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        code: &str,
        _exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, PsarStopError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(PsarStopError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self, _exchange: &str) -> Result<Vec<String>, PsarStopError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
        _exchange: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PsarStopError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(PsarStopError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(code) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(code: &str, date: NaiveDate, high: f64, low: f64) -> OhlcvBar {
    OhlcvBar {
        code: code.to_string(),
        exchange: "NYSE".to_string(),
        date,
        open: low,
        high,
        low,
        close: (high + low) / 2.0,
        volume: 1000,
    }
}

/// ROIC, entry on 2021-01-08.
pub fn roic_bars() -> Vec<OhlcvBar> {
    [
        (date(2021, 1, 5), 13.23, 12.79),
        (date(2021, 1, 6), 13.73, 13.04),
        (date(2021, 1, 7), 13.66, 13.23),
        (date(2021, 1, 8), 13.94, 13.40),
        (date(2021, 1, 11), 13.77, 13.38),
        (date(2021, 1, 12), 14.00, 13.34),
        (date(2021, 1, 13), 14.32, 13.84),
    ]
    .into_iter()
    .map(|(d, h, l)| make_bar("ROIC", d, h, l))
    .collect()
}

/// BIG, entry on 2021-01-05.
pub fn big_bars() -> Vec<OhlcvBar> {
    [
        (date(2021, 1, 4), 43.57, 42.05),
        (date(2021, 1, 5), 44.12, 42.09),
        (date(2021, 1, 6), 46.00, 43.45),
        (date(2021, 1, 7), 45.63, 43.74),
    ]
    .into_iter()
    .map(|(d, h, l)| make_bar("BIG", d, h, l))
    .collect()
}

pub fn rn2(f: f64) -> f64 {
    (f * 100.0).round() / 100.0
}

/// Writes bars in the `<CODE>_<EXCHANGE>.csv` layout the CSV adapter reads.
pub fn write_csv(dir: &std::path::Path, code: &str, exchange: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    std::fs::write(dir.join(format!("{}_{}.csv", code, exchange)), content).unwrap();
}
