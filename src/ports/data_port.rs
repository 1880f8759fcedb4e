//! Bar source port trait.

use crate::domain::error::PsarStopError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `code` between `start_date` and `end_date` inclusive, oldest first.
    fn fetch_ohlcv(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, PsarStopError>;

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, PsarStopError>;

    /// First date, last date and bar count, or `None` when there is no data.
    fn get_data_range(
        &self,
        code: &str,
        exchange: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PsarStopError>;
}
