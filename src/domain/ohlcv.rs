//! Price bar capability and the daily OHLCV bar.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Read access to one trading session.
///
/// Open and close are never read by the PSAR recurrence; they are part of the
/// capability so that anything bar-shaped (including a computed period) can be
/// handed to chart or report code.
pub trait ChartBar {
    fn date(&self) -> NaiveDateTime;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn open(&self) -> f64;
    fn close(&self) -> f64;

    /// Session date with the time of day dropped.
    fn day(&self) -> NaiveDate {
        self.date().date()
    }
}

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub code: String,
    pub exchange: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl ChartBar for OhlcvBar {
    fn date(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn open(&self) -> f64 {
        self.open
    }

    fn close(&self) -> f64 {
        self.close
    }
}

impl<T: ChartBar + ?Sized> ChartBar for &T {
    fn date(&self) -> NaiveDateTime {
        (**self).date()
    }

    fn high(&self) -> f64 {
        (**self).high()
    }

    fn low(&self) -> f64 {
        (**self).low()
    }

    fn open(&self) -> f64 {
        (**self).open()
    }

    fn close(&self) -> f64 {
        (**self).close()
    }
}
