//! Parabolic SAR used as a trailing stop for a long position.
//!
//! The first bar of the series is the base of the stop (usually the nearest
//! pivot low before the entry). The stop starts on the entry bar, the bar whose
//! date matches `start_date`; it is not triggered by a reversal as in the
//! classic indicator. Bars before the entry only contribute their lows to the
//! two-bar low lookback.
//!
//! For bar `i` with previous period `p`:
//!
//! ```text
//! ep  = max(high[i], p.ep)
//! af  = p.af + 0.02 if high[i] > p.ep else p.af
//! sar = p.sar + p.af * (p.ep - p.sar)
//! ```
//!
//! then the entry/pre-entry overrides, the two-bar low clamp and the AF cap.
//! All date comparisons are made on whole days.

use chrono::NaiveDate;
use chrono::NaiveDateTime;

use crate::domain::error::PsarStopError;
use crate::domain::ohlcv::ChartBar;

pub const AF_INCREMENT: f64 = 0.02;
pub const AF_MAX: f64 = 0.20;

/// Side the stop trails.
///
/// Only the long side is computed; `Short` is not offered until its formula
/// (highest high clamp, lowest low EP) is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trend {
    #[default]
    Long,
}

/// Computed PSAR values for one bar.
#[derive(Debug)]
pub struct PsarPeriod<'a, B> {
    bar: &'a B,
    pub ep: f64,
    pub af: f64,
    /// The stop level.
    pub sar: f64,
    pub sar_ep: f64,
    pub af_sar_ep: f64,
    /// Lowest low of the two bars before this one (only the previous bar's
    /// low on the second bar, and the bar's own low on the first).
    pub ext_low: f64,
}

impl<'a, B> PsarPeriod<'a, B> {
    pub fn bar(&self) -> &'a B {
        self.bar
    }
}

impl<B: ChartBar> ChartBar for PsarPeriod<'_, B> {
    fn date(&self) -> NaiveDateTime {
        self.bar.date()
    }

    fn high(&self) -> f64 {
        self.bar.high()
    }

    fn low(&self) -> f64 {
        self.bar.low()
    }

    fn open(&self) -> f64 {
        self.bar.open()
    }

    fn close(&self) -> f64 {
        self.bar.close()
    }
}

/// Stop level for the session after the last processed bar.
///
/// Only the stop can be known before that session trades; EP and AF depend on
/// its high.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextSession {
    /// Date of the last processed bar.
    pub after: NaiveDate,
    pub sar: f64,
}

/// Incremental PSAR calculator over a borrowed bar series.
///
/// Every computed period is retained; the history backs both the two-bar
/// lookback and [`Psar::periods`].
#[derive(Debug)]
pub struct Psar<'a, B> {
    series: &'a [B],
    start_date: NaiveDate,
    pip_offset: f64,
    trend: Trend,
    periods: Vec<PsarPeriod<'a, B>>,
}

impl<'a, B: ChartBar> Psar<'a, B> {
    pub fn new(series: &'a [B], start_date: NaiveDate) -> Self {
        Self {
            series,
            start_date,
            pip_offset: 0.0,
            trend: Trend::Long,
            periods: Vec::with_capacity(series.len()),
        }
    }

    /// Offset subtracted from the entry stop and from any clamped stop.
    /// Set it before the first `advance` for it to reach the entry bar.
    pub fn set_offset(&mut self, value: f64) {
        self.pip_offset = value;
    }

    pub fn offset(&self) -> f64 {
        self.pip_offset
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn series(&self) -> &'a [B] {
        self.series
    }

    /// Index of the next bar to process.
    pub fn cursor(&self) -> usize {
        self.periods.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor() >= self.series.len()
    }

    pub fn periods(&self) -> &[PsarPeriod<'a, B>] {
        &self.periods
    }

    pub fn is_entry_bar(&self, i: usize) -> bool {
        self.series
            .get(i)
            .is_some_and(|bar| bar.day() == self.start_date)
    }

    /// Index of the first bar dated on the start date, if any.
    pub fn entry_index(&self) -> Option<usize> {
        (0..self.series.len()).find(|&i| self.is_entry_bar(i))
    }

    /// Computes the period for the next bar. Returns `false` once the series
    /// is exhausted (or empty), without doing any work.
    pub fn advance(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        let period = self.calculate(self.cursor());
        self.periods.push(period);
        true
    }

    /// Advances up to `n` bars and returns how many were actually processed.
    pub fn step(&mut self, n: usize) -> usize {
        (0..n).take_while(|_| self.advance()).count()
    }

    /// The most recently computed period.
    pub fn current(&self) -> Result<&PsarPeriod<'a, B>, PsarStopError> {
        self.periods.last().ok_or(PsarStopError::EmptyState)
    }

    /// Stop for the session following the current one, computed from the
    /// current period alone. Does not touch the engine.
    pub fn next_session_preview(&self) -> Result<NextSession, PsarStopError> {
        let prev = self.current()?;
        let mut sar = prev.sar + prev.af_sar_ep;
        if sar > prev.ext_low {
            sar = prev.ext_low - self.pip_offset;
        }
        Ok(NextSession {
            after: prev.day(),
            sar,
        })
    }

    fn calculate(&self, i: usize) -> PsarPeriod<'a, B> {
        let series = self.series;
        let bar = &series[i];

        let mut ext_low = bar.low();
        let mut ep = bar.high();
        let mut af = AF_INCREMENT;
        let mut sar = 0.0;

        if i > 0 {
            let prev = &self.periods[i - 1];
            af = prev.af;
            if ep > prev.ep {
                af += AF_INCREMENT;
            } else {
                ep = prev.ep;
            }

            sar = prev.sar + prev.af_sar_ep;

            ext_low = prev.low();
            if i >= 2 {
                let low2 = self.periods[i - 2].low();
                if low2 < ext_low {
                    ext_low = low2;
                }
            }
        }

        let day = bar.day();
        let base = series[0].low();
        if day == self.start_date {
            af = AF_INCREMENT;
            sar = base - self.pip_offset;
        }
        // before the entry the stop sits on the base low and AF stays at zero
        if day < self.start_date {
            af = 0.0;
            sar = base;
        }

        if sar > ext_low {
            sar = ext_low - self.pip_offset;
        }
        if af > AF_MAX {
            af = AF_MAX;
        }

        let sar_ep = ep - sar;
        PsarPeriod {
            bar,
            ep,
            af,
            sar,
            sar_ep,
            af_sar_ep: af * sar_ep,
            ext_low,
        }
    }
}
