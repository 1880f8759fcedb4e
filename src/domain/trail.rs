//! Helpers for following a long position with the PSAR stop.

use chrono::NaiveDate;

use crate::domain::ohlcv::ChartBar;
use crate::domain::psar::{NextSession, Psar};

/// Flat copy of one computed period, detached from the source bar.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodRow {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub ep: f64,
    pub af: f64,
    pub sar: f64,
    pub ext_low: f64,
}

/// First bar after the entry whose low reached the stop in force for it.
#[derive(Debug, Clone, PartialEq)]
pub struct StopHit {
    pub index: usize,
    pub date: NaiveDate,
    pub sar: f64,
    pub low: f64,
}

/// Full outcome of running the stop over a series.
#[derive(Debug, Clone)]
pub struct TrailResult {
    pub rows: Vec<PeriodRow>,
    pub entry_index: Option<usize>,
    pub stop_hit: Option<StopHit>,
    pub next: Option<NextSession>,
}

/// Builds an engine over `series` and processes every bar.
pub fn run_to_end<B: ChartBar>(series: &[B], start_date: NaiveDate, offset: f64) -> Psar<'_, B> {
    let mut psar = Psar::new(series, start_date);
    psar.set_offset(offset);
    while psar.advance() {}
    psar
}

pub fn rows<B: ChartBar>(psar: &Psar<'_, B>) -> Vec<PeriodRow> {
    psar.periods()
        .iter()
        .map(|p| PeriodRow {
            date: p.day(),
            high: p.high(),
            low: p.low(),
            ep: p.ep,
            af: p.af,
            sar: p.sar,
            ext_low: p.ext_low,
        })
        .collect()
}

pub fn find_stop_hit<B: ChartBar>(psar: &Psar<'_, B>) -> Option<StopHit> {
    let entry = psar.entry_index()?;
    psar.periods()
        .iter()
        .enumerate()
        .skip(entry + 1)
        .find(|(_, p)| p.low() <= p.sar)
        .map(|(index, p)| StopHit {
            index,
            date: p.day(),
            sar: p.sar,
            low: p.low(),
        })
}

pub fn trail<B: ChartBar>(series: &[B], start_date: NaiveDate, offset: f64) -> TrailResult {
    let psar = run_to_end(series, start_date, offset);
    TrailResult {
        rows: rows(&psar),
        entry_index: psar.entry_index(),
        stop_hit: find_stop_hit(&psar),
        next: psar.next_session_preview().ok(),
    }
}
