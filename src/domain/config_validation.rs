//! Configuration validation for the `[psar]` section.
//!
//! Validates all fields before any data is loaded.

use crate::domain::error::PsarStopError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const SECTION: &str = "psar";

pub fn validate_psar_config(config: &dyn ConfigPort) -> Result<(), PsarStopError> {
    validate_start_date(config)?;
    validate_pip_offset(config)?;
    validate_required(config, "code")?;
    validate_required(config, "exchange")?;
    validate_window(config)?;
    Ok(())
}

fn validate_start_date(config: &dyn ConfigPort) -> Result<(), PsarStopError> {
    parse_date(config, "start_date")?.ok_or_else(|| PsarStopError::ConfigMissing {
        section: SECTION.to_string(),
        key: "start_date".to_string(),
    })?;
    Ok(())
}

fn validate_pip_offset(config: &dyn ConfigPort) -> Result<(), PsarStopError> {
    let Some(raw) = config.get_string(SECTION, "pip_offset") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(()),
        _ => Err(PsarStopError::ConfigInvalid {
            section: SECTION.to_string(),
            key: "pip_offset".to_string(),
            reason: "pip_offset must be a non-negative number".to_string(),
        }),
    }
}

fn validate_required(config: &dyn ConfigPort, key: &str) -> Result<(), PsarStopError> {
    match config.get_string(SECTION, key) {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(PsarStopError::ConfigMissing {
            section: SECTION.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), PsarStopError> {
    let from = parse_date(config, "from_date")?;
    let to = parse_date(config, "to_date")?;

    if let (Some(from), Some(to)) = (from, to) {
        if to < from {
            return Err(PsarStopError::ConfigInvalid {
                section: SECTION.to_string(),
                key: "to_date".to_string(),
                reason: "to_date must not be before from_date".to_string(),
            });
        }
    }
    Ok(())
}

/// Reads an optional `YYYY-MM-DD` key from the `[psar]` section.
pub fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, PsarStopError> {
    config
        .get_date(SECTION, key)
        .transpose()
        .map_err(|_| PsarStopError::ConfigInvalid {
            section: SECTION.to_string(),
            key: key.to_string(),
            reason: format!("invalid {} format, expected YYYY-MM-DD", key),
        })
}
