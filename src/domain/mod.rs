//! Core domain types and logic.

pub mod ohlcv;
pub mod psar;
pub mod trail;
pub mod config_validation;
pub mod error;
