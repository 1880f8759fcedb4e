//! Configuration access port trait.

use chrono::NaiveDate;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// Parses a `YYYY-MM-DD` value. `None` when the key is absent,
    /// `Some(Err(raw))` when it is present but malformed.
    fn get_date(&self, section: &str, key: &str) -> Option<Result<NaiveDate, String>> {
        self.get_string(section, key).map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| raw)
        })
    }
}
