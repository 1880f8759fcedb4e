//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const SAMPLE: &str = r#"
[psar]
code = ROIC
exchange = NASDAQ
start_date = 2021-01-08
pip_offset = 0.01

[data]
csv_dir = /var/data/bars
"#;

    #[test]
    fn from_string_parses_config() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("psar", "code"), Some("ROIC".to_string()));
        assert_eq!(
            adapter.get_string("data", "csv_dir"),
            Some("/var/data/bars".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[psar]\ncode = ROIC\n").unwrap();
        assert_eq!(adapter.get_string("psar", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_double("psar", "pip_offset", 0.0), 0.01);
    }

    #[test]
    fn get_double_returns_default_for_missing_or_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[psar]\npip_offset = abc\n").unwrap();
        assert_eq!(adapter.get_double("psar", "pip_offset", 0.5), 0.5);
        assert_eq!(adapter.get_double("psar", "missing", 0.25), 0.25);
    }

    #[test]
    fn get_date_parses_iso_dates() {
        let adapter =
            FileConfigAdapter::from_string("[psar]\nstart_date = 2021-01-08\nbad = 08/01/2021\n")
                .unwrap();
        assert_eq!(
            adapter.get_date("psar", "start_date"),
            Some(Ok(NaiveDate::from_ymd_opt(2021, 1, 8).unwrap()))
        );
        assert_eq!(
            adapter.get_date("psar", "bad"),
            Some(Err("08/01/2021".to_string()))
        );
        assert_eq!(adapter.get_date("psar", "missing"), None);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(SAMPLE);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("psar", "exchange"),
            Some("NASDAQ".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
