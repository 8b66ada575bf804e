use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::currency::{CurrencyCode, LocaleConfig};
use crate::errors::FinanceResult;
use crate::query::{DateRange, SortSpec};
use crate::utils::app_data_dir;

const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// User preferences applied by callers before querying and formatting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub default_range: DateRange,
    #[serde(default)]
    pub default_sort: SortSpec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: LocaleConfig::default(),
            currency: CurrencyCode::default(),
            default_range: DateRange::All,
            default_sort: SortSpec::default(),
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> FinanceResult<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: impl Into<PathBuf>) -> FinanceResult<Self> {
        let base = base.into();
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Loads the stored config, or defaults when nothing has been saved yet.
    pub fn load(&self) -> FinanceResult<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            warn!(path = %self.path.display(), %err, "config file is malformed");
            err.into()
        })
    }

    pub fn save(&self, config: &Config) -> FinanceResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_all(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    /// Loads, applies `change` and saves in one step.
    pub fn update(&self, change: impl FnOnce(&mut Config)) -> FinanceResult<Config> {
        let mut config = self.load()?;
        change(&mut config);
        self.save(&config)?;
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> FinanceResult<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FinanceError;
    use crate::query::{SortDirection, SortField};
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.currency.as_str(), "USD");
    }

    #[test]
    fn saved_preferences_are_reloaded() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        manager
            .update(|config| {
                config.currency = CurrencyCode::parse("eur").unwrap();
                config.default_range = DateRange::Last30Days;
                config.default_sort = SortSpec::new(SortField::Amount, SortDirection::Asc);
            })
            .unwrap();

        let reloaded = manager.load().unwrap();
        assert_eq!(reloaded.currency.as_str(), "EUR");
        assert_eq!(reloaded.default_range, DateRange::Last30Days);
        assert_eq!(reloaded.default_sort.field, SortField::Amount);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        fs::write(manager.path(), r#"{ "currency": "GBP" }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency.as_str(), "GBP");
        assert_eq!(config.default_range, DateRange::All);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();
        assert!(matches!(manager.load(), Err(FinanceError::Serde(_))));
    }
}
