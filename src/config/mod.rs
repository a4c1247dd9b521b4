use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    currency::{SymbolFormatter, DEFAULT_CURRENCY_SYMBOL},
    errors::LedgerError,
    ledger::{LedgerStore, DEFAULT_DATE_FORMAT},
    storage::{
        json_backend::{tmp_path, write_atomic},
        JsonFileStore, Persistence, DEFAULT_SLOT_KEY,
    },
    utils::{app_data_dir, ensure_dir},
};

const CONFIG_FILE: &str = "config.json";

/// User preferences for where and how the ledger is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Directory holding the persistence slots. Defaults to [`app_data_dir`].
    pub data_dir: Option<PathBuf>,
    pub slot_key: String,
    pub currency_symbol: String,
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            slot_key: DEFAULT_SLOT_KEY.into(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.into(),
            date_format: DEFAULT_DATE_FORMAT.into(),
        }
    }
}

impl Config {
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(app_data_dir)
    }

    pub fn formatter(&self) -> SymbolFormatter {
        SymbolFormatter::new(self.currency_symbol.clone())
    }

    /// Builds a file-backed ledger store from these settings.
    pub fn open_store(&self) -> Result<LedgerStore, LedgerError> {
        let backend = JsonFileStore::new(self.resolve_data_dir())?;
        let persistence = Persistence::with_key(backend, self.slot_key.clone());
        Ok(LedgerStore::open(persistence).with_date_format(self.date_format.clone()))
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Manager for `config.json` under the application data directory.
    pub fn from_default_location() -> Result<Self, LedgerError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self::new(base.join(CONFIG_FILE)))
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
