use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::{Result, ZrankError};
use crate::helper::HelperCommand;
use crate::rank::Order;

mod env;

pub const ZL_DATA_ENV: &str = "_ZL_DATA";
pub const Z_DATA_ENV: &str = "_Z_DATA";
pub const ORDER_ENV: &str = "ZRANK_ORDER";
pub const BACKEND_ENV: &str = "ZRANK_BACKEND";
pub const HELPER_ENV: &str = "ZRANK_HELPER";
pub const CONFIG_ENV: &str = "ZRANK_CONFIG";

const DEFAULT_DATA_FILE: &str = ".z";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    #[default]
    Auto,
    File,
    Helper,
}

impl BackendChoice {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::File => "file",
            Self::Helper => "helper",
        }
    }

    #[must_use]
    pub fn from_key(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "file" => Some(Self::File),
            "helper" => Some(Self::Helper),
            _ => None,
        }
    }
}

/// Values read from the process environment, captured once so resolution stays pure.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    pub data: Option<String>,
    pub order: Option<String>,
    pub backend: Option<String>,
    pub helper: Option<String>,
    pub config: Option<String>,
    pub home: Option<PathBuf>,
}

impl EnvSnapshot {
    #[must_use]
    pub fn capture() -> Self {
        Self {
            data: env::read_first_non_empty_env(&[ZL_DATA_ENV, Z_DATA_ENV]),
            order: env::read_non_empty_env(ORDER_ENV),
            backend: env::read_non_empty_env(BACKEND_ENV),
            helper: env::read_non_empty_env(HELPER_ENV),
            config: env::read_non_empty_env(CONFIG_ENV),
            home: dirs::home_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    data: Option<PathBuf>,
    order: Option<Order>,
    backend: Option<BackendChoice>,
    helper: Option<Vec<String>>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZrankConfig {
    pub data_path: PathBuf,
    pub order: Order,
    pub backend: BackendChoice,
    pub helper: HelperCommand,
}

impl ZrankConfig {
    pub fn from_env() -> Result<Self> {
        Self::resolve(&EnvSnapshot::capture())
    }

    /// Environment beats the optional TOML file, which beats built-in defaults.
    pub fn resolve(env: &EnvSnapshot) -> Result<Self> {
        let file = match env.config.as_deref() {
            Some(path) => FileConfig::read(Path::new(path))?,
            None => FileConfig::default(),
        };

        let data_path = match (env.data.as_deref(), file.data) {
            (Some(raw), _) => PathBuf::from(raw),
            (None, Some(path)) => path,
            (None, None) => default_data_path(env.home.as_deref()),
        };

        let order = match env.order.as_deref() {
            Some(raw) => Order::from_key(raw).ok_or_else(|| {
                ZrankError::Validation(format!(
                    "invalid {ORDER_ENV}: {raw} (expected rank|recent|frecent)"
                ))
            })?,
            None => file.order.unwrap_or_default(),
        };

        let backend = match env.backend.as_deref() {
            Some(raw) => BackendChoice::from_key(raw).ok_or_else(|| {
                ZrankError::Validation(format!(
                    "invalid {BACKEND_ENV}: {raw} (expected auto|file|helper)"
                ))
            })?,
            None => file.backend.unwrap_or_default(),
        };

        let helper = match (env.helper.as_deref(), file.helper) {
            (Some(raw), _) => HelperCommand::parse(raw).ok_or_else(|| {
                ZrankError::Validation(format!("invalid {HELPER_ENV}: empty command"))
            })?,
            (None, Some(argv)) => HelperCommand::from_argv(argv).ok_or_else(|| {
                ZrankError::Validation("invalid helper in config file: empty command".to_string())
            })?,
            (None, None) => HelperCommand::default(),
        };

        Ok(Self {
            data_path,
            order,
            backend,
            helper,
        })
    }
}

fn default_data_path(home: Option<&Path>) -> PathBuf {
    if let Some(home) = home {
        return home.join(DEFAULT_DATA_FILE);
    }
    warn!("home directory is unknown; using {DEFAULT_DATA_FILE} in the working directory");
    PathBuf::from(DEFAULT_DATA_FILE)
}
