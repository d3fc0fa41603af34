use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{BackendChoice, ZrankConfig};
use crate::helper::{HelperCommand, HelperPolicy, run_helper};
use crate::index::{FrecencyIndex, QueryOutcome};
use crate::models::Query;
use crate::rank::Order;

/// Where ranked rows come from: the history file itself, or an external helper
/// that does its own matching and ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistorySource {
    DataFile(PathBuf),
    Helper {
        command: HelperCommand,
        policy: HelperPolicy,
    },
}

impl HistorySource {
    #[must_use]
    pub fn from_config(config: &ZrankConfig) -> Self {
        Self::select(
            config.backend,
            &config.data_path,
            &config.helper,
            HelperPolicy::from_env(),
        )
    }

    /// `Auto` only picks the helper when it may run and is found on `PATH`.
    #[must_use]
    pub fn select(
        backend: BackendChoice,
        data_path: &Path,
        helper: &HelperCommand,
        policy: HelperPolicy,
    ) -> Self {
        let helper_source = || Self::Helper {
            command: helper.clone(),
            policy,
        };
        match backend {
            BackendChoice::File => Self::DataFile(data_path.to_path_buf()),
            BackendChoice::Helper => helper_source(),
            BackendChoice::Auto if policy.can_spawn() && helper.is_available() => {
                debug!(program = %helper.program, "ranking helper found on PATH");
                helper_source()
            }
            BackendChoice::Auto => Self::DataFile(data_path.to_path_buf()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DataFile(_) => "file",
            Self::Helper { .. } => "helper",
        }
    }

    /// Always returns a well-formed outcome; failures land in `errors`.
    #[must_use]
    pub fn gather(&self, query: &Query, order: Order) -> QueryOutcome {
        match self {
            Self::DataFile(path) => FrecencyIndex::open(path).query(query, order),
            Self::Helper { command, policy } => {
                let outcome = run_helper(command, query, *policy);
                if !outcome.errors.is_empty() {
                    return QueryOutcome::failed(outcome.errors);
                }
                QueryOutcome {
                    rows: outcome.rows,
                    common: None,
                    errors: Vec::new(),
                }
            }
        }
    }
}
