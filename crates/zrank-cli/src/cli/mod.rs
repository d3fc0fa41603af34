use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use zrank_core::{BackendChoice, Order};


#[derive(Debug, Parser)]
#[command(name = "zrank")]
#[command(about = "Rank visited directories by frecency", version)]
pub struct Cli {
    /// Query terms. Every term must occur somewhere in the path.
    pub terms: Vec<String>,
    /// Ordering strategy (default: $ZRANK_ORDER, then frecent).
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,
    /// History file (default: $_ZL_DATA, $_Z_DATA, then ~/.z).
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,
    #[arg(long, default_value_t = false)]
    pub json: bool,
    /// Print only the directory a jump should land in.
    #[arg(long, default_value_t = false, conflicts_with = "json")]
    pub jump: bool,
    /// Re-sort rows by ordering key, as an interactive filter does once input is typed.
    #[arg(long, value_name = "INPUT")]
    pub sort_input: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Rank,
    Recent,
    Frecent,
}

impl From<OrderArg> for Order {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Rank => Self::Rank,
            OrderArg::Recent => Self::Recent,
            OrderArg::Frecent => Self::Frecent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Auto,
    File,
    Helper,
}

impl From<BackendArg> for BackendChoice {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Auto => Self::Auto,
            BackendArg::File => Self::File,
            BackendArg::Helper => Self::Helper,
        }
    }
}
