#[cfg(feature = "host-tools")]
use std::process::Command;

use tracing::{debug, warn};

use crate::models::{OrderKey, Query, RankedEntry};

pub const HOST_TOOLS_ENV: &str = "ZRANK_HOST_TOOLS";
pub const DEFAULT_HELPER_COMMAND: [&str; 3] = ["zoxide", "query", "-ls"];

/// Whether the helper process may be spawned, as set by `ZRANK_HOST_TOOLS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HelperPolicy {
    #[default]
    Allowed,
    Disabled,
}

impl HelperPolicy {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(HOST_TOOLS_ENV).ok().as_deref())
    }

    /// Unrecognized or missing values keep the default.
    #[must_use]
    pub fn from_env_value(raw: Option<&str>) -> Self {
        raw.and_then(parse_policy).unwrap_or_default()
    }

    /// False when the environment forbids the helper or the build lacks `host-tools`.
    #[must_use]
    pub const fn can_spawn(self) -> bool {
        matches!(self, Self::Allowed) && cfg!(feature = "host-tools")
    }
}

/// External ranking command, e.g. `zoxide query -ls`; the query is appended per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for HelperCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_HELPER_COMMAND[0].to_string(),
            args: DEFAULT_HELPER_COMMAND[1..]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl HelperCommand {
    #[must_use]
    pub fn from_argv<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv
            .into_iter()
            .map(Into::into)
            .filter(|part: &String| !part.trim().is_empty());
        let program = argv.next()?;
        Some(Self {
            program,
            args: argv.collect(),
        })
    }

    /// Whitespace separated command line; blank input yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::from_argv(raw.split_whitespace())
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    #[must_use]
    pub fn argv_for(&self, query: &Query) -> Vec<String> {
        let mut argv = self.args.clone();
        let joined = query.joined();
        let trimmed = joined.trim();
        if !trimmed.is_empty() {
            argv.push(trimmed.to_string());
        }
        argv
    }
}

#[cfg_attr(
    not(feature = "host-tools"),
    allow(
        dead_code,
        reason = "result shape stays stable across feature profiles"
    )
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperResult {
    Blocked {
        reason: String,
    },
    SpawnError {
        error: String,
    },
    Completed {
        success: bool,
        stdout: String,
        stderr: String,
    },
}

/// Rows parsed from the helper plus any lines to surface to the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelperOutcome {
    pub rows: Vec<RankedEntry>,
    pub errors: Vec<String>,
}

#[must_use]
pub fn run_helper(
    command: &HelperCommand,
    query: &Query,
    policy: HelperPolicy,
) -> HelperOutcome {
    let result = run_helper_command(command, query, policy);
    outcome_from_result(command, result)
}

#[must_use]
fn run_helper_command(
    command: &HelperCommand,
    query: &Query,
    policy: HelperPolicy,
) -> HelperResult {
    if policy == HelperPolicy::Disabled {
        return HelperResult::Blocked {
            reason: format!(
                "host_tools_disabled program={} env={HOST_TOOLS_ENV} (set it to on/1/true to allow the ranking helper)",
                command.program
            ),
        };
    }

    #[cfg(feature = "host-tools")]
    {
        let argv = command.argv_for(query);
        debug!(program = %command.program, ?argv, "running ranking helper");
        match Command::new(&command.program).args(&argv).output() {
            Ok(output) => HelperResult::Completed {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            },
            Err(err) => HelperResult::SpawnError {
                error: err.to_string(),
            },
        }
    }

    #[cfg(not(feature = "host-tools"))]
    {
        let _ = query;
        HelperResult::Blocked {
            reason: format!(
                "host_tools_unavailable program={} (build zrank-core with feature `host-tools` to run the ranking helper)",
                command.program
            ),
        }
    }
}

fn outcome_from_result(command: &HelperCommand, result: HelperResult) -> HelperOutcome {
    match result {
        HelperResult::Completed {
            success: true,
            stdout,
            stderr: _,
        } => HelperOutcome {
            rows: parse_helper_output(&stdout),
            errors: Vec::new(),
        },
        HelperResult::Completed {
            success: false,
            stdout: _,
            stderr,
        } => {
            let mut errors = stderr
                .lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty())
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            if errors.is_empty() {
                errors.push(format!("{} exited with failure status", command.program));
            }
            warn!(program = %command.program, "ranking helper failed");
            HelperOutcome {
                rows: Vec::new(),
                errors,
            }
        }
        HelperResult::SpawnError { error } => {
            warn!(program = %command.program, "ranking helper could not start: {error}");
            HelperOutcome {
                rows: Vec::new(),
                errors: vec![format!("failed to run {}: {error}", command.program)],
            }
        }
        HelperResult::Blocked { reason } => HelperOutcome {
            rows: Vec::new(),
            errors: vec![reason],
        },
    }
}

/// Parses `score path` lines; the path keeps any inner whitespace.
#[must_use]
pub fn parse_helper_output(stdout: &str) -> Vec<RankedEntry> {
    stdout
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let parsed = line
                .split_once(char::is_whitespace)
                .and_then(|(score, path)| {
                    let path = path.trim_start();
                    let score = score.parse::<f64>().ok()?;
                    (!path.is_empty()).then(|| RankedEntry {
                        key: OrderKey::Score(score),
                        path: path.to_string(),
                    })
                });
            if parsed.is_none() {
                debug!(line, "skipped unparsable helper line");
            }
            parsed
        })
        .collect()
}

fn parse_policy(raw: &str) -> Option<HelperPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enabled" => Some(HelperPolicy::Allowed),
        "0" | "false" | "no" | "off" | "disabled" | "none" => Some(HelperPolicy::Disabled),
        _ => None,
    }
}
