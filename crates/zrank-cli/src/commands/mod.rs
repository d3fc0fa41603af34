use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;
use zrank_core::sorter::sort_rows_by_order_key;
use zrank_core::{HistorySource, Order, Query, ResultRow, ZrankConfig};

use crate::cli::Cli;

mod support;

use self::support::{print_json, print_rows, report_errors};


#[derive(Debug, Serialize)]
struct QueryReport<'a> {
    query: &'a [String],
    order: &'static str,
    backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    common: Option<&'a str>,
    rows: Vec<ResultRow>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    errors: &'a [String],
}

pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            if cli.json {
                print_json(&err.to_payload("config.resolve", None))?;
            }
            return Err(err).context("failed to resolve zrank configuration");
        }
    };

    let source = HistorySource::from_config(&config);
    let query = Query::parse(&cli.terms.join(" "));
    debug!(backend = source.kind(), order = config.order.as_str(), terms = ?query.terms, "querying");
    let outcome = source.gather(&query, config.order);
    report_errors(&outcome.errors)?;

    if cli.jump {
        if let Some(target) = outcome.jump_target() {
            println!("{target}");
        }
        return Ok(());
    }

    let rows = arrange_rows(outcome.result_rows(), cli.sort_input.as_deref());
    if cli.json {
        return print_json(&QueryReport {
            query: &query.terms,
            order: config.order.as_str(),
            backend: source.kind(),
            common: outcome.common.as_deref(),
            rows,
            errors: &outcome.errors,
        });
    }
    print_rows(&rows)
}

fn resolve_config(cli: &Cli) -> zrank_core::Result<ZrankConfig> {
    let mut config = ZrankConfig::from_env()?;
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut ZrankConfig, cli: &Cli) {
    if let Some(order) = cli.order {
        config.order = Order::from(order);
    }
    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }
    if let Some(data) = &cli.data {
        config.data_path.clone_from(data);
        if cli.backend.is_none() {
            config.backend = zrank_core::BackendChoice::File;
        }
    }
}

fn arrange_rows(rows: Vec<ResultRow>, sort_input: Option<&str>) -> Vec<ResultRow> {
    match sort_input {
        Some(input) => sort_rows_by_order_key(rows, input),
        None => rows,
    }
}
