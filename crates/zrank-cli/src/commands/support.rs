use std::io::{self, Write};

use anyhow::Result;
use zrank_core::ResultRow;

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub(super) fn print_rows(rows: &[ResultRow]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for row in rows {
        writeln!(stdout, "{}", row.label)?;
    }
    Ok(())
}

pub(super) fn report_errors(errors: &[String]) -> Result<()> {
    write_errors(&mut io::stderr().lock(), errors)
}

pub(super) fn write_errors(out: &mut impl Write, errors: &[String]) -> Result<()> {
    for line in errors {
        writeln!(out, "zrank: {line}")?;
    }
    Ok(())
}
