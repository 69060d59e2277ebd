//! CSV ingestion: header-driven, with per-field type inference.

use std::path::Path;

use super::{Table, Value};
use crate::error::{PipelineError, Result};

/// Read a delimited file into a [`Table`].
///
/// The first record supplies the column names. Fields are inferred as
/// int, float, string or null; timestamp coercion is a separate,
/// explicit pass so a loader can decide which columns must parse.
pub fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| wrap(path, e))?;

    let headers = reader.headers().map_err(|e| wrap(path, e))?.clone();
    let mut table = Table::new(headers.iter().map(str::to_string).collect());

    for record in reader.records() {
        let record = record.map_err(|e| wrap(path, e))?;
        let row = record.iter().map(Value::infer).collect();
        table.push_row(row)?;
    }

    Ok(table)
}

fn wrap(path: &Path, source: csv::Error) -> PipelineError {
    if !source.is_io_error() {
        return PipelineError::Csv {
            path: path.to_path_buf(),
            source,
        };
    }
    match source.into_kind() {
        csv::ErrorKind::Io(io) => PipelineError::Io {
            path: path.to_path_buf(),
            source: io,
        },
        _ => unreachable!("is_io_error implies an Io kind"),
    }
}
