//! Reading, validating, and writing the delimited sales file.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::config::ColumnNames;
use crate::error::DatasetError;
use crate::table::Table;

/// Loads the table at `path` and checks that every required column is present.
pub fn load_table(path: &Path, names: &ColumnNames) -> Result<Table, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let table = read_table(file).map_err(|err| classify_read_error(path, err))?;
    validate_schema(&table, names)?;

    info!(
        "Loaded {} rows with {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Parses a header row followed by data rows. Ragged rows are rejected.
pub fn read_table<R: io::Read>(reader: R) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = reader.headers()?.iter().map(str::to_owned).collect();
    let mut table = Table::new(columns);

    for record in reader.records() {
        let record = record?;
        table.push_fields(record.iter());
    }

    Ok(table)
}

/// Fails with [`DatasetError::MissingColumns`] naming every required column that is absent.
pub fn validate_schema(table: &Table, names: &ColumnNames) -> Result<(), DatasetError> {
    let missing: Vec<String> = names
        .required()
        .iter()
        .filter(|name| table.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::MissingColumns { missing })
    }
}

/// Serializes the table, header first.
pub fn write_table<W: io::Write>(table: &Table, writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|value| value.to_field()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Replaces `path` with the table contents.
///
/// The rows go to a temporary file next to `path` that is renamed over it once complete, so a
/// failed write leaves the original file intact.
pub fn persist_table(table: &Table, path: &Path) -> Result<(), DatasetError> {
    let into_error = |source| DatasetError::Persist {
        path: path.to_path_buf(),
        source,
    };
    let io_error = |err: io::Error| into_error(csv::Error::from(err));

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(directory).map_err(io_error)?;
    if let Ok(metadata) = fs::metadata(path) {
        staged
            .as_file()
            .set_permissions(metadata.permissions())
            .map_err(io_error)?;
    }
    write_table(table, &mut staged).map_err(into_error)?;
    staged
        .persist(path)
        .map_err(|err| io_error(err.error))?;

    debug!("Wrote {} cleaned rows to {}", table.len(), path.display());
    Ok(())
}

fn classify_read_error(path: &Path, err: csv::Error) -> DatasetError {
    if err.is_io_error() {
        DatasetError::Unreadable {
            path: path.to_path_buf(),
            source: err.into(),
        }
    } else {
        DatasetError::Malformed {
            path: path.to_path_buf(),
            source: err,
        }
    }
}
