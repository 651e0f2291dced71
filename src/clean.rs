//! Data-quality gate applied to a freshly loaded table.
//!
//! Cleaning runs in a fixed order: duplicate removal, required-field null checks, numeric
//! coercion of quantity and unit price, and finally derivation of the `Total` column. Rows that
//! fail coercion are dropped rather than repaired.

use std::collections::HashSet;

use log::{debug, info};

use crate::config::ColumnNames;
use crate::error::DatasetError;
use crate::storage::validate_schema;
use crate::table::{Table, Value};

/// Row counts removed by each cleaning step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub duplicates_removed: usize,
    pub missing_removed: usize,
    pub invalid_numbers_removed: usize,
    /// Whether the `Total` column was recomputed from quantity and unit price.
    pub total_derived: bool,
    pub rows_remaining: usize,
}

impl CleanReport {
    pub fn rows_removed(&self) -> usize {
        self.duplicates_removed + self.missing_removed + self.invalid_numbers_removed
    }
}

struct RequiredColumns {
    quantity: usize,
    unit_price: usize,
    region: usize,
    product: usize,
}

impl RequiredColumns {
    fn locate(table: &Table, names: &ColumnNames) -> Result<Self, DatasetError> {
        validate_schema(table, names)?;
        let index = |name: &str| table.column_index(name).unwrap_or_default();
        Ok(Self {
            quantity: index(&names.quantity),
            unit_price: index(&names.unit_price),
            region: index(&names.region),
            product: index(&names.product),
        })
    }

    fn all(&self) -> [usize; 4] {
        [self.quantity, self.unit_price, self.region, self.product]
    }
}

/// Cleans `table` in place.
///
/// The only error is [`DatasetError::MissingColumns`], raised before any row is touched.
pub fn clean_table(table: &mut Table, names: &ColumnNames) -> Result<CleanReport, DatasetError> {
    let required = RequiredColumns::locate(table, names)?;
    let numeric = numeric_columns(table, &required, names);
    let mut report = CleanReport {
        duplicates_removed: remove_duplicates(table, &numeric),
        ..CleanReport::default()
    };

    report.missing_removed = retain_rows(table, |row| {
        required.all().iter().all(|&index| !row[index].is_null())
    });

    for row in table.rows_mut().iter_mut() {
        row[required.quantity] = coerce(&row[required.quantity], is_quantity);
        row[required.unit_price] = coerce(&row[required.unit_price], is_price);
    }
    report.invalid_numbers_removed = retain_rows(table, |row| {
        !row[required.quantity].is_null() && !row[required.unit_price].is_null()
    });

    report.total_derived = fill_total(table, &required, &names.total);
    if report.total_derived {
        // Rows that differed only in a discarded total are now identical.
        let numeric = numeric_columns(table, &required, names);
        report.duplicates_removed += remove_duplicates(table, &numeric);
    }

    report.rows_remaining = table.len();
    debug!("Cleaning details: {:?}", report);
    info!(
        "Cleaned table: {} rows kept, {} removed{}",
        report.rows_remaining,
        report.rows_removed(),
        if report.total_derived {
            ", total recomputed"
        } else {
            ""
        }
    );
    Ok(report)
}

fn retain_rows<F>(table: &mut Table, mut keep: F) -> usize
where
    F: FnMut(&[Value]) -> bool,
{
    let before = table.len();
    table.rows_mut().retain(|row| keep(row));
    before - table.len()
}

/// Columns whose cells compare by numeric value when looking for duplicates.
fn numeric_columns(table: &Table, required: &RequiredColumns, names: &ColumnNames) -> Vec<usize> {
    let mut columns = vec![required.quantity, required.unit_price];
    columns.extend(table.column_index(&names.total));
    columns
}

/// Drops every row whose cells all match an earlier row, keeping the first occurrence.
///
/// Cells in `numeric` compare by value so `2` and `2.0` count as the same amount. Every other
/// column compares by its exact text.
fn remove_duplicates(table: &mut Table, numeric: &[usize]) -> usize {
    let mut seen = HashSet::new();
    retain_rows(table, |row| {
        let key: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(index, value)| duplicate_key(value, numeric.contains(&index)))
            .collect();
        seen.insert(key)
    })
}

fn duplicate_key(value: &Value, numeric: bool) -> String {
    match value.to_number().filter(|_| numeric) {
        Some(number) => number.to_string(),
        None => value.to_field(),
    }
}

fn coerce(value: &Value, accept: fn(f64) -> bool) -> Value {
    match value.to_number() {
        Some(number) if accept(number) => Value::Number(number),
        _ => Value::Null,
    }
}

fn is_quantity(number: f64) -> bool {
    number >= 0.0 && number.fract() == 0.0
}

fn is_price(number: f64) -> bool {
    number >= 0.0
}

/// Recomputes `Total` unless the column exists and every cell is numeric.
///
/// Returns `true` when the column was (re)derived.
fn fill_total(table: &mut Table, required: &RequiredColumns, total_name: &str) -> bool {
    let existing = table.column_index(total_name);
    if let Some(index) = existing {
        let numeric: Option<Vec<f64>> = table
            .column_values(index)
            .map(Value::to_number)
            .collect();
        if let Some(totals) = numeric {
            for (row, total) in table.rows_mut().iter_mut().zip(totals) {
                row[index] = Value::Number(total);
            }
            return false;
        }
    }

    let index = existing.unwrap_or_else(|| table.add_column(total_name));
    for row in table.rows_mut().iter_mut() {
        let quantity = row[required.quantity].to_number().unwrap_or_default();
        let unit_price = row[required.unit_price].to_number().unwrap_or_default();
        row[index] = Value::Number(quantity * unit_price);
    }
    true
}
