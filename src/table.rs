//! In-memory representation of the sales table.
//!
//! A [`Table`] keeps every column from the source file, not just the ones the pipeline cares
//! about, so the cleaned data can be written back without losing information. Cells start out as
//! text and are coerced to numbers by the cleaner.

use chrono::NaiveDate;

use crate::config::ColumnNames;

/// A single cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Empty or missing cell.
    Null,
    /// Raw text as read from the file.
    Text(String),
    /// Finite numeric value produced by coercion.
    Number(f64),
}

impl Value {
    /// Builds a cell from a raw field. Blank fields become [`Value::Null`].
    pub fn from_field(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Value::Null
        } else {
            Value::Text(trimmed.to_owned())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the numeric value of the cell, parsing text when needed.
    ///
    /// Non-finite values (`NaN`, `inf`) are treated as not numeric.
    pub fn to_number(&self) -> Option<f64> {
        let number = match self {
            Value::Null => return None,
            Value::Number(number) => *number,
            Value::Text(text) => text.parse::<f64>().ok()?,
        };
        number.is_finite().then_some(number)
    }

    /// Returns the text content, if the cell holds text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Renders the cell the way it is written to the delimited file.
    pub fn to_field(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(text) => text.clone(),
            Value::Number(number) => number.to_string(),
        }
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

impl From<&str> for Value {
    fn from(raw: &str) -> Self {
        Value::from_field(raw)
    }
}

/// Ordered rows sharing one header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates an empty table with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Returns the header names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the position of the column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Appends a row. Short rows are padded with nulls and long rows truncated to the header.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Appends a row of raw fields.
    pub fn push_fields<'a, I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.push_row(fields.into_iter().map(Value::from_field).collect());
    }

    /// Iterates over the cells of one column.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Vec<Value>> {
        &mut self.rows
    }

    /// Adds a column filled with nulls and returns its index.
    pub(crate) fn add_column(&mut self, name: impl Into<String>) -> usize {
        self.columns.push(name.into());
        for row in &mut self.rows {
            row.push(Value::Null);
        }
        self.columns.len() - 1
    }

    /// Returns a typed view of every row that satisfies the cleaned-table invariant.
    ///
    /// Rows with a missing category, non-numeric amounts, or a fractional or negative quantity are
    /// skipped, so on a cleaned table this yields one record per row.
    pub fn records(&self, names: &ColumnNames) -> Vec<Record> {
        let (Some(region), Some(product), Some(quantity), Some(unit_price), Some(total)) = (
            self.column_index(&names.region),
            self.column_index(&names.product),
            self.column_index(&names.quantity),
            self.column_index(&names.unit_price),
            self.column_index(&names.total),
        ) else {
            return Vec::new();
        };
        let date = self.column_index(&names.date);

        self.rows
            .iter()
            .filter_map(|row| {
                Some(Record {
                    date: date
                        .and_then(|index| row[index].as_text())
                        .and_then(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()),
                    region: category(&row[region])?,
                    product: category(&row[product])?,
                    quantity: whole_quantity(row[quantity].to_number()?)?,
                    unit_price: row[unit_price].to_number()?,
                    total: row[total].to_number()?,
                })
            })
            .collect()
    }
}

fn category(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(other.to_field()),
    }
}

fn whole_quantity(number: f64) -> Option<u64> {
    (number >= 0.0 && number.fract() == 0.0).then_some(number as u64)
}

/// One sales transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub date: Option<NaiveDate>,
    pub region: String,
    pub product: String,
    pub quantity: u64,
    pub unit_price: f64,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn blank_fields_are_null() {
        assert_eq!(Value::from_field("   "), Value::Null);
        assert_eq!(Value::from_field(" Punjab "), Value::Text("Punjab".into()));
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(Value::Number(4000.0).to_field(), "4000");
        assert_eq!(Value::Number(12.5).to_field(), "12.5");
        assert_eq!(Value::Text("nan".into()).to_number(), None);
    }

    #[test]
    fn push_row_pads_to_header_width() {
        let mut table = Table::new(header(&["a", "b", "c"]));
        table.push_fields(["1"]);
        assert_eq!(table.rows()[0], vec![Value::from("1"), Value::Null, Value::Null]);
    }

    #[test]
    fn records_skip_rows_breaking_the_invariant() {
        let mut table = Table::new(header(&[
            "Date",
            "Region",
            "Product",
            "Quantity",
            "Unit_Price",
            "Total",
        ]));
        table.push_fields(["2025-01-01", "Punjab", "Jeans", "2", "2000", "4000"]);
        table.push_fields(["not a date", "Sindh", "Pants", "1.5", "1000", "1500"]);
        table.push_fields(["", "KPK", "Shirts", "3", "800", "2400"]);

        let records = table.records(&ColumnNames::default());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(records[0].quantity, 2);
        assert_eq!(records[1].date, None);
        assert_eq!(records[1].total, 2400.0);
    }
}
