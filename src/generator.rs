//! Synthetic sales data for trying the pipeline end to end.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use chrono::{Days, NaiveDate};
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::GeneratorError;

pub const DEFAULT_OUTPUT_PATH: &str = "Data/sales_data_1000.csv";
pub const DEFAULT_ROW_COUNT: usize = 1000;
pub const DEFAULT_YEAR: i32 = 2025;

pub const REGIONS: &[&str] = &["Punjab", "KPK", "Balochistan", "Sindh"];

/// Product names with their inclusive unit price range.
pub const PRODUCTS: &[(&str, u32, u32)] = &[
    ("Shirts", 700, 900),
    ("Pants", 1000, 1300),
    ("T-Shirts", 400, 600),
    ("Jeans", 1800, 2200),
];

const PRICE_STEP: u32 = 10;
const MAX_QUANTITY: u32 = 50;
const HEADER: [&str; 6] = ["Date", "Region", "Product", "Quantity", "Unit_Price", "Total"];

/// One generated transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaleRow {
    pub date: NaiveDate,
    pub region: &'static str,
    pub product: &'static str,
    pub quantity: u32,
    pub unit_price: u32,
    pub total: u64,
}

impl SaleRow {
    fn fields(&self) -> [String; 6] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.region.to_owned(),
            self.product.to_owned(),
            self.quantity.to_string(),
            self.unit_price.to_string(),
            self.total.to_string(),
        ]
    }
}

/// Inclusive date range covering one calendar year.
fn year_bounds(year: i32) -> Result<(NaiveDate, u64), GeneratorError> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(GeneratorError::InvalidYear(year))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(GeneratorError::InvalidYear(year))?;
    let days = (end - start).num_days() as u64;
    Ok((start, days))
}

/// Draws one row: uniform date in `year`, random region and product, a quantity in `1..=50`,
/// and a unit price on a 10-unit grid inside the product's range.
pub fn generate_row<R: Rng + ?Sized>(rng: &mut R, year: i32) -> Result<SaleRow, GeneratorError> {
    let (start, days) = year_bounds(year)?;
    let date = start
        .checked_add_days(Days::new(rng.gen_range(0..=days)))
        .ok_or(GeneratorError::InvalidYear(year))?;

    let region = REGIONS.choose(rng).copied().unwrap_or(REGIONS[0]);
    let &(product, low, high) = PRODUCTS.choose(rng).unwrap_or(&PRODUCTS[0]);
    let quantity = rng.gen_range(1..=MAX_QUANTITY);
    let unit_price = low + rng.gen_range(0..=(high - low) / PRICE_STEP) * PRICE_STEP;

    Ok(SaleRow {
        date,
        region,
        product,
        quantity,
        unit_price,
        total: u64::from(quantity) * u64::from(unit_price),
    })
}

/// Writes a header and `count` generated rows.
pub fn write_rows<R, W>(rng: &mut R, writer: W, count: usize, year: i32) -> Result<(), GeneratorError>
where
    R: Rng + ?Sized,
    W: io::Write,
{
    let write_error = |source| GeneratorError::Write {
        path: "<writer>".into(),
        source,
    };
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER).map_err(write_error)?;
    for _ in 0..count {
        let row = generate_row(rng, year)?;
        writer.write_record(row.fields()).map_err(write_error)?;
    }
    writer
        .flush()
        .map_err(|err| write_error(csv::Error::from(err)))?;
    Ok(())
}

/// Generates `count` rows into `path`. A seed makes the output reproducible.
pub fn generate_file(
    path: &Path,
    count: usize,
    year: i32,
    seed: Option<u64>,
) -> Result<(), GeneratorError> {
    let io_error = |err: io::Error| GeneratorError::Write {
        path: path.to_path_buf(),
        source: csv::Error::from(err),
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    write_rows(&mut rng, file, count, year).map_err(|err| match err {
        GeneratorError::Write { source, .. } => GeneratorError::Write {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    info!("Generated {} rows -> {}", count, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnNames;
    use crate::storage::{read_table, validate_schema};

    #[test]
    fn rows_stay_inside_their_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let row = generate_row(&mut rng, 2025).unwrap();
            let &(_, low, high) = PRODUCTS
                .iter()
                .find(|(name, _, _)| *name == row.product)
                .unwrap();

            assert!(REGIONS.contains(&row.region));
            assert!((1..=MAX_QUANTITY).contains(&row.quantity));
            assert!((low..=high).contains(&row.unit_price));
            assert_eq!(row.unit_price % PRICE_STEP, 0);
            assert_eq!(row.total, u64::from(row.quantity * row.unit_price));
            assert_eq!(row.date.format("%Y").to_string(), "2025");
        }
    }

    #[test]
    fn seeded_output_is_reproducible() {
        let render = || {
            let mut buffer = Vec::new();
            write_rows(&mut StdRng::seed_from_u64(42), &mut buffer, 25, 2025).unwrap();
            buffer
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn generated_file_passes_schema_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Data").join("sales.csv");
        generate_file(&path, 10, 2024, Some(1)).unwrap();

        let table = read_table(File::open(&path).unwrap()).unwrap();
        assert_eq!(table.columns(), HEADER);
        assert_eq!(table.len(), 10);
        validate_schema(&table, &ColumnNames::default()).unwrap();
    }

    #[test]
    fn rejects_years_chrono_cannot_represent() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generate_row(&mut rng, i32::MAX),
            Err(GeneratorError::InvalidYear(_))
        ));
    }
}
