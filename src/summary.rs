//! Aggregate statistics over a cleaned table.

use std::collections::BTreeMap;

use crate::config::ColumnNames;
use crate::table::{Record, Table};

/// Totals keyed by a category, sorted by key.
pub type Grouping = BTreeMap<String, f64>;

/// Read-only aggregates consumed by the chart and report stages.
///
/// An empty table produces a zero total, no average, and empty groupings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    transactions: usize,
    total_sales: f64,
    average_sale: Option<f64>,
    sales_by_region: Grouping,
    sales_by_product: Grouping,
}

impl Summary {
    /// Summarises the typed records of a cleaned table.
    pub fn from_table(table: &Table, names: &ColumnNames) -> Self {
        Self::from_records(&table.records(names))
    }

    pub fn from_records(records: &[Record]) -> Self {
        let mut summary = Summary {
            transactions: records.len(),
            ..Summary::default()
        };

        for record in records {
            summary.total_sales += record.total;
            *summary
                .sales_by_region
                .entry(record.region.clone())
                .or_default() += record.total;
            *summary
                .sales_by_product
                .entry(record.product.clone())
                .or_default() += record.total;
        }

        if !records.is_empty() {
            summary.average_sale = Some(summary.total_sales / records.len() as f64);
        }
        summary
    }

    /// Number of records summarised.
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    pub fn total_sales(&self) -> f64 {
        self.total_sales
    }

    /// Mean sale value, or `None` when there were no records.
    pub fn average_sale(&self) -> Option<f64> {
        self.average_sale
    }

    pub fn sales_by_region(&self) -> &Grouping {
        &self.sales_by_region
    }

    pub fn sales_by_product(&self) -> &Grouping {
        &self.sales_by_product
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean_table;
    use crate::storage::read_table;

    fn cleaned(csv: &str) -> Summary {
        let names = ColumnNames::default();
        let mut table = read_table(csv.as_bytes()).unwrap();
        clean_table(&mut table, &names).unwrap();
        Summary::from_table(&table, &names)
    }

    #[test]
    fn derived_totals_feed_the_summary() {
        let summary = cleaned("Region,Product,Quantity,Unit_Price\nA,X,1,10\nB,X,2,10\n");

        assert_eq!(summary.total_sales(), 30.0);
        assert_eq!(summary.average_sale(), Some(15.0));
        assert_eq!(
            summary.sales_by_product(),
            &Grouping::from([("X".to_string(), 30.0)])
        );
        assert_eq!(
            summary.sales_by_region(),
            &Grouping::from([("A".to_string(), 10.0), ("B".to_string(), 20.0)])
        );
    }

    #[test]
    fn groupings_partition_the_total() {
        let summary = cleaned(
            "Date,Region,Product,Quantity,Unit_Price,Total\n\
             2025-01-01,Punjab,Jeans,2,2000,4000\n\
             2025-02-11,Sindh,Shirts,5,750,3750\n\
             2025-03-07,Punjab,Pants,1,1200,1200\n\
             2025-04-19,KPK,Jeans,3,1900,5700\n",
        );

        let by_region: f64 = summary.sales_by_region().values().sum();
        let by_product: f64 = summary.sales_by_product().values().sum();
        assert_eq!(summary.total_sales(), 14650.0);
        assert_eq!(by_region, summary.total_sales());
        assert_eq!(by_product, summary.total_sales());
        assert_eq!(
            summary.sales_by_region().keys().collect::<Vec<_>>(),
            ["KPK", "Punjab", "Sindh"]
        );
    }

    #[test]
    fn empty_table_has_no_average() {
        let summary = cleaned("Region,Product,Quantity,Unit_Price,Total\n");

        assert_eq!(summary.transactions(), 0);
        assert_eq!(summary.total_sales(), 0.0);
        assert_eq!(summary.average_sale(), None);
        assert!(summary.sales_by_region().is_empty());
        assert!(summary.sales_by_product().is_empty());
    }
}
