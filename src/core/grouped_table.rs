use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{CategorySet, SalesDataset};

/// One period row of the grouped comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedRow {
    pub period: String,
    /// Units sold per product, in the table's product order.
    pub values: Vec<u64>,
}

/// Period x product table of units sold.
///
/// Rows follow the configured period order and columns the configured product
/// order. For each (product, period) pair the first matching record wins and a
/// missing pair reads as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedTable {
    pub products: Vec<String>,
    pub rows: Vec<GroupedRow>,
}

impl GroupedTable {
    #[must_use]
    pub fn build(dataset: &SalesDataset, categories: &CategorySet) -> Self {
        let mut first_match: IndexMap<(&str, &str), u64> = IndexMap::new();
        for record in dataset.records() {
            first_match
                .entry((record.product.as_str(), record.period.as_str()))
                .or_insert(record.units_sold);
        }

        let rows = categories
            .periods
            .iter()
            .map(|period| GroupedRow {
                period: period.clone(),
                values: categories
                    .products
                    .iter()
                    .map(|product| {
                        first_match
                            .get(&(product.as_str(), period.as_str()))
                            .copied()
                            .unwrap_or(0)
                    })
                    .collect(),
            })
            .collect();

        Self {
            products: categories.products.iter().cloned().collect(),
            rows,
        }
    }

    #[must_use]
    pub fn value(&self, period: &str, product: &str) -> Option<u64> {
        let column = self.products.iter().position(|name| name == product)?;
        self.rows
            .iter()
            .find(|row| row.period == period)
            .and_then(|row| row.values.get(column).copied())
    }

    #[must_use]
    pub fn max_value(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|row| row.values.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Header row followed by one row per period, as a host table widget expects.
    #[must_use]
    pub fn to_header_and_rows(&self, period_header: &str) -> (Vec<String>, Vec<Vec<String>>) {
        let mut header = Vec::with_capacity(self.products.len() + 1);
        header.push(period_header.to_owned());
        header.extend(self.products.iter().cloned());

        let rows = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.period.clone())
                    .chain(row.values.iter().map(u64::to_string))
                    .collect()
            })
            .collect();
        (header, rows)
    }
}
