use std::sync::Arc;

use ordered_float::OrderedFloat;

use crate::core::SalesRecord;
use crate::core::record::SalesRecordDocument;
use crate::error::DashboardResult;

/// Immutable snapshot of the session's sales records.
///
/// Cloning shares the same allocation. Updates never mutate a snapshot; they
/// build a new one and swap the reference, so a reader always sees either the
/// old or the new record set in full.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SalesDataset {
    records: Arc<[SalesRecord]>,
}

impl SalesDataset {
    /// Builds a validated snapshot.
    pub fn new(records: Vec<SalesRecord>) -> DashboardResult<Self> {
        for record in &records {
            record.validate()?;
        }
        Ok(Self {
            records: records.into(),
        })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> DashboardResult<Self> {
        let documents: Vec<SalesRecordDocument> = serde_json::from_str(json)?;
        let records = documents
            .into_iter()
            .map(SalesRecord::try_from)
            .collect::<DashboardResult<Vec<_>>>()?;
        Self::new(records)
    }

    #[must_use]
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` when both handles point at the same snapshot.
    #[must_use]
    pub fn same_snapshot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }

    #[must_use]
    pub fn max_units_sold(&self) -> Option<u64> {
        self.records.iter().map(|record| record.units_sold).max()
    }

    #[must_use]
    pub fn max_revenue(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|record| OrderedFloat(record.revenue))
            .max()
            .map(OrderedFloat::into_inner)
    }

    #[must_use]
    pub fn max_unit_price(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|record| OrderedFloat(record.unit_price))
            .max()
            .map(OrderedFloat::into_inner)
    }
}
