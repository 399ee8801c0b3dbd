use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::{DashboardError, DashboardResult};

/// One (product, period) observation.
///
/// The wire format is camelCase. The Spanish field names used by the legacy
/// `ventas.json` documents are accepted as aliases. `unitsSold` may be written
/// as any JSON number holding a non-negative whole value (`120` or `120.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SalesRecordDocument")]
pub struct SalesRecord {
    pub product: String,
    pub period: String,
    pub units_sold: u64,
    pub revenue: f64,
    pub unit_price: f64,
}

/// Record as it appears in a dataset document, before unit counts are
/// checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SalesRecordDocument {
    #[serde(alias = "producto")]
    product: String,
    #[serde(alias = "mes")]
    period: String,
    #[serde(alias = "ventas")]
    units_sold: Number,
    #[serde(alias = "ingresos")]
    revenue: f64,
    #[serde(alias = "precio")]
    unit_price: f64,
}

impl TryFrom<SalesRecordDocument> for SalesRecord {
    type Error = DashboardError;

    fn try_from(document: SalesRecordDocument) -> DashboardResult<Self> {
        let units_sold = whole_units(&document.units_sold).ok_or_else(|| {
            DashboardError::InvalidData(format!(
                "record `unitsSold` must be a non-negative whole number, got {} (product={}, period={})",
                document.units_sold, document.product, document.period
            ))
        })?;
        Ok(Self {
            product: document.product,
            period: document.period,
            units_sold,
            revenue: document.revenue,
            unit_price: document.unit_price,
        })
    }
}

fn whole_units(number: &Number) -> Option<u64> {
    if let Some(units) = number.as_u64() {
        return Some(units);
    }
    let value = number.as_f64()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64)
        .then_some(value as u64)
}

impl SalesRecord {
    #[must_use]
    pub fn new(
        product: impl Into<String>,
        period: impl Into<String>,
        units_sold: u64,
        revenue: f64,
        unit_price: f64,
    ) -> Self {
        Self {
            product: product.into(),
            period: period.into(),
            units_sold,
            revenue,
            unit_price,
        }
    }

    pub fn validate(&self) -> DashboardResult<()> {
        if self.product.trim().is_empty() {
            return Err(DashboardError::InvalidData(
                "record product must not be empty".to_owned(),
            ));
        }
        if self.period.trim().is_empty() {
            return Err(DashboardError::InvalidData(
                "record period must not be empty".to_owned(),
            ));
        }
        for (field, value) in [("revenue", self.revenue), ("unitPrice", self.unit_price)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DashboardError::InvalidData(format!(
                    "record `{field}` must be finite and >= 0 (product={}, period={})",
                    self.product, self.period
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SalesRecord;
    use crate::core::SalesDataset;
    use crate::error::DashboardError;

    #[test]
    fn deserializes_camel_case_fields() {
        let json = r#"{"product":"Tablet X","period":"Enero","unitsSold":12,"revenue":3600.5,"unitPrice":300}"#;
        let record: SalesRecord = serde_json::from_str(json).expect("parse record");
        assert_eq!(record, SalesRecord::new("Tablet X", "Enero", 12, 3600.5, 300.0));
    }

    #[test]
    fn accepts_whole_float_unit_counts() {
        let json = r#"{"product":"Tablet X","period":"Enero","unitsSold":120.0,"revenue":36000,"unitPrice":300}"#;
        let record: SalesRecord = serde_json::from_str(json).expect("parse record");
        assert_eq!(record.units_sold, 120);
    }

    #[test]
    fn fractional_or_negative_unit_counts_are_invalid_data() {
        for units in ["12.5", "-3", "-0.5", "1e30"] {
            let json = format!(
                r#"[{{"product":"Tablet X","period":"Enero","unitsSold":{units},"revenue":1,"unitPrice":1}}]"#
            );
            let err = SalesDataset::from_json_str(&json).expect_err("rejected");
            assert!(matches!(err, DashboardError::InvalidData(_)), "{units}: {err}");
        }
    }

    #[test]
    fn deserializes_legacy_spanish_fields() {
        let json = r#"{"producto":"Smartphone B","mes":"Febrero","ventas":80,"ingresos":32000,"precio":400}"#;
        let record: SalesRecord = serde_json::from_str(json).expect("parse legacy record");
        assert_eq!(record.product, "Smartphone B");
        assert_eq!(record.period, "Febrero");
        assert_eq!(record.units_sold, 80);
        assert_eq!(record.revenue, 32_000.0);
        assert_eq!(record.unit_price, 400.0);
    }

    #[test]
    fn negative_units_are_rejected_by_the_parser() {
        let json = r#"{"product":"A","period":"Enero","unitsSold":-1,"revenue":1,"unitPrice":1}"#;
        assert!(serde_json::from_str::<SalesRecord>(json).is_err());
    }

    #[test]
    fn validation_rejects_negative_revenue_and_empty_labels() {
        assert!(SalesRecord::new("A", "Enero", 1, -1.0, 1.0).validate().is_err());
        assert!(SalesRecord::new("A", "Enero", 1, 1.0, f64::NAN).validate().is_err());
        assert!(SalesRecord::new(" ", "Enero", 1, 1.0, 1.0).validate().is_err());
        assert!(SalesRecord::new("A", "", 1, 1.0, 1.0).validate().is_err());
        assert!(SalesRecord::new("A", "Enero", 0, 0.0, 0.0).validate().is_ok());
    }
}
