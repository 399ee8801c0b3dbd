use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// Closed product and period categories for one session.
///
/// Both sets keep their configured order; charts lay out columns, rows and
/// legend entries in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySet {
    #[serde(default = "default_products")]
    pub products: IndexSet<String>,
    #[serde(default = "default_periods")]
    pub periods: IndexSet<String>,
}

impl CategorySet {
    #[must_use]
    pub fn new<P, Q>(products: P, periods: Q) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        Q: IntoIterator,
        Q::Item: Into<String>,
    {
        Self {
            products: products.into_iter().map(Into::into).collect(),
            periods: periods.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn product_index(&self, product: &str) -> Option<usize> {
        self.products.get_index_of(product)
    }

    #[must_use]
    pub fn period_index(&self, period: &str) -> Option<usize> {
        self.periods.get_index_of(period)
    }

    pub fn validate(&self) -> DashboardResult<()> {
        if self.products.is_empty() {
            return Err(DashboardError::InvalidData(
                "at least one product category is required".to_owned(),
            ));
        }
        if self.periods.is_empty() {
            return Err(DashboardError::InvalidData(
                "at least one period category is required".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self {
            products: default_products(),
            periods: default_periods(),
        }
    }
}

fn default_products() -> IndexSet<String> {
    ["Smartphone A", "Smartphone B", "Tablet X"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn default_periods() -> IndexSet<String> {
    ["Enero", "Febrero"].into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::CategorySet;

    #[test]
    fn default_categories_keep_configured_order() {
        let categories = CategorySet::default();
        assert_eq!(categories.product_index("Smartphone A"), Some(0));
        assert_eq!(categories.product_index("Tablet X"), Some(2));
        assert_eq!(categories.period_index("Febrero"), Some(1));
        assert_eq!(categories.period_index("Marzo"), None);
    }

    #[test]
    fn duplicate_names_collapse() {
        let categories = CategorySet::new(["A", "B", "A"], ["Enero"]);
        assert_eq!(categories.products.len(), 2);
    }

    #[test]
    fn empty_sets_are_invalid() {
        let categories = CategorySet::new(Vec::<String>::new(), ["Enero"]);
        assert!(categories.validate().is_err());
        assert!(CategorySet::default().validate().is_ok());
    }
}
