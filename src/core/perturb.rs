use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{SalesDataset, SalesRecord};
use crate::error::{DashboardError, DashboardResult};

/// Inclusive bounds of the random multiplier applied by a data update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerturbationRange {
    pub min: f64,
    pub max: f64,
}

impl PerturbationRange {
    pub fn new(min: f64, max: f64) -> DashboardResult<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(self) -> DashboardResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min <= 0.0 || self.min > self.max
        {
            return Err(DashboardError::InvalidData(format!(
                "perturbation range must satisfy 0 < min <= max (min={}, max={})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for PerturbationRange {
    fn default() -> Self {
        Self { min: 0.8, max: 1.2 }
    }
}

/// Scales `units_sold` and `revenue` of every record by independent random
/// factors, rounding to the nearest integer and clamping to `[1, f64::MAX]`.
///
/// Price and category fields are copied unchanged.
pub fn perturb_records<R: Rng + ?Sized>(
    records: &[SalesRecord],
    range: PerturbationRange,
    rng: &mut R,
) -> Vec<SalesRecord> {
    records
        .iter()
        .map(|record| {
            let units_factor = range.sample(rng);
            let revenue_factor = range.sample(rng);
            SalesRecord {
                units_sold: scale_and_clamp(record.units_sold as f64, units_factor) as u64,
                revenue: scale_and_clamp(record.revenue, revenue_factor),
                ..record.clone()
            }
        })
        .collect()
}

fn scale_and_clamp(value: f64, factor: f64) -> f64 {
    (value * factor).round().clamp(1.0, f64::MAX)
}

impl SalesDataset {
    /// Returns a new snapshot with one random perturbation applied.
    pub fn perturbed<R: Rng + ?Sized>(
        &self,
        range: PerturbationRange,
        rng: &mut R,
    ) -> DashboardResult<Self> {
        range.validate()?;
        Self::new(perturb_records(self.records(), range, rng))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{PerturbationRange, perturb_records};
    use crate::core::{SalesDataset, SalesRecord};

    #[test]
    fn zero_values_are_clamped_to_one() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = vec![SalesRecord::new("Tablet X", "Enero", 0, 0.0, 300.0)];
        let updated = perturb_records(&records, PerturbationRange::default(), &mut rng);
        assert_eq!(updated[0].units_sold, 1);
        assert_eq!(updated[0].revenue, 1.0);
    }

    #[test]
    fn unit_factor_range_keeps_values() {
        let mut rng = StdRng::seed_from_u64(1);
        let range = PerturbationRange::new(1.0, 1.0).expect("valid range");
        let records = vec![SalesRecord::new("Smartphone A", "Enero", 100, 50_000.4, 500.0)];
        let updated = perturb_records(&records, range, &mut rng);
        assert_eq!(updated[0].units_sold, 100);
        assert_eq!(updated[0].revenue, 50_000.0);
        assert_eq!(updated[0].unit_price, 500.0);
    }

    #[test]
    fn revenue_near_float_limit_saturates() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut dataset =
            SalesDataset::new(vec![SalesRecord::new("Tablet X", "Enero", 10, 1.7e308, 300.0)])
                .expect("valid dataset");
        for _ in 0..20 {
            dataset = dataset
                .perturbed(PerturbationRange::default(), &mut rng)
                .expect("perturbation succeeds");
            assert!(dataset.records()[0].revenue.is_finite());
        }
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert!(PerturbationRange::new(0.0, 1.2).is_err());
        assert!(PerturbationRange::new(1.3, 1.2).is_err());
        assert!(PerturbationRange::new(0.8, f64::INFINITY).is_err());
    }

    #[test]
    fn perturbed_snapshot_is_a_new_allocation() {
        let mut rng = StdRng::seed_from_u64(3);
        let dataset = SalesDataset::new(vec![SalesRecord::new(
            "Smartphone B",
            "Febrero",
            80,
            32_000.0,
            400.0,
        )])
        .expect("valid dataset");
        let updated = dataset
            .perturbed(PerturbationRange::default(), &mut rng)
            .expect("perturbation succeeds");
        assert!(!updated.same_snapshot(&dataset));
        assert_eq!(dataset.records()[0].units_sold, 80);
    }
}
