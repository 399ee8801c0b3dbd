use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sales_dashboard::core::{
    CategorySet, GroupedTable, PerturbationRange, SalesDataset, SalesRecord, SqrtScale,
    perturb_records,
};

const PRODUCTS: [&str; 4] = ["Smartphone A", "Smartphone B", "Tablet X", "Laptop Z"];
const PERIODS: [&str; 3] = ["Enero", "Febrero", "Marzo"];

fn record_strategy() -> impl Strategy<Value = SalesRecord> {
    (
        0..PRODUCTS.len(),
        0..PERIODS.len(),
        0u64..100_000,
        0.0f64..10_000_000.0,
        0.0f64..5_000.0,
    )
        .prop_map(|(product, period, units, revenue, price)| {
            SalesRecord::new(PRODUCTS[product], PERIODS[period], units, revenue, price)
        })
}

proptest! {
    #[test]
    fn grouped_table_takes_first_matching_record_or_zero(
        records in prop::collection::vec(record_strategy(), 0..40)
    ) {
        let dataset = SalesDataset::new(records.clone()).expect("valid dataset");
        let categories = CategorySet::default();
        let table = GroupedTable::build(&dataset, &categories);

        prop_assert_eq!(table.rows.len(), categories.periods.len());
        for (row, period) in table.rows.iter().zip(categories.periods.iter()) {
            prop_assert_eq!(&row.period, period);
            prop_assert_eq!(row.values.len(), categories.products.len());
            for (value, product) in row.values.iter().zip(categories.products.iter()) {
                let expected = records
                    .iter()
                    .find(|record| &record.product == product && &record.period == period)
                    .map_or(0, |record| record.units_sold);
                prop_assert_eq!(*value, expected);
            }
        }
    }

    #[test]
    fn perturbation_stays_within_twenty_percent(
        records in prop::collection::vec(record_strategy(), 1..30),
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let updated = perturb_records(&records, PerturbationRange::default(), &mut rng);

        prop_assert_eq!(updated.len(), records.len());
        for (before, after) in records.iter().zip(updated.iter()) {
            prop_assert!(after.units_sold >= 1);
            prop_assert!(after.revenue >= 1.0);
            prop_assert_eq!(after.revenue, after.revenue.round());

            let units = before.units_sold as f64;
            let units_low = (units * 0.8).round().max(1.0);
            let units_high = (units * 1.2).round().max(1.0);
            prop_assert!((after.units_sold as f64) >= units_low);
            prop_assert!((after.units_sold as f64) <= units_high);

            let revenue_low = (before.revenue * 0.8).round().max(1.0);
            let revenue_high = (before.revenue * 1.2).round().max(1.0);
            prop_assert!(after.revenue >= revenue_low);
            prop_assert!(after.revenue <= revenue_high);

            prop_assert_eq!(after.unit_price, before.unit_price);
            prop_assert_eq!(&after.product, &before.product);
            prop_assert_eq!(&after.period, &before.period);
        }
    }

    #[test]
    fn bubble_size_is_monotonic_in_price(
        max_price in 0.0f64..10_000.0,
        a in 0.0f64..10_000.0,
        b in 0.0f64..10_000.0
    ) {
        let scale = SqrtScale::new((0.0, max_price), (10.0, 60.0)).expect("valid scale");
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(scale.map(low) <= scale.map(high));
        prop_assert_eq!(scale.map(0.0), 10.0);
        prop_assert!(scale.map(low) >= 10.0);
    }
}
